#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The world owns every entity arena and executes [`Command`] values through
//! [`apply`], broadcasting [`Event`] values that pure systems and adapters
//! consume. Each [`Command::Tick`] advances the subsystems in a fixed order:
//! wave spawner, enemy movement, tower cooldowns, projectile flight, and
//! finally the purge of resolved entities.

mod economy;
mod spawner;
mod towers;

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use path_defence_core::{
    Command, EnemyId, Event, Health, PixelPoint, PlacementError, ProjectileId, TileCoord, TowerId,
    TowerKind, WELCOME_BANNER,
};

use economy::{refund_for, Economy, KILL_BOUNTY};
use spawner::WaveSpawner;
use towers::TowerRegistry;

/// Upper bound applied to every tick delta to limit integration error.
pub const MAX_TICK_DT: Duration = Duration::from_millis(50);

/// Travel speed shared by all projectiles, in pixels per second.
pub const PROJECTILE_SPEED: f32 = 300.0;

const DEFAULT_GRID_COLUMNS: u32 = 20;
const DEFAULT_GRID_ROWS: u32 = 12;
const DEFAULT_TILE_LENGTH: f32 = 32.0;

/// Describes the discrete tile layout of the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Reports whether the provided tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Pixel position at the center of the provided tile.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> PixelPoint {
        PixelPoint::new(
            tile.column() as f32 * self.tile_length + self.tile_length / 2.0,
            tile.row() as f32 * self.tile_length + self.tile_length / 2.0,
        )
    }

    /// Maps a pixel position to the tile containing it.
    ///
    /// Returns `None` for positions outside the grid bounds.
    #[must_use]
    pub fn tile_at(&self, position: PixelPoint) -> Option<TileCoord> {
        if position.x() < 0.0 || position.y() < 0.0 {
            return None;
        }

        let column = (position.x() / self.tile_length) as u32;
        let row = (position.y() / self.tile_length) as u32;
        let tile = TileCoord::new(column, row);
        self.contains(tile).then_some(tile)
    }
}

/// Fixed sequence of waypoints that enemies follow across the grid.
///
/// Consecutive waypoints are assumed to be grid-adjacent; the derived tile set
/// answers "is this tile on the path" in O(1) for placement validation.
#[derive(Clone, Debug)]
pub struct Path {
    waypoints: Vec<TileCoord>,
    tiles: HashSet<TileCoord>,
}

impl Path {
    /// Creates a path from the provided ordered waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<TileCoord>) -> Self {
        debug_assert!(waypoints.len() >= 2, "a path requires at least two tiles");
        let mut tiles = HashSet::with_capacity(waypoints.len());
        for waypoint in &waypoints {
            let _ = tiles.insert(*waypoint);
        }
        Self { waypoints, tiles }
    }

    /// Ordered waypoints composing the path.
    #[must_use]
    pub fn waypoints(&self) -> &[TileCoord] {
        &self.waypoints
    }

    /// Reports whether the provided tile lies on the path.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    /// Tile enemies spawn on.
    #[must_use]
    pub fn entry(&self) -> TileCoord {
        self.waypoints[0]
    }

    /// Tile enemies leak from.
    #[must_use]
    pub fn exit(&self) -> TileCoord {
        self.waypoints[self.waypoints.len() - 1]
    }
}

fn default_path() -> Path {
    const WAYPOINTS: [(u32, u32); 27] = [
        (0, 5),
        (1, 5),
        (2, 5),
        (3, 5),
        (4, 5),
        (5, 5),
        (5, 4),
        (5, 3),
        (6, 3),
        (7, 3),
        (8, 3),
        (9, 3),
        (9, 4),
        (9, 5),
        (9, 6),
        (10, 6),
        (11, 6),
        (12, 6),
        (13, 6),
        (14, 6),
        (14, 5),
        (14, 4),
        (15, 4),
        (16, 4),
        (17, 4),
        (18, 4),
        (19, 4),
    ];

    Path::new(
        WAYPOINTS
            .iter()
            .map(|&(column, row)| TileCoord::new(column, row))
            .collect(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EnemyState {
    Marching,
    Leaked,
    Killed,
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    position: PixelPoint,
    health: Health,
    max_health: Health,
    speed: f32,
    path_index: usize,
    state: EnemyState,
}

impl Enemy {
    fn is_targetable(&self) -> bool {
        self.state == EnemyState::Marching && !self.health.is_depleted()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProjectileState {
    InFlight,
    Impacted,
    TargetLost,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    position: PixelPoint,
    target: EnemyId,
    speed: f32,
    damage: i32,
    state: ProjectileState,
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: TileGrid,
    path: Path,
    economy: Economy,
    spawner: WaveSpawner,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: u32,
    towers: TowerRegistry,
    selected_kind: Option<TowerKind>,
    hovered_tile: Option<TileCoord>,
    last_placed: Option<TowerId>,
    game_over: bool,
}

impl World {
    /// Creates a new Path Defence world using the default grid and path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(
            TileGrid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_TILE_LENGTH),
            default_path(),
        )
    }

    /// Creates a world with an explicit grid and path layout.
    #[must_use]
    pub fn with_layout(grid: TileGrid, path: Path) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid,
            path,
            economy: Economy::new(),
            spawner: WaveSpawner::new(),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            towers: TowerRegistry::new(),
            selected_kind: None,
            hovered_tile: None,
            last_placed: None,
            game_over: false,
        }
    }

    fn placement_error(&self, tile: TileCoord) -> Option<PlacementError> {
        let Some(kind) = self.selected_kind else {
            return Some(PlacementError::NoSelection);
        };
        self.placement_error_for(kind, tile)
    }

    fn placement_error_for(&self, kind: TowerKind, tile: TileCoord) -> Option<PlacementError> {
        if !self.grid.contains(tile) {
            return Some(PlacementError::OutOfBounds);
        }
        if self.path.contains(tile) {
            return Some(PlacementError::OnPath);
        }
        if self.towers.occupies(tile) {
            return Some(PlacementError::Occupied);
        }
        if !self.economy.can_afford(kind.cost()) {
            return Some(PlacementError::InsufficientFunds);
        }
        None
    }

    fn place_tower(&mut self, tile: TileCoord, out_events: &mut Vec<Event>) {
        if let Some(reason) = self.placement_error(tile) {
            out_events.push(Event::TowerPlacementRejected {
                kind: self.selected_kind,
                tile,
                reason,
            });
            return;
        }

        // placement_error verified a selection exists
        let Some(kind) = self.selected_kind else {
            return;
        };

        self.economy.debit(kind.cost());
        let position = self.grid.tile_center(tile);
        let tower = self.towers.insert(kind, tile, position);
        self.last_placed = Some(tower);
        out_events.push(Event::TowerPlaced { tower, kind, tile });
    }

    fn sell_last_tower(&mut self, out_events: &mut Vec<Event>) {
        let Some(id) = self.last_placed.take() else {
            return;
        };
        let Some(state) = self.towers.remove(id) else {
            return;
        };

        let refund = refund_for(state.kind.cost());
        self.economy.credit(refund);
        out_events.push(Event::TowerSold {
            tower: id,
            kind: state.kind,
            refund,
        });
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over || !self.spawner.can_start() || !self.enemies.is_empty() {
            return;
        }

        let wave = self.economy.advance_wave();
        let enemies_queued = 5 + wave * 2;
        self.spawner.begin_wave(enemies_queued);
        out_events.push(Event::WaveStarted {
            wave,
            enemies_queued,
        });
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let targetable = self
            .enemies
            .get(&target)
            .map_or(false, Enemy::is_targetable);
        if !targetable {
            return;
        }

        let Some(state) = self.towers.get(tower) else {
            return;
        };
        if !state.cooldown.is_zero() {
            return;
        }

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        let _ = self.projectiles.insert(
            id,
            Projectile {
                id,
                position: state.position,
                target,
                speed: PROJECTILE_SPEED,
                damage: state.kind.damage(),
                state: ProjectileState::InFlight,
            },
        );

        let fire_rate = state.kind.fire_rate();
        if let Some(state) = self.towers.get_mut(tower) {
            state.cooldown = fire_rate;
        }

        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
        });
    }

    fn reset(&mut self) {
        self.economy = Economy::new();
        self.spawner.reset();
        self.enemies.clear();
        self.projectiles.clear();
        self.towers.clear();
        self.last_placed = None;
        self.game_over = false;
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let dt = dt.min(MAX_TICK_DT);
        out_events.push(Event::TimeAdvanced { dt });

        if self.game_over {
            return;
        }

        self.advance_spawner(dt, out_events);
        self.advance_enemies(dt, out_events);
        self.advance_tower_cooldowns(dt);
        self.advance_projectiles(dt, out_events);
        self.purge(out_events);
    }

    fn advance_spawner(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.spawner.advance(dt) {
            return;
        }

        let wave = self.economy.wave();
        let health = Health::new(3 + (wave * 3 / 5) as i32);
        let speed = 30.0 + wave as f32 * 2.0;
        let position = self.grid.tile_center(self.path.entry());

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        let _ = self.enemies.insert(
            id,
            Enemy {
                id,
                position,
                health,
                max_health: health,
                speed,
                path_index: 0,
                state: EnemyState::Marching,
            },
        );

        out_events.push(Event::EnemySpawned {
            enemy: id,
            health,
            position,
        });
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let dt_seconds = dt.as_secs_f32();
        let final_index = self.path.waypoints().len() - 1;
        let enemy_ids: Vec<EnemyId> = self.enemies.keys().copied().collect();

        for id in enemy_ids {
            let wave = self.economy.wave();
            let Some(enemy) = self.enemies.get_mut(&id) else {
                continue;
            };
            if enemy.state != EnemyState::Marching {
                continue;
            }

            if enemy.path_index >= final_index {
                enemy.state = EnemyState::Leaked;
                let lives_remaining = self.economy.lose_life();
                out_events.push(Event::EnemyLeaked {
                    enemy: id,
                    lives_remaining,
                });
                if lives_remaining <= 0 && !self.game_over {
                    self.game_over = true;
                    out_events.push(Event::GameOver { wave });
                }
                continue;
            }

            let target = self.grid.tile_center(self.path.waypoints()[enemy.path_index + 1]);
            let step = enemy.speed * dt_seconds;
            if enemy.position.distance_to(target) <= step {
                enemy.position = target;
                enemy.path_index += 1;
            } else {
                enemy.position = enemy.position.step_toward(target, step);
            }
        }
    }

    fn advance_tower_cooldowns(&mut self, dt: Duration) {
        for tower in self.towers.iter_mut() {
            tower.cooldown = tower.cooldown.saturating_sub(dt);
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let dt_seconds = dt.as_secs_f32();
        let projectile_ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();

        for id in projectile_ids {
            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            if projectile.state != ProjectileState::InFlight {
                continue;
            }

            let target = projectile.target;
            let Some(enemy) = self.enemies.get_mut(&target) else {
                projectile.state = ProjectileState::TargetLost;
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            };
            if !enemy.is_targetable() {
                projectile.state = ProjectileState::TargetLost;
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            }

            let step = projectile.speed * dt_seconds;
            if projectile.position.distance_to(enemy.position) > step {
                projectile.position = projectile.position.step_toward(enemy.position, step);
                continue;
            }

            enemy.health = enemy.health.damaged_by(projectile.damage);
            projectile.state = ProjectileState::Impacted;
            out_events.push(Event::ProjectileHit {
                projectile: id,
                target,
            });

            if enemy.health.is_depleted() {
                enemy.state = EnemyState::Killed;
                self.economy.credit(KILL_BOUNTY);
                out_events.push(Event::EnemyKilled {
                    enemy: target,
                    bounty: KILL_BOUNTY,
                });
            }
        }
    }

    fn purge(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|_, enemy| enemy.is_targetable());
        self.projectiles
            .retain(|_, projectile| projectile.state == ProjectileState::InFlight);

        if self.spawner.try_finish(!self.enemies.is_empty()) {
            out_events.push(Event::WaveCleared {
                wave: self.economy.wave(),
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SelectTowerKind { kind } => world.selected_kind = Some(kind),
        Command::HoverTile { tile } => world.hovered_tile = tile,
        Command::PlaceTower { tile } => world.place_tower(tile, out_events),
        Command::StartWave => world.start_wave(out_events),
        Command::SellLastTower => world.sell_last_tower(out_events),
        Command::Reset => world.reset(),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Path, TileGrid, World};
    use path_defence_core::{
        EnemySnapshot, EnemyView, PlacementError, ProjectileSnapshot, ProjectileView, TileCoord,
        TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerKind, TowerSnapshot, TowerView,
        WavePhase,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Provides read-only access to the enemy path.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Money currently held by the player.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.economy.money()
    }

    /// Lives remaining before the run ends.
    #[must_use]
    pub fn lives(world: &World) -> i32 {
        world.economy.lives()
    }

    /// Wave counter; zero before the first wave starts.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.economy.wave()
    }

    /// Current phase of the wave spawner.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        world.spawner.phase()
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Tower kind currently selected for placement, if any.
    #[must_use]
    pub fn selected_tower_kind(world: &World) -> Option<TowerKind> {
        world.selected_kind
    }

    /// Tile currently hovered by the pointer, if any.
    #[must_use]
    pub fn hovered_tile(world: &World) -> Option<TileCoord> {
        world.hovered_tile
    }

    /// Tower that would be removed by the next sell command, if any.
    #[must_use]
    pub fn last_placed_tower(world: &World) -> Option<TowerId> {
        world.last_placed
    }

    /// Validates a hypothetical placement for preview purposes.
    ///
    /// Uses the same rules as `Command::PlaceTower` but never mutates state.
    pub fn validate_placement(
        world: &World,
        kind: TowerKind,
        tile: TileCoord,
    ) -> Result<(), PlacementError> {
        match world.placement_error_for(kind, tile) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Captures a read-only view of the enemies marching along the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .values()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    health: enemy.health,
                    max_health: enemy.max_health,
                    speed: enemy.speed,
                    path_index: enemy.path_index,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    tile: tower.tile,
                    position: tower.position,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every tower's firing cooldown.
    #[must_use]
    pub fn tower_cooldown_view(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    kind: tower.kind,
                    ready_in: tower.cooldown,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .values()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    target: projectile.target,
                })
                .collect(),
        )
    }
}
