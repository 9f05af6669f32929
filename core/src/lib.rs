#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the tower kind pending placement. No economy effect.
    SelectTowerKind {
        /// Kind the player intends to place next.
        kind: TowerKind,
    },
    /// Updates the tile currently hovered by the pointer, if any.
    HoverTile {
        /// Hovered tile, or `None` when the pointer left the grid.
        tile: Option<TileCoord>,
    },
    /// Attempts to place a tower of the selected kind at the provided tile.
    PlaceTower {
        /// Tile that should receive the tower.
        tile: TileCoord,
    },
    /// Requests the start of the next wave.
    StartWave,
    /// Sells the most recently placed tower for a partial refund.
    SellLastTower,
    /// Restores the initial economy and clears all entities.
    Reset,
    /// Requests that a tower fire a projectile at the given enemy.
    FireProjectile {
        /// Tower expected to fire.
        tower: TowerId,
        /// Enemy the projectile should track.
        target: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick, after clamping.
        dt: Duration,
    },
    /// Announces that a new wave began spawning.
    WaveStarted {
        /// One-based index of the wave that started.
        wave: u32,
        /// Number of enemies the spawner will release during the wave.
        enemies_queued: u32,
    },
    /// Confirms that the spawner released a new enemy onto the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Hit points the enemy spawned with.
        health: Health,
        /// Pixel position of the enemy at spawn time.
        position: PixelPoint,
    },
    /// Reports that an enemy reached the final waypoint.
    EnemyLeaked {
        /// Identifier of the leaked enemy.
        enemy: EnemyId,
        /// Lives remaining after the leak.
        lives_remaining: i32,
    },
    /// Reports that an enemy was destroyed by a projectile.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Money awarded for the kill.
        bounty: u32,
    },
    /// Announces that all enemies of the active wave have been resolved.
    WaveCleared {
        /// One-based index of the wave that finished.
        wave: u32,
    },
    /// Reports that lives were exhausted and the run ended.
    GameOver {
        /// Wave that was active when the run ended.
        wave: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: TileCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind requested for placement, when one was selected.
        kind: Option<TowerKind>,
        /// Tile provided in the placement request.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the most recently placed tower was sold.
    TowerSold {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Kind of the sold tower.
        kind: TowerKind,
        /// Money returned to the player.
        refund: u32,
    },
    /// Confirms that a tower fired a projectile at an enemy.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile tracks.
        target: EnemyId,
    },
    /// Reports that a projectile reached its target and applied damage.
    ProjectileHit {
        /// Identifier of the projectile that impacted.
        projectile: ProjectileId,
        /// Enemy that received the damage.
        target: EnemyId,
    },
    /// Reports that a projectile lost its target before impact.
    ProjectileExpired {
        /// Identifier of the projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Publishes the statistics gathered for a finished wave.
    WaveReportPublished {
        /// Statistics for the wave that just ended.
        report: WaveReport,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Position expressed in continuous pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    x: f32,
    y: f32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Straight-line distance to another point.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point advanced toward `target` by at most `step` pixels.
    ///
    /// When `step` meets or exceeds the remaining distance the target itself
    /// is returned, so callers observe exact arrival instead of overshoot.
    #[must_use]
    pub fn step_toward(self, target: PixelPoint, step: f32) -> PixelPoint {
        let distance = self.distance_to(target);
        if distance <= step || distance <= f32::EPSILON {
            return target;
        }

        let scale = step / distance;
        PixelPoint::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }
}

/// Hit points carried by an enemy.
///
/// Values may transiently drop below zero when a projectile overkills its
/// target; depletion is always checked with [`Health::is_depleted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw hit point count.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health reduced by the provided damage.
    #[must_use]
    pub const fn damaged_by(self, damage: i32) -> Self {
        Self(self.0 - damage)
    }

    /// Reports whether the hit points are exhausted.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }

    /// Remaining fraction of the provided maximum, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn ratio_of(&self, max: Health) -> f32 {
        if max.0 <= 0 {
            return 0.0;
        }

        (self.0 as f32 / max.0 as f32).clamp(0.0, 1.0)
    }
}

/// Types of towers that can be constructed along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap short-range tower with a fast firing cadence.
    Basic,
    /// Expensive long-range tower that deals heavy damage slowly.
    Sniper,
}

impl TowerKind {
    /// Money required to place a tower of this kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 50,
            Self::Sniper => 80,
        }
    }

    /// Targeting radius measured in pixels.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 80.0,
            Self::Sniper => 160.0,
        }
    }

    /// Minimum delay between successive shots.
    #[must_use]
    pub const fn fire_rate(self) -> Duration {
        match self {
            Self::Basic => Duration::from_millis(800),
            Self::Sniper => Duration::from_millis(1600),
        }
    }

    /// Damage applied by each projectile the tower fires.
    #[must_use]
    pub const fn damage(self) -> i32 {
        match self {
            Self::Basic => 1,
            Self::Sniper => 3,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No tower kind has been selected for placement.
    NoSelection,
    /// The requested tile lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested tile is part of the enemy path.
    OnPath,
    /// The requested tile already hosts a tower.
    Occupied,
    /// The player cannot afford the selected tower kind.
    InsufficientFunds,
}

/// Progress of the wave spawner's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No wave is active; a new wave may be started.
    Idle,
    /// Enemies are still being released onto the path.
    Spawning,
    /// Spawning finished but enemies from the wave remain alive.
    Draining,
}

/// Targeting assignment produced for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower the assignment belongs to.
    pub tower: TowerId,
    /// Enemy selected as the nearest candidate in range.
    pub enemy: EnemyId,
    /// Pixel position of the tower's center.
    pub tower_position: PixelPoint,
    /// Pixel position of the enemy at selection time.
    pub enemy_position: PixelPoint,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current pixel position of the enemy.
    pub position: PixelPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the enemy spawned with.
    pub max_health: Health,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Index of the waypoint the enemy is travelling toward.
    pub path_index: usize,
}

impl EnemySnapshot {
    /// Remaining fraction of the enemy's hit points, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        self.health.ratio_of(self.max_health)
    }
}

/// Read-only snapshot describing all enemies marching along the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// Pixel position of the tower's center.
    pub position: PixelPoint,
}

/// Read-only snapshot describing all towers placed within the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown status for a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Remaining time until the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's firing cooldown.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Consumes the view, yielding snapshots sorted by tower identifier.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current pixel position of the projectile.
    pub position: PixelPoint,
    /// Enemy the projectile is tracking.
    pub target: EnemyId,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Statistics accumulated for a single wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WaveReport {
    /// One-based index of the wave the report covers.
    pub wave: u32,
    /// Enemies released by the spawner during the wave.
    pub spawned: u32,
    /// Enemies destroyed by projectiles.
    pub killed: u32,
    /// Enemies that reached the final waypoint.
    pub leaked: u32,
    /// Total bounty money earned during the wave.
    pub bounty_earned: u32,
    /// Lives remaining when the wave ended.
    pub lives_remaining: i32,
}
