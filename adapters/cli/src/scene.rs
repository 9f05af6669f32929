//! Builds rendering presentations from world snapshots and draws text frames.

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::TowerKind;
use path_defence_rendering::{
    Color, EnemyPresentation, HudPresentation, PathPresentation, Presentation,
    ProjectilePresentation, RangePreview, Scene, TileGridPresentation, TowerPresentation,
};
use path_defence_world::{query, World};

const WINDOW_TITLE: &str = "Path Defence";
const CLEAR_COLOR: Color = Color::from_rgb_u8(24, 24, 32);
const GRID_LINE_COLOR: Color = Color::from_rgb_u8(70, 70, 70);
const PATH_COLOR: Color = Color::from_rgb_u8(194, 178, 128);
const ENEMY_COLOR: Color = Color::from_rgb_u8(220, 60, 60);
const BASIC_TOWER_COLOR: Color = Color::from_rgb_u8(80, 140, 220);
const SNIPER_TOWER_COLOR: Color = Color::from_rgb_u8(150, 90, 200);
const PROJECTILE_COLOR: Color = Color::from_rgb_u8(240, 220, 90);

fn tower_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::Basic => BASIC_TOWER_COLOR,
        TowerKind::Sniper => SNIPER_TOWER_COLOR,
    }
}

/// Captures the current world state as a backend-agnostic presentation.
pub(crate) fn build_presentation(world: &World) -> AnyResult<Presentation> {
    let world_grid = query::tile_grid(world);
    let tile_grid = TileGridPresentation::new(
        world_grid.columns(),
        world_grid.rows(),
        world_grid.tile_length(),
        GRID_LINE_COLOR,
    )?;

    let path = PathPresentation::new(query::path(world).waypoints().to_vec(), PATH_COLOR);

    let enemies = query::enemy_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| {
            EnemyPresentation::new(
                snapshot.id,
                Vec2::new(snapshot.position.x(), snapshot.position.y()),
                snapshot.health_ratio(),
                ENEMY_COLOR,
            )
        })
        .collect();

    let towers = query::tower_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| {
            TowerPresentation::new(
                snapshot.id,
                snapshot.kind,
                snapshot.tile,
                tower_color(snapshot.kind),
            )
        })
        .collect();

    let projectiles = query::projectile_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| {
            ProjectilePresentation::new(
                snapshot.id,
                Vec2::new(snapshot.position.x(), snapshot.position.y()),
                PROJECTILE_COLOR,
            )
        })
        .collect();

    let hud = HudPresentation {
        money: query::money(world),
        lives: query::lives(world),
        wave: query::wave(world),
        phase: query::wave_phase(world),
        selected: query::selected_tower_kind(world),
        game_over: query::is_game_over(world),
    };

    let range_preview = match (query::selected_tower_kind(world), query::hovered_tile(world)) {
        (Some(kind), Some(tile)) => {
            let rejection = query::validate_placement(world, kind, tile).err();
            Some(RangePreview::new(
                kind,
                tile_grid.tile_center(tile),
                kind.range(),
                true,
                rejection,
            ))
        }
        _ => None,
    };

    let scene = Scene::new(
        tile_grid,
        path,
        enemies,
        towers,
        projectiles,
        hud,
        range_preview,
    );
    Ok(Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene))
}

/// Draws the scene as a character grid, one cell per tile.
///
/// Later layers overwrite earlier ones, so enemies remain visible on top of
/// the path and projectiles on top of everything else.
pub(crate) fn render_text_frame(scene: &Scene) -> String {
    let columns = scene.tile_grid.columns as usize;
    let rows = scene.tile_grid.rows as usize;
    let mut cells = vec![vec![' '; columns]; rows];

    for tile in &scene.path.tiles {
        cells[tile.row() as usize][tile.column() as usize] = '.';
    }
    for tower in &scene.towers {
        let glyph = match tower.kind {
            TowerKind::Basic => 'B',
            TowerKind::Sniper => 'S',
        };
        cells[tower.tile.row() as usize][tower.tile.column() as usize] = glyph;
    }
    for enemy in &scene.enemies {
        if let Some(tile) = scene.tile_grid.world_to_tile(enemy.position) {
            cells[tile.row() as usize][tile.column() as usize] = 'e';
        }
    }
    for projectile in &scene.projectiles {
        if let Some(tile) = scene.tile_grid.world_to_tile(projectile.position) {
            cells[tile.row() as usize][tile.column() as usize] = 'o';
        }
    }

    let horizontal: String = std::iter::repeat('-').take(columns).collect();
    let mut frame = format!("+{horizontal}+\n");
    for row in cells {
        frame.push('|');
        frame.extend(row);
        frame.push_str("|\n");
    }
    frame.push_str(&format!("+{horizontal}+"));
    frame
}
