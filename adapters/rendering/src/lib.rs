#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{
    EnemyId, PlacementError, ProjectileId, TileCoord, TowerId, TowerKind, WavePhase,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units, if the cursor is over the window.
    pub cursor_world_space: Option<Vec2>,
    /// Tile under the cursor, if the cursor lies within the grid.
    pub hovered_tile: Option<TileCoord>,
    /// Whether the adapter detected a placement confirmation on this frame.
    pub place_action: bool,
    /// Whether the adapter detected a sell request on this frame.
    pub sell_action: bool,
    /// Whether the adapter detected a wave start request on this frame.
    pub start_wave_action: bool,
    /// Tower kind selection detected on this frame, if any.
    pub select_kind: Option<TowerKind>,
    /// Whether the adapter detected a run reset request on this frame.
    pub reset_action: bool,
}

/// Describes a square tile grid that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not strictly positive.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// World-space position at the center of the provided tile.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            tile.column() as f32 * self.tile_length + self.tile_length / 2.0,
            tile.row() as f32 * self.tile_length + self.tile_length / 2.0,
        )
    }

    /// Maps a world-space position to the tile containing it.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn world_to_tile(&self, position: Vec2) -> Option<TileCoord> {
        if position.x < 0.0
            || position.y < 0.0
            || position.x >= self.width()
            || position.y >= self.height()
        {
            return None;
        }

        Some(TileCoord::new(
            (position.x / self.tile_length) as u32,
            (position.y / self.tile_length) as u32,
        ))
    }

    /// Clamps a world-space position to the grid bounds.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        if self.columns == 0 || self.rows == 0 {
            return Vec2::ZERO;
        }

        Vec2::new(
            position.x.clamp(0.0, self.width()),
            position.y.clamp(0.0, self.height()),
        )
    }
}

/// Enemy path drawn as a contiguous ribbon of tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Ordered tiles composing the path from entry to exit.
    pub tiles: Vec<TileCoord>,
    /// Fill color used for path tiles.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a new path descriptor.
    #[must_use]
    pub fn new(tiles: Vec<TileCoord>, color: Color) -> Self {
        Self { tiles, color }
    }

    /// Determines whether the path contains any tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Enemy rendered as a filled circle with a health bar above it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// World-space position of the enemy's center.
    pub position: Vec2,
    /// Remaining health fraction in the range 0.0..=1.0.
    pub health_ratio: f32,
    /// Fill color of the enemy's body.
    pub color: Color,
}

impl EnemyPresentation {
    /// Creates a new enemy presentation descriptor.
    #[must_use]
    pub fn new(id: EnemyId, position: Vec2, health_ratio: f32, color: Color) -> Self {
        Self {
            id,
            position,
            health_ratio: health_ratio.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Tower rendered as a filled square on its tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of the placed tower.
    pub kind: TowerKind,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// Fill color of the tower's body.
    pub color: Color,
}

impl TowerPresentation {
    /// Creates a new tower presentation descriptor.
    #[must_use]
    pub const fn new(id: TowerId, kind: TowerKind, tile: TileCoord, color: Color) -> Self {
        Self {
            id,
            kind,
            tile,
            color,
        }
    }
}

/// Projectile rendered as a small filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// World-space position of the projectile.
    pub position: Vec2,
    /// Fill color of the projectile.
    pub color: Color,
}

impl ProjectilePresentation {
    /// Creates a new projectile presentation descriptor.
    #[must_use]
    pub const fn new(id: ProjectileId, position: Vec2, color: Color) -> Self {
        Self {
            id,
            position,
            color,
        }
    }
}

/// Declarative placement preview shown under the hovered tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangePreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// World-space center of the hovered tile.
    pub center: Vec2,
    /// Targeting radius of the proposed tower in world units.
    pub range: f32,
    /// Indicates whether the previewed location is valid for placement.
    pub placeable: bool,
    /// Reason reported by the world for rejecting the placement, if any.
    pub rejection: Option<PlacementError>,
}

impl RangePreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(
        kind: TowerKind,
        center: Vec2,
        range: f32,
        placeable: bool,
        rejection: Option<PlacementError>,
    ) -> Self {
        let placeable = if rejection.is_some() { false } else { placeable };

        Self {
            kind,
            center,
            range,
            placeable,
            rejection,
        }
    }
}

/// Head-up display values drawn alongside the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Money currently held by the player.
    pub money: u32,
    /// Lives remaining before the run ends.
    pub lives: i32,
    /// Wave counter; zero before the first wave.
    pub wave: u32,
    /// Current phase of the wave spawner.
    pub phase: WavePhase,
    /// Tower kind currently selected for placement, if any.
    pub selected: Option<TowerKind>,
    /// Whether the run has ended.
    pub game_over: bool,
}

/// Scene description combining the grid, path and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Enemy path drawn beneath the entities.
    pub path: PathPresentation,
    /// Enemies currently marching along the path.
    pub enemies: Vec<EnemyPresentation>,
    /// Towers currently placed within the grid.
    pub towers: Vec<TowerPresentation>,
    /// Projectiles currently in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Head-up display values.
    pub hud: HudPresentation,
    /// Optional placement preview for the hovered tile.
    pub range_preview: Option<RangePreview>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Scene construction intentionally enumerates every channel explicitly.
    pub fn new(
        tile_grid: TileGridPresentation,
        path: PathPresentation,
        enemies: Vec<EnemyPresentation>,
        towers: Vec<TowerPresentation>,
        projectiles: Vec<ProjectilePresentation>,
        hud: HudPresentation,
        range_preview: Option<RangePreview>,
    ) -> Self {
        Self {
            tile_grid,
            path,
            enemies,
            towers,
            projectiles,
            hud,
            range_preview,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Path Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be positive to avoid a zero-sized grid.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
