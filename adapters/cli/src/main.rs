#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Path Defence simulations.

mod layout_transfer;
mod scene;

use std::time::Duration;

use anyhow::{bail, ensure, Context, Result as AnyResult};
use clap::Parser;

use layout_transfer::{TowerLayoutSnapshot, TowerLayoutTower};
use path_defence_core::{Command, Event, TileCoord, TowerKind, WavePhase, WaveReport};
use path_defence_system_analytics::Analytics;
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_world::{apply, query, World};

/// Ticks allotted to a single wave before the run is declared stuck.
const MAX_TICKS_PER_WAVE: u32 = 100_000;

/// Command-line arguments accepted by the simulation runner.
#[derive(Parser, Debug)]
#[command(name = "path-defence", about = "Headless Path Defence simulation runner")]
struct Args {
    /// Number of waves to simulate before exiting.
    #[arg(long, default_value_t = 3)]
    waves: u32,

    /// Simulated milliseconds advanced per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Encoded tower layout installed before the first wave.
    #[arg(long)]
    layout: Option<String>,

    /// Print the encoded tower layout when the run finishes.
    #[arg(long)]
    export_layout: bool,

    /// Print a statistics report after each completed wave.
    #[arg(long)]
    reports: bool,

    /// Print a text frame of the final scene.
    #[arg(long)]
    show_frame: bool,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> AnyResult<()> {
    let args = Args::parse();
    ensure!(
        (1..=50).contains(&args.tick_ms),
        "tick-ms must lie within 1..=50"
    );
    let tick = Duration::from_millis(args.tick_ms);

    let mut world = World::new();
    println!("{}", query::welcome_banner(&world));

    match &args.layout {
        Some(encoded) => install_layout(&mut world, encoded)?,
        None => install_default_layout(&mut world),
    }

    let mut targeting = TowerTargeting::new();
    let mut combat = TowerCombat::new();
    let mut analytics = Analytics::new(query::lives(&world));

    for _ in 0..args.waves {
        let finished = run_wave(&mut world, &mut targeting, &mut combat, &mut analytics, tick)?;
        if args.reports {
            if let Some(report) = analytics.last_report() {
                print_report(&report);
            }
        }
        if !finished {
            println!("game over on wave {}", query::wave(&world));
            break;
        }
    }

    println!(
        "simulation finished: wave {}, money {}, lives {}",
        query::wave(&world),
        query::money(&world),
        query::lives(&world)
    );

    if args.export_layout {
        println!("{}", export_layout(&world));
    }
    if args.show_frame {
        let presentation = scene::build_presentation(&world)?;
        println!("{}", scene::render_text_frame(&presentation.scene));
    }

    Ok(())
}

/// Decodes and installs a transferred tower layout.
fn install_layout(world: &mut World, encoded: &str) -> AnyResult<()> {
    let snapshot = TowerLayoutSnapshot::decode(encoded).context("could not decode tower layout")?;
    let grid = query::tile_grid(world);
    ensure!(
        snapshot.columns == grid.columns() && snapshot.rows == grid.rows(),
        "layout grid {}x{} does not match the world grid {}x{}",
        snapshot.columns,
        snapshot.rows,
        grid.columns(),
        grid.rows()
    );

    for tower in &snapshot.towers {
        place_tower(world, tower.kind, tower.tile);
    }
    Ok(())
}

/// Places the stock two-tower loadout used when no layout is provided.
fn install_default_layout(world: &mut World) {
    place_tower(world, TowerKind::Basic, TileCoord::new(4, 4));
    place_tower(world, TowerKind::Basic, TileCoord::new(10, 5));
}

fn place_tower(world: &mut World, kind: TowerKind, tile: TileCoord) {
    let mut events = Vec::new();
    apply(world, Command::SelectTowerKind { kind }, &mut events);
    apply(world, Command::PlaceTower { tile }, &mut events);
    for event in &events {
        if let Event::TowerPlacementRejected { tile, reason, .. } = event {
            println!(
                "placement of {kind:?} at ({}, {}) rejected: {reason:?}",
                tile.column(),
                tile.row()
            );
        }
    }
}

/// Runs a single wave to completion, returning `false` when the run ended.
fn run_wave(
    world: &mut World,
    targeting: &mut TowerTargeting,
    combat: &mut TowerCombat,
    analytics: &mut Analytics,
    tick: Duration,
) -> AnyResult<bool> {
    let mut events = Vec::new();
    apply(world, Command::StartWave, &mut events);
    ensure!(
        events
            .iter()
            .any(|event| matches!(event, Event::WaveStarted { .. })),
        "wave could not start"
    );

    let mut targets = Vec::new();
    let mut commands = Vec::new();
    let mut published = Vec::new();
    for _ in 0..MAX_TICKS_PER_WAVE {
        apply(world, Command::Tick { dt: tick }, &mut events);

        targets.clear();
        targeting.handle(
            &query::tower_view(world),
            &query::enemy_view(world),
            &mut targets,
        );
        commands.clear();
        combat.handle(query::tower_cooldown_view(world), &targets, &mut commands);
        for command in commands.drain(..) {
            apply(world, command, &mut events);
        }

        analytics.handle(&events, &mut published);
        events.clear();
        published.clear();

        if query::is_game_over(world) {
            return Ok(false);
        }
        if query::wave_phase(world) == WavePhase::Idle {
            return Ok(true);
        }
    }

    bail!("wave did not resolve within {MAX_TICKS_PER_WAVE} ticks")
}

fn print_report(report: &WaveReport) {
    println!(
        "wave {} report: spawned {}, killed {}, leaked {}, bounty {}, lives {}",
        report.wave,
        report.spawned,
        report.killed,
        report.leaked,
        report.bounty_earned,
        report.lives_remaining
    );
}

/// Encodes the current tower placement for clipboard transfer.
fn export_layout(world: &World) -> String {
    let grid = query::tile_grid(world);
    let towers = query::tower_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| TowerLayoutTower {
            kind: snapshot.kind,
            tile: snapshot.tile,
        })
        .collect();

    TowerLayoutSnapshot {
        columns: grid.columns(),
        rows: grid.rows(),
        tile_length: grid.tile_length(),
        towers,
    }
    .encode()
}
