//! End-to-end simulation behaviour of the authoritative world.

use std::time::Duration;

use path_defence_core::{
    Command, EnemyId, Event, PlacementError, TileCoord, TowerKind, WavePhase,
};
use path_defence_world::{apply, query, Path, TileGrid, World, MAX_TICK_DT};

const TICK: Duration = Duration::from_millis(50);

/// Grid with a straight four-tile path along row 1.
fn corridor_world() -> World {
    let grid = TileGrid::new(4, 3, 32.0);
    let path = Path::new(vec![
        TileCoord::new(0, 1),
        TileCoord::new(1, 1),
        TileCoord::new(2, 1),
        TileCoord::new(3, 1),
    ]);
    World::with_layout(grid, path)
}

/// Wide grid with a two-tile path, so leaks happen quickly and towers can be
/// placed arbitrarily far from the action.
fn short_leak_world() -> World {
    let grid = TileGrid::new(20, 3, 32.0);
    let path = Path::new(vec![TileCoord::new(0, 1), TileCoord::new(1, 1)]);
    World::with_layout(grid, path)
}

fn drive(world: &mut World, commands: &[Command]) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, *command, &mut events);
    }
    events
}

fn tick_times(world: &mut World, ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        apply(world, Command::Tick { dt: TICK }, &mut events);
    }
    events
}

#[test]
fn initial_resources_match_a_fresh_run() {
    let world = World::new();
    assert_eq!(query::money(&world), 100);
    assert_eq!(query::lives(&world), 10);
    assert_eq!(query::wave(&world), 0);
    assert_eq!(query::wave_phase(&world), WavePhase::Idle);
    assert!(!query::is_game_over(&world));
    assert!(query::enemy_view(&world).into_vec().is_empty());
    assert!(query::tower_view(&world).into_vec().is_empty());
    assert!(query::projectile_view(&world).into_vec().is_empty());
    assert_eq!(query::welcome_banner(&world), "Welcome to Path Defence.");
}

#[test]
fn oversized_tick_deltas_are_clamped() {
    let mut world = corridor_world();
    let events = drive(
        &mut world,
        &[Command::Tick {
            dt: Duration::from_secs(3),
        }],
    );
    assert_eq!(events, vec![Event::TimeAdvanced { dt: MAX_TICK_DT }]);
}

#[test]
fn first_wave_enemies_use_base_stats() {
    let mut world = corridor_world();
    let _ = drive(&mut world, &[Command::StartWave]);
    let events = tick_times(&mut world, 1);

    let spawned: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .collect();
    assert_eq!(spawned.len(), 1);

    let enemies = query::enemy_view(&world).into_vec();
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].health.get(), 3);
    assert!((enemies[0].speed - 32.0).abs() < f32::EPSILON);
}

#[test]
fn spawner_releases_the_full_wave_on_schedule() {
    let mut world = corridor_world();
    let _ = drive(&mut world, &[Command::StartWave]);

    // Wave 1 queues 7 enemies at one release per 800ms.
    let events = tick_times(&mut world, 16 * 7);
    let spawn_count = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawn_count, 7);
    assert_eq!(query::wave_phase(&world), WavePhase::Draining);
}

#[test]
fn enemy_path_progress_never_regresses() {
    let mut world = corridor_world();
    let _ = drive(&mut world, &[Command::StartWave]);

    let mut last_index = 0;
    for _ in 0..50 {
        let _ = tick_times(&mut world, 1);
        let enemies = query::enemy_view(&world).into_vec();
        let Some(first) = enemies.first() else {
            continue;
        };
        if first.id == EnemyId::new(0) {
            assert!(first.path_index >= last_index);
            last_index = first.path_index;
        }
    }
    assert!(last_index > 0, "enemy should have advanced a waypoint");
}

#[test]
fn placement_rejections_cover_every_rule() {
    let mut world = corridor_world();
    let path_tile = TileCoord::new(1, 1);
    let free_tile = TileCoord::new(1, 0);
    let outside = TileCoord::new(9, 9);

    let events = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Basic,
            },
            Command::PlaceTower { tile: outside },
            Command::PlaceTower { tile: path_tile },
            Command::PlaceTower { tile: free_tile },
            Command::PlaceTower { tile: free_tile },
            Command::PlaceTower {
                tile: TileCoord::new(2, 0),
            },
            Command::PlaceTower {
                tile: TileCoord::new(3, 0),
            },
        ],
    );

    let reasons: Vec<PlacementError> = events
        .iter()
        .filter_map(|event| match event {
            Event::TowerPlacementRejected { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            PlacementError::OutOfBounds,
            PlacementError::OnPath,
            PlacementError::Occupied,
            PlacementError::InsufficientFunds,
        ]
    );

    // Two basic towers at 50 each drained the starting money.
    assert_eq!(query::money(&world), 0);
    assert_eq!(query::tower_view(&world).into_vec().len(), 2);
}

#[test]
fn placing_and_selling_moves_money_by_cost_and_refund() {
    let mut world = corridor_world();
    let events = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Basic,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
        ],
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerPlaced { .. })));
    assert_eq!(query::money(&world), 50);

    let events = drive(&mut world, &[Command::SellLastTower]);
    assert_eq!(query::money(&world), 80);
    assert!(query::tower_view(&world).into_vec().is_empty());
    assert!(matches!(
        events[..],
        [Event::TowerSold {
            kind: TowerKind::Basic,
            refund: 30,
            ..
        }]
    ));
}

#[test]
fn selling_twice_refunds_only_once() {
    let mut world = corridor_world();
    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Sniper,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
            Command::SellLastTower,
        ],
    );
    assert_eq!(query::money(&world), 68);

    let events = drive(&mut world, &[Command::SellLastTower]);
    assert!(events.is_empty());
    assert_eq!(query::money(&world), 68);
}

#[test]
fn sell_with_no_placement_is_silent() {
    let mut world = corridor_world();
    let events = drive(&mut world, &[Command::SellLastTower]);
    assert!(events.is_empty());
    assert_eq!(query::money(&world), 100);
}

#[test]
fn validate_placement_mirrors_the_command_rules() {
    let mut world = corridor_world();
    assert_eq!(
        query::validate_placement(&world, TowerKind::Basic, TileCoord::new(1, 0)),
        Ok(())
    );
    assert_eq!(
        query::validate_placement(&world, TowerKind::Basic, TileCoord::new(1, 1)),
        Err(PlacementError::OnPath)
    );
    assert_eq!(
        query::validate_placement(&world, TowerKind::Basic, TileCoord::new(7, 0)),
        Err(PlacementError::OutOfBounds)
    );

    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Sniper,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
        ],
    );
    assert_eq!(
        query::validate_placement(&world, TowerKind::Basic, TileCoord::new(1, 0)),
        Err(PlacementError::Occupied)
    );
    assert_eq!(
        query::validate_placement(&world, TowerKind::Sniper, TileCoord::new(2, 0)),
        Err(PlacementError::InsufficientFunds)
    );
}

#[test]
fn sniper_projectile_kills_a_wave_one_enemy() {
    let mut world = corridor_world();
    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Sniper,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
            Command::StartWave,
        ],
    );
    let _ = tick_times(&mut world, 1);

    let tower = query::tower_view(&world).into_vec()[0].id;
    let enemy = query::enemy_view(&world).into_vec()[0].id;
    let fired = drive(&mut world, &[Command::FireProjectile { tower, target: enemy }]);
    assert!(matches!(fired[..], [Event::ProjectileFired { .. }]));

    let events = tick_times(&mut world, 6);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileHit { .. })));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyKilled { bounty: 10, .. }
    )));

    // Sniper cost 80 left 20; the kill bounty brings it to 30.
    assert_eq!(query::money(&world), 30);
    assert!(query::enemy_view(&world)
        .into_vec()
        .iter()
        .all(|snapshot| snapshot.id != enemy));
}

#[test]
fn towers_respect_their_cooldown() {
    let mut world = corridor_world();
    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Basic,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
            Command::StartWave,
        ],
    );
    let _ = tick_times(&mut world, 1);

    let tower = query::tower_view(&world).into_vec()[0].id;
    let enemy = query::enemy_view(&world).into_vec()[0].id;

    let first = drive(&mut world, &[Command::FireProjectile { tower, target: enemy }]);
    assert!(matches!(first[..], [Event::ProjectileFired { .. }]));

    // The cooldown has not elapsed, so the request is ignored.
    let early = drive(&mut world, &[Command::FireProjectile { tower, target: enemy }]);
    assert!(early.is_empty());

    // 800ms of ticks expires a basic tower's cooldown.
    let _ = tick_times(&mut world, 16);
    let cooldowns = query::tower_cooldown_view(&world).into_vec();
    assert!(cooldowns[0].ready_in.is_zero());

    let again = drive(&mut world, &[Command::FireProjectile { tower, target: enemy }]);
    assert!(matches!(again[..], [Event::ProjectileFired { .. }]));
}

#[test]
fn fire_requests_for_missing_entities_are_ignored() {
    let mut world = corridor_world();
    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Basic,
            },
            Command::PlaceTower {
                tile: TileCoord::new(1, 0),
            },
        ],
    );
    let tower = query::tower_view(&world).into_vec()[0].id;

    let events = drive(
        &mut world,
        &[Command::FireProjectile {
            tower,
            target: EnemyId::new(99),
        }],
    );
    assert!(events.is_empty());
    assert!(query::projectile_view(&world).into_vec().is_empty());
}

#[test]
fn projectiles_expire_when_their_target_leaks() {
    let mut world = short_leak_world();
    let _ = drive(
        &mut world,
        &[
            Command::SelectTowerKind {
                kind: TowerKind::Basic,
            },
            // Far corner; flight time exceeds the enemy's march to the exit.
            Command::PlaceTower {
                tile: TileCoord::new(19, 0),
            },
            Command::StartWave,
        ],
    );
    let _ = tick_times(&mut world, 1);

    let tower = query::tower_view(&world).into_vec()[0].id;
    let enemy = query::enemy_view(&world).into_vec()[0].id;
    let fired = drive(&mut world, &[Command::FireProjectile { tower, target: enemy }]);
    assert!(matches!(fired[..], [Event::ProjectileFired { .. }]));

    let events = tick_times(&mut world, 40);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyLeaked { .. }
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProjectileExpired { .. }
    )));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ProjectileHit { .. })));
    assert!(query::projectile_view(&world).into_vec().is_empty());
}

#[test]
fn each_leak_costs_exactly_one_life() {
    let mut world = short_leak_world();
    let _ = drive(&mut world, &[Command::StartWave]);

    // 7 spawns at 800ms apart plus the march to the exit.
    let events = tick_times(&mut world, 200);
    let leaks = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyLeaked { .. }))
        .count();
    assert_eq!(leaks, 7);
    assert_eq!(query::lives(&world), 3);
    assert!(!query::is_game_over(&world));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::WaveCleared { wave: 1 })));
    assert_eq!(query::wave_phase(&world), WavePhase::Idle);
}

#[test]
fn start_wave_is_rejected_until_the_field_is_clear() {
    let mut world = short_leak_world();
    let _ = drive(&mut world, &[Command::StartWave]);
    let _ = tick_times(&mut world, 1);

    // Enemies are alive, so another wave may not start.
    let events = drive(&mut world, &[Command::StartWave]);
    assert!(events.is_empty());
    assert_eq!(query::wave(&world), 1);

    let _ = tick_times(&mut world, 200);
    let events = drive(&mut world, &[Command::StartWave]);
    assert!(matches!(events[..], [Event::WaveStarted { wave: 2, .. }]));
}

#[test]
fn exhausting_lives_ends_the_run_until_reset() {
    let mut world = short_leak_world();
    let _ = drive(&mut world, &[Command::StartWave]);
    let _ = tick_times(&mut world, 200);
    assert_eq!(query::lives(&world), 3);

    let _ = drive(&mut world, &[Command::StartWave]);
    let events = tick_times(&mut world, 200);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::GameOver { wave: 2 })));
    assert!(query::is_game_over(&world));
    assert_eq!(query::lives(&world), 0);

    // The run is over; waves and the clock stay frozen.
    let events = drive(&mut world, &[Command::StartWave]);
    assert!(events.is_empty());
    let events = tick_times(&mut world, 4);
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::TimeAdvanced { .. })));

    let _ = drive(&mut world, &[Command::Reset]);
    assert_eq!(query::money(&world), 100);
    assert_eq!(query::lives(&world), 10);
    assert_eq!(query::wave(&world), 0);
    assert!(!query::is_game_over(&world));
    assert!(query::enemy_view(&world).into_vec().is_empty());
    assert!(query::tower_view(&world).into_vec().is_empty());

    let events = drive(&mut world, &[Command::StartWave]);
    assert!(matches!(events[..], [Event::WaveStarted { wave: 1, .. }]));
}

#[test]
fn identical_command_scripts_replay_identically() {
    let script = |world: &mut World| -> Vec<Event> {
        let mut events = drive(
            world,
            &[
                Command::SelectTowerKind {
                    kind: TowerKind::Sniper,
                },
                Command::PlaceTower {
                    tile: TileCoord::new(1, 0),
                },
                Command::StartWave,
            ],
        );
        for _ in 0..120 {
            apply(world, Command::Tick { dt: TICK }, &mut events);
            let towers = query::tower_cooldown_view(world).into_vec();
            let enemies = query::enemy_view(world).into_vec();
            if let (Some(cooldown), Some(enemy)) = (towers.first(), enemies.first()) {
                if cooldown.ready_in.is_zero() {
                    apply(
                        world,
                        Command::FireProjectile {
                            tower: cooldown.tower,
                            target: enemy.id,
                        },
                        &mut events,
                    );
                }
            }
        }
        events
    };

    let mut first = corridor_world();
    let mut second = corridor_world();
    let first_events = script(&mut first);
    let second_events = script(&mut second);

    assert_eq!(first_events, second_events);
    assert_eq!(query::money(&first), query::money(&second));
    assert_eq!(query::lives(&first), query::lives(&second));
    assert_eq!(
        query::enemy_view(&first).into_vec(),
        query::enemy_view(&second).into_vec()
    );
    assert_eq!(
        query::projectile_view(&first).into_vec(),
        query::projectile_view(&second).into_vec()
    );
}
