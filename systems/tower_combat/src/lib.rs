#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat system that turns targeting assignments into fire commands.
//!
//! The system cross-references each [`TowerTarget`] with the tower's cooldown
//! snapshot and emits a [`Command::FireProjectile`] for every tower that is
//! ready to shoot. Cooldown bookkeeping itself stays inside the world; this
//! system only decides who pulls the trigger this frame.

use path_defence_core::{Command, TowerCooldownSnapshot, TowerCooldownView, TowerTarget};

/// Combat system state reused across frames.
#[derive(Debug, Default)]
pub struct TowerCombat {
    cooldowns: Vec<TowerCooldownSnapshot>,
}

impl TowerCombat {
    /// Creates a combat system with empty scratch storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a fire command for every targeted tower whose cooldown expired.
    ///
    /// Commands are appended to `out` in the same order as `targets`, which
    /// the targeting system produces in tower identifier order.
    pub fn handle(
        &mut self,
        cooldowns: TowerCooldownView,
        targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        self.cooldowns.clear();
        self.cooldowns.extend(cooldowns.into_vec());

        for target in targets {
            let ready = self
                .cooldowns
                .binary_search_by_key(&target.tower, |snapshot| snapshot.tower)
                .map(|index| self.cooldowns[index].ready_in.is_zero())
                .unwrap_or(false);
            if !ready {
                continue;
            }

            out.push(Command::FireProjectile {
                tower: target.tower,
                target: target.enemy,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{EnemyId, PixelPoint, TowerId, TowerKind};
    use std::time::Duration;

    fn cooldown(id: u32, ready_in: Duration) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: TowerId::new(id),
            kind: TowerKind::Basic,
            ready_in,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: PixelPoint::new(0.0, 0.0),
            enemy_position: PixelPoint::new(10.0, 0.0),
        }
    }

    #[test]
    fn ready_towers_fire_at_their_targets() {
        let cooldowns =
            TowerCooldownView::from_snapshots(vec![cooldown(0, Duration::ZERO)]);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(cooldowns, &[target(0, 4)], &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(4),
            }]
        );
    }

    #[test]
    fn cooling_towers_hold_their_fire() {
        let cooldowns =
            TowerCooldownView::from_snapshots(vec![cooldown(0, Duration::from_millis(200))]);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(cooldowns, &[target(0, 4)], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn targets_without_cooldown_entries_are_skipped() {
        let cooldowns = TowerCooldownView::from_snapshots(Vec::new());
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(cooldowns, &[target(3, 1)], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn mixed_readiness_fires_only_the_expired_towers() {
        let cooldowns = TowerCooldownView::from_snapshots(vec![
            cooldown(2, Duration::from_millis(500)),
            cooldown(0, Duration::ZERO),
            cooldown(1, Duration::ZERO),
        ]);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(
            cooldowns,
            &[target(0, 7), target(1, 8), target(2, 9)],
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(0),
                    target: EnemyId::new(7),
                },
                Command::FireProjectile {
                    tower: TowerId::new(1),
                    target: EnemyId::new(8),
                },
            ]
        );
    }
}
