#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure targeting system that pairs each tower with its nearest enemy.
//!
//! The system never mutates world state. It reads immutable tower and enemy
//! views, picks at most one enemy per tower, and appends the resulting
//! [`TowerTarget`] assignments for the combat system to act on.

use path_defence_core::{EnemyId, EnemySnapshot, EnemyView, PixelPoint, TowerTarget, TowerView};

/// Candidate enemy considered while scanning a single tower's range.
#[derive(Clone, Copy, Debug)]
struct BestCandidate {
    enemy: EnemyId,
    position: PixelPoint,
    distance_squared: f32,
}

impl BestCandidate {
    fn from_snapshot(snapshot: &EnemySnapshot, tower_position: PixelPoint) -> Self {
        let dx = snapshot.position.x() - tower_position.x();
        let dy = snapshot.position.y() - tower_position.y();
        Self {
            enemy: snapshot.id,
            position: snapshot.position,
            distance_squared: dx * dx + dy * dy,
        }
    }

    /// Deterministic ordering: closer wins, and on an exact distance tie the
    /// enemy with the smaller identifier wins.
    fn precedes(&self, other: &BestCandidate) -> bool {
        if self.distance_squared != other.distance_squared {
            return self.distance_squared < other.distance_squared;
        }
        self.enemy < other.enemy
    }
}

/// Targeting system state reused across frames.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    scratch: Vec<TowerTarget>,
}

impl TowerTargeting {
    /// Creates a targeting system with empty scratch storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a target assignment for every tower with an enemy in range.
    ///
    /// Assignments are appended to `out` in tower identifier order. Towers
    /// with no enemy inside their range contribute nothing.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        self.scratch.clear();

        for tower in towers.iter() {
            let range = tower.kind.range();
            let range_squared = range * range;
            let mut best: Option<BestCandidate> = None;

            for enemy in enemies.iter() {
                let candidate = BestCandidate::from_snapshot(enemy, tower.position);
                if candidate.distance_squared > range_squared {
                    continue;
                }
                let replace = match &best {
                    Some(current) => candidate.precedes(current),
                    None => true,
                };
                if replace {
                    best = Some(candidate);
                }
            }

            if let Some(candidate) = best {
                self.scratch.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.enemy,
                    tower_position: tower.position,
                    enemy_position: candidate.position,
                });
            }
        }

        out.extend(self.scratch.drain(..));
    }
}
