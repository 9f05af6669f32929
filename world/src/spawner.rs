//! Wave spawner state machine.

use std::time::Duration;

use path_defence_core::WavePhase;

/// Delay between two consecutive enemy releases within a wave.
pub(crate) const SPAWN_INTERVAL: Duration = Duration::from_millis(800);

/// Timed release of enemies for the active wave.
///
/// The machine moves `Idle -> Spawning -> Draining -> Idle`; the world drives
/// it once per tick and asks it to finish once the active enemy set empties.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WaveSpawner {
    state: SpawnerState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpawnerState {
    Idle,
    Spawning { remaining: u32, timer: Duration },
    Draining,
}

impl WaveSpawner {
    /// Creates a spawner with no active wave.
    pub(crate) const fn new() -> Self {
        Self {
            state: SpawnerState::Idle,
        }
    }

    /// Reports the externally visible phase of the spawner.
    pub(crate) const fn phase(&self) -> WavePhase {
        match self.state {
            SpawnerState::Idle => WavePhase::Idle,
            SpawnerState::Spawning { .. } => WavePhase::Spawning,
            SpawnerState::Draining => WavePhase::Draining,
        }
    }

    /// Reports whether a new wave may begin.
    pub(crate) fn can_start(&self) -> bool {
        self.state == SpawnerState::Idle
    }

    /// Queues the provided number of enemies for release.
    ///
    /// The timer starts expired so the first enemy appears on the next tick.
    pub(crate) fn begin_wave(&mut self, enemies_queued: u32) {
        self.state = SpawnerState::Spawning {
            remaining: enemies_queued,
            timer: Duration::ZERO,
        };
    }

    /// Advances the spawn timer and reports whether an enemy should spawn.
    ///
    /// At most one enemy is released per tick; the clamped tick delta is
    /// always shorter than [`SPAWN_INTERVAL`], so no release is ever skipped.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        let SpawnerState::Spawning { remaining, timer } = &mut self.state else {
            return false;
        };

        *timer = timer.saturating_sub(dt);
        if !timer.is_zero() || *remaining == 0 {
            return false;
        }

        *remaining -= 1;
        *timer = SPAWN_INTERVAL;
        if *remaining == 0 {
            self.state = SpawnerState::Draining;
        }
        true
    }

    /// Returns the spawner to idle once the wave has fully resolved.
    ///
    /// Reports `true` exactly when the transition happens, so the caller can
    /// announce the cleared wave once.
    pub(crate) fn try_finish(&mut self, enemies_alive: bool) -> bool {
        if enemies_alive || self.state != SpawnerState::Draining {
            return false;
        }

        self.state = SpawnerState::Idle;
        true
    }

    /// Abandons any wave in progress.
    pub(crate) fn reset(&mut self) {
        self.state = SpawnerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    #[test]
    fn first_enemy_spawns_on_the_first_tick() {
        let mut spawner = WaveSpawner::new();
        spawner.begin_wave(3);

        assert!(spawner.advance(TICK));
        assert_eq!(spawner.phase(), WavePhase::Spawning);
    }

    #[test]
    fn subsequent_spawns_respect_the_interval() {
        let mut spawner = WaveSpawner::new();
        spawner.begin_wave(2);
        assert!(spawner.advance(TICK));

        let ticks_per_interval = SPAWN_INTERVAL.as_millis() / TICK.as_millis();
        let mut spawned = 0;
        for _ in 0..ticks_per_interval {
            if spawner.advance(TICK) {
                spawned += 1;
            }
        }
        assert_eq!(spawned, 1, "expected exactly one spawn per interval");
    }

    #[test]
    fn drains_after_final_spawn_and_finishes_when_clear() {
        let mut spawner = WaveSpawner::new();
        spawner.begin_wave(1);
        assert!(spawner.advance(TICK));
        assert_eq!(spawner.phase(), WavePhase::Draining);

        assert!(!spawner.try_finish(true), "live enemies block completion");
        assert!(spawner.try_finish(false));
        assert_eq!(spawner.phase(), WavePhase::Idle);
        assert!(!spawner.try_finish(false), "completion reports only once");
    }

    #[test]
    fn idle_spawner_never_spawns() {
        let mut spawner = WaveSpawner::new();
        assert!(!spawner.advance(Duration::from_secs(10)));
        assert!(spawner.can_start());
    }
}
