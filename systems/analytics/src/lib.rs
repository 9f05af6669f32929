#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure analytics system that summarises each wave from the event stream.
//!
//! The system folds world events into a running [`WaveReport`] and publishes
//! the finished report when the wave clears or the run ends. It never queries
//! world state beyond the lives total it is seeded with, so replaying the
//! same event stream always yields the same reports.

use path_defence_core::{Event, WaveReport};

/// Wave statistics accumulator driven by the world's event stream.
#[derive(Debug)]
pub struct Analytics {
    current: WaveReport,
    lives: i32,
    wave_active: bool,
    last_published: Option<WaveReport>,
}

impl Analytics {
    /// Creates an analytics system seeded with the run's starting lives.
    #[must_use]
    pub fn new(starting_lives: i32) -> Self {
        Self {
            current: WaveReport::default(),
            lives: starting_lives,
            wave_active: false,
            last_published: None,
        }
    }

    /// Most recently published wave report, if any wave has finished.
    #[must_use]
    pub fn last_report(&self) -> Option<WaveReport> {
        self.last_published
    }

    /// Folds a batch of events into the running report.
    ///
    /// When a wave finishes, a [`Event::WaveReportPublished`] is appended to
    /// `out_events` carrying the completed statistics.
    pub fn handle(&mut self, events: &[Event], out_events: &mut Vec<Event>) {
        for event in events {
            match event {
                Event::WaveStarted { wave, .. } => {
                    self.current = WaveReport {
                        wave: *wave,
                        lives_remaining: self.lives,
                        ..WaveReport::default()
                    };
                    self.wave_active = true;
                }
                Event::EnemySpawned { .. } => {
                    if self.wave_active {
                        self.current.spawned += 1;
                    }
                }
                Event::EnemyKilled { bounty, .. } => {
                    if self.wave_active {
                        self.current.killed += 1;
                        self.current.bounty_earned += bounty;
                    }
                }
                Event::EnemyLeaked { lives_remaining, .. } => {
                    self.lives = *lives_remaining;
                    if self.wave_active {
                        self.current.leaked += 1;
                        self.current.lives_remaining = *lives_remaining;
                    }
                }
                Event::WaveCleared { .. } | Event::GameOver { .. } => {
                    if self.wave_active {
                        self.wave_active = false;
                        self.current.lives_remaining = self.lives;
                        self.last_published = Some(self.current);
                        out_events.push(Event::WaveReportPublished {
                            report: self.current,
                        });
                    }
                }
                _ => {}
            }
        }
    }
}
