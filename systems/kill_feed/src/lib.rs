#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Transient kill feed announcing eliminations to the presentation layer.

use std::{collections::VecDeque, fmt, time::Duration};

use arena_core::{tuning::FeedTuning, EntityId, EntityView, Event};

/// Single "killer eliminated victim" announcement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    killer: String,
    victim: String,
    remaining: Duration,
}

impl FeedEntry {
    /// Display name of the entity credited with the kill.
    #[must_use]
    pub fn killer(&self) -> &str {
        &self.killer
    }

    /// Display name of the eliminated entity.
    #[must_use]
    pub fn victim(&self) -> &str {
        &self.victim
    }

    /// Simulated time left before the entry disappears.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

impl fmt::Display for FeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} eliminated {}", self.killer, self.victim)
    }
}

/// Pure system that keeps the list of recent eliminations, oldest first.
#[derive(Debug)]
pub struct KillFeed {
    lifetime: Duration,
    entries: VecDeque<FeedEntry>,
}

impl KillFeed {
    /// Creates an empty feed whose entries live for the tuned duration.
    #[must_use]
    pub fn new(tuning: &FeedTuning) -> Self {
        Self {
            lifetime: tuning.entry_lifetime(),
            entries: VecDeque::new(),
        }
    }

    /// Ages entries on `TimeAdvanced` and records every `EntityKilled`.
    ///
    /// Events are consumed in order, so a kill reported after the tick's
    /// `TimeAdvanced` keeps its full lifetime.
    pub fn handle(&mut self, events: &[Event], entities: &EntityView) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.age(*dt),
                Event::EntityKilled { victim, killer } => {
                    self.entries.push_back(FeedEntry {
                        killer: display_name(entities, *killer),
                        victim: display_name(entities, *victim),
                        remaining: self.lifetime,
                    });
                }
                Event::MatchReset => self.entries.clear(),
                _ => {}
            }
        }
    }

    fn age(&mut self, dt: Duration) {
        for entry in &mut self.entries {
            entry.remaining = entry.remaining.saturating_sub(dt);
        }
        self.entries.retain(|entry| !entry.remaining.is_zero());
    }

    /// Iterator over the visible entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    /// Renders every visible entry as a display line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Reports whether nothing is currently announced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn display_name(entities: &EntityView, entity: EntityId) -> String {
    entities
        .get(entity)
        .map_or_else(|| format!("#{}", entity.get()), |snapshot| snapshot.name.clone())
}
