//! Respawn scheduling against the simulation clock.

use std::time::Duration;

use arena_core::{EntityId, Generation};

/// Respawn waiting for its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingRespawn {
    pub(crate) entity: EntityId,
    pub(crate) generation: Generation,
    pub(crate) due: Duration,
}

/// Fire-and-forget respawn timers owned by the world.
#[derive(Debug, Default)]
pub(crate) struct RespawnSchedule {
    pending: Vec<PendingRespawn>,
}

impl RespawnSchedule {
    pub(crate) fn schedule(&mut self, entity: EntityId, generation: Generation, due: Duration) {
        self.pending.push(PendingRespawn {
            entity,
            generation,
            due,
        });
    }

    /// Removes and returns every respawn due at or before `now`, earliest first.
    pub(crate) fn drain_due(&mut self, now: Duration) -> Vec<PendingRespawn> {
        let mut due: Vec<PendingRespawn> = Vec::new();
        self.pending.retain(|pending| {
            if pending.due <= now {
                due.push(*pending);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|pending| (pending.due, pending.entity));
        due
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
