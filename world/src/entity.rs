//! Authoritative combatant state and its lifecycle transitions.

use std::time::Duration;

use arena_core::{
    Ability, EntityId, EntityProfile, EntitySnapshot, Generation, LifeStatus, Point, Tuning,
};

/// Mutable state of a single combatant.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) profile: EntityProfile,
    pub(crate) position: Point,
    pub(crate) radius: f32,
    pub(crate) speed: f32,
    pub(crate) max_health: u32,
    pub(crate) health: u32,
    pub(crate) status: LifeStatus,
    pub(crate) invulnerable_ticks: u32,
    pub(crate) shield_ticks: u32,
    pub(crate) ability: Ability,
    pub(crate) last_ability: Option<Duration>,
    pub(crate) last_fire: Option<Duration>,
    pub(crate) kills: u32,
    pub(crate) generation: Generation,
}

/// Result of routing damage into an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The entity was dead or immune; nothing changed.
    Ignored,
    /// Health dropped but stayed above zero.
    Wounded {
        /// Health left after the hit.
        remaining: u32,
    },
    /// Health reached zero and the entity died.
    Killed {
        /// Generation the entity entered on death.
        generation: Generation,
    },
}

impl Entity {
    /// Creates a freshly spawned, protected entity.
    pub(crate) fn spawn(
        id: EntityId,
        profile: EntityProfile,
        position: Point,
        tuning: &Tuning,
    ) -> Self {
        let ability = tuning.abilities.resolve(profile.ability);
        Self {
            id,
            profile,
            position,
            radius: tuning.entity.radius,
            speed: tuning.entity.speed,
            max_health: tuning.entity.max_health,
            health: tuning.entity.max_health,
            status: LifeStatus::Alive,
            invulnerable_ticks: tuning.respawn.invulnerability_ticks,
            shield_ticks: 0,
            ability,
            last_ability: None,
            last_fire: None,
            kills: 0,
            generation: Generation::default(),
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.status == LifeStatus::Alive
    }

    /// Spawn protection and shields both block all incoming damage.
    pub(crate) fn is_immune(&self) -> bool {
        self.invulnerable_ticks > 0 || self.shield_ticks > 0
    }

    /// Removes health, flipping the entity to dead when it reaches zero.
    pub(crate) fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.is_alive() || self.is_immune() || amount == 0 {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            return DamageOutcome::Wounded {
                remaining: self.health,
            };
        }

        self.status = LifeStatus::Dead;
        self.shield_ticks = 0;
        self.invulnerable_ticks = 0;
        self.generation = self.generation.next();
        DamageOutcome::Killed {
            generation: self.generation,
        }
    }

    /// Brings a dead entity back at `position` with full health.
    pub(crate) fn respawn(&mut self, position: Point, invulnerability_ticks: u32) {
        self.position = position;
        self.health = self.max_health;
        self.status = LifeStatus::Alive;
        self.invulnerable_ticks = invulnerability_ticks;
        self.shield_ticks = 0;
        self.generation = self.generation.next();
    }

    /// Counts down the per-tick status timers.
    pub(crate) fn tick_status(&mut self) {
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
    }

    /// Records a shot at `now` unless the weapon is still cycling.
    pub(crate) fn try_fire(&mut self, now: Duration, interval: Duration) -> bool {
        if !cooldown_elapsed(self.last_fire, now, interval) {
            return false;
        }
        self.last_fire = Some(now);
        true
    }

    pub(crate) fn ability_ready(&self, now: Duration) -> bool {
        cooldown_elapsed(self.last_ability, now, self.ability.cooldown)
    }

    /// Starts the ability cooldown at `now`.
    pub(crate) fn activate_ability(&mut self, now: Duration) {
        self.last_ability = Some(now);
    }

    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            name: self.profile.name.clone(),
            color: self.profile.color,
            controller: self.profile.controller,
            ability: self.ability.kind,
            position: self.position,
            radius: self.radius,
            speed: self.speed,
            health: self.health,
            max_health: self.max_health,
            status: self.status,
            invulnerable_ticks: self.invulnerable_ticks,
            shield_ticks: self.shield_ticks,
            kills: self.kills,
            generation: self.generation,
        }
    }
}

fn cooldown_elapsed(last: Option<Duration>, now: Duration, cooldown: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now.saturating_sub(last) >= cooldown,
    }
}
