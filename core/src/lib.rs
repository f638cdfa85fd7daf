#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arena Skirmish engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots such as [`EntityView`], and respond exclusively
//! with new command batches.

pub mod geometry;
pub mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use geometry::{ArenaBounds, Point, Rect, Vector};
pub use tuning::{Ability, AbilityEffect, Tuning, TuningError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Arena Skirmish.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs the arena extent and its static obstacle layout.
    ConfigureArena {
        /// Playable extent of the arena.
        bounds: ArenaBounds,
        /// Obstacles that stay fixed for the rest of the match.
        obstacles: Vec<Rect>,
    },
    /// Updates the arena extent after the viewport changed size.
    ResizeArena {
        /// New playable extent.
        bounds: ArenaBounds,
    },
    /// Creates a new combatant at the provided position.
    SpawnEntity {
        /// Identity, appearance, and controller of the combatant.
        profile: EntityProfile,
        /// Position the combatant enters the arena at.
        position: Point,
    },
    /// Requests that an entity move by the provided displacement.
    MoveEntity {
        /// Entity attempting to move.
        entity: EntityId,
        /// Desired displacement for this tick.
        displacement: Vector,
    },
    /// Requests that an entity fire its weapon toward a point.
    Fire {
        /// Entity pulling the trigger.
        entity: EntityId,
        /// Point the projectile is aimed at.
        target: Point,
    },
    /// Requests that an entity activate its ability toward a point.
    UseAbility {
        /// Entity activating the ability.
        entity: EntityId,
        /// Point the ability is aimed at.
        target: Point,
    },
    /// Advances the simulation by a single tick.
    Tick {
        /// Simulated time covered by the tick.
        dt: Duration,
    },
    /// Brings a dead entity back at the provided position.
    RespawnEntity {
        /// Entity to revive.
        entity: EntityId,
        /// Generation captured when the respawn was scheduled.
        generation: Generation,
        /// Safe position selected for the entity.
        position: Point,
    },
    /// Removes every entity, projectile, and pending respawn.
    ResetMatch,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms the arena layout was installed.
    ArenaConfigured {
        /// Playable extent of the arena.
        bounds: ArenaBounds,
        /// Number of obstacles installed.
        obstacle_count: usize,
    },
    /// Confirms the arena extent changed.
    ArenaResized {
        /// New playable extent.
        bounds: ArenaBounds,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a combatant entered the arena.
    EntitySpawned {
        /// Identifier allocated to the combatant.
        entity: EntityId,
        /// Position the combatant occupies.
        position: Point,
    },
    /// Confirms that a projectile left an entity's weapon.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Entity credited with the shot.
        owner: EntityId,
    },
    /// Reports that a projectile was removed from play.
    ProjectileDestroyed {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Confirms that an entity activated its ability.
    AbilityUsed {
        /// Entity that activated the ability.
        entity: EntityId,
        /// Kind of ability that fired.
        ability: AbilityKind,
    },
    /// Reports that an entity lost health.
    EntityDamaged {
        /// Entity that took damage.
        entity: EntityId,
        /// Entity credited with the damage.
        attacker: EntityId,
        /// Health removed by the hit.
        amount: u32,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an entity's health reached zero.
    EntityKilled {
        /// Entity that died.
        victim: EntityId,
        /// Entity credited with the kill.
        killer: EntityId,
    },
    /// Announces that a dead entity's respawn delay elapsed.
    RespawnDue {
        /// Entity awaiting a respawn position.
        entity: EntityId,
        /// Generation captured when the respawn was scheduled.
        generation: Generation,
    },
    /// Confirms that a dead entity returned to play.
    EntityRespawned {
        /// Entity that came back.
        entity: EntityId,
        /// Position the entity respawned at.
        position: Point,
    },
    /// Confirms that the match state was cleared.
    MatchReset,
}

/// Unique identifier assigned to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Counter bumped on every death and respawn of an entity.
///
/// Deferred work carries the generation it was created for and is discarded
/// when the entity has moved on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u32);

impl Generation {
    /// Creates a generation with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the generation.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Who decides what an entity does each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    /// Steered by the pointer of the local player.
    Human,
    /// Steered by the autonomous pursuit driver.
    Autonomous,
}

/// Special action granted to an entity at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Instant displacement toward the aim point.
    Dash,
    /// Temporary damage immunity.
    Shield,
    /// Instant area damage around the caster.
    Blast,
}

/// Whether an entity currently takes part in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifeStatus {
    /// Present in the arena and targetable.
    Alive,
    /// Waiting for its respawn.
    Dead,
}

/// Visual appearance applied to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl EntityColor {
    /// Creates a new entity color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Fixed identity of a combatant, chosen before it enters the arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityProfile {
    /// Display name used by the kill feed.
    pub name: String,
    /// Appearance used by renderers.
    pub color: EntityColor,
    /// Driver responsible for the entity.
    pub controller: ControllerKind,
    /// Ability granted for the whole match.
    pub ability: AbilityKind,
}

impl EntityProfile {
    /// Creates a profile from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        color: EntityColor,
        controller: ControllerKind,
        ability: AbilityKind,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            controller,
            ability,
        }
    }
}

/// Immutable representation of a single entity used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Display name of the entity.
    pub name: String,
    /// Appearance assigned to the entity.
    pub color: EntityColor,
    /// Driver responsible for the entity.
    pub controller: ControllerKind,
    /// Ability granted to the entity.
    pub ability: AbilityKind,
    /// Current position.
    pub position: Point,
    /// Collision radius.
    pub radius: f32,
    /// Movement per tick at full speed.
    pub speed: f32,
    /// Current health.
    pub health: u32,
    /// Health restored on respawn.
    pub max_health: u32,
    /// Lifecycle status.
    pub status: LifeStatus,
    /// Ticks of spawn protection left.
    pub invulnerable_ticks: u32,
    /// Ticks of shield left.
    pub shield_ticks: u32,
    /// Kills credited to the entity.
    pub kills: u32,
    /// Current lifecycle generation.
    pub generation: Generation,
}

impl EntitySnapshot {
    /// Reports whether the entity is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == LifeStatus::Alive
    }

    /// Reports whether spawn protection is active.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Reports whether a shield is active.
    #[must_use]
    pub fn is_shielded(&self) -> bool {
        self.shield_ticks > 0
    }

    /// Remaining health as a fraction of maximum health.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only snapshot describing every entity in the arena.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the alive entities in deterministic order.
    pub fn alive(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.is_alive())
    }

    /// Looks up a single entity by identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of entities captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Entity credited with the shot.
    pub owner: EntityId,
    /// Current position.
    pub position: Point,
    /// Displacement applied every tick.
    pub velocity: Vector,
}

/// Read-only snapshot describing every live projectile.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn obstacle_layout_round_trips_through_bincode() {
        let layout = vec![
            Rect::new(300.0, 200.0, 220.0, 20.0),
            Rect::new(600.0, 200.0, 20.0, 260.0),
        ];
        assert_round_trip(&layout);
    }

    #[test]
    fn entity_profile_round_trips_through_bincode() {
        let profile = EntityProfile::new(
            "AI-2",
            EntityColor::from_rgb(0xff, 0xd4, 0x52),
            ControllerKind::Autonomous,
            AbilityKind::Blast,
        );
        assert_round_trip(&profile);
    }

    #[test]
    fn entity_view_lookup_uses_sorted_ids() {
        let view = EntityView::from_snapshots(vec![snapshot(7), snapshot(2), snapshot(4)]);
        let ids: Vec<u32> = view.iter().map(|entity| entity.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 7]);
        assert_eq!(view.get(EntityId::new(4)).map(|e| e.id), Some(EntityId::new(4)));
        assert!(view.get(EntityId::new(5)).is_none());
    }

    #[test]
    fn health_ratio_handles_zero_max_health() {
        let mut entity = snapshot(1);
        entity.max_health = 0;
        assert_eq!(entity.health_ratio(), 0.0);
    }

    #[test]
    fn generation_wraps_instead_of_overflowing() {
        assert_eq!(Generation::new(u32::MAX).next(), Generation::new(0));
    }

    fn snapshot(id: u32) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            name: format!("AI-{id}"),
            color: EntityColor::from_rgb(0, 0, 0),
            controller: ControllerKind::Autonomous,
            ability: AbilityKind::Dash,
            position: Point::ORIGIN,
            radius: 16.0,
            speed: 4.0,
            health: 50,
            max_health: 100,
            status: LifeStatus::Alive,
            invulnerable_ticks: 0,
            shield_ticks: 0,
            kills: 0,
            generation: Generation::default(),
        }
    }
}
