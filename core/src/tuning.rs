//! Gameplay tuning tables.
//!
//! Every knob has a default matching the shipped design constants. Tables
//! deserialize with `#[serde(default)]`, so configuration files only need to
//! name the values they override.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AbilityKind;

/// Aggregated tuning knobs for a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Basic weapon shared by every combatant.
    pub weapon: WeaponTuning,
    /// Per-ability cooldowns and effect magnitudes.
    pub abilities: AbilityTuning,
    /// Physical stats applied to freshly created entities.
    pub entity: EntityTuning,
    /// Decision driver behaviour.
    pub drivers: DriverTuning,
    /// Safe spawn selection.
    pub spawn: SpawnTuning,
    /// Death-to-respawn sequencing.
    pub respawn: RespawnTuning,
    /// Kill feed presentation.
    pub feed: FeedTuning,
}

impl Tuning {
    /// Checks that every knob lies in a range the simulation can honour.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.weapon.fire_interval_ms == 0 {
            return Err(TuningError::Zero {
                field: "weapon.fire_interval_ms",
            });
        }
        require_positive("weapon.projectile_speed", self.weapon.projectile_speed)?;
        require_nonzero("weapon.damage", self.weapon.damage)?;
        require_non_negative("abilities.dash.distance", self.abilities.dash.distance)?;
        require_non_negative("abilities.blast.radius", self.abilities.blast.radius)?;
        require_positive("entity.radius", self.entity.radius)?;
        require_positive("entity.speed", self.entity.speed)?;
        require_nonzero("entity.max_health", self.entity.max_health)?;
        require_non_negative("drivers.dead_zone", self.drivers.dead_zone)?;
        require_non_negative(
            "drivers.autonomous_speed_factor",
            self.drivers.autonomous_speed_factor,
        )?;
        require_probability(
            "drivers.human_ability_chance",
            self.drivers.human_ability_chance,
        )?;
        require_probability(
            "drivers.autonomous_ability_chance",
            self.drivers.autonomous_ability_chance,
        )?;
        require_non_negative("spawn.min_separation", self.spawn.min_separation)?;
        if self.spawn.max_attempts == 0 {
            return Err(TuningError::NoSpawnAttempts);
        }
        Ok(())
    }
}

/// Reasons a tuning table is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// A value that must be strictly positive was zero, negative, or not finite.
    #[error("{field} must be a positive finite number (received {value})")]
    NotPositive {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A value that must not be negative was negative or not finite.
    #[error("{field} must be a non-negative finite number (received {value})")]
    Negative {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// An integer knob that must be non-zero was zero.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Dotted path of the offending knob.
        field: &'static str,
    },
    /// A per-tick probability fell outside `0.0..=1.0`.
    #[error("{field} must lie within 0.0..=1.0 (received {value})")]
    ProbabilityOutOfRange {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// Spawn selection needs at least one sampling attempt.
    #[error("spawn.max_attempts must allow at least one attempt")]
    NoSpawnAttempts,
}

fn require_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

fn require_nonzero(field: &'static str, value: u32) -> Result<(), TuningError> {
    if value == 0 {
        Err(TuningError::Zero { field })
    } else {
        Ok(())
    }
}

fn require_probability(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::ProbabilityOutOfRange { field, value })
    }
}

/// Basic weapon parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Minimum simulated time between two shots of the same entity.
    pub fire_interval_ms: u64,
    /// Projectile travel per tick in world units.
    pub projectile_speed: f32,
    /// Health removed by a single hit.
    pub damage: u32,
}

impl WeaponTuning {
    /// Fire interval as a [`Duration`].
    #[must_use]
    pub const fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            fire_interval_ms: 350,
            projectile_speed: 7.0,
            damage: 30,
        }
    }
}

/// Cooldowns and magnitudes for every ability kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    /// Instant displacement toward the aim point.
    pub dash: DashTuning,
    /// Temporary damage immunity.
    pub shield: ShieldTuning,
    /// Instant area damage around the caster.
    pub blast: BlastTuning,
}

impl AbilityTuning {
    /// Resolves the concrete ability granted to an entity of the given kind.
    #[must_use]
    pub fn resolve(&self, kind: AbilityKind) -> Ability {
        match kind {
            AbilityKind::Dash => Ability {
                kind,
                cooldown: Duration::from_millis(self.dash.cooldown_ms),
                effect: AbilityEffect::Dash {
                    distance: self.dash.distance,
                },
            },
            AbilityKind::Shield => Ability {
                kind,
                cooldown: Duration::from_millis(self.shield.cooldown_ms),
                effect: AbilityEffect::Shield {
                    ticks: self.shield.duration_ticks,
                },
            },
            AbilityKind::Blast => Ability {
                kind,
                cooldown: Duration::from_millis(self.blast.cooldown_ms),
                effect: AbilityEffect::Blast {
                    radius: self.blast.radius,
                    damage: self.blast.damage,
                },
            },
        }
    }
}

/// Dash parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    /// Cooldown between two dashes.
    pub cooldown_ms: u64,
    /// Displacement applied by a dash in world units.
    pub distance: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 3_000,
            distance: 120.0,
        }
    }
}

/// Shield parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    /// Cooldown between two shields.
    pub cooldown_ms: u64,
    /// Number of ticks the shield absorbs all damage.
    pub duration_ticks: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 5_000,
            duration_ticks: 120,
        }
    }
}

/// Blast parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastTuning {
    /// Cooldown between two blasts.
    pub cooldown_ms: u64,
    /// Radius around the caster that receives damage.
    pub radius: f32,
    /// Health removed from every entity caught in the blast.
    pub damage: u32,
}

impl Default for BlastTuning {
    fn default() -> Self {
        Self {
            cooldown_ms: 4_000,
            radius: 120.0,
            damage: 40,
        }
    }
}

/// Ability resolved for a specific entity at creation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ability {
    /// Kind the ability was resolved from.
    pub kind: AbilityKind,
    /// Minimum simulated time between two activations.
    pub cooldown: Duration,
    /// Effect applied on activation.
    pub effect: AbilityEffect,
}

/// Effect payload carried by each ability kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilityEffect {
    /// Moves the caster toward the aim point.
    Dash {
        /// Displacement length in world units.
        distance: f32,
    },
    /// Grants damage immunity for a number of ticks.
    Shield {
        /// Immunity duration in ticks.
        ticks: u32,
    },
    /// Damages every other entity near the caster.
    Blast {
        /// Effect radius in world units.
        radius: f32,
        /// Damage dealt to each entity in range.
        damage: u32,
    },
}

/// Physical stats applied to every entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTuning {
    /// Collision radius in world units.
    pub radius: f32,
    /// Health restored on spawn and respawn.
    pub max_health: u32,
    /// Movement per tick at full speed.
    pub speed: f32,
}

impl Default for EntityTuning {
    fn default() -> Self {
        Self {
            radius: 16.0,
            max_health: 100,
            speed: 4.0,
        }
    }
}

/// Decision driver parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverTuning {
    /// Distance to the pointer under which the human entity stops moving.
    pub dead_zone: f32,
    /// Fraction of entity speed used by autonomous pursuit.
    pub autonomous_speed_factor: f32,
    /// Per-tick chance that the human entity attempts its ability.
    pub human_ability_chance: f32,
    /// Per-tick chance that an autonomous entity attempts its ability.
    pub autonomous_ability_chance: f32,
}

impl Default for DriverTuning {
    fn default() -> Self {
        Self {
            dead_zone: 20.0,
            autonomous_speed_factor: 0.6,
            human_ability_chance: 0.01,
            autonomous_ability_chance: 0.005,
        }
    }
}

/// Safe spawn selection parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Minimum distance kept from every alive entity.
    pub min_separation: f32,
    /// Sampling attempts before accepting the last candidate.
    pub max_attempts: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_separation: 200.0,
            max_attempts: 50,
        }
    }
}

/// Death-to-respawn sequencing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnTuning {
    /// Simulated time between a kill and the victim's respawn.
    pub delay_ms: u64,
    /// Ticks of damage immunity granted after spawning.
    pub invulnerability_ticks: u32,
}

impl RespawnTuning {
    /// Respawn delay as a [`Duration`].
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RespawnTuning {
    fn default() -> Self {
        Self {
            delay_ms: 2_000,
            invulnerability_ticks: 90,
        }
    }
}

/// Kill feed parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedTuning {
    /// How long a kill feed entry stays visible.
    pub entry_lifetime_ms: u64,
}

impl FeedTuning {
    /// Entry lifetime as a [`Duration`].
    #[must_use]
    pub const fn entry_lifetime(&self) -> Duration {
        Duration::from_millis(self.entry_lifetime_ms)
    }
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            entry_lifetime_ms: 3_500,
        }
    }
}
