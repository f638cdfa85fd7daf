#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision drivers that turn pointer input and world snapshots into intents.
//!
//! Both drivers are pure functions of the entity snapshot, the external input
//! and an injected random source. The [`Decision`] system owns the seeded RNG
//! and translates intents into world commands once per frame.

use arena_core::{
    tuning::DriverTuning, Command, ControllerKind, EntitySnapshot, EntityView, Point, Vector,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// What an entity wants to do during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intent {
    /// Displacement requested for this tick; zero when the entity holds still.
    pub movement: Vector,
    /// Point the weapon and ability are aimed at.
    pub aim: Point,
    /// Whether the entity tries its ability this tick.
    pub use_ability: bool,
}

/// Pointer-steered driver.
///
/// Without a pointer there is no intent. Inside the dead zone the entity holds
/// still but keeps firing at the pointer.
pub fn decide_human<R: Rng>(
    entity: &EntitySnapshot,
    pointer: Option<Point>,
    tuning: &DriverTuning,
    rng: &mut R,
) -> Option<Intent> {
    if !entity.is_alive() {
        return None;
    }
    let pointer = pointer?;

    let movement = if entity.position.distance(pointer) > tuning.dead_zone {
        entity
            .position
            .direction_to(pointer)
            .map_or(Vector::ZERO, |direction| direction.scaled(entity.speed))
    } else {
        Vector::ZERO
    };

    Some(Intent {
        movement,
        aim: pointer,
        use_ability: roll(rng, tuning.human_ability_chance),
    })
}

/// Pursuit driver that picks a fresh random opponent every tick.
///
/// Returns `None` when no other entity is alive, or when the chosen opponent
/// occupies exactly the same point so no direction exists.
pub fn decide_autonomous<R: Rng>(
    entity: &EntitySnapshot,
    entities: &EntityView,
    tuning: &DriverTuning,
    rng: &mut R,
) -> Option<Intent> {
    if !entity.is_alive() {
        return None;
    }

    let opponents: Vec<&EntitySnapshot> = entities
        .alive()
        .filter(|candidate| candidate.id != entity.id)
        .collect();
    if opponents.is_empty() {
        return None;
    }
    let target = opponents[rng.gen_range(0..opponents.len())];
    let use_ability = roll(rng, tuning.autonomous_ability_chance);

    let direction = entity.position.direction_to(target.position)?;
    Some(Intent {
        movement: direction.scaled(entity.speed * tuning.autonomous_speed_factor),
        aim: target.position,
        use_ability,
    })
}

/// Dispatches to the driver matching the entity's controller.
pub fn decide<R: Rng>(
    entity: &EntitySnapshot,
    entities: &EntityView,
    pointer: Option<Point>,
    tuning: &DriverTuning,
    rng: &mut R,
) -> Option<Intent> {
    match entity.controller {
        ControllerKind::Human => decide_human(entity, pointer, tuning, rng),
        ControllerKind::Autonomous => decide_autonomous(entity, entities, tuning, rng),
    }
}

fn roll<R: Rng>(rng: &mut R, chance: f32) -> bool {
    rng.gen::<f32>() < chance
}

/// Configuration parameters required to construct the decision system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    drivers: DriverTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the driver tuning and an RNG seed.
    #[must_use]
    pub const fn new(drivers: DriverTuning, rng_seed: u64) -> Self {
        Self { drivers, rng_seed }
    }
}

/// Pure system that emits per-entity movement, fire and ability commands.
#[derive(Debug)]
pub struct Decision {
    drivers: DriverTuning,
    rng: ChaCha8Rng,
}

impl Decision {
    /// Creates a new decision system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            drivers: config.drivers,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits the commands every alive entity wants applied before the next tick.
    pub fn handle(&mut self, entities: &EntityView, pointer: Option<Point>, out: &mut Vec<Command>) {
        for entity in entities.alive() {
            let Some(intent) = decide(entity, entities, pointer, &self.drivers, &mut self.rng)
            else {
                continue;
            };

            if intent.movement != Vector::ZERO {
                out.push(Command::MoveEntity {
                    entity: entity.id,
                    displacement: intent.movement,
                });
            }
            out.push(Command::Fire {
                entity: entity.id,
                target: intent.aim,
            });
            if intent.use_ability {
                out.push(Command::UseAbility {
                    entity: entity.id,
                    target: intent.aim,
                });
            }
        }
    }
}
