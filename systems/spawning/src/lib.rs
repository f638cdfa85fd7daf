#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for placing combatants safely.

use arena_core::{
    tuning::SpawnTuning, ArenaBounds, Command, EntityProfile, EntityView, Event, Point, Rect,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Rejection sampler that keeps new arrivals away from living combatants.
#[derive(Clone, Copy, Debug)]
pub struct SpawnSelector {
    min_separation: f32,
    max_attempts: u32,
}

impl SpawnSelector {
    /// Creates a selector from the spawn tuning table.
    #[must_use]
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            min_separation: tuning.min_separation,
            max_attempts: tuning.max_attempts.max(1),
        }
    }

    /// Draws a point inside `bounds` at least the minimum separation away
    /// from every occupied point and outside every obstacle. A candidate at
    /// exactly the minimum separation counts as safe.
    ///
    /// After the attempt budget runs out the last candidate that is not inside
    /// an obstacle is returned, or the last candidate when every draw was
    /// blocked.
    pub fn select<R: Rng>(
        &self,
        bounds: ArenaBounds,
        obstacles: &[Rect],
        occupied: &[Point],
        rng: &mut R,
    ) -> Point {
        let mut fallback = None;
        let mut last = Point::ORIGIN;

        for _ in 0..self.max_attempts {
            let candidate = Point::new(
                rng.gen::<f32>() * bounds.width(),
                rng.gen::<f32>() * bounds.height(),
            );
            last = candidate;

            if obstacles.iter().any(|rect| rect.contains_point(candidate)) {
                continue;
            }
            fallback = Some(candidate);

            let crowded = occupied
                .iter()
                .any(|point| point.distance(candidate) < self.min_separation);
            if !crowded {
                return candidate;
            }
        }

        fallback.unwrap_or(last)
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    selector: SpawnSelector,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the spawn tuning and an RNG seed.
    #[must_use]
    pub fn new(tuning: &SpawnTuning, rng_seed: u64) -> Self {
        Self {
            selector: SpawnSelector::new(tuning),
            rng_seed,
        }
    }
}

/// Pure system that chooses safe positions for new and returning entities.
#[derive(Debug)]
pub struct Spawning {
    selector: SpawnSelector,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            selector: config.selector,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Answers every due respawn with a safe respawn command.
    ///
    /// Positions chosen earlier in the same batch count as occupied, so
    /// simultaneous respawns keep their distance from each other too.
    pub fn handle(
        &mut self,
        events: &[Event],
        bounds: ArenaBounds,
        obstacles: &[Rect],
        entities: &EntityView,
        out: &mut Vec<Command>,
    ) {
        let mut occupied: Option<Vec<Point>> = None;

        for event in events {
            let Event::RespawnDue { entity, generation } = event else {
                continue;
            };
            let occupied =
                occupied.get_or_insert_with(|| entities.alive().map(|e| e.position).collect());
            let position = self
                .selector
                .select(bounds, obstacles, occupied, &mut self.rng);
            occupied.push(position);
            out.push(Command::RespawnEntity {
                entity: *entity,
                generation: *generation,
                position,
            });
        }
    }

    /// Emits spawn commands that place every profile of a roster.
    pub fn place_roster(
        &mut self,
        roster: impl IntoIterator<Item = EntityProfile>,
        bounds: ArenaBounds,
        obstacles: &[Rect],
        entities: &EntityView,
        out: &mut Vec<Command>,
    ) {
        let mut occupied: Vec<Point> = entities.alive().map(|e| e.position).collect();
        for profile in roster {
            let position = self
                .selector
                .select(bounds, obstacles, &occupied, &mut self.rng);
            occupied.push(position);
            out.push(Command::SpawnEntity { profile, position });
        }
    }
}
