#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Arena Skirmish.

mod combat;
mod entity;
mod obstacles;
mod respawn;

use std::time::Duration;

use arena_core::{ArenaBounds, Command, EntityId, Event, Tuning, Vector, WELCOME_BANNER};
use tracing::debug;

use crate::{combat::Projectile, entity::Entity, obstacles::ObstacleMap, respawn::RespawnSchedule};

/// Represents the authoritative Arena Skirmish world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    bounds: ArenaBounds,
    obstacles: ObstacleMap,
    entities: Vec<Entity>,
    projectiles: Vec<Projectile>,
    respawns: RespawnSchedule,
    clock: Duration,
    tick_index: u64,
    next_entity_id: u32,
    next_projectile_id: u32,
}

impl World {
    /// Creates an empty world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates an empty world that resolves gameplay with the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            tuning,
            bounds: ArenaBounds::default(),
            obstacles: ObstacleMap::default(),
            entities: Vec::new(),
            projectiles: Vec::new(),
            respawns: RespawnSchedule::default(),
            clock: Duration::ZERO,
            tick_index: 0,
            next_entity_id: 0,
            next_projectile_id: 0,
        }
    }

    fn entity_index(&self, entity: EntityId) -> Option<usize> {
        self.entities.iter().position(|candidate| candidate.id == entity)
    }

    fn alive_index(&self, entity: EntityId) -> Option<usize> {
        self.entity_index(entity)
            .filter(|index| self.entities[*index].is_alive())
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.advance_projectiles(out_events);

        for entity in self.entities.iter_mut().filter(|entity| entity.is_alive()) {
            entity.tick_status();
        }

        for pending in self.respawns.drain_due(self.clock) {
            out_events.push(Event::RespawnDue {
                entity: pending.entity,
                generation: pending.generation,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { bounds, obstacles } => {
            world.bounds = bounds;
            world.obstacles = ObstacleMap::new(obstacles);
            out_events.push(Event::ArenaConfigured {
                bounds,
                obstacle_count: world.obstacles.len(),
            });
        }
        Command::ResizeArena { bounds } => {
            if bounds != world.bounds {
                world.bounds = bounds;
                out_events.push(Event::ArenaResized { bounds });
            }
        }
        Command::SpawnEntity { profile, position } => {
            let id = EntityId::new(world.next_entity_id);
            world.next_entity_id = world.next_entity_id.wrapping_add(1);
            debug!(entity = id.get(), name = %profile.name, "entity spawned");
            world
                .entities
                .push(Entity::spawn(id, profile, position, &world.tuning));
            out_events.push(Event::EntitySpawned {
                entity: id,
                position,
            });
        }
        Command::MoveEntity {
            entity,
            displacement,
        } => {
            let Some(index) = world.alive_index(entity) else {
                return;
            };
            let displacement = clamp_to_speed(displacement, world.entities[index].speed);
            world.integrate_movement(index, displacement);
        }
        Command::Fire { entity, target } => world.fire(entity, target, out_events),
        Command::UseAbility { entity, target } => world.use_ability(entity, target, out_events),
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::RespawnEntity {
            entity,
            generation,
            position,
        } => {
            let Some(index) = world.entity_index(entity) else {
                debug!(entity = entity.get(), "respawn ignored for unknown entity");
                return;
            };
            let target = &mut world.entities[index];
            if target.is_alive() || target.generation != generation {
                debug!(entity = entity.get(), "stale respawn ignored");
                return;
            }
            target.respawn(position, world.tuning.respawn.invulnerability_ticks);
            debug!(
                entity = entity.get(),
                x = position.x,
                y = position.y,
                "entity respawned"
            );
            out_events.push(Event::EntityRespawned { entity, position });
        }
        Command::ResetMatch => {
            world.entities.clear();
            world.projectiles.clear();
            world.respawns.clear();
            debug!(tick = world.tick_index, "match reset");
            out_events.push(Event::MatchReset);
        }
    }
}

fn clamp_to_speed(displacement: Vector, speed: f32) -> Vector {
    let length = displacement.length();
    if length <= speed || length == 0.0 {
        return displacement;
    }
    displacement.scaled(speed / length)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use arena_core::{
        ArenaBounds, ControllerKind, EntityId, EntitySnapshot, EntityView, Point,
        ProjectileSnapshot, ProjectileView, Rect, Tuning,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Gameplay tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Current playable extent of the arena.
    #[must_use]
    pub fn bounds(world: &World) -> ArenaBounds {
        world.bounds
    }

    /// Static obstacles installed in the arena.
    #[must_use]
    pub fn obstacles(world: &World) -> &[Rect] {
        world.obstacles.rects()
    }

    /// Reports whether any obstacle strictly contains the point.
    #[must_use]
    pub fn blocked(world: &World, point: Point) -> bool {
        world.obstacles.blocked(point)
    }

    /// Simulated time accumulated since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every entity, alive or dead.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(world.entities.iter().map(|entity| entity.snapshot()).collect())
    }

    /// Snapshot of a single entity.
    #[must_use]
    pub fn entity(world: &World, entity: EntityId) -> Option<EntitySnapshot> {
        world
            .entities
            .iter()
            .find(|candidate| candidate.id == entity)
            .map(|candidate| candidate.snapshot())
    }

    /// Captures a read-only view of the live projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .filter(|projectile| projectile.live)
            .map(|projectile| projectile.snapshot())
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// First entity steered by the human driver, if one was spawned.
    #[must_use]
    pub fn human_entity(world: &World) -> Option<EntityId> {
        world
            .entities
            .iter()
            .find(|entity| entity.profile.controller == ControllerKind::Human)
            .map(|entity| entity.id)
    }

    /// Kills credited to the entity since it was spawned.
    #[must_use]
    pub fn kill_count(world: &World, entity: EntityId) -> Option<u32> {
        world
            .entities
            .iter()
            .find(|candidate| candidate.id == entity)
            .map(|candidate| candidate.kills)
    }

    /// Number of respawns waiting for their delay to elapse.
    #[must_use]
    pub fn pending_respawns(world: &World) -> usize {
        world.respawns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{AbilityKind, ControllerKind, EntityColor, EntityProfile, Point};

    fn spawn(world: &mut World, position: Point) -> EntityId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEntity {
                profile: EntityProfile::new(
                    "AI-1",
                    EntityColor::from_rgb(0xff, 0x52, 0x52),
                    ControllerKind::Autonomous,
                    AbilityKind::Shield,
                ),
                position,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EntitySpawned { entity, .. }] => *entity,
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn entity_ids_are_allocated_monotonically() {
        let mut world = World::new();
        let first = spawn(&mut world, Point::new(10.0, 10.0));
        let second = spawn(&mut world, Point::new(20.0, 20.0));
        assert!(second > first);
    }

    #[test]
    fn movement_is_clamped_to_entity_speed() {
        let mut world = World::new();
        world.bounds = ArenaBounds::new(800.0, 600.0);
        let entity = spawn(&mut world, Point::new(100.0, 100.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveEntity {
                entity,
                displacement: Vector::new(30.0, 40.0),
            },
            &mut events,
        );
        let moved = query::entity(&world, entity).expect("entity");
        assert!((moved.position.x - 102.4).abs() < 1e-4);
        assert!((moved.position.y - 103.2).abs() < 1e-4);
        assert!(events.is_empty());
    }

    #[test]
    fn resize_to_same_bounds_is_silent() {
        let mut world = World::new();
        let mut events = Vec::new();
        let bounds = ArenaBounds::new(800.0, 600.0);
        apply(&mut world, Command::ResizeArena { bounds }, &mut events);
        apply(&mut world, Command::ResizeArena { bounds }, &mut events);
        assert_eq!(events, vec![Event::ArenaResized { bounds }]);
    }
}
