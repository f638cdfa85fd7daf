//! Frame-by-frame orchestration of the world and its systems.

use std::time::Duration;

use arena_core::{ArenaBounds, Command, EntityId, EntityView, Event, Point, Tuning};
use arena_rendering::{HudPresentation, Scene};
use arena_system_bootstrap::Bootstrap;
use arena_system_decision::{Config as DecisionConfig, Decision};
use arena_system_kill_feed::KillFeed;
use arena_system_spawning::{Config as SpawningConfig, Spawning};
use arena_world::{self as world, query, World};
use tracing::{debug, info};

/// One running match: the world plus every system that feeds it commands.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    opponents: usize,
    spawning: Spawning,
    decision: Decision,
    kill_feed: KillFeed,
    human: Option<EntityId>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Builds the classic arena inside `bounds` and places the roster.
    pub(crate) fn new(tuning: Tuning, seed: u64, opponents: usize, bounds: ArenaBounds) -> Self {
        let bootstrap = Bootstrap;
        let mut simulation = Self {
            world: World::with_tuning(tuning),
            opponents,
            spawning: Spawning::new(SpawningConfig::new(&tuning.spawn, seed)),
            decision: Decision::new(DecisionConfig::new(
                tuning.drivers,
                seed.wrapping_add(1),
            )),
            kill_feed: KillFeed::new(&tuning.feed),
            human: None,
            commands: Vec::new(),
            events: Vec::new(),
        };

        info!("{}", bootstrap.welcome_banner(&simulation.world));
        let configure = bootstrap.configure_arena(bounds);
        world::apply(&mut simulation.world, configure, &mut simulation.events);

        simulation.place_roster();
        info!(
            entities = query::entity_view(&simulation.world).len(),
            seed, "match started"
        );
        simulation
    }

    fn place_roster(&mut self) {
        let entities = query::entity_view(&self.world);
        self.spawning.place_roster(
            Bootstrap.roster(self.opponents),
            query::bounds(&self.world),
            query::obstacles(&self.world),
            &entities,
            &mut self.commands,
        );
        self.apply_pending_commands();
        self.human = query::human_entity(&self.world);
    }

    /// Clears the match and places a fresh roster in the same arena.
    pub(crate) fn reset(&mut self) {
        self.events.clear();
        world::apply(&mut self.world, Command::ResetMatch, &mut self.events);
        self.place_roster();
        let entities = query::entity_view(&self.world);
        self.kill_feed.handle(&self.events, &entities);
        info!(entities = entities.len(), "match restarted");
    }

    /// Keeps the arena extent in sync with the drawable area.
    pub(crate) fn resize(&mut self, bounds: ArenaBounds) {
        world::apply(
            &mut self.world,
            Command::ResizeArena { bounds },
            &mut self.events,
        );
    }

    /// Advances the match by one tick of `dt`.
    ///
    /// Drivers act on the state left by the previous tick, then time
    /// advances, then due respawns are answered.
    pub(crate) fn step(&mut self, dt: Duration, pointer: Option<Point>) {
        self.events.clear();

        let entities = query::entity_view(&self.world);
        self.decision.handle(&entities, pointer, &mut self.commands);
        self.apply_pending_commands();
        let driver_events = self.events.len();

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let entities = query::entity_view(&self.world);
        self.spawning.handle(
            &self.events,
            query::bounds(&self.world),
            query::obstacles(&self.world),
            &entities,
            &mut self.commands,
        );
        self.apply_pending_commands();

        let entities = query::entity_view(&self.world);
        feed_in_tick_order(
            &mut self.kill_feed,
            &self.events,
            driver_events,
            &entities,
        );
    }

    fn apply_pending_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Kills credited to the human player.
    pub(crate) fn human_kills(&self) -> u32 {
        self.human
            .and_then(|human| query::kill_count(&self.world, human))
            .unwrap_or(0)
    }

    /// Presentation of the current state.
    pub(crate) fn scene(&self) -> Scene {
        Scene::from_views(
            query::obstacles(&self.world),
            &query::entity_view(&self.world),
            &query::projectile_view(&self.world),
            HudPresentation {
                kill_count: self.human_kills(),
                feed: self.kill_feed.lines(),
            },
        )
    }

    /// Every entity's name and kill count, in id order.
    pub(crate) fn scoreboard(&self) -> Vec<(String, u32)> {
        query::entity_view(&self.world)
            .into_vec()
            .into_iter()
            .map(|entity| (entity.name, entity.kills))
            .collect()
    }

    /// Simulated time elapsed since the match started.
    pub(crate) fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Events emitted by the most recent step.
    pub(crate) fn last_events(&self) -> &[Event] {
        &self.events
    }
}

/// Hands the kill feed the tick's events before the driver-phase ones, so
/// kills caused by abilities are not aged by the tick that follows them.
fn feed_in_tick_order(
    feed: &mut KillFeed,
    events: &[Event],
    driver_events: usize,
    entities: &EntityView,
) {
    let (driver_phase, tick_phase) = events.split_at(driver_events.min(events.len()));
    feed.handle(tick_phase, entities);
    feed.handle(driver_phase, entities);
}

/// Runs `ticks` fixed steps without a window and logs the final scoreboard.
pub(crate) fn run_headless(simulation: &mut Simulation, ticks: u64, dt: Duration) {
    let mut kills = 0_usize;
    for _ in 0..ticks {
        simulation.step(dt, None);
        kills += simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::EntityKilled { .. }))
            .count();
    }
    debug!(kills, "headless run finished");

    info!(
        ticks,
        clock_ms = simulation.clock().as_millis() as u64,
        kills,
        "match summary"
    );
    for (name, entity_kills) in simulation.scoreboard() {
        info!(%name, kills = entity_kills, "scoreboard");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ControllerKind, Event};

    const DT: Duration = Duration::from_millis(16);

    fn simulation(seed: u64) -> Simulation {
        Simulation::new(
            Tuning::default(),
            seed,
            3,
            ArenaBounds::new(1_200.0, 900.0),
        )
    }

    #[test]
    fn match_starts_with_the_full_roster() {
        let simulation = simulation(1);
        let scene = simulation.scene();

        assert_eq!(scene.obstacles.len(), 5);
        assert_eq!(scene.entities.len(), 4);
        assert!(scene.entities.iter().all(|entity| entity.invulnerable));
        assert_eq!(scene.hud.kill_count, 0);

        let view = query::entity_view(&simulation.world);
        let human = simulation.human.expect("human entity");
        assert_eq!(
            view.get(human).map(|entity| entity.controller),
            Some(ControllerKind::Human)
        );
    }

    #[test]
    fn stepping_advances_the_clock_and_fires() {
        let mut simulation = simulation(2);
        simulation.step(DT, None);

        assert_eq!(simulation.clock(), DT);
        assert!(simulation
            .last_events()
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. })));
        assert!(!simulation.scene().projectiles.is_empty());
    }

    #[test]
    fn identical_seeds_produce_identical_matches() {
        let mut first = simulation(11);
        let mut second = simulation(11);
        for _ in 0..1_500 {
            first.step(DT, Some(Point::new(600.0, 450.0)));
            second.step(DT, Some(Point::new(600.0, 450.0)));
        }
        assert_eq!(first.scene(), second.scene());
        assert_eq!(first.scoreboard(), second.scoreboard());
    }

    #[test]
    fn ability_kills_keep_their_full_feed_lifetime() {
        let mut feed = KillFeed::new(&Tuning::default().feed);
        let events = [
            Event::EntityKilled {
                victim: EntityId::new(2),
                killer: EntityId::new(1),
            },
            Event::TimeAdvanced { dt: DT },
        ];
        feed_in_tick_order(&mut feed, &events, 1, &EntityView::default());

        let entry = feed.entries().next().expect("entry");
        assert_eq!(entry.remaining(), Duration::from_millis(3_500));
    }

    #[test]
    fn reset_places_a_fresh_roster() {
        let mut simulation = simulation(4);
        let before = simulation.human.expect("human entity");
        for _ in 0..200 {
            simulation.step(DT, Some(Point::new(600.0, 450.0)));
        }

        simulation.reset();

        let human = simulation.human.expect("human entity");
        assert!(human > before);
        assert_eq!(simulation.human_kills(), 0);
        let scene = simulation.scene();
        assert_eq!(scene.entities.len(), 4);
        assert!(scene.projectiles.is_empty());
        assert!(scene.hud.feed.is_empty());
        assert!(simulation
            .last_events()
            .iter()
            .any(|event| matches!(event, Event::MatchReset)));
    }

    #[test]
    fn resize_updates_the_world_bounds() {
        let mut simulation = simulation(3);
        let bounds = ArenaBounds::new(800.0, 600.0);
        simulation.resize(bounds);
        assert_eq!(query::bounds(&simulation.world), bounds);
    }

    #[test]
    fn headless_runs_keep_every_entity() {
        let mut simulation = simulation(5);
        run_headless(&mut simulation, 600, DT);
        assert_eq!(simulation.scoreboard().len(), 4);
        assert_eq!(simulation.clock(), DT * 600);
    }
}
