use std::{collections::HashSet, time::Duration};

use arena_core::{
    AbilityKind, ArenaBounds, Command, ControllerKind, EntityColor, EntityId, EntityProfile, Event,
    Generation, Point, Rect, Tuning, Vector,
};
use arena_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn arena(tuning: Tuning, obstacles: Vec<Rect>) -> World {
    let mut world = World::with_tuning(tuning);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureArena {
            bounds: ArenaBounds::new(800.0, 600.0),
            obstacles,
        },
        &mut events,
    );
    world
}

fn profile(ability: AbilityKind) -> EntityProfile {
    EntityProfile::new(
        "AI",
        EntityColor::from_rgb(0xff, 0xd4, 0x52),
        ControllerKind::Autonomous,
        ability,
    )
}

fn spawn(world: &mut World, ability: AbilityKind, position: Point) -> EntityId {
    let events = run(
        world,
        Command::SpawnEntity {
            profile: profile(ability),
            position,
        },
    );
    match events.as_slice() {
        [Event::EntitySpawned { entity, .. }] => *entity,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    run(world, Command::Tick { dt })
}

/// Blasts a 40 health victim standing next to the caster.
fn blast_kill(world: &mut World) -> (EntityId, EntityId) {
    let caster = spawn(world, AbilityKind::Blast, Point::new(300.0, 300.0));
    let victim = spawn(world, AbilityKind::Dash, Point::new(300.0, 350.0));
    let events = run(
        world,
        Command::UseAbility {
            entity: caster,
            target: Point::ORIGIN,
        },
    );
    assert!(events.contains(&Event::EntityKilled {
        victim,
        killer: caster
    }));
    (caster, victim)
}

fn fragile_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.entity.max_health = 40;
    tuning.respawn.invulnerability_ticks = 0;
    tuning
}

#[test]
fn spawned_entities_start_protected() {
    let mut world = arena(Tuning::default(), Vec::new());
    let entity = spawn(&mut world, AbilityKind::Dash, Point::new(50.0, 50.0));
    let snapshot = query::entity(&world, entity).expect("entity");
    assert_eq!(snapshot.invulnerable_ticks, 90);
    assert_eq!(snapshot.health, snapshot.max_health);

    for _ in 0..90 {
        let _ = tick(&mut world, Duration::from_millis(16));
    }
    assert!(!query::entity(&world, entity).expect("entity").is_invulnerable());
}

#[test]
fn respawn_becomes_due_after_the_delay() {
    let mut tuning = Tuning::default();
    tuning.entity.max_health = 40;
    let mut world = arena(tuning, Vec::new());
    let caster = spawn(&mut world, AbilityKind::Blast, Point::new(300.0, 300.0));
    let victim = spawn(&mut world, AbilityKind::Dash, Point::new(300.0, 350.0));
    for _ in 0..90 {
        let _ = tick(&mut world, Duration::from_millis(16));
    }

    let events = run(
        &mut world,
        Command::UseAbility {
            entity: caster,
            target: Point::ORIGIN,
        },
    );
    assert!(events.contains(&Event::EntityKilled {
        victim,
        killer: caster
    }));
    let killed_at = query::clock(&world);

    let mut due_after = None;
    for step in 1..=25 {
        let events = tick(&mut world, Duration::from_millis(100));
        if events.contains(&Event::RespawnDue {
            entity: victim,
            generation: Generation::new(1),
        }) {
            due_after = Some(step);
            break;
        }
        assert!(!query::entity(&world, victim).expect("victim").is_alive());
    }
    assert_eq!(due_after, Some(20));
    assert_eq!(query::clock(&world) - killed_at, Duration::from_millis(2_000));

    let landing = Point::new(700.0, 500.0);
    let events = run(
        &mut world,
        Command::RespawnEntity {
            entity: victim,
            generation: Generation::new(1),
            position: landing,
        },
    );
    assert_eq!(
        events,
        vec![Event::EntityRespawned {
            entity: victim,
            position: landing
        }]
    );

    let revived = query::entity(&world, victim).expect("victim");
    assert!(revived.is_alive());
    assert_eq!(revived.health, 40);
    assert_eq!(revived.invulnerable_ticks, 90);
    assert_eq!(revived.position, landing);
    assert_eq!(revived.generation, Generation::new(2));
    assert_eq!(query::pending_respawns(&world), 0);
}

#[test]
fn stale_respawn_is_ignored() {
    let mut world = arena(fragile_tuning(), Vec::new());
    let (_, victim) = blast_kill(&mut world);

    let landing = Point::new(600.0, 100.0);
    let first = run(
        &mut world,
        Command::RespawnEntity {
            entity: victim,
            generation: Generation::new(1),
            position: landing,
        },
    );
    assert_eq!(first.len(), 1);

    let duplicate = run(
        &mut world,
        Command::RespawnEntity {
            entity: victim,
            generation: Generation::new(1),
            position: Point::new(10.0, 10.0),
        },
    );
    assert!(duplicate.is_empty());
    assert_eq!(query::entity(&world, victim).expect("victim").position, landing);
}

#[test]
fn respawn_for_unknown_entity_is_a_no_op() {
    let mut world = arena(fragile_tuning(), Vec::new());
    let events = run(
        &mut world,
        Command::RespawnEntity {
            entity: EntityId::new(42),
            generation: Generation::new(1),
            position: Point::new(10.0, 10.0),
        },
    );
    assert!(events.is_empty());
}

#[test]
fn reset_clears_pending_work_and_never_reuses_ids() {
    let mut world = arena(fragile_tuning(), Vec::new());
    let (caster, victim) = blast_kill(&mut world);
    let _ = run(
        &mut world,
        Command::Fire {
            entity: caster,
            target: Point::new(700.0, 300.0),
        },
    );

    let events = run(&mut world, Command::ResetMatch);
    assert_eq!(events, vec![Event::MatchReset]);
    assert!(query::entity_view(&world).is_empty());
    assert!(query::projectile_view(&world).is_empty());
    assert_eq!(query::pending_respawns(&world), 0);

    let late = tick(&mut world, Duration::from_secs(5));
    assert!(!late
        .iter()
        .any(|event| matches!(event, Event::RespawnDue { .. })));

    let respawn = run(
        &mut world,
        Command::RespawnEntity {
            entity: victim,
            generation: Generation::new(1),
            position: Point::new(10.0, 10.0),
        },
    );
    assert!(respawn.is_empty());

    let fresh = spawn(&mut world, AbilityKind::Shield, Point::new(100.0, 100.0));
    assert!(fresh > caster && fresh > victim);
}

#[test]
fn human_entity_and_kill_count_are_queryable() {
    let mut world = arena(fragile_tuning(), Vec::new());
    assert_eq!(query::human_entity(&world), None);

    let human = run(
        &mut world,
        Command::SpawnEntity {
            profile: EntityProfile::new(
                "YOU",
                EntityColor::from_rgb(0x00, 0xe5, 0xff),
                ControllerKind::Human,
                AbilityKind::Dash,
            ),
            position: Point::new(700.0, 100.0),
        },
    );
    let human = match human.as_slice() {
        [Event::EntitySpawned { entity, .. }] => *entity,
        other => panic!("unexpected events: {other:?}"),
    };
    let _ = blast_kill(&mut world);

    assert_eq!(query::human_entity(&world), Some(human));
    assert_eq!(query::kill_count(&world, human), Some(0));
    assert_eq!(query::kill_count(&world, EntityId::new(99)), None);
}

fn walls() -> Vec<Rect> {
    vec![
        Rect::new(150.0, 100.0, 200.0, 20.0),
        Rect::new(450.0, 150.0, 20.0, 250.0),
        Rect::new(200.0, 400.0, 180.0, 20.0),
        Rect::new(600.0, 350.0, 20.0, 180.0),
    ]
}

fn open_point(world: &World, rng: &mut ChaCha8Rng) -> Point {
    loop {
        let candidate = Point::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        if !query::blocked(world, candidate) {
            return candidate;
        }
    }
}

fn assert_invariants(world: &World, destroyed: &HashSet<u32>) {
    for entity in query::entity_view(world).iter() {
        assert!(entity.health <= entity.max_health);
        assert_eq!(entity.is_alive(), entity.health > 0);
        if entity.is_alive() {
            assert!(
                !query::blocked(world, entity.position),
                "entity {:?} inside an obstacle at {:?}",
                entity.id,
                entity.position
            );
        }
    }
    for projectile in query::projectile_view(world).iter() {
        assert!(!destroyed.contains(&projectile.id.get()));
    }
}

#[test]
fn random_matches_preserve_world_invariants() {
    let mut tuning = Tuning::default();
    tuning.respawn.invulnerability_ticks = 10;
    tuning.entity.speed = 12.0;

    for seed in 0..24_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = arena(tuning, walls());
        let abilities = [AbilityKind::Dash, AbilityKind::Shield, AbilityKind::Blast];
        let mut roster = Vec::new();
        for index in 0..6 {
            let position = open_point(&world, &mut rng);
            roster.push(spawn(&mut world, abilities[index % abilities.len()], position));
        }

        let mut destroyed = HashSet::new();
        for _ in 0..400 {
            for entity in &roster {
                let target = Point::new(rng.gen_range(-50.0..850.0), rng.gen_range(-50.0..650.0));
                let command = match rng.gen_range(0..4) {
                    0 => Command::MoveEntity {
                        entity: *entity,
                        displacement: Vector::new(
                            rng.gen_range(-20.0..20.0),
                            rng.gen_range(-20.0..20.0),
                        ),
                    },
                    1 => Command::UseAbility {
                        entity: *entity,
                        target,
                    },
                    _ => Command::Fire {
                        entity: *entity,
                        target,
                    },
                };
                let _ = run(&mut world, command);
                assert_invariants(&world, &destroyed);
            }

            let events = tick(&mut world, Duration::from_millis(50));
            for event in &events {
                match event {
                    Event::ProjectileDestroyed { projectile } => {
                        let _ = destroyed.insert(projectile.get());
                    }
                    Event::RespawnDue { entity, generation } => {
                        let position = open_point(&world, &mut rng);
                        let _ = run(
                            &mut world,
                            Command::RespawnEntity {
                                entity: *entity,
                                generation: *generation,
                                position,
                            },
                        );
                    }
                    _ => {}
                }
            }
            assert_invariants(&world, &destroyed);
        }
    }
}
