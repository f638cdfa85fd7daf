//! Projectiles, abilities, movement, and damage resolution.

use arena_core::{
    AbilityEffect, EntityId, Event, Point, ProjectileId, ProjectileSnapshot, Vector,
};
use tracing::{debug, trace};

use crate::{entity::DamageOutcome, World};

/// Straight-line projectile owned by the entity that fired it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: EntityId,
    pub(crate) position: Point,
    pub(crate) velocity: Vector,
    pub(crate) live: bool,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            position: self.position,
            velocity: self.velocity,
        }
    }
}

impl World {
    /// Spawns a projectile toward `target` when the weapon is ready.
    pub(crate) fn fire(&mut self, entity: EntityId, target: Point, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let interval = self.tuning.weapon.fire_interval();
        let speed = self.tuning.weapon.projectile_speed;

        let Some(index) = self.alive_index(entity) else {
            return;
        };
        let shooter = &mut self.entities[index];
        let Some(direction) = shooter.position.direction_to(target) else {
            return;
        };
        if !shooter.try_fire(now, interval) {
            return;
        }

        let origin = shooter.position;
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            owner: entity,
            position: origin,
            velocity: direction.scaled(speed),
            live: true,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            owner: entity,
        });
    }

    /// Activates the entity's ability when its cooldown has elapsed.
    pub(crate) fn use_ability(
        &mut self,
        entity: EntityId,
        target: Point,
        out_events: &mut Vec<Event>,
    ) {
        let now = self.clock;
        let Some(index) = self.alive_index(entity) else {
            return;
        };
        if !self.entities[index].ability_ready(now) {
            return;
        }

        let kind = self.entities[index].ability.kind;
        match self.entities[index].ability.effect {
            AbilityEffect::Dash { distance } => {
                let Some(direction) = self.entities[index].position.direction_to(target) else {
                    return;
                };
                self.entities[index].activate_ability(now);
                out_events.push(Event::AbilityUsed {
                    entity,
                    ability: kind,
                });
                self.integrate_movement(index, direction.scaled(distance));
            }
            AbilityEffect::Shield { ticks } => {
                self.entities[index].activate_ability(now);
                self.entities[index].shield_ticks = ticks;
                out_events.push(Event::AbilityUsed {
                    entity,
                    ability: kind,
                });
            }
            AbilityEffect::Blast { radius, damage } => {
                self.entities[index].activate_ability(now);
                out_events.push(Event::AbilityUsed {
                    entity,
                    ability: kind,
                });
                let centre = self.entities[index].position;
                let caught: Vec<usize> = self
                    .entities
                    .iter()
                    .enumerate()
                    .filter(|(other, candidate)| {
                        *other != index
                            && candidate.is_alive()
                            && candidate.position.distance(centre) < radius
                    })
                    .map(|(other, _)| other)
                    .collect();
                for victim in caught {
                    self.damage_entity(victim, entity, damage, out_events);
                }
            }
        }
    }

    /// Moves an entity along each axis independently, skipping axes that
    /// would land inside an obstacle. Each axis stops at the arena edge.
    pub(crate) fn integrate_movement(&mut self, index: usize, displacement: Vector) {
        if !displacement.dx.is_finite() || !displacement.dy.is_finite() {
            return;
        }

        let position = self.entities[index].position;
        let mut next = position;

        let horizontal = Point::new(
            (position.x + displacement.dx).clamp(0.0, self.bounds.width()),
            position.y,
        );
        if !self.obstacles.blocked(horizontal) {
            next.x = horizontal.x;
        }

        let vertical = Point::new(
            next.x,
            (next.y + displacement.dy).clamp(0.0, self.bounds.height()),
        );
        if !self.obstacles.blocked(vertical) {
            next.y = vertical.y;
        }

        self.entities[index].position = next;
    }

    /// Advances every live projectile one step and resolves its collisions.
    ///
    /// Projectiles are processed in firing order, so when two shots reach the
    /// same target in one tick the older one lands first.
    pub(crate) fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let damage = self.tuning.weapon.damage;

        for slot in 0..self.projectiles.len() {
            let projectile = &mut self.projectiles[slot];
            if !projectile.live {
                continue;
            }
            projectile.position = projectile.position.translated(projectile.velocity);
            let (owner, position) = (projectile.owner, projectile.position);

            if self.obstacles.blocked(position) || !self.bounds.contains(position) {
                self.projectiles[slot].live = false;
                continue;
            }

            let hit = self.entities.iter().position(|candidate| {
                candidate.id != owner
                    && candidate.is_alive()
                    && !candidate.is_immune()
                    && candidate.position.distance(position) < candidate.radius
            });
            if let Some(victim) = hit {
                self.projectiles[slot].live = false;
                self.damage_entity(victim, owner, damage, out_events);
            }
        }

        self.compact_projectiles(out_events);
    }

    /// Drops every spent projectile from the live set.
    fn compact_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let before = self.projectiles.len();
        for projectile in self.projectiles.iter().filter(|projectile| !projectile.live) {
            out_events.push(Event::ProjectileDestroyed {
                projectile: projectile.id,
            });
        }
        self.projectiles.retain(|projectile| projectile.live);

        let removed = before - self.projectiles.len();
        if removed > 0 {
            trace!(removed, live = self.projectiles.len(), "projectiles compacted");
        }
    }

    /// Routes damage into an entity and handles the consequences of a kill.
    pub(crate) fn damage_entity(
        &mut self,
        index: usize,
        attacker: EntityId,
        amount: u32,
        out_events: &mut Vec<Event>,
    ) {
        let victim = self.entities[index].id;
        match self.entities[index].apply_damage(amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { remaining } => {
                trace!(victim = victim.get(), attacker = attacker.get(), remaining, "entity damaged");
                out_events.push(Event::EntityDamaged {
                    entity: victim,
                    attacker,
                    amount,
                    remaining,
                });
            }
            DamageOutcome::Killed { generation } => {
                out_events.push(Event::EntityDamaged {
                    entity: victim,
                    attacker,
                    amount,
                    remaining: 0,
                });

                if let Some(killer) = self.entities.iter_mut().find(|e| e.id == attacker) {
                    killer.kills = killer.kills.saturating_add(1);
                }

                let due = self.clock.saturating_add(self.tuning.respawn.delay());
                self.respawns.schedule(victim, generation, due);
                debug!(
                    victim = victim.get(),
                    killer = attacker.get(),
                    due_ms = due.as_millis() as u64,
                    "entity eliminated"
                );
                out_events.push(Event::EntityKilled {
                    victim,
                    killer: attacker,
                });
            }
        }
    }
}
