#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Arena Skirmish adapters.

use anyhow::Result as AnyResult;
use arena_core::{EntityColor, EntitySnapshot, EntityView, ProjectileView, Rect};
use glam::Vec2;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<EntityColor> for Color {
    fn from(color: EntityColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Latest pointer or touch position in arena units, if one is held down.
    pub pointer: Option<Vec2>,
    /// Current drawable extent of the window in arena units.
    pub viewport: Vec2,
    /// The player asked to restart the match this frame.
    pub reset_requested: bool,
}

/// Axis-aligned wall drawn beneath every combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstaclePresentation {
    /// Top-left corner of the wall.
    pub origin: Vec2,
    /// Width and height of the wall.
    pub size: Vec2,
}

impl From<Rect> for ObstaclePresentation {
    fn from(rect: Rect) -> Self {
        Self {
            origin: Vec2::new(rect.x(), rect.y()),
            size: Vec2::new(rect.width(), rect.height()),
        }
    }
}

/// Everything a backend needs to draw one living combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityPresentation {
    /// Centre of the combatant.
    pub position: Vec2,
    /// Collision radius, also used as the drawn radius.
    pub radius: f32,
    /// Body color.
    pub color: Color,
    /// Spawn protection is active; drawn translucent.
    pub invulnerable: bool,
    /// Shield is active; drawn with a ring.
    pub shielded: bool,
    /// Remaining health as a fraction of maximum health.
    pub health_ratio: f32,
}

impl EntityPresentation {
    /// Converts a snapshot into a presentation, skipping dead entities.
    #[must_use]
    pub fn from_snapshot(snapshot: &EntitySnapshot) -> Option<Self> {
        if !snapshot.is_alive() {
            return None;
        }
        Some(Self {
            position: Vec2::new(snapshot.position.x, snapshot.position.y),
            radius: snapshot.radius,
            color: snapshot.color.into(),
            invulnerable: snapshot.is_invulnerable(),
            shielded: snapshot.is_shielded(),
            health_ratio: snapshot.health_ratio().clamp(0.0, 1.0),
        })
    }
}

/// Heads-up display content layered over the arena.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Kills credited to the human player.
    pub kill_count: u32,
    /// Kill feed lines, oldest first.
    pub feed: Vec<String>,
}

/// Scene description combining the arena layout and its inhabitants.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Static walls.
    pub obstacles: Vec<ObstaclePresentation>,
    /// Living combatants in id order.
    pub entities: Vec<EntityPresentation>,
    /// Centres of live projectiles.
    pub projectiles: Vec<Vec2>,
    /// Kill counter and feed.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        obstacles: Vec<ObstaclePresentation>,
        entities: Vec<EntityPresentation>,
        projectiles: Vec<Vec2>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            obstacles,
            entities,
            projectiles,
            hud,
        }
    }

    /// Builds a scene from world snapshots.
    #[must_use]
    pub fn from_views(
        obstacles: &[Rect],
        entities: &EntityView,
        projectiles: &ProjectileView,
        hud: HudPresentation,
    ) -> Self {
        Self::new(
            obstacles.iter().copied().map(ObstaclePresentation::from).collect(),
            entities
                .iter()
                .filter_map(EntityPresentation::from_snapshot)
                .collect(),
            projectiles
                .iter()
                .map(|projectile| Vec2::new(projectile.position.x, projectile.position.y))
                .collect(),
            hud,
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Arena Skirmish scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the per-frame input captured by the adapter, and rewrites the scene
    /// before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{
        AbilityKind, ControllerKind, EntityId, Generation, LifeStatus, Point, ProjectileId,
        ProjectileSnapshot, Vector,
    };

    fn snapshot(id: u32, status: LifeStatus) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            name: format!("AI-{id}"),
            color: EntityColor::from_rgb(0xff, 0x00, 0x00),
            controller: ControllerKind::Autonomous,
            ability: AbilityKind::Shield,
            position: Point::new(10.0 * id as f32, 5.0),
            radius: 16.0,
            speed: 4.0,
            health: if status == LifeStatus::Alive { 25 } else { 0 },
            max_health: 100,
            status,
            invulnerable_ticks: 3,
            shield_ticks: 0,
            kills: 0,
            generation: Generation::default(),
        }
    }

    #[test]
    fn entity_colors_convert_to_unit_channels() {
        let color: Color = EntityColor::from_rgb(0xff, 0x00, 0x33).into();
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn with_alpha_clamps_into_range() {
        let color = Color::from_rgb_u8(0, 0, 0).with_alpha(1.5);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn dead_entities_are_not_presented() {
        assert!(EntityPresentation::from_snapshot(&snapshot(1, LifeStatus::Dead)).is_none());
    }

    #[test]
    fn scene_captures_living_entities_and_projectiles() {
        let entities = EntityView::from_snapshots(vec![
            snapshot(2, LifeStatus::Alive),
            snapshot(1, LifeStatus::Dead),
        ]);
        let projectiles = ProjectileView::from_snapshots(vec![ProjectileSnapshot {
            id: ProjectileId::new(0),
            owner: EntityId::new(2),
            position: Point::new(40.0, 50.0),
            velocity: Vector::new(7.0, 0.0),
        }]);
        let scene = Scene::from_views(
            &[Rect::new(1.0, 2.0, 3.0, 4.0)],
            &entities,
            &projectiles,
            HudPresentation {
                kill_count: 2,
                feed: vec!["YOU eliminated AI-1".to_owned()],
            },
        );

        assert_eq!(scene.obstacles[0].size, Vec2::new(3.0, 4.0));
        assert_eq!(scene.entities.len(), 1);
        let entity = scene.entities[0];
        assert_eq!(entity.position, Vec2::new(20.0, 5.0));
        assert!(entity.invulnerable);
        assert!(!entity.shielded);
        assert!((entity.health_ratio - 0.25).abs() < f32::EPSILON);
        assert_eq!(scene.projectiles, vec![Vec2::new(40.0, 50.0)]);
        assert_eq!(scene.hud.kill_count, 2);
    }
}
