#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the default Arena Skirmish match.

use arena_core::{
    AbilityKind, ArenaBounds, Command, ControllerKind, EntityColor, EntityProfile, Rect,
};
use arena_world::{query, World};

/// Number of autonomous opponents in the classic match.
pub const DEFAULT_OPPONENTS: usize = 3;

const WALLS: [Rect; 5] = [
    Rect::new(300.0, 200.0, 220.0, 20.0),
    Rect::new(600.0, 200.0, 20.0, 260.0),
    Rect::new(200.0, 450.0, 260.0, 20.0),
    Rect::new(800.0, 420.0, 220.0, 20.0),
    Rect::new(500.0, 550.0, 20.0, 220.0),
];

const HUMAN_COLOR: EntityColor = EntityColor::from_rgb(0x00, 0xe5, 0xff);

const OPPONENTS: [(EntityColor, AbilityKind); 3] = [
    (EntityColor::from_rgb(0xff, 0x52, 0x52), AbilityKind::Shield),
    (EntityColor::from_rgb(0xff, 0xd4, 0x52), AbilityKind::Blast),
    (EntityColor::from_rgb(0x9b, 0x6c, 0xff), AbilityKind::Dash),
];

const EXTRA_COLORS: [EntityColor; 4] = [
    EntityColor::from_rgb(0x4c, 0xaf, 0x50),
    EntityColor::from_rgb(0xff, 0x8a, 0x3d),
    EntityColor::from_rgb(0xf0, 0x62, 0x92),
    EntityColor::from_rgb(0xb0, 0xbe, 0xc5),
];

/// Produces the data required to start a match.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Static wall layout of the classic arena.
    #[must_use]
    pub fn obstacles(&self) -> Vec<Rect> {
        WALLS.to_vec()
    }

    /// Command installing the classic walls inside the provided bounds.
    #[must_use]
    pub fn configure_arena(&self, bounds: ArenaBounds) -> Command {
        Command::ConfigureArena {
            bounds,
            obstacles: self.obstacles(),
        }
    }

    /// Human player followed by `opponents` autonomous combatants.
    ///
    /// The first three opponents are the classic shield, blast and dash
    /// trio; further opponents cycle through the same abilities with their
    /// own colours.
    #[must_use]
    pub fn roster(&self, opponents: usize) -> Vec<EntityProfile> {
        let mut roster = Vec::with_capacity(opponents + 1);
        roster.push(EntityProfile::new(
            "YOU",
            HUMAN_COLOR,
            ControllerKind::Human,
            AbilityKind::Dash,
        ));

        for index in 0..opponents {
            let (classic_color, ability) = OPPONENTS[index % OPPONENTS.len()];
            let color = if index < OPPONENTS.len() {
                classic_color
            } else {
                EXTRA_COLORS[(index - OPPONENTS.len()) % EXTRA_COLORS.len()]
            };
            roster.push(EntityProfile::new(
                format!("AI-{}", index + 1),
                color,
                ControllerKind::Autonomous,
                ability,
            ));
        }
        roster
    }
}
