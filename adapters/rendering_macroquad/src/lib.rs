#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Arena Skirmish.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the crate is pulled in without its default `audio` feature.

use anyhow::Result;
use arena_rendering::{
    Color, EntityPresentation, FrameInput, HudPresentation, Presentation, RenderingBackend, Scene,
};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, mouse_position, touches, KeyCode, MouseButton,
    TouchPhase,
};
use std::time::Duration;
use tracing::info;

const OBSTACLE_COLOR: Color = Color::from_rgb_u8(0x2a, 0x2f, 0x55);
const SHIELD_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);
const HEALTH_BACK_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
const HEALTH_FILL_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0x00);
const PROJECTILE_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
const HUD_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

const PROJECTILE_RADIUS: f32 = 4.0;
const SHIELD_RING_GAP: f32 = 6.0;
const SHIELD_RING_THICKNESS: f32 = 3.0;
const INVULNERABLE_ALPHA: f32 = 0.5;
const HEALTH_BAR_WIDTH: f32 = 36.0;
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_LIFT: f32 = 26.0;
const HUD_FONT_SIZE: f32 = 24.0;
const FEED_FONT_SIZE: f32 = 18.0;
const HUD_MARGIN: f32 = 12.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` to restart the match.
    reset_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            reset_requested: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_size: Option<(i32, i32)>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Requests an initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = Some((width.max(1), height.max(1)));
        self
    }
}

/// Counts frames and reports the average rate once per second.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_size,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let (window_width, window_height) = window_size.unwrap_or((1280, 800));
        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            high_dpi: false,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, gather_frame_input(keyboard), &mut scene);

                draw_scene(&scene);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    let touch = touches()
        .into_iter()
        .find(|touch| !matches!(touch.phase, TouchPhase::Ended | TouchPhase::Cancelled))
        .map(|touch| Vec2::new(touch.position.x, touch.position.y));
    let (mouse_x, mouse_y) = mouse_position();

    FrameInput {
        pointer: select_pointer(
            touch,
            is_mouse_button_down(MouseButton::Left),
            Vec2::new(mouse_x, mouse_y),
        ),
        viewport: Vec2::new(
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        ),
        reset_requested: keyboard.reset_requested,
    }
}

/// Touch wins over the mouse; the mouse only steers while its button is held.
fn select_pointer(touch: Option<Vec2>, mouse_down: bool, mouse: Vec2) -> Option<Vec2> {
    touch.or(if mouse_down { Some(mouse) } else { None })
}

fn draw_scene(scene: &Scene) {
    let obstacle_color = to_macroquad_color(OBSTACLE_COLOR);
    for obstacle in &scene.obstacles {
        macroquad::shapes::draw_rectangle(
            obstacle.origin.x,
            obstacle.origin.y,
            obstacle.size.x,
            obstacle.size.y,
            obstacle_color,
        );
    }

    for entity in &scene.entities {
        draw_entity(entity);
    }

    let projectile_color = to_macroquad_color(PROJECTILE_COLOR);
    for projectile in &scene.projectiles {
        macroquad::shapes::draw_circle(
            projectile.x,
            projectile.y,
            PROJECTILE_RADIUS,
            projectile_color,
        );
    }

    draw_hud(&scene.hud, macroquad::window::screen_width());
}

fn draw_entity(entity: &EntityPresentation) {
    let body = to_macroquad_color(body_color(entity));
    macroquad::shapes::draw_circle(entity.position.x, entity.position.y, entity.radius, body);

    if entity.shielded {
        macroquad::shapes::draw_circle_lines(
            entity.position.x,
            entity.position.y,
            entity.radius + SHIELD_RING_GAP,
            SHIELD_RING_THICKNESS,
            to_macroquad_color(SHIELD_COLOR),
        );
    }

    let bar = HealthBar::above(entity);
    macroquad::shapes::draw_rectangle(
        bar.origin.x,
        bar.origin.y,
        HEALTH_BAR_WIDTH,
        HEALTH_BAR_HEIGHT,
        to_macroquad_color(HEALTH_BACK_COLOR),
    );
    macroquad::shapes::draw_rectangle(
        bar.origin.x,
        bar.origin.y,
        bar.fill_width,
        HEALTH_BAR_HEIGHT,
        to_macroquad_color(HEALTH_FILL_COLOR),
    );
}

fn draw_hud(hud: &HudPresentation, screen_width: f32) {
    let color = to_macroquad_color(HUD_COLOR);
    let _ = macroquad::text::draw_text(
        &kill_counter_label(hud.kill_count),
        HUD_MARGIN,
        HUD_MARGIN + HUD_FONT_SIZE,
        HUD_FONT_SIZE,
        color,
    );

    for (index, line) in hud.feed.iter().enumerate() {
        let size = macroquad::text::measure_text(line, None, FEED_FONT_SIZE as u16, 1.0);
        let _ = macroquad::text::draw_text(
            line,
            screen_width - size.width - HUD_MARGIN,
            HUD_MARGIN + FEED_FONT_SIZE * (index as f32 + 1.0),
            FEED_FONT_SIZE,
            color,
        );
    }
}

fn body_color(entity: &EntityPresentation) -> Color {
    if entity.invulnerable {
        entity.color.with_alpha(INVULNERABLE_ALPHA)
    } else {
        entity.color
    }
}

fn kill_counter_label(kills: u32) -> String {
    format!("Kills: {kills}")
}

/// Health bar layout centred above an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HealthBar {
    origin: Vec2,
    fill_width: f32,
}

impl HealthBar {
    fn above(entity: &EntityPresentation) -> Self {
        Self {
            origin: Vec2::new(
                entity.position.x - HEALTH_BAR_WIDTH / 2.0,
                entity.position.y - HEALTH_BAR_LIFT,
            ),
            fill_width: HEALTH_BAR_WIDTH * entity.health_ratio.clamp(0.0, 1.0),
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(health_ratio: f32, invulnerable: bool) -> EntityPresentation {
        EntityPresentation {
            position: Vec2::new(100.0, 200.0),
            radius: 16.0,
            color: Color::from_rgb_u8(0x00, 0xe5, 0xff),
            invulnerable,
            shielded: false,
            health_ratio,
        }
    }

    #[test]
    fn touch_takes_priority_over_mouse() {
        let touch = Some(Vec2::new(5.0, 6.0));
        assert_eq!(select_pointer(touch, true, Vec2::ONE), touch);
    }

    #[test]
    fn released_mouse_yields_no_pointer() {
        assert_eq!(select_pointer(None, false, Vec2::ONE), None);
        assert_eq!(select_pointer(None, true, Vec2::ONE), Some(Vec2::ONE));
    }

    #[test]
    fn invulnerable_entities_are_translucent() {
        assert_eq!(body_color(&entity(1.0, true)).alpha, INVULNERABLE_ALPHA);
        assert_eq!(body_color(&entity(1.0, false)).alpha, 1.0);
    }

    #[test]
    fn health_bar_is_centred_and_scaled() {
        let bar = HealthBar::above(&entity(0.5, false));
        assert_eq!(bar.origin, Vec2::new(82.0, 174.0));
        assert_eq!(bar.fill_width, 18.0);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }
        let rate = counter
            .record_frame(Duration::from_millis(100))
            .expect("a second elapsed");
        assert!((rate - 60.0 / 1.044).abs() < 0.01);
    }

    #[test]
    fn kill_counter_matches_hud_copy() {
        assert_eq!(kill_counter_label(3), "Kills: 3");
    }
}
