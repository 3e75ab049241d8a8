mod hud;

use std::collections::HashMap;

use egui::{
    Color32, FontId, Frame, Key, Pos2, Rect, Sense, Shape, Stroke, Vec2, ViewportCommand, Visuals,
    emath::RectTransform, pos2,
};
use log::info;

use crate::config::DEFAULT_PLAYBACK_SPEED;
use crate::replay::{CarSnapshot, PlaybackClock, ReplaySession, leader_lap};
use crate::ui::{CAR_PALETTE, PALETTE_BACKGROUND, rgb_color};

pub const REPLAY_WIDTH: f32 = 1920.0;
pub const REPLAY_HEIGHT: f32 = 1200.0;

const OUTLINE_MARGIN: f32 = 50.0;
const CAR_DOT_RADIUS: f32 = 7.0;
const LABEL_OFFSET: f32 = 14.0;

/// Presentation options merged over the recorded session header.
#[derive(Clone, Debug)]
pub struct ReplayOptions {
    pub playback_speed: f64,
    pub visible_hud: bool,
    /// Overrides the header's circuit rotation (degrees) when set
    pub circuit_rotation: Option<f32>,
    /// Overrides the header's scheduled lap count when set
    pub total_laps: Option<u32>,
    /// Overrides recorded team colors per driver abbreviation
    pub driver_colors: Option<HashMap<String, [u8; 3]>>,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            visible_hud: true,
            circuit_rotation: None,
            total_laps: None,
            driver_colors: None,
        }
    }
}

/// Windowed replay of a recorded session: circuit map, car positions, and a
/// toggleable HUD, driven by a wall-clock playback clock.
pub struct RaceReplayWindow {
    session: ReplaySession,
    clock: PlaybackClock,
    visible_hud: bool,
    total_laps: Option<u32>,
    colors: HashMap<String, Color32>,
    /// Circuit outline with rotation already applied
    outline: Vec<Pos2>,
    rotation_sin_cos: (f32, f32),
    rotation_center: Pos2,
    /// Bounds of the rotated outline, padded by `OUTLINE_MARGIN`
    bounds: Rect,
    /// Thinned (time, leader lap) trace for the HUD strip
    lap_trace: Vec<[f64; 2]>,
}

impl RaceReplayWindow {
    pub fn new(session: ReplaySession, options: ReplayOptions) -> Self {
        let rotation_deg = options
            .circuit_rotation
            .unwrap_or(session.header.circuit_rotation);
        let rotation = rotation_deg.to_radians();
        let rotation_sin_cos = rotation.sin_cos();

        let raw_outline: Vec<Pos2> = session
            .header
            .track_outline
            .iter()
            .map(|p| pos2(p[0], p[1]))
            .collect();
        let rotation_center = polyline_center(&raw_outline);
        let outline: Vec<Pos2> = raw_outline
            .iter()
            .map(|&p| rotate_about(p, rotation_center, rotation_sin_cos))
            .collect();
        let bounds = polyline_bounds(&outline).expand(OUTLINE_MARGIN);

        let mut colors: HashMap<String, Color32> = session
            .header
            .drivers
            .iter()
            .enumerate()
            .map(|(i, driver)| {
                let color = if driver.color == [0, 0, 0] {
                    CAR_PALETTE[i % CAR_PALETTE.len()]
                } else {
                    rgb_color(driver.color)
                };
                (driver.abbreviation.clone(), color)
            })
            .collect();
        if let Some(overrides) = &options.driver_colors {
            for (abbreviation, rgb) in overrides {
                colors.insert(abbreviation.clone(), rgb_color(*rgb));
            }
        }

        let stride = (session.frames.len() / 2000).max(1);
        let lap_trace = session
            .frames
            .iter()
            .step_by(stride)
            .map(|frame| [frame.t, leader_lap(frame) as f64])
            .collect();

        Self {
            clock: PlaybackClock::new(options.playback_speed),
            visible_hud: options.visible_hud,
            total_laps: options.total_laps.or(session.header.total_laps),
            colors,
            outline,
            rotation_sin_cos,
            rotation_center,
            bounds,
            lap_trace,
            session,
        }
    }

    /// Run the blocking replay loop. Returns once the window closes.
    pub fn run(self) {
        let title = format!(
            "Race Replay - {} {} ({})",
            self.session.header.year, self.session.header.event_name, self.session.header.session_type
        );

        let mut native_options = eframe::NativeOptions::default();
        native_options.viewport = native_options
            .viewport
            .with_inner_size(Vec2::new(REPLAY_WIDTH, REPLAY_HEIGHT))
            .with_min_inner_size(Vec2::new(640.0, 400.0));

        info!("Opening replay window: {}", title);
        eframe::run_native(
            &title,
            native_options,
            Box::new(move |cc| {
                cc.egui_ctx.set_visuals(Visuals {
                    dark_mode: true,
                    panel_fill: PALETTE_BACKGROUND,
                    ..Default::default()
                });
                Ok(Box::new(self))
            }),
        )
        .expect("could not start replay window");
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (pause, faster, slower, hud, restart, close) = ctx.input(|i| {
            (
                i.key_pressed(Key::Space),
                i.key_pressed(Key::ArrowUp),
                i.key_pressed(Key::ArrowDown),
                i.key_pressed(Key::H),
                i.key_pressed(Key::R),
                i.key_pressed(Key::Escape),
            )
        });

        if pause {
            self.clock.toggle_pause();
        }
        if faster {
            self.clock.speed_up();
        }
        if slower {
            self.clock.slow_down();
        }
        if hud {
            self.visible_hud = !self.visible_hud;
        }
        if restart {
            self.clock.restart();
        }
        if close {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }

    /// Aspect-preserving transform from rotated circuit coordinates to a
    /// centered sub-rectangle of the viewport, with the y axis flipped so
    /// the recorded north stays up.
    fn circuit_transform(&self, viewport: Rect) -> RectTransform {
        let track_size = self.bounds.size();
        let track_aspect = if track_size.y != 0.0 {
            track_size.x / track_size.y
        } else {
            1.0
        };
        let screen_aspect = viewport.width() / viewport.height();

        let dest_rect = if screen_aspect > track_aspect {
            let width = viewport.height() * track_aspect;
            Rect::from_min_size(
                pos2(
                    viewport.min.x + (viewport.width() - width) / 2.0,
                    viewport.min.y,
                ),
                Vec2::new(width, viewport.height()),
            )
        } else {
            let height = viewport.width() / track_aspect;
            Rect::from_min_size(
                pos2(
                    viewport.min.x,
                    viewport.min.y + (viewport.height() - height) / 2.0,
                ),
                Vec2::new(viewport.width(), height),
            )
        };

        RectTransform::from_to(
            Rect::from_min_max(
                pos2(self.bounds.min.x, self.bounds.max.y),
                pos2(self.bounds.max.x, self.bounds.min.y),
            ),
            dest_rect,
        )
    }

    fn rotate_car(&self, car: &CarSnapshot) -> Pos2 {
        rotate_about(pos2(car.x, car.y), self.rotation_center, self.rotation_sin_cos)
    }

    fn draw_circuit(&self, painter: &egui::Painter, to_screen: &RectTransform) {
        let points: Vec<Pos2> = self.outline.iter().map(|&p| *to_screen * p).collect();
        painter.add(Shape::line(points, Stroke::new(3.0, Color32::WHITE)));
    }

    fn draw_cars(&self, painter: &egui::Painter, to_screen: &RectTransform, cars: &[CarSnapshot]) {
        for car in cars {
            let color = self
                .colors
                .get(&car.driver)
                .copied()
                .unwrap_or(Color32::LIGHT_GRAY);
            let pos = *to_screen * self.rotate_car(car);
            painter.circle_filled(pos, CAR_DOT_RADIUS, color);
            painter.text(
                pos + Vec2::new(0.0, -LABEL_OFFSET),
                egui::Align2::CENTER_BOTTOM,
                &car.driver,
                FontId::proportional(12.0),
                color,
            );
        }
    }
}

impl eframe::App for RaceReplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        let dt = ctx.input(|i| i.stable_dt) as f64;
        self.clock.advance(dt, self.session.duration());

        let t = self.clock.elapsed();
        let cars = self.session.sample_at(t);

        if self.visible_hud {
            self.lap_strip_panel(ctx, t);
        }

        egui::CentralPanel::default()
            .frame(Frame::new().fill(PALETTE_BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::hover());
                let to_screen = self.circuit_transform(response.rect);

                self.draw_circuit(&painter, &to_screen);
                self.draw_cars(&painter, &to_screen, &cars);

                if self.visible_hud {
                    self.status_banner(&painter, response.rect, t);
                    self.session_info_text(&painter, response.rect, t);
                }
            });

        if self.visible_hud {
            self.leaderboard_window(ctx, &cars);
        }

        ctx.request_repaint();
    }
}

fn polyline_center(points: &[Pos2]) -> Pos2 {
    if points.is_empty() {
        return Pos2::ZERO;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f32).to_pos2()
}

fn polyline_bounds(points: &[Pos2]) -> Rect {
    let mut bounds = Rect::NOTHING;
    for &p in points {
        bounds.extend_with(p);
    }
    if bounds.is_negative() {
        Rect::from_min_size(Pos2::ZERO, Vec2::splat(1.0))
    } else {
        bounds
    }
}

fn rotate_about(p: Pos2, center: Pos2, (sin, cos): (f32, f32)) -> Pos2 {
    let d = p - center;
    pos2(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}
