// HUD overlays for the replay window: status banner, session info text,
// leaderboard, and the lap-progress strip.

use egui::{Align2, Color32, CornerRadius, FontId, Rect, RichText, Vec2, Vec2b, pos2};
use egui_plot::{Line, PlotPoints};
use itertools::Itertools;

use super::RaceReplayWindow;
use crate::replay::{CarSnapshot, TrackStatus};
use crate::ui::PALETTE_STATUS_BAR;

const BANNER_SIZE: Vec2 = Vec2::new(320.0, 36.0);
const LAP_STRIP_HEIGHT: f32 = 110.0;

fn status_color(status: TrackStatus) -> Color32 {
    match status {
        TrackStatus::Green => Color32::from_rgb(40, 180, 40),
        TrackStatus::Yellow => Color32::from_rgb(220, 190, 0),
        TrackStatus::SafetyCar => Color32::from_rgb(255, 140, 0),
        TrackStatus::VirtualSafetyCar => Color32::from_rgb(255, 200, 60),
        TrackStatus::Red => Color32::from_rgb(200, 30, 30),
    }
}

fn format_clock(t: f64) -> String {
    let total_seconds = t.max(0.0) as u64;
    format!(
        "{}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

impl RaceReplayWindow {
    pub(super) fn status_banner(&self, painter: &egui::Painter, viewport: Rect, t: f64) {
        let status = self.session.status_at(t);
        let banner = Rect::from_center_size(
            pos2(viewport.center().x, viewport.min.y + 30.0),
            BANNER_SIZE,
        );
        painter.rect_filled(banner, CornerRadius::same(4), status_color(status));
        painter.text(
            banner.center(),
            Align2::CENTER_CENTER,
            status.banner(),
            FontId::proportional(18.0),
            Color32::BLACK,
        );
    }

    pub(super) fn session_info_text(&self, painter: &egui::Painter, viewport: Rect, t: f64) {
        let lap = self.session.leader_lap_at(t);
        let lap_line = match self.total_laps {
            Some(total) => format!("Lap: {}/{}", lap, total),
            None => format!("Lap: {}", lap),
        };
        let playback = if self.clock.paused() {
            "paused".to_string()
        } else {
            format!("{}x", self.clock.speed())
        };
        let info = format!(
            "{}\n{}\nTime: {}  ({})",
            self.session.header.circuit_name,
            lap_line,
            format_clock(t),
            playback
        );
        painter.text(
            viewport.min + Vec2::new(20.0, 20.0),
            Align2::LEFT_TOP,
            info,
            FontId::proportional(16.0),
            Color32::WHITE,
        );
    }

    pub(super) fn leaderboard_window(&self, ctx: &egui::Context, cars: &[CarSnapshot]) {
        egui::Window::new("Leaderboard")
            .anchor(Align2::RIGHT_TOP, Vec2::new(-10.0, 10.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for car in cars
                    .iter()
                    .sorted_by_key(|c| c.position)
                {
                    let color = self
                        .colors
                        .get(&car.driver)
                        .copied()
                        .unwrap_or(Color32::LIGHT_GRAY);
                    ui.label(
                        RichText::new(format!("P{:<2} {}  L{}", car.position, car.driver, car.lap))
                            .color(color)
                            .monospace(),
                    );
                }
            });
    }

    pub(super) fn lap_strip_panel(&self, ctx: &egui::Context, t: f64) {
        egui::TopBottomPanel::bottom("lap_progress")
            .exact_height(LAP_STRIP_HEIGHT)
            .frame(egui::Frame::new().fill(PALETTE_STATUS_BAR))
            .show(ctx, |ui| {
                let max_lap = self
                    .lap_trace
                    .last()
                    .map(|p| p[1])
                    .unwrap_or(1.0)
                    .max(1.0);
                let cursor = vec![[t, 0.0], [t, max_lap]];

                egui_plot::Plot::new("lap_progress_plot")
                    .allow_drag(false)
                    .allow_scroll(false)
                    .allow_zoom(false)
                    .show_background(false)
                    .show_grid(false)
                    .include_y(0.)
                    .include_y(max_lap)
                    .auto_bounds(Vec2b::new(true, false))
                    .show(ui, |plot_ui| {
                        plot_ui.line(
                            Line::new("Leader lap", PlotPoints::new(self.lap_trace.clone()))
                                .color(Color32::LIGHT_GRAY)
                                .fill(0.),
                        );
                        plot_ui.line(
                            Line::new("Now", PlotPoints::new(cursor))
                                .color(Color32::from_rgb(200, 30, 30)),
                        );
                    });
            });
    }
}
