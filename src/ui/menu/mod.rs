pub mod state;

use egui::{
    Align2, Color32, CornerRadius, FontId, Frame, Key, Painter, Stroke, StrokeKind, Vec2,
    ViewportCommand, Visuals, pos2, vec2,
};

pub use state::{MENU_HEIGHT, MENU_WIDTH, MenuState, Selection, SelectionCallback};

use crate::schedule::SeasonProvider;
use crate::ui::{
    PALETTE_ACCENT, PALETTE_BACKGROUND, PALETTE_BUTTON, PALETTE_BUTTON_BORDER, PALETTE_LAUNCH,
    PALETTE_PANEL, PALETTE_ROW, PALETTE_ROW_BORDER, PALETTE_STATUS_BAR, PALETTE_TEXT,
    PALETTE_TEXT_DIM,
};

const BUTTON_CORNER_RADIUS: u8 = 4;

/// Windowed menu for picking the season, grand prix, and session to replay.
pub struct RaceSelectionMenu {
    state: MenuState,
    provider: Box<dyn SeasonProvider>,
}

impl RaceSelectionMenu {
    pub fn new(
        provider: Box<dyn SeasonProvider>,
        initial_year: u16,
        session_type: crate::schedule::SessionType,
        on_select: SelectionCallback,
    ) -> Self {
        let state = MenuState::new(initial_year, session_type, provider.as_ref(), on_select);
        Self { state, provider }
    }

    /// Run the blocking menu loop. Returns once the window closes.
    pub fn run(self) {
        let mut native_options = eframe::NativeOptions::default();
        native_options.viewport = native_options
            .viewport
            .with_inner_size(Vec2::new(MENU_WIDTH, MENU_HEIGHT))
            .with_resizable(false);

        eframe::run_native(
            "Race Replay - Select Race",
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
        .expect("could not start menu window");
    }

    fn paint_title(&self, painter: &Painter) {
        painter.text(
            pos2(MENU_WIDTH / 2.0, 32.0),
            Align2::CENTER_CENTER,
            "RACE REPLAY",
            FontId::proportional(28.0),
            Color32::WHITE,
        );
        painter.line_segment(
            [pos2(100.0, 56.0), pos2(MENU_WIDTH - 100.0, 56.0)],
            Stroke::new(3.0, PALETTE_ACCENT),
        );
    }

    fn paint_year_buttons(&self, painter: &Painter) {
        painter.text(
            pos2(60.0, 78.0),
            Align2::LEFT_BOTTOM,
            "Select Season:",
            FontId::proportional(16.0),
            PALETTE_TEXT,
        );

        for button in &self.state.year_buttons {
            let (fill, border) = if button.selected {
                (PALETTE_ACCENT, Stroke::new(3.0, Color32::WHITE))
            } else {
                (PALETTE_BUTTON, Stroke::new(2.0, PALETTE_BUTTON_BORDER))
            };
            painter.rect_filled(button.rect, CornerRadius::same(BUTTON_CORNER_RADIUS), fill);
            painter.rect_stroke(
                button.rect,
                CornerRadius::same(BUTTON_CORNER_RADIUS),
                border,
                StrokeKind::Inside,
            );
            painter.text(
                button.rect.center(),
                Align2::CENTER_CENTER,
                button.year.to_string(),
                FontId::proportional(16.0),
                Color32::WHITE,
            );
        }
    }

    fn paint_race_list(&self, painter: &Painter) {
        painter.text(
            pos2(60.0, 158.0),
            Align2::LEFT_BOTTOM,
            format!("Grand Prix Calendar - {}", self.state.year),
            FontId::proportional(16.0),
            PALETTE_TEXT,
        );

        let list_rect = state::list_rect();
        painter.rect_filled(list_rect, CornerRadius::same(2), PALETTE_PANEL);
        painter.rect_stroke(
            list_rect,
            CornerRadius::same(2),
            Stroke::new(2.0, Color32::from_gray(80)),
            StrokeKind::Inside,
        );

        if self.state.loading {
            painter.text(
                list_rect.center(),
                Align2::CENTER_CENTER,
                "Loading races...",
                FontId::proportional(18.0),
                Color32::WHITE,
            );
            return;
        }
        if let Some(message) = &self.state.error_message {
            painter.text(
                list_rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(14.0),
                Color32::RED,
            );
            return;
        }

        for row in &self.state.race_rows {
            if !row.visible {
                continue;
            }
            let event = &self.state.events[row.event_index];
            let is_selected = self.state.selected_round == Some(event.round);

            let (fill, text_color, border) = if is_selected {
                (PALETTE_ACCENT, Color32::WHITE, Stroke::new(1.0, Color32::WHITE))
            } else {
                (PALETTE_ROW, PALETTE_TEXT, Stroke::new(1.0, PALETTE_ROW_BORDER))
            };
            painter.rect_filled(row.rect, CornerRadius::same(2), fill);
            painter.rect_stroke(
                row.rect,
                CornerRadius::same(2),
                border,
                StrokeKind::Inside,
            );

            let sprint_marker = if event.has_sprint { "  (Sprint)" } else { "" };
            painter.text(
                pos2(row.rect.min.x + 15.0, row.rect.center().y),
                Align2::LEFT_CENTER,
                format!("Round {:2}:  {}{}", event.round, event.name, sprint_marker),
                FontId::proportional(13.0),
                text_color,
            );
        }

        if self.state.events.len() > state::MAX_VISIBLE_ROWS {
            painter.text(
                pos2(MENU_WIDTH / 2.0, 588.0),
                Align2::CENTER_CENTER,
                "Scroll for more races",
                FontId::proportional(11.0),
                PALETTE_TEXT_DIM,
            );
        }
    }

    fn paint_session_buttons(&self, painter: &Painter) {
        painter.text(
            pos2(60.0, 612.0),
            Align2::LEFT_BOTTOM,
            "Session Type:",
            FontId::proportional(16.0),
            PALETTE_TEXT,
        );

        for button in &self.state.session_buttons {
            let is_selected = self.state.session_type == button.session_type;
            let (fill, border) = if is_selected {
                (PALETTE_ACCENT, Stroke::new(3.0, Color32::WHITE))
            } else {
                (PALETTE_BUTTON, Stroke::new(2.0, PALETTE_BUTTON_BORDER))
            };
            painter.rect_filled(button.rect, CornerRadius::same(BUTTON_CORNER_RADIUS), fill);
            painter.rect_stroke(
                button.rect,
                CornerRadius::same(BUTTON_CORNER_RADIUS),
                border,
                StrokeKind::Inside,
            );
            painter.text(
                button.rect.center(),
                Align2::CENTER_CENTER,
                button.session_type.label(),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
        }
    }

    fn paint_launch_button(&self, painter: &Painter) {
        let armed = self.state.selected_round.is_some();
        let (fill, border, text_color) = if armed {
            (
                PALETTE_LAUNCH,
                Stroke::new(3.0, Color32::WHITE),
                Color32::WHITE,
            )
        } else {
            (
                Color32::from_gray(50),
                Stroke::new(2.0, Color32::from_gray(80)),
                Color32::from_gray(120),
            )
        };
        painter.rect_filled(
            self.state.launch_rect,
            CornerRadius::same(BUTTON_CORNER_RADIUS),
            fill,
        );
        painter.rect_stroke(
            self.state.launch_rect,
            CornerRadius::same(BUTTON_CORNER_RADIUS),
            border,
            StrokeKind::Inside,
        );
        painter.text(
            self.state.launch_rect.center(),
            Align2::CENTER_CENTER,
            "LAUNCH REPLAY",
            FontId::proportional(18.0),
            text_color,
        );
    }

    fn paint_status_bar(&self, painter: &Painter) {
        let bar = egui::Rect::from_min_size(pos2(50.0, 688.0), vec2(MENU_WIDTH - 100.0, 46.0));
        painter.rect_filled(bar, CornerRadius::same(2), PALETTE_STATUS_BAR);
        painter.rect_stroke(
            bar,
            CornerRadius::same(2),
            Stroke::new(1.0, Color32::from_gray(80)),
            StrokeKind::Inside,
        );

        let (status, color) = match self.state.selected_event() {
            Some(event) => (
                format!(
                    "Selected: {}  |  {}  |  Round {}",
                    event.name,
                    self.state.session_type,
                    event.round
                ),
                Color32::from_rgb(100, 255, 100),
            ),
            None => (
                "Select a Grand Prix from the list above to continue".to_string(),
                PALETTE_TEXT_DIM,
            ),
        };
        painter.text(
            bar.center(),
            Align2::CENTER_CENTER,
            status,
            FontId::proportional(14.0),
            color,
        );

        painter.text(
            pos2(MENU_WIDTH - 20.0, MENU_HEIGHT - 6.0),
            Align2::RIGHT_BOTTOM,
            "Press ESC to exit",
            FontId::proportional(10.0),
            Color32::from_gray(100),
        );
    }
}

impl eframe::App for RaceSelectionMenu {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (pressed_at, scroll_delta, escape, enter) = ctx.input(|i| {
            (
                i.pointer
                    .primary_pressed()
                    .then(|| i.pointer.interact_pos())
                    .flatten(),
                i.raw_scroll_delta.y,
                i.key_pressed(Key::Escape),
                i.key_pressed(Key::Enter),
            )
        });

        if escape {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }
        if enter && self.state.try_launch() {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }
        if scroll_delta != 0.0 {
            self.state.scroll_by(scroll_delta);
        }
        if let Some(pos) = pressed_at
            && self.state.handle_click(pos, self.provider.as_ref())
        {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        egui::CentralPanel::default()
            .frame(Frame::new().fill(PALETTE_BACKGROUND))
            .show(ctx, |ui| {
                let painter = ui.painter();
                self.paint_title(painter);
                self.paint_year_buttons(painter);
                self.paint_race_list(painter);
                self.paint_session_buttons(painter);
                self.paint_launch_button(painter);
                self.paint_status_bar(painter);
            });
    }
}
