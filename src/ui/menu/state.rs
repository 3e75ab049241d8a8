// Menu state and hit regions, kept free of windowing so the selection logic
// is testable with synthetic input.

use egui::{Pos2, Rect, Vec2, pos2, vec2};
use log::info;

use crate::schedule::{Event, FIRST_SEASON, SeasonProvider, SessionType, current_season};

pub const MENU_WIDTH: f32 = 1100.0;
pub const MENU_HEIGHT: f32 = 750.0;

/// Rows shown at once in the race list.
pub const MAX_VISIBLE_ROWS: usize = 8;

pub(crate) const ROW_PITCH: f32 = 50.0;
pub(crate) const ROW_HEIGHT: f32 = 45.0;
const ROW_X: f32 = 50.0;
const ROW_WIDTH: f32 = 1000.0;
const FIRST_ROW_Y: f32 = 170.0;

pub(crate) const LIST_TOP: f32 = 165.0;
pub(crate) const LIST_BOTTOM: f32 = 575.0;

const YEAR_X_START: f32 = 120.0;
const YEAR_Y: f32 = 88.0;
const YEAR_PITCH: f32 = 110.0;
const YEAR_SIZE: Vec2 = vec2(100.0, 45.0);

const SESSION_X_START: f32 = 150.0;
const SESSION_Y: f32 = 620.0;
const SESSION_PITCH: f32 = 160.0;
const SESSION_SIZE: Vec2 = vec2(140.0, 50.0);

const LAUNCH_POS: Pos2 = pos2(700.0, 620.0);
const LAUNCH_SIZE: Vec2 = vec2(280.0, 50.0);

pub(crate) fn list_rect() -> Rect {
    Rect::from_min_size(pos2(ROW_X, LIST_TOP), vec2(ROW_WIDTH, LIST_BOTTOM - LIST_TOP))
}

/// The confirmed choice handed to the selection callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub year: u16,
    pub round: u32,
    pub session_type: SessionType,
}

/// Callback invoked when the user confirms a selection. Taken on the first
/// launch, so it can fire at most once.
pub type SelectionCallback = Box<dyn FnOnce(Selection) + Send>;

#[derive(Clone, Debug, PartialEq)]
pub struct YearButton {
    pub year: u16,
    pub rect: Rect,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RaceRow {
    /// Index into `MenuState::events`
    pub event_index: usize,
    pub round: u32,
    pub rect: Rect,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionButton {
    pub session_type: SessionType,
    pub rect: Rect,
}

pub struct MenuState {
    pub year: u16,
    pub events: Vec<Event>,
    pub selected_round: Option<u32>,
    pub session_type: SessionType,
    pub scroll_offset: f32,
    pub loading: bool,
    pub error_message: Option<String>,

    pub year_buttons: Vec<YearButton>,
    pub race_rows: Vec<RaceRow>,
    pub session_buttons: Vec<SessionButton>,
    pub launch_rect: Rect,

    on_select: Option<SelectionCallback>,
}

impl MenuState {
    pub fn new(
        initial_year: u16,
        session_type: SessionType,
        provider: &dyn SeasonProvider,
        on_select: SelectionCallback,
    ) -> Self {
        let year = initial_year.clamp(FIRST_SEASON, current_season());
        let mut state = Self {
            year,
            events: Vec::new(),
            selected_round: None,
            session_type,
            scroll_offset: 0.0,
            loading: false,
            error_message: None,
            year_buttons: Vec::new(),
            race_rows: Vec::new(),
            session_buttons: Vec::new(),
            launch_rect: Rect::from_min_size(LAUNCH_POS, LAUNCH_SIZE),
            on_select: Some(on_select),
        };
        state.setup_regions();
        state.load_events(year, provider);
        state
    }

    fn setup_regions(&mut self) {
        self.year_buttons = (FIRST_SEASON..=current_season())
            .enumerate()
            .map(|(i, year)| YearButton {
                year,
                rect: Rect::from_min_size(
                    pos2(YEAR_X_START + i as f32 * YEAR_PITCH, YEAR_Y),
                    YEAR_SIZE,
                ),
                selected: year == self.year,
            })
            .collect();

        self.session_buttons = SessionType::ALL
            .iter()
            .enumerate()
            .map(|(i, &session_type)| SessionButton {
                session_type,
                rect: Rect::from_min_size(
                    pos2(SESSION_X_START + i as f32 * SESSION_PITCH, SESSION_Y),
                    SESSION_SIZE,
                ),
            })
            .collect();
    }

    /// Load the calendar for `year`. Failures become an on-screen message;
    /// either way the scroll offset resets and the round selection clears.
    pub fn load_events(&mut self, year: u16, provider: &dyn SeasonProvider) {
        self.loading = true;
        self.error_message = None;
        self.year = year;
        for button in &mut self.year_buttons {
            button.selected = button.year == year;
        }
        self.selected_round = None;
        self.scroll_offset = 0.0;

        match provider.season_events(year) {
            Ok(events) => self.events = events,
            Err(e) => {
                self.error_message = Some(format!("Error loading events: {e}"));
                self.events = Vec::new();
            }
        }

        self.rebuild_race_rows();
        self.loading = false;
    }

    /// Recompute row rectangles from the current scroll offset.
    pub fn rebuild_race_rows(&mut self) {
        self.race_rows = self
            .events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let y = FIRST_ROW_Y + i as f32 * ROW_PITCH + self.scroll_offset;
                RaceRow {
                    event_index: i,
                    round: event.round,
                    rect: Rect::from_min_size(pos2(ROW_X, y), vec2(ROW_WIDTH, ROW_HEIGHT)),
                    visible: y > LIST_TOP && y + ROW_HEIGHT < LIST_BOTTOM,
                }
            })
            .collect();
    }

    pub fn max_scroll(&self) -> f32 {
        self.events.len().saturating_sub(MAX_VISIBLE_ROWS) as f32 * ROW_PITCH
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_offset = (self.scroll_offset + delta).clamp(-self.max_scroll(), 0.0);
        self.rebuild_race_rows();
    }

    /// Hit-test a press against year, race, session, and launch regions in
    /// that priority order. Returns true when a launch happened and the
    /// window should close; presses outside every region leave the state
    /// untouched.
    pub fn handle_click(&mut self, pos: Pos2, provider: &dyn SeasonProvider) -> bool {
        if let Some(year) = self
            .year_buttons
            .iter()
            .find(|b| b.rect.contains(pos))
            .map(|b| b.year)
        {
            self.load_events(year, provider);
            return false;
        }

        if let Some(round) = self
            .race_rows
            .iter()
            .find(|r| r.visible && r.rect.contains(pos))
            .map(|r| r.round)
        {
            self.selected_round = Some(round);
            return false;
        }

        if let Some(session_type) = self
            .session_buttons
            .iter()
            .find(|b| b.rect.contains(pos))
            .map(|b| b.session_type)
        {
            self.session_type = session_type;
            return false;
        }

        if self.launch_rect.contains(pos) {
            return self.try_launch();
        }

        false
    }

    /// Invoke the selection callback and report that the window should
    /// close. A no-op while no round is selected; the callback itself fires
    /// at most once.
    pub fn try_launch(&mut self) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        if let Some(on_select) = self.on_select.take() {
            info!(
                "Selected replay: {} round {} ({})",
                selection.year, selection.round, selection.session_type
            );
            on_select(selection);
        }
        true
    }

    /// The launchable selection, if a round has been chosen.
    pub fn selection(&self) -> Option<Selection> {
        self.selected_round.map(|round| Selection {
            year: self.year,
            round,
            session_type: self.session_type,
        })
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected_round
            .and_then(|round| self.events.iter().find(|e| e.round == round))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UndercutError;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};

    struct StubProvider {
        events: Vec<Event>,
    }

    impl StubProvider {
        fn with_rounds(rounds: &[u32]) -> Self {
            Self {
                events: rounds
                    .iter()
                    .map(|&round| Event {
                        round,
                        name: format!("Grand Prix {round}"),
                        has_sprint: round % 3 == 0,
                    })
                    .collect(),
            }
        }
    }

    impl SeasonProvider for StubProvider {
        fn season_events(&self, _year: u16) -> Result<Vec<Event>, UndercutError> {
            Ok(self.events.clone())
        }
    }

    struct FailingProvider;

    impl SeasonProvider for FailingProvider {
        fn season_events(&self, year: u16) -> Result<Vec<Event>, UndercutError> {
            Err(UndercutError::ScheduleNotFound {
                year,
                path: PathBuf::from(format!("/schedules/{year}.json")),
            })
        }
    }

    fn menu_state(
        year: u16,
        session_type: SessionType,
        provider: &dyn SeasonProvider,
    ) -> (MenuState, Receiver<Selection>) {
        let (tx, rx) = mpsc::channel();
        let state = MenuState::new(
            year,
            session_type,
            provider,
            Box::new(move |selection| {
                tx.send(selection).unwrap();
            }),
        );
        (state, rx)
    }

    fn snapshot(state: &MenuState) -> (u16, Option<u32>, SessionType, f32, usize) {
        (
            state.year,
            state.selected_round,
            state.session_type,
            state.scroll_offset,
            state.events.len(),
        )
    }

    #[test]
    fn clicks_outside_every_region_change_nothing() {
        let provider = StubProvider::with_rounds(&[1, 2, 3]);
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);
        state.selected_round = Some(2);
        let before = snapshot(&state);

        // dead zones: between widget rows, window corners, outside the window
        for pos in [
            pos2(10.0, 10.0),
            pos2(550.0, 150.0),
            pos2(30.0, 300.0),
            pos2(550.0, 600.0),
            pos2(1099.0, 749.0),
            pos2(-5.0, 400.0),
        ] {
            assert!(!state.handle_click(pos, &provider));
            assert_eq!(snapshot(&state), before);
        }
    }

    #[test]
    fn selecting_a_year_reloads_events_and_resets_scroll() {
        let provider = StubProvider::with_rounds(&(1..=20).collect::<Vec<_>>());
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);
        state.selected_round = Some(4);
        state.scroll_by(-300.0);
        assert_eq!(state.scroll_offset, -300.0);

        let year_2020 = state
            .year_buttons
            .iter()
            .find(|b| b.year == 2020)
            .unwrap()
            .rect
            .center();
        assert!(!state.handle_click(year_2020, &provider));

        assert_eq!(state.year, 2020);
        assert_eq!(state.scroll_offset, 0.0);
        assert_eq!(state.selected_round, None);
        assert_eq!(state.events.len(), 20);
        assert!(
            state
                .year_buttons
                .iter()
                .all(|b| b.selected == (b.year == 2020))
        );
    }

    #[test]
    fn clicking_a_row_selects_its_round() {
        let provider = StubProvider::with_rounds(&[1, 2]);
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);

        let row_2 = state
            .race_rows
            .iter()
            .find(|r| r.round == 2)
            .unwrap()
            .rect
            .center();
        assert!(!state.handle_click(row_2, &provider));
        assert_eq!(state.selected_round, Some(2));
        assert_eq!(state.selected_event().unwrap().name, "Grand Prix 2");
    }

    #[test]
    fn rows_scrolled_out_of_the_list_are_not_clickable() {
        let provider = StubProvider::with_rounds(&(1..=20).collect::<Vec<_>>());
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);
        state.scroll_by(-state.max_scroll());

        let hidden = state.race_rows.iter().find(|r| !r.visible).unwrap().clone();
        assert!(!state.handle_click(hidden.rect.center(), &provider));
        assert_eq!(state.selected_round, None);
    }

    #[test]
    fn clicking_a_session_button_changes_the_session_type() {
        let provider = StubProvider::with_rounds(&[1]);
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);

        let sprint = state
            .session_buttons
            .iter()
            .find(|b| b.session_type == SessionType::Sprint)
            .unwrap()
            .rect
            .center();
        assert!(!state.handle_click(sprint, &provider));
        assert_eq!(state.session_type, SessionType::Sprint);
    }

    #[test]
    fn launch_is_a_noop_without_a_selected_round() {
        let provider = StubProvider::with_rounds(&[1, 2]);
        let (mut state, rx) = menu_state(2024, SessionType::Race, &provider);

        assert!(!state.handle_click(state.launch_rect.center(), &provider));
        assert_eq!(state.selection(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn launch_with_a_selected_round_fires_the_callback_once() {
        let provider = StubProvider::with_rounds(&[3, 5, 7]);
        let (mut state, rx) = menu_state(2024, SessionType::Qualifying, &provider);
        state.selected_round = Some(5);

        assert!(state.handle_click(state.launch_rect.center(), &provider));
        assert_eq!(
            rx.try_recv().unwrap(),
            Selection {
                year: 2024,
                round: 5,
                session_type: SessionType::Qualifying,
            }
        );

        // a second launch still closes the window but cannot fire again
        assert!(state.try_launch());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn provider_failure_is_surfaced_as_a_message() {
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &FailingProvider);
        assert!(state.events.is_empty());
        assert!(state.race_rows.is_empty());
        let message = state.error_message.as_deref().unwrap();
        assert!(message.starts_with("Error loading events:"), "{message}");

        // the menu stays usable: a later successful load clears the message
        let provider = StubProvider::with_rounds(&[1]);
        state.load_events(2023, &provider);
        assert_eq!(state.error_message, None);
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn at_most_eight_rows_are_visible() {
        let provider = StubProvider::with_rounds(&(1..=24).collect::<Vec<_>>());
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);

        assert_eq!(state.race_rows.iter().filter(|r| r.visible).count(), 8);
        state.scroll_by(-125.0);
        assert!(state.race_rows.iter().filter(|r| r.visible).count() <= MAX_VISIBLE_ROWS);
        state.scroll_by(-10_000.0);
        let visible: Vec<u32> = state
            .race_rows
            .iter()
            .filter(|r| r.visible)
            .map(|r| r.round)
            .collect();
        assert_eq!(visible, (17..=24).collect::<Vec<u32>>());
    }

    #[test]
    fn short_calendars_do_not_scroll() {
        let provider = StubProvider::with_rounds(&[1, 2, 3]);
        let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);
        assert_eq!(state.max_scroll(), 0.0);
        state.scroll_by(-500.0);
        assert_eq!(state.scroll_offset, 0.0);
    }

    proptest! {
        #[test]
        fn scroll_offset_is_always_clamped(
            event_count in 0usize..40,
            deltas in proptest::collection::vec(-600.0f32..600.0, 0..25),
        ) {
            let rounds: Vec<u32> = (1..=event_count as u32).collect();
            let provider = StubProvider::with_rounds(&rounds);
            let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);

            let max_scroll = event_count.saturating_sub(MAX_VISIBLE_ROWS) as f32 * ROW_PITCH;
            for delta in deltas {
                state.scroll_by(delta);
                prop_assert!(state.scroll_offset <= 0.0);
                prop_assert!(state.scroll_offset >= -max_scroll);
            }
        }

        #[test]
        fn presses_only_select_rounds_inside_visible_rows(
            x in -50.0f32..1200.0,
            y in -50.0f32..800.0,
        ) {
            let provider = StubProvider::with_rounds(&(1..=24).collect::<Vec<_>>());
            let (mut state, _rx) = menu_state(2024, SessionType::Race, &provider);
            let pos = pos2(x, y);
            state.handle_click(pos, &provider);

            if let Some(round) = state.selected_round {
                let row = state.race_rows.iter().find(|r| r.round == round).unwrap();
                prop_assert!(row.visible && row.rect.contains(pos));
            }
        }
    }
}
