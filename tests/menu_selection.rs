// Integration tests for the race selection flow against a real file-backed
// schedule store: load a season, pick a round, launch, and verify the
// selection callback contract.

use std::fs;
use std::sync::mpsc::{self, Receiver};

use tempfile::TempDir;

use undercut::schedule::{FileScheduleStore, SeasonProvider, SessionType};
use undercut::ui::menu::{MenuState, Selection};

fn write_schedule(dir: &TempDir, year: u16, rounds: usize) {
    let schedules = dir.path().join("schedules");
    fs::create_dir_all(&schedules).unwrap();
    let events: Vec<String> = (1..=rounds)
        .map(|round| {
            format!(
                r#"{{"round":{round},"name":"Grand Prix {round}","has_sprint":{}}}"#,
                round % 4 == 0
            )
        })
        .collect();
    fs::write(
        schedules.join(format!("{year}.json")),
        format!("[{}]", events.join(",")),
    )
    .unwrap();
}

fn menu_state(store: &FileScheduleStore, year: u16) -> (MenuState, Receiver<Selection>) {
    let (tx, rx) = mpsc::channel();
    let state = MenuState::new(
        year,
        SessionType::Race,
        store,
        Box::new(move |selection| {
            tx.send(selection).unwrap();
        }),
    );
    (state, rx)
}

#[test]
fn full_selection_flow_fires_the_callback_once() {
    let dir = TempDir::new().unwrap();
    write_schedule(&dir, 2024, 24);
    write_schedule(&dir, 2023, 22);
    let store = FileScheduleStore::new(dir.path().to_path_buf());

    let (mut state, rx) = menu_state(&store, 2024);
    assert_eq!(state.events.len(), 24);
    assert!(state.error_message.is_none());

    // switch season via its year button
    let year_2023 = state
        .year_buttons
        .iter()
        .find(|b| b.year == 2023)
        .unwrap()
        .rect
        .center();
    assert!(!state.handle_click(year_2023, &store));
    assert_eq!(state.events.len(), 22);

    // pick the third round, switch to qualifying, launch
    let row = state.race_rows[2].rect.center();
    assert!(!state.handle_click(row, &store));
    let qualifying = state
        .session_buttons
        .iter()
        .find(|b| b.session_type == SessionType::Qualifying)
        .unwrap()
        .rect
        .center();
    assert!(!state.handle_click(qualifying, &store));
    assert!(state.handle_click(state.launch_rect.center(), &store));

    assert_eq!(
        rx.try_recv().unwrap(),
        Selection {
            year: 2023,
            round: 3,
            session_type: SessionType::Qualifying,
        }
    );
    // the callback was consumed by the first launch
    assert!(state.try_launch());
    assert!(rx.try_recv().is_err());
}

#[test]
fn missing_season_shows_an_error_and_keeps_the_menu_alive() {
    let dir = TempDir::new().unwrap();
    write_schedule(&dir, 2024, 10);
    let store = FileScheduleStore::new(dir.path().to_path_buf());

    let (mut state, rx) = menu_state(&store, 2022);
    assert!(state.events.is_empty());
    let message = state.error_message.clone().unwrap();
    assert!(message.contains("2022"), "{message}");

    // recovering by picking a season that exists
    let year_2024 = state
        .year_buttons
        .iter()
        .find(|b| b.year == 2024)
        .unwrap()
        .rect
        .center();
    assert!(!state.handle_click(year_2024, &store));
    assert!(state.error_message.is_none());
    assert_eq!(state.events.len(), 10);
    assert!(rx.try_recv().is_err());
}

#[test]
fn scrolling_through_a_long_season_reaches_the_last_rounds() {
    let dir = TempDir::new().unwrap();
    write_schedule(&dir, 2024, 24);
    let store = FileScheduleStore::new(dir.path().to_path_buf());

    let (mut state, _rx) = menu_state(&store, 2024);
    state.scroll_by(-10_000.0);

    let last_visible = state
        .race_rows
        .iter()
        .filter(|r| r.visible)
        .map(|r| r.round)
        .max()
        .unwrap();
    assert_eq!(last_visible, 24);

    let row = state
        .race_rows
        .iter()
        .find(|r| r.round == 24)
        .unwrap()
        .rect
        .center();
    assert!(!state.handle_click(row, &store));
    assert_eq!(state.selected_round, Some(24));
}
