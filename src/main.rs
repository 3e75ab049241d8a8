use std::{path::PathBuf, sync::mpsc};

use clap::{Parser, Subcommand};
use log::{error, info};

use undercut::UndercutError;
use undercut::config::AppConfig;
use undercut::replay::load_session;
use undercut::schedule::{FileScheduleStore, SeasonProvider, SessionType, current_season};
use undercut::ui::menu::{RaceSelectionMenu, Selection};
use undercut::ui::replay::{RaceReplayWindow, ReplayOptions};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Directory holding schedules/ and sessions/ (defaults to the user data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick a season, grand prix, and session to replay (the default)
    Menu,
    /// Launch a replay directly, skipping the menu
    Replay {
        #[arg(short, long)]
        year: u16,

        #[arg(short, long)]
        round: u32,

        /// Session type code: R, Q, or S
        #[arg(short, long, default_value = "R")]
        session: String,

        /// Playback speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        #[arg(long)]
        hide_hud: bool,
    },
    /// Print a season's calendar
    Schedule {
        #[arg(short, long)]
        year: u16,
    },
}

fn store_for(data_dir: &Option<PathBuf>) -> Result<FileScheduleStore, UndercutError> {
    match data_dir {
        Some(dir) => Ok(FileScheduleStore::new(dir.clone())),
        None => FileScheduleStore::new_default(),
    }
}

fn replay_options(config: &AppConfig, speed: Option<f64>, hide_hud: bool) -> ReplayOptions {
    ReplayOptions {
        playback_speed: speed.unwrap_or(config.playback_speed),
        visible_hud: config.visible_hud && !hide_hud,
        ..Default::default()
    }
}

fn launch_replay(
    store: &FileScheduleStore,
    selection: Selection,
    options: ReplayOptions,
) -> Result<(), UndercutError> {
    let path = store.session_path(selection.year, selection.round, selection.session_type);
    let session = load_session(&path)?;
    RaceReplayWindow::new(session, options).run();
    Ok(())
}

fn menu(store: FileScheduleStore, mut config: AppConfig) -> Result<(), UndercutError> {
    let (selection_tx, selection_rx) = mpsc::channel::<Selection>();
    let initial_year = config.last_year.unwrap_or_else(current_season);

    let menu = RaceSelectionMenu::new(
        Box::new(store.clone()),
        initial_year,
        config.session_type,
        Box::new(move |selection| {
            let _ = selection_tx.send(selection);
        }),
    );
    menu.run();

    // the menu window has closed; a selection may or may not have been made
    let Ok(selection) = selection_rx.try_recv() else {
        info!("No session selected");
        return Ok(());
    };

    config.last_year = Some(selection.year);
    config.session_type = selection.session_type;
    if let Err(e) = config.save() {
        error!("Error while saving config file: {}", e);
    }

    let options = replay_options(&config, None, false);
    launch_replay(&store, selection, options)
}

fn replay(
    store: &FileScheduleStore,
    config: &AppConfig,
    year: u16,
    round: u32,
    session: &str,
    speed: Option<f64>,
    hide_hud: bool,
) -> Result<(), UndercutError> {
    let session_type = SessionType::from_code(session)?;
    let selection = Selection {
        year,
        round,
        session_type,
    };
    launch_replay(store, selection, replay_options(config, speed, hide_hud))
}

fn schedule(store: &FileScheduleStore, year: u16) -> Result<(), UndercutError> {
    let events = store.season_events(year)?;
    println!("{year} season ({} rounds)", events.len());
    for event in events {
        let sprint_marker = if event.has_sprint { "  [sprint]" } else { "" };
        println!("  Round {:2}  {}{}", event.round, event.name, sprint_marker);
    }
    Ok(())
}

fn main() {
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let store = store_for(&cli.data_dir).expect("Could not locate the application data directory");
    let config = AppConfig::from_local_file().unwrap_or_default();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu(store, config).expect("Error while running the race selection menu"),
        Commands::Replay {
            year,
            round,
            session,
            speed,
            hide_hud,
        } => replay(&store, &config, year, round, &session, speed, hide_hud)
            .expect("Error while launching replay"),
        Commands::Schedule { year } => {
            schedule(&store, year).expect("Error while reading the season schedule")
        }
    };
}
