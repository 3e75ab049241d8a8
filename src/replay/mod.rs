pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use loader::load_session;

use crate::schedule::SessionType;

/// Playback speed detents stepped through by the replay window.
pub const SPEED_DETENTS: [f64; 7] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

/// One entrant of the replayed session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DriverInfo {
    /// Three-letter abbreviation, unique within the session (e.g., "VER")
    pub abbreviation: String,
    pub full_name: String,
    pub car_number: u32,
    /// Team color as RGB
    pub color: [u8; 3],
}

/// State of a single car at one frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CarFrame {
    /// Driver abbreviation, matches `DriverInfo::abbreviation`
    pub driver: String,
    /// Position on the circuit, same coordinate space as the track outline
    pub x: f32,
    pub y: f32,
    /// Classified position, 1 is the leader
    pub position: u16,
    /// Lap the car is currently on
    pub lap: u32,
}

/// Drawable state of the whole field at one instant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReplayFrame {
    /// Seconds from session start
    pub t: f64,
    pub cars: Vec<CarFrame>,
}

/// Flag condition of the circuit.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrackStatus {
    #[default]
    Green,
    Yellow,
    SafetyCar,
    VirtualSafetyCar,
    Red,
}

impl TrackStatus {
    pub fn banner(&self) -> &'static str {
        match self {
            TrackStatus::Green => "GREEN FLAG",
            TrackStatus::Yellow => "YELLOW FLAG",
            TrackStatus::SafetyCar => "SAFETY CAR",
            TrackStatus::VirtualSafetyCar => "VIRTUAL SAFETY CAR",
            TrackStatus::Red => "RED FLAG",
        }
    }
}

/// Interval of the session spent under one track status.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackStatusSpan {
    pub start_t: f64,
    pub end_t: f64,
    pub status: TrackStatus,
}

/// Session-level metadata recorded ahead of the frames.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionHeader {
    pub year: u16,
    pub round: u32,
    pub session_type: SessionType,
    pub event_name: String,
    pub circuit_name: String,
    /// Scheduled lap count, when the session has one
    pub total_laps: Option<u32>,
    /// Degrees the recorded coordinates are rotated before display, so the
    /// drawn circuit matches its conventional map orientation
    pub circuit_rotation: f32,
    /// Circuit centerline traced from a representative lap
    pub track_outline: Vec<[f32; 2]>,
    pub drivers: Vec<DriverInfo>,
}

/// A fully loaded recorded session, ready for playback.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaySession {
    pub header: SessionHeader,
    pub frames: Vec<ReplayFrame>,
    pub track_statuses: Vec<TrackStatusSpan>,
}

/// One car's interpolated state at an arbitrary playback time.
#[derive(Clone, Debug, PartialEq)]
pub struct CarSnapshot {
    pub driver: String,
    pub x: f32,
    pub y: f32,
    pub position: u16,
    pub lap: u32,
}

impl ReplaySession {
    /// Session length in seconds.
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|f| f.t).unwrap_or(0.0)
    }

    /// Index of the last frame with timestamp <= `t` (0 when `t` precedes
    /// the first frame).
    pub fn frame_index_at(&self, t: f64) -> usize {
        let after = self.frames.partition_point(|f| f.t <= t);
        after.saturating_sub(1)
    }

    /// Interpolated car states at playback time `t`. Positions are lerped
    /// between neighboring frames; classified position and lap number hold
    /// the value of the earlier frame.
    pub fn sample_at(&self, t: f64) -> Vec<CarSnapshot> {
        let index = self.frame_index_at(t);
        let Some(frame) = self.frames.get(index) else {
            return Vec::new();
        };

        let next = self.frames.get(index + 1);
        let alpha = match next {
            Some(next) if next.t > frame.t => ((t - frame.t) / (next.t - frame.t)).clamp(0.0, 1.0),
            _ => 0.0,
        };
        let next_cars: HashMap<&str, &CarFrame> = next
            .map(|f| f.cars.iter().map(|c| (c.driver.as_str(), c)).collect())
            .unwrap_or_default();

        frame
            .cars
            .iter()
            .map(|car| {
                let (x, y) = match next_cars.get(car.driver.as_str()) {
                    Some(next_car) => (
                        car.x + (next_car.x - car.x) * alpha as f32,
                        car.y + (next_car.y - car.y) * alpha as f32,
                    ),
                    None => (car.x, car.y),
                };
                CarSnapshot {
                    driver: car.driver.clone(),
                    x,
                    y,
                    position: car.position,
                    lap: car.lap,
                }
            })
            .collect()
    }

    /// Track status at playback time `t`. The last span containing `t`
    /// wins; gaps default to green.
    pub fn status_at(&self, t: f64) -> TrackStatus {
        self.track_statuses
            .iter()
            .rev()
            .find(|span| span.start_t <= t && t < span.end_t)
            .map(|span| span.status)
            .unwrap_or_default()
    }

    /// Lap the leader is on at playback time `t`.
    pub fn leader_lap_at(&self, t: f64) -> u32 {
        self.frames
            .get(self.frame_index_at(t))
            .map(leader_lap)
            .unwrap_or(0)
    }
}

pub(crate) fn leader_lap(frame: &ReplayFrame) -> u32 {
    frame
        .cars
        .iter()
        .find(|c| c.position == 1)
        .map(|c| c.lap)
        .or_else(|| frame.cars.iter().map(|c| c.lap).max())
        .unwrap_or(0)
}

/// Wall-clock driven playback position with pause and speed detents.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    elapsed: f64,
    speed: f64,
    paused: bool,
}

impl PlaybackClock {
    pub fn new(speed: f64) -> Self {
        Self {
            elapsed: 0.0,
            speed: if speed > 0.0 { speed } else { 1.0 },
            paused: false,
        }
    }

    /// Advance by a wall-clock delta, clamping at the session end.
    pub fn advance(&mut self, wall_dt: f64, duration: f64) {
        if self.paused {
            return;
        }
        self.elapsed = (self.elapsed + wall_dt * self.speed).clamp(0.0, duration);
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Step to the next faster detent; sticks at the fastest.
    pub fn speed_up(&mut self) {
        if let Some(next) = SPEED_DETENTS.iter().find(|&&d| d > self.speed) {
            self.speed = *next;
        }
    }

    /// Step to the next slower detent; sticks at the slowest.
    pub fn slow_down(&mut self) {
        if let Some(prev) = SPEED_DETENTS.iter().rev().find(|&&d| d < self.speed) {
            self.speed = *prev;
        }
    }
}
