use std::io;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{ReplayFrame, ReplaySession, SessionHeader, TrackStatusSpan};
use crate::UndercutError;

/// One line of a recorded session file. A valid file starts with a single
/// `Header` record; `Frame` and `Status` records may interleave after it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionRecord {
    Header(Box<SessionHeader>),
    Frame(ReplayFrame),
    Status(TrackStatusSpan),
}

pub fn load_session(path: &Path) -> Result<ReplaySession, UndercutError> {
    if !path.exists() {
        return Err(UndercutError::SessionNotFound {
            path: path.to_path_buf(),
        });
    }

    let records = serde_jsonlines::json_lines(path)
        .map_err(|e| UndercutError::SessionIo {
            path: path.to_path_buf(),
            source: e,
        })?
        .collect::<Result<Vec<SessionRecord>, io::Error>>()
        .map_err(|e| UndercutError::SessionIo {
            path: path.to_path_buf(),
            source: e,
        })?;

    let invalid = |reason: String| UndercutError::InvalidSessionFile {
        path: path.to_path_buf(),
        reason,
    };

    let mut header: Option<SessionHeader> = None;
    let mut frames: Vec<ReplayFrame> = Vec::new();
    let mut track_statuses: Vec<TrackStatusSpan> = Vec::new();

    for record in records {
        match record {
            SessionRecord::Header(record_header) => {
                if header.is_some() {
                    return Err(invalid("duplicate header record".to_string()));
                }
                if !frames.is_empty() {
                    return Err(invalid("header record after frame records".to_string()));
                }
                header = Some(*record_header);
            }
            SessionRecord::Frame(frame) => {
                if header.is_none() {
                    return Err(invalid("first record must be a session header".to_string()));
                }
                if let Some(prev) = frames.last()
                    && frame.t <= prev.t
                {
                    return Err(invalid(format!(
                        "frame timestamps not strictly increasing at t={}",
                        frame.t
                    )));
                }
                frames.push(frame);
            }
            SessionRecord::Status(span) => {
                if header.is_none() {
                    return Err(invalid("first record must be a session header".to_string()));
                }
                track_statuses.push(span);
            }
        }
    }

    let header = header.ok_or_else(|| invalid("no session header record".to_string()))?;
    if frames.is_empty() {
        return Err(invalid("no frame records".to_string()));
    }

    info!(
        "Loaded {:?}: {} frames, {} status spans, {} drivers",
        path,
        frames.len(),
        track_statuses.len(),
        header.drivers.len()
    );

    Ok(ReplaySession {
        header,
        frames,
        track_statuses,
    })
}
