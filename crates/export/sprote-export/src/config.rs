//! Export settings: frame rate, length and canvas.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Length used when neither a frame count nor a duration is given.
pub const DEFAULT_DURATION_SECS: f32 = 5.0;

/// Upper bound on frames per export (an hour at 30 fps).
pub const MAX_FRAMES: usize = 108_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Sampling rate (frames per second).
    pub fps: u32,
    /// Explicit frame count; wins over `duration` when set.
    pub total_frames: Option<u32>,
    /// Length in seconds; defaults to [`DEFAULT_DURATION_SECS`].
    pub duration: Option<f32>,
    pub width: u32,
    pub height: u32,
    /// RGBA fill behind every frame.
    pub background: [u8; 4],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            total_frames: None,
            duration: None,
            width: 800,
            height: 600,
            background: [30, 30, 30, 255],
        }
    }
}

fn check_cap(frames: f64) -> Result<usize, ExportError> {
    if frames > MAX_FRAMES as f64 {
        return Err(ExportError::InvalidArgument(format!(
            "{frames} frames exceeds the limit of {MAX_FRAMES}"
        )));
    }
    Ok(frames as usize)
}

impl ExportConfig {
    /// Number of frames to render: the explicit count, else `round(duration * fps)`.
    pub fn frame_count(&self) -> Result<usize, ExportError> {
        if self.fps == 0 {
            return Err(ExportError::InvalidArgument("fps must be positive".into()));
        }
        match self.total_frames {
            Some(0) => Err(ExportError::InvalidArgument(
                "total_frames must be positive".into(),
            )),
            Some(n) => check_cap(n as f64),
            None => {
                let duration = self.duration.unwrap_or(DEFAULT_DURATION_SECS);
                if !duration.is_finite() || duration < 0.0 {
                    return Err(ExportError::InvalidArgument(format!(
                        "duration must be finite and >= 0, got {duration}"
                    )));
                }
                check_cap((duration as f64 * self.fps as f64).round())
            }
        }
    }

    /// Sample time of frame `index`, in seconds.
    pub fn frame_time(&self, index: usize) -> f32 {
        index as f32 / self.fps.max(1) as f32
    }

    /// Per-frame display time for encoded animations.
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.fps.max(1)
    }
}
