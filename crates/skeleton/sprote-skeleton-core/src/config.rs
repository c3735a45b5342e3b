//! Editor configuration shared by the session and headless drivers.

use serde::{Deserialize, Serialize};

/// Canvas, playback and interaction settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canvas size in pixels; new bones are anchored at its centre.
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Playback rate used to map timeline pixels to seconds.
    pub fps: u32,
    /// Upper bound (seconds) of the editable timeline.
    pub max_time: f32,
    /// Horizontal pixels per timeline frame.
    pub frame_width: f32,

    /// Radius of the anchor circle used for picking.
    pub pick_radius: f32,
    pub default_bone_length: f32,
    /// Degrees of rotation per pixel of shift-drag.
    pub rotate_sensitivity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            fps: 60,
            max_time: 5.0,
            frame_width: 2.0,
            pick_radius: 10.0,
            default_bone_length: 60.0,
            rotate_sensitivity: 1.5,
        }
    }
}

impl Config {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Canvas centre, where fresh bones are anchored.
    pub fn canvas_center(&self) -> (f32, f32) {
        (
            (self.canvas_width / 2) as f32,
            (self.canvas_height / 2) as f32,
        )
    }

    /// Map a pointer x coordinate on the timeline strip to a clamped time.
    pub fn time_at_pixel(&self, x: f32) -> f32 {
        let px_per_second = self.frame_width * self.fps as f32;
        if px_per_second <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        (x / px_per_second).clamp(0.0, self.max_time.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "fps": 30 }"#).unwrap();
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.canvas_width, 800);
        assert_eq!(cfg.canvas_center(), (400.0, 300.0));
    }

    #[test]
    fn time_at_pixel_clamps() {
        let cfg = Config::default();
        assert_eq!(cfg.time_at_pixel(-5.0), 0.0);
        assert_eq!(cfg.time_at_pixel(120.0), 1.0);
        assert_eq!(cfg.time_at_pixel(10_000.0), cfg.max_time);
    }
}
