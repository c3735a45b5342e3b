//! Per-bone keyframe timeline and angle sampling.
//!
//! Model:
//! - A Timeline holds (time, angle) keyframes kept sorted ascending by time.
//! - Inserting at an existing time replaces that keyframe (last write wins).
//! - Sampling is linear on raw degrees between neighbouring keyframes and flat
//!   outside the keyed range. There is no shortest-arc handling: 350 -> 10
//!   sweeps back through 180.

use serde::{Deserialize, Serialize};

use crate::error::SkeletonError;

/// A timestamped target angle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Seconds from the start of the animation.
    pub time: f32,
    /// Degrees.
    pub angle: f32,
}

impl Keyframe {
    pub fn new(time: f32, angle: f32) -> Self {
        Self { time, angle }
    }
}

/// Keyframes sorted by time, one per distinct time. Built only through
/// [`Timeline::add_keyframe`]; project files replay their keys through it.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
}

/// Find the segment [i, i+1] that contains `time` and return (i, i+1, local_t).
/// Edge cases:
/// - If time <= first.time (or is NaN), returns (0, 0, 0) and caller should pick keyframes[0].
/// - If time >= last.time, returns (last, last, 0) and caller should pick keyframes[last].
fn find_segment(keys: &[Keyframe], time: f32) -> (usize, usize, f32) {
    let n = keys.len();
    if n <= 1 || time.is_nan() || time <= keys[0].time {
        return (0, 0, 0.0);
    }
    if time >= keys[n - 1].time {
        return (n - 1, n - 1, 0.0);
    }
    // First index whose time is strictly greater than the query.
    let hi = keys.partition_point(|k| k.time <= time);
    let lo = hi - 1;
    let span = keys[hi].time - keys[lo].time;
    if span <= 0.0 {
        return (lo, lo, 0.0);
    }
    (lo, hi, (time - keys[lo].time) / span)
}

/// `-0.0` and `0.0` are the same key time; `total_cmp` would keep them apart.
fn canonical(time: f32) -> f32 {
    if time == 0.0 {
        0.0
    } else {
        time
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyframe, keeping the sequence sorted by time.
    pub fn add_keyframe(&mut self, time: f32, angle: f32) -> Result<(), SkeletonError> {
        if !time.is_finite() || time < 0.0 {
            return Err(SkeletonError::InvalidKeyframe { time });
        }
        let time = canonical(time);
        let key = Keyframe::new(time, angle);
        match self
            .keyframes
            .binary_search_by(|k| k.time.total_cmp(&time))
        {
            Ok(i) => self.keyframes[i] = key,
            Err(i) => self.keyframes.insert(i, key),
        }
        Ok(())
    }

    /// Remove the keyframe stored at exactly `time`, if any.
    pub fn remove_keyframe_at(&mut self, time: f32) -> Option<Keyframe> {
        let time = canonical(time);
        let i = self
            .keyframes
            .binary_search_by(|k| k.time.total_cmp(&time))
            .ok()?;
        Some(self.keyframes.remove(i))
    }

    /// Sample the angle at `time`.
    ///
    /// An empty timeline yields `default`, or `0.0` when no default is given.
    pub fn get_angle_at(&self, time: f32, default: Option<f32>) -> f32 {
        let keys = &self.keyframes;
        if keys.is_empty() {
            return default.unwrap_or(0.0);
        }
        let (i0, i1, t) = find_segment(keys, time);
        if i0 == i1 {
            return keys[i0].angle;
        }
        keys[i0].angle * (1.0 - t) + keys[i1].angle * t
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Time of the last keyframe, if any.
    pub fn end_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }
}
