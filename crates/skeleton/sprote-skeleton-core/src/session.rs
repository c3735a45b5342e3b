//! Editing session: the interactive state machine around a skeleton.
//!
//! Holds the temporal context (current time, play/scrub mode) and pointer
//! interaction state explicitly, so a UI layer only forwards events and draws
//! the [`Pose`] returned by [`Session::frame`].

use std::path::Path;

use crate::bone::NewBone;
use crate::config::Config;
use crate::error::{ProjectError, SkeletonError};
use crate::ids::BoneId;
use crate::pose::{self, Pose};
use crate::project;
use crate::skeleton::{DeletePolicy, Skeleton};

#[derive(Debug, Clone)]
pub struct Session {
    cfg: Config,
    skeleton: Skeleton,
    time: f32,
    playing: bool,
    scrubbing: bool,
    selected: Option<BoneId>,
    dragging: Option<BoneId>,
    rotate_anchor: Option<(f32, f32)>,
}

impl Session {
    pub fn new(cfg: Config) -> Self {
        Self {
            skeleton: Skeleton::with_config(&cfg),
            cfg,
            time: 0.0,
            playing: false,
            scrubbing: false,
            selected: None,
            dragging: None,
            rotate_anchor: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.cfg.max_time.max(0.0));
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn selected(&self) -> Option<BoneId> {
        self.selected
    }

    pub fn dragging(&self) -> Option<BoneId> {
        self.dragging
    }

    /// Add a bone; an empty or zero length falls back to the configured default.
    pub fn add_bone(&mut self, mut spec: NewBone) -> Result<BoneId, SkeletonError> {
        if !(spec.length.is_finite() && spec.length > 0.0) {
            spec.length = self.cfg.default_bone_length;
        }
        let id = self.skeleton.add_bone(spec)?;
        log::debug!("added {id}");
        Ok(id)
    }

    pub fn select(&mut self, id: Option<BoneId>) {
        self.selected = id.filter(|&b| self.skeleton.contains(b));
    }

    /// Select the topmost bone under the pointer; roots also start a drag.
    pub fn pick(&mut self, x: f32, y: f32) -> Option<BoneId> {
        let hit = self.skeleton.pick(x, y, self.cfg.pick_radius)?;
        self.selected = Some(hit);
        self.dragging = self
            .skeleton
            .get(hit)
            .filter(|b| b.is_root())
            .map(|b| b.id());
        Some(hit)
    }

    /// Move the dragged root's anchor.
    pub fn drag_to(&mut self, x: f32, y: f32) {
        if let Some(bone) = self.dragging.and_then(|id| self.skeleton.get_mut(id)) {
            bone.x = x;
            bone.y = y;
        }
    }

    /// Pointer released: ends drags and scrubbing.
    pub fn release(&mut self) {
        self.dragging = None;
        self.scrubbing = false;
    }

    pub fn begin_scrub(&mut self, x: f32) {
        self.scrubbing = true;
        self.scrub_to(x);
    }

    pub fn scrub_to(&mut self, x: f32) {
        if self.scrubbing {
            self.time = self.cfg.time_at_pixel(x);
        }
    }

    /// Rotate the selected bone by pointer motion since the previous call.
    /// The first call after [`Session::end_rotate_drag`] only records the anchor.
    pub fn rotate_drag(&mut self, x: f32, y: f32) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some((px, py)) = self.rotate_anchor {
            let delta = ((x - px) - (y - py)) * self.cfg.rotate_sensitivity;
            if let Some(bone) = self.skeleton.get_mut(id) {
                bone.angle = (bone.angle + delta).rem_euclid(360.0);
            }
        }
        self.rotate_anchor = Some((x, y));
    }

    pub fn end_rotate_drag(&mut self) {
        self.rotate_anchor = None;
    }

    /// Point the selected bone at the pointer.
    pub fn aim_selected(&mut self, x: f32, y: f32) {
        if let Some(bone) = self.selected.and_then(|id| self.skeleton.get_mut(id)) {
            bone.look_at(x, y);
        }
    }

    /// Record the selected bone's current angle at the current time.
    pub fn key_selected(&mut self) -> Result<Option<BoneId>, SkeletonError> {
        let Some(id) = self.selected else {
            return Ok(None);
        };
        let time = self.time;
        let bone = self
            .skeleton
            .get_mut(id)
            .ok_or(SkeletonError::UnknownBone(id))?;
        bone.timeline.add_keyframe(time, bone.angle)?;
        log::info!(
            "keyframe: {} @ {:.2} angle={:.1}",
            bone.name,
            time,
            bone.angle
        );
        Ok(Some(id))
    }

    /// Delete the selected bone and clear the selection.
    pub fn delete_selected(&mut self, policy: DeletePolicy) -> Result<Vec<BoneId>, SkeletonError> {
        let Some(id) = self.selected.take() else {
            return Ok(Vec::new());
        };
        let removed = self.skeleton.remove_bone(id, policy)?;
        if self.dragging.is_some_and(|d| removed.contains(&d)) {
            self.dragging = None;
        }
        Ok(removed)
    }

    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Advance the playhead while playing, wrapping at `max_time`.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing || !dt.is_finite() {
            return;
        }
        let span = self.cfg.max_time;
        self.time = if span > 0.0 {
            (self.time + dt).rem_euclid(span)
        } else {
            0.0
        };
    }

    /// Per-frame step: timelines drive angles only while playing or scrubbing;
    /// otherwise manual posing stands. World transforms are always refreshed.
    pub fn frame(&mut self) -> Pose {
        if self.playing || self.scrubbing {
            pose::apply_time(&mut self.skeleton, self.time);
        }
        self.skeleton.update();
        Pose::capture(&self.skeleton, self.time)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        project::save_project(&self.skeleton, path)
    }

    /// Replace the skeleton with the project at `path`; on failure the
    /// current skeleton is kept and the (logged) error returned.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, ProjectError> {
        let skeleton = project::load_project_with(path, &self.cfg)?;
        self.skeleton = skeleton;
        self.selected = None;
        self.dragging = None;
        self.rotate_anchor = None;
        Ok(self.skeleton.len())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
