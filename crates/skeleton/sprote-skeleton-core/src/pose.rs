//! Pose evaluation: timelines + time -> world transforms -> render-ready snapshot.
//!
//! The evaluator takes the skeleton and the query time explicitly, so the same
//! calls serve interactive scrubbing and batch export.

use serde::{Deserialize, Serialize};

use crate::ids::BoneId;
use crate::skeleton::Skeleton;

/// World-space state of one bone after evaluation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PosedBone {
    pub id: BoneId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub end: (f32, f32),
    pub angle: f32,
    pub global_angle: f32,
    pub length: f32,
    pub image_path: Option<String>,
    /// Distance from the root; roots are 0.
    pub depth: usize,
}

/// Immutable snapshot of a fully evaluated skeleton, in draw order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub time: f32,
    pub bones: Vec<PosedBone>,
}

impl Pose {
    /// Capture the current world transforms of every bone reachable from a root.
    pub fn capture(skeleton: &Skeleton, time: f32) -> Self {
        let bones = skeleton
            .draw_order()
            .into_iter()
            .filter_map(|(id, depth)| {
                let b = skeleton.get(id)?;
                Some(PosedBone {
                    id,
                    name: b.name.clone(),
                    x: b.x,
                    y: b.y,
                    end: b.get_end(),
                    angle: b.angle,
                    global_angle: b.global_angle,
                    length: b.length,
                    image_path: b.image_path.clone(),
                    depth,
                })
            })
            .collect();
        Self { time, bones }
    }

    pub fn get(&self, id: BoneId) -> Option<&PosedBone> {
        self.bones.iter().find(|b| b.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// Overwrite every bone's local angle with its timeline sample at `time`.
/// Bones without keyframes keep their current (manual) angle.
pub fn apply_time(skeleton: &mut Skeleton, time: f32) {
    for bone in skeleton.bones_mut() {
        bone.angle = bone.timeline.get_angle_at(time, Some(bone.angle));
    }
}

/// Apply timelines at `time`, propagate transforms from every root, and snapshot.
pub fn evaluate(skeleton: &mut Skeleton, time: f32) -> Pose {
    apply_time(skeleton, time);
    skeleton.update();
    log::trace!("evaluated {} bones at t={time:.3}", skeleton.len());
    Pose::capture(skeleton, time)
}

/// Evaluate a private copy so the caller's skeleton is left untouched.
pub fn evaluate_detached(skeleton: &Skeleton, time: f32) -> Pose {
    let mut scratch = skeleton.clone();
    evaluate(&mut scratch, time)
}

/// Latest keyframe time across all bones, if any bone is keyed.
pub fn animation_end(skeleton: &Skeleton) -> Option<f32> {
    skeleton
        .bones()
        .iter()
        .filter_map(|b| b.timeline.end_time())
        .reduce(f32::max)
}
