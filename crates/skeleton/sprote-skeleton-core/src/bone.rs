//! A single rigid bone: local state, derived world transform and geometry helpers.

use serde::Serialize;

use crate::ids::BoneId;
use crate::timeline::Timeline;

/// Parameters for creating a bone through [`crate::Skeleton::add_bone`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewBone {
    pub name: String,
    pub length: f32,
    /// Local rotation in degrees.
    pub angle: f32,
    pub parent: Option<BoneId>,
    pub image_path: Option<String>,
    pub offset: (f32, f32),
}

impl NewBone {
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length,
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: BoneId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }
}

/// One rigid segment of the skeleton.
///
/// `x`, `y` are authoritative only for roots; for children they are rewritten
/// from the parent's end point on every [`crate::Skeleton::update`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Bone {
    pub(crate) id: BoneId,
    pub name: String,
    pub length: f32,
    /// Local rotation relative to the parent, degrees.
    pub angle: f32,
    /// Persisted but not used by the transform math.
    pub offset: (f32, f32),
    pub image_path: Option<String>,
    pub x: f32,
    pub y: f32,
    /// World-space orientation, degrees. Derived.
    pub global_angle: f32,
    pub timeline: Timeline,
    pub(crate) parent: Option<BoneId>,
    pub(crate) children: Vec<BoneId>,
}

impl Bone {
    pub(crate) fn new(id: BoneId, spec: NewBone) -> Self {
        Self {
            id,
            name: spec.name,
            length: spec.length.max(0.0),
            angle: spec.angle,
            offset: spec.offset,
            image_path: spec.image_path,
            x: 0.0,
            y: 0.0,
            global_angle: spec.angle,
            timeline: Timeline::new(),
            parent: spec.parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> BoneId {
        self.id
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    /// Direct children in attachment order.
    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// World-space tip of the bone.
    pub fn get_end(&self) -> (f32, f32) {
        let rad = self.global_angle.to_radians();
        (
            self.x + self.length * rad.cos(),
            self.y + self.length * rad.sin(),
        )
    }

    /// Point-in-circle test against the anchor.
    pub fn is_clicked(&self, px: f32, py: f32, radius: f32) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        dx * dx + dy * dy <= radius * radius
    }

    /// Point the bone at a target by overwriting its local angle.
    ///
    /// This bypasses the timeline; the next timeline pass wins again.
    pub fn look_at(&mut self, px: f32, py: f32) {
        let dx = px - self.x;
        let dy = py - self.y;
        self.angle = dy.atan2(dx).to_degrees();
    }
}
