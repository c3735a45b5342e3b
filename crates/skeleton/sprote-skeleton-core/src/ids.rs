//! Identifiers and a simple allocator for bones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for a bone inside a [`crate::Skeleton`].
///
/// Handles are never reused within one skeleton, so a handle kept by a
/// detached child keeps pointing at "nothing" after its parent is removed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bone#{}", self.0)
    }
}

/// Monotonic allocator for BoneId.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_bone: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_bone(&mut self) -> BoneId {
        let id = BoneId(self.next_bone);
        self.next_bone = self.next_bone.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
