//! Skeleton: a flat arena of bones forming a rooted forest.
//!
//! Bones live in insertion order (which is also draw and save order) and refer
//! to each other by [`BoneId`]. The parent link is a plain id, the children
//! list is traversal adjacency; neither owns anything.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::bone::{Bone, NewBone};
use crate::config::Config;
use crate::error::SkeletonError;
use crate::ids::{BoneId, IdAllocator};

/// What happens to descendants when a bone is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the bone and its direct children only. Grandchildren stay in the
    /// arena with a parent id that no longer resolves (see [`Skeleton::orphans`]).
    #[default]
    Shallow,
    /// Remove the bone and every transitive descendant.
    Cascade,
}

#[derive(Clone, Debug)]
pub struct Skeleton {
    bones: Vec<Bone>,
    index: HashMap<BoneId, usize>,
    ids: IdAllocator,
    /// Anchor assigned to newly created bones.
    spawn_point: (f32, f32),
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: &Config) -> Self {
        Self {
            bones: Vec::new(),
            index: HashMap::new(),
            ids: IdAllocator::new(),
            spawn_point: cfg.canvas_center(),
        }
    }

    /// Create a bone anchored at the spawn point and attach it to its parent.
    pub fn add_bone(&mut self, spec: NewBone) -> Result<BoneId, SkeletonError> {
        if let Some(parent) = spec.parent {
            if !self.contains(parent) {
                return Err(SkeletonError::UnknownBone(parent));
            }
        }
        let id = self.ids.alloc_bone();
        let mut bone = Bone::new(id, spec);
        bone.x = self.spawn_point.0;
        bone.y = self.spawn_point.1;
        if let Some(parent) = bone.parent {
            let pi = self.index[&parent];
            self.bones[pi].children.push(id);
        }
        self.index.insert(id, self.bones.len());
        self.bones.push(bone);
        Ok(id)
    }

    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.index.get(&id).map(|&i| &self.bones[i])
    }

    pub fn get_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.index.get(&id).map(|&i| &mut self.bones[i])
    }

    pub fn contains(&self, id: BoneId) -> bool {
        self.index.contains_key(&id)
    }

    /// All bones in insertion order.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bones_mut(&mut self) -> impl Iterator<Item = &mut Bone> {
        self.bones.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Bones without a parent, in insertion order.
    pub fn roots(&self) -> Vec<BoneId> {
        self.bones
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| b.id)
            .collect()
    }

    /// Bones whose parent id no longer resolves. They are skipped by
    /// [`Skeleton::update`] and keep their last pose.
    pub fn orphans(&self) -> Vec<BoneId> {
        self.bones
            .iter()
            .filter(|b| matches!(b.parent, Some(p) if !self.contains(p)))
            .map(|b| b.id)
            .collect()
    }

    /// First bone with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<BoneId> {
        self.bones.iter().find(|b| b.name == name).map(|b| b.id)
    }

    /// Names held by more than one bone, sorted.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut dups = BTreeSet::new();
        for b in &self.bones {
            if !seen.insert(b.name.as_str()) {
                dups.insert(b.name.clone());
            }
        }
        dups.into_iter().collect()
    }

    /// Every transitive descendant of `id`, depth-first.
    pub fn descendants(&self, id: BoneId) -> Vec<BoneId> {
        let mut out = Vec::new();
        let Some(bone) = self.get(id) else {
            return out;
        };
        let mut stack: Vec<BoneId> = bone.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(b) = self.get(next) {
                stack.extend(b.children.iter().rev().copied());
            }
        }
        out
    }

    /// Roots and their subtrees in draw order, paired with tree depth.
    pub fn draw_order(&self) -> Vec<(BoneId, usize)> {
        let mut out = Vec::with_capacity(self.bones.len());
        for root in self.roots() {
            let mut stack = vec![(root, 0usize)];
            while let Some((id, depth)) = stack.pop() {
                out.push((id, depth));
                if let Some(b) = self.get(id) {
                    stack.extend(b.children.iter().rev().map(|&c| (c, depth + 1)));
                }
            }
        }
        out
    }

    /// Move `bone` under `parent` (or make it a root with `None`).
    pub fn reparent(&mut self, bone: BoneId, parent: Option<BoneId>) -> Result<(), SkeletonError> {
        if !self.contains(bone) {
            return Err(SkeletonError::UnknownBone(bone));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SkeletonError::UnknownBone(p));
            }
            if p == bone || self.is_ancestor(bone, p) {
                return Err(SkeletonError::CycleDetected { bone, parent: p });
            }
        }

        let bi = self.index[&bone];
        if let Some(old) = self.bones[bi].parent {
            if let Some(&oi) = self.index.get(&old) {
                self.bones[oi].children.retain(|&c| c != bone);
            }
        }
        self.bones[bi].parent = parent;
        if let Some(p) = parent {
            let pi = self.index[&p];
            self.bones[pi].children.push(bone);
        }
        Ok(())
    }

    /// True when `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: BoneId, id: BoneId) -> bool {
        let mut cursor = self.get(id).and_then(|b| b.parent);
        // Bounded walk; the chain can never be longer than the arena.
        for _ in 0..=self.bones.len() {
            match cursor {
                Some(p) if p == ancestor => return true,
                Some(p) => cursor = self.get(p).and_then(|b| b.parent),
                None => return false,
            }
        }
        false
    }

    /// Remove a bone according to `policy`, returning the removed ids in arena order.
    pub fn remove_bone(
        &mut self,
        id: BoneId,
        policy: DeletePolicy,
    ) -> Result<Vec<BoneId>, SkeletonError> {
        if !self.contains(id) {
            return Err(SkeletonError::UnknownBone(id));
        }
        let mut doomed: BTreeSet<BoneId> = BTreeSet::new();
        doomed.insert(id);
        match policy {
            DeletePolicy::Shallow => {
                doomed.extend(
                    self.bones
                        .iter()
                        .filter(|b| b.parent == Some(id))
                        .map(|b| b.id),
                );
            }
            DeletePolicy::Cascade => doomed.extend(self.descendants(id)),
        }

        let removed: Vec<BoneId> = self
            .bones
            .iter()
            .filter(|b| doomed.contains(&b.id))
            .map(|b| b.id)
            .collect();
        self.bones.retain(|b| !doomed.contains(&b.id));
        for b in &mut self.bones {
            b.children.retain(|c| !doomed.contains(c));
        }
        self.reindex();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.bones.clear();
        self.index.clear();
        self.ids.reset();
    }

    /// Topmost bone (last added) whose anchor circle contains the point.
    /// Orphans are not drawn and cannot be picked.
    pub fn pick(&self, x: f32, y: f32, radius: f32) -> Option<BoneId> {
        let drawn: HashSet<BoneId> = self.draw_order().into_iter().map(|(id, _)| id).collect();
        self.bones
            .iter()
            .rev()
            .filter(|b| drawn.contains(&b.id))
            .find(|b| b.is_clicked(x, y, radius))
            .map(|b| b.id)
    }

    /// Recompute world transforms from every root down.
    ///
    /// Roots keep their stored anchor; children take their parent's end point
    /// and accumulate the parent's global angle.
    pub fn update(&mut self) {
        for root in self.roots() {
            self.update_from(root);
        }
    }

    fn update_from(&mut self, start: BoneId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(&i) = self.index.get(&id) else {
                continue;
            };
            let parent_state = self.bones[i]
                .parent
                .and_then(|p| self.index.get(&p))
                .map(|&pi| (self.bones[pi].get_end(), self.bones[pi].global_angle));

            let bone = &mut self.bones[i];
            match parent_state {
                Some(((ex, ey), parent_angle)) => {
                    bone.x = ex;
                    bone.y = ey;
                    bone.global_angle = parent_angle + bone.angle;
                }
                None => bone.global_angle = bone.angle,
            }
            stack.extend(bone.children.iter().rev().copied());
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, b) in self.bones.iter().enumerate() {
            self.index.insert(b.id, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Skeleton, BoneId, BoneId, BoneId) {
        let mut s = Skeleton::new();
        let a = s.add_bone(NewBone::new("a", 10.0)).unwrap();
        let b = s.add_bone(NewBone::new("b", 10.0).with_parent(a)).unwrap();
        let c = s.add_bone(NewBone::new("c", 10.0).with_parent(b)).unwrap();
        (s, a, b, c)
    }

    #[test]
    fn new_bones_spawn_at_canvas_center() {
        let (s, a, _, _) = chain();
        let root = s.get(a).unwrap();
        assert_eq!((root.x, root.y), (400.0, 300.0));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut s = Skeleton::new();
        let err = s.add_bone(NewBone::new("x", 1.0).with_parent(BoneId(9)));
        assert_eq!(err, Err(SkeletonError::UnknownBone(BoneId(9))));
        assert!(s.is_empty());
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut s, a, _, c) = chain();
        assert_eq!(
            s.reparent(a, Some(c)),
            Err(SkeletonError::CycleDetected { bone: a, parent: c })
        );
        assert_eq!(
            s.reparent(a, Some(a)),
            Err(SkeletonError::CycleDetected { bone: a, parent: a })
        );
    }

    #[test]
    fn reparent_moves_adjacency() {
        let (mut s, a, b, c) = chain();
        s.reparent(c, Some(a)).unwrap();
        assert_eq!(s.get(a).unwrap().children(), &[b, c]);
        assert!(s.get(b).unwrap().children().is_empty());
        s.reparent(c, None).unwrap();
        assert_eq!(s.roots(), vec![a, c]);
    }

    #[test]
    fn draw_order_is_depth_first() {
        let (mut s, a, b, c) = chain();
        let d = s.add_bone(NewBone::new("d", 1.0).with_parent(a)).unwrap();
        assert_eq!(s.draw_order(), vec![(a, 0), (b, 1), (c, 2), (d, 1)]);
    }

    #[test]
    fn cascade_removes_everything_below() {
        let (mut s, a, b, c) = chain();
        let removed = s.remove_bone(a, DeletePolicy::Cascade).unwrap();
        assert_eq!(removed, vec![a, b, c]);
        assert!(s.is_empty());
    }

    #[test]
    fn duplicate_names_are_reported() {
        let mut s = Skeleton::new();
        s.add_bone(NewBone::new("arm", 1.0)).unwrap();
        s.add_bone(NewBone::new("arm", 1.0)).unwrap();
        s.add_bone(NewBone::new("leg", 1.0)).unwrap();
        assert_eq!(s.duplicate_names(), vec!["arm".to_string()]);
    }

    #[test]
    fn pick_prefers_last_added() {
        let mut s = Skeleton::new();
        let _a = s.add_bone(NewBone::new("a", 1.0)).unwrap();
        let b = s.add_bone(NewBone::new("b", 1.0)).unwrap();
        assert_eq!(s.pick(402.0, 301.0, 10.0), Some(b));
        assert_eq!(s.pick(0.0, 0.0, 10.0), None);
    }

    #[test]
    fn orphans_cannot_be_picked() {
        let (mut s, a, _, c) = chain();
        s.remove_bone(a, DeletePolicy::Shallow).unwrap();
        assert_eq!(s.orphans(), vec![c]);
        let orphan = s.get(c).unwrap();
        assert_eq!(s.pick(orphan.x, orphan.y, 10.0), None);
    }
}
