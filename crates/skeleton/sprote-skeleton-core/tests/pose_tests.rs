use sprote_skeleton_core::{evaluate, DeletePolicy, NewBone, Skeleton};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn child_derives_from_root_end_point() {
    let mut s = Skeleton::new();
    let root = s.add_bone(NewBone::new("root", 80.0).with_angle(30.0)).unwrap();
    let child = s
        .add_bone(NewBone::new("child", 50.0).with_angle(20.0).with_parent(root))
        .unwrap();
    {
        let r = s.get_mut(root).unwrap();
        r.x = 100.0;
        r.y = 100.0;
    }
    s.update();

    let r = s.get(root).unwrap();
    let c = s.get(child).unwrap();
    approx(r.global_angle, 30.0, 1e-5);
    approx(c.x, 100.0 + 80.0 * 30f32.to_radians().cos(), 1e-3);
    approx(c.y, 100.0 + 80.0 * 30f32.to_radians().sin(), 1e-3);
    approx(c.global_angle, 50.0, 1e-5);

    let (ex, ey) = c.get_end();
    approx(ex, c.x + 50.0 * 50f32.to_radians().cos(), 1e-3);
    approx(ey, c.y + 50.0 * 50f32.to_radians().sin(), 1e-3);
}

#[test]
fn update_is_idempotent() {
    let mut s = Skeleton::new();
    let a = s.add_bone(NewBone::new("a", 30.0).with_angle(12.0)).unwrap();
    let b = s.add_bone(NewBone::new("b", 25.0).with_angle(-40.0).with_parent(a)).unwrap();
    s.add_bone(NewBone::new("c", 10.0).with_angle(75.0).with_parent(b)).unwrap();
    s.add_bone(NewBone::new("d", 5.0).with_angle(5.0)).unwrap();

    s.update();
    let first: Vec<(f32, f32, f32)> = s.bones().iter().map(|b| (b.x, b.y, b.global_angle)).collect();
    s.update();
    let second: Vec<(f32, f32, f32)> = s.bones().iter().map(|b| (b.x, b.y, b.global_angle)).collect();
    assert_eq!(first, second);
}

#[test]
fn root_anchor_is_authoritative() {
    let mut s = Skeleton::new();
    let a = s.add_bone(NewBone::new("a", 30.0)).unwrap();
    {
        let r = s.get_mut(a).unwrap();
        r.x = 0.0;
        r.y = 0.0;
    }
    s.update();
    let r = s.get(a).unwrap();
    assert_eq!((r.x, r.y), (0.0, 0.0));
}

#[test]
fn evaluate_drives_angles_from_timelines() {
    let mut s = Skeleton::new();
    let a = s.add_bone(NewBone::new("a", 30.0)).unwrap();
    let b = s.add_bone(NewBone::new("b", 30.0).with_parent(a)).unwrap();
    s.get_mut(a).unwrap().timeline.add_keyframe(0.0, 0.0).unwrap();
    s.get_mut(a).unwrap().timeline.add_keyframe(1.0, 90.0).unwrap();
    s.get_mut(b).unwrap().timeline.add_keyframe(0.0, 10.0).unwrap();

    let pose = evaluate(&mut s, 0.5);
    approx(pose.get(a).unwrap().global_angle, 45.0, 1e-4);
    approx(pose.get(b).unwrap().global_angle, 55.0, 1e-4);
    assert_eq!(pose.bones.len(), 2);
    assert_eq!(pose.bones[0].depth, 0);
    assert_eq!(pose.bones[1].depth, 1);
}

#[test]
fn shallow_delete_leaves_dangling_grandchild() {
    let mut s = Skeleton::new();
    let bone = s.add_bone(NewBone::new("bone", 10.0)).unwrap();
    let c1 = s.add_bone(NewBone::new("c1", 10.0).with_parent(bone)).unwrap();
    let c2 = s.add_bone(NewBone::new("c2", 10.0).with_parent(bone)).unwrap();
    let grand = s.add_bone(NewBone::new("g", 10.0).with_parent(c1)).unwrap();

    let removed = s.remove_bone(bone, DeletePolicy::Shallow).unwrap();
    assert_eq!(removed, vec![bone, c1, c2]);
    assert_eq!(s.len(), 1);
    let g = s.get(grand).unwrap();
    assert_eq!(g.parent(), Some(c1));
    assert!(!s.contains(c1));
    assert_eq!(s.orphans(), vec![grand]);
    assert!(s.roots().is_empty());

    // Orphans are not reachable from a root and keep their last pose.
    let before = (g.x, g.y);
    s.update();
    let g = s.get(grand).unwrap();
    assert_eq!((g.x, g.y), before);
}

#[test]
fn cascade_delete_removes_grandchild_too() {
    let mut s = Skeleton::new();
    let bone = s.add_bone(NewBone::new("bone", 10.0)).unwrap();
    let c1 = s.add_bone(NewBone::new("c1", 10.0).with_parent(bone)).unwrap();
    s.add_bone(NewBone::new("c2", 10.0).with_parent(bone)).unwrap();
    s.add_bone(NewBone::new("g", 10.0).with_parent(c1)).unwrap();
    let keep = s.add_bone(NewBone::new("other", 10.0)).unwrap();

    let removed = s.remove_bone(bone, DeletePolicy::Cascade).unwrap();
    assert_eq!(removed.len(), 4);
    assert_eq!(s.roots(), vec![keep]);
    assert!(s.orphans().is_empty());
}

#[test]
fn deleting_a_child_detaches_it_from_parent() {
    let mut s = Skeleton::new();
    let a = s.add_bone(NewBone::new("a", 10.0)).unwrap();
    let b = s.add_bone(NewBone::new("b", 10.0).with_parent(a)).unwrap();
    s.remove_bone(b, DeletePolicy::Shallow).unwrap();
    assert!(s.get(a).unwrap().children().is_empty());
}
