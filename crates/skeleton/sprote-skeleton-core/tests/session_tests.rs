use sprote_skeleton_core::{Config, DeletePolicy, NewBone, Session};
use sprote_test_fixtures::scratch_dir;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn pick_selects_and_drags_roots_only() {
    let mut s = Session::default();
    let root = s.add_bone(NewBone::new("root", 50.0)).unwrap();
    let child = s.add_bone(NewBone::new("child", 30.0).with_parent(root)).unwrap();
    s.frame();

    // The child sits at the root's tip (450, 300).
    assert_eq!(s.pick(451.0, 300.0), Some(child));
    assert_eq!(s.dragging(), None);

    assert_eq!(s.pick(400.0, 302.0), Some(root));
    assert_eq!(s.dragging(), Some(root));
    s.drag_to(100.0, 120.0);
    s.release();
    let pose = s.frame();
    let c = pose.get(child).unwrap();
    assert_eq!((c.x, c.y), (150.0, 120.0));
    assert_eq!(s.dragging(), None);
}

#[test]
fn scrub_maps_pixels_to_clamped_time() {
    let mut s = Session::new(Config {
        fps: 10,
        frame_width: 5.0,
        max_time: 3.0,
        ..Config::default()
    });
    s.scrub_to(100.0);
    assert_eq!(s.time(), 0.0, "not scrubbing yet");
    s.begin_scrub(100.0);
    approx(s.time(), 2.0, 1e-6);
    s.scrub_to(1000.0);
    approx(s.time(), 3.0, 1e-6);
    s.release();
    assert!(!s.is_scrubbing());
}

#[test]
fn keying_and_playback() {
    let mut s = Session::default();
    let arm = s.add_bone(NewBone::new("arm", 40.0)).unwrap();
    s.select(Some(arm));

    s.skeleton_mut().get_mut(arm).unwrap().angle = 0.0;
    s.key_selected().unwrap();
    s.set_time(2.0);
    s.skeleton_mut().get_mut(arm).unwrap().angle = 100.0;
    s.key_selected().unwrap();
    assert_eq!(s.skeleton().get(arm).unwrap().timeline.len(), 2);

    // Paused: manual angle stands regardless of the playhead.
    s.set_time(1.0);
    s.skeleton_mut().get_mut(arm).unwrap().angle = 7.0;
    assert_eq!(s.frame().get(arm).unwrap().angle, 7.0);

    s.toggle_play();
    approx(s.frame().get(arm).unwrap().angle, 50.0, 1e-4);
    s.advance(0.5);
    approx(s.frame().get(arm).unwrap().angle, 75.0, 1e-4);
}

#[test]
fn rotate_drag_accumulates_and_wraps() {
    let mut s = Session::default();
    let arm = s.add_bone(NewBone::new("arm", 40.0)).unwrap();
    s.select(Some(arm));
    s.rotate_drag(10.0, 10.0);
    assert_eq!(s.skeleton().get(arm).unwrap().angle, 0.0);
    s.rotate_drag(20.0, 10.0);
    approx(s.skeleton().get(arm).unwrap().angle, 15.0, 1e-5);
    s.rotate_drag(20.0, 30.0);
    approx(s.skeleton().get(arm).unwrap().angle, 345.0, 1e-4);
    s.end_rotate_drag();
    s.rotate_drag(500.0, 500.0);
    approx(s.skeleton().get(arm).unwrap().angle, 345.0, 1e-4);
}

#[test]
fn aim_overrides_until_next_timeline_pass() {
    let mut s = Session::default();
    let arm = s.add_bone(NewBone::new("arm", 40.0)).unwrap();
    s.skeleton_mut().get_mut(arm).unwrap().timeline.add_keyframe(0.0, 10.0).unwrap();
    s.select(Some(arm));
    s.aim_selected(400.0, 400.0);
    approx(s.frame().get(arm).unwrap().angle, 90.0, 1e-4);
    s.begin_scrub(0.0);
    approx(s.frame().get(arm).unwrap().angle, 10.0, 1e-4);
}

#[test]
fn delete_selected_clears_selection() {
    let mut s = Session::default();
    let a = s.add_bone(NewBone::new("a", 10.0)).unwrap();
    s.add_bone(NewBone::new("b", 10.0).with_parent(a)).unwrap();
    s.select(Some(a));
    let removed = s.delete_selected(DeletePolicy::Shallow).unwrap();
    assert_eq!(removed.len(), 2);
    assert_eq!(s.selected(), None);
    assert!(s.skeleton().is_empty());
    assert!(s.delete_selected(DeletePolicy::Shallow).unwrap().is_empty());
}

#[test]
fn save_and_load_through_session() {
    let dir = scratch_dir("session").unwrap();
    let path = dir.join("s.json");
    let mut s = Session::default();
    let a = s.add_bone(NewBone::new("a", 10.0)).unwrap();
    s.select(Some(a));
    s.save(&path).unwrap();

    let mut other = Session::default();
    assert_eq!(other.load(&path).unwrap(), 1);
    assert_eq!(other.selected(), None);
    assert!(other.load(dir.join("missing.json")).is_err());
    assert_eq!(other.skeleton().len(), 1, "failed load keeps current skeleton");
}

#[test]
fn loaded_project_spawns_on_session_canvas() {
    let dir = scratch_dir("session-canvas").unwrap();
    let path = dir.join("wide.json");
    let cfg = Config {
        canvas_width: 1000,
        canvas_height: 1000,
        ..Config::default()
    };
    let mut s = Session::new(cfg.clone());
    s.add_bone(NewBone::new("a", 10.0)).unwrap();
    s.save(&path).unwrap();

    let mut other = Session::new(cfg);
    other.load(&path).unwrap();
    let b = other.add_bone(NewBone::new("b", 10.0)).unwrap();
    let bone = other.skeleton().get(b).unwrap();
    assert_eq!((bone.x, bone.y), (500.0, 500.0));
}
