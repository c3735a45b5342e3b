use sprote_skeleton_core::{Keyframe, Timeline};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn mk_timeline(keys: &[(f32, f32)]) -> Timeline {
    let mut tl = Timeline::new();
    for &(t, a) in keys {
        tl.add_keyframe(t, a).expect("valid keyframe");
    }
    tl
}

#[test]
fn exact_at_every_keyframe() {
    let tl = mk_timeline(&[(0.0, 10.0), (0.4, -35.0), (1.3, 270.0), (2.0, 5.5)]);
    for k in tl.keyframes() {
        assert_eq!(tl.get_angle_at(k.time, None), k.angle);
    }
}

#[test]
fn between_keys_is_linear_and_bounded() {
    let tl = mk_timeline(&[(1.0, 20.0), (3.0, 80.0), (4.0, 40.0)]);
    approx(tl.get_angle_at(2.0, None), 50.0, 1e-4);
    approx(tl.get_angle_at(1.5, None), 35.0, 1e-4);
    approx(tl.get_angle_at(3.25, None), 70.0, 1e-4);

    let keys = tl.keyframes().to_vec();
    for pair in keys.windows(2) {
        let (k0, k1) = (pair[0], pair[1]);
        let lo = k0.angle.min(k1.angle);
        let hi = k0.angle.max(k1.angle);
        for step in 1..20 {
            let t = k0.time + (k1.time - k0.time) * step as f32 / 20.0;
            let v = tl.get_angle_at(t, None);
            assert!(v >= lo - 1e-4 && v <= hi + 1e-4, "t={t} v={v} not in [{lo},{hi}]");
        }
    }
}

#[test]
fn flat_extrapolation_on_both_sides() {
    let tl = mk_timeline(&[(2.0, 15.0), (5.0, 60.0)]);
    assert_eq!(tl.get_angle_at(0.0, None), 15.0);
    assert_eq!(tl.get_angle_at(1.999, Some(99.0)), 15.0);
    assert_eq!(tl.get_angle_at(5.0, None), 60.0);
    assert_eq!(tl.get_angle_at(100.0, None), 60.0);
}

#[test]
fn single_keyframe_is_constant() {
    let tl = mk_timeline(&[(1.0, 42.0)]);
    for t in [0.0, 1.0, 7.5] {
        assert_eq!(tl.get_angle_at(t, Some(0.0)), 42.0);
    }
}

#[test]
fn insertion_order_does_not_matter() {
    let forward = mk_timeline(&[(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)]);
    let shuffled = mk_timeline(&[(2.0, 30.0), (0.0, 0.0), (1.0, 10.0)]);
    assert_eq!(forward.keyframes(), shuffled.keyframes());
    assert_eq!(
        shuffled.keyframes().first().copied(),
        Some(Keyframe::new(0.0, 0.0))
    );
}

#[test]
fn raw_degrees_no_shortest_arc() {
    let tl = mk_timeline(&[(0.0, 350.0), (1.0, 10.0)]);
    approx(tl.get_angle_at(0.25, None), 265.0, 1e-3);
    approx(tl.get_angle_at(0.5, None), 180.0, 1e-3);
}
