use std::f64::consts::PI;

use active_arm::simulation::kinematics::{forward, forward_jacobian, hand_position};

#[test]
fn test_hand_stays_on_unit_circle() {
    for i in -40..=40 {
        let angle = f64::from(i) * PI / 16.0;
        let [x, y] = hand_position(angle, 1.0);
        assert!(
            (x.hypot(y) - 1.0).abs() < 1e-9,
            "hand left the unit circle at angle {angle}"
        );
    }
}

#[test]
fn test_arm_length_scales_reach() {
    let [x, y] = hand_position(-0.35 * PI, 2.5);
    assert!((x.hypot(y) - 2.5).abs() < 1e-9);
    let [ux, uy] = forward(-0.35 * PI);
    assert!((x - 2.5 * ux).abs() < 1e-12);
    assert!((y - 2.5 * uy).abs() < 1e-12);
}

#[test]
fn test_jacobian_is_orthogonal_to_hand() {
    for i in 0..16 {
        let angle = f64::from(i) * PI / 8.0;
        let [x, y] = forward(angle);
        let [jx, jy] = forward_jacobian(angle);
        assert!((x * jx + y * jy).abs() < 1e-12);
        assert!((jx.hypot(jy) - 1.0).abs() < 1e-12);
    }
}
