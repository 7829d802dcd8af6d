//! Forward model of the one-joint arm: joint angle to visual hand position.

/// Unit-circle position of the hand for a joint angle.
#[inline]
#[must_use]
pub fn forward(angle: f64) -> [f64; 2] {
    [angle.cos(), angle.sin()]
}

/// Derivative of [`forward`] with respect to the angle.
#[inline]
#[must_use]
pub fn forward_jacobian(angle: f64) -> [f64; 2] {
    [-angle.sin(), angle.cos()]
}

/// Hand position for an arm of the given length.
#[inline]
#[must_use]
pub fn hand_position(angle: f64, arm_length: f64) -> [f64; 2] {
    let [x, y] = forward(angle);
    [arm_length * x, arm_length * y]
}
