//! Karush-Kuhn-Tucker optimality conditions of the soft-margin dual

/// Check whether one training example satisfies the KKT conditions
///
/// `margin` is y_i * g(x_i), the functional margin of the example under the
/// current dual state. With tolerance ε an example is optimal when
/// - alpha_i ≈ 0 and margin ≥ 1 - ε (outside the margin), or
/// - alpha_i ≈ C and margin ≤ 1 + ε (inside the margin, bounded), or
/// - 0 < alpha_i < C and margin ≈ 1 (on the margin).
pub fn is_satisfied(alpha: f64, margin: f64, c: f64, epsilon: f64) -> bool {
    let at_lower = alpha.abs() < epsilon;
    let at_upper = (alpha - c).abs() < epsilon;
    let in_box = -epsilon < alpha && alpha < c + epsilon;

    (at_lower && margin >= 1.0 - epsilon)
        || (at_upper && margin <= 1.0 + epsilon)
        || (in_box && (margin - 1.0).abs() <= epsilon)
}
