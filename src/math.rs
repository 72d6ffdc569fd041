use approx::AbsDiffEq;

pub trait Mix {
    type Output;

    fn mix(self, b: Self, t: f32) -> Self::Output;
}

impl Mix for f32 {
    type Output = f32;

    #[inline]
    fn mix(self, y: f32, t: f32) -> f32 {
        self * (1.0 - t) + y * t
    }
}

/// Smooth minimum of two distances with blend radius `k`.
///
/// The result is always bounded above by `min(a, b)`, and once `k` drops
/// below the gap between the two inputs it is exactly the hard minimum. A
/// blend radius of zero or less degenerates to the hard minimum instead of
/// dividing by zero.
pub fn smin(a: f32, b: f32, k: f32) -> f32 {
    if k <= f32::default_epsilon() {
        return a.min(b);
    }

    let h = (0.5 + 0.5 * (b - a) / k).clamp(0., 1.);
    f32::mix(b, a, h) - k * h * (1.0 - h)
}

/// Fold `x` into the periodic cell `[-period/2, period/2)` around the
/// origin. Euclidean remainder, so negative coordinates fold the same way
/// positive ones do.
pub fn wrap(x: f32, period: f32) -> f32 {
    let half = 0.5 * period;
    (x + half).rem_euclid(period) - half
}

#[test]
fn test_mix() {
    assert_eq!(f32::mix(0., 10., 0.5), 5.);
    assert_eq!(f32::mix(2., 4., 0.), 2.);
    assert_eq!(f32::mix(2., 4., 1.), 4.);
}

#[test]
fn test_smin_bounds() {
    let pairs = [(0.5, 2.0), (2.0, 0.5), (-1.0, 1.0), (3.0, 3.0), (-2.5, -0.1)];
    for (a, b) in pairs {
        assert!(smin(a, b, 0.8) <= f32::min(a, b) + 1e-6);
    }
}

#[test]
fn test_smin_limit() {
    // exact once the blend radius is below the gap between the inputs
    approx::assert_abs_diff_eq!(smin(0.75, 1.5, 0.5), 0.75);

    // inside the blend region it dips below the hard minimum
    assert!(smin(0.75, 1.5, 2.0) < 0.75);

    // a zero radius is the hard minimum, not a division by zero
    assert_eq!(smin(0.75, 1.5, 0.), 0.75);
    assert_eq!(smin(1.5, 0.75, 0.), 0.75);
}

#[test]
fn test_smin_converges_to_min() {
    // the dip below the hard minimum is at most k/4, so shrinking the blend
    // radius recovers the hard minimum in the limit
    for (a, b) in [(1.0f32, 1.0), (0.3, 0.7), (-0.5, 0.1)] {
        for k in [1.0f32, 0.25, 0.05, 1e-3] {
            let s = smin(a, b, k);
            assert!(s <= a.min(b) + 1e-6);
            assert!(s >= a.min(b) - k / 4. - 1e-6);
        }
    }
}

#[test]
fn test_wrap() {
    assert_eq!(wrap(0., 3.), 0.);
    assert_eq!(wrap(-2.0, 3.), 1.0);
    assert_eq!(wrap(3.75, 3.), 0.75);
    approx::assert_abs_diff_eq!(wrap(1.6, 3.), -1.4, epsilon = 1e-6);

    // wrapping is periodic
    approx::assert_abs_diff_eq!(wrap(0.7 + 9., 3.), wrap(0.7, 3.), epsilon = 1e-6);
}
