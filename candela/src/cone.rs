use std::f32::consts::PI;

use glam::{Quat, Vec3};

/// Angular summary of the directions a set of emitters may emit toward.
///
/// `axis` is the central direction, `theta_o` bounds the spread of the
/// emitters' normals around it and `theta_e` bounds the emission lobe around
/// each normal. Both angles are radians in `[0, PI]`; the axis is unit
/// length, or zero for the empty cone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionCone {
    axis: Vec3,
    theta_o: f32,
    theta_e: f32,
}

impl EmissionCone {
    pub fn new(axis: Vec3, theta_o: f32, theta_e: f32) -> Self {
        debug_assert!(axis == Vec3::ZERO || axis.is_normalized());
        debug_assert!((0.0..=PI).contains(&theta_o));
        debug_assert!((0.0..=PI).contains(&theta_e));

        Self {
            axis,
            theta_o,
            theta_e,
        }
    }

    /// The degenerate cone; identity element of [`Self::union()`].
    pub fn empty() -> Self {
        Self {
            axis: Vec3::ZERO,
            theta_o: 0.0,
            theta_e: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.axis == Vec3::ZERO
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn theta_o(&self) -> f32 {
        self.theta_o
    }

    pub fn theta_e(&self) -> f32 {
        self.theta_e
    }

    /// Returns a cone covering both `self` and `other`.
    ///
    /// The result is conservative: it always contains both inputs, but is
    /// not guaranteed to be the minimal such cone.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }

        if other.is_empty() {
            return self;
        }

        // `a` is the wider of the two cones
        let (a, b) = if self.theta_o >= other.theta_o {
            (self, other)
        } else {
            (other, self)
        };

        let theta_d = a.axis.dot(b.axis).clamp(-1.0, 1.0).acos();
        let theta_e = a.theta_e.max(b.theta_e);

        if (theta_d + b.theta_o).min(PI) <= a.theta_o {
            return Self {
                axis: a.axis,
                theta_o: a.theta_o,
                theta_e,
            };
        }

        let theta_o = 0.5 * (a.theta_o + theta_d + b.theta_o);

        if theta_o >= PI {
            return Self {
                axis: a.axis,
                theta_o: PI,
                theta_e,
            };
        }

        // Tilt `a`'s axis toward `b`'s by however much the half-angle grew
        let rotation_axis = a.axis.cross(b.axis);

        let rotation_axis = if rotation_axis.length_squared() > 1e-12 {
            rotation_axis.normalize()
        } else {
            a.axis.any_orthonormal_vector()
        };

        let axis = Quat::from_axis_angle(rotation_axis, theta_o - a.theta_o)
            * a.axis;

        Self {
            axis: axis.normalize(),
            theta_o,
            theta_e,
        }
    }

    /// Whether every direction bounded by `other` is also bounded by `self`,
    /// up to a small angular epsilon.
    pub fn contains(&self, other: &Self) -> bool {
        const EPSILON: f32 = 1e-4;

        if other.is_empty() {
            return true;
        }

        if self.is_empty() {
            return false;
        }

        if other.theta_e > self.theta_e + EPSILON {
            return false;
        }

        let theta_d = self.axis.dot(other.axis).clamp(-1.0, 1.0).acos();

        self.theta_o + EPSILON >= PI
            || theta_d + other.theta_o <= self.theta_o + EPSILON
    }

    /// Scalar angular measure used by the split cost heuristic.
    ///
    /// Zero for the zero-angle cone, increasing in both `theta_o` and
    /// `theta_e`:
    ///
    /// ```text
    /// M = 2*PI*(1 - cos(t_o))
    ///   + PI/2 * (2*t_w*sin(t_o) - cos(t_o - 2*t_w) + 2*t_o*sin(t_o) + cos(t_o))
    /// ```
    ///
    /// with `t_w = min(t_o + t_e, PI)`.
    pub fn measure(&self) -> f32 {
        let theta_o = self.theta_o;
        let theta_w = (theta_o + self.theta_e).min(PI);
        let (sin_o, cos_o) = theta_o.sin_cos();

        2.0 * PI * (1.0 - cos_o)
            + 0.5
                * PI
                * (2.0 * theta_w * sin_o - (theta_o - 2.0 * theta_w).cos()
                    + 2.0 * theta_o * sin_o
                    + cos_o)
    }
}

impl Default for EmissionCone {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn cone(axis: Vec3, theta_o: f32, theta_e: f32) -> EmissionCone {
        EmissionCone::new(axis.normalize(), theta_o, theta_e)
    }

    #[test]
    fn union_with_empty() {
        let target = cone(Vec3::Z, 0.5, 0.25);

        assert_eq!(target, target.union(EmissionCone::empty()));
        assert_eq!(target, EmissionCone::empty().union(target));
    }

    #[test]
    fn union_contains_both_inputs() {
        let cases = [
            (cone(Vec3::Z, 0.1, 0.5), cone(Vec3::X, 0.2, 0.1)),
            (cone(Vec3::Z, 1.0, 0.0), cone(-Vec3::Z, 0.3, 1.2)),
            (cone(vec3(1.0, 1.0, 0.0), 0.5, 0.5), cone(Vec3::Y, 0.4, 0.2)),
            (cone(Vec3::X, 0.0, PI / 2.0), cone(Vec3::X, 0.0, PI / 2.0)),
        ];

        for (a, b) in cases {
            let union = a.union(b);

            assert!(union.contains(&a), "{union:?} does not contain {a:?}");
            assert!(union.contains(&b), "{union:?} does not contain {b:?}");

            // Order shouldn't matter for containment
            let union = b.union(a);

            assert!(union.contains(&a));
            assert!(union.contains(&b));
        }
    }

    #[test]
    fn union_of_a_cone_with_itself() {
        let target = cone(Vec3::Y, 0.7, 0.3);
        let union = target.union(target);

        assert_relative_eq!(target.theta_o(), union.theta_o(), epsilon = 1e-3);
        assert_relative_eq!(target.theta_e(), union.theta_e(), epsilon = 1e-3);
        assert_relative_eq!(1.0, target.axis().dot(union.axis()), epsilon = 1e-3);
    }

    #[test]
    fn union_absorbs_a_contained_cone() {
        let wide = cone(Vec3::Z, 2.0, 0.5);
        let narrow = cone(Vec3::Z, 0.1, 0.2);
        let union = wide.union(narrow);

        assert_eq!(wide.axis(), union.axis());
        assert_relative_eq!(wide.theta_o(), union.theta_o());
    }

    #[test]
    fn union_clamps_at_pi() {
        let a = cone(Vec3::Z, 2.5, 0.0);
        let b = cone(-Vec3::Z, 2.5, 0.0);
        let union = a.union(b);

        assert_relative_eq!(PI, union.theta_o());
    }

    #[test]
    fn union_of_opposing_narrow_cones() {
        let a = cone(Vec3::Z, 0.1, 0.0);
        let b = cone(-Vec3::Z, 0.1, 0.0);
        let union = a.union(b);

        assert!(union.contains(&a));
        assert!(union.contains(&b));
    }

    #[test]
    fn measure_is_zero_for_the_zero_cone() {
        assert_relative_eq!(0.0, cone(Vec3::Z, 0.0, 0.0).measure());
    }

    #[test]
    fn measure_grows_with_both_angles() {
        let base = cone(Vec3::Z, 0.5, 0.5).measure();

        assert!(cone(Vec3::Z, 1.0, 0.5).measure() > base);
        assert!(cone(Vec3::Z, 0.5, 1.0).measure() > base);
    }
}
