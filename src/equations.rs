//! Closed-form equilibrium solutions for a single joint.
//!
//! A pin joint in the plane gives two equations (sum of X and Y forces), so
//! at most two member forces can be found from it. The unknowns are the raw
//! equilibrium solutions: `sum(f_k * u_k) = F`, where `u_k` is the unit
//! vector from the joint towards the far end of member `k` and `F` is the
//! load accumulated at the joint. The member force itself is `-f_k`, which
//! makes tension positive.

use nalgebra::{Matrix2, Vector2};

use crate::errors::DegenerateGeometryError;

/// Determinants below this magnitude are treated as collinear members.
///
/// Columns are unit vectors, so the determinant is the sine of the angle
/// between the two members.
pub const DEGENERATE_DETERMINANT: f64 = 1.0e-12;

/// Member forces below this magnitude are stored as exactly zero.
pub const FORCE_SNAP_TOLERANCE: f64 = 0.001;

/// Solve the 2x2 system `coefficients * f = rhs` by Cramer's rule.
///
/// The columns of `coefficients` are the unit directions `(cos, sin)` of the
/// two unknown members.
///
/// # Errors
///
/// Returns [`DegenerateGeometryError`] when the determinant vanishes, i.e. the
/// two members are collinear and their forces cannot be separated.
///
/// # Examples
/// ```
/// use nalgebra::{Matrix2, Vector2};
/// use trussjoint::equations::solve_two_unknowns;
///
/// // One member along +X, one along +Y.
/// let f = solve_two_unknowns(&Matrix2::identity(), &Vector2::new(3.0, -4.0))?;
/// assert_eq!(f, Vector2::new(3.0, -4.0));
/// # Ok::<(), trussjoint::DegenerateGeometryError>(())
/// ```
pub fn solve_two_unknowns(
    coefficients: &Matrix2<f64>,
    rhs: &Vector2<f64>,
) -> Result<Vector2<f64>, DegenerateGeometryError> {
    let (c1, c2) = (coefficients[(0, 0)], coefficients[(0, 1)]);
    let (s1, s2) = (coefficients[(1, 0)], coefficients[(1, 1)]);
    let (fx, fy) = (rhs.x, rhs.y);

    let determinant = c1 * s2 - s1 * c2;
    if !determinant.is_finite() || determinant.abs() < DEGENERATE_DETERMINANT {
        return Err(DegenerateGeometryError { determinant });
    }

    let first = (fx * s2 - c2 * fy) / determinant;
    let second = (fy * c1 - s1 * fx) / determinant;
    Ok(Vector2::new(first, second))
}

/// Solve a joint with a single unknown member from the X equation alone.
///
/// A vertical member (`cos == 0`) carries no X component, so its force is
/// taken as zero rather than dividing by zero.
#[must_use]
pub fn solve_one_unknown(fx: f64, cos: f64) -> f64 {
    if cos == 0.0 {
        0.0
    } else {
        fx / cos
    }
}

/// Member force recorded for a raw equilibrium solution.
///
/// The sign is flipped so tension is positive, and magnitudes below
/// [`FORCE_SNAP_TOLERANCE`] become exactly zero.
///
/// # Examples
/// ```
/// use trussjoint::equations::member_force;
///
/// assert_eq!(member_force(5.0), -5.0);
/// assert_eq!(member_force(-0.0004), 0.0);
/// ```
#[must_use]
pub fn member_force(raw: f64) -> f64 {
    let force = -raw;
    if force.abs() < FORCE_SNAP_TOLERANCE {
        0.0
    } else {
        force
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn solves_inclined_pair() {
        // Joint at the origin with members towards (10, 0) and (5, 5).
        let diagonal = std::f64::consts::FRAC_1_SQRT_2;
        let coefficients = Matrix2::new(1.0, diagonal, 0.0, diagonal);
        let f = solve_two_unknowns(&coefficients, &Vector2::new(0.0, 5.0)).expect("solvable");
        assert_relative_eq!(f.x, -5.0, epsilon = 1.0e-12);
        assert_relative_eq!(f.y, 5.0 / diagonal, epsilon = 1.0e-12);
    }

    #[test]
    fn collinear_members_are_degenerate() {
        let coefficients = Matrix2::new(-1.0, 1.0, 0.0, 0.0);
        let error = solve_two_unknowns(&coefficients, &Vector2::new(1.0, 1.0))
            .expect_err("singular system");
        assert_eq!(error.determinant.abs(), 0.0);

        // Opposite directions computed from floating point positions.
        let coefficients = Matrix2::new(0.6, -0.6, 0.8, -0.8);
        assert!(solve_two_unknowns(&coefficients, &Vector2::new(0.0, 1.0)).is_err());
    }

    #[test]
    fn vertical_single_member_carries_nothing_in_x() {
        assert_eq!(solve_one_unknown(7.0, 0.0), 0.0);
        assert_relative_eq!(solve_one_unknown(-5.0, -0.5), 10.0);
    }

    #[test]
    fn member_force_flips_sign_and_snaps() {
        assert_eq!(member_force(-11.25), 11.25);
        assert_eq!(member_force(0.000_999), 0.0);
        assert_eq!(member_force(0.001), -0.001);
        assert!(member_force(-0.0).is_sign_positive());
    }

    proptest! {
        #[test]
        fn cramer_solution_satisfies_the_system(
            theta1 in 0.0_f64..std::f64::consts::TAU,
            separation in 0.05_f64..(std::f64::consts::PI - 0.05),
            fx in -1.0e3_f64..1.0e3,
            fy in -1.0e3_f64..1.0e3,
        ) {
            let theta2 = theta1 + separation;
            let coefficients = Matrix2::new(theta1.cos(), theta2.cos(), theta1.sin(), theta2.sin());
            let rhs = Vector2::new(fx, fy);
            let f = solve_two_unknowns(&coefficients, &rhs).expect("members not collinear");
            let residual = coefficients * f - rhs;
            prop_assert!(residual.norm() < 1.0e-6);
        }
    }
}
