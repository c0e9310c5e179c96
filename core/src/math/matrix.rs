/// Determinant magnitude below which a 2x2 system is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-6;

/// Row-major 2x2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Matrix2 {
    /// Builds the matrix from two column vectors.
    pub const fn from_columns(col0: (f64, f64), col1: (f64, f64)) -> Self {
        Self {
            a: col0.0,
            b: col1.0,
            c: col0.1,
            d: col1.1,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Solves `M * [t0, t1] = rhs` by Cramer's rule. `None` when the
    /// determinant is within [`SINGULAR_EPSILON`] of zero.
    pub fn solve(&self, rhs: (f64, f64)) -> Option<(f64, f64)> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let t0 = (self.d * rhs.0 - self.b * rhs.1) * inv_det;
        let t1 = (self.a * rhs.1 - self.c * rhs.0) * inv_det;
        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_identity_returns_rhs() {
        let m = Matrix2::from_columns((1.0, 0.0), (0.0, 1.0));
        assert_eq!(m.solve((3.0, -2.0)), Some((3.0, -2.0)));
    }

    #[test]
    fn singular_matrix_has_no_solution() {
        let m = Matrix2::from_columns((1.0, 2.0), (2.0, 4.0));
        assert_eq!(m.solve((1.0, 1.0)), None);
    }

    #[test]
    fn solve_general_system() {
        // 2x + y = 5, x - y = 1
        let m = Matrix2::from_columns((2.0, 1.0), (1.0, -1.0));
        let (x, y) = m.solve((5.0, 1.0)).unwrap();
        assert!((x - 2.0).abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
    }
}
