use nalgebra::DVector;

use crate::spline::SplineError;

/// Solves control points of a smooth Bezier spline for a single axis.
///
/// For every segment `i` between knots `K[i]` and `K[i + 1]` two control points are
/// computed, `P1[i]` and `P2[i]`, so that joined cubic segments have continuous first
/// derivative at interior knots and zero second derivative at both ends.
///
/// `P1` is found from a tridiagonal system solved with the Thomas algorithm, `P2` is then
/// derived from `P1`. Solver keeps four scratch vectors sized to the number of segments.
/// They are fully overwritten by each call to [ControlPointSolver::resolve], nothing is
/// carried from one solve to another, so a single solver may be used for both axes.
///
/// # Example
/// ```
/// use bezier_spline::ControlPointSolver;
/// use assert_approx_eq::assert_approx_eq;
///
/// let knots = [0.0, 1.0, 2.0];
/// let mut p1 = [0.0; 2];
/// let mut p2 = [0.0; 2];
///
/// let mut solver = ControlPointSolver::new(2);
/// solver.resolve(&knots, &mut p1, &mut p2).unwrap();
///
/// assert_approx_eq!(1.0 / 3.0, p1[0], 1e-12);
/// assert_approx_eq!(5.0 / 3.0, p2[1], 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ControlPointSolver {
    segments: usize,
    sub_diagonal: DVector<f64>,
    diagonal: DVector<f64>,
    super_diagonal: DVector<f64>,
    rhs: DVector<f64>,
}

impl ControlPointSolver {
    pub fn new(segments: usize) -> Self {
        ControlPointSolver {
            segments,
            sub_diagonal: DVector::zeros(segments),
            diagonal: DVector::zeros(segments),
            super_diagonal: DVector::zeros(segments),
            rhs: DVector::zeros(segments),
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Writes control points of every segment for one axis into `p1` and `p2`.
    ///
    /// `knots` must hold `segments + 1` values, `p1` and `p2` exactly `segments` values.
    /// A single segment has no system to solve, control points are then equal to the two
    /// knots and the segment is a straight line.
    ///
    /// Nothing guards against non-finite input, such values propagate into the result.
    /// # Errors
    /// Error is returned when the solver was created for zero segments or when lengths of
    /// the slices do not match the number of segments.
    pub fn resolve(&mut self, knots: &[f64], p1: &mut [f64], p2: &mut [f64]) -> Result<(), SplineError> {

        let segments = self.segments;
        if segments == 0 {
            return Err(SplineError::InvalidKnotCount(knots.len()));
        }
        if knots.len() != segments + 1 || p1.len() != segments || p2.len() != segments {
            return Err(SplineError::WorkspaceMismatch {
                segments,
                knots: knots.len(),
                control_points: p1.len().min(p2.len()),
            });
        }

        if segments == 1 {
            straight_segment(knots, p1, p2);
            return Ok(());
        }

        self.prepare_system(knots);
        self.eliminate();
        self.back_substitute(p1);

        // p1 is known, p2 follows from continuity of the first derivative.
        let last = segments - 1;
        for i in 0..last {
            p2[i] = 2.0 * knots[i + 1] - p1[i + 1];
        }
        p2[last] = (knots[segments] + p1[last]) / 2.0;

        Ok(())
    }

    fn prepare_system(&mut self, knots: &[f64]) {
        let segments = self.segments;
        let last = segments - 1;

        // left most segment
        self.sub_diagonal[0] = 0.0;
        self.diagonal[0] = 2.0;
        self.super_diagonal[0] = 1.0;
        self.rhs[0] = knots[0] + 2.0 * knots[1];

        for i in 1..last {
            self.sub_diagonal[i] = 1.0;
            self.diagonal[i] = 4.0;
            self.super_diagonal[i] = 1.0;
            self.rhs[i] = 4.0 * knots[i] + 2.0 * knots[i + 1];
        }

        // right most segment
        self.sub_diagonal[last] = 2.0;
        self.diagonal[last] = 7.0;
        self.super_diagonal[last] = 0.0;
        self.rhs[last] = 8.0 * knots[last] + knots[segments];
    }

    fn eliminate(&mut self) {
        for i in 1..self.segments {
            let m = self.sub_diagonal[i] / self.diagonal[i - 1];
            self.diagonal[i] -= m * self.super_diagonal[i - 1];
            self.rhs[i] -= m * self.rhs[i - 1];
        }
    }

    fn back_substitute(&self, p1: &mut [f64]) {
        let last = self.segments - 1;
        p1[last] = self.rhs[last] / self.diagonal[last];

        for i in (0..last).rev() {
            p1[i] = (self.rhs[i] - self.super_diagonal[i] * p1[i + 1]) / self.diagonal[i];
        }
    }
}

/// Control points of a lone segment, which is drawn as a straight line.
pub(crate) fn straight_segment(knots: &[f64], p1: &mut [f64], p2: &mut [f64]) {
    p1[0] = knots[0];
    p2[0] = knots[1];
}
