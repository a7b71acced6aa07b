use std::{error::Error, fmt::Display};

use kurbo::{BezPath, Point};
use log::{debug, trace, warn};

use crate::{
    knot::Knot,
    sampling::Interpolator,
    sink::CurveSink,
    solver::{straight_segment, ControlPointSolver},
};

/// Behavior of [SplineCurve] when resolved control points are not finite.
///
/// Elimination never produces a zero diagonal for this system, non-finite control points
/// come from non-finite or overflowing knot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Non-finite control points are kept and emitted as they are.
    #[default]
    Permissive,
    /// Resolve fails with [SplineError::DegenerateSystem] and the curve stays unresolved.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Stale,
    Resolved,
}

/// Smooth curve through an ordered sequence of knots, made of cubic Bezier segments.
///
/// Control points are resolved lazily: any knot write marks the curve stale and the next
/// read of control points, or [SplineCurve::materialize], solves them again.
/// # Example
/// ```
/// use bezier_spline::SplineCurve;
/// use kurbo::PathEl;
///
/// let mut spline = SplineCurve::new(3).unwrap();
/// spline.set_knot(0, 0.0, 0.0).unwrap();
/// spline.set_knot(1, 1.0, 1.0).unwrap();
/// spline.set_knot(2, 2.0, 0.0).unwrap();
///
/// let mut commands: Vec<PathEl> = Vec::new();
/// spline.materialize(&mut commands).unwrap();
///
/// assert_eq!(3, commands.len());
/// assert!(spline.is_resolved());
/// ```
#[derive(Debug, Clone)]
pub struct SplineCurve {
    x: Vec<f64>,
    y: Vec<f64>,
    px1: Vec<f64>,
    py1: Vec<f64>,
    px2: Vec<f64>,
    py2: Vec<f64>,
    resolution: Resolution,
    solver: Option<ControlPointSolver>,
    policy: SingularityPolicy,
    resolve_count: usize,
}

impl SplineCurve {
    pub fn new(knot_count: usize) -> Result<Self, SplineError> {
        Self::with_policy(knot_count, SingularityPolicy::default())
    }

    /// Creates curve of `knot_count` knots, all placed at the origin.
    /// # Errors
    /// Error is returned when `knot_count` is lower than 2.
    /// ```
    /// use bezier_spline::{SingularityPolicy, SplineCurve};
    ///
    /// assert!(SplineCurve::with_policy(1, SingularityPolicy::Strict).is_err());
    /// ```
    pub fn with_policy(knot_count: usize, policy: SingularityPolicy) -> Result<Self, SplineError> {

        if knot_count <= 1 {
            return Err(SplineError::InvalidKnotCount(knot_count));
        }

        let segments = knot_count - 1;
        Ok(SplineCurve {
            x: vec![0.0; knot_count],
            y: vec![0.0; knot_count],
            px1: vec![0.0; segments],
            py1: vec![0.0; segments],
            px2: vec![0.0; segments],
            py2: vec![0.0; segments],
            resolution: Resolution::Stale,
            solver: None,
            policy,
            resolve_count: 0,
        })
    }

    /// Creates curve from knots given in order.
    /// # Example
    /// ```
    /// use bezier_spline::SplineCurve;
    ///
    /// let spline = SplineCurve::from_knots([(0.0, 0.0), (5.0, 5.0)]).unwrap();
    /// assert_eq!(1, spline.segment_count());
    /// assert_eq!(5.0, spline.knot_y(1).unwrap());
    /// ```
    pub fn from_knots<I, K>(knots: I) -> Result<Self, SplineError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Knot>,
    {
        let knots: Vec<Knot> = knots.into_iter().map(Into::into).collect();
        let mut spline = Self::new(knots.len())?;

        for (index, knot) in knots.iter().enumerate() {
            spline.x[index] = knot.get_x();
            spline.y[index] = knot.get_y();
        }
        Ok(spline)
    }

    pub fn knot_count(&self) -> usize {
        self.x.len()
    }

    pub fn segment_count(&self) -> usize {
        self.x.len() - 1
    }

    pub fn policy(&self) -> SingularityPolicy {
        self.policy
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == Resolution::Resolved
    }

    /// Number of times control points were solved since the curve was created.
    pub fn resolve_count(&self) -> usize {
        self.resolve_count
    }

    pub fn set_knot(&mut self, index: usize, x: f64, y: f64) -> Result<(), SplineError> {
        self.check_knot_index(index)?;
        self.x[index] = x;
        self.y[index] = y;
        self.resolution = Resolution::Stale;
        Ok(())
    }

    pub fn set_knot_x(&mut self, index: usize, x: f64) -> Result<(), SplineError> {
        self.check_knot_index(index)?;
        self.x[index] = x;
        self.resolution = Resolution::Stale;
        Ok(())
    }

    pub fn set_knot_y(&mut self, index: usize, y: f64) -> Result<(), SplineError> {
        self.check_knot_index(index)?;
        self.y[index] = y;
        self.resolution = Resolution::Stale;
        Ok(())
    }

    pub fn knot_x(&self, index: usize) -> Result<f64, SplineError> {
        self.check_knot_index(index)?;
        Ok(self.x[index])
    }

    pub fn knot_y(&self, index: usize) -> Result<f64, SplineError> {
        self.check_knot_index(index)?;
        Ok(self.y[index])
    }

    pub fn knot(&self, index: usize) -> Result<Knot, SplineError> {
        self.check_knot_index(index)?;
        Ok(Knot::new(self.x[index], self.y[index]))
    }

    /// Places knots evenly along `width`, height of each knot is `amplitude` scaled by
    /// `interpolator` at knot progress from 0.0 to 1.0.
    /// # Example
    /// ```
    /// use bezier_spline::SplineCurve;
    ///
    /// let mut spline = SplineCurve::new(5).unwrap();
    /// spline.sample(100.0, 2.0, 0.0, &|progress: f64, _offset: f64| progress);
    ///
    /// assert_eq!(75.0, spline.knot_x(3).unwrap());
    /// assert_eq!(1.5, spline.knot_y(3).unwrap());
    /// ```
    pub fn sample<I>(&mut self, width: f64, amplitude: f64, offset: f64, interpolator: &I)
    where
        I: Interpolator + ?Sized,
    {
        let segments = self.segment_count() as f64;
        for index in 0..self.knot_count() {
            let progress = index as f64 / segments;
            self.x[index] = width * progress;
            self.y[index] = amplitude * interpolator.interpolation(progress, offset);
        }
        self.resolution = Resolution::Stale;
    }

    pub fn control_point1(&mut self, segment: usize) -> Result<Point, SplineError> {
        self.check_segment_index(segment)?;
        self.ensure_resolved()?;
        Ok(Point::new(self.px1[segment], self.py1[segment]))
    }

    pub fn control_point2(&mut self, segment: usize) -> Result<Point, SplineError> {
        self.check_segment_index(segment)?;
        self.ensure_resolved()?;
        Ok(Point::new(self.px2[segment], self.py2[segment]))
    }

    pub fn control_points(&mut self, segment: usize) -> Result<(Point, Point), SplineError> {
        self.check_segment_index(segment)?;
        self.ensure_resolved()?;
        Ok((
            Point::new(self.px1[segment], self.py1[segment]),
            Point::new(self.px2[segment], self.py2[segment]),
        ))
    }

    /// Emits the curve into `sink`: one move to the first knot, then a line to the second
    /// knot when there is a single segment, or one cubic per segment otherwise.
    ///
    /// Commands are appended, `sink` is not cleared first.
    pub fn materialize<S>(&mut self, sink: &mut S) -> Result<(), SplineError>
    where
        S: CurveSink + ?Sized,
    {
        self.ensure_resolved()?;

        sink.move_to(Point::new(self.x[0], self.y[0]));

        let segments = self.segment_count();
        if segments == 1 {
            sink.line_to(Point::new(self.x[1], self.y[1]));
        } else {
            for segment in 0..segments {
                let knot = segment + 1;
                sink.curve_to(
                    Point::new(self.px1[segment], self.py1[segment]),
                    Point::new(self.px2[segment], self.py2[segment]),
                    Point::new(self.x[knot], self.y[knot]),
                );
            }
        }
        Ok(())
    }

    /// Same as [SplineCurve::materialize] into a new, empty [BezPath].
    pub fn to_bez_path(&mut self) -> Result<BezPath, SplineError> {
        let mut path = BezPath::new();
        self.materialize(&mut path)?;
        Ok(path)
    }

    fn ensure_resolved(&mut self) -> Result<(), SplineError> {
        if self.resolution == Resolution::Resolved {
            return Ok(());
        }

        let segments = self.segment_count();
        trace!("resolving control points of {} segments", segments);

        if segments == 1 {
            straight_segment(&self.x, &mut self.px1, &mut self.px2);
            straight_segment(&self.y, &mut self.py1, &mut self.py2);
        } else {
            let solver = self.solver.get_or_insert_with(|| {
                debug!("allocating control point solver for {} segments", segments);
                ControlPointSolver::new(segments)
            });

            solver.resolve(&self.x, &mut self.px1, &mut self.px2)?;
            solver.resolve(&self.y, &mut self.py1, &mut self.py2)?;
        }

        if self.policy == SingularityPolicy::Strict {
            check_finite(Axis::X, &self.px1, &self.px2)?;
            check_finite(Axis::Y, &self.py1, &self.py2)?;
        }

        self.resolve_count += 1;
        self.resolution = Resolution::Resolved;
        Ok(())
    }

    fn check_knot_index(&self, index: usize) -> Result<(), SplineError> {
        if index < self.knot_count() {
            Ok(())
        } else {
            Err(SplineError::KnotIndexOutOfRange { index, knot_count: self.knot_count() })
        }
    }

    fn check_segment_index(&self, index: usize) -> Result<(), SplineError> {
        if index < self.segment_count() {
            Ok(())
        } else {
            Err(SplineError::SegmentIndexOutOfRange { index, segment_count: self.segment_count() })
        }
    }
}

fn check_finite(axis: Axis, p1: &[f64], p2: &[f64]) -> Result<(), SplineError> {
    if p1.iter().chain(p2.iter()).all(|p| p.is_finite()) {
        Ok(())
    } else {
        warn!("control points on {} axis are not finite", axis);
        Err(SplineError::DegenerateSystem { axis })
    }
}

/// Coordinate axis, each one is solved independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplineError {
    /// Spline needs at least two knots.
    InvalidKnotCount(usize),
    KnotIndexOutOfRange { index: usize, knot_count: usize },
    SegmentIndexOutOfRange { index: usize, segment_count: usize },
    /// Solver workspace does not fit lengths of given knots or control points.
    WorkspaceMismatch { segments: usize, knots: usize, control_points: usize },
    /// Resolved control points are not finite, reported only with [SingularityPolicy::Strict].
    DegenerateSystem { axis: Axis },
}

impl Display for SplineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplineError::InvalidKnotCount(count) => {
                write!(f, "Error in Spline: at least two knots required, got {}", count)
            }
            SplineError::KnotIndexOutOfRange { index, knot_count } => {
                write!(f, "Error in Spline: knot index {} out of range 0..{}", index, knot_count)
            }
            SplineError::SegmentIndexOutOfRange { index, segment_count } => {
                write!(f, "Error in Spline: segment index {} out of range 0..{}", index, segment_count)
            }
            SplineError::WorkspaceMismatch { segments, knots, control_points } => write!(
                f,
                "Error in Spline: solver for {} segments got {} knots and {} control points",
                segments, knots, control_points
            ),
            SplineError::DegenerateSystem { axis } => {
                write!(f, "Error in Spline: control points on {} axis are not finite", axis)
            }
        }
    }
}

impl Error for SplineError {}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use kurbo::PathEl;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::sampling::SineWave;

    fn record(spline: &mut SplineCurve) -> Vec<PathEl> {
        let mut commands = Vec::new();
        spline.materialize(&mut commands).unwrap();
        commands
    }

    fn assert_point_eq(expected: Point, actual: Point, eps: f64) {
        assert_approx_eq!(expected.x, actual.x, eps);
        assert_approx_eq!(expected.y, actual.y, eps);
    }

    #[test]
    fn invalid_knot_count() {
        assert_eq!(SplineError::InvalidKnotCount(0), SplineCurve::new(0).unwrap_err());
        assert_eq!(SplineError::InvalidKnotCount(1), SplineCurve::new(1).unwrap_err());
        assert!(SplineCurve::from_knots([(1.0, 1.0)]).is_err());
    }

    #[test]
    fn segment_count() {
        for knot_count in 2..50 {
            let spline = SplineCurve::new(knot_count).unwrap();

            assert_eq!(knot_count, spline.knot_count());
            assert_eq!(knot_count - 1, spline.segment_count());
            assert!(!spline.is_resolved());
        }
    }

    #[test]
    fn knot_index_out_of_range() {
        let mut spline = SplineCurve::new(3).unwrap();

        assert_eq!(
            SplineError::KnotIndexOutOfRange { index: 3, knot_count: 3 },
            spline.set_knot(3, 1.0, 1.0).unwrap_err()
        );
        assert!(spline.set_knot_x(4, 1.0).is_err());
        assert!(spline.set_knot_y(10, 1.0).is_err());
        assert!(spline.knot_x(3).is_err());
        assert!(spline.knot_y(3).is_err());
        assert!(spline.knot(3).is_err());
    }

    #[test]
    fn segment_index_out_of_range() {
        let mut spline = SplineCurve::new(3).unwrap();

        assert_eq!(
            SplineError::SegmentIndexOutOfRange { index: 2, segment_count: 2 },
            spline.control_point1(2).unwrap_err()
        );
        assert!(spline.control_point2(2).is_err());
        assert!(spline.control_points(5).is_err());
        assert_eq!(0, spline.resolve_count());
    }

    #[test]
    fn knot_reads_do_not_resolve() {
        let mut spline = SplineCurve::new(4).unwrap();
        spline.set_knot(2, 3.0, -4.0).unwrap();

        assert_eq!(3.0, spline.knot_x(2).unwrap());
        assert_eq!(-4.0, spline.knot_y(2).unwrap());
        assert_eq!(Knot::new(3.0, -4.0), spline.knot(2).unwrap());
        assert!(!spline.is_resolved());
        assert_eq!(0, spline.resolve_count());
    }

    #[test]
    fn two_knots_are_straight_line() {
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (5.0, 5.0)]).unwrap();

        assert_eq!(
            vec![
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(5.0, 5.0)),
            ],
            record(&mut spline)
        );
        assert_eq!(Point::new(0.0, 0.0), spline.control_point1(0).unwrap());
        assert_eq!(Point::new(5.0, 5.0), spline.control_point2(0).unwrap());
    }

    #[test]
    fn three_knots() {
        let eps = 1e-12;
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();

        assert_point_eq(Point::new(1.0 / 3.0, 0.5), spline.control_point1(0).unwrap(), eps);
        assert_point_eq(Point::new(2.0 / 3.0, 1.0), spline.control_point2(0).unwrap(), eps);
        assert_point_eq(Point::new(4.0 / 3.0, 1.0), spline.control_point1(1).unwrap(), eps);
        assert_point_eq(Point::new(5.0 / 3.0, 0.5), spline.control_point2(1).unwrap(), eps);

        let commands = record(&mut spline);
        assert_eq!(3, commands.len());
        assert_eq!(PathEl::MoveTo(Point::new(0.0, 0.0)), commands[0]);
        match commands[2] {
            PathEl::CurveTo(p1, p2, end) => {
                assert_point_eq(Point::new(4.0 / 3.0, 1.0), p1, eps);
                assert_point_eq(Point::new(5.0 / 3.0, 0.5), p2, eps);
                assert_eq!(Point::new(2.0, 0.0), end);
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn sine_period() {
        let knot_count = 20;
        let mut spline = SplineCurve::new(knot_count).unwrap();
        spline.sample(360.0, 100.0, 0.0, &SineWave::new(1.0));

        let commands = record(&mut spline);

        assert_eq!(knot_count, commands.len());
        assert_eq!(PathEl::MoveTo(Point::from(spline.knot(0).unwrap())), commands[0]);
        for (segment, command) in commands[1..].iter().enumerate() {
            match command {
                PathEl::CurveTo(_, _, end) => {
                    assert_eq!(Point::from(spline.knot(segment + 1).unwrap()), *end);
                }
                other => panic!("expected cubic, got {:?}", other),
            }
        }
    }

    #[test]
    fn segments_join_with_continuous_tangent() {
        let mut rng = StdRng::seed_from_u64(2024);

        for knot_count in 3..25 {
            let knots: Vec<(f64, f64)> = (0..knot_count)
                .map(|_| (rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)))
                .collect();
            let mut spline = SplineCurve::from_knots(knots.clone()).unwrap();

            for i in 1..knot_count - 1 {
                let p2 = spline.control_point2(i - 1).unwrap();
                let p1 = spline.control_point1(i).unwrap();
                let (kx, ky) = knots[i];

                let cross = (kx - p2.x) * (p1.y - ky) - (ky - p2.y) * (p1.x - kx);
                let scale = (p1 - p2).hypot2().max(1.0);
                assert!(cross.abs() / scale < 1e-9, "kink at knot {}", i);
            }

            let commands = record(&mut spline);
            let mut start = match commands[0] {
                PathEl::MoveTo(point) => point,
                other => panic!("expected move, got {:?}", other),
            };
            for (segment, command) in commands[1..].iter().enumerate() {
                match *command {
                    PathEl::CurveTo(_, _, end) => {
                        assert_eq!(Point::from(knots[segment]), start);
                        assert_eq!(Point::from(knots[segment + 1]), end);
                        start = end;
                    }
                    other => panic!("expected cubic, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn materialize_is_idempotent() {
        let mut spline = SplineCurve::from_knots([(0.0, 1.0), (2.0, 3.0), (4.0, -1.0), (6.0, 0.0)]).unwrap();

        let first = record(&mut spline);
        let second = record(&mut spline);

        assert_eq!(first, second);
        assert_eq!(1, spline.resolve_count());
    }

    #[test]
    fn resolves_once_until_knot_written() {
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (1.0, 2.0), (3.0, 1.0)]).unwrap();
        assert_eq!(0, spline.resolve_count());

        spline.control_point1(0).unwrap();
        spline.control_point2(1).unwrap();
        spline.control_points(0).unwrap();
        assert_eq!(1, spline.resolve_count());
        assert!(spline.is_resolved());

        // same value still invalidates
        spline.set_knot_y(1, 2.0).unwrap();
        assert!(!spline.is_resolved());
        spline.control_point1(0).unwrap();
        assert_eq!(2, spline.resolve_count());
    }

    #[test]
    fn single_coordinate_write_is_emitted() {
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (1.0, 2.0), (3.0, 1.0)]).unwrap();
        let before = record(&mut spline);

        spline.set_knot_x(2, 7.0).unwrap();
        let after = record(&mut spline);

        assert_ne!(before, after);
        assert_eq!(PathEl::CurveTo(
            spline.control_point1(1).unwrap(),
            spline.control_point2(1).unwrap(),
            Point::new(7.0, 1.0),
        ), after[2]);
    }

    #[test]
    fn matches_fresh_curve_after_updates() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut reused = SplineCurve::new(10).unwrap();

        for _ in 0..5 {
            let knots: Vec<(f64, f64)> = (0..10)
                .map(|_| (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
                .collect();
            for (index, (x, y)) in knots.iter().enumerate() {
                reused.set_knot(index, *x, *y).unwrap();
            }

            let mut fresh = SplineCurve::from_knots(knots).unwrap();
            assert_eq!(record(&mut fresh), record(&mut reused));
        }
        assert_eq!(5, reused.resolve_count());
    }

    #[test]
    fn to_bez_path_starts_empty() {
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();

        let first = spline.to_bez_path().unwrap();
        let second = spline.to_bez_path().unwrap();

        assert_eq!(3, first.elements().len());
        assert_eq!(first.elements(), second.elements());
    }

    #[test]
    fn permissive_keeps_non_finite() {
        let mut spline = SplineCurve::from_knots([(0.0, 0.0), (f64::NAN, 1.0), (2.0, 0.0)]).unwrap();

        let commands = record(&mut spline);

        assert_eq!(3, commands.len());
        assert!(spline.control_point1(0).unwrap().x.is_nan());
        assert!(spline.is_resolved());
    }

    #[test]
    fn strict_rejects_non_finite() {
        let mut spline = SplineCurve::with_policy(3, SingularityPolicy::Strict).unwrap();
        spline.set_knot(1, 1.0, f64::INFINITY).unwrap();

        let mut commands: Vec<PathEl> = Vec::new();
        assert_eq!(
            SplineError::DegenerateSystem { axis: Axis::Y },
            spline.materialize(&mut commands).unwrap_err()
        );
        assert!(commands.is_empty());
        assert!(!spline.is_resolved());
        assert_eq!(0, spline.resolve_count());

        spline.set_knot_y(1, 1.0).unwrap();
        spline.materialize(&mut commands).unwrap();
        assert_eq!(3, commands.len());
        assert_eq!(SingularityPolicy::Strict, spline.policy());
    }

    #[test]
    fn strict_checks_straight_segment() {
        let mut spline = SplineCurve::with_policy(2, SingularityPolicy::Strict).unwrap();
        spline.set_knot_x(0, f64::NEG_INFINITY).unwrap();

        assert_eq!(
            SplineError::DegenerateSystem { axis: Axis::X },
            spline.control_point1(0).unwrap_err()
        );
    }

    #[test]
    fn sample_marks_stale() {
        let mut spline = SplineCurve::new(3).unwrap();
        spline.control_point1(0).unwrap();
        assert!(spline.is_resolved());

        spline.sample(10.0, 1.0, 0.25, &SineWave::new(1.0));

        assert!(!spline.is_resolved());
        assert_eq!(5.0, spline.knot_x(1).unwrap());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            "Error in Spline: at least two knots required, got 1",
            SplineError::InvalidKnotCount(1).to_string()
        );
        assert_eq!(
            "Error in Spline: control points on y axis are not finite",
            SplineError::DegenerateSystem { axis: Axis::Y }.to_string()
        );
    }
}
