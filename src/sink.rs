use kurbo::{BezPath, PathEl, Point};

/// Receiver of drawing commands emitted by [SplineCurve::materialize](crate::SplineCurve::materialize).
///
/// Commands arrive in path order: a single `move_to`, then either one `line_to`
/// (a spline of two knots) or one `curve_to` per segment.
pub trait CurveSink {
    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Cubic Bezier from the current point through control points `p1`, `p2` to `end`.
    fn curve_to(&mut self, p1: Point, p2: Point, end: Point);
}

impl CurveSink for BezPath {
    fn move_to(&mut self, point: Point) {
        BezPath::move_to(self, point);
    }

    fn line_to(&mut self, point: Point) {
        BezPath::line_to(self, point);
    }

    fn curve_to(&mut self, p1: Point, p2: Point, end: Point) {
        BezPath::curve_to(self, p1, p2, end);
    }
}

/// Records commands, so they can be compared or replayed later.
impl CurveSink for Vec<PathEl> {
    fn move_to(&mut self, point: Point) {
        self.push(PathEl::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.push(PathEl::LineTo(point));
    }

    fn curve_to(&mut self, p1: Point, p2: Point, end: Point) {
        self.push(PathEl::CurveTo(p1, p2, end));
    }
}

impl<S: CurveSink + ?Sized> CurveSink for &mut S {
    fn move_to(&mut self, point: Point) {
        (**self).move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        (**self).line_to(point);
    }

    fn curve_to(&mut self, p1: Point, p2: Point, end: Point) {
        (**self).curve_to(p1, p2, end);
    }
}
