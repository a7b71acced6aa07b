use kurbo::Point;

/// Knot represents point through which the spline passes exactly.
/// - `x` - coordinate,
/// - `y` - coordinate.
///
/// Knot is only a value used to fill or read a [SplineCurve](crate::SplineCurve) in bulk,
/// the curve itself stores coordinates of each axis separately.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Knot {
    x: f64,
    y: f64,
}

impl Knot {
    /// Creates [Knot] from its coordinates.
    /// # Example
    /// ```
    /// use bezier_spline::Knot;
    ///
    /// let knot = Knot::new(1.0, 2.0);
    /// assert_eq!(1.0, knot.get_x());
    /// assert_eq!(2.0, knot.get_y());
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Knot { x, y }
    }

    pub fn get_x(&self) -> f64 {
        self.x
    }

    pub fn get_y(&self) -> f64 {
        self.y
    }
}

impl From<(f64, f64)> for Knot {
    fn from((x, y): (f64, f64)) -> Self {
        Knot { x, y }
    }
}

impl From<Point> for Knot {
    fn from(point: Point) -> Self {
        Knot { x: point.x, y: point.y }
    }
}

impl From<Knot> for Point {
    fn from(knot: Knot) -> Self {
        Point::new(knot.x, knot.y)
    }
}
