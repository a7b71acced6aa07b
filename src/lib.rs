//! Smooth spline of cubic Bezier segments passing through every given knot.
//! Control points are solved per axis from a tridiagonal system, so the first derivative
//! is continuous at interior knots, and are cached until any knot changes.
//!
//! Rendering is left to the caller: [SplineCurve::materialize] emits move, line and cubic
//! commands into any [CurveSink], for example [kurbo::BezPath].
//!
//! # Example
//! ```
//! use bezier_spline::SplineCurve;
//! use assert_approx_eq::assert_approx_eq;
//!
//! let mut spline = SplineCurve::from_knots([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();
//!
//! let p1 = spline.control_point1(0).unwrap();
//! assert_approx_eq!(1.0 / 3.0, p1.x, 1e-12);
//! assert_approx_eq!(0.5, p1.y, 1e-12);
//!
//! spline.set_knot_y(1, 2.0).unwrap();
//! let path = spline.to_bez_path().unwrap();
//! assert_eq!(3, path.elements().len());
//! ```

mod knot;
mod sampling;
mod sink;
mod solver;
mod spline;

pub use knot::Knot;
pub use sampling::{DampedWave, Interpolator, SineWave};
pub use sink::CurveSink;
pub use solver::ControlPointSolver;
pub use spline::{Axis, SingularityPolicy, SplineCurve, SplineError};
