use std::f64::consts::TAU;

/// Height profile used by [SplineCurve::sample](crate::SplineCurve::sample).
///
/// `progress` runs from 0.0 at the first knot to 1.0 at the last one, `offset` shifts the
/// profile, typically driven by an animation.
pub trait Interpolator {
    fn interpolation(&self, progress: f64, offset: f64) -> f64;
}

impl<F> Interpolator for F
where
    F: Fn(f64, f64) -> f64,
{
    fn interpolation(&self, progress: f64, offset: f64) -> f64 {
        self(progress, offset)
    }
}

/// `sin(2π · periods · (progress - offset))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWave {
    periods: f64,
}

impl SineWave {
    pub fn new(periods: f64) -> Self {
        SineWave { periods }
    }
}

impl Interpolator for SineWave {
    fn interpolation(&self, progress: f64, offset: f64) -> f64 {
        (TAU * self.periods * (progress - offset)).sin()
    }
}

/// Sine wave under a parabolic envelope, zero at both ends and widest in the middle:
/// `a · (1 - (2p - 1)²) · sin(2π · waves · (p - offset))`.
///
/// Amplitude `a` is normalized from `0.0..=1.0` into `min_amplitude..=1.0`, so the wave
/// never flattens completely.
/// # Example
/// ```
/// use bezier_spline::{DampedWave, Interpolator};
/// use assert_approx_eq::assert_approx_eq;
///
/// let wave = DampedWave::new(2.0, 0.03, 1.0);
///
/// assert_approx_eq!(0.0, wave.interpolation(0.0, 0.3), 1e-12);
/// assert_approx_eq!(0.0, wave.interpolation(1.0, 0.3), 1e-12);
/// assert_approx_eq!(1.0, wave.interpolation(0.5, 0.375), 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedWave {
    waves: f64,
    min_amplitude: f64,
    amplitude: f64,
}

impl DampedWave {
    pub fn new(waves: f64, min_amplitude: f64, amplitude: f64) -> Self {
        DampedWave { waves, min_amplitude, amplitude: amplitude.clamp(0.0, 1.0) }
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn normalized_amplitude(&self) -> f64 {
        self.min_amplitude + (1.0 - self.min_amplitude) * self.amplitude
    }
}

impl Interpolator for DampedWave {
    fn interpolation(&self, progress: f64, offset: f64) -> f64 {
        let sine = (TAU * self.waves * (progress - offset)).sin();
        let parabola = 1.0 - (2.0 * progress - 1.0).powi(2);
        self.normalized_amplitude() * parabola * sine
    }
}
