extern crate bezier_spline;

use bezier_spline::{DampedWave, SplineCurve};

const WAVES: usize = 2;
// 8 segments per 90 degrees
const KNOTS: usize = WAVES * 4 * 8 + 1;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let width = 640.0;
    let height = 200.0;
    let frames = 12;

    let mut wave = DampedWave::new(WAVES as f64, 0.03, 0.0);
    let mut spline = SplineCurve::new(KNOTS).unwrap();

    // one animation period, amplitude growing frame by frame
    for frame in 0..frames {
        let offset = frame as f64 / frames as f64;
        wave.set_amplitude(offset);
        spline.sample(width, height / 2.0, offset, &wave);

        let path = spline.to_bez_path().unwrap();
        println!("{};{}", frame, path.to_svg());
    }

    log::info!("solved {} frames", spline.resolve_count());
}
