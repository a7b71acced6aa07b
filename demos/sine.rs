extern crate bezier_spline;

use bezier_spline::{SineWave, SplineCurve};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let knots = 20;
    let width = 360.0;
    let amplitude = 100.0;

    let mut spline = SplineCurve::new(knots).unwrap();
    spline.sample(width, amplitude, 0.0, &SineWave::new(1.0));

    println!("segment;x1;y1;x2;y2;x;y");
    for segment in 0..spline.segment_count() {
        let (p1, p2) = spline.control_points(segment).unwrap();
        let end = spline.knot(segment + 1).unwrap();
        println!(
            "{};{:.2};{:.2};{:.2};{:.2};{:.2};{:.2}",
            segment, p1.x, p1.y, p2.x, p2.y, end.get_x(), end.get_y()
        );
    }

    let path = spline.to_bez_path().unwrap();
    println!("{}", path.to_svg());
}
