extern crate bezier_spline;

use bezier_spline::SplineCurve;
use kurbo::PathEl;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut spline = SplineCurve::from_knots([
        (0.1, 0.5),
        (0.3, 0.2),
        (0.5, 0.8),
        (0.7, 0.3),
        (0.9, 0.5),
    ])
    .unwrap();

    print_commands(&mut spline);

    // drag the middle knot down
    for step in 1..=3 {
        spline.set_knot_y(2, 0.8 - 0.1 * step as f64).unwrap();
        print_commands(&mut spline);
    }
}

fn print_commands(spline: &mut SplineCurve) {
    let mut commands: Vec<PathEl> = Vec::new();
    spline.materialize(&mut commands).unwrap();

    println!("command;x1;y1;x2;y2;x;y");
    for command in commands {
        match command {
            PathEl::MoveTo(p) => println!("move;;;;;{:.3};{:.3}", p.x, p.y),
            PathEl::LineTo(p) => println!("line;;;;;{:.3};{:.3}", p.x, p.y),
            PathEl::CurveTo(p1, p2, p) => println!(
                "cubic;{:.3};{:.3};{:.3};{:.3};{:.3};{:.3}",
                p1.x, p1.y, p2.x, p2.y, p.x, p.y
            ),
            _ => {}
        }
    }
}
