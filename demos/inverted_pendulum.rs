// Inverted pendulum stabilized by the discrete-time LQR gain

use std::error::Error;

use nalgebra::{Const, Matrix1, Matrix4, Matrix4x1, Vector1, Vector4};
use plotters::prelude::*;
use rand_distr::{Distribution, Normal};

use dlqr::control::{lqr, LinearModel};

/// Cart-pole linearized around the upright position,
/// state [x, x_dot, theta, theta_dot]
struct InvertedPendulumModel {
    da: Matrix4<f64>,
    db: Matrix4x1<f64>,
    r: Matrix1<f64>,
    q: Matrix4<f64>,
}

impl InvertedPendulumModel {
    fn new(l_bar: f64, mass_cart: f64, mass_ball: f64, g: f64) -> InvertedPendulumModel {
        let q = Matrix4::from_diagonal(&Vector4::new(10.0, 1.0, 10.0, 1.0));
        let r = Matrix1::new(0.01);

        #[rustfmt::skip]
        let da = Matrix4::new(
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, mass_ball * g / mass_cart, 0.0,
            0.0, 0.0, 0.0, 1.0,
            0.0, 0.0, g * (mass_cart + mass_ball) / (l_bar * mass_cart), 0.0
        );

        let db = Matrix4x1::new(0.0, 1.0 / mass_cart, 0.0, 1.0 / (l_bar * mass_cart));

        InvertedPendulumModel { da, db, r, q }
    }
}

impl<'a> LinearModel<'a, f64, Const<4>, Const<1>> for InvertedPendulumModel {
    fn a(&self, dt: f64) -> Matrix4<f64> {
        Matrix4::identity() + dt * self.da
    }
    fn b(&self, dt: f64) -> Matrix4x1<f64> {
        dt * self.db
    }
    fn q(&'a self) -> &'a Matrix4<f64> {
        &self.q
    }
    fn r(&'a self) -> &'a Matrix1<f64> {
        &self.r
    }
    fn n(&'a self) -> Matrix4x1<f64> {
        Matrix4x1::zeros()
    }
}

fn run() -> Result<Vec<Vector4<f64>>, Box<dyn Error>> {
    let sim_time = 5.0;
    let dt = 0.01;
    let mut time = 0.;
    let max_iter = 10_000;
    let epsilon = 1e-6;

    let linear_model = InvertedPendulumModel::new(2.0, 1.0, 0.3, 9.8);

    // small disturbance on the commanded input
    let mut rng = rand::thread_rng();
    let input_noise = Normal::new(0., 0.05)?;

    let mut x = Vector4::new(0.0, 0.0, -0.2, 0.0);
    let mut states = vec![x];

    while time < sim_time {
        time += dt;
        let u = lqr(&x, dt, &linear_model, max_iter, epsilon)?;
        let ud = u + Vector1::new(input_noise.sample(&mut rng));
        x = linear_model.step(&x, &ud, dt);
        states.push(x);
    }
    Ok(states)
}

fn plot(states: &[Vector4<f64>]) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all("./img")?;
    let root = BitMapBackend::new("./img/inverted_pendulum.png", (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("LQR inverted pendulum", ("sans-serif", 40))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..5.0, -1.0..3.0)?;

    chart.configure_mesh().draw()?;

    let time = |i: usize| i as f64 * 0.01;
    let curves = [
        ("x", 0, &BLUE),
        ("x dot", 1, &RED),
        ("theta", 2, &GREEN),
        ("theta dot", 3, &BLACK),
    ];
    for (name, idx, color) in curves {
        chart
            .draw_series(LineSeries::new(
                states.iter().enumerate().map(|(i, s)| (time(i), s[idx])),
                color,
            ))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let states = run()?;
    plot(&states)?;
    println!("final state: {:.6}", states[states.len() - 1]);
    Ok(())
}
