use std::error::Error;

use nalgebra::DMatrix;

use dlqr::control::solve_dare;

fn main() -> Result<(), Box<dyn Error>> {
    // longitudinal pitch dynamics of a trimmed aircraft, elevator input
    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(4, 4, &[
        0.9904, 0.04772, 0.004251, 0.0007791,
        -0.3764, 0.9061, 0.167, 0.03211,
        0.002975, -0.004629, 0.9985, 0.04999,
        0.1309, -0.1814, -0.06348, 0.9982,
    ]);
    let b = DMatrix::from_row_slice(4, 1, &[-0.00241, -0.09491, -9.478e-05, -0.0007852]);
    let mut q = DMatrix::zeros(4, 4);
    q[(2, 2)] = 1.0; // penalize pitch angle only
    let r = DMatrix::from_element(1, 1, 100.0);
    let n = DMatrix::zeros(4, 1);

    let solution = solve_dare(&a, &b, &q, &r, &n, 100_000, 1e-11)?;

    println!("converged in {} iterations", solution.iterations);
    println!("K =");
    for i in 0..solution.k.nrows() {
        let row: Vec<String> = solution
            .k
            .row(i)
            .iter()
            .map(|v| format!("{v:.6}"))
            .collect();
        println!("[{}]", row.join(", "));
    }
    Ok(())
}
