mod lqr;
mod riccati;

pub use lqr::{lqr, LinearModel};
pub use riccati::{solve_dare, RiccatiError, RiccatiSolution};
