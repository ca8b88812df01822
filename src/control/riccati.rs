use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, OMatrix, RealField};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiccatiError {
    #[error("incompatible dimensions: {0}")]
    IncompatibleDimensions(String),
    #[error("singular matrix: {0} is not invertible")]
    SingularMatrix(&'static str),
    #[error("no convergence after {0} iterations")]
    NotConverged(usize),
}

/// Converged solution of the discrete-time algebraic Riccati equation.
#[derive(Debug, Clone)]
pub struct RiccatiSolution<T: RealField, S: Dim, U: Dim>
where
    DefaultAllocator: Allocator<T, S, S> + Allocator<T, U, S>,
{
    /// Feedback gain, `u = -K * x`
    pub k: OMatrix<T, U, S>,
    /// Cost-to-go matrix
    pub p: OMatrix<T, S, S>,
    /// Iterations consumed before the recurrence stabilized
    pub iterations: usize,
}

/// Steady-state gain of the discrete-time infinite-horizon LQR problem
/// with cost `sum x'Qx + u'Ru + 2 x'Nu`.
///
/// Solves the Riccati equation by fixed-point iteration starting from
/// `P = Q`. The cross term is folded into adjusted system and cost
/// matrices up front, so each iteration has the plain DARE form; the gain
/// `K = (R + B'PB)^-1 (B'PA + N')` is extracted from the original `A` and
/// `N` once `P` has stabilized.
///
/// `Q` and `R` are expected to be symmetric (positive semi-definite and
/// positive definite respectively); this is not checked. Convergence is
/// detected on the largest absolute element of the change between
/// successive iterates, an absolute criterion: pick `epsilon` with the
/// scale of `P` in mind, or the iteration may stop early or exhaust
/// `max_iter` on the floating-point floor.
pub fn solve_dare<T: RealField + Copy, S: Dim, U: Dim>(
    a: &OMatrix<T, S, S>,
    b: &OMatrix<T, S, U>,
    q: &OMatrix<T, S, S>,
    r: &OMatrix<T, U, U>,
    n: &OMatrix<T, S, U>,
    max_iter: usize,
    epsilon: T,
) -> Result<RiccatiSolution<T, S, U>, RiccatiError>
where
    DefaultAllocator:
        Allocator<T, S, S> + Allocator<T, S, U> + Allocator<T, U, S> + Allocator<T, U, U>,
{
    check_dimensions(a, b, q, r, n)?;

    let bt = b.transpose();
    let nt = n.transpose();
    let r_inv = r
        .clone()
        .try_inverse()
        .ok_or(RiccatiError::SingularMatrix("R"))?;

    // eliminate the cross term once, outside the loop
    let a_hat = a - b * &r_inv * &nt;
    let a_hat_t = a_hat.transpose();
    let q_hat = q - n * &r_inv * &nt;

    // Discrete time Algebraic Riccati Equation (DARE)
    let mut p = q.clone();
    for i in 0..max_iter {
        let s_inv = (r + &bt * &p * b)
            .try_inverse()
            .ok_or(RiccatiError::SingularMatrix("R + B'PB"))?;
        let pn = &a_hat_t * &p * &a_hat - &a_hat_t * &p * b * s_inv * &bt * &p * &a_hat + &q_hat;
        if (&pn - &p).abs().max() < epsilon {
            // gain for the original cross-term-coupled problem
            let k = (r + &bt * &pn * b)
                .try_inverse()
                .ok_or(RiccatiError::SingularMatrix("R + B'PB"))?
                * (&bt * &pn * a + &nt);
            return Ok(RiccatiSolution {
                k,
                p: pn,
                iterations: i + 1,
            });
        }
        p = pn;
    }
    Err(RiccatiError::NotConverged(max_iter))
}

fn check_dimensions<T: RealField, S: Dim, U: Dim>(
    a: &OMatrix<T, S, S>,
    b: &OMatrix<T, S, U>,
    q: &OMatrix<T, S, S>,
    r: &OMatrix<T, U, U>,
    n: &OMatrix<T, S, U>,
) -> Result<(), RiccatiError>
where
    DefaultAllocator: Allocator<T, S, S> + Allocator<T, S, U> + Allocator<T, U, U>,
{
    if a.nrows() != a.ncols() {
        return Err(RiccatiError::IncompatibleDimensions(format!(
            "A is {}x{}, expected square",
            a.nrows(),
            a.ncols()
        )));
    }
    let nx = a.nrows();
    let nu = b.ncols();
    if b.nrows() != nx {
        return Err(RiccatiError::IncompatibleDimensions(format!(
            "B has {} rows, A has {}",
            b.nrows(),
            nx
        )));
    }
    if q.nrows() != nx || q.ncols() != nx {
        return Err(RiccatiError::IncompatibleDimensions(format!(
            "Q is {}x{}, expected {}x{}",
            q.nrows(),
            q.ncols(),
            nx,
            nx
        )));
    }
    if r.nrows() != nu || r.ncols() != nu {
        return Err(RiccatiError::IncompatibleDimensions(format!(
            "R is {}x{}, expected {}x{}",
            r.nrows(),
            r.ncols(),
            nu,
            nu
        )));
    }
    if n.nrows() != nx || n.ncols() != nu {
        return Err(RiccatiError::IncompatibleDimensions(format!(
            "N is {}x{}, expected {}x{}",
            n.nrows(),
            n.ncols(),
            nx,
            nu
        )));
    }
    Ok(())
}
