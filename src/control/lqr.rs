use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, OMatrix, OVector, RealField};

use crate::control::riccati::{solve_dare, RiccatiError};

pub trait LinearModel<'a, T: RealField, S: Dim, U: Dim>
where
    DefaultAllocator: Allocator<T, S, S> + Allocator<T, S, U> + Allocator<T, U, U>,
{
    fn a(&'a self, dt: T) -> OMatrix<T, S, S>;
    fn b(&'a self, dt: T) -> OMatrix<T, S, U>;
    fn r(&'a self) -> &'a OMatrix<T, U, U>;
    fn q(&'a self) -> &'a OMatrix<T, S, S>;
    /// State/control cross cost, zero for most plants
    fn n(&'a self) -> OMatrix<T, S, U>;

    fn step(&'a self, x: &OVector<T, S>, u: &OVector<T, U>, dt: T) -> OVector<T, S>
    where
        DefaultAllocator: Allocator<T, S> + Allocator<T, U>,
    {
        self.a(dt.clone()) * x + self.b(dt) * u
    }
}

pub fn lqr<'a, T: RealField + Copy, S: Dim, U: Dim>(
    x: &OVector<T, S>,
    dt: T,
    linear_model: &'a impl LinearModel<'a, T, S, U>,
    max_iter: usize,
    epsilon: T,
) -> Result<OVector<T, U>, RiccatiError>
where
    DefaultAllocator: Allocator<T, S>
        + Allocator<T, U>
        + Allocator<T, S, S>
        + Allocator<T, S, U>
        + Allocator<T, U, S>
        + Allocator<T, U, U>,
{
    let a = linear_model.a(dt);
    let b = linear_model.b(dt);
    let n = linear_model.n();

    let solution = solve_dare(
        &a,
        &b,
        linear_model.q(),
        linear_model.r(),
        &n,
        max_iter,
        epsilon,
    )?;

    // LQR control
    Ok(-(solution.k * x))
}
