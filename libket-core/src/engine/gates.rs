use crate::{complex, matrix, Complex, Matrix};
use std::f64::consts::FRAC_1_SQRT_2;

pub fn p_matrix(theta: f64) -> Matrix<Complex<f64>> {
    matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(theta.cos(), theta.sin())]
    )
}

pub fn rx_matrix(theta: f64) -> Matrix<Complex<f64>> {
    let cos = (theta / 2.0).cos();
    let sin = (theta / 2.0).sin();
    matrix!(
        [complex!(cos, 0.0), complex!(0.0, -sin)];
        [complex!(0.0, -sin), complex!(cos, 0.0)]
    )
}

pub fn ry_matrix(theta: f64) -> Matrix<Complex<f64>> {
    let cos = (theta / 2.0).cos();
    let sin = (theta / 2.0).sin();
    matrix!(
        [complex!(cos, 0.0), complex!(-sin, 0.0)];
        [complex!(sin, 0.0), complex!(cos, 0.0)]
    )
}

pub fn rz_matrix(theta: f64) -> Matrix<Complex<f64>> {
    let half = theta / 2.0;
    matrix!(
        [complex!(half.cos(), -half.sin()), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(half.cos(), half.sin())]
    )
}

pub fn cp_matrix(theta: f64) -> Matrix<Complex<f64>> {
    matrix!(
        [complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0)];
        [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(theta.cos(), theta.sin())]
    )
}

#[rustfmt::skip]
lazy_static::lazy_static! {
    pub static ref IDENTITY: Matrix<Complex<f64>> =
        matrix!([complex!(1.0, 0.0), complex!(0.0, 0.0)];
                [complex!(0.0, 0.0), complex!(1.0, 0.0)]);

    pub static ref PAULI_X: Matrix<Complex<f64>> =
        matrix!([complex!(0.0, 0.0), complex!(1.0, 0.0)];
                [complex!(1.0, 0.0), complex!(0.0, 0.0)]);

    pub static ref PAULI_Y: Matrix<Complex<f64>> =
        matrix!([complex!(0.0, 0.0), complex!(0.0, -1.0)];
                [complex!(0.0, 1.0), complex!(0.0,  0.0)]);

    pub static ref PAULI_Z: Matrix<Complex<f64>> =
        matrix!([complex!(1.0, 0.0), complex!( 0.0, 0.0)];
                [complex!(0.0, 0.0), complex!(-1.0, 0.0)]);

    pub static ref HADAMARD: Matrix<Complex<f64>> =
        matrix!([complex!(1.0, 0.0), complex!( 1.0, 0.0)];
                [complex!(1.0, 0.0), complex!(-1.0, 0.0)]) *
        complex!(FRAC_1_SQRT_2, 0.0);

    pub static ref CNOT: Matrix<Complex<f64>> =
        matrix!([complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
                [complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0)];
                [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(1.0, 0.0)];
                [complex!(0.0, 0.0), complex!(0.0, 0.0), complex!(1.0, 0.0), complex!(0.0, 0.0)]);
}
