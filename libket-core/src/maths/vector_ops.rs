//! Bulk forms of the scalar complex operations. Each function is
//! elementwise-identical to applying the scalar operation in a loop; callers
//! may rely on that contract when substituting vectorized or partitioned
//! execution.

use crate::{Complex, Float};

pub fn copy_many<T: Float>(src: &[Complex<T>], dst: &mut [Complex<T>]) {
    assert_eq!(src.len(), dst.len());
    dst.copy_from_slice(src);
}

pub fn add_many<T: Float>(a: &[Complex<T>], b: &[Complex<T>], out: &mut [Complex<T>]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), out.len());
    for i in 0..a.len() {
        out[i] = a[i] + b[i];
    }
}

pub fn mul_many<T: Float>(a: &[Complex<T>], b: &[Complex<T>], out: &mut [Complex<T>]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), out.len());
    for i in 0..a.len() {
        out[i] = a[i] * b[i];
    }
}

pub fn scale_many<T: Float>(values: &mut [Complex<T>], factor: T) {
    for value in values.iter_mut() {
        *value = *value * factor;
    }
}

pub fn sum_many<T: Float>(values: &[Complex<T>]) -> Complex<T> {
    let mut total = Complex::zero();
    for value in values {
        total += *value;
    }
    total
}

pub fn norm_sq_sum_many<T: Float>(values: &[Complex<T>]) -> T {
    let mut total = T::zero();
    for value in values {
        total += value.norm_sq();
    }
    total
}
