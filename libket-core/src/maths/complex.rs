use crate::Float;
use core::{fmt, ops};

#[macro_export]
macro_rules! complex {
    ($re:expr, $im:expr) => {
        $crate::Complex::new($re, $im)
    };
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }

    pub fn zero() -> Complex<T> {
        Complex {
            re: T::zero(),
            im: T::zero(),
        }
    }

    pub fn one() -> Complex<T> {
        Complex {
            re: T::one(),
            im: T::zero(),
        }
    }

    pub fn from_real(re: T) -> Complex<T> {
        Complex { re, im: T::zero() }
    }

    pub fn conj(&self) -> Complex<T> {
        Complex {
            re: self.re,
            im: -self.im,
        }
    }

    pub fn norm_sq(&self) -> T {
        self.re * self.re + self.im * self.im
    }

    pub fn magnitude(&self) -> T {
        self.norm_sq().sqrt()
    }

    pub fn phase(&self) -> T {
        self.im.atan2(self.re)
    }
}

impl<T: Float> From<T> for Complex<T> {
    fn from(re: T) -> Complex<T> {
        Complex::from_real(re)
    }
}

macro_rules! impl_elementwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T: Float> ops::$trait for Complex<T> {
            type Output = Complex<T>;

            fn $method(self, other: Complex<T>) -> Complex<T> {
                Complex {
                    re: self.re $op other.re,
                    im: self.im $op other.im,
                }
            }
        }
    };

    ($trait:ident, $method:ident, $op:tt, assign) => {
        impl<T: Float> ops::$trait for Complex<T> {
            fn $method(&mut self, other: Complex<T>) {
                self.re $op other.re;
                self.im $op other.im;
            }
        }
    };
}

impl_elementwise!(Add, add, +);
impl_elementwise!(Sub, sub, -);
impl_elementwise!(AddAssign, add_assign, +=, assign);
impl_elementwise!(SubAssign, sub_assign, -=, assign);

impl<T: Float> ops::Mul for Complex<T> {
    type Output = Complex<T>;

    fn mul(self, other: Complex<T>) -> Complex<T> {
        Complex {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

impl<T: Float> ops::MulAssign for Complex<T> {
    fn mul_assign(&mut self, other: Complex<T>) {
        *self = *self * other;
    }
}

impl<T: Float> ops::Div for Complex<T> {
    type Output = Complex<T>;

    fn div(self, other: Complex<T>) -> Complex<T> {
        let denom = other.norm_sq();
        Complex {
            re: (self.re * other.re + self.im * other.im) / denom,
            im: (self.im * other.re - self.re * other.im) / denom,
        }
    }
}

impl<T: Float> ops::Neg for Complex<T> {
    type Output = Complex<T>;

    fn neg(self) -> Complex<T> {
        Complex {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> ops::Mul<T> for Complex<T> {
    type Output = Complex<T>;

    fn mul(self, factor: T) -> Complex<T> {
        Complex {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
}

impl<T: Float + fmt::Debug> fmt::Debug for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Complex {{ re: {:?}, im: {:?} }}", self.re, self.im)
    }
}

impl<T: Float + fmt::Display> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i", self.re, self.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication() {
        let a = complex!(1.0, 2.0);
        let b = complex!(3.0, -1.0);
        let p = a * b;
        assert_eq!(p, complex!(5.0, 5.0));
    }

    #[test]
    fn division_inverts_multiplication() {
        let a = complex!(0.3, -0.7);
        let b = complex!(-1.2, 0.4);
        let q = (a * b) / b;
        assert!((q - a).magnitude() < 1e-12);
    }

    #[test]
    fn conjugate_negates_imaginary() {
        let a = complex!(0.5, 0.25);
        assert_eq!(a.conj(), complex!(0.5, -0.25));
        assert_eq!((a * a.conj()).im, 0.0);
    }

    #[test]
    fn norm_and_magnitude() {
        let a = complex!(3.0, 4.0);
        assert_eq!(a.norm_sq(), 25.0);
        assert_eq!(a.magnitude(), 5.0);
    }

    #[test]
    fn identities() {
        assert_eq!(Complex::<f64>::zero(), complex!(0.0, 0.0));
        assert_eq!(Complex::<f64>::one(), complex!(1.0, 0.0));
        assert_eq!(Complex::from_real(2.5), complex!(2.5, 0.0));
    }
}
