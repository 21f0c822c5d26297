use crate::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn format_real_symbolic(v: f64) -> Option<String> {
    let abs_v = v.abs();
    let sign = if v < 0.0 { "-" } else { "" };

    if approx_eq(abs_v, 0.0) {
        return Some("0".to_string());
    }
    if approx_eq(abs_v, 1.0) {
        return Some(format!("{}1", sign));
    }
    if approx_eq(abs_v, 0.5) {
        return Some(format!("{}½", sign));
    }
    if approx_eq(abs_v, 0.25) {
        return Some(format!("{}¼", sign));
    }
    if approx_eq(abs_v, FRAC_1_SQRT_2) {
        return Some(format!("{}¹⁄√2", sign));
    }
    if approx_eq(abs_v, FRAC_1_SQRT_2 / 2.0) {
        return Some(format!("{}¹⁄√8", sign));
    }

    None
}

pub fn format_amplitude(c: &Complex<f64>) -> String {
    let re_zero = approx_eq(c.re.abs(), 0.0);
    let im_zero = approx_eq(c.im.abs(), 0.0);

    if re_zero && im_zero {
        return "0".to_string();
    }

    if im_zero {
        return format_real_symbolic(c.re).unwrap_or_else(|| format!("{:.4}", c.re));
    }

    if re_zero {
        if approx_eq(c.im.abs(), 1.0) {
            return if c.im > 0.0 { "i".into() } else { "-i".into() };
        }
        return match format_real_symbolic(c.im) {
            Some(s) => format!("{}i", s),
            None => format!("{:.4}i", c.im),
        };
    }

    let re_str = format_real_symbolic(c.re).unwrap_or_else(|| format!("{:.4}", c.re));
    let sign = if c.im > 0.0 { "+" } else { "-" };
    let im_str = format_real_symbolic(c.im.abs()).unwrap_or_else(|| format!("{:.4}", c.im.abs()));
    format!("{}{}{}i", re_str, sign, im_str)
}

pub fn format_probability(p: f64) -> String {
    if approx_eq(p, 0.0) {
        return "0".to_string();
    }
    if approx_eq(p, 1.0) {
        return "1".to_string();
    }
    if approx_eq(p, 0.5) {
        return "½".to_string();
    }
    if approx_eq(p, 0.25) {
        return "¼".to_string();
    }
    if approx_eq(p, 0.125) {
        return "⅛".to_string();
    }

    format!("{:.4}", p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex;

    #[test]
    fn symbolic_amplitudes() {
        assert_eq!(format_amplitude(&complex!(0.0, 0.0)), "0");
        assert_eq!(format_amplitude(&complex!(1.0, 0.0)), "1");
        assert_eq!(format_amplitude(&complex!(FRAC_1_SQRT_2, 0.0)), "¹⁄√2");
        assert_eq!(format_amplitude(&complex!(0.0, -1.0)), "-i");
        assert_eq!(format_amplitude(&complex!(0.5, 0.5)), "½+½i");
    }

    #[test]
    fn symbolic_probabilities() {
        assert_eq!(format_probability(0.5), "½");
        assert_eq!(format_probability(0.3), "0.3000");
    }
}
