use crate::Complex;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdCapability {
    None,
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    Avx2,
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl SimdCapability {
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
        {
            if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
                return SimdCapability::Avx2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            return SimdCapability::Neon;
        }

        #[allow(unreachable_code)]
        SimdCapability::None
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimdCapability::None => "Scalar",
            #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
            SimdCapability::Avx2 => "AVX2+FMA",
            #[cfg(target_arch = "aarch64")]
            SimdCapability::Neon => "NEON",
        }
    }
}

/// Applies the 2x2 transform `g` to every amplitude pair `(j, j + 2^target)`
/// inside `[start, end)`, reading `src` and writing `dst`, using the widest
/// instruction set available.
///
/// # Safety
///
/// `src` and `dst` must be valid for at least `end` amplitudes, `start` and
/// `end` must be multiples of `2^(target + 1)`, and no other thread may write
/// the `[start, end)` span of `dst` concurrently.
pub unsafe fn transform_pairs(
    src: *const Complex<f64>,
    dst: *mut Complex<f64>,
    g: &[Complex<f64>; 4],
    target: usize,
    start: usize,
    end: usize,
) {
    match SimdCapability::detect() {
        #[cfg(target_arch = "x86_64")]
        SimdCapability::Avx2 => transform_pairs_avx2(src, dst, g, target, start, end),
        #[cfg(target_arch = "aarch64")]
        SimdCapability::Neon => transform_pairs_neon(src, dst, g, target, start, end),
        _ => transform_pairs_scalar(src, dst, g, target, start, end),
    }
}

/// Scalar reference path for the pair transform. Same contract as
/// [`transform_pairs`].
///
/// # Safety
///
/// See [`transform_pairs`].
pub unsafe fn transform_pairs_scalar(
    src: *const Complex<f64>,
    dst: *mut Complex<f64>,
    g: &[Complex<f64>; 4],
    target: usize,
    start: usize,
    end: usize,
) {
    let step = 1usize << target;
    let block = step << 1;
    let [g00, g01, g10, g11] = *g;

    let mut base = start;
    while base < end {
        for j in base..base + step {
            let v0 = *src.add(j);
            let v1 = *src.add(j + step);
            *dst.add(j) = g00 * v0 + g01 * v1;
            *dst.add(j + step) = g10 * v0 + g11 * v1;
        }
        base += block;
    }
}

// One __m256d holds two consecutive amplitudes [re0, im0, re1, im1];
// complex multiply against a broadcast coefficient via the addsub trick.
#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn cmul_avx2(v: __m256d, g_re: __m256d, g_im: __m256d) -> __m256d {
    let swapped = _mm256_permute_pd(v, 0b0101);
    _mm256_addsub_pd(_mm256_mul_pd(v, g_re), _mm256_mul_pd(swapped, g_im))
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn transform_pairs_avx2(
    src: *const Complex<f64>,
    dst: *mut Complex<f64>,
    g: &[Complex<f64>; 4],
    target: usize,
    start: usize,
    end: usize,
) {
    let step = 1usize << target;
    let block = step << 1;

    // Pairs for target 0 are interleaved in memory; the two-at-a-time loads
    // below need a contiguous run of at least two low-half amplitudes.
    if step < 2 {
        return transform_pairs_scalar(src, dst, g, target, start, end);
    }

    let g00_re = _mm256_set1_pd(g[0].re);
    let g00_im = _mm256_set1_pd(g[0].im);
    let g01_re = _mm256_set1_pd(g[1].re);
    let g01_im = _mm256_set1_pd(g[1].im);
    let g10_re = _mm256_set1_pd(g[2].re);
    let g10_im = _mm256_set1_pd(g[2].im);
    let g11_re = _mm256_set1_pd(g[3].re);
    let g11_im = _mm256_set1_pd(g[3].im);

    let mut base = start;
    while base < end {
        let mut j = base;
        while j < base + step {
            let v0 = _mm256_loadu_pd(src.add(j) as *const f64);
            let v1 = _mm256_loadu_pd(src.add(j + step) as *const f64);

            let out0 = _mm256_add_pd(
                cmul_avx2(v0, g00_re, g00_im),
                cmul_avx2(v1, g01_re, g01_im),
            );
            let out1 = _mm256_add_pd(
                cmul_avx2(v0, g10_re, g10_im),
                cmul_avx2(v1, g11_re, g11_im),
            );

            _mm256_storeu_pd(dst.add(j) as *mut f64, out0);
            _mm256_storeu_pd(dst.add(j + step) as *mut f64, out1);
            j += 2;
        }
        base += block;
    }
}

#[cfg(target_arch = "aarch64")]
#[inline]
unsafe fn cmul_neon(
    v: float64x2_t,
    g_re: float64x2_t,
    g_im: float64x2_t,
    sign: float64x2_t,
) -> float64x2_t {
    let swapped = vextq_f64(v, v, 1);
    vfmaq_f64(vmulq_f64(v, g_re), vmulq_f64(swapped, g_im), sign)
}

#[cfg(target_arch = "aarch64")]
unsafe fn transform_pairs_neon(
    src: *const Complex<f64>,
    dst: *mut Complex<f64>,
    g: &[Complex<f64>; 4],
    target: usize,
    start: usize,
    end: usize,
) {
    let step = 1usize << target;
    let block = step << 1;
    let sign = vld1q_f64([-1.0f64, 1.0].as_ptr());

    let g00_re = vdupq_n_f64(g[0].re);
    let g00_im = vdupq_n_f64(g[0].im);
    let g01_re = vdupq_n_f64(g[1].re);
    let g01_im = vdupq_n_f64(g[1].im);
    let g10_re = vdupq_n_f64(g[2].re);
    let g10_im = vdupq_n_f64(g[2].im);
    let g11_re = vdupq_n_f64(g[3].re);
    let g11_im = vdupq_n_f64(g[3].im);

    let mut base = start;
    while base < end {
        for j in base..base + step {
            let v0 = vld1q_f64(src.add(j) as *const f64);
            let v1 = vld1q_f64(src.add(j + step) as *const f64);

            let out0 = vaddq_f64(
                cmul_neon(v0, g00_re, g00_im, sign),
                cmul_neon(v1, g01_re, g01_im, sign),
            );
            let out1 = vaddq_f64(
                cmul_neon(v0, g10_re, g10_im, sign),
                cmul_neon(v1, g11_re, g11_im, sign),
            );

            vst1q_f64(dst.add(j) as *mut f64, out0);
            vst1q_f64(dst.add(j + step) as *mut f64, out1);
        }
        base += block;
    }
}
