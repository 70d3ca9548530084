//! RGB/YUV conversion and the hqx-style pixel similarity predicate.

use crate::config::SimilarityThresholds;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Convert an RGB pixel to YUV in the same manner as hqx.
pub fn rgb_to_yuv(p: Rgb) -> (i32, i32, i32) {
    let (r, g, b) = (p[0] as f64, p[1] as f64, p[2] as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = -0.169 * r - 0.331 * g + 0.5 * b + 128.0;
    let v = 0.5 * r - 0.419 * g - 0.081 * b + 128.0;
    (y.floor() as i32, u.floor() as i32, v.floor() as i32)
}

/// Two pixels are "similar" iff their YUV channel differences are all at or
/// below the configured thresholds (defaults: |dY| <= 48, |dU| <= 7, |dV| <= 6).
pub fn pixels_similar(p0: Rgb, p1: Rgb, thresholds: SimilarityThresholds) -> bool {
    let (y0, u0, v0) = rgb_to_yuv(p0);
    let (y1, u1, v1) = rgb_to_yuv(p1);
    (y0 - y1).abs() <= thresholds.y && (u0 - u1).abs() <= thresholds.u && (v0 - v1).abs() <= thresholds.v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_pixels_are_similar() {
        let thresholds = SimilarityThresholds::default();
        assert!(pixels_similar([10, 20, 30], [10, 20, 30], thresholds));
    }

    #[test]
    fn black_and_white_are_not_similar() {
        let thresholds = SimilarityThresholds::default();
        assert!(!pixels_similar([0, 0, 0], [255, 255, 255], thresholds));
    }

    #[test]
    fn yuv_conversion_matches_hqx_formula() {
        // Pure red: Y = floor(0.299*255) = 76, U = floor(-0.169*255+128) = floor(84.905)=84,
        // V = floor(0.5*255+128) = floor(255.5) = 255
        let (y, u, v) = rgb_to_yuv([255, 0, 0]);
        assert_eq!(y, 76);
        assert_eq!(u, 84);
        assert_eq!(v, 255);
    }

    #[test]
    fn small_perturbation_within_thresholds_is_similar() {
        let thresholds = SimilarityThresholds::default();
        assert!(pixels_similar([100, 100, 100], [101, 100, 100], thresholds));
    }
}
