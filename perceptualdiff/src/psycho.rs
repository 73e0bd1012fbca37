//! Psychophysical models used by the comparator.
//!
//! - [`csf`]: contrast sensitivity (Barten, SPIE 1989)
//! - [`mask`]: visual masking (Daly 1993)
//! - [`tvi`]: threshold versus intensity (Ward Larson, SIGGRAPH 1997)
//! - [`adaptation_level`]: pyramid level used as the adaptation luminance

use crate::consts::MAX_PYR_LEVELS;

/// Contrast sensitivity at `cpd` cycles per degree and luminance `lum`
/// (cd/m^2).
#[inline]
#[must_use]
pub fn csf(cpd: f64, lum: f64) -> f64 {
    let a = 440.0 * (1.0 + 0.7 / lum).powf(-0.2);
    let b = 0.3 * (1.0 + 100.0 / lum).powf(0.15);

    a * cpd * (-b * cpd).exp() * (1.0 + 0.06 * (b * cpd).exp()).sqrt()
}

/// Threshold elevation caused by masking at the given normalised contrast.
#[inline]
#[must_use]
pub fn mask(contrast: f64) -> f64 {
    let a = (392.498 * contrast).powf(0.7);
    let b = (0.0153 * a).powf(4.0);
    (1.0 + b).powf(0.25)
}

/// Smallest visible luminance change (cd/m^2) at the given adaptation
/// luminance (cd/m^2).
#[must_use]
pub fn tvi(adaptation_luminance: f64) -> f64 {
    let log_a = adaptation_luminance.log10();

    let r = if log_a < -3.94 {
        -2.86
    } else if log_a < -1.44 {
        (0.405 * log_a + 1.6).powf(2.18) - 2.86
    } else if log_a < -0.0184 {
        log_a - 0.395
    } else if log_a < 1.9 {
        (0.249 * log_a + 0.65).powf(2.7) - 0.72
    } else {
        log_a - 1.255
    };

    10.0f64.powf(r)
}

/// Pyramid level whose footprint first exceeds one degree of visual angle.
///
/// Footprints start at one pixel and double per level; the search stops at
/// the last level.
#[must_use]
pub fn adaptation_level(num_one_degree_pixels: f64) -> usize {
    let mut num_pixels = 1.0;
    let mut level = 0;

    for i in 0..MAX_PYR_LEVELS {
        level = i;
        if num_pixels > num_one_degree_pixels {
            break;
        }
        num_pixels *= 2.0;
    }

    level
}

/// Pixels spanned by one degree for a given horizontal field of view.
#[must_use]
pub fn one_degree_pixels(field_of_view: f64) -> f64 {
    (2.0 * (field_of_view * 0.5f64.to_radians()).tan()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csf_reference_values() {
        // Hand-evaluated: a = 440 * 1.007^-0.2, b = 0.3 * 2^0.15
        let a = 440.0 * 1.007f64.powf(-0.2);
        let b = 0.3 * 2.0f64.powf(0.15);
        let expected = a * 3.248 * (-b * 3.248).exp() * (1.0 + 0.06 * (b * 3.248).exp()).sqrt();
        assert!((csf(3.248, 100.0) - expected).abs() < 1e-12);
        assert!(csf(3.248, 100.0) > 200.0);
        assert_eq!(csf(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_csf_peaks_near_reference_frequency() {
        let peak = csf(3.248, 100.0);
        for cpd in [0.5, 1.0, 2.0, 8.0, 16.0, 32.0] {
            assert!(csf(cpd, 100.0) < peak, "csf({cpd}) exceeds peak");
        }
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(0.0), 1.0);
        // Masking only elevates thresholds, and more contrast masks more
        assert!(mask(0.01) >= 1.0);
        assert!(mask(1.0) > mask(0.1));
        let a = 392.498f64.powf(0.7);
        let expected = (1.0 + (0.0153 * a).powi(4)).powf(0.25);
        assert!((mask(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tvi_regimes() {
        // Scotopic floor
        assert!((tvi(1e-5) - 10.0f64.powf(-2.86)).abs() < 1e-15);
        // Linear regime: log(La) - 0.395
        assert!((tvi(0.1) - 10.0f64.powf(-1.395)).abs() < 1e-12);
        // Photopic Weber regime: log(La) - 1.255
        assert!((tvi(1000.0) - 10.0f64.powf(3.0 - 1.255)).abs() < 1e-9);
        // Mesopic regime at La = 1
        let expected = 10.0f64.powf(0.65f64.powf(2.7) - 0.72);
        assert!((tvi(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tvi_is_monotonic() {
        let mut prev = 0.0;
        for step in -60..=40 {
            let la = 10.0f64.powf(f64::from(step) / 10.0);
            let t = tvi(la);
            assert!(t >= prev * 0.999, "tvi decreased at La={la}");
            prev = t;
        }
    }

    #[test]
    fn test_adaptation_level() {
        assert_eq!(adaptation_level(0.5), 0);
        assert_eq!(adaptation_level(1.0), 1);
        assert_eq!(adaptation_level(47.46), 6);
        assert_eq!(adaptation_level(64.0), 7);
        assert_eq!(adaptation_level(1e6), 7);
    }

    #[test]
    fn test_one_degree_pixels_default_fov() {
        let n = one_degree_pixels(45.0);
        let expected = (2.0 * (22.5f64).to_radians().tan()).to_degrees();
        assert!((n - expected).abs() < 1e-9);
        assert!((n - 47.4649).abs() < 1e-3);
    }
}
