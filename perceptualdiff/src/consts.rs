//! Constants for the Yee perceptual metric.
//!
//! Numeric values are those of the published perceptualdiff implementation;
//! the fixture regression counts depend on them bit for bit.

// ============================================================================
// Colour space
// ============================================================================

/// Adobe RGB (1998) with D65 white to XYZ, row-major.
/// Matrix from <http://www.brucelindbloom.com/>.
pub const ADOBE_RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.576700, 0.185556, 0.188212],
    [0.297361, 0.627355, 0.0752847],
    [0.0270328, 0.0706879, 0.991248],
];

/// CIE LAB linear-segment threshold (216 / 24389).
pub const LAB_EPSILON: f64 = 216.0 / 24389.0;

/// CIE LAB linear-segment slope (24389 / 27).
pub const LAB_KAPPA: f64 = 24389.0 / 27.0;

// ============================================================================
// Laplacian pyramid
// ============================================================================

/// Number of levels in every pyramid.
pub const MAX_PYR_LEVELS: usize = 8;

/// 1D blur weights; the 5x5 kernel is their outer product.
pub const PYRAMID_KERNEL: [f64; 5] = [0.05, 0.25, 0.4, 0.25, 0.05];

// ============================================================================
// Comparator
// ============================================================================

/// Levels that take part in the contrast sum (each needs `i + 2`).
pub const CONTRAST_LEVELS: usize = MAX_PYR_LEVELS - 2;

/// Frequency (cycles per degree) at which the reference CSF peaks.
pub const CSF_PEAK_CPD: f64 = 3.248;

/// Luminance used for the frequency-sensitivity normalisation.
pub const CSF_REFERENCE_LUMINANCE: f64 = 100.0;

/// Floor for adaptation luminance, contrast denominators and contrast sums.
pub const MIN_LUMINANCE: f64 = 1e-5;

/// Bounds of the per-pixel elevation factor.
pub const FACTOR_MIN: f64 = 1.0;
pub const FACTOR_MAX: f64 = 10.0;

/// Below this adaptation luminance (cd/m^2) vision is scotopic and the
/// colour test is skipped.
pub const SCOTOPIC_LUMINANCE: f64 = 10.0;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_FIELD_OF_VIEW: f64 = 45.0;
pub const DEFAULT_GAMMA: f64 = 2.2;
pub const DEFAULT_LUMINANCE: f64 = 100.0;
pub const DEFAULT_THRESHOLD_PIXELS: usize = 100;
pub const DEFAULT_COLOR_FACTOR: f64 = 1.0;
