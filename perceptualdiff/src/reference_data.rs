//! Reference results for synthetic image pairs.
//!
//! Each case names a pair produced by the deterministic generators in
//! `tests/common/generators.rs`; the expected values were captured from
//! upstream perceptualdiff. Pixel counts must match exactly, error sums up
//! to floating-point summation order.

use crate::PdiffParams;

/// Viewing parameters of a reference case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceParams {
    pub luminance_only: bool,
    pub field_of_view: f64,
    pub gamma: f64,
    pub luminance: f64,
    pub color_factor: f64,
}

impl ReferenceParams {
    /// Comparison parameters for this case.
    #[must_use]
    pub fn to_params(&self) -> PdiffParams {
        PdiffParams::new()
            .with_luminance_only(self.luminance_only)
            .with_field_of_view(self.field_of_view)
            .with_gamma(self.gamma)
            .with_luminance(self.luminance)
            .with_color_factor(self.color_factor)
    }
}

/// The default viewing parameters.
pub const DEFAULT_PARAMS: ReferenceParams = ReferenceParams {
    luminance_only: false,
    field_of_view: 45.0,
    gamma: 2.2,
    luminance: 100.0,
    color_factor: 1.0,
};

/// One captured comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceCase {
    /// Generator name, e.g. `gradient_noise_16_6` (pattern, amplitude, seed).
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub params: ReferenceParams,
    pub expected_pixels_failed: usize,
    pub expected_error_sum: f64,
}

/// Number of entries in [`REFERENCE_CASES`].
pub const REFERENCE_CASE_COUNT: usize = 27;

/// All captured cases.
pub const REFERENCE_CASES: &[ReferenceCase] = &[
    ReferenceCase {
        name: "gray_shift_2",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 0,
        expected_error_sum: 194.99072265625,
    },
    ReferenceCase {
        name: "gray_shift_8",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 256,
        expected_error_sum: 801.80615234375,
    },
    ReferenceCase {
        name: "gray_shift_40",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 256,
        expected_error_sum: 4602.20751953125,
    },
    ReferenceCase {
        name: "red_shift_30",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 256,
        expected_error_sum: 249.2852783203125,
    },
    ReferenceCase {
        name: "blue_shift_30",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 256,
        expected_error_sum: 65625.65073195472,
    },
    ReferenceCase {
        name: "chroma_40",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 0,
        expected_error_sum: 75.560302734375,
    },
    ReferenceCase {
        name: "chroma_200",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 256,
        expected_error_sum: 1548031.5661512068,
    },
    ReferenceCase {
        name: "gradient_noise_8_1",
        width: 2,
        height: 2,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 0,
        expected_error_sum: 3.6175968161958068,
    },
    ReferenceCase {
        name: "gradient_noise_24_3",
        width: 3,
        height: 5,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 13,
        expected_error_sum: 2198.862485724142,
    },
    ReferenceCase {
        name: "gradient_noise_24_4",
        width: 7,
        height: 3,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 20,
        expected_error_sum: 3422.2543417823154,
    },
    ReferenceCase {
        name: "gradient_noise_4_5",
        width: 32,
        height: 24,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 32,
        expected_error_sum: 1960.4208942461119,
    },
    ReferenceCase {
        name: "gradient_noise_16_6",
        width: 64,
        height: 48,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 1737,
        expected_error_sum: 166019.3520903272,
    },
    ReferenceCase {
        name: "gradient_noise_6_7",
        width: 100,
        height: 80,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 2252,
        expected_error_sum: 56865.61771970165,
    },
    ReferenceCase {
        name: "gradient_rect",
        width: 48,
        height: 48,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 144,
        expected_error_sum: 2824434.946584812,
    },
    ReferenceCase {
        name: "random_noise_10_11",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 164,
        expected_error_sum: 7101.885850729018,
    },
    ReferenceCase {
        name: "random_noise_40_12",
        width: 40,
        height: 30,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 1163,
        expected_error_sum: 606820.9517309502,
    },
    ReferenceCase {
        name: "random_noise_3_13",
        width: 100,
        height: 80,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 49,
        expected_error_sum: 15608.556345238507,
    },
    ReferenceCase {
        name: "alpha_noise_30_21",
        width: 16,
        height: 16,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 74,
        expected_error_sum: 5776.86731411733,
    },
    ReferenceCase {
        name: "alpha_noise_80_22",
        width: 48,
        height: 32,
        params: DEFAULT_PARAMS,
        expected_pixels_failed: 631,
        expected_error_sum: 136632.79162315765,
    },
    ReferenceCase {
        name: "random_noise_40_12",
        width: 40,
        height: 30,
        params: ReferenceParams {
            luminance_only: true,
            field_of_view: 45.0,
            gamma: 2.2,
            luminance: 100.0,
            color_factor: 1.0,
        },
        expected_pixels_failed: 2,
        expected_error_sum: 6251.868210271001,
    },
    ReferenceCase {
        name: "alpha_noise_80_22",
        width: 48,
        height: 32,
        params: ReferenceParams {
            luminance_only: true,
            field_of_view: 45.0,
            gamma: 2.2,
            luminance: 100.0,
            color_factor: 1.0,
        },
        expected_pixels_failed: 188,
        expected_error_sum: 6757.660226094322,
    },
    ReferenceCase {
        name: "gradient_rect",
        width: 48,
        height: 48,
        params: ReferenceParams {
            luminance_only: true,
            field_of_view: 45.0,
            gamma: 2.2,
            luminance: 100.0,
            color_factor: 1.0,
        },
        expected_pixels_failed: 144,
        expected_error_sum: 4069.9255735874176,
    },
    ReferenceCase {
        name: "gradient_noise_16_6",
        width: 64,
        height: 48,
        params: ReferenceParams {
            luminance_only: false,
            field_of_view: 10.0,
            gamma: 2.2,
            luminance: 100.0,
            color_factor: 1.0,
        },
        expected_pixels_failed: 1780,
        expected_error_sum: 165805.39855243644,
    },
    ReferenceCase {
        name: "gradient_noise_16_6",
        width: 64,
        height: 48,
        params: ReferenceParams {
            luminance_only: false,
            field_of_view: 80.0,
            gamma: 1.8,
            luminance: 300.0,
            color_factor: 0.25,
        },
        expected_pixels_failed: 1651,
        expected_error_sum: 76848.01998343278,
    },
    ReferenceCase {
        name: "random_noise_40_12",
        width: 40,
        height: 30,
        params: ReferenceParams {
            luminance_only: false,
            field_of_view: 60.0,
            gamma: 2.4,
            luminance: 20.0,
            color_factor: 0.5,
        },
        expected_pixels_failed: 0,
        expected_error_sum: 1262.3256063368171,
    },
    ReferenceCase {
        name: "chroma_200",
        width: 16,
        height: 16,
        params: ReferenceParams {
            luminance_only: false,
            field_of_view: 45.0,
            gamma: 2.2,
            luminance: 100.0,
            color_factor: 0.0,
        },
        expected_pixels_failed: 256,
        expected_error_sum: 2606.31982421875,
    },
    ReferenceCase {
        name: "alpha_noise_30_21",
        width: 16,
        height: 16,
        params: ReferenceParams {
            luminance_only: false,
            field_of_view: 30.0,
            gamma: 1.0,
            luminance: 500.0,
            color_factor: 0.75,
        },
        expected_pixels_failed: 46,
        expected_error_sum: 8413.927136718494,
    },
];
