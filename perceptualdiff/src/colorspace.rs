//! Colour space conversion for the perceptual metric.
//!
//! Each pixel is treated as Adobe RGB (1998) with a D65 white point:
//! 1. Premultiply by alpha and apply the display gamma
//! 2. Convert to CIE XYZ
//! 3. Convert to CIE LAB relative to the Adobe RGB white
//!
//! Only the `a`/`b` chroma components and the luminance `Y` (scaled to
//! cd/m^2 by the display luminance) are kept; `L` is not used by the metric.

use std::sync::LazyLock;

use log::{debug, log_enabled, trace, Level};

use crate::consts::{ADOBE_RGB_TO_XYZ, LAB_EPSILON, LAB_KAPPA};
use crate::image::RgbaImage;

/// CIE XYZ tristimulus values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE LAB coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// XYZ of RGB (1, 1, 1); every LAB conversion is relative to it.
static REFERENCE_WHITE: LazyLock<Xyz> = LazyLock::new(|| adobe_rgb_to_xyz(1.0, 1.0, 1.0));

/// Returns the process-wide reference white.
#[must_use]
pub fn reference_white() -> Xyz {
    *REFERENCE_WHITE
}

/// Converts linear Adobe RGB (1998) to XYZ.
#[inline]
#[must_use]
pub fn adobe_rgb_to_xyz(r: f64, g: f64, b: f64) -> Xyz {
    let m = &ADOBE_RGB_TO_XYZ;
    Xyz {
        x: r * m[0][0] + g * m[0][1] + b * m[0][2],
        y: r * m[1][0] + g * m[1][1] + b * m[1][2],
        z: r * m[2][0] + g * m[2][1] + b * m[2][2],
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.powf(1.0 / 3.0)
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

/// Converts XYZ to LAB relative to [`reference_white`].
#[inline]
#[must_use]
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let white = &*REFERENCE_WHITE;
    let fx = lab_f(xyz.x / white.x);
    let fy = lab_f(xyz.y / white.y);
    let fz = lab_f(xyz.z / white.z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Per-pixel channels of one image in the metric's working space.
#[derive(Debug, Clone)]
pub struct PerceptualChannels {
    /// Luminance `Y * display_luminance`, in cd/m^2.
    pub lum: Vec<f32>,
    /// LAB `a`.
    pub a: Vec<f32>,
    /// LAB `b`.
    pub b: Vec<f32>,
}

impl PerceptualChannels {
    /// Converts every pixel of `img`.
    ///
    /// Colour channels are premultiplied by alpha before the gamma curve,
    /// so differences in alpha are invisible where the colour is black.
    #[must_use]
    pub fn from_image(img: &RgbaImage, gamma: f64, luminance: f64) -> Self {
        let len = img.len();
        let mut lum = Vec::with_capacity(len);
        let mut a = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);

        for i in 0..len {
            let alpha = f64::from(img.alpha(i)) / 255.0;
            let linear = |c: u8| (f64::from(c) / 255.0 * alpha).powf(gamma);

            let xyz = adobe_rgb_to_xyz(linear(img.red(i)), linear(img.green(i)), linear(img.blue(i)));
            let lab = xyz_to_lab(xyz);

            lum.push((xyz.y * luminance) as f32);
            a.push(lab.a as f32);
            b.push(lab.b as f32);
        }

        Self { lum, a, b }
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lum.len()
    }

    /// Returns `true` if there are no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lum.is_empty()
    }

    pub(crate) fn trace_dump(&self, label: &str) {
        crate::trace_array(&format!("{label}.lum"), &self.lum);
        crate::trace_array(&format!("{label}.a"), &self.a);
        crate::trace_array(&format!("{label}.b"), &self.b);
    }
}

/// Converts both images of a comparison.
///
/// Both images must have the same dimensions.
#[must_use]
pub fn convert_pair(
    img_a: &RgbaImage,
    img_b: &RgbaImage,
    gamma: f64,
    luminance: f64,
) -> (PerceptualChannels, PerceptualChannels) {
    debug_assert_eq!(img_a.len(), img_b.len());

    let start = std::time::Instant::now();
    let channels = (
        PerceptualChannels::from_image(img_a, gamma, luminance),
        PerceptualChannels::from_image(img_b, gamma, luminance),
    );
    debug!("colour conversion took {:?}", start.elapsed());

    if log_enabled!(Level::Trace) {
        trace!("perceptual channels");
        channels.0.trace_dump("a");
        channels.1.trace_dump("b");
    }

    channels
}
