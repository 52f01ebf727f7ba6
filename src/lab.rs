//! CIELAB color math: sRGB⇄XYZ⇄LAB conversions, CIE76 ΔE, lightness
//! clamping, and the randomized "generate a LAB point at a target
//! perceptual distance from a base" algorithm the color generator builds
//! on.

use std::f64::consts::TAU;

use rand::Rng;

use crate::color::Rgb;

/// D65 reference white, 2-degree observer.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

/// CIE f(t) piecewise constants.
const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

const L_MIN: f64 = 0.0;
const L_MAX: f64 = 100.0;
const AB_MIN: f64 = -128.0;
const AB_MAX: f64 = 127.0;

/// A point in CIELAB space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        let (x, y, z) = rgb_to_xyz(rgb);
        xyz_to_lab(x, y, z)
    }

    pub fn to_rgb(self) -> Rgb {
        let (x, y, z) = lab_to_xyz(self);
        xyz_to_rgb(x, y, z)
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    match c <= 0.04045 {
        true => c / 12.92,
        false => ((c + 0.055) / 1.055).powf(2.4),
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    match c <= 0.0031308 {
        true => c * 12.92,
        false => 1.055 * c.powf(1.0 / 2.4) - 0.055,
    }
}

fn rgb_to_xyz(rgb: Rgb) -> (f64, f64, f64) {
    let r = srgb_to_linear(f64::from(rgb.r) / 255.0);
    let g = srgb_to_linear(f64::from(rgb.g) / 255.0);
    let b = srgb_to_linear(f64::from(rgb.b) / 255.0);

    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;
    (x, y, z)
}

fn xyz_to_rgb(x: f64, y: f64, z: f64) -> Rgb {
    let r = x * 3.2404542 + y * -1.5371385 + z * -0.4985314;
    let g = x * -0.9692660 + y * 1.8760108 + z * 0.0415560;
    let b = x * 0.0556434 + y * -0.2040259 + z * 1.0572252;

    let to_channel = |c: f64| -> u8 {
        (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

fn f(t: f64) -> f64 {
    match t > EPSILON {
        true => t.cbrt(),
        false => (KAPPA * t + 16.0) / 116.0,
    }
}

fn f_inv(t: f64) -> f64 {
    let t3 = t * t * t;
    match t3 > EPSILON {
        true => t3,
        false => (116.0 * t - 16.0) / KAPPA,
    }
}

fn xyz_to_lab(x: f64, y: f64, z: f64) -> Lab {
    let fx = f(x / XN);
    let fy = f(y / YN);
    let fz = f(z / ZN);
    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

fn lab_to_xyz(lab: Lab) -> (f64, f64, f64) {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    (XN * f_inv(fx), YN * f_inv(fy), ZN * f_inv(fz))
}

/// CIE76 ΔE: Euclidean distance between two LAB points.
pub fn delta_e76(a: Lab, b: Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Clamp a LAB point's L to `[l_min, l_max]` and a/b to `[-128, 127]`.
pub fn clamp_lab(lab: Lab, l_min: f64, l_max: f64) -> Lab {
    Lab::new(
        lab.l.clamp(l_min, l_max),
        lab.a.clamp(AB_MIN, AB_MAX),
        lab.b.clamp(AB_MIN, AB_MAX),
    )
}

/// Absolute lightness bounds, ignoring any per-call `l_min`/`l_max`.
pub const fn absolute_l_range() -> (f64, f64) {
    (L_MIN, L_MAX)
}

/// Generate a LAB point at roughly `target` ΔE from `base`:
///
/// 1. Draw `target_L` uniformly from `[l_min, l_max]`.
/// 2. Draw a random hue angle `θ`.
/// 3. Offset `(a, b)` from `base` by `0.7 * target` along `θ`.
/// 4. Clamp to valid LAB.
/// 5. If the post-clamp ΔE collapsed below `0.5 * target` (and isn't
///    exactly zero), rescale the `(a, b)` offset to restore that floor and
///    clamp again.
pub fn generate_lab_at_distance<R: Rng + ?Sized>(
    rng: &mut R,
    base: Lab,
    target: f64,
    l_min: f64,
    l_max: f64,
) -> Lab {
    let target_l = rng.random_range(l_min..=l_max);
    let theta = rng.random_range(0.0..TAU);
    let ab_dist = 0.7 * target;

    let candidate = Lab::new(
        target_l,
        base.a + ab_dist * theta.cos(),
        base.b + ab_dist * theta.sin(),
    );
    let mut candidate = clamp_lab(candidate, l_min, l_max);

    let de = delta_e76(candidate, base);
    let floor = 0.5 * target;
    if de < floor && de > 0.0 {
        let dl = candidate.l - base.l;
        let needed_ab = (floor * floor - dl * dl).max(0.0).sqrt();
        let da = candidate.a - base.a;
        let db = candidate.b - base.b;
        let current_ab = (da * da + db * db).sqrt();
        if current_ab > 0.0 {
            let scale = needed_ab / current_ab;
            candidate = clamp_lab(
                Lab::new(candidate.l, base.a + da * scale, base.b + db * scale),
                l_min,
                l_max,
            );
        }
    }
    candidate
}

/// A fixed, ordered set of LAB points chosen for wide hue coverage, used
/// when randomized generation repeatedly fails to clear `min_delta_e`.
/// Indexing wraps around.
const FALLBACK_PALETTE: &[Lab] = &[
    Lab::new(55.0, 55.0, 45.0),  // red-orange
    Lab::new(60.0, -55.0, 45.0), // green
    Lab::new(50.0, 10.0, -60.0), // blue
    Lab::new(55.0, 65.0, -40.0), // magenta
    Lab::new(85.0, -10.0, 80.0), // yellow
    Lab::new(75.0, -40.0, -10.0), // cyan
    Lab::new(50.0, 30.0, 40.0),  // orange-brown
    Lab::new(55.0, -35.0, -5.0), // teal
    Lab::new(70.0, 50.0, -5.0),  // pink
    Lab::new(30.0, 20.0, -50.0), // dark blue
];

pub fn fallback_lab(index: usize) -> Lab {
    FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
}

pub fn fallback_palette_len() -> usize {
    FALLBACK_PALETTE.len()
}
