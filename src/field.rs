//! CPU evaluation of the fragment stage in [`crate::shader::FRAGMENT_SHADER`].
//!
//! Used for still previews (`render_poster`) and to check the shader's numeric
//! behaviour on the host. `fwidth` has no CPU equivalent, so the mask takes
//! one-pixel finite differences instead.

use glam::{vec2, vec3, Vec2, Vec3, Vec4};

use crate::error::{RenderError, RenderResult};
use crate::palette::{Palette, MAX_COLORS};

const SOFTNESS: f32 = 0.2;
const INTENSITY: f32 = 0.5;
const NOISE_STRENGTH: f32 = 0.1;
const SCALE: f32 = 1.0;

const SPEED: f32 = 0.1;
const DISTORTION: f32 = 0.66;
const SWIRL: f32 = 0.14;
const GRAIN_MIX: f32 = 0.0;
const GRAIN_OVERLAY: f32 = 0.05;

const ROTATION_DEGREES: f32 = 0.0;
const OFFSET: Vec2 = Vec2::new(0.5, 0.5);

const MASK_WARMUP: f32 = 7.0;
const CONTENT_WARMUP: f32 = 41.5;

/// Fragments whose mask falls below this are discarded.
pub const VISIBILITY_THRESHOLD: f32 = 0.001;

const WEIGHT_EPSILON: f32 = 1e-3;
const TOTAL_WEIGHT_FLOOR: f32 = 1e-4;
const FALLOFF_EXPONENT: f32 = 3.5;

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn fract3(v: Vec3) -> Vec3 {
    v - v.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn mod289(v: Vec3) -> Vec3 {
    v - (v / 289.0).floor() * 289.0
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn smoothstep2(edge0: Vec2, edge1: Vec2, x: Vec2) -> Vec2 {
    vec2(smoothstep(edge0.x, edge1.x, x.x), smoothstep(edge0.y, edge1.y, x.y))
}

pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    vec2(c * v.x - s * v.y, s * v.x + c * v.y)
}

fn hash21(p: Vec2) -> f32 {
    let p = p * vec2(123.34, 456.21);
    let mut p = p - p.floor();
    let d = p.dot(p + 45.32);
    p += d;
    fract(p.x * p.y)
}

fn random_r(p: Vec2) -> f32 {
    fract(p.dot(vec2(12.9898, 78.233)).sin() * 43758.5453)
}

fn lattice_noise(st: Vec2, corner: impl Fn(Vec2) -> f32) -> f32 {
    let i = st.floor();
    let f = st - i;
    let a = corner(i);
    let b = corner(i + vec2(1.0, 0.0));
    let c = corner(i + vec2(0.0, 1.0));
    let d = corner(i + vec2(1.0, 1.0));
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

/// Value noise over [`hash21`].
pub fn value_noise(st: Vec2) -> f32 {
    lattice_noise(st, hash21)
}

/// Value noise over the sine hash, used by the mask's fractal sum.
pub fn value_noise_r(st: Vec2) -> f32 {
    lattice_noise(st, random_r)
}

fn permute(x: Vec3) -> Vec3 {
    mod289((x * 34.0 + Vec3::ONE) * x)
}

/// 2D simplex gradient noise, roughly in [-1, 1].
pub fn snoise(v: Vec2) -> f32 {
    const C: Vec4 = Vec4::new(
        0.211324865405187,
        0.366025403784439,
        -0.577350269189626,
        0.024390243902439,
    );
    let mut i = (v + v.dot(Vec2::splat(C.y))).floor();
    let x0 = v - i + i.dot(Vec2::splat(C.x));
    let i1 = if x0.x > x0.y { vec2(1.0, 0.0) } else { vec2(0.0, 1.0) };
    let x12_xy = x0 + Vec2::splat(C.x) - i1;
    let x12_zw = x0 + Vec2::splat(C.z);
    i = vec2(i.x - (i.x / 289.0).floor() * 289.0, i.y - (i.y / 289.0).floor() * 289.0);

    let p = permute(permute(Vec3::splat(i.y) + vec3(0.0, i1.y, 1.0)) + Vec3::splat(i.x) + vec3(0.0, i1.x, 1.0));
    let mut m = (Vec3::splat(0.5) - vec3(x0.dot(x0), x12_xy.dot(x12_xy), x12_zw.dot(x12_zw))).max(Vec3::ZERO);
    m = m * m;
    m = m * m;

    let x = 2.0 * fract3(p * C.w) - Vec3::ONE;
    let h = x.abs() - Vec3::splat(0.5);
    let ox = (x + Vec3::splat(0.5)).floor();
    let a0 = x - ox;
    m *= Vec3::splat(1.79284291400159) - 0.85373472095314 * (a0 * a0 + h * h);

    let g = vec3(
        a0.x * x0.x + h.x * x0.y,
        a0.y * x12_xy.x + h.y * x12_xy.y,
        a0.z * x12_zw.x + h.z * x12_zw.y,
    );
    130.0 * m.dot(g)
}

/// Three octaves of [`value_noise_r`] at four coordinates at once.
pub fn fbm_r(mut n: [Vec2; 4]) -> Vec4 {
    let mut amplitude = 0.2;
    let mut total = [0.0f32; 4];
    for _ in 0..3 {
        for (slot, coord) in total.iter_mut().zip(n.iter_mut()) {
            *coord = rotate(*coord, 0.3);
            *slot += value_noise_r(*coord) * amplitude;
            *coord *= 1.99;
        }
        amplitude *= 0.6;
    }
    Vec4::from_array(total)
}

/// Anchor of palette entry `index` at content time `t`.
pub fn orbit_position(index: usize, t: f32) -> Vec2 {
    let i = index as f32;
    let a = i * 0.37;
    let b = 0.6 + fract(i / 3.0) * 0.9;
    let c = 0.8 + fract((i + 1.0) / 4.0);
    let x = (t * b + a).sin();
    let y = (t * c + a * 1.5).cos();
    Vec2::splat(0.5) + 0.5 * vec2(x, y)
}

fn mask_time(time: f32) -> f32 {
    0.1 * (time * SPEED * 10.0 + MASK_WARMUP)
}

fn content_time(time: f32) -> f32 {
    0.5 * (time * SPEED * 10.0 + CONTENT_WARMUP)
}

/// Color count as the mask divides by it.
fn count_divisor(color_count: usize) -> f32 {
    color_count.clamp(1, MAX_COLORS) as f32
}

/// Mask value before anti-aliasing; the quantity `fwidth` is taken of.
fn raw_mask(uv: Vec2, resolution: Vec2, time: f32, color_count: usize) -> f32 {
    let t = mask_time(time);
    let r = ROTATION_DEGREES.to_radians();
    let graphic_offset = vec2(-OFFSET.x, OFFSET.y);

    let mut shape_uv = uv - vec2(0.5, 0.3);
    let grain_uv = (rotate(shape_uv, -r) * SCALE - graphic_offset) * resolution * 0.7;

    shape_uv *= 0.6;
    let outer = Vec2::splat(0.5);

    let wobble = |y_term: f32| vec2(0.1 + 0.1 * (3.0 * t).sin(), 0.2 - 0.1 * y_term);
    let bl = smoothstep2(Vec2::ZERO, outer, shape_uv + wobble((5.25 * t).sin()));
    let tr = smoothstep2(Vec2::ZERO, outer, Vec2::ONE - shape_uv);
    let mut shape = 1.0 - bl.x * bl.y * tr.x * tr.y;

    let neg = -shape_uv;
    let bl = smoothstep2(Vec2::ZERO, outer, neg + wobble((5.25 * t).cos()));
    let tr = smoothstep2(Vec2::ZERO, outer, Vec2::ONE - neg);
    shape -= bl.x * bl.y * tr.x * tr.y;

    shape = 1.0 - smoothstep(0.0, 1.0, shape);

    let base_noise = snoise(grain_uv * 0.5) * GRAIN_OVERLAY;
    let fbm = fbm_r([
        0.002 * grain_uv + Vec2::splat(10.0),
        0.003 * grain_uv,
        0.001 * grain_uv,
        rotate(0.4 * grain_uv, 2.0),
    ]);

    let grain_dist = base_noise * snoise(grain_uv * 0.2) - fbm.x - fbm.y;
    let raw_noise = 0.75 * base_noise - fbm.w - fbm.z;
    let noise = raw_noise.clamp(0.0, 1.0);

    let count = count_divisor(color_count);
    shape += INTENSITY * 2.0 / count * (grain_dist + 0.5);
    shape += NOISE_STRENGTH * 10.0 / count * noise;
    shape
}

/// Soft-edged animated silhouette in [0, 1] at `uv` (origin bottom-left).
pub fn corners_mask(uv: Vec2, resolution: Vec2, time: f32, color_count: usize) -> f32 {
    let shape = raw_mask(uv, resolution, time, color_count);

    let aa = if resolution.x > 0.0 && resolution.y > 0.0 {
        let dx = raw_mask(uv + vec2(1.0 / resolution.x, 0.0), resolution, time, color_count) - shape;
        let dy = raw_mask(uv + vec2(0.0, 1.0 / resolution.y), resolution, time, color_count) - shape;
        dx.abs() + dy.abs()
    } else {
        0.0
    };

    let count = count_divisor(color_count);
    let shape = (shape - 0.5 / count).clamp(0.0, 1.0);
    smoothstep(0.0, SOFTNESS + 2.0 * aa, (shape * count).clamp(0.0, 1.0))
}

/// Inverse-distance blend of the palette over a swirled, distorted `uv`.
/// Returns premultiplied rgb and aggregate opacity.
pub fn mesh_content(uv: Vec2, time: f32, palette: &Palette) -> Vec4 {
    let grain = value_noise(uv * 1000.0);
    let mixer_grain = 0.4 * GRAIN_MIX * (grain - 0.5);

    let t = content_time(time);

    let radius = smoothstep(0.0, 1.0, (uv - Vec2::splat(0.5)).length());
    let center = 1.0 - radius;

    let mut uv = uv;
    for i in [1.0f32, 2.0] {
        uv.x += DISTORTION * center / i
            * (t + i * 0.4 * smoothstep(0.0, 1.0, uv.y)).sin()
            * (0.2 * t + i * 2.4 * smoothstep(0.0, 1.0, uv.y)).cos();
        uv.y += DISTORTION * center / i * (t + i * 2.0 * smoothstep(0.0, 1.0, uv.x)).cos();
    }

    let angle = 3.0 * SWIRL * radius;
    let swirled = rotate(uv - Vec2::splat(0.5), -angle) + Vec2::splat(0.5);

    let mut color = Vec3::ZERO;
    let mut opacity = 0.0;
    let mut total_weight = 0.0;
    for (index, entry) in palette.colors().iter().enumerate().take(MAX_COLORS) {
        let anchor = orbit_position(index, t) + Vec2::splat(mixer_grain);
        let dist = (swirled - anchor).length().powf(FALLOFF_EXPONENT);
        let weight = 1.0 / (dist + WEIGHT_EPSILON);
        color += Vec3::from_array(entry.premultiplied()) * weight;
        opacity += entry.a * weight;
        total_weight += weight;
    }

    let norm = total_weight.max(TOTAL_WEIGHT_FLOOR);
    (color / norm).extend(opacity / norm)
}

/// Output of one fragment, or `None` where the fragment is discarded.
pub fn shade(uv: Vec2, resolution: Vec2, time: f32, palette: &Palette) -> Option<Vec4> {
    let mask = corners_mask(uv, resolution, time, palette.len());
    if mask < VISIBILITY_THRESHOLD {
        return None;
    }
    let content = mesh_content(uv, time, palette);
    Some((content.truncate() * mask).extend(mask))
}

/// Rasterises one frame as premultiplied RGBA8, top row first. Sizes whose
/// byte count overflows `usize` or cannot be allocated are refused.
pub fn render_poster(width: u32, height: u32, time: f32, palette: &Palette) -> RenderResult<Vec<u8>> {
    let too_large = || RenderError::PosterTooLarge { width, height };
    let len = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(too_large)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).map_err(|_| too_large())?;
    let resolution = vec2(width as f32, height as f32);
    for row in 0..height {
        let v = 1.0 - (row as f32 + 0.5) / height as f32;
        for col in 0..width {
            let u = (col as f32 + 0.5) / width as f32;
            let rgba = shade(vec2(u, v), resolution, time, palette).unwrap_or(Vec4::ZERO);
            pixels.extend(
                rgba.to_array()
                    .iter()
                    .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8),
            );
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgba;

    const RES: Vec2 = Vec2::new(800.0, 600.0);

    fn samples() -> Vec<Vec2> {
        let mut out = Vec::new();
        for i in 0..=6 {
            for j in 0..=6 {
                out.push(vec2(i as f32 / 6.0, j as f32 / 6.0));
            }
        }
        out
    }

    fn palette_of(len: usize) -> Palette {
        Palette::new((0..len).map(|i| {
            let f = i as f32 / 10.0;
            Rgba::new(f, 1.0 - f, 0.5, 1.0)
        }))
    }

    #[test]
    fn output_is_finite_for_every_palette_length() {
        for len in 0..=MAX_COLORS {
            let palette = palette_of(len);
            for uv in samples() {
                for time in [0.0, 3.3, 120.0] {
                    let content = mesh_content(uv, time, &palette);
                    assert!(content.is_finite(), "len {len} uv {uv:?} t {time}: {content:?}");
                    let mask = corners_mask(uv, RES, time, len);
                    assert!(mask.is_finite() && (0.0..=1.0).contains(&mask));
                }
            }
        }
    }

    #[test]
    fn empty_palette_blends_to_nothing() {
        let content = mesh_content(vec2(0.5, 0.5), 1.0, &Palette::default());
        assert_eq!(content, Vec4::ZERO);
    }

    #[test]
    fn single_color_is_reproduced_everywhere() {
        let color = Rgba::new(0.2, 0.4, 0.8, 0.5);
        let palette = Palette::new([color]);
        let expected = Vec3::from_array(color.premultiplied());
        for uv in samples() {
            let content = mesh_content(uv, 2.0, &palette);
            assert!((content.truncate() - expected).abs().max_element() < 1e-4, "{content:?}");
            assert!((content.w - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn mask_changes_smoothly_in_time() {
        let eps = 1e-4;
        for uv in samples() {
            for time in [0.0, 1.7, 12.3] {
                let a = corners_mask(uv, RES, time, 3);
                let b = corners_mask(uv, RES, time + eps, 3);
                assert!((a - b).abs() < 100.0 * eps, "uv {uv:?} t {time}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn orbit_positions_stay_in_unit_square() {
        for index in 0..MAX_COLORS {
            for t in [0.0, 20.75, 999.0] {
                let p = orbit_position(index, t);
                assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn orbits_differ_per_index() {
        let t = content_time(0.0);
        assert_ne!(orbit_position(0, t), orbit_position(1, t));
    }

    #[test]
    fn noise_functions_are_bounded() {
        for uv in samples() {
            let p = uv * 37.0 - Vec2::splat(11.0);
            assert!((0.0..=1.0).contains(&value_noise(p)));
            assert!((0.0..=1.0).contains(&value_noise_r(p)));
            assert!(snoise(p).abs() <= 1.5);
        }
    }

    #[test]
    fn smoothstep_matches_glsl() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(vec2(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!((r - vec2(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn poster_is_premultiplied_rgba() {
        let palette = palette_of(3);
        let pixels = render_poster(16, 9, 4.0, &palette).unwrap();
        assert_eq!(pixels.len(), 16 * 9 * 4);
        for px in pixels.chunks_exact(4) {
            let alpha = px[3];
            assert!(px[..3].iter().all(|&c| c <= alpha.saturating_add(1)), "{px:?}");
        }
    }

    #[test]
    fn oversized_poster_is_refused() {
        let palette = palette_of(2);
        assert_eq!(
            render_poster(u32::MAX, u32::MAX, 0.0, &palette),
            Err(RenderError::PosterTooLarge {
                width: u32::MAX,
                height: u32::MAX,
            })
        );
    }

    #[test]
    fn empty_poster_has_no_pixels() {
        assert_eq!(render_poster(0, 7, 1.0, &palette_of(1)), Ok(Vec::new()));
    }
}
