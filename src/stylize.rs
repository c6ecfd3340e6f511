//! CPU reference implementations of the per-pixel stylization library.
//!
//! The WGSL versions in `shaders/stylize.wgsl` run on the GPU every frame;
//! these mirrors pin down the exact formulas so their algebraic properties
//! (luminance linearity, quantization idempotence, CMYK round trips, blend
//! endpoints, screen coverage at the tone extremes) can be tested without a
//! device.

/// Rec. 601 luminance: `0.299 R + 0.587 G + 0.114 B`.
pub fn luma(rgb: [f32; 3]) -> f32 {
    0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
}

/// Reduce a continuous tone to `levels` discrete bands:
/// `round(l * levels) / levels`.
pub fn quantize(l: f32, levels: u32) -> f32 {
    let levels = levels as f32;
    (l * levels).round() / levels
}

/// CMYK separation: `C,M,Y = 1 - R,G,B`, `K = min(C, M, Y)`.
pub fn rgb_to_cmyk(rgb: [f32; 3]) -> [f32; 4] {
    let c = 1.0 - rgb[0];
    let m = 1.0 - rgb[1];
    let y = 1.0 - rgb[2];
    [c, m, y, c.min(m).min(y)]
}

/// Plain inversion of the separation; the K plate is laid down by the
/// halftone screen, not by this conversion.
pub fn cmyk_to_rgb(cmyk: [f32; 4]) -> [f32; 3] {
    [1.0 - cmyk[0], 1.0 - cmyk[1], 1.0 - cmyk[2]]
}

/// Darken the recombined color by the K plate coverage.
pub fn apply_key(rgb: [f32; 3], k: f32) -> [f32; 3] {
    [rgb[0] * (1.0 - k), rgb[1] * (1.0 - k), rgb[2] * (1.0 - k)]
}

pub fn blend_darken(base: [f32; 3], blend: [f32; 3]) -> [f32; 3] {
    [
        base[0].min(blend[0]),
        base[1].min(blend[1]),
        base[2].min(blend[2]),
    ]
}

pub fn blend_screen(base: [f32; 3], blend: [f32; 3]) -> [f32; 3] {
    [
        1.0 - (1.0 - base[0]) * (1.0 - blend[0]),
        1.0 - (1.0 - base[1]) * (1.0 - blend[1]),
        1.0 - (1.0 - base[2]) * (1.0 - blend[2]),
    ]
}

pub fn blend_color_burn(base: [f32; 3], blend: [f32; 3]) -> [f32; 3] {
    let burn = |b: f32, s: f32| (1.0 - (1.0 - b) / s.max(1e-4)).clamp(0.0, 1.0);
    [
        burn(base[0], blend[0]),
        burn(base[1], blend[1]),
        burn(base[2], blend[2]),
    ]
}

/// Opacity-mix variant shared by all blend modes:
/// `blend(base, ink) * opacity + base * (1 - opacity)`.
pub fn blend_with_opacity(
    mode: fn([f32; 3], [f32; 3]) -> [f32; 3],
    base: [f32; 3],
    blend: [f32; 3],
    opacity: f32,
) -> [f32; 3] {
    let mixed = mode(base, blend);
    [
        mixed[0] * opacity + base[0] * (1.0 - opacity),
        mixed[1] * opacity + base[1] * (1.0 - opacity),
        mixed[2] * opacity + base[2] * (1.0 - opacity),
    ]
}

/// 3x3 Sobel magnitude over a scalar field sampled at integer offsets from
/// the center texel.
pub fn sobel<F: Fn(i32, i32) -> f32>(sample: F) -> f32 {
    let horiz = -sample(-1, -1) - 2.0 * sample(-1, 0) - sample(-1, 1)
        + sample(1, -1)
        + 2.0 * sample(1, 0)
        + sample(1, 1);
    let vert = -sample(-1, -1) - 2.0 * sample(0, -1) - sample(1, -1)
        + sample(-1, 1)
        + 2.0 * sample(0, 1)
        + sample(1, 1);
    (horiz * horiz + vert * vert).sqrt()
}

/// Halftone dot coverage of one print channel.
///
/// `st` is the rotated lattice coordinate; the dot covers the texel when the
/// channel's ink density (square-rooted, as dot radius) exceeds the distance
/// to the cell center. Returns 1.0 for covered, 0.0 for clear.
pub fn halftone_dot(value: f32, st: [f32; 2], width: f32, strength: f32) -> f32 {
    // GLSL fract: x - floor(x), non-negative for any input.
    let fract = |x: f32| x - x.floor();
    let cell = [
        width * (2.0 * fract(st[0]) - 1.0),
        width * (2.0 * fract(st[1]) - 1.0),
    ];
    let dist = (cell[0] * cell[0] + cell[1] * cell[1]).sqrt();
    if value.max(0.0).sqrt() - dist - (1.0 - strength) >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// GLSL-style mod, matching the WGSL `gmod` helper.
fn gmod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// Cross-hatching ladder: 0.0 where a stroke covers the point, 1.0 elsewhere.
///
/// Line families at luminance thresholds 1.0/0.8/0.6/0.4/0.2; `e` is the
/// stroke width in pattern space.
pub fn hatch(p: [f32; 2], lum: f32, e: f32) -> f32 {
    let (x, y) = (p[0], p[1]);
    if lum < 1.0 && gmod(x + y, 10.0).abs() < e {
        return 0.0;
    }
    if lum < 0.8 && gmod(x - y, 10.0).abs() < e {
        return 0.0;
    }
    if lum < 0.6 && gmod(x + y - 5.0, 10.0).abs() < e {
        return 0.0;
    }
    if lum < 0.4 && gmod(x - y - 5.0, 10.0).abs() < e {
        return 0.0;
    }
    if lum < 0.2 && gmod(x + y - 7.5, 10.0).abs() < e {
        return 0.0;
    }
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_rgb_eq(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < EPS, "channel {i}: {} != {}", a[i], b[i]);
        }
    }

    #[test]
    fn luma_is_linear_under_uniform_scaling() {
        let c = [0.25, 0.5, 0.75];
        for k in [0.0, 0.5, 1.0, 2.0] {
            let scaled = [k * c[0], k * c[1], k * c[2]];
            assert!((luma(scaled) - k * luma(c)).abs() < EPS);
        }
    }

    #[test]
    fn luma_weights_sum_to_one() {
        assert!((luma([1.0, 1.0, 1.0]) - 1.0).abs() < EPS);
    }

    #[test]
    fn quantize_is_idempotent() {
        for levels in [1, 2, 5, 10, 255] {
            for i in 0..=100 {
                let l = i as f32 / 100.0;
                let once = quantize(l, levels);
                assert!((quantize(once, levels) - once).abs() < EPS, "levels {levels}, l {l}");
            }
        }
    }

    #[test]
    fn cmyk_round_trip_reproduces_rgb() {
        for rgb in [
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.2, 0.4, 0.8],
            [0.9, 0.1, 0.5],
        ] {
            assert_rgb_eq(cmyk_to_rgb(rgb_to_cmyk(rgb)), rgb);
        }
    }

    #[test]
    fn cmyk_key_is_min_channel() {
        let cmyk = rgb_to_cmyk([0.3, 0.6, 0.9]);
        assert!((cmyk[3] - 0.1).abs() < EPS);
    }

    #[test]
    fn key_darkens_to_black_at_full_coverage() {
        assert_rgb_eq(apply_key([0.5, 0.7, 0.9], 1.0), [0.0, 0.0, 0.0]);
        assert_rgb_eq(apply_key([0.5, 0.7, 0.9], 0.0), [0.5, 0.7, 0.9]);
    }

    #[test]
    fn blend_opacity_endpoints() {
        let base = [0.6, 0.3, 0.8];
        let ink = [0.9, 0.1, 0.4];
        for mode in [
            blend_darken as fn([f32; 3], [f32; 3]) -> [f32; 3],
            blend_screen,
            blend_color_burn,
        ] {
            assert_rgb_eq(blend_with_opacity(mode, base, ink, 0.0), base);
            assert_rgb_eq(blend_with_opacity(mode, base, ink, 1.0), mode(base, ink));
        }
    }

    #[test]
    fn blend_modes_stay_in_range() {
        let samples = [0.0, 0.001, 0.5, 0.999, 1.0];
        for &a in &samples {
            for &b in &samples {
                for mode in [
                    blend_darken as fn([f32; 3], [f32; 3]) -> [f32; 3],
                    blend_screen,
                    blend_color_burn,
                ] {
                    let out = mode([a, a, a], [b, b, b]);
                    for v in out {
                        assert!((0.0..=1.0).contains(&v), "{a} {b} -> {v}");
                    }
                }
            }
        }
    }

    #[test]
    fn sobel_of_constant_field_is_zero() {
        // Scenario: uniform background, constant normal buffer, no edges.
        let edge = sobel(|_, _| 0.73);
        assert!(edge.abs() < EPS);
    }

    #[test]
    fn sobel_detects_a_step() {
        let edge = sobel(|x, _| if x < 0 { 0.0 } else { 1.0 });
        assert!(edge > 1.0);
    }

    #[test]
    fn halftone_has_no_coverage_at_white() {
        // Scenario: fully lit surface, zero ink density in every channel.
        let cmyk = rgb_to_cmyk([1.0, 1.0, 1.0]);
        for (channel, &v) in cmyk.iter().enumerate() {
            // Sample away from the exact lattice point.
            let coverage = halftone_dot(v, [0.4 + channel as f32, 0.3], 0.68, 1.0);
            assert_eq!(coverage, 0.0);
        }
    }

    #[test]
    fn halftone_covers_fully_at_black() {
        let cmyk = rgb_to_cmyk([0.0, 0.0, 0.0]);
        // Ink density 1.0: the dot radius reaches across the whole cell.
        let coverage = halftone_dot(cmyk[3], [0.5, 0.5], 0.68, 1.0);
        assert_eq!(coverage, 1.0);
    }

    #[test]
    fn hatch_at_full_luminance_leaves_paper_clear() {
        // Scenario: white-lit quad, no line family active.
        for x in 0..20 {
            for y in 0..20 {
                assert_eq!(hatch([x as f32, y as f32], 1.0, 2.5), 1.0);
            }
        }
    }

    #[test]
    fn hatch_at_black_inks_every_stroke_line() {
        // Scenario: black object, all five families active; every point on a
        // diagonal line (x + y = 0 mod 10) is inked.
        for k in 0..10 {
            let p = [k as f32 * 10.0, 0.0];
            assert_eq!(hatch(p, 0.0, 2.5), 0.0);
        }
        // Midway between strokes with a narrow pen, paper still shows.
        assert_eq!(hatch([2.0, 0.5], 0.0, 0.4), 1.0);
    }

    #[test]
    fn hatch_density_grows_as_luminance_falls() {
        let count_ink = |lum: f32| -> usize {
            let mut n = 0;
            for x in 0..40 {
                for y in 0..40 {
                    if hatch([x as f32 * 0.5, y as f32 * 0.5], lum, 1.0) == 0.0 {
                        n += 1;
                    }
                }
            }
            n
        };
        assert!(count_ink(0.9) <= count_ink(0.5));
        assert!(count_ink(0.5) <= count_ink(0.1));
    }
}
