//! Style selection and the compositor's typed parameter record.
//!
//! Each style pairs a fragment body from `shaders/` with a set of default
//! parameters. Instead of one hand-copied shader per visual variant, there is
//! one record: pick a [`Style`], tweak [`StyleParams`], and the compositor
//! assembles and compiles the matching WGSL.

use crate::color::Color;

const COMPOSE_HEADER: &str = include_str!("shaders/compose_header.wgsl");
const STYLIZE_LIB: &str = include_str!("shaders/stylize.wgsl");

/// The available stylization algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Diagonal pencil cross-hatching, darker tones adding stroke families.
    CrossHatch,
    /// CMYK print halftone with rotated per-channel dot screens.
    Halftone,
    /// Engraving-style line screens, one rotated family per tone band.
    Lines,
    /// Quantized tone bands with borders and shadow hatching.
    Cartoon,
    /// White line work and section stripes over drafting blue.
    Blueprint,
}

impl Style {
    /// All styles, in presentation order.
    pub const ALL: [Style; 5] = [
        Style::CrossHatch,
        Style::Halftone,
        Style::Lines,
        Style::Cartoon,
        Style::Blueprint,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Style::CrossHatch => "cross-hatch",
            Style::Halftone => "halftone",
            Style::Lines => "lines",
            Style::Cartoon => "cartoon",
            Style::Blueprint => "blueprint",
        }
    }

    fn fragment_body(self) -> &'static str {
        match self {
            Style::CrossHatch => include_str!("shaders/style_crosshatch.wgsl"),
            Style::Halftone => include_str!("shaders/style_halftone.wgsl"),
            Style::Lines => include_str!("shaders/style_lines.wgsl"),
            Style::Cartoon => include_str!("shaders/style_cartoon.wgsl"),
            Style::Blueprint => include_str!("shaders/style_blueprint.wgsl"),
        }
    }

    /// The complete WGSL source of this style's compositor pass.
    pub(crate) fn compose_source(self) -> String {
        format!("{COMPOSE_HEADER}\n{STYLIZE_LIB}\n{}", self.fragment_body())
    }

    /// Default parameters, carrying each style's tuned constants.
    pub fn default_params(self) -> StyleParams {
        let base = StyleParams {
            scale: 1.0,
            thickness: 1.0,
            ink_color: Color::BLACK,
            paper_color: Color::WHITE,
            contour: 1.0,
            cyan: 1.0,
            magenta: 1.0,
            yellow: 1.0,
            black: 1.0,
            levels: 10.0,
            angle: 0.0,
            noise_scale: 1.0,
            divergence: 1.0,
            noisiness: 0.0,
            section_scale: 40.0,
            dark: 0.5,
            light: 0.1,
            blur_passes: 0,
        };
        match self {
            Style::CrossHatch => StyleParams {
                scale: 0.3,
                thickness: 2.5,
                ink_color: Color::rgb8(255, 0, 0),
                ..base
            },
            Style::Halftone => StyleParams {
                scale: 2.0,
                thickness: 0.32,
                contour: 2.1,
                yellow: 0.8,
                black: 0.4,
                ..base
            },
            Style::Lines => StyleParams {
                scale: 0.5,
                thickness: 0.72,
                contour: 1.2,
                angle: 2.0,
                noise_scale: 0.72,
                noisiness: 0.007,
                ink_color: Color::rgb8(68, 107, 147),
                ..base
            },
            Style::Cartoon => StyleParams {
                scale: 1.0,
                thickness: 1.0,
                noisiness: 0.005,
                ink_color: Color::rgb8(133, 106, 255),
                ..base
            },
            Style::Blueprint => StyleParams {
                scale: 1.5,
                contour: 2.0,
                angle: std::f32::consts::FRAC_PI_4,
                ink_color: Color::WHITE,
                paper_color: Color::rgb8(23, 89, 160),
                ..base
            },
        }
    }
}

/// The flat parameter namespace of the compositor.
///
/// Fields are typed and statically checked; [`StyleParams::set_scalar`] is
/// the string-keyed escape hatch for dynamic parameter surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleParams {
    /// Pattern scale of the active screen/hatch.
    pub scale: f32,
    /// Stroke thickness, dot gain, or border width depending on style.
    pub thickness: f32,
    pub ink_color: Color,
    pub paper_color: Color,
    /// Sobel sample width for silhouette contours.
    pub contour: f32,
    /// Per-channel halftone multipliers.
    pub cyan: f32,
    pub magenta: f32,
    pub yellow: f32,
    pub black: f32,
    /// Tone band count for quantizing styles.
    pub levels: f32,
    /// Base screen angle in radians.
    pub angle: f32,
    /// Domain-warp noise frequency.
    pub noise_scale: f32,
    /// Per-band angle spread for the engraving style.
    pub divergence: f32,
    /// Domain-warp amplitude.
    pub noisiness: f32,
    /// World-space lattice frequency of blueprint section stripes.
    pub section_scale: f32,
    /// Weight of the dark-tone hatch layer.
    pub dark: f32,
    /// Weight of the highlight hatch layer.
    pub light: f32,
    /// Separable blur iterations applied to the color buffer before
    /// compositing; 0 exposes the unfiltered render.
    pub blur_passes: u32,
}

/// A named-parameter error from the escape hatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownParam(pub String);

impl std::fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown style parameter `{}`", self.0)
    }
}

impl std::error::Error for UnknownParam {}

impl StyleParams {
    /// Set a scalar parameter by name.
    ///
    /// This exists for external parameter surfaces that address tunables as a
    /// flat namespace; typed field access is preferred everywhere else.
    pub fn set_scalar(&mut self, name: &str, value: f32) -> Result<(), UnknownParam> {
        match name {
            "scale" => self.scale = value,
            "thickness" => self.thickness = value,
            "contour" => self.contour = value,
            "cyan" => self.cyan = value,
            "magenta" => self.magenta = value,
            "yellow" => self.yellow = value,
            "black" => self.black = value,
            "levels" => self.levels = value,
            "angle" => self.angle = value,
            "noise_scale" => self.noise_scale = value,
            "divergence" => self.divergence = value,
            "noisiness" => self.noisiness = value,
            "section_scale" => self.section_scale = value,
            "dark" => self.dark = value,
            "light" => self.light = value,
            "blur_passes" => self.blur_passes = value.max(0.0) as u32,
            _ => return Err(UnknownParam(name.to_string())),
        }
        Ok(())
    }

    pub fn set_ink(&mut self, color: Color) {
        self.ink_color = color;
    }

    pub fn set_paper(&mut self, color: Color) {
        self.paper_color = color;
    }

    pub(crate) fn to_uniforms(self, width: u32, height: u32) -> ComposeUniforms {
        ComposeUniforms {
            resolution: [width as f32, height as f32],
            scale: self.scale,
            thickness: self.thickness,
            ink_color: self.ink_color.to_rgb_array(),
            contour: self.contour,
            paper_color: self.paper_color.to_rgb_array(),
            levels: self.levels,
            cmyk: [self.cyan, self.magenta, self.yellow, self.black],
            angle: self.angle,
            noise_scale: self.noise_scale,
            divergence: self.divergence,
            noisiness: self.noisiness,
            section_scale: self.section_scale,
            dark: self.dark,
            light: self.light,
            _pad: 0.0,
        }
    }
}

/// GPU mirror of the WGSL `ComposeUniforms` block. Field order and padding
/// must match `shaders/compose_header.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ComposeUniforms {
    pub resolution: [f32; 2],
    pub scale: f32,
    pub thickness: f32,
    pub ink_color: [f32; 3],
    pub contour: f32,
    pub paper_color: [f32; 3],
    pub levels: f32,
    pub cmyk: [f32; 4],
    pub angle: f32,
    pub noise_scale: f32,
    pub divergence: f32,
    pub noisiness: f32,
    pub section_scale: f32,
    pub dark: f32,
    pub light: f32,
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::validate_wgsl;

    #[test]
    fn every_style_composes_valid_wgsl() {
        for style in Style::ALL {
            let source = style.compose_source();
            validate_wgsl(style.label(), &source)
                .unwrap_or_else(|e| panic!("style {}: {e}", style.label()));
        }
    }

    #[test]
    fn uniform_block_is_96_bytes() {
        // The WGSL struct rounds up to a 16-byte multiple; the Rust mirror
        // must land on the same size for write_buffer to cover it.
        assert_eq!(std::mem::size_of::<ComposeUniforms>(), 96);
    }

    #[test]
    fn defaults_preserve_original_constants() {
        let p = Style::CrossHatch.default_params();
        assert_eq!(p.scale, 0.3);
        assert_eq!(p.thickness, 2.5);
        assert_eq!(p.ink_color, Color::rgb8(255, 0, 0));

        let p = Style::Halftone.default_params();
        assert_eq!(p.scale, 2.0);
        assert_eq!(p.thickness, 0.32);
        assert_eq!(p.contour, 2.1);
        assert_eq!(p.yellow, 0.8);
        assert_eq!(p.black, 0.4);

        let p = Style::Lines.default_params();
        assert_eq!(p.noise_scale, 0.72);
        assert_eq!(p.noisiness, 0.007);
        assert_eq!(p.angle, 2.0);
    }

    #[test]
    fn set_scalar_updates_named_field() {
        let mut p = Style::CrossHatch.default_params();
        p.set_scalar("thickness", 4.0).unwrap();
        assert_eq!(p.thickness, 4.0);
        p.set_scalar("blur_passes", 3.0).unwrap();
        assert_eq!(p.blur_passes, 3);
    }

    #[test]
    fn set_scalar_rejects_unknown_names() {
        let mut p = Style::CrossHatch.default_params();
        let err = p.set_scalar("wobble", 1.0).unwrap_err();
        assert_eq!(err, UnknownParam("wobble".to_string()));
    }
}
