//! Fatal pipeline setup errors.
//!
//! Everything in this enum is a construction-time failure: a broken compositor
//! has no safe fallback image, so setup aborts before the frame loop starts.
//! Recoverable conditions (a texture that has not finished loading) are handled
//! in-line with placeholders and never surface here.

use thiserror::Error;

/// Errors raised while building the GPU context or a rendering pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The window surface could not be created.
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter compatible with the surface was found.
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// The logical device could not be created on the selected adapter.
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// A composed WGSL source failed to parse or validate.
    ///
    /// `detail` carries the full naga diagnostic, including the offending
    /// source location.
    #[error("shader `{label}` failed to compile:\n{detail}")]
    ShaderCompile { label: String, detail: String },

    /// An image file or byte buffer could not be decoded into a texture.
    #[error("failed to decode texture image: {0}")]
    TextureDecode(#[from] image::ImageError),

    /// The winit event loop could not be created or run.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
}

/// Parses and validates a WGSL module, returning a descriptive error on
/// failure.
///
/// Validation runs on the CPU before any GPU object is created, so a malformed
/// composed shader aborts pipeline construction with a readable diagnostic
/// instead of a deferred device error.
pub(crate) fn validate_wgsl(label: &str, source: &str) -> Result<(), PipelineError> {
    let module =
        naga::front::wgsl::parse_str(source).map_err(|e| PipelineError::ShaderCompile {
            label: label.to_string(),
            detail: e.emit_to_string(source),
        })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| PipelineError::ShaderCompile {
        label: label.to_string(),
        detail: e.emit_to_string(source),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_wgsl_passes() {
        let source = r#"
@vertex
fn vs(@location(0) position: vec3f) -> @builtin(position) vec4f {
    return vec4f(position, 1.0);
}

@fragment
fn fs() -> @location(0) vec4f {
    return vec4f(1.0, 0.0, 0.0, 1.0);
}
"#;
        assert!(validate_wgsl("test", source).is_ok());
    }

    #[test]
    fn syntax_error_is_reported_with_label() {
        let result = validate_wgsl("broken", "fn oops() -> { }");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn type_error_fails_validation() {
        let source = r#"
@fragment
fn fs() -> @location(0) vec4f {
    let x: vec4f = 1.0;
    return x;
}
"#;
        assert!(validate_wgsl("typed", source).is_err());
    }
}
