//! Demo playground: a rotating torus among scattered spheres inside a
//! backdrop shell, stylized by the pipeline. Pass a style name as the first
//! argument (`cross-hatch`, `halftone`, `lines`, `cartoon`, `blueprint`).

use std::sync::Arc;

use linocut::*;

fn pick_style(name: Option<&str>) -> Style {
    match name {
        Some("halftone") => Style::Halftone,
        Some("lines") => Style::Lines,
        Some("cartoon") => Style::Cartoon,
        Some("blueprint") => Style::Blueprint,
        Some("cross-hatch") | None => Style::CrossHatch,
        Some(other) => {
            log::warn!("unknown style `{other}`, using cross-hatch");
            Style::CrossHatch
        }
    }
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let arg = std::env::args().nth(1);
    let style = pick_style(arg.as_deref());

    run(
        AppConfig::new().title("linocut playground").style(style),
        |ctx| {
            let torus = Arc::new(Mesh::torus(ctx.gpu, 2.0, 0.5, 128, 48));
            let sphere = Arc::new(Mesh::sphere(ctx.gpu, 32, 16));
            let gray = Color::rgb(0.5, 0.5, 0.5);

            let torus_id = ctx.scene.push(SceneObject::new(
                torus,
                Transform::new(),
                gray,
            ));

            // Scattered spheres, deterministic so every run frames the same.
            let mut state = 0x2545f491u32;
            let mut rand = move || {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 8) as f32 / 16_777_216.0
            };
            for _ in 0..20 {
                let scale = 0.75 + rand() * 0.5;
                let position = Vec3::new(
                    rand() * 20.0 - 10.0,
                    rand() * 20.0 - 10.0,
                    rand() * 20.0 - 10.0,
                );
                ctx.scene.push(SceneObject::new(
                    sphere.clone(),
                    Transform::from_position(position).uniform_scale(scale),
                    gray,
                ));
            }

            // Backdrop shell; rendered double-sided, so the camera sees its
            // inside.
            ctx.scene.push(SceneObject::new(
                sphere,
                Transform::new().uniform_scale(40.0),
                Color::rgb(0.7, 0.7, 0.7),
            ));

            *ctx.camera = Camera::new().at(0.0, 10.0, -5.0).looking_at(0.0, 0.0, 0.0);

            move |frame| {
                let t = frame.time;
                frame.scene.objects[torus_id].transform.rotation =
                    Quat::from_rotation_y(t) * Quat::from_rotation_z(t * 0.5);
            }
        },
    )
}
