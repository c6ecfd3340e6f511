//! Engraving lines over a torus, with the blur stage softening the tone
//! source and the string escape hatch driving a parameter.

use std::sync::Arc;

use linocut::*;

fn main() -> Result<(), PipelineError> {
    env_logger::init();

    run(
        AppConfig::new().title("engraving").style(Style::Lines),
        |ctx| {
            let torus = Arc::new(Mesh::torus(ctx.gpu, 2.0, 0.7, 160, 64));
            let ground = Arc::new(Mesh::plane(ctx.gpu, 40.0));

            let torus_id = ctx.scene.push(SceneObject::new(
                torus,
                Transform::new(),
                Color::rgb(0.55, 0.55, 0.55),
            ));
            ctx.scene.push(SceneObject::new(
                ground,
                Transform::from_position(Vec3::new(0.0, -3.0, 0.0)),
                Color::rgb(0.8, 0.8, 0.8),
            ));

            *ctx.camera = Camera::new().at(0.0, 4.0, -8.0).looking_at(0.0, 0.0, 0.0);

            move |frame| {
                frame.scene.objects[torus_id].transform.rotation =
                    Quat::from_rotation_x(frame.time * 0.4);
                // Two blur rounds smooth the quantized tone bands.
                frame.params.blur_passes = 2;
                frame
                    .params
                    .set_scalar("noisiness", 0.004 + 0.003 * (frame.time * 0.3).sin())
                    .expect("known parameter");
            }
        },
    )
}
