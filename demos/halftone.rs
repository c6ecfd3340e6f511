//! CMYK halftone still life: primaries on a ground plane, dot screens doing
//! the color mixing.

use std::sync::Arc;

use linocut::*;

fn main() -> Result<(), PipelineError> {
    env_logger::init();

    run(
        AppConfig::new().title("halftone still life").style(Style::Halftone),
        |ctx| {
            let sphere = Arc::new(Mesh::sphere(ctx.gpu, 48, 24));
            let cube = Arc::new(Mesh::cube(ctx.gpu));
            let ground = Arc::new(Mesh::plane(ctx.gpu, 30.0));

            ctx.scene.push(SceneObject::new(
                ground,
                Transform::from_position(Vec3::new(0.0, -1.0, 0.0)),
                Color::rgb(0.85, 0.85, 0.85),
            ));

            let colors = [
                Color::rgb(0.9, 0.2, 0.2),
                Color::rgb(0.2, 0.7, 0.3),
                Color::rgb(0.2, 0.3, 0.9),
                Color::rgb(0.9, 0.8, 0.2),
            ];
            for (i, color) in colors.into_iter().enumerate() {
                let x = i as f32 * 2.2 - 3.3;
                ctx.scene.push(SceneObject::new(
                    sphere.clone(),
                    Transform::from_position(Vec3::new(x, 0.0, 0.0)).uniform_scale(1.8),
                    color,
                ));
            }

            let cube_id = ctx.scene.push(SceneObject::new(
                cube,
                Transform::from_position(Vec3::new(0.0, 1.8, 0.0)).uniform_scale(1.2),
                Color::rgb(0.4, 0.4, 0.4),
            ));

            *ctx.camera = Camera::new().at(0.0, 3.0, -9.0).looking_at(0.0, 0.5, 0.0);

            move |frame| {
                frame.scene.objects[cube_id].transform.rotation =
                    Quat::from_rotation_y(frame.time * 0.7);
            }
        },
    )
}
