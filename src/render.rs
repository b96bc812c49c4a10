use macroquad::prelude::*;

use crate::command::DrawCommand;

/// Draws `commands` in order, shifting camera-relative ones by `camera`.
pub fn draw_commands(texture: &Texture2D, commands: &[DrawCommand], camera: Vec2) {
    for cmd in commands {
        let dest = if cmd.camera_relative {
            cmd.dest + camera
        } else {
            cmd.dest
        };
        draw_texture_ex(
            texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                source: Some(cmd.src),
                flip_x: cmd.flip_x,
                flip_y: cmd.flip_y,
                ..Default::default()
            },
        );
    }
}
