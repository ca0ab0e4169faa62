//! Instance records for batched sprite rendering

use bytemuck::{Pod, Zeroable};

use super::draw_list::DrawCommand;

/// One sprite instance, laid out for direct upload into a vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Column-major 2x2 linear part of the world transform
    pub matrix: [f32; 4],
    pub translation: [f32; 2],
    pub texture: u32,
    pub ghost: u32,
    /// Texel rectangle `[left, top, width, height]`
    pub sub_rect: [f32; 4],
}

impl SpriteInstance {
    pub fn from_command(command: &DrawCommand) -> Self {
        let rect = command.sub_rect;
        Self {
            matrix: command.transform.matrix2.to_cols_array(),
            translation: command.transform.translation.to_array(),
            texture: command.texture.id.0,
            ghost: command.ghost as u32,
            sub_rect: [
                rect.left as f32,
                rect.top as f32,
                rect.width as f32,
                rect.height as f32,
            ],
        }
    }
}
