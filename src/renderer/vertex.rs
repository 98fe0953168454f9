//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.016, 0.063, 0.129, 1.0]; // #041021
    pub const GRID_CROSS: [f32; 4] = [1.0, 1.0, 1.0, 0.18];
    pub const SPAWN_ROW: [f32; 4] = [0.70, 0.21, 0.21, 0.9];
    pub const START_CELL: [f32; 4] = [0.83, 0.69, 0.22, 0.9];
    pub const PLAYER: [f32; 4] = [0.83, 0.69, 0.22, 1.0]; // #d4af37
    pub const PLAYER_TRAIL: [f32; 4] = [0.33, 0.96, 1.0, 0.35];
    pub const ENEMY: [f32; 4] = [0.85, 0.29, 0.29, 1.0]; // #d94a4a
    pub const PLAYER_SHOT: [f32; 4] = [0.49, 0.96, 1.0, 1.0]; // #7df5ff
    pub const ENEMY_SHOT: [f32; 4] = [1.0, 0.87, 0.35, 1.0]; // #ffde59
    pub const HEAL: [f32; 4] = [0.49, 0.96, 0.54, 1.0]; // #7cf58a
    pub const PULSE: [f32; 4] = [1.0, 0.82, 0.4, 1.0]; // #ffd166
    pub const PICKUP_RIM: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const SPARK: [f32; 4] = [1.0, 0.78, 0.47, 0.9];
    pub const CRASH: [f32; 4] = [1.0, 0.45, 0.3, 0.9];
}

/// Copy of `color` with its alpha scaled
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
