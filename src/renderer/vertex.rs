//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (NDC) and color
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
    pub const AVATAR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const SPEAR: [f32; 4] = [0.99, 0.1, 0.1, 1.0];
    pub const TARGET: [f32; 4] = [220.0 / 255.0, 20.0 / 255.0, 60.0 / 255.0, 1.0];
    pub const TARGET_CORE: [f32; 4] = [0.45, 0.02, 0.1, 1.0];
    pub const TARGET_KILLED: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const CHARGE_BAR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}
