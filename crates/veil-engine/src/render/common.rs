//! GPU-side types shared by renderers.

use bytemuck::{Pod, Zeroable};

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

/// Unit plane vertex: position centered on the origin, uv with v = 0 at the top.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct PlaneVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl PlaneVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const PLANE_VERTICES: [PlaneVertex; 4] = [
    PlaneVertex { pos: [-0.5, 0.5], uv: [0.0, 0.0] },
    PlaneVertex { pos: [0.5, 0.5], uv: [1.0, 0.0] },
    PlaneVertex { pos: [0.5, -0.5], uv: [1.0, 1.0] },
    PlaneVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
];

pub(super) const PLANE_INDICES: [u16; 6] = [0, 3, 2, 0, 2, 1];

/// Returns a non-zero binding size for a uniform struct.
pub(super) fn min_binding_size<T>() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
}
