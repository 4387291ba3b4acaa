//! GPU uniform buffer for camera data

use bytemuck::{Pod, Zeroable};

use crate::core::camera::Camera;

/// Camera uniform data for GPU (must match the `Camera` struct in the
/// shaders). WGSL vec3 has 16-byte alignment, so `time` doubles as the
/// padding slot after `position`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    /// Scene clock in seconds, for vertex animation
    pub time: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera, time: f32) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: camera.position.to_array(),
            time,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: [[0.0; 4]; 4],
            position: [0.0; 3],
            time: 0.0,
        }
    }
}

/// GPU buffer for camera uniform
pub struct CameraBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl CameraBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Upload the current camera state
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, time: f32) {
        let uniform = CameraUniform::from_camera(camera, time);
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_alignment() {
        let size = std::mem::size_of::<CameraUniform>();
        assert_eq!(size % 16, 0, "CameraUniform size {size} is not 16-byte aligned");
        assert_eq!(size, 80);
    }

    #[test]
    fn test_uniform_carries_camera_state() {
        let camera =
            Camera::look_at(glam::Vec3::new(3.0, 3.0, 6.0), glam::Vec3::ZERO, glam::Vec3::Y);
        let uniform = CameraUniform::from_camera(&camera, 1.5);
        assert_eq!(uniform.position, [3.0, 3.0, 6.0]);
        assert_eq!(uniform.time, 1.5);
    }
}
