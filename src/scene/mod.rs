//! The diorama: every prop, surface, and effect assembled around the pond.

pub mod config;
pub mod fish;
pub mod geometry;
pub mod godrays;
pub mod grass;
pub mod paper;
pub mod rand;
pub mod waterfall;

pub use config::DioramaConfig;

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::compositor::{Compositor, WatercolorPass};
use crate::core::camera::Camera;
use crate::core::input::InputState;
use crate::core::orbit::OrbitController;
use crate::core::types::{Mat4, Result, Vec2, Vec3, Vec4};
use crate::math::Ray;
use crate::render::context::GpuContext;
use crate::render::mesh::{GpuMesh, InstanceBuffer, InstanceRaw, SurfaceVertex};
use crate::render::pipeline::glow::GlowUniforms;
use crate::render::pipeline::{GlowPipeline, GrassPipeline, MeshPipeline, SurfacePipeline};
use crate::render::target::{self, SceneTargets};
use crate::render::CameraBuffer;
use crate::sim::{HeightFieldSim, Impulse, SIM_RESOLUTION};
use crate::surface::{MoodDrivers, SurfaceInstance};
use fish::{Fish, SwimDirection};
use paper::PaperGrain;
use waterfall::Waterfall;

/// Side length of the interactive pond plane; its disc radius for the
/// grass scatter is half of this.
const POND_SIZE: f32 = 3.4;
const POND_SEGMENTS: u32 = SIM_RESOLUTION;
/// Maximum height a dragged fish reaches, for normalizing the mood driver
const FISH_LIFT_MAX: f32 = 0.6;
const SKY_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.78,
    g: 0.86,
    b: 0.93,
    a: 1.0,
};

struct SurfaceDraw {
    instance: SurfaceInstance,
    mesh: GpuMesh,
    params: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct PropDraw {
    mesh: GpuMesh,
    instances: InstanceBuffer,
}

impl PropDraw {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instances.count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instances.buffer.slice(..));
        pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..self.instances.count);
    }
}

/// The whole scene, stepped once per frame.
pub struct Diorama {
    config: DioramaConfig,
    width: u32,
    height: u32,
    clock: f32,

    camera: Camera,
    orbit: OrbitController,
    camera_buffer: CameraBuffer,

    sim: HeightFieldSim,
    height_texture: wgpu::Texture,

    surface_pipeline: SurfacePipeline,
    mesh_pipeline: MeshPipeline,
    grass_pipeline: GrassPipeline,
    glow_pipeline: GlowPipeline,

    pond: SurfaceDraw,
    ocean: SurfaceDraw,
    waterfall_sheet: SurfaceDraw,

    fish: Vec<Fish>,
    fish_props: PropDraw,
    rain: Waterfall,
    rain_props: PropDraw,
    splash_props: PropDraw,
    mountain_props: PropDraw,
    grass_props: PropDraw,
    godray_props: PropDraw,

    bloom_on: bool,

    targets: SceneTargets,
    compositor: Compositor,
}

impl Diorama {
    pub fn new(gpu: &GpuContext, config: DioramaConfig) -> Result<Self> {
        let device = &gpu.device;
        let queue = &gpu.queue;
        let format = gpu.format();
        let (width, height) = gpu.size();
        let seed = config.scatter.seed;

        let mut camera = Camera::look_at(Vec3::new(3.0, 3.0, 6.0), Vec3::ZERO, Vec3::Y);
        camera.aspect = width as f32 / height.max(1) as f32;
        let orbit = OrbitController::new(Vec3::ZERO, camera.position);
        let camera_buffer = CameraBuffer::new(device);

        let sim = HeightFieldSim::new(SIM_RESOLUTION);
        let (height_texture, height_view) = target::create_height_field_texture(device);

        let surface_pipeline = SurfacePipeline::new(device, format, camera_buffer.bind_group_layout());
        let mesh_pipeline = MeshPipeline::new(device, format, camera_buffer.bind_group_layout());
        let grass_pipeline = GrassPipeline::new(device, format, camera_buffer.bind_group_layout());
        let glow_pipeline = GlowPipeline::new(
            device,
            queue,
            format,
            camera_buffer.bind_group_layout(),
            GlowUniforms::default(),
        );

        let mut build_surface = |instance: SurfaceInstance, vertices: Vec<SurfaceVertex>, indices: Vec<u32>| {
            let mesh = GpuMesh::from_vertices(device, queue, instance.name, &vertices, &indices);
            let params = surface_pipeline.create_params_buffer(device, instance.name);
            let bind_group = surface_pipeline.create_bind_group(device, &params, &height_view);
            SurfaceDraw {
                instance,
                mesh,
                params,
                bind_group,
            }
        };

        let (pond_vertices, pond_indices) = geometry::pond_plane(POND_SIZE, POND_SEGMENTS);
        let pond = build_surface(SurfaceInstance::pond(), pond_vertices, pond_indices);

        let (ocean_vertices, ocean_indices) =
            geometry::star_prism(5, 2.2, 1.1, 0.5, Vec3::new(0.0, 1.8, -6.5));
        let ocean = build_surface(SurfaceInstance::ocean(), ocean_vertices, ocean_indices);

        let (sheet_vertices, sheet_indices) =
            geometry::vertical_sheet(3.0, 8.0, Vec3::new(-1.0, 4.0, -9.0));
        let waterfall_sheet =
            build_surface(SurfaceInstance::waterfall(), sheet_vertices, sheet_indices);

        let fish = vec![
            Fish::new(SwimDirection::Clockwise, Vec3::new(0.95, 0.42, 0.2), seed),
            Fish::new(
                SwimDirection::CounterClockwise,
                Vec3::new(0.95, 0.85, 0.85),
                seed.wrapping_add(17),
            ),
        ];
        let fish_mesh = GpuMesh::from_mesh_data(device, queue, "fish", &geometry::octahedron());
        let fish_props = PropDraw {
            mesh: fish_mesh,
            instances: InstanceBuffer::new::<InstanceRaw>(device, "fish_instances", fish.len()),
        };

        let rain = Waterfall::new(config.scatter.rain_sheets, config.scatter.splash_points, seed);
        let rain_props = PropDraw {
            mesh: GpuMesh::from_mesh_data(device, queue, "rain_sheet", &geometry::rain_sheet()),
            instances: InstanceBuffer::new::<InstanceRaw>(
                device,
                "rain_instances",
                config.scatter.rain_sheets as usize,
            ),
        };
        let splash_props = PropDraw {
            mesh: GpuMesh::from_mesh_data(device, queue, "splash_mote", &geometry::octahedron()),
            instances: InstanceBuffer::new::<InstanceRaw>(
                device,
                "splash_instances",
                config.scatter.splash_points as usize,
            ),
        };

        let mountains =
            geometry::mountain_range(35.0, 50.0, 35, 50, -10.0, 15.0, seed.wrapping_add(31));
        let mut mountain_instances =
            InstanceBuffer::new::<InstanceRaw>(device, "mountain_instances", 1);
        mountain_instances.upload(
            queue,
            &[InstanceRaw::new(
                Mat4::from_translation(Vec3::new(0.0, -12.0, -40.0)),
                Vec4::new(0.635, 0.812, 0.918, 1.0), // 0xa2cfea
            )],
        );
        let mountain_props = PropDraw {
            mesh: GpuMesh::from_mesh_data(device, queue, "mountains", &mountains),
            instances: mountain_instances,
        };

        let (blade_vertices, blade_indices) = crate::render::pipeline::grass::blade_vertices();
        let blades = grass::scatter_blades(config.scatter.grass_blades, seed.wrapping_add(5));
        let mut grass_instances =
            InstanceBuffer::new::<crate::render::mesh::GrassInstance>(
                device,
                "grass_instances",
                blades.len(),
            );
        grass_instances.upload(queue, &blades);
        let grass_props = PropDraw {
            mesh: GpuMesh::from_vertices(device, queue, "grass_blade", &blade_vertices, &blade_indices),
            instances: grass_instances,
        };

        let cones = godrays::scatter_cones(config.scatter.godray_cones, seed.wrapping_add(9));
        let mut godray_instances =
            InstanceBuffer::new::<InstanceRaw>(device, "godray_instances", cones.len());
        godray_instances.upload(queue, &cones);
        let godray_props = PropDraw {
            mesh: GpuMesh::from_mesh_data(device, queue, "godray_cone", &geometry::cone(24)),
            instances: godray_instances,
        };

        let targets = SceneTargets::new(device, format, width, height);
        let mut compositor = Compositor::new(device, format, width, height);
        let grain = PaperGrain::load_or_procedural(config.paper_texture.as_deref(), seed);
        let (_paper_texture, paper_view) =
            target::create_paper_texture(device, queue, &grain.pixels, grain.width, grain.height);
        let mut watercolor = WatercolorPass::new(
            device,
            queue,
            format,
            paper_view,
            config.watercolor.to_params(),
        );
        watercolor.set_params(queue, {
            let mut p = *watercolor.params();
            p.texel = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
            p
        });
        compositor.add_pass(Box::new(watercolor));

        log::info!(
            "Diorama ready: {} grass blades, {} rain sheets, {} godray cones",
            config.scatter.grass_blades,
            config.scatter.rain_sheets,
            config.scatter.godray_cones
        );

        Ok(Self {
            config,
            width,
            height,
            clock: 0.0,
            camera,
            orbit,
            camera_buffer,
            sim,
            height_texture,
            surface_pipeline,
            mesh_pipeline,
            grass_pipeline,
            glow_pipeline,
            pond,
            ocean,
            waterfall_sheet,
            fish,
            fish_props,
            rain,
            rain_props,
            splash_props,
            mountain_props,
            grass_props,
            godray_props,
            bloom_on: false,
            targets,
            compositor,
        })
    }

    /// Resize every resolution-dependent resource.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.aspect = width as f32 / height.max(1) as f32;
        self.targets.resize(&gpu.device, gpu.format(), width, height);
        self.compositor.resize(&gpu.device, &gpu.queue, width, height);
    }

    /// Ray from the camera through the given window pixel.
    fn pointer_ray(&self, px: f32, py: f32) -> Ray {
        let ndc_x = px / self.width.max(1) as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - py / self.height.max(1) as f32 * 2.0;
        Ray::new(self.camera.position, self.camera.ndc_to_ray_direction(ndc_x, ndc_y))
    }

    /// Advance all CPU state for one frame.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.clock += dt;

        if input.is_key_just_pressed(KeyCode::KeyB) {
            self.bloom_on = !self.bloom_on;
            log::info!("Bloom {}", if self.bloom_on { "rising" } else { "fading" });
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.orbit.zoom(scroll * 0.5);
        }
        self.orbit.update(&mut self.camera, input);

        let (px, py) = input.mouse_position();
        let ray = self.pointer_ray(px, py);

        // Moving the pointer across the pond stirs it.
        if input.mouse_moved() && !input.is_mouse_pressed(MouseButton::Left) {
            if let Some(uv) =
                ray.hit_rect_uv(0.0, Vec2::ZERO, Vec2::splat(POND_SIZE * 0.5))
            {
                self.sim.inject(Impulse {
                    center: uv,
                    radius: self.config.impulse.radius,
                    strength: self.config.impulse.strength,
                });
            }
        }

        // Holding the right button near a fish hoists it out of the water.
        let grabbing = input.is_mouse_pressed(MouseButton::Right);
        for fish in &mut self.fish {
            fish.dragged = grabbing && ray_near_point(&ray, fish.position(), 0.6);
        }
        for fish in &mut self.fish {
            fish.update(dt);
        }

        self.rain.update();

        let lifted = self
            .fish
            .iter()
            .filter(|f| f.dragged)
            .map(|f| (f.height_above_water() / FISH_LIFT_MAX).clamp(0.0, 1.0))
            .fold(None, |acc: Option<f32>, h| Some(acc.map_or(h, |a| a.max(h))));
        let pond_drivers = MoodDrivers {
            bloom_on: self.bloom_on,
            dragging: input.is_mouse_pressed(MouseButton::Left),
            fish_height: lifted,
        };
        let ambient_drivers = MoodDrivers {
            bloom_on: self.bloom_on,
            ..Default::default()
        };
        self.pond.instance.update(&pond_drivers);
        self.ocean.instance.update(&ambient_drivers);
        self.waterfall_sheet.instance.update(&ambient_drivers);
    }

    /// Step the simulation, upload frame data, and draw.
    pub fn render(&mut self, gpu: &GpuContext) -> Result<()> {
        let device = &gpu.device;
        let queue = &gpu.queue;

        self.sim.step();
        self.sim.upload(queue, &self.height_texture);

        self.camera_buffer.update(queue, &self.camera, self.clock);
        for surface in [&self.pond, &self.ocean, &self.waterfall_sheet] {
            let uniforms = surface.instance.uniforms(self.width, self.height);
            queue.write_buffer(&surface.params, 0, bytemuck::bytes_of(&uniforms));
        }

        let fish_instances: Vec<InstanceRaw> = self.fish.iter().map(Fish::instance).collect();
        self.fish_props.instances.upload(queue, &fish_instances);
        self.rain_props.instances.upload(queue, &self.rain.sheet_instances());
        self.splash_props.instances.upload(queue, &self.rain.splash_instances());

        // God rays pick up the pond's drag tint as a fish rises.
        let mix = self.pond.instance.mood.drag_mix.value();
        let base = Vec3::new(1.0, 1.0, 0.9);
        let tinted = base.lerp(self.pond.instance.drag_color, mix);
        self.glow_pipeline.set_uniforms(
            queue,
            GlowUniforms {
                color: tinted.to_array(),
                ..GlowUniforms::default()
            },
        );

        let frame = gpu.get_current_texture()?;
        let frame_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("diorama_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, self.camera_buffer.bind_group(), &[]);

            // Opaque props first
            pass.set_pipeline(self.mesh_pipeline.pipeline());
            self.mountain_props.draw(&mut pass);
            self.fish_props.draw(&mut pass);
            self.rain_props.draw(&mut pass);
            self.splash_props.draw(&mut pass);

            pass.set_pipeline(self.grass_pipeline.pipeline());
            self.grass_props.draw(&mut pass);

            // Translucent water surfaces
            pass.set_pipeline(self.surface_pipeline.pipeline());
            for surface in [&self.ocean, &self.waterfall_sheet, &self.pond] {
                pass.set_bind_group(1, &surface.bind_group, &[]);
                pass.set_vertex_buffer(0, surface.mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(surface.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..surface.mesh.index_count, 0, 0..1);
            }

            // Additive light shafts last
            pass.set_pipeline(self.glow_pipeline.pipeline());
            pass.set_bind_group(1, self.glow_pipeline.params_bind_group(), &[]);
            self.godray_props.draw(&mut pass);
        }

        self.compositor
            .render(device, &mut encoder, &self.targets.color_view, &frame_view)?;

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn generation(&self) -> u64 {
        self.sim.generation()
    }
}

/// Shortest distance from the ray line to `point`, compared to `radius`.
fn ray_near_point(ray: &Ray, point: Vec3, radius: f32) -> bool {
    let to_point = point - ray.origin;
    let along = to_point.dot(ray.direction);
    if along < 0.0 {
        return false;
    }
    (to_point - ray.direction * along).length() < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_near_point() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray_near_point(&ray, Vec3::new(5.0, 0.3, 0.0), 0.6));
        assert!(!ray_near_point(&ray, Vec3::new(5.0, 2.0, 0.0), 0.6));
        assert!(!ray_near_point(&ray, Vec3::new(-5.0, 0.0, 0.0), 0.6), "behind the origin");
    }
}
