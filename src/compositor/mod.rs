//! Post-process compositor.
//!
//! Owns an ordered list of screen passes. Pass 0 always consumes the scene
//! render; each later pass consumes the previous pass's color output; the
//! last pass writes the presentable surface. The wiring itself is computed
//! by the pure [`PassChain`] planner so the ordering contract is testable
//! without a GPU.

pub mod watercolor;

pub use watercolor::{WatercolorParams, WatercolorPass};

use crate::core::types::Result;

/// Logical render target a pass reads from or writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetId {
    /// The scene render target (input to pass 0)
    Scene,
    /// Internal ping-pong target A
    Ping,
    /// Internal ping-pong target B
    Pong,
    /// The presentable surface (output of the last pass)
    Surface,
}

/// Input/output assignment for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassWiring {
    pub input: TargetId,
    pub output: TargetId,
}

/// Pure pass-ordering planner: given N passes, produces the input/output
/// target for each such that pass i+1 always reads pass i's output.
#[derive(Clone, Debug, Default)]
pub struct PassChain {
    names: Vec<&'static str>,
}

impl PassChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass; returns its index.
    pub fn push(&mut self, name: &'static str) -> usize {
        self.names.push(name);
        self.names.len() - 1
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Compute the wiring for the current pass list.
    pub fn wiring(&self) -> Vec<PassWiring> {
        let count = self.names.len();
        let mut plan = Vec::with_capacity(count);
        let mut input = TargetId::Scene;
        for i in 0..count {
            let output = if i + 1 == count {
                TargetId::Surface
            } else if input == TargetId::Ping {
                TargetId::Pong
            } else {
                TargetId::Ping
            };
            plan.push(PassWiring { input, output });
            input = output;
        }
        plan
    }
}

/// A full-screen post-process stage.
pub trait ScreenPass {
    fn name(&self) -> &'static str;

    /// Update every resolution-dependent uniform. Called unconditionally
    /// for all passes on every resize.
    fn resize(&mut self, queue: &wgpu::Queue, width: u32, height: u32);

    /// Encode this pass reading `input` and writing `output`.
    fn encode(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        input: &wgpu::TextureView,
        output: &wgpu::TextureView,
    );
}

/// GPU compositor: the pass list plus the ping-pong color targets.
pub struct Compositor {
    chain: PassChain,
    passes: Vec<Box<dyn ScreenPass>>,
    format: wgpu::TextureFormat,
    ping: wgpu::TextureView,
    pong: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Compositor {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let ping = create_color_target(device, format, width, height, "compositor_ping");
        let pong = create_color_target(device, format, width, height, "compositor_pong");
        Self {
            chain: PassChain::new(),
            passes: Vec::new(),
            format,
            ping,
            pong,
            width,
            height,
        }
    }

    /// Append a pass; passes execute in insertion order.
    pub fn add_pass(&mut self, pass: Box<dyn ScreenPass>) {
        self.chain.push(pass.name());
        self.passes.push(pass);
    }

    /// Propagate a new resolution to the internal targets and to every
    /// pass's resolution-dependent uniforms, unconditionally.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ping = create_color_target(device, self.format, width, height, "compositor_ping");
        self.pong = create_color_target(device, self.format, width, height, "compositor_pong");
        for pass in &mut self.passes {
            pass.resize(queue, width, height);
        }
    }

    /// Encode all passes in order, wiring each pass's output into the next
    /// pass's input. `scene` is the scene render; `surface` receives the
    /// final pass's output.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        scene: &wgpu::TextureView,
        surface: &wgpu::TextureView,
    ) -> Result<()> {
        let plan = self.chain.wiring();
        for (pass, wiring) in self.passes.iter_mut().zip(plan) {
            let input = match wiring.input {
                TargetId::Scene => scene,
                TargetId::Ping => &self.ping,
                TargetId::Pong => &self.pong,
                TargetId::Surface => surface,
            };
            let output = match wiring.output {
                TargetId::Scene => scene,
                TargetId::Ping => &self.ping,
                TargetId::Pong => &self.pong,
                TargetId::Surface => surface,
            };
            pass.encode(device, encoder, input, output);
        }
        Ok(())
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }
}

fn create_color_target(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pass_scene_to_surface() {
        let mut chain = PassChain::new();
        chain.push("watercolor");
        let plan = chain.wiring();
        assert_eq!(
            plan,
            vec![PassWiring {
                input: TargetId::Scene,
                output: TargetId::Surface,
            }]
        );
    }

    #[test]
    fn test_three_passes_chain_outputs_to_inputs() {
        let mut chain = PassChain::new();
        chain.push("a");
        chain.push("b");
        chain.push("c");
        let plan = chain.wiring();

        assert_eq!(plan[0].input, TargetId::Scene, "first pass reads the scene");
        assert_eq!(
            plan.last().unwrap().output,
            TargetId::Surface,
            "last pass presents"
        );
        for window in plan.windows(2) {
            assert_eq!(
                window[1].input, window[0].output,
                "pass N+1 must read pass N's output: {plan:?}"
            );
        }
    }

    #[test]
    fn test_ping_pong_never_reads_its_own_output() {
        let mut chain = PassChain::new();
        for name in ["a", "b", "c", "d", "e"] {
            chain.push(name);
        }
        for wiring in chain.wiring() {
            assert_ne!(wiring.input, wiring.output, "a pass cannot sample its own target");
        }
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut chain = PassChain::new();
        let a = chain.push("stylize");
        let b = chain.push("grade");
        assert_eq!((a, b), (0, 1));
        assert_eq!(chain.names(), &["stylize", "grade"]);
    }
}
