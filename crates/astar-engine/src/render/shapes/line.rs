use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::{LineCap, LineCmd};

use super::common::{
    create_shape_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport_uniform,
    InstanceBuffer, QUAD_INDEX_COUNT,
};

/// Renderer for `DrawCmd::Line`.
///
/// Each segment is an oriented quad padded by the half-width plus one pixel;
/// the fragment shader evaluates a capsule (round cap) or box (butt cap)
/// distance for anti-aliased edges. Zero-length round lines render as dots,
/// zero-length butt lines render nothing.
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    instances: Vec<LineInstance>,
    instance_buffer: InstanceBuffer,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: builds GPU state on first use and resets the batch.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_uniform(ctx, ubo);
        }
        self.instances.clear();
    }

    /// Queues one segment; returns the number of instances added (0 if culled).
    pub fn push(&mut self, cmd: &LineCmd) -> u32 {
        if cmd.width <= 0.0 || !cmd.from.is_finite() || !cmd.to.is_finite() {
            return 0;
        }
        if cmd.cap == LineCap::Butt && cmd.length() <= f32::EPSILON {
            return 0;
        }

        let round = match cmd.cap {
            LineCap::Round => 1.0,
            LineCap::Butt => 0.0,
        };

        self.instances.push(LineInstance {
            from: [cmd.from.x, cmd.from.y],
            to: [cmd.to.x, cmd.to.y],
            params: [cmd.width * 0.5, round],
            color: cmd.color.to_array(),
        });
        1
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        self.instance_buffer.upload(ctx, "astar line instance vbo", &self.instances);
    }

    /// Draws `range` of this frame's instances. The quad must already be bound.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(instance_vbo) = self.instance_buffer.get() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("astar line bgl"),
                entries: &[viewport_layout_entry()],
            });

        let pipeline = create_shape_pipeline(
            ctx,
            "astar line pipeline",
            include_str!("shaders/line.wgsl"),
            &bind_group_layout,
            LineInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "astar line viewport ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("astar line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (40 bytes):
///
///  offset  0  from    [f32; 2]   loc 1
///  offset  8  to      [f32; 2]   loc 2
///  offset 16  params  [f32; 2]   loc 3  (.x = half width, .y = 1 for round caps)
///  offset 24  color   [f32; 4]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    from: [f32; 2],
    to: [f32; 2],
    params: [f32; 2],
    color: [f32; 4],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // from
        2 => Float32x2, // to
        3 => Float32x2, // params
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn line(from: Vec2, to: Vec2, width: f32, cap: LineCap) -> LineCmd {
        LineCmd::new(from, to, width, Color::WHITE, cap)
    }

    #[test]
    fn instance_is_40_bytes() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 40);
    }

    #[test]
    fn params_carry_half_width_and_cap() {
        let mut r = LineRenderer::new();
        r.push(&line(Vec2::zero(), Vec2::new(10.0, 0.0), 8.0, LineCap::Round));
        r.push(&line(Vec2::zero(), Vec2::new(10.0, 0.0), 2.0, LineCap::Butt));
        assert_eq!(r.instances[0].params, [4.0, 1.0]);
        assert_eq!(r.instances[1].params, [1.0, 0.0]);
    }

    #[test]
    fn zero_length_round_line_is_kept_as_dot() {
        let mut r = LineRenderer::new();
        let p = Vec2::new(3.0, 3.0);
        assert_eq!(r.push(&line(p, p, 1.5, LineCap::Round)), 1);
    }

    #[test]
    fn zero_length_butt_line_is_culled() {
        let mut r = LineRenderer::new();
        let p = Vec2::new(3.0, 3.0);
        assert_eq!(r.push(&line(p, p, 2.0, LineCap::Butt)), 0);
    }

    #[test]
    fn zero_width_is_culled() {
        let mut r = LineRenderer::new();
        assert_eq!(r.push(&line(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0, LineCap::Round)), 0);
        assert_eq!(r.instance_count(), 0);
    }
}
