use std::ops::Range;

use crate::render::shapes::circle::CircleRenderer;
use crate::render::shapes::line::LineRenderer;
use crate::render::shapes::text::TextRenderer;
use crate::render::shapes::QuadBuffers;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ShapeKind {
    Circle,
    Line,
    Text,
}

/// A contiguous run of instances of one shape kind, in paint order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Batch {
    kind: ShapeKind,
    instances: Range<u32>,
}

/// Appends `count` instances starting at `start`, merging into the previous
/// batch when it has the same kind and is contiguous.
fn extend_batches(batches: &mut Vec<Batch>, kind: ShapeKind, start: u32, count: u32) {
    if count == 0 {
        return;
    }
    if let Some(last) = batches.last_mut() {
        if last.kind == kind && last.instances.end == start {
            last.instances.end += count;
            return;
        }
    }
    batches.push(Batch { kind, instances: start..start + count });
}

/// Replays a [`DrawList`] onto the surface in a single render pass.
///
/// Commands are visited in paint order (z, then insertion). Consecutive
/// commands of the same kind share one instanced draw; a change of kind
/// switches pipeline, so layering holds across circles, lines and text.
#[derive(Default)]
pub struct SceneRenderer {
    quad: QuadBuffers,
    circles: CircleRenderer,
    lines: LineRenderer,
    text: TextRenderer,
    batches: Vec<Batch>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        if !ctx.viewport.is_valid() || list.is_empty() {
            return;
        }

        self.quad.ensure(ctx);
        self.circles.prepare(ctx);
        self.lines.prepare(ctx);
        self.text.prepare(ctx);
        self.batches.clear();

        for item in list.iter_in_paint_order() {
            let (kind, start, count) = match &item.cmd {
                DrawCmd::Circle(cmd) => {
                    let start = self.circles.instance_count();
                    (ShapeKind::Circle, start, self.circles.push(cmd))
                }
                DrawCmd::Line(cmd) => {
                    let start = self.lines.instance_count();
                    (ShapeKind::Line, start, self.lines.push(cmd))
                }
                DrawCmd::Text(cmd) => {
                    let start = self.text.instance_count();
                    (ShapeKind::Text, start, self.text.push(ctx, cmd, fonts))
                }
            };
            extend_batches(&mut self.batches, kind, start, count);
        }

        if self.batches.is_empty() {
            return;
        }

        self.circles.upload(ctx);
        self.lines.upload(ctx);
        self.text.upload(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("astar scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if !self.quad.bind(&mut rpass) {
            return;
        }

        for batch in &self.batches {
            let range = batch.instances.clone();
            match batch.kind {
                ShapeKind::Circle => self.circles.draw(&mut rpass, range),
                ShapeKind::Line => self.lines.draw(&mut rpass, range),
                ShapeKind::Text => self.text.draw(&mut rpass, range),
            }
        }
    }
}
