use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::TextCmd;
use crate::text::{FontId, FontSystem};

use super::common::{
    create_shape_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport_uniform,
    InstanceBuffer, QUAD_INDEX_COUNT,
};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Pixel size glyphs are rasterized at: `size × scale` rounded to whole
/// physical pixels, so a continuously resized face reuses a handful of sizes.
#[inline]
fn raster_px(size: f32, scale: f32) -> f32 {
    (size * scale).round().max(1.0)
}

// ── glyph atlas ───────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf allocator + glyph cache for a square atlas.
///
/// When a glyph no longer fits the atlas is marked full; the next
/// [`begin_frame`](Self::begin_frame) evicts everything and packing restarts
/// from the top-left corner.
struct GlyphAtlas<K> {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
    cache: HashMap<K, CachedGlyph>,
}

impl<K: Eq + Hash> GlyphAtlas<K> {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
            cache: HashMap::new(),
        }
    }

    fn reset(&mut self) {
        self.cursor_x = GLYPH_PADDING;
        self.cursor_y = GLYPH_PADDING;
        self.row_height = 0;
        self.full = false;
        self.cache.clear();
    }

    /// Evicts every glyph if the previous frame ran out of space. Returns
    /// `true` when it did.
    fn begin_frame(&mut self) -> bool {
        if !self.full {
            return false;
        }
        self.reset();
        true
    }

    fn get(&self, key: &K) -> Option<CachedGlyph> {
        self.cache.get(key).copied()
    }

    /// Reserves a `w × h` cell for `key` and caches its UVs. Returns the
    /// cell's top-left texel, or `None` once the atlas is full.
    fn allocate(&mut self, key: K, w: u32, h: u32) -> Option<[u32; 2]> {
        if self.full {
            return None;
        }

        // Advance to a new shelf row when the glyph doesn't fit horizontally.
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size
            || self.cursor_y + h + GLYPH_PADDING > self.size
        {
            self.full = true;
            return None;
        }

        let (gx, gy) = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);

        let size_f = self.size as f32;
        self.cache.insert(
            key,
            CachedGlyph {
                uv_min: [gx as f32 / size_f, gy as f32 / size_f],
                uv_max: [(gx + w) as f32 / size_f, (gy + h) as f32 / size_f],
            },
        );
        Some([gx, gy])
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text`.
///
/// Maintains an R8Unorm glyph atlas. Glyphs are rasterized via fontdue at
/// whole physical pixel sizes (see [`raster_px`]) and scaled to the exact
/// requested size in their destination quad.
///
/// The cache key is `fontdue::layout::GlyphRasterConfig`, which encodes font
/// identity, glyph index, and pixel size.
pub struct TextRenderer {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    // atlas
    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    atlas: GlyphAtlas<GlyphRasterConfig>,

    /// Fonts already reported as missing; each is warned about once.
    missing_fonts: HashSet<FontId>,

    instances: Vec<GlyphInstance>,
    instance_buffer: InstanceBuffer,

    // reusable fontdue layout
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            atlas: GlyphAtlas::new(ATLAS_SIZE),
            missing_fonts: HashSet::new(),
            instances: Vec::new(),
            instance_buffer: InstanceBuffer::default(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: builds GPU state on first use and resets the batch.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_sampler(ctx);
        self.ensure_bindings(ctx);
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            write_viewport_uniform(ctx, ubo);
        }
        if self.atlas.begin_frame() {
            log::debug!("TextRenderer: glyph atlas full ({ATLAS_SIZE}×{ATLAS_SIZE}); evicted");
        }
        self.instances.clear();
    }

    /// Lays out one text command and queues a glyph instance per visible glyph.
    ///
    /// Returns the number of instances added. Unknown fonts add none.
    pub fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &TextCmd, fonts: &FontSystem) -> u32 {
        let Some(font) = fonts.get(cmd.font) else {
            if self.report_missing_font(cmd.font) {
                log::warn!("TextRenderer: unknown FontId {:?}, skipping its text", cmd.font);
            }
            return 0;
        };
        if cmd.size <= 0.0 || cmd.text.is_empty() {
            return 0;
        }

        let scale = ctx.scale_factor.max(0.01);
        let px = raster_px(cmd.size, scale);
        // raster pixels -> logical pixels at the exact requested size
        let to_logical = cmd.size / px;
        let color = cmd.color.to_array();

        self.layout.reset(&LayoutSettings::default());
        self.layout.append(&[font], &TextStyle::new(&cmd.text, px, 0));

        // Snapshot glyph positions so the borrow on `self.layout` ends before
        // the atlas is mutated.
        let glyph_snap: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let mut added = 0;
        for (key, x, y, w, h) in glyph_snap {
            if self.atlas.get(&key).is_none() {
                let (metrics, bitmap) = font.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                self.place_glyph(ctx, key, &bitmap, metrics.width as u32, metrics.height as u32);
            }

            let Some(cached) = self.atlas.get(&key) else { continue };

            let x0 = cmd.origin.x + x * to_logical;
            let y0 = cmd.origin.y + y * to_logical;
            self.instances.push(GlyphInstance {
                dst_min: [x0, y0],
                dst_max: [x0 + w as f32 * to_logical, y0 + h as f32 * to_logical],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
            added += 1;
        }
        added
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        self.instance_buffer.upload(ctx, "astar text instance vbo", &self.instances);
    }

    /// Draws `range` of this frame's glyphs. The quad must already be bound.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(instance_vbo) = self.instance_buffer.get() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);
    }

    /// `true` the first time `id` is reported.
    fn report_missing_font(&mut self, id: FontId) -> bool {
        self.missing_fonts.insert(id)
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn place_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        key: GlyphRasterConfig,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) {
        let Some(atlas) = self.atlas_texture.as_ref() else { return };
        let Some([gx, gy]) = self.atlas.allocate(key, w, h) else { return };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("astar text bgl"),
            entries: &[
                viewport_layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_shape_pipeline(
            ctx,
            "astar text pipeline",
            include_str!("shaders/text.wgsl"),
            &bgl,
            GlyphInstance::layout(),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("astar text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.atlas.reset();
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("astar text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let viewport_ubo = create_viewport_ubo(ctx, "astar text viewport ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("astar text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── raster size ───────────────────────────────────────────────────────

    #[test]
    fn raster_size_snaps_to_whole_pixels() {
        assert_eq!(raster_px(21.6, 1.0), 22.0);
        assert_eq!(raster_px(21.4, 1.5), 32.0);
        assert_eq!(raster_px(0.1, 1.0), 1.0);
    }

    #[test]
    fn resize_drag_uses_few_raster_sizes() {
        // numeral size on a square window: 0.12 × 0.45 × width
        let sizes: HashSet<u32> = (480..=1200)
            .map(|w| raster_px((0.12 * 0.45 * w as f32).max(10.0), 1.0) as u32)
            .collect();
        assert!(sizes.len() <= 40, "{} raster sizes", sizes.len());
    }

    // ── atlas ─────────────────────────────────────────────────────────────

    #[test]
    fn cached_glyph_is_reused() {
        let mut atlas = GlyphAtlas::new(64);
        assert_eq!(atlas.allocate(1u32, 10, 10), Some([1, 1]));
        assert!(atlas.get(&1).is_some());
        assert_eq!(atlas.allocate(2u32, 10, 10), Some([12, 1]));
    }

    #[test]
    fn glyphs_keep_coming_back_after_atlas_fills() {
        let mut atlas = GlyphAtlas::new(ATLAS_SIZE);
        let mut evictions = 0;

        // one "frame" per raster size, ten digit glyphs each, cycled
        for frame in 0..2000u32 {
            if atlas.begin_frame() {
                evictions += 1;
            }
            let px = 20 + frame % 60;
            let mut drawn = 0;
            for digit in 0..10u32 {
                let key = (px, digit);
                if atlas.get(&key).is_some() || atlas.allocate(key, px, px).is_some() {
                    drawn += 1;
                }
            }
            // a frame may lose glyphs only when it is the one that fills the atlas
            assert!(drawn == 10 || atlas.full, "frame {frame} drew {drawn}");
            if atlas.full {
                assert!(atlas.begin_frame());
                evictions += 1;
                let retry = (0..10u32)
                    .filter(|&d| atlas.allocate((px, d), px, px).is_some())
                    .count();
                assert_eq!(retry, 10, "frame {frame} after eviction");
            }
        }
        assert!(evictions > 0);
    }

    #[test]
    fn oversized_glyph_marks_full_instead_of_panicking() {
        let mut atlas = GlyphAtlas::new(32);
        assert_eq!(atlas.allocate(0u32, 40, 8), None);
        assert!(atlas.full);
        assert!(atlas.begin_frame());
        assert_eq!(atlas.allocate(1u32, 8, 8), Some([1, 1]));
    }

    // ── missing fonts ─────────────────────────────────────────────────────

    #[test]
    fn missing_font_is_reported_once() {
        let mut r = TextRenderer::new();
        let id = FontId::default();
        assert!(r.report_missing_font(id));
        for _ in 0..720 {
            assert!(!r.report_missing_font(id));
        }
    }
}
