use std::collections::HashMap;
use std::path::Path;

use crate::compose::layers::{self, FrameSpec, GRADIENT_DARKEN, GRADIENT_LIGHTEN};
use crate::compose::text::TextEngine;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::palette::color::Rgb8;
use crate::palette::normalize::Palette;
use crate::script::segment::Scene;

/// A rendered frame as RGBA8 pixels, tightly packed, row-major.
///
/// The background gradient is opaque, so composited frames always carry full alpha.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    start: [u8; 3],
    end: [u8; 3],
}

/// Deterministic frame compositor.
///
/// `composite` is a pure function of `(scene, progress, palette, title)`: two calls with
/// identical inputs produce byte-identical pixels. The render context, text engine and
/// gradient cache are reused across frames but never influence output.
pub struct FrameCompositor {
    canvas: Canvas,
    text: TextEngine,
    ctx: Option<vello_cpu::RenderContext>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl FrameCompositor {
    pub fn new(canvas: Canvas, font_bytes: Vec<u8>) -> ReelResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }
        if u16::try_from(canvas.width).is_err() || u16::try_from(canvas.height).is_err() {
            return Err(ReelError::validation("canvas dimensions exceed u16"));
        }
        Ok(Self {
            canvas,
            text: TextEngine::from_font_bytes(font_bytes)?,
            ctx: None,
            gradient_cache: HashMap::new(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Produce one raster frame by painting the five layers back to front.
    pub fn composite(
        &mut self,
        scene: &Scene,
        progress: f64,
        palette: &Palette,
        title: &str,
    ) -> ReelResult<FrameRGBA> {
        if !progress.is_finite() || !(0.0..=1.0).contains(&progress) {
            return Err(ReelError::validation("progress must be within [0, 1]"));
        }
        if scene.total == 0 || scene.index >= scene.total {
            return Err(ReelError::validation("scene index/total out of range"));
        }

        let canvas = self.canvas;
        let spec = FrameSpec {
            scene,
            progress,
            palette,
            title,
            canvas,
        };

        let width = canvas.width as u16;
        let height = canvas.height as u16;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);

        self.with_ctx_mut(width, height, |this, ctx| {
            this.paint_background(ctx, &spec)?;
            layers::paint_waves(ctx, &spec)?;
            layers::paint_character(ctx, &spec)?;
            layers::paint_title(ctx, &spec, &mut this.text)?;
            layers::paint_caption(ctx, &spec, &mut this.text)?;
            layers::paint_hud(ctx, &spec, &mut this.text)?;
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        // The u8 pipeline can round alpha down to 254 where translucent layers
        // blend; the background is opaque, so force full alpha.
        let mut data = pixmap.data_as_u8_slice().to_vec();
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ReelResult<R>,
    ) -> ReelResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Layer 1a: vertical gradient between tints of two cyclic palette entries.
    fn paint_background(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        spec: &FrameSpec<'_>,
    ) -> ReelResult<()> {
        let i = spec.scene.index;
        let start = spec.palette.rgb(i)?.lighten(GRADIENT_LIGHTEN);
        let end = spec.palette.rgb(i + 1)?.darken(GRADIENT_DARKEN);
        let img = self.gradient_paint(start, end)?;

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
        Ok(())
    }

    fn gradient_paint(&mut self, start: Rgb8, end: Rgb8) -> ReelResult<vello_cpu::Image> {
        let key = GradientKey {
            start: [start.r, start.g, start.b],
            end: [end.r, end.g, end.b],
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }

        let w = self.canvas.width;
        let h = self.canvas.height;
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        let h1 = (h.max(1) - 1) as f32;
        for y in 0..h {
            let t = if h1 <= 0.0 { 0.0 } else { (y as f32) / h1 };
            let lerp = |a: u8, b: u8| -> u8 {
                let af = a as f32;
                let bf = b as f32;
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let c = [
                lerp(start.r, end.r),
                lerp(start.g, end.g),
                lerp(start.b, end.b),
                255,
            ];
            for x in 0..w {
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }

        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("pixmap byte len mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Write a frame as a PNG file.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> ReelResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ReelError::io(format!("write png '{}': {e}", path.display())))
}
