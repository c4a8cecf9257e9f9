use std::f64::consts::TAU;

use kurbo::Shape as _;

use crate::compose::text::{TextBrushRgba8, TextEngine};
use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;
use crate::palette::normalize::Palette;
use crate::script::segment::Scene;

/// Immutable per-frame input shared by every layer painter.
///
/// The compositor paints layers back to front over this one tuple; identical specs must
/// produce identical pixels.
#[derive(Clone, Copy, Debug)]
pub struct FrameSpec<'a> {
    pub scene: &'a Scene,
    /// Local scene progress in `[0, 1]`.
    pub progress: f64,
    pub palette: &'a Palette,
    pub title: &'a str,
    pub canvas: Canvas,
}

/// Number of translucent wave bands overlaid on the background gradient.
pub const WAVE_BANDS: usize = 4;
/// Per-band phase offset in radians.
pub const WAVE_BAND_PHASE: f64 = 1.2;
/// Fraction the gradient start color is lightened toward white.
pub const GRADIENT_LIGHTEN: f64 = 0.35;
/// Fraction the gradient end color is darkened toward black.
pub const GRADIENT_DARKEN: f64 = 0.30;
/// Peak character float offset in pixels.
pub const CHARACTER_FLOAT_PX: f64 = 16.0;
/// Peak caption line bob offset in pixels.
pub const CAPTION_BOB_PX: f64 = 12.0;
/// Caption wrap limit as a fraction of canvas width (must stay <= 0.5).
pub const CAPTION_MAX_WIDTH_FRAC: f64 = 0.44;

const CAPTION_X_FRAC: f64 = 0.52;
const CAPTION_BASE_Y_FRAC: f64 = 0.40;
const CAPTION_SIZE_PX: f32 = 30.0;
const CAPTION_LINE_ADVANCE: f64 = 42.0;
const TITLE_SIZE_PX: f32 = 56.0;
const TITLE_TOP_PX: f64 = 64.0;
const HUD_SIZE_PX: f32 = 20.0;

/// Vertical offset of the floating character at `progress`.
pub fn character_float(progress: f64) -> f64 {
    (progress * TAU).sin() * CHARACTER_FLOAT_PX
}

/// Vertical bob of caption line `line` at `progress`.
pub fn caption_bob(progress: f64, line: usize) -> f64 {
    (progress * TAU + line as f64 * 0.5).sin() * CAPTION_BOB_PX
}

/// HUD progress percentage, rounded to the nearest integer.
pub fn hud_percent(progress: f64) -> u32 {
    (progress.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Filled polygon for one background wave band: a sine curve closed down to the canvas
/// bottom. The vertical offset follows `progress * 2π` plus the per-band phase.
pub fn wave_band_path(canvas: Canvas, progress: f64, band: usize) -> kurbo::BezPath {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let phase = progress * TAU + band as f64 * WAVE_BAND_PHASE;
    let baseline = h * (0.45 + 0.12 * band as f64);
    let amp = h * 0.045;
    let y_at = |x: f64| baseline + (x / w * TAU * 2.0 + phase).sin() * amp;

    let mut path = kurbo::BezPath::new();
    path.move_to((0.0, y_at(0.0)));
    let mut x = 0.0;
    while x < w {
        x = (x + 16.0).min(w);
        path.line_to((x, y_at(x)));
    }
    path.line_to((w, h));
    path.line_to((0.0, h));
    path.close_path();
    path
}

/// Greedy word wrap against a rendered-width measure.
///
/// Words accumulate onto the current line while the tentative line still measures within
/// `max_width`; an overflowing word commits the current line and starts the next one. A
/// single word wider than the limit still occupies its own line.
pub fn wrap_greedy<F>(text: &str, max_width: f64, mut measure: F) -> ReelResult<Vec<String>>
where
    F: FnMut(&str) -> ReelResult<f64>,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let tentative = format!("{line} {word}");
        if measure(&tentative)? <= max_width {
            line = tentative;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}

fn color(r: u8, g: u8, b: u8, a: u8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> kurbo::BezPath {
    let e = kurbo::Ellipse::new((cx, cy), (rx, ry), 0.0);
    let mut p = kurbo::BezPath::new();
    for el in e.path_elements(0.1) {
        p.push(el);
    }
    p
}

fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: f64) -> kurbo::BezPath {
    let rr = kurbo::RoundedRect::new(x, y, x + w, y + h, radius);
    let mut p = kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        p.push(el);
    }
    p
}

/// Draw a laid-out text block with its top-left corner at `(x, y)`.
fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(color(brush.r, brush.g, brush.b, brush.a));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Layer 1b: translucent sine wave bands over the gradient.
pub fn paint_waves(ctx: &mut vello_cpu::RenderContext, spec: &FrameSpec<'_>) -> ReelResult<()> {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color(255, 255, 255, 26));
    for band in 0..WAVE_BANDS {
        let path = wave_band_path(spec.canvas, spec.progress, band);
        ctx.fill_path(&bezpath_to_cpu(&path));
    }
    Ok(())
}

/// Layer 2: stylized floating character anchored left of center.
pub fn paint_character(ctx: &mut vello_cpu::RenderContext, spec: &FrameSpec<'_>) -> ReelResult<()> {
    let w = f64::from(spec.canvas.width);
    let h = f64::from(spec.canvas.height);
    let i = spec.scene.index;
    let body = spec.palette.rgb(i + 2)?;
    let accent = spec.palette.rgb(i + 1)?;

    let cx = w * 0.28;
    let cy = h * 0.60 + character_float(spec.progress);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    // Body and head share the body color.
    ctx.set_paint(color(body.r, body.g, body.b, 255));
    ctx.fill_path(&bezpath_to_cpu(&ellipse_path(cx, cy, 86.0, 118.0)));
    ctx.fill_path(&bezpath_to_cpu(&ellipse_path(cx, cy - 168.0, 64.0, 64.0)));

    // Eyes: accent rings made by overdrawing a body-color pupil ring onto an
    // accent disc.
    for dx in [-26.0, 26.0] {
        ctx.set_paint(color(accent.r, accent.g, accent.b, 255));
        ctx.fill_path(&bezpath_to_cpu(&ellipse_path(cx + dx, cy - 174.0, 13.0, 13.0)));
        ctx.set_paint(color(body.r, body.g, body.b, 255));
        ctx.fill_path(&bezpath_to_cpu(&ellipse_path(cx + dx, cy - 174.0, 5.5, 5.5)));
    }

    // Arms: curved accent bands, each a closed region between two offset quads.
    ctx.set_paint(color(accent.r, accent.g, accent.b, 255));
    for side in [-1.0, 1.0] {
        let mut arm = kurbo::BezPath::new();
        arm.move_to((cx + side * 74.0, cy - 36.0));
        arm.quad_to(
            (cx + side * 150.0, cy - 76.0),
            (cx + side * 128.0, cy - 150.0),
        );
        arm.line_to((cx + side * 116.0, cy - 146.0));
        arm.quad_to(
            (cx + side * 138.0, cy - 80.0),
            (cx + side * 74.0, cy - 24.0),
        );
        arm.close_path();
        ctx.fill_path(&bezpath_to_cpu(&arm));
    }

    Ok(())
}

/// Layer 3: job title, centered, identical on every frame of the job.
pub fn paint_title(
    ctx: &mut vello_cpu::RenderContext,
    spec: &FrameSpec<'_>,
    text: &mut TextEngine,
) -> ReelResult<()> {
    let brush = TextBrushRgba8 {
        r: 15,
        g: 23,
        b: 42,
        a: 210,
    };
    let layout = text.layout(spec.title, TITLE_SIZE_PX, brush)?;
    let x = (f64::from(spec.canvas.width) - f64::from(layout.width())) / 2.0;
    draw_layout(ctx, text.font(), &layout, x, TITLE_TOP_PX);
    Ok(())
}

/// Layer 4: wrapped scene caption in the right half, each line bobbing independently,
/// with a static underline rule in `palette[0]` above the block.
pub fn paint_caption(
    ctx: &mut vello_cpu::RenderContext,
    spec: &FrameSpec<'_>,
    text: &mut TextEngine,
) -> ReelResult<()> {
    let w = f64::from(spec.canvas.width);
    let h = f64::from(spec.canvas.height);
    let block_x = w * CAPTION_X_FRAC;
    let base_y = h * CAPTION_BASE_Y_FRAC;
    let max_width = w * CAPTION_MAX_WIDTH_FRAC;

    let lines = wrap_greedy(&spec.scene.text, max_width, |candidate| {
        text.measure(candidate, CAPTION_SIZE_PX)
    })?;

    let rule = spec.palette.rgb(0)?;
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color(rule.r, rule.g, rule.b, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        block_x,
        base_y - 34.0,
        block_x + w * 0.2,
        base_y - 29.0,
    ));

    let brush = TextBrushRgba8 {
        r: 248,
        g: 250,
        b: 252,
        a: 235,
    };
    for (n, line) in lines.iter().enumerate() {
        let layout = text.layout(line, CAPTION_SIZE_PX, brush)?;
        let y = base_y + n as f64 * CAPTION_LINE_ADVANCE + caption_bob(spec.progress, n);
        draw_layout(ctx, text.font(), &layout, block_x, y);
    }
    Ok(())
}

/// Layer 5: translucent scene/progress badge in the top-left corner.
pub fn paint_hud(
    ctx: &mut vello_cpu::RenderContext,
    spec: &FrameSpec<'_>,
    text: &mut TextEngine,
) -> ReelResult<()> {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color(15, 23, 42, 120));
    ctx.fill_path(&bezpath_to_cpu(&rounded_rect_path(
        24.0, 24.0, 230.0, 78.0, 16.0,
    )));

    let brush = TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    let line1 = format!("Scene {}/{}", spec.scene.index + 1, spec.scene.total);
    let line2 = format!("{}% animated", hud_percent(spec.progress));

    let layout1 = text.layout(&line1, HUD_SIZE_PX, brush)?;
    draw_layout(ctx, text.font(), &layout1, 42.0, 36.0);
    let layout2 = text.layout(&line2, HUD_SIZE_PX, brush)?;
    draw_layout(ctx, text.font(), &layout2, 42.0, 64.0);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layers.rs"]
mod tests;
