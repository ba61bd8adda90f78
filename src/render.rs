use crate::config::RenderConfig;
use crate::layout::{DepthTier, Segment};
use crate::snapshot::TreeScene;
use anyhow::{Context, Result};
use std::path::Path;

const EMPTY_STATE_SIZE: f32 = 320.0;

pub fn render_svg(scene: &TreeScene, config: &RenderConfig) -> String {
    let layout = &scene.tree.layout;
    let width = layout.tree_size.width.max(1.0);
    let height = layout.tree_size.height.max(1.0);
    let mut svg = svg_open(width, height, config);

    svg.push_str(&format!(
        "<g fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" stroke-linecap=\"round\">",
        config.line_color
    ));
    let groups: [(&str, &[Segment]); 4] = [
        ("spouse-bars", &scene.connectors.spouse_bars),
        ("stems", &scene.connectors.stems),
        ("rails", &scene.connectors.rails),
        ("drops", &scene.connectors.drops),
    ];
    for (class, segments) in groups {
        svg.push_str(&format!("<g class=\"{class}\">"));
        for segment in segments {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>",
                segment.x1, segment.y1, segment.x2, segment.y2
            ));
        }
        svg.push_str("</g>");
    }
    svg.push_str("</g>");

    for member in scene.tree.members() {
        let Some(frame) = layout.frames.get(&member.id) else {
            continue;
        };
        let tier = layout
            .variants
            .get(&member.id)
            .copied()
            .unwrap_or(DepthTier::C);
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\" data-member=\"{}\"/>",
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            tier_fill(tier, config),
            config.node_stroke,
            escape_xml(&member.id)
        ));
        let mut lines = vec![member.display_name()];
        if let Some(lifespan) = member.lifespan() {
            lines.push(lifespan);
        }
        svg.push_str(&text_lines_svg(
            frame.center_x(),
            frame.center_y(),
            &lines,
            config,
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Placeholder drawn when the snapshot has no focus couple.
pub fn render_empty_svg(message: &str, config: &RenderConfig) -> String {
    let mut svg = svg_open(EMPTY_STATE_SIZE, EMPTY_STATE_SIZE, config);
    svg.push_str(&text_lines_svg(
        EMPTY_STATE_SIZE / 2.0,
        EMPTY_STATE_SIZE / 2.0,
        &[message.to_string()],
        config,
    ));
    svg.push_str("</svg>");
    svg
}

fn svg_open(width: f32, height: f32, config: &RenderConfig) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    );
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));
    svg
}

fn tier_fill(tier: DepthTier, config: &RenderConfig) -> &str {
    if config.tier_fills.is_empty() {
        return "none";
    }
    let index = tier.index().min(config.tier_fills.len() - 1);
    &config.tier_fills[index]
}

fn text_lines_svg(x: f32, y: f32, lines: &[String], config: &RenderConfig) -> String {
    let line_height = config.font_size * 1.3;
    let total_height = lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + config.font_size;
    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        config.font_family, config.font_size, config.text_color
    );
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

/// Writes the document to `output`, or to stdout with a trailing newline.
pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        println!("{svg}");
        return Ok(());
    };
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))
}

/// Zoom that fits a `width`x`height` canvas inside the configured raster box.
#[cfg(feature = "png")]
fn raster_zoom(width: f32, height: f32, config: &RenderConfig) -> f32 {
    let zoom = (config.width / width).min(config.height / height);
    if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 }
}

/// Rasterises the tree canvas so it fits the `RenderConfig` width and height.
#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, config: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = config.font_family.split(',').map(str::trim).find(|f| !f.is_empty()) {
        opt.font_family = family.to_string();
    }
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let canvas = tree.size();
    let zoom = raster_zoom(canvas.width(), canvas.height(), config);
    let width = (canvas.width() * zoom).ceil().max(1.0) as u32;
    let height = (canvas.height() * zoom).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("cannot allocate a {width}x{height} pixmap"))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(zoom, zoom),
        &mut pixmap.as_mut(),
    );
    pixmap
        .save_png(output)
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::debug!(width, height, zoom, "png written");
    Ok(())
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
