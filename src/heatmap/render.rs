//! SVG rendering of foot heatmaps.
//!
//! Both feet are drawn side by side, left foot first, followed by a vertical
//! colour bar. Only pixels inside a sensor area are drawn; each row of a
//! panel is emitted as runs of equally coloured pixels.

use super::foot::{ColorRange, FootHeatmap};
use crate::output::write_svg;
use crate::tree::Foot;
use crate::utils::error::HeatmapError;
use log::info;
use std::path::{Path, PathBuf};

const PANEL_HEIGHT: f64 = 480.0;
const MARGIN: f64 = 20.0;
const TITLE_HEIGHT: f64 = 30.0;
const PANEL_GAP: f64 = 30.0;
const BAR_WIDTH: f64 = 20.0;
const BAR_LABEL_WIDTH: f64 = 70.0;
const BAR_TICKS: usize = 5;

/// "cool" colour map: cyan at 0, magenta at 1
pub fn cool_color(t: f64) -> (u8, u8, u8) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let r = (255.0 * t).round() as u8;
    let g = (255.0 * (1.0 - t)).round() as u8;
    (r, g, 255)
}

/// Position of `value` in `[min, max]`, clamped to `[0, 1]`
fn normalise(value: f64, (min, max): (f64, f64)) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", r, g, b)
}

/// Render a heatmap as a self-contained SVG document
///
/// **Public** - main entry point for heatmap rendering
///
/// # Errors
/// * `HeatmapError::InvalidRange` - manual range with invalid bounds
pub fn render_foot_heatmap(
    heatmap: &FootHeatmap,
    range: ColorRange,
    title: &str,
) -> Result<String, HeatmapError> {
    let bounds = range.resolve(heatmap)?;
    let (rows, cols) = heatmap.layout().shape();
    let scale = PANEL_HEIGHT / rows.max(1) as f64;
    let panel_width = cols as f64 * scale;

    let left_x = MARGIN;
    let right_x = left_x + panel_width + PANEL_GAP;
    let bar_x = right_x + panel_width + PANEL_GAP;
    let top = MARGIN + TITLE_HEIGHT;

    let width = bar_x + BAR_WIDTH + BAR_LABEL_WIDTH;
    let height = top + PANEL_HEIGHT + MARGIN * 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.2} {:.2}">"#,
        width, height, width, height
    ));
    svg.push_str(r#"<style>text { font: 12px sans-serif; }</style>"#);
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        MARGIN + 10.0,
        escape_text(title)
    ));

    for (foot, x) in [(Foot::Left, left_x), (Foot::Right, right_x)] {
        render_panel(&mut svg, heatmap, foot, bounds, x, top, scale);
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            x + panel_width / 2.0,
            top + PANEL_HEIGHT + MARGIN,
            foot.label()
        ));
    }

    render_color_bar(&mut svg, bounds, bar_x, top);

    svg.push_str("</svg>");
    Ok(svg)
}

fn render_panel(
    out: &mut String,
    heatmap: &FootHeatmap,
    foot: Foot,
    bounds: (f64, f64),
    x0: f64,
    y0: f64,
    scale: f64,
) {
    let layout = heatmap.layout();
    let grid = heatmap.foot(foot);
    let (rows, cols) = layout.shape();

    for row in 0..rows {
        let mut col = 0;
        while col < cols {
            if !layout.covers(foot, (row, col)) {
                col += 1;
                continue;
            }

            let color = cool_color(normalise(grid[(row, col)], bounds));
            let start = col;
            col += 1;
            while col < cols
                && layout.covers(foot, (row, col))
                && cool_color(normalise(grid[(row, col)], bounds)) == color
            {
                col += 1;
            }

            out.push_str(&format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                x0 + start as f64 * scale,
                y0 + row as f64 * scale,
                (col - start) as f64 * scale,
                scale,
                rgb(color)
            ));
        }
    }
}

fn render_color_bar(out: &mut String, (min, max): (f64, f64), x: f64, y: f64) {
    out.push_str(&format!(
        r#"<defs><linearGradient id="cool" x1="0" y1="1" x2="0" y2="0"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
        rgb(cool_color(0.0)),
        rgb(cool_color(1.0))
    ));
    out.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="url(#cool)" stroke="black" stroke-width="0.5"/>"#,
        x, y, BAR_WIDTH, PANEL_HEIGHT
    ));

    for i in 0..BAR_TICKS {
        let t = i as f64 / (BAR_TICKS - 1) as f64;
        let value = min + (max - min) * t;
        let tick_y = y + PANEL_HEIGHT * (1.0 - t);
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black"/><text x="{:.2}" y="{:.2}" dy="4">{}</text>"#,
            x + BAR_WIDTH,
            tick_y,
            x + BAR_WIDTH + 4.0,
            tick_y,
            x + BAR_WIDTH + 6.0,
            tick_y,
            format_tick(value)
        ));
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl FootHeatmap {
    /// Render this heatmap and write it to `<folder>/foot_heatmap<suffix>.svg`
    ///
    /// **Public** - heatmap export
    ///
    /// # Arguments
    /// * `range` - `Static` (0 to 300), `Auto` (data bounds) or `Manual(min, max)`;
    ///   values outside the range take the end colours of the bar
    /// * `folder` - Output folder, created when missing
    /// * `suffix` - Appended to `foot_heatmap` in the file name
    ///
    /// # Returns
    /// Path of the written file
    ///
    /// # Example
    /// ```ignore
    /// let path = hm.export_foot_heatmap(ColorRange::Auto, "output", "_1213")?;
    /// ```
    pub fn export_foot_heatmap(
        &self,
        range: ColorRange,
        folder: impl AsRef<Path>,
        suffix: &str,
    ) -> Result<PathBuf, HeatmapError> {
        let path = folder
            .as_ref()
            .join(format!("foot_heatmap{}.svg", suffix));
        let title = format!("foot heatmap{} ({})", suffix, range);

        let svg = render_foot_heatmap(self, range, &title)?;
        write_svg(&svg, &path)?;

        info!("Foot heatmap exported to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AttributeVector;
    use crate::heatmap::FootMask;
    use image::{GrayImage, Luma};
    use std::sync::Arc;

    fn heatmap() -> FootHeatmap {
        // sensor 0 covers row 0 fully, sensor 1 covers (1, 0)
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, Luma([1]));
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(0, 1, Luma([2]));
        let mask = Arc::new(FootMask::from_image(&img));
        let vector: AttributeVector = [(0, 300.0), (1, 0.0), (99, 150.0)].into_iter().collect();
        FootHeatmap::from_attribute(&vector, &mask)
    }

    #[test]
    fn test_cool_color_ends() {
        assert_eq!(cool_color(0.0), (0, 255, 255));
        assert_eq!(cool_color(1.0), (255, 0, 255));
        assert_eq!(cool_color(7.0), (255, 0, 255));
        assert_eq!(cool_color(f64::NAN), (0, 255, 255));
    }

    #[test]
    fn test_normalise_clamps() {
        assert_eq!(normalise(400.0, (0.0, 300.0)), 1.0);
        assert_eq!(normalise(-1.0, (0.0, 300.0)), 0.0);
        assert_eq!(normalise(5.0, (5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_render_merges_row_runs() {
        let svg = render_foot_heatmap(&heatmap(), ColorRange::Static, "peak").unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // one run per covered row of each foot: left row 0, left row 1, right row 0, right row 1
        let sensor_rects = svg.matches(r#"fill="rgb("#).count();
        assert_eq!(sensor_rects, 4);
        assert!(svg.contains("rgb(255, 0, 255)"));
        assert!(svg.contains(">300</text>"));
    }

    #[test]
    fn test_export_foot_heatmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = heatmap()
            .export_foot_heatmap(ColorRange::Auto, dir.path(), "_fast")
            .unwrap();

        assert_eq!(path, dir.path().join("foot_heatmap_fast.svg"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("foot heatmap_fast (auto)"));
    }

    #[test]
    fn test_invalid_manual_range() {
        let err = render_foot_heatmap(&heatmap(), ColorRange::Manual(5.0, 1.0), "x").unwrap_err();
        assert!(matches!(err, HeatmapError::InvalidRange(_)));
    }
}
