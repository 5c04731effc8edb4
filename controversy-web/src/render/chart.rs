//! SVG pie-chart markup
//!
//! Wedges are filled by stance, outlined in white and wrapped in a link to
//! the item's URL; hovering shows the name and URL. A legend lists the
//! item names beside the pie.

use std::f64::consts::PI;

use controversy_common::chart::Wedge;
use controversy_common::Category;

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Fill for items whose boolean is true
pub const TRUE_COLOR: &str = "#ef8a62";
/// Fill for items whose boolean is false
pub const FALSE_COLOR: &str = "#67a9cf";

const WIDTH: f64 = 420.0;
const HEIGHT: f64 = 260.0;
const CENTER_X: f64 = 130.0;
const CENTER_Y: f64 = 130.0;
const RADIUS: f64 = 110.0;
const LEGEND_X: f64 = 270.0;
const LEGEND_Y: f64 = 20.0;
const LEGEND_ROW: f64 = 20.0;

pub fn fill_for(boolean: bool) -> &'static str {
    if boolean {
        TRUE_COLOR
    } else {
        FALSE_COLOR
    }
}

/// Render one category's wedges as an inline `<svg>`
///
/// An empty wedge list renders a placeholder paragraph instead.
pub fn render_pie(category: Category, wedges: &[Wedge]) -> String {
    if wedges.is_empty() {
        return format!(
            r#"<p class="chart-empty">No {} points yet.</p>"#,
            category.as_str()
        );
    }

    let mut shapes = String::new();
    let mut legend = String::new();

    for (i, wedge) in wedges.iter().enumerate() {
        let fill = fill_for(wedge.item.boolean);
        let tooltip = format!("{} \n {}", wedge.item.name, wedge.item.url);

        shapes.push_str(&format!(
            r#"<a href="{url}" target="_blank" rel="noopener">{shape}<title>{tooltip}</title></a>"#,
            url = encode_double_quoted_attribute(&wedge.item.url),
            shape = wedge_shape(wedge, fill),
            tooltip = encode_text(&tooltip),
        ));

        let y = LEGEND_Y + i as f64 * LEGEND_ROW;
        legend.push_str(&format!(
            r#"<rect x="{x:.1}" y="{ry:.1}" width="12" height="12" fill="{fill}"/><text x="{tx:.1}" y="{ty:.1}">{name}</text>"#,
            x = LEGEND_X,
            ry = y,
            fill = fill,
            tx = LEGEND_X + 18.0,
            ty = y + 11.0,
            name = encode_text(&wedge.item.name),
        ));
    }

    format!(
        r#"<svg class="pie" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label} pie chart"><g class="wedges">{shapes}</g><g class="legend">{legend}</g></svg>"#,
        w = WIDTH,
        h = HEIGHT,
        label = category.label(),
        shapes = shapes,
        legend = legend,
    )
}

/// `<circle>` for a full pie, otherwise an arc `<path>`
fn wedge_shape(wedge: &Wedge, fill: &str) -> String {
    if wedge.is_full_circle() {
        return format!(
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{fill}" stroke="white" stroke-width="2"/>"#,
            cx = CENTER_X,
            cy = CENTER_Y,
            r = RADIUS,
            fill = fill,
        );
    }

    let start = wedge.start_angle;
    let sweep = wedge.sweep();
    let (x0, y0) = point_on_circle(start);
    let (x1, y1) = point_on_circle(start + sweep);
    let large_arc = if sweep > PI { 1 } else { 0 };

    // Screen y grows downward, so a counter-clockwise sweep uses flag 0
    format!(
        r#"<path d="M {cx:.3} {cy:.3} L {x0:.3} {y0:.3} A {r:.3} {r:.3} 0 {large_arc} 0 {x1:.3} {y1:.3} Z" fill="{fill}" stroke="white" stroke-width="2"/>"#,
        cx = CENTER_X,
        cy = CENTER_Y,
        r = RADIUS,
    )
}

fn point_on_circle(angle: f64) -> (f64, f64) {
    (
        CENTER_X + RADIUS * angle.cos(),
        CENTER_Y - RADIUS * angle.sin(),
    )
}
