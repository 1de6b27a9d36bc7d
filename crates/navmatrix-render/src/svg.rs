//! SVG serialization of a [`Canvas`].
//!
//! Every length is written as a plain pixel number; groups become `<g>` elements carrying a
//! `translate(..)` so the column → cell → sub-cell nesting survives in the markup.

use crate::model::{Canvas, Element, Group, Rect, Text};
use navmatrix_core::Rgb;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Painted as a full-canvas rect before any content. `None` leaves the canvas transparent.
    pub background: Option<Rgb>,
    /// Root `id` attribute.
    pub diagram_id: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            background: Some(Rgb::WHITE),
            diagram_id: None,
        }
    }
}

pub fn render_canvas_svg(canvas: &Canvas, options: &SvgRenderOptions) -> String {
    let mut out = String::new();
    let w = fmt(canvas.width);
    let h = fmt(canvas.height);
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = options.diagram_id.as_deref() {
        let _ = write!(&mut out, r#" id="{}""#, escape_xml(id));
    }
    let _ = write!(
        &mut out,
        r#" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="font-family: {}">"#,
        escape_xml(&canvas.font_family)
    );
    if let Some(bg) = options.background {
        let _ = write!(
            &mut out,
            r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
            bg.to_hex()
        );
    }
    for child in &canvas.children {
        render_element(&mut out, child);
    }
    out.push_str("</svg>\n");
    out
}

fn render_element(out: &mut String, element: &Element) {
    match element {
        Element::Group(g) => render_group(out, g),
        Element::Rect(r) => render_rect(out, r),
        Element::Text(t) => render_text(out, t),
    }
}

fn render_group(out: &mut String, g: &Group) {
    out.push_str("<g");
    if let Some(class) = g.class.as_deref() {
        let _ = write!(out, r#" class="{}""#, escape_xml(class));
    }
    if let Some(id) = g.id.as_deref() {
        let _ = write!(out, r#" id="{}""#, escape_xml(id));
    }
    let (tx, ty) = g.translate;
    if tx != 0.0 || ty != 0.0 {
        let _ = write!(out, r#" transform="translate({},{})""#, fmt(tx), fmt(ty));
    }
    if let Some(style) = g.style.as_deref() {
        let _ = write!(out, r#" style="{}""#, escape_xml(style));
    }
    out.push('>');
    for child in &g.children {
        render_element(out, child);
    }
    out.push_str("</g>");
}

fn render_rect(out: &mut String, r: &Rect) {
    let fill = r.fill.map(|c| c.to_hex()).unwrap_or_else(|| "none".to_string());
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
        fmt(r.x),
        fmt(r.y),
        fmt(r.width.max(0.0)),
        fmt(r.height.max(0.0)),
        fill
    );
    if let Some(stroke) = r.stroke.as_deref() {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            escape_xml(stroke),
            fmt(r.stroke_width)
        );
    }
    if r.rx > 0.0 {
        let _ = write!(out, r#" rx="{}""#, fmt(r.rx));
    }
    out.push_str("/>");
}

fn render_text(out: &mut String, t: &Text) {
    if t.lines.is_empty() {
        return;
    }
    // `(x, y)` is the block's vertical center; lines are centered around it.
    let first_y = t.y - t.line_height * (t.lines.len() - 1) as f64 / 2.0;
    out.push_str("<text");
    if let Some(class) = t.class.as_deref() {
        let _ = write!(out, r#" class="{}""#, escape_xml(class));
    }
    let _ = write!(
        out,
        r#" x="{}" y="{}" font-size="{}" text-anchor="{}" dominant-baseline="middle" fill="{}""#,
        fmt(t.x),
        fmt(first_y),
        fmt(t.font_size),
        t.anchor.as_str(),
        t.fill.to_hex()
    );
    if t.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    out.push('>');
    if t.lines.len() == 1 {
        escape_xml_into(out, &t.lines[0]);
    } else {
        for (idx, line) in t.lines.iter().enumerate() {
            let y = first_y + t.line_height * idx as f64;
            let _ = write!(out, r#"<tspan x="{}" y="{}">"#, fmt(t.x), fmt(y));
            escape_xml_into(out, line);
            out.push_str("</tspan>");
        }
    }
    out.push_str("</text>");
}

/// Shortest decimal with at most 3 fractional digits; never `-0`, `NaN` or `inf`.
pub fn fmt(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut out = format!("{:.3}", v);
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out == "-0" { "0".to_string() } else { out }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

fn escape_xml_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}
