//! Header strip: about / filters / legend panels, plus the floating legend.

use crate::fit::{MIN_FONT_SIZE, fit_text};
use crate::model::{Group, Rect, Text, TextAnchor};
use crate::text::{DEFAULT_LINE_HEIGHT_FACTOR, TextMeasurer, TextStyle};
use navmatrix_core::{Gradient, LayerFilters, PixelConfig, Rgb, SvgConfig};

pub const HEADER_INSET: f64 = 5.0;
pub const HEADER_GUTTER: f64 = 15.0;
pub const HEADER_TITLE_MAX_FONT_SIZE: f64 = 16.0;
pub const HEADER_TEXT_MAX_FONT_SIZE: f64 = 12.0;
pub const PANEL_PADDING: f64 = 6.0;
pub const PANEL_LABEL_FONT_SIZE: f64 = 10.0;
pub const PANEL_CORNER_RADIUS: f64 = 5.0;
const PANEL_STROKE: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendSample {
    pub value: f64,
    pub color: Rgb,
}

/// `2k - 1` evenly spaced samples from `min_value` plus the exact `max_value`, for a gradient
/// with `k` base colors.
pub fn legend_samples(gradient: &Gradient) -> Vec<LegendSample> {
    let k = gradient.colors.len();
    if k == 0 {
        return Vec::new();
    }
    let steps = 2 * k - 1;
    let step = (gradient.max_value - gradient.min_value) / steps as f64;
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let value = gradient.min_value + step * i as f64;
        out.push(LegendSample {
            value,
            color: gradient.color_for(value),
        });
    }
    out.push(LegendSample {
        value: gradient.max_value,
        color: gradient.color_for(gradient.max_value),
    });
    out
}

/// Layer metadata shown in the header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContent<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub filters: Option<&'a LayerFilters>,
    pub gradient: Option<&'a Gradient>,
}

#[derive(Debug, Clone, Default)]
pub struct HeaderBlocks {
    /// Panel row; `None` when the header is disabled or no panel is drawn inline.
    pub header: Option<Group>,
    /// Independently placed legend, composed last onto the canvas.
    pub floating_legend: Option<Group>,
}

enum PanelBody<'a> {
    Text {
        title: &'a str,
        detail: Option<&'a str>,
    },
    Swatches(Vec<LegendSample>),
}

struct PanelBuilder<'a> {
    measurer: &'a dyn TextMeasurer,
    font_family: Option<&'a str>,
}

impl PanelBuilder<'_> {
    fn build(&self, label: &str, width: f64, height: f64, body: PanelBody<'_>) -> Group {
        let mut panel = Group::new("header-block").with_id(label);
        panel.push(Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            fill: None,
            stroke: Some(PANEL_STROKE.to_string()),
            stroke_width: 1.0,
            rx: PANEL_CORNER_RADIUS,
        });

        // Label tab sitting on the top border.
        let label_style = TextStyle::sized(self.font_family, PANEL_LABEL_FONT_SIZE);
        let label_width = self.measurer.measure(label, &label_style).width;
        let label_height = PANEL_LABEL_FONT_SIZE * DEFAULT_LINE_HEIGHT_FACTOR;
        panel.push(Rect {
            x: PANEL_PADDING,
            y: -label_height / 2.0,
            width: label_width + 4.0,
            height: label_height,
            fill: Some(Rgb::WHITE),
            stroke: None,
            stroke_width: 0.0,
            rx: 0.0,
        });
        panel.push(Text {
            class: Some("header-label".to_string()),
            x: PANEL_PADDING + 2.0,
            y: 0.0,
            lines: vec![label.to_string()],
            font_size: PANEL_LABEL_FONT_SIZE,
            line_height: label_height,
            anchor: TextAnchor::Start,
            fill: Rgb::BLACK,
            bold: false,
        });

        let inner_x = PANEL_PADDING;
        let inner_y = PANEL_PADDING;
        let inner_w = (width - 2.0 * PANEL_PADDING).max(0.0);
        let inner_h = (height - 2.0 * PANEL_PADDING).max(0.0);
        match body {
            PanelBody::Text { title, detail } => {
                let title_h = if detail.is_some() {
                    inner_h / 2.0
                } else {
                    inner_h
                };
                panel.push(self.fitted_text(
                    title,
                    inner_x,
                    inner_y,
                    inner_w,
                    title_h,
                    HEADER_TITLE_MAX_FONT_SIZE,
                    true,
                ));
                if let Some(detail) = detail {
                    panel.push(self.fitted_text(
                        detail,
                        inner_x,
                        inner_y + title_h,
                        inner_w,
                        inner_h - title_h,
                        HEADER_TEXT_MAX_FONT_SIZE,
                        false,
                    ));
                }
            }
            PanelBody::Swatches(samples) => {
                if samples.is_empty() {
                    return panel;
                }
                let swatch_w = inner_w / samples.len() as f64;
                let swatch_h = inner_h / 2.0;
                for (idx, sample) in samples.iter().enumerate() {
                    let x = inner_x + swatch_w * idx as f64;
                    panel.push(Rect {
                        x,
                        y: inner_y,
                        width: swatch_w,
                        height: swatch_h,
                        fill: Some(sample.color),
                        stroke: Some(PANEL_STROKE.to_string()),
                        stroke_width: 0.5,
                        rx: 0.0,
                    });
                    panel.push(self.fitted_text(
                        &format_legend_value(sample.value),
                        x,
                        inner_y + swatch_h,
                        swatch_w,
                        inner_h - swatch_h,
                        HEADER_TEXT_MAX_FONT_SIZE,
                        false,
                    ));
                }
            }
        }
        panel
    }

    #[allow(clippy::too_many_arguments)]
    fn fitted_text(
        &self,
        text: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        max_font_size: f64,
        bold: bool,
    ) -> Text {
        let fitted = fit_text(
            self.measurer,
            text,
            self.font_family,
            width,
            height,
            max_font_size,
            MIN_FONT_SIZE,
        );
        Text {
            class: Some("header-text".to_string()),
            x: x + width / 2.0,
            y: y + height / 2.0,
            lines: fitted.lines,
            font_size: fitted.font_size,
            line_height: fitted.font_size * DEFAULT_LINE_HEIGHT_FACTOR,
            anchor: TextAnchor::Middle,
            fill: Rgb::BLACK,
            bold,
        }
    }
}

/// Legend values print with at most two decimals.
pub fn format_legend_value(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.2}", v);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Builds the header panels and the floating legend.
///
/// The about, filters and legend panels each take `1 / n` of the available width, `n` being the
/// number of enabled panels. A floating legend still takes its slot in that count but is placed
/// at its configured position (or the bottom-right corner inside the border).
pub fn build_header(
    content: &HeaderContent<'_>,
    config: &SvgConfig,
    px: &PixelConfig,
    measurer: &dyn TextMeasurer,
) -> HeaderBlocks {
    if !config.show_header {
        return HeaderBlocks::default();
    }

    let show_about = config.show_about;
    let filters = content.filters.filter(|_| config.show_filters);
    let gradient = content.gradient.filter(|_| config.show_legend);
    let active = [show_about, filters.is_some(), gradient.is_some()]
        .iter()
        .filter(|on| **on)
        .count();
    if active == 0 {
        return HeaderBlocks::default();
    }

    let builder = PanelBuilder {
        measurer,
        font_family: Some(config.font.as_str()),
    };
    let total_width =
        (px.width - 2.0 * HEADER_INSET - HEADER_GUTTER * (active - 1) as f64).max(0.0);
    let panel_w = total_width / active as f64;
    let panel_h = (px.header_height - HEADER_INSET).max(0.0);
    let slot_x = |slot: usize| slot as f64 * (panel_w + HEADER_GUTTER);

    let mut header = Group::new("header").at(HEADER_INSET, HEADER_INSET);
    let mut slot = 0usize;

    if show_about {
        let body = PanelBody::Text {
            title: content.name,
            detail: content.description.filter(|d| !d.trim().is_empty()),
        };
        header.push(builder.build("about", panel_w, panel_h, body).at(slot_x(slot), 0.0));
        slot += 1;
    }

    if let Some(filters) = filters {
        let platforms = filters.platforms.join(", ");
        // Only the first stage is summarized.
        let body = PanelBody::Text {
            title: &platforms,
            detail: filters.stages.first().map(String::as_str),
        };
        header.push(builder.build("filters", panel_w, panel_h, body).at(slot_x(slot), 0.0));
        slot += 1;
    }

    let mut floating_legend = None;
    if let Some(gradient) = gradient {
        let samples = legend_samples(gradient);
        if config.legend_docked {
            let panel = builder.build("legend", panel_w, panel_h, PanelBody::Swatches(samples));
            header.push(panel.at(slot_x(slot), 0.0));
        } else {
            let w = px.legend_width;
            let h = px.legend_height;
            let x = px.legend_x.unwrap_or(px.width - w - px.border);
            let y = px.legend_y.unwrap_or(px.height - h - px.border);
            let panel = builder.build("legend", w, h, PanelBody::Swatches(samples));
            let mut legend = Group::new("legend").at(x, y);
            legend.style = Some(format!("font-family: {}", config.font));
            legend.push(panel);
            floating_legend = Some(legend);
        }
    }

    let header = if header.children.is_empty() {
        None
    } else {
        header.style = Some(format!("font-family: {}", config.font));
        Some(header)
    };
    HeaderBlocks {
        header,
        floating_legend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;

    fn px_config(cfg: &SvgConfig) -> PixelConfig {
        cfg.resolve_pixels().unwrap()
    }

    fn pixel_cfg() -> SvgConfig {
        SvgConfig {
            width: 200.0,
            height: 200.0,
            header_height: 40.0,
            unit: "px".into(),
            border: 5.0,
            legend_width: 50.0,
            legend_height: 20.0,
            ..SvgConfig::default()
        }
    }

    fn content<'a>(
        filters: Option<&'a LayerFilters>,
        gradient: Option<&'a Gradient>,
    ) -> HeaderContent<'a> {
        HeaderContent {
            name: "layer",
            description: Some("about this layer"),
            filters,
            gradient,
        }
    }

    #[test]
    fn legend_has_two_samples_per_color() {
        let g = Gradient::default();
        let samples = legend_samples(&g);
        assert_eq!(samples.len(), 6);
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(samples[5].value, 100.0);
        assert_eq!(samples[5].color, g.color_for(100.0));
        assert!((samples[1].value - 20.0).abs() < 1e-9);

        let odd = Gradient::new(vec![Rgb::BLACK, Rgb::WHITE], 0.0, 1.0);
        let samples = legend_samples(&odd);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples.last().unwrap().value, 1.0);
    }

    #[test]
    fn legend_value_formatting() {
        assert_eq!(format_legend_value(20.0), "20");
        assert_eq!(format_legend_value(1.0 / 3.0), "0.33");
        assert_eq!(format_legend_value(2.5), "2.5");
        assert_eq!(format_legend_value(-0.001), "0");
    }

    #[test]
    fn disabled_header_produces_nothing() {
        let cfg = SvgConfig {
            show_header: false,
            ..pixel_cfg()
        };
        let g = Gradient::default();
        let blocks = build_header(
            &content(None, Some(&g)),
            &cfg,
            &px_config(&cfg),
            &DeterministicTextMeasurer::default(),
        );
        assert!(blocks.header.is_none());
        assert!(blocks.floating_legend.is_none());
    }

    #[test]
    fn panels_share_the_width_in_fixed_order() {
        let cfg = pixel_cfg();
        let filters = LayerFilters {
            platforms: vec!["Windows".into(), "Linux".into()],
            stages: vec!["act".into(), "prepare".into()],
        };
        let g = Gradient::default();
        let blocks = build_header(
            &content(Some(&filters), Some(&g)),
            &cfg,
            &px_config(&cfg),
            &DeterministicTextMeasurer::default(),
        );
        let header = blocks.header.expect("header");
        assert_eq!(header.translate, (HEADER_INSET, HEADER_INSET));
        let panels: Vec<&Group> = header.groups("header-block").collect();
        let ids: Vec<&str> = panels.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["about", "filters", "legend"]);

        let panel_w = (200.0 - 10.0 - 30.0) / 3.0;
        for (idx, p) in panels.iter().enumerate() {
            assert!((p.translate.0 - idx as f64 * (panel_w + HEADER_GUTTER)).abs() < 1e-9);
            assert!((p.rects().next().unwrap().width - panel_w).abs() < 1e-9);
        }

        let filter_lines: Vec<String> = panels[1]
            .texts()
            .filter(|t| t.class.as_deref() == Some("header-text"))
            .flat_map(|t| t.lines.clone())
            .collect();
        let joined = filter_lines.join(" ");
        assert!(joined.contains("act"));
        assert!(!joined.contains("prepare"));

        let swatches = panels[2].rects().filter(|r| r.height > 0.0 && r.fill.is_some());
        // Label tab background + 6 swatches.
        assert_eq!(swatches.count(), 7);
        assert!(blocks.floating_legend.is_none());
    }

    #[test]
    fn single_panel_takes_the_full_width() {
        let cfg = pixel_cfg();
        let blocks = build_header(
            &content(None, None),
            &cfg,
            &px_config(&cfg),
            &DeterministicTextMeasurer::default(),
        );
        let header = blocks.header.unwrap();
        let about = header.groups("header-block").next().unwrap();
        assert_eq!(about.rects().next().unwrap().width, 190.0);
    }

    #[test]
    fn floating_legend_anchors_bottom_right_inside_border() {
        let cfg = SvgConfig {
            legend_docked: false,
            ..pixel_cfg()
        };
        let g = Gradient::default();
        let blocks = build_header(
            &content(None, Some(&g)),
            &cfg,
            &px_config(&cfg),
            &DeterministicTextMeasurer::default(),
        );
        let legend = blocks.floating_legend.expect("floating legend");
        assert_eq!(legend.translate, (145.0, 175.0));
        let panel = legend.groups("header-block").next().unwrap();
        assert_eq!(panel.rects().next().unwrap().width, 50.0);

        // The floating legend keeps its slot: about only gets half the row.
        let header = blocks.header.unwrap();
        let about = header.groups("header-block").next().unwrap();
        assert_eq!(about.rects().next().unwrap().width, (190.0 - 15.0) / 2.0);
        assert_eq!(header.groups("header-block").count(), 1);
    }

    #[test]
    fn floating_legend_honours_explicit_zero_position() {
        let cfg = SvgConfig {
            legend_docked: false,
            legend_x: Some(0.0),
            legend_y: Some(12.0),
            ..pixel_cfg()
        };
        let g = Gradient::default();
        let blocks = build_header(
            &content(None, Some(&g)),
            &cfg,
            &px_config(&cfg),
            &DeterministicTextMeasurer::default(),
        );
        assert_eq!(blocks.floating_legend.unwrap().translate, (0.0, 12.0));
    }
}
