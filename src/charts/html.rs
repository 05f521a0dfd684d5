//! Self-contained HTML pages hosting ECharts instances.

use std::fmt::Write;

use serde_json::Value;

const ECHARTS_JS: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const ECHARTS_GL_JS: &str = "https://cdn.jsdelivr.net/npm/echarts-gl@2/dist/echarts-gl.min.js";

/// Shared categorical palette.
pub const PALETTE: [&str; 15] = [
    "#c23531", "#2f4554", "#61a0a8", "#d48265", "#91c7ae", "#749f83", "#ca8622", "#bda29a",
    "#6e7074", "#546570", "#c4ccd3", "#f05b72", "#ef5b9c", "#f47920", "#905a3d",
];

pub fn palette_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// One chart container on a page.
#[derive(Debug, Clone)]
pub struct Chart {
    pub option: Value,
    pub height_px: u32,
}

impl Chart {
    pub fn new(option: Value, height_px: u32) -> Self {
        Self { option, height_px }
    }
}

/// Page-level settings.
#[derive(Debug, Clone, Default)]
pub struct Page<'a> {
    pub title: &'a str,
    /// Trusted HTML placed above the charts.
    pub preamble: Option<String>,
    /// Load the WebGL extension (3D charts).
    pub gl: bool,
}

/// Renders the page with each chart in its own full-width container.
pub fn render(page: &Page<'_>, charts: &[Chart]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape(page.title));
    let _ = writeln!(out, "<script src=\"{ECHARTS_JS}\"></script>");
    if page.gl {
        let _ = writeln!(out, "<script src=\"{ECHARTS_GL_JS}\"></script>");
    }
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    if let Some(preamble) = &page.preamble {
        let _ = writeln!(out, "{preamble}");
    }

    for (i, chart) in charts.iter().enumerate() {
        let _ = writeln!(
            out,
            "<div id=\"chart-{i}\" style=\"width:100%;height:{}px;\"></div>",
            chart.height_px
        );
    }

    let _ = writeln!(out, "<script>");
    for (i, chart) in charts.iter().enumerate() {
        let _ = writeln!(
            out,
            "echarts.init(document.getElementById('chart-{i}')).setOption({});",
            script_json(&chart.option)
        );
    }
    let _ = writeln!(out, "</script>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}

/// Escapes text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON that cannot terminate the surrounding `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_render_embeds_each_chart() {
        let charts = vec![
            Chart::new(json!({"title": {"text": "one"}}), 300),
            Chart::new(json!({"title": {"text": "</script>"}}), 400),
        ];
        let page = Page {
            title: "Demo <1>",
            gl: true,
            ..Page::default()
        };
        let html = render(&page, &charts);

        assert!(html.contains("<title>Demo &lt;1&gt;</title>"));
        assert!(html.contains("id=\"chart-1\" style=\"width:100%;height:400px;\""));
        assert!(html.contains("echarts-gl"));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("echarts.init").count(), 2);
    }
}
