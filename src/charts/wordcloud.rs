//! Word cloud rendered as an embeddable ECharts fragment.
//!
//! The markup is assembled in memory; nothing touches the filesystem.

use serde::Serialize;
use serde_json::json;

use super::{ChartArtifact, ChartRenderer, ChartSpec};
use crate::analysis::RankedSeries;

pub const MIN_FONT_SIZE: f64 = 20.0;
pub const MAX_FONT_SIZE: f64 = 100.0;

const CONTAINER_ID: &str = "word-cloud-chart";
const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const WORDCLOUD_SRC: &str =
    "https://cdn.jsdelivr.net/npm/echarts-wordcloud@2/dist/echarts-wordcloud.min.js";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudWord {
    pub word: String,
    pub count: usize,
    pub font_size: f64,
}

/// Maps each count linearly onto the font size range. When every count is
/// the same the words share the middle of the range.
pub fn font_sizes(series: &RankedSeries) -> Vec<CloudWord> {
    let values = series.values();
    let min = values.iter().copied().min().unwrap_or(0) as f64;
    let max = values.iter().copied().max().unwrap_or(0) as f64;

    series
        .points()
        .iter()
        .map(|point| {
            let font_size = if max > min {
                MIN_FONT_SIZE + (point.value as f64 - min) / (max - min) * (MAX_FONT_SIZE - MIN_FONT_SIZE)
            } else {
                (MIN_FONT_SIZE + MAX_FONT_SIZE) / 2.0
            };
            CloudWord {
                word: point.label.clone(),
                count: point.value,
                font_size,
            }
        })
        .collect()
}

/// JSON that is safe to drop inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

fn markup(title: &str, words: &[CloudWord]) -> String {
    let data: Vec<_> = words
        .iter()
        .map(|w| json!({ "name": w.word, "value": w.count }))
        .collect();
    let option = json!({
        "title": { "text": title },
        "tooltip": { "show": true },
        "series": [{
            "type": "wordCloud",
            "name": title,
            "shape": "circle",
            "sizeRange": [MIN_FONT_SIZE, MAX_FONT_SIZE],
            "data": data,
        }],
    });

    let mut html = String::with_capacity(1024 + words.len() * 32);
    html.push_str("<div class=\"word-cloud\">\n");
    html.push_str(&format!(
        "<div id=\"{}\" style=\"width:100%;height:500px;\"></div>\n",
        CONTAINER_ID
    ));
    html.push_str(&format!("<script src=\"{}\"></script>\n", ECHARTS_SRC));
    html.push_str(&format!("<script src=\"{}\"></script>\n", WORDCLOUD_SRC));
    html.push_str("<script>\n(function () {\n");
    html.push_str(&format!(
        "  var chart = echarts.init(document.getElementById(\"{}\"));\n",
        CONTAINER_ID
    ));
    html.push_str(&format!("  chart.setOption({});\n", script_json(&option)));
    html.push_str("})();\n</script>\n</div>\n");
    html
}

pub struct WordCloudRenderer;

impl ChartRenderer for WordCloudRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let words = font_sizes(spec.series());
        ChartArtifact::Html {
            html: markup(spec.title(), &words),
            words,
        }
    }
}
