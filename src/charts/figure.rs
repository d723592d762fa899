//! Plotly figure renderers.

use serde_json::{json, Value};

use super::{ChartArtifact, ChartRenderer, ChartSpec};
use crate::analysis::RankedSeries;

const HOVER_TEMPLATE: &str = "word: %{x}<br>count: %{y}<extra></extra>";
const CONNECTOR_COLOR: &str = "rgb(63, 63, 63)";

fn figure(trace: Value, layout: Value) -> ChartArtifact {
    ChartArtifact::Figure {
        figure: json!({ "data": [trace], "layout": layout }),
    }
}

/// Layout shared by the word-on-x, count-on-y charts.
fn category_layout(title: &str) -> Value {
    json!({
        "title": { "text": title },
        "xaxis": { "title": { "text": "word" }, "tickangle": -45 },
        "yaxis": { "title": { "text": "count" } },
        "showlegend": false,
    })
}

pub struct BarRenderer;

impl ChartRenderer for BarRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        figure(
            json!({
                "type": "bar",
                "x": series.labels(),
                "y": series.values(),
                "hovertemplate": HOVER_TEMPLATE,
            }),
            category_layout(spec.title()),
        )
    }
}

pub struct PieRenderer;

impl ChartRenderer for PieRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        figure(
            json!({
                "type": "pie",
                "labels": series.labels(),
                "values": series.values(),
                "hole": 0.3,
                "sort": false,
            }),
            json!({ "title": { "text": spec.title() } }),
        )
    }
}

pub struct LineRenderer;

impl ChartRenderer for LineRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        figure(
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "x": series.labels(),
                "y": series.values(),
                "hovertemplate": HOVER_TEMPLATE,
            }),
            category_layout(spec.title()),
        )
    }
}

/// Every step is a relative increment of its own count; the bars do not
/// accumulate into a running total.
pub struct WaterfallRenderer;

impl ChartRenderer for WaterfallRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        let values = series.values();
        let text: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        figure(
            json!({
                "type": "waterfall",
                "name": "",
                "orientation": "v",
                "measure": vec!["relative"; values.len()],
                "x": series.labels(),
                "y": values,
                "text": text,
                "textposition": "outside",
                "connector": { "line": { "color": CONNECTOR_COLOR } },
            }),
            category_layout(spec.title()),
        )
    }
}

pub struct ScatterRenderer;

impl ChartRenderer for ScatterRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        figure(
            json!({
                "type": "scatter",
                "mode": "markers",
                "x": series.labels(),
                "y": series.values(),
                "hovertemplate": HOVER_TEMPLATE,
            }),
            category_layout(spec.title()),
        )
    }
}

/// One spoke per word; the polygon is closed by repeating the first point.
pub struct RadarRenderer;

impl ChartRenderer for RadarRenderer {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact {
        let series = spec.series();
        let mut theta = series.labels();
        let mut r = series.values();
        if let Some(first) = series.points().first() {
            theta.push(first.label.as_str());
            r.push(first.value);
        }
        figure(
            json!({
                "type": "scatterpolar",
                "r": r,
                "theta": theta,
                "fill": "toself",
                "name": "radar",
            }),
            json!({
                "title": { "text": spec.title() },
                "polar": {
                    "radialaxis": { "visible": true, "range": [0, series.max_value()] },
                },
                "showlegend": false,
            }),
        )
    }
}

/// Scatter of the series exactly as given, with no title or styling. Used
/// when the requested chart kind is not recognised.
pub fn default_scatter(series: &RankedSeries) -> ChartArtifact {
    figure(
        json!({
            "type": "scatter",
            "mode": "markers",
            "x": series.labels(),
            "y": series.values(),
        }),
        json!({
            "xaxis": { "title": { "text": "labels" } },
            "yaxis": { "title": { "text": "values" } },
        }),
    )
}
