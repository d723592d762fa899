//! Chart rendering over a fixed family of chart kinds.
//!
//! Each kind has one [`ChartRenderer`] registered in a lookup table; callers
//! hand over a [`ChartSpec`] and get back a [`ChartArtifact`] without caring
//! which renderer produced it.

pub mod figure;
pub mod wordcloud;

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::analysis::RankedSeries;
use crate::error::Degradation;
pub use wordcloud::CloudWord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Waterfall,
    WordCloud,
    Scatter,
    Radar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Line,
        ChartKind::Waterfall,
        ChartKind::WordCloud,
        ChartKind::Scatter,
        ChartKind::Radar,
    ];

    /// Canonical tag, as accepted by `from_str`.
    pub fn tag(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Waterfall => "waterfall",
            ChartKind::WordCloud => "word-cloud",
            ChartKind::Scatter => "scatter",
            ChartKind::Radar => "radar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar chart",
            ChartKind::Pie => "pie chart",
            ChartKind::Line => "line chart",
            ChartKind::Waterfall => "waterfall chart",
            ChartKind::WordCloud => "word cloud",
            ChartKind::Scatter => "scatter plot",
            ChartKind::Radar => "radar chart",
        }
    }

    pub fn default_title(self) -> String {
        format!("Word frequency {}", self.display_name())
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown chart kind '{0}'")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    /// Accepts canonical tags, a few spellings of word cloud, and the Chinese
    /// selector labels used by the original web front end.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "bar" | "柱状图" => ChartKind::Bar,
            "pie" | "饼图" => ChartKind::Pie,
            "line" | "折线图" => ChartKind::Line,
            "waterfall" | "瀑布图" => ChartKind::Waterfall,
            "word-cloud" | "wordcloud" | "word_cloud" | "词云图" => ChartKind::WordCloud,
            "scatter" | "散点图" => ChartKind::Scatter,
            "radar" | "雷达图" => ChartKind::Radar,
            _ => return Err(UnknownChartKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// What to draw. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    series: RankedSeries,
    title: String,
    kind: ChartKind,
}

impl ChartSpec {
    pub fn new(series: RankedSeries, title: impl Into<String>, kind: ChartKind) -> Self {
        ChartSpec {
            series,
            title: title.into(),
            kind,
        }
    }

    pub fn series(&self) -> &RankedSeries {
        &self.series
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }
}

/// Renderable output. Figures are Plotly figure JSON; the word cloud is an
/// embeddable HTML fragment, which the display side must embed rather than
/// plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ChartArtifact {
    Figure { figure: serde_json::Value },
    Html { html: String, words: Vec<CloudWord> },
}

impl ChartArtifact {
    pub fn as_figure(&self) -> Option<&serde_json::Value> {
        match self {
            ChartArtifact::Figure { figure } => Some(figure),
            ChartArtifact::Html { .. } => None,
        }
    }

    pub fn as_html(&self) -> Option<&str> {
        match self {
            ChartArtifact::Html { html, .. } => Some(html),
            ChartArtifact::Figure { .. } => None,
        }
    }
}

/// One implementation per chart kind. Every call builds a fresh artifact.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> ChartArtifact;
}

static RENDERERS: Lazy<HashMap<ChartKind, Box<dyn ChartRenderer>>> = Lazy::new(|| {
    let mut renderers: HashMap<ChartKind, Box<dyn ChartRenderer>> = HashMap::new();
    renderers.insert(ChartKind::Bar, Box::new(figure::BarRenderer));
    renderers.insert(ChartKind::Pie, Box::new(figure::PieRenderer));
    renderers.insert(ChartKind::Line, Box::new(figure::LineRenderer));
    renderers.insert(ChartKind::Waterfall, Box::new(figure::WaterfallRenderer));
    renderers.insert(ChartKind::WordCloud, Box::new(wordcloud::WordCloudRenderer));
    renderers.insert(ChartKind::Scatter, Box::new(figure::ScatterRenderer));
    renderers.insert(ChartKind::Radar, Box::new(figure::RadarRenderer));
    renderers
});

pub fn render(spec: &ChartSpec) -> ChartArtifact {
    match RENDERERS.get(&spec.kind()) {
        Some(renderer) => renderer.render(spec),
        None => {
            log::warn!("No renderer registered for {}, drawing default scatter", spec.kind());
            figure::default_scatter(spec.series())
        }
    }
}

/// Result of rendering a kind given as free text.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    /// `None` when the requested kind was not recognised.
    pub kind: Option<ChartKind>,
    pub title: Option<String>,
    pub artifact: ChartArtifact,
    pub degradation: Option<Degradation>,
}

/// Renders `series` as the requested kind. An unrecognised kind is not an
/// error: the series is drawn as an untitled scatter and the fallback is
/// reported as a degradation.
pub fn render_requested(series: RankedSeries, requested: &str) -> RenderedChart {
    match requested.parse::<ChartKind>() {
        Ok(kind) => {
            let spec = ChartSpec::new(series, kind.default_title(), kind);
            log::debug!("Rendering {} with {} points", kind, spec.series().len());
            RenderedChart {
                kind: Some(kind),
                title: Some(spec.title().to_string()),
                artifact: render(&spec),
                degradation: None,
            }
        }
        Err(UnknownChartKind(requested)) => {
            log::warn!("Unknown chart kind '{}', falling back to scatter", requested);
            RenderedChart {
                kind: None,
                title: None,
                artifact: figure::default_scatter(&series),
                degradation: Some(Degradation::UnknownChartKind { requested }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(&str, usize)]) -> RankedSeries {
        values.iter().map(|&(w, c)| (w, c)).collect()
    }

    #[test]
    fn every_kind_renders_an_artifact() {
        let data = series(&[("cat", 3), ("dog", 2), ("bird", 1)]);
        for kind in ChartKind::ALL {
            let artifact = render(&ChartSpec::new(data.clone(), kind.default_title(), kind));
            match (kind, &artifact) {
                (ChartKind::WordCloud, ChartArtifact::Html { html, words }) => {
                    assert!(html.contains("wordCloud"));
                    assert_eq!(words.len(), 3);
                }
                (_, ChartArtifact::Figure { figure }) => {
                    assert_eq!(figure["data"].as_array().map(Vec::len), Some(1), "{kind}");
                    assert_eq!(figure["layout"]["title"]["text"], kind.default_title());
                }
                _ => panic!("{kind} produced the wrong artifact format"),
            }
        }
    }

    #[test]
    fn parses_tags_aliases_and_selector_labels() {
        assert_eq!("bar".parse::<ChartKind>(), Ok(ChartKind::Bar));
        assert_eq!(" Word_Cloud ".parse::<ChartKind>(), Ok(ChartKind::WordCloud));
        assert_eq!("雷达图".parse::<ChartKind>(), Ok(ChartKind::Radar));
        for kind in ChartKind::ALL {
            assert_eq!(kind.tag().parse::<ChartKind>(), Ok(kind));
        }
        assert_eq!(
            "heatmap".parse::<ChartKind>(),
            Err(UnknownChartKind("heatmap".to_string()))
        );
    }

    #[test]
    fn unknown_kind_falls_back_to_plain_scatter() {
        let data = series(&[("cat", 3), ("dog", 2)]);
        let rendered = render_requested(data, "heatmap");

        assert_eq!(rendered.kind, None);
        assert_eq!(
            rendered.degradation,
            Some(Degradation::UnknownChartKind { requested: "heatmap".into() })
        );
        let figure = rendered.artifact.as_figure().unwrap();
        assert_eq!(figure["data"][0]["mode"], "markers");
        assert_eq!(figure["data"][0]["x"], serde_json::json!(["cat", "dog"]));
        assert!(figure["layout"].get("title").is_none());
    }

    #[test]
    fn renders_are_independent() {
        let data = series(&[("cat", 3)]);
        let first = render(&ChartSpec::new(data.clone(), "first", ChartKind::Bar));
        let second = render(&ChartSpec::new(data, "second", ChartKind::Bar));
        assert_eq!(first.as_figure().unwrap()["layout"]["title"]["text"], "first");
        assert_eq!(second.as_figure().unwrap()["layout"]["title"]["text"], "second");
    }
}
