use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::analysis::{self, TopWord};
use crate::charts::{ChartArtifact, ChartKind};
use crate::error::Degradation;
use crate::pipeline::PageAnalysis;

fn default_chart_kind() -> String {
    ChartKind::Bar.tag().to_string()
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default = "default_chart_kind")]
    pub chart_kind: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub final_url: String,
    pub encoding: String,
    /// `None` when the requested kind was unknown and the default scatter was drawn.
    pub chart_kind: Option<ChartKind>,
    pub title: Option<String>,
    pub top_words: Vec<TopWord>,
    pub top_words_text: String,
    pub chart: ChartArtifact,
    pub token_count: usize,
    pub unique_words: usize,
    pub text_preview: String,
    pub degradations: Vec<Degradation>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalyzeResponse {
    pub fn from_analysis(analysis: PageAnalysis, preview_chars: usize) -> Self {
        let text_preview = analysis.text_preview(preview_chars);
        let report = analysis.report;
        AnalyzeResponse {
            url: analysis.url,
            final_url: analysis.final_url,
            encoding: analysis.encoding.to_string(),
            chart_kind: report.chart.kind,
            title: report.chart.title,
            top_words_text: analysis::format_top_words(&report.top_words),
            top_words: report.top_words,
            chart: report.chart.artifact,
            token_count: report.frequencies.total(),
            unique_words: report.frequencies.len(),
            text_preview,
            degradations: analysis.degradations,
            analyzed_at: Utc::now(),
        }
    }
}

#[derive(Serialize)]
pub struct ChartKindInfo {
    pub kind: ChartKind,
    pub name: &'static str,
    /// Whether the artifact is HTML to embed rather than a figure.
    pub embeds_html: bool,
}

impl From<ChartKind> for ChartKindInfo {
    fn from(kind: ChartKind) -> Self {
        ChartKindInfo {
            kind,
            name: kind.display_name(),
            embeds_html: kind == ChartKind::WordCloud,
        }
    }
}
