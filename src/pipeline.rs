//! End-to-end analysis: URL → page → visible text → tokens → counts →
//! ranking → chart.

use reqwest::Client;

use crate::analysis::{self, FrequencyMap, RankedSeries, TopWord};
use crate::charts::{self, RenderedChart};
use crate::config::Config;
use crate::error::{Degradation, Result};
use crate::scraper::{self, PlainText};

/// Counting, ranking and chart output for a block of plain text.
#[derive(Debug, Clone)]
pub struct WordReport {
    pub frequencies: FrequencyMap,
    /// Symbol-free top list.
    pub top: RankedSeries,
    pub top_words: Vec<TopWord>,
    /// The series the chart was drawn from: `top` plus the unfiltered remainder.
    pub chart_series: RankedSeries,
    pub chart: RenderedChart,
}

impl WordReport {
    pub fn token_count(&self) -> usize {
        self.frequencies.total()
    }
}

pub fn analyze_text(text: &str, chart_kind: &str, top_n: usize) -> WordReport {
    let tokens = analysis::tokenize(text);
    let frequencies = FrequencyMap::count(&tokens);
    log::debug!("{} tokens, {} distinct words", tokens.len(), frequencies.len());

    let top = analysis::select_top(&frequencies, top_n);
    let chart_series = analysis::merge_remainder(&top, &frequencies, top_n);
    let chart = charts::render_requested(chart_series.clone(), chart_kind);

    WordReport {
        top_words: analysis::top_words(&top),
        frequencies,
        top,
        chart_series,
        chart,
    }
}

#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub url: String,
    pub final_url: String,
    pub encoding: &'static str,
    pub text: PlainText,
    pub report: WordReport,
    pub degradations: Vec<Degradation>,
}

impl PageAnalysis {
    /// Leading part of the extracted text, cut on a character boundary.
    pub fn text_preview(&self, max_chars: usize) -> String {
        self.text.text.chars().take(max_chars).collect()
    }
}

/// Runs the whole pipeline for one URL. A fetch failure stops it before any
/// text processing happens.
pub async fn analyze_page(
    client: &Client,
    config: &Config,
    url: &str,
    chart_kind: &str,
) -> Result<PageAnalysis> {
    let page = scraper::fetch_page(client, url).await?;
    log::info!(
        "Fetched {} ({} bytes, {})",
        page.final_url,
        page.bytes.len(),
        page.encoding.name()
    );

    let text = scraper::extract_text(&page.decode());
    let mut degradations = Vec::new();
    if text.parse_errors > 0 {
        degradations.push(Degradation::ParseDegraded {
            error_count: text.parse_errors,
        });
    }

    let report = analyze_text(&text.text, chart_kind, config.top_n);
    if let Some(degradation) = report.chart.degradation.clone() {
        degradations.push(degradation);
    }

    Ok(PageAnalysis {
        url: page.url,
        final_url: page.final_url,
        encoding: page.encoding.name(),
        text,
        report,
        degradations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use crate::error::{AppError, FetchError};

    #[test]
    fn text_report_covers_list_and_chart() {
        let report = analyze_text("cat dog cat bird dog cat", "bar", 3);
        assert_eq!(report.token_count(), 6);
        assert_eq!(report.top.labels(), vec!["cat", "dog", "bird"]);
        assert_eq!(report.chart.kind, Some(ChartKind::Bar));
        assert_eq!(
            analysis::format_top_words(&report.top_words),
            "1. cat: 3\n2. dog: 2\n3. bird: 1"
        );
    }

    #[test]
    fn chart_series_extends_past_the_cut() {
        let report = analyze_text("aa aa aa bb bb cc dd", "pie", 2);
        assert_eq!(report.top.labels(), vec!["aa", "bb"]);
        assert_eq!(report.chart_series.labels(), vec!["aa", "bb", "cc", "dd"]);
    }

    #[tokio::test]
    async fn fetch_failure_stops_the_pipeline() {
        let config = Config::default();
        let client = scraper::build_client(&config).unwrap();

        let err = analyze_page(&client, &config, "http://127.0.0.1:1/", "bar")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));

        let err = analyze_page(&client, &config, "mailto:someone@example.com", "bar")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Fetch(FetchError::InvalidUrl { .. })));
    }
}
