//! Word-frequency analysis: tokenizing plain text, counting, and ranking.

use serde::Serialize;
use std::collections::HashMap;

/// Default length of the ranked top list.
pub const DEFAULT_TOP_N: usize = 20;

/// Splits text into countable words.
///
/// ASCII punctuation is removed first (so `don't` becomes `dont`), the rest is
/// split on whitespace, and anything shorter than two characters is dropped.
/// Token order follows the input; ranking relies on it for ties.
pub fn tokenize(text: &str) -> Vec<String> {
    let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    stripped
        .split_whitespace()
        .filter(|word| word.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Word counts that remember the order in which each word was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyMap {
    pub fn count<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = FrequencyMap::default();
        for token in tokens {
            map.add(token.as_ref());
        }
        map
    }

    pub fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), 1));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).map(|&slot| self.entries[slot].1)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of tokens that were counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// All entries by descending count; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// A chart-ready point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: usize,
}

/// Ordered (label, value) pairs handed to the chart renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedSeries {
    points: Vec<SeriesPoint>,
}

impl RankedSeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn max_value(&self) -> usize {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.points.iter().any(|p| p.label == label)
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for RankedSeries {
    fn from_iter<T: IntoIterator<Item = (S, usize)>>(iter: T) -> Self {
        RankedSeries {
            points: iter
                .into_iter()
                .map(|(label, value)| SeriesPoint {
                    label: label.into(),
                    value,
                })
                .collect(),
        }
    }
}

/// Letters (including combining vowel signs) and digits only.
fn is_alphanumeric_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphanumeric)
}

/// The `top_n` most frequent words made only of letters and digits.
///
/// Words with leftover symbols stay in the map but never reach this list.
pub fn select_top(freqs: &FrequencyMap, top_n: usize) -> RankedSeries {
    freqs
        .ranked()
        .into_iter()
        .filter(|(word, _)| is_alphanumeric_word(word))
        .take(top_n)
        .collect()
}

/// Chart data: the filtered top list followed by everything the *unfiltered*
/// ranking places after position `top_n`.
///
/// The two populations differ on purpose: symbol-bearing words below the cut
/// are charted even though they are kept out of the top list, while those
/// above the cut are dropped from both. Words already present in `top` are not
/// repeated.
pub fn merge_remainder(top: &RankedSeries, freqs: &FrequencyMap, top_n: usize) -> RankedSeries {
    let mut merged = top.clone();
    for (word, count) in freqs.ranked().into_iter().skip(top_n) {
        if !top.contains(word) {
            merged.points.push(SeriesPoint {
                label: word.to_string(),
                value: count,
            });
        }
    }
    merged
}

/// One line of the textual top list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopWord {
    /// 1-indexed.
    pub rank: usize,
    pub word: String,
    pub count: usize,
}

pub fn top_words(series: &RankedSeries) -> Vec<TopWord> {
    series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| TopWord {
            rank: i + 1,
            word: point.label.clone(),
            count: point.value,
        })
        .collect()
}

/// Renders `1. word: count` lines.
pub fn format_top_words(words: &[TopWord]) -> String {
    words
        .iter()
        .map(|w| format!("{}. {}: {}", w.rank, w.word, w.count))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_ranks_simple_text() {
        let freqs = FrequencyMap::count(tokenize("cat dog cat bird dog cat"));
        assert_eq!(freqs.get("cat"), Some(3));
        assert_eq!(freqs.get("dog"), Some(2));
        assert_eq!(freqs.get("bird"), Some(1));
        assert_eq!(freqs.len(), 3);

        let top = select_top(&freqs, 3);
        let expected: RankedSeries = vec![("cat", 3), ("dog", 2), ("bird", 1)].into_iter().collect();
        assert_eq!(top, expected);
    }

    #[test]
    fn strips_punctuation_and_short_tokens() {
        let tokens = tokenize("Don't panic! A b, c. 42 is (the) answer; x-ray?");
        assert_eq!(tokens, vec!["Dont", "panic", "42", "is", "the", "answer", "xray"]);
    }

    #[test]
    fn no_short_token_reaches_the_map() {
        let freqs = FrequencyMap::count(tokenize("a . , I ok é? 1 22 ; x"));
        assert!(freqs.iter().all(|(word, _)| word.chars().count() >= 2));
        assert_eq!(freqs.total(), 2);
    }

    #[test]
    fn tokenizing_is_repeatable() {
        let text = "the quick brown fox, the lazy dog; the end.";
        assert_eq!(tokenize(text), tokenize(text));
        assert_eq!(FrequencyMap::count(tokenize(text)), FrequencyMap::count(tokenize(text)));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let freqs = FrequencyMap::count(tokenize("pear apple plum apple pear fig plum"));
        let top = select_top(&freqs, 10);
        assert_eq!(top.labels(), vec!["pear", "apple", "plum", "fig"]);
    }

    #[test]
    fn ranked_values_never_increase() {
        let text = "one two two three three three four four four four five six six";
        let top = select_top(&FrequencyMap::count(tokenize(text)), 20);
        let values = top.values();
        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(top.len(), 6);
    }

    #[test]
    fn top_list_excludes_symbol_bearing_words() {
        let freqs = FrequencyMap::count(tokenize("“quoted” “quoted” plain €uro plain word"));
        assert_eq!(freqs.get("“quoted”"), Some(2));

        let top = select_top(&freqs, 20);
        assert!(top.labels().iter().all(|w| w.chars().all(char::is_alphanumeric)));
        assert_eq!(top.labels(), vec!["plain", "word"]);
    }

    #[test]
    fn words_with_vowel_signs_count_as_alphanumeric() {
        let freqs = FrequencyMap::count(tokenize("हिंदी हिंदी भाषा €€"));
        let top = select_top(&freqs, 20);
        assert_eq!(top.labels(), vec!["हिंदी", "भाषा"]);
    }

    #[test]
    fn merge_appends_unfiltered_remainder() {
        let tokens = [
            "x—y", "x—y", "x—y", "x—y", "aa", "aa", "aa", "bb", "bb", "bb", "cc", "cc", "dd",
        ];
        let freqs = FrequencyMap::count(tokens);
        let top = select_top(&freqs, 2);
        assert_eq!(top.labels(), vec!["aa", "bb"]);

        let merged = merge_remainder(&top, &freqs, 2);
        assert_eq!(merged.labels(), vec!["aa", "bb", "cc", "dd"]);
        assert_eq!(merged.values(), vec![3, 3, 2, 1]);
    }

    #[test]
    fn merge_charts_symbols_below_the_cut() {
        let freqs = FrequencyMap::count(["aa", "aa", "bb", "(c)c", "dd"]);
        let top = select_top(&freqs, 1);
        let merged = merge_remainder(&top, &freqs, 1);
        assert_eq!(merged.labels(), vec!["aa", "bb", "(c)c", "dd"]);
    }

    #[test]
    fn formats_one_indexed_list() {
        let series: RankedSeries = vec![("cat", 3), ("dog", 2)].into_iter().collect();
        let words = top_words(&series);
        assert_eq!(words[0].rank, 1);
        assert_eq!(format_top_words(&words), "1. cat: 3\n2. dog: 2");
    }
}
