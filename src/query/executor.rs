use super::context::SearchContext;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::document::DocumentConverter;
use crate::types::{Hit, SearchResult};
use std::time::Instant;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::Query as TantivyQuery;
use tantivy::{DocAddress, Searcher, TantivyDocument};

/// Slice of the ranked matches to materialize; `limit == 0` means all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Window {
    pub fn new(offset: usize, limit: usize) -> Self {
        Window { offset, limit }
    }

    /// Matches `[0, from + limit)` so a caller can paginate across shards.
    pub fn prefix_of(config: &SearchConfig) -> Self {
        let limit = if config.limit == 0 {
            0
        } else {
            config.from.saturating_add(config.limit)
        };
        Window { offset: 0, limit }
    }
}

/// Whether `score` survives both thresholds of `config`. Thresholds of 0 are
/// disabled.
pub fn passes_thresholds(score: f32, max_score: f32, config: &SearchConfig) -> bool {
    if config.score_threshold > 0.0 && score < config.score_threshold {
        return false;
    }
    if config.max_score_percent_threshold > 0.0
        && score < max_score * (config.max_score_percent_threshold / 100.0)
    {
        return false;
    }
    true
}

/// Runs one compiled query on one searcher and converts matches into hits.
pub struct QueryExecutor<'a> {
    searcher: &'a Searcher,
    converter: &'a DocumentConverter,
    config: &'a SearchConfig,
    context: &'a SearchContext,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(
        searcher: &'a Searcher,
        converter: &'a DocumentConverter,
        config: &'a SearchConfig,
        context: &'a SearchContext,
    ) -> Self {
        QueryExecutor {
            searcher,
            converter,
            config,
            context,
        }
    }

    fn ranked(&self, query: &dyn TantivyQuery, window: Window) -> Result<(usize, Vec<(f32, DocAddress)>)> {
        if window.limit == 0 {
            let total = self.searcher.search(query, &Count)?;
            if total == 0 {
                return Ok((0, Vec::new()));
            }
            let top = self.searcher.search(query, &TopDocs::with_limit(total))?;
            return Ok((total, top));
        }
        // TopDocs preallocates `limit` slots; bound it by the shard size
        let num_docs = usize::try_from(self.searcher.num_docs()).unwrap_or(usize::MAX);
        let fetch = window.offset.saturating_add(window.limit).min(num_docs).max(1);
        Ok(self.searcher.search(query, &(Count, TopDocs::with_limit(fetch)))?)
    }

    pub fn execute(&self, query_text: &str, query: &dyn TantivyQuery, window: Window) -> Result<SearchResult> {
        let start = Instant::now();
        self.context.check()?;

        let (total, ranked) = self.ranked(query, window)?;
        self.context.check()?;

        let max_score = ranked.first().map(|(score, _)| *score).unwrap_or(0.0);
        let page: Vec<(f32, DocAddress)> = ranked
            .into_iter()
            .take_while(|(score, _)| passes_thresholds(*score, max_score, self.config))
            .skip(window.offset)
            .collect();

        let mut hits: Vec<Hit> = Vec::with_capacity(page.len());
        for (score, addr) in page {
            self.context.check()?;
            let doc: TantivyDocument = self.searcher.doc(addr)?;
            hits.push(
                self.converter
                    .hit_from_tantivy(&doc, score, &self.config.return_fields)?,
            );
        }

        Ok(SearchResult {
            hit_number: total as u64,
            max_score,
            duration: start.elapsed(),
            query: query_text.to_string(),
            hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kept(scores: &[f32], config: &SearchConfig) -> Vec<f32> {
        let max = scores.first().copied().unwrap_or(0.0);
        scores
            .iter()
            .copied()
            .take_while(|s| passes_thresholds(*s, max, config))
            .collect()
    }

    #[test]
    fn absolute_threshold_stops_at_first_failure() {
        let config = SearchConfig {
            score_threshold: 0.6,
            ..SearchConfig::default()
        };
        assert_eq!(kept(&[0.9, 0.7, 0.5], &config), vec![0.9, 0.7]);
    }

    #[test]
    fn percent_threshold_relative_to_max() {
        let config = SearchConfig {
            max_score_percent_threshold: 50.0,
            ..SearchConfig::default()
        };
        assert_eq!(kept(&[4.0, 2.5, 2.0, 1.9, 3.0], &config), vec![4.0, 2.5, 2.0]);
    }

    #[test]
    fn disabled_thresholds_keep_everything() {
        assert_eq!(kept(&[0.3, 0.01], &SearchConfig::default()), vec![0.3, 0.01]);
    }

    #[test]
    fn prefix_window() {
        let config = SearchConfig {
            from: 5,
            limit: 10,
            ..SearchConfig::default()
        };
        assert_eq!(Window::prefix_of(&config), Window::new(0, 15));
        assert_eq!(Window::prefix_of(&SearchConfig::default()), Window::new(0, 0));
    }
}
