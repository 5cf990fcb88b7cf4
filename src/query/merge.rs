use crate::types::SearchResult;

/// Combine per-shard results into one ranking.
///
/// Hits are concatenated and sorted by descending score (ties in no
/// particular order), `max_score` is the first hit's score and `hit_number`
/// the sum of the shards' match counts. `duration` is left for the caller.
pub fn merge_results(query: &str, results: Vec<SearchResult>) -> SearchResult {
    let mut merged = SearchResult {
        query: query.to_string(),
        ..SearchResult::default()
    };
    for result in results {
        merged.hit_number += result.hit_number;
        merged.hits.extend(result.hits);
    }
    merged.hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.max_score = merged.hits.first().map(|h| h.score).unwrap_or(0.0);
    merged
}

/// Keep the page `[from, from + limit)` of the ranked hits; `limit == 0` keeps
/// everything after `from`.
pub fn paginate(result: &mut SearchResult, from: usize, limit: usize) {
    let hits = std::mem::take(&mut result.hits);
    let page = hits.into_iter().skip(from);
    result.hits = if limit == 0 {
        page.collect()
    } else {
        page.take(limit).collect()
    };
}
