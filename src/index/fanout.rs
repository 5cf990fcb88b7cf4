use crate::error::{Result, ShardwiseError};
use tokio::task::JoinSet;

/// Run every task on the blocking pool concurrently and wait for all of them.
///
/// Results come back in task order. If any task fails, the error of the
/// lowest-numbered failing task is returned, but only after every task has
/// finished; siblings are never cancelled and their effects are not undone.
pub async fn join_all<T, F, I>(tasks: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut join_set = JoinSet::new();
    for (i, task) in tasks.into_iter().enumerate() {
        join_set.spawn_blocking(move || (i, task()));
    }

    let mut indexed_results: Vec<(usize, T)> = Vec::with_capacity(join_set.len());
    let mut first_error: Option<(usize, ShardwiseError)> = None;
    while let Some(join_result) = join_set.join_next().await {
        let (i, outcome) = match join_result {
            Ok(pair) => pair,
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some((usize::MAX, e.into()));
                }
                continue;
            }
        };
        match outcome {
            Ok(value) => indexed_results.push((i, value)),
            Err(e) => {
                if first_error.as_ref().map_or(true, |(j, _)| i < *j) {
                    first_error = Some((i, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_error {
        return Err(e);
    }
    indexed_results.sort_by_key(|(i, _)| *i);
    Ok(indexed_results.into_iter().map(|(_, v)| v).collect())
}
