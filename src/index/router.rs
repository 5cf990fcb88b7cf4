use std::hash::Hasher;
use twox_hash::XxHash64;

/// xxHash64 (seed 0) of the raw id bytes.
pub fn hash_id(id: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(id.as_bytes());
    hasher.finish()
}

/// Shard owning `id` among `shard_count` shards. `shard_count` must be non-zero.
pub fn shard_of(shard_count: usize, id: &str) -> usize {
    (hash_id(id) % shard_count as u64) as usize
}

/// Group `items` by owning shard. Returns one bucket per shard, each keeping
/// the input order.
pub fn partition<T, F>(shard_count: usize, items: impl IntoIterator<Item = T>, id_of: F) -> Vec<Vec<T>>
where
    F: Fn(&T) -> &str,
{
    let mut buckets: Vec<Vec<T>> = (0..shard_count).map(|_| Vec::new()).collect();
    for item in items {
        let shard = shard_of(shard_count, id_of(&item));
        buckets[shard].push(item);
    }
    buckets
}
