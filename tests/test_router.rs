use shardwise::index::router::{partition, shard_of};
use uuid::Uuid;

#[test]
fn uuid_ids_spread_evenly_over_four_shards() {
    const TOTAL: usize = 1_000_000;
    const SHARDS: usize = 4;

    let mut counts = [0usize; SHARDS];
    for _ in 0..TOTAL {
        let id = Uuid::new_v4().to_string();
        counts[shard_of(SHARDS, &id)] += 1;
    }

    assert_eq!(counts.iter().sum::<usize>(), TOTAL);
    let expected = TOTAL / SHARDS;
    for (shard, count) in counts.iter().enumerate() {
        let deviation = (*count as f64 - expected as f64).abs() / expected as f64;
        assert!(
            deviation < 0.02,
            "shard {} received {} of {} ids",
            shard,
            count,
            TOTAL
        );
    }
}

#[test]
fn partition_matches_shard_of() {
    let ids: Vec<String> = (0..1_000).map(|i| format!("sku-{:05}", i)).collect();
    let buckets = partition(7, ids.clone(), |id| id.as_str());

    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets.iter().map(Vec::len).sum::<usize>(), ids.len());
    for (shard, bucket) in buckets.iter().enumerate() {
        for id in bucket {
            assert_eq!(shard_of(7, id), shard);
        }
    }
}
