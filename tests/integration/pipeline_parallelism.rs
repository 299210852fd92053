//! The digest pipeline must produce the same values for any worker count and
//! distribution strategy.

use super::test_utils::Fixture;
use chkdigest::enumerate::enumerate;
use chkdigest::pipeline::pool::Strategy;
use chkdigest::pipeline::{compute_digests, DigestPipeline, PipelineConfig};
use std::collections::BTreeMap;

fn populate(fx: &Fixture, count: usize) {
    for i in 0..count {
        let body = "x".repeat(i * 37 % 5000);
        fx.write(&format!("dir{}/file{:03}.bin", i % 4, i), &body);
    }
}

fn as_map(config: &PipelineConfig, fx: &Fixture) -> BTreeMap<String, String> {
    let paths = enumerate(&fx.pattern("**/*.bin"), None).unwrap();
    compute_digests(paths, config)
        .unwrap()
        .iter()
        .map(|d| (d.path.clone(), d.digest.clone()))
        .collect()
}

#[test]
fn test_worker_counts_and_strategies_agree() {
    let fx = Fixture::new();
    populate(&fx, 53);

    let baseline = as_map(
        &PipelineConfig {
            parallelism: 1,
            ..PipelineConfig::default()
        },
        &fx,
    );
    assert_eq!(baseline.len(), 53);

    for strategy in [Strategy::Sharded, Strategy::Queue] {
        for parallelism in [1, 2, 4, 7] {
            for channel_capacity in [0, 16] {
                let config = PipelineConfig {
                    parallelism,
                    strategy,
                    channel_capacity,
                    ..PipelineConfig::default()
                };
                assert_eq!(
                    as_map(&config, &fx),
                    baseline,
                    "strategy={:?} parallelism={} capacity={}",
                    strategy,
                    parallelism,
                    channel_capacity
                );
            }
        }
    }
}

#[test]
fn test_more_workers_than_files() {
    let fx = Fixture::new();
    populate(&fx, 3);
    let config = PipelineConfig {
        parallelism: 32,
        ..PipelineConfig::default()
    };
    assert_eq!(as_map(&config, &fx).len(), 3);
}

#[test]
fn test_each_file_reported_once() {
    let fx = Fixture::new();
    populate(&fx, 40);
    let paths = enumerate(&fx.pattern("**/*"), None).unwrap();
    let run = DigestPipeline::new(&PipelineConfig {
        parallelism: 4,
        ..PipelineConfig::default()
    })
    .run(paths)
    .unwrap();

    assert_eq!(run.digests.len(), 40);
    assert_eq!(run.skipped, 4);
    let mut seen: Vec<&str> = run.digests.iter().map(|d| d.path.as_str()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 40);
}
