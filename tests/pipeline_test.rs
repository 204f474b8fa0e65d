mod common;

use common::standardized;
use imb_architect::application::pipeline::{BATCH_SIZE, BatchPipeline};
use imb_architect::domain::config::ImbConfig;
use imb_architect::domain::queue::{ProcessingStatus, RecordQueue};
use imb_architect::domain::record::RecordStatus;
use imb_architect::infrastructure::in_memory::InMemoryNormalizer;
use std::time::Duration;

fn seven_addresses() -> Vec<String> {
    (1..=7).map(|i| format!("{i} main st")).collect()
}

fn normalizer_for(addresses: &[String], failing: &[usize]) -> InMemoryNormalizer {
    addresses
        .iter()
        .enumerate()
        .filter(|(idx, _)| !failing.contains(idx))
        .fold(InMemoryNormalizer::new(), |normalizer, (idx, raw)| {
            normalizer.with_address(
                raw.clone(),
                standardized(&format!("{} MAIN ST", idx + 1), "62701", "0042", "07"),
            )
        })
        .with_latency(Duration::from_millis(10))
}

#[tokio::test]
async fn test_seven_records_processed_in_windows_of_three() {
    let addresses = seven_addresses();
    let normalizer = normalizer_for(&addresses, &[]);
    let probe = normalizer.clone();
    let pipeline = BatchPipeline::new(Box::new(normalizer), ImbConfig::default());

    let mut queue = RecordQueue::new();
    queue.ingest(addresses, 1);

    let mut pending_after_each_step = Vec::new();
    while queue.is_ready_for_batch() {
        assert_eq!(queue.status(), ProcessingStatus::Processing);
        let report = pipeline.run_once(&mut queue).await;
        assert!(report.completed <= BATCH_SIZE);
        assert_eq!(queue.count(RecordStatus::Processing), 0);
        pending_after_each_step.push(queue.count(RecordStatus::Pending));
    }

    assert_eq!(pending_after_each_step, vec![4, 1, 0]);
    assert_eq!(queue.status(), ProcessingStatus::Completed);
    assert_eq!(queue.count(RecordStatus::Completed), 7);
    assert_eq!(probe.calls(), 7);
    assert!(probe.max_in_flight() <= BATCH_SIZE);
    assert!(probe.max_in_flight() > 1, "calls within a window should overlap");
}

#[tokio::test]
async fn test_run_drives_queue_to_completion() {
    let addresses = seven_addresses();
    let pipeline = BatchPipeline::new(
        Box::new(normalizer_for(&addresses, &[1, 5])),
        ImbConfig::default(),
    );

    let mut queue = RecordQueue::new();
    queue.ingest(addresses, 1);
    let summary = pipeline.run(&mut queue).await;

    assert_eq!(summary.completed, 5);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.batches, 3);
    assert_eq!(queue.status(), ProcessingStatus::Completed);

    let failed = &queue.records()[1];
    assert_eq!(failed.status, RecordStatus::Error);
    assert_eq!(failed.original, "2 main st");
    assert!(failed.street.is_empty());
    assert!(failed.plus4.is_empty());
    assert!(failed.imb_data.is_none());
}

#[tokio::test]
async fn test_payloads_use_each_record_sequence_number() {
    let addresses = seven_addresses();
    let config = ImbConfig {
        mailer_id: "987654321".to_string(),
        ..ImbConfig::default()
    };
    let pipeline = BatchPipeline::new(Box::new(normalizer_for(&addresses, &[])), config);

    let mut queue = RecordQueue::new();
    queue.ingest(addresses, 999_998);
    pipeline.run(&mut queue).await;

    let payloads: Vec<&str> = queue
        .records()
        .iter()
        .map(|record| record.imb_data.as_deref().unwrap())
        .collect();
    assert_eq!(payloads[0], "0030098765432199999862701004207");
    // 1000000 overflows the 6-digit serial
    assert_eq!(payloads[2], "0030098765432100000062701004207");
    assert!(payloads.iter().all(|payload| payload.len() == 31));
}

#[tokio::test]
async fn test_reingest_mid_flight_replaces_queue() {
    let addresses = seven_addresses();
    let pipeline = BatchPipeline::new(
        Box::new(normalizer_for(&addresses, &[])),
        ImbConfig::default(),
    );

    let mut queue = RecordQueue::new();
    queue.ingest(addresses.clone(), 1);
    let old_ids: Vec<_> = queue.records().iter().map(|record| record.id).collect();

    let in_flight = pipeline.begin_batch(&mut queue);
    let outcomes = pipeline.normalize_batch(&in_flight).await;

    queue.ingest(addresses[..2].to_vec(), 500);
    let report = pipeline.finish_batch(&mut queue, outcomes);

    assert_eq!(report.discarded, 3);
    assert_eq!(queue.len(), 2);
    assert!(old_ids.iter().all(|id| queue.get(*id).is_none()));
    assert_eq!(queue.status(), ProcessingStatus::Processing);

    let summary = pipeline.run(&mut queue).await;
    assert_eq!(summary.completed, 2);
    let sequences: Vec<u64> = queue.records().iter().map(|r| r.sequence_number).collect();
    assert_eq!(sequences, vec![500, 501]);
}

#[tokio::test]
async fn test_run_on_empty_queue_is_noop() {
    let normalizer = InMemoryNormalizer::new();
    let probe = normalizer.clone();
    let pipeline = BatchPipeline::new(Box::new(normalizer), ImbConfig::default());
    let mut queue = RecordQueue::new();

    let summary = pipeline.run(&mut queue).await;

    assert_eq!(summary.batches, 0);
    assert_eq!(queue.status(), ProcessingStatus::Idle);
    assert_eq!(probe.calls(), 0);
}
