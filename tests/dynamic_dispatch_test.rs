mod common;

use common::standardized;
use imb_architect::application::pipeline::BatchPipeline;
use imb_architect::domain::config::ImbConfig;
use imb_architect::domain::ports::AddressNormalizerBox;
use imb_architect::domain::queue::{ProcessingStatus, RecordQueue};
use imb_architect::infrastructure::in_memory::InMemoryNormalizer;

#[tokio::test]
async fn test_normalizer_as_trait_object() {
    let normalizer: AddressNormalizerBox = Box::new(InMemoryNormalizer::new().with_address(
        "1 main st",
        standardized("1 MAIN ST", "62701", "0001", "01"),
    ));

    // Verify Send + Sync by spawning a task
    let handle = tokio::spawn(async move { normalizer.normalize("1 main st").await.unwrap() });

    let address = handle.await.unwrap();
    assert_eq!(address.street, "1 MAIN ST");
}

#[tokio::test]
async fn test_pipeline_runs_in_spawned_task() {
    let normalizer = InMemoryNormalizer::new()
        .with_address("1 main st", standardized("1 MAIN ST", "62701", "0001", "01"));
    let pipeline = BatchPipeline::new(Box::new(normalizer), ImbConfig::default());

    let handle = tokio::spawn(async move {
        let mut queue = RecordQueue::new();
        queue.ingest(["1 main st", "2 main st"], 1);
        pipeline.run(&mut queue).await;
        queue
    });

    let queue = handle.await.unwrap();
    assert_eq!(queue.status(), ProcessingStatus::Completed);
    assert_eq!(
        queue.records()[0].imb_data.as_deref(),
        Some("0030012345600000000162701000101")
    );
}
