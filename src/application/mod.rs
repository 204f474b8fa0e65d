//! Application layer orchestrating a processing run.
//!
//! [`pipeline::BatchPipeline`] takes pending records from a
//! [`RecordQueue`](crate::domain::queue::RecordQueue) in small fixed windows, normalizes them
//! concurrently and encodes their payloads. The queue stays owned by the caller.

pub mod pipeline;
