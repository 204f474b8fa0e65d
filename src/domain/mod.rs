//! Domain types and rules: payload encoding, address records and their queue, and the port
//! through which addresses are normalized.

pub mod config;
pub mod imb;
pub mod ports;
pub mod queue;
pub mod record;
pub mod service_type;
