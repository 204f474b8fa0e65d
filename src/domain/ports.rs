use super::record::NormalizedAddress;
use crate::error::Result;
use async_trait::async_trait;

/// Turns a free-form address into its standardized postal form.
///
/// Implementations own any timeout or retry policy. A failure is reported as an error and the
/// caller keeps no partial data from it.
#[async_trait]
pub trait AddressNormalizer: Send + Sync {
    async fn normalize(&self, raw_address: &str) -> Result<NormalizedAddress>;
}

pub type AddressNormalizerBox = Box<dyn AddressNormalizer>;
