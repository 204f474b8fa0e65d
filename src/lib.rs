//! Address standardization and Intelligent Mail Barcode payload generation.
//!
//! Raw addresses are read from a sheet, standardized one by one through an
//! [`AddressNormalizer`](domain::ports::AddressNormalizer), and turned into 31-digit IMB data
//! payloads by [`domain::imb::encode`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
