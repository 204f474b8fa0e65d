//! Adapters for the address normalizer port.

pub mod gemini;
pub mod in_memory;
