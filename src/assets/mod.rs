//! Source image decoding and the owned read-through cache.

pub mod cache;
pub mod decode;
