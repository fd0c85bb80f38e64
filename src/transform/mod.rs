//! Pivot resolution and the selection transform operator.

pub mod anchor;
pub mod operator;
