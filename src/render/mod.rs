//! Placement geometry and the interactive software render paths.

pub mod placement;
pub mod preview;
pub mod scene;
pub mod surface;
