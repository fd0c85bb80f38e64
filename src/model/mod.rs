//! Frame and project data model.

pub mod frame;
pub mod project;
