//! Small shared helpers with no pipeline knowledge.

pub mod hash;
pub mod path;
