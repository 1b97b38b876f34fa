//! Utility types and functions

pub mod detection;

pub use detection::{iou, BoundingBox, Candidate};
