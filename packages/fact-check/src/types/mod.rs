//! Data types shared across the pipeline.

pub mod claim;
pub mod config;
pub mod evidence;
pub mod verdict;
