//! Batch NCD computation: cache, work partitioning, engine

pub mod cache;
pub mod ncd;
pub mod wavefront;

pub use cache::SizeCache;
pub use ncd::NcdEngine;
