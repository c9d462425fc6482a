//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait and the document parsing pipeline,
//! which turns a directory of dumps into sentence record files.
pub mod parse;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use parse::{NoLookup, OnError, ParseDocuments, ParseSummary};
pub use pipeline::Pipeline;
