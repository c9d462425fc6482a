/*! Corpus post-processing

Transformations applied to sentence record files once they have been parsed, annotated and
translated.
!*/
pub mod parallel_docs;
pub mod resegment;

pub use parallel_docs::ParallelDocs;
pub use resegment::{Resegment, NOT_PARALLEL};
