/*! # wikialign

Builds sentence-level parallel corpora out of extracted encyclopedia dumps.

- [pipelines::ParseDocuments] turns dump files into sentence records, optionally routing
  articles depending on whether they exist in another language.
- [urls::TitleUrlIndex] adds the url of the foreign article to sentence records.
- [align::AlignmentMatcher] finds parsed sentences that belong to existing alignments.
- [translation::BatchTranslator] machine-translates sentences in chunks.
- [processing] holds post-processing steps (re-segmentation, document pairs).
!*/
pub mod align;
pub mod dump;
pub mod error;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod records;
pub mod resolve;
pub mod segment;
pub mod translation;
pub mod urls;
