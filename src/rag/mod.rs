//! Retrieval-augmented answer generation.
//!
//! The pipeline has three components, in dependency order:
//!
//! 1. A query encoder embeds the raw query text
//!    ([`crate::embedding::QueryEncoder`]).
//! 2. [`retriever::Retriever`] runs a nearest-neighbor search against the
//!    vector index and returns ranked candidate chunks.
//! 3. [`synthesizer::Synthesizer`] assembles a grounded prompt from the
//!    candidates, calls the completion backend, and derives the
//!    deduplicated source list.
//!
//! [`pipeline::RagPipeline`] wires the three together with constructor
//! injection; there is no module-level client state, so tests substitute
//! fakes without touching globals. Components execute sequentially: each
//! step depends on the previous step's output.

pub mod pipeline;
pub mod retriever;
pub mod synthesizer;

pub use pipeline::RagPipeline;
pub use retriever::{cosine_similarity, Retriever, RetrieverConfig};
pub use synthesizer::{is_no_answer, Synthesizer, SynthesizerConfig, NO_ANSWER};
