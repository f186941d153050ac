//! triage-index
//!
//! Similarity index over the corpus embeddings. The production
//! implementation is a LanceDB table written offline by
//! `triage-indexer` and queried read-only at request time; a
//! brute-force in-memory index backs tests and small corpora.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod memory;
pub mod schema;
pub mod search;
pub mod writer;

pub use memory::FlatMemoryIndex;
pub use search::LanceVectorIndex;
pub use writer::{LanceIndexWriter, SourceRecord};
