//! triage-text
//!
//! Turkish text normalization, token overlap, and dictionary-based
//! symptom extraction. Lemmatization is delegated to an external
//! morphological analysis service behind the `Lemmatizer` trait.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod extract;
pub mod normalize;
pub mod zemberek;

pub use extract::SymptomExtractor;
pub use normalize::{lemma_tokens, normalize, token_overlap, turkish_lowercase};
pub use zemberek::ZemberekClient;
