//! Canonical token sets for overlap scoring.
//!
//! Pipeline: lemmatize -> lowercase (Turkish-aware) -> strip everything
//! outside the Turkish alphabet -> drop empties and stopwords.

use std::collections::BTreeSet;

use triage_core::error::{Error, Result, Stage};
use triage_core::traits::Lemmatizer;

/// Lowercase with the dotted/dotless i pair handled up front.
/// `str::to_lowercase` maps 'İ' to "i\u{307}" (i + combining dot),
/// which would defeat plain substring matching.
pub fn turkish_lowercase(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'İ' => out.push('i'),
            'I' => out.push('ı'),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

fn is_turkish_letter(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, 'ç' | 'ğ' | 'ı' | 'ö' | 'ş' | 'ü')
}

/// Keep only letters of the (lowercased) Turkish alphabet. Digits and
/// punctuation disappear here.
fn strip_to_alphabet(token: &str) -> String {
    token.chars().filter(|c| is_turkish_letter(*c)).collect()
}

/// Ordered lemma tokens for `text`: lowercased, alphabet-stripped,
/// empties and stopwords removed. Word order is preserved and
/// duplicates are kept; set views are derived by the callers that
/// need them.
///
/// An unreachable lemmatizer is an error, never an empty result —
/// an empty set here would silently corrupt every downstream score.
pub fn lemma_tokens(
    lemmatizer: &dyn Lemmatizer,
    text: &str,
    stopwords: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let lemmas = lemmatizer
        .lemmas(text)
        .map_err(|e| Error::unavailable(Stage::Lemmatization, e))?;
    Ok(lemmas
        .iter()
        .map(|lemma| strip_to_alphabet(&turkish_lowercase(lemma)))
        .filter(|token| !token.is_empty() && !stopwords.contains(token))
        .collect())
}

/// `normalize(text) -> Set<token>` per the normalizer contract.
pub fn normalize(
    lemmatizer: &dyn Lemmatizer,
    text: &str,
    stopwords: &BTreeSet<String>,
) -> Result<BTreeSet<String>> {
    Ok(lemma_tokens(lemmatizer, text, stopwords)?.into_iter().collect())
}

/// Asymmetric token overlap: fraction of the query's tokens present in
/// the document's tokens. Always in `[0, 1]`; `1.0` for a non-empty
/// query against itself.
pub fn token_overlap(query: &BTreeSet<String>, doc: &BTreeSet<String>) -> f32 {
    let shared = query.intersection(doc).count();
    shared as f32 / query.len().max(1) as f32
}
