//! Rendering of retrieval results into the reasoner's context block.

use std::fmt::Write as _;

use triage_core::types::RetrievalResult;

/// One numbered line group per candidate, in rank order. The reasoner
/// is instructed to reuse the printed `Score` values verbatim for its
/// probability estimates.
pub fn format_context(docs: &[RetrievalResult]) -> String {
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{}. Hastalık: {}\nBölüm: {}\nBelirtiler: {}\nScore: {:.3}",
            i + 1,
            doc.disease,
            doc.department,
            doc.text,
            doc.final_score
        );
    }
    out
}
