//! Confidence gate over the ranked retrieval list.

use triage_core::types::RetrievalResult;

/// Skip follow-up questions iff the list is non-empty, the leader
/// clears the threshold, and every competitor stays below it. Two
/// results both above the threshold signal genuine ambiguity that
/// additional questions should resolve.
pub fn decide(results: &[RetrievalResult], threshold: f32) -> bool {
    let Some((top, rest)) = results.split_first() else {
        return false;
    };
    top.final_score > threshold && rest.iter().all(|r| r.final_score < threshold)
}
