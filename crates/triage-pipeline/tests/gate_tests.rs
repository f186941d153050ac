use triage_core::types::RetrievalResult;
use triage_pipeline::gate::decide;

fn result(final_score: f32) -> RetrievalResult {
    RetrievalResult {
        text: "baş ağrısı".to_string(),
        disease: "Migren".to_string(),
        department: "Nöroloji".to_string(),
        similarity: 0.5,
        overlap: 0.5,
        final_score,
    }
}

fn results(scores: &[f32]) -> Vec<RetrievalResult> {
    scores.iter().map(|s| result(*s)).collect()
}

#[test]
fn strong_leader_with_clear_margin_skips_questions() {
    assert!(decide(&results(&[0.8, 0.5, 0.3]), 0.7));
}

#[test]
fn two_leaders_above_threshold_is_ambiguity() {
    assert!(!decide(&results(&[0.75, 0.72]), 0.7));
}

#[test]
fn empty_list_never_skips() {
    assert!(!decide(&results(&[]), 0.7));
}

#[test]
fn single_strong_result_skips() {
    assert!(decide(&results(&[0.9]), 0.7));
}

#[test]
fn leader_exactly_at_threshold_does_not_skip() {
    assert!(!decide(&results(&[0.7, 0.2]), 0.7));
}

#[test]
fn competitor_exactly_at_threshold_does_not_skip() {
    assert!(!decide(&results(&[0.9, 0.7]), 0.7));
}
