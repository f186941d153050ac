use triage_core::types::{ReasonerAnswer, RetrievalResult};
use triage_pipeline::context::format_context;
use triage_pipeline::reasoner::{parse_answer, user_prompt};

#[test]
fn well_formed_json_parses() {
    let raw = r#"{
        "patient_symptoms": ["baş ağrısı", "mide bulantısı"],
        "departments": ["Nöroloji"],
        "symptoms_to_ask": ["ışığa hassasiyet"],
        "disease_probabilities": [{"disease": "Migren", "probability": 0.82}],
        "explanation": "Belirtiler migren ile uyumlu."
    }"#;
    match parse_answer(raw) {
        ReasonerAnswer::Parsed(d) => {
            assert_eq!(d.patient_symptoms, vec!["baş ağrısı", "mide bulantısı"]);
            assert_eq!(d.departments, vec!["Nöroloji"]);
            assert_eq!(d.disease_probabilities[0].disease, "Migren");
            assert!((d.disease_probabilities[0].probability - 0.82).abs() < 1e-6);
        }
        ReasonerAnswer::Unparsed(_) => panic!("expected parsed answer"),
    }
}

#[test]
fn single_quoted_json_parses_after_repair() {
    let raw =
        "{'patient_symptoms': ['öksürük'], 'departments': ['Göğüs Hastalıkları'], 'explanation': 'test'}";
    match parse_answer(raw) {
        ReasonerAnswer::Parsed(d) => {
            assert_eq!(d.patient_symptoms, vec!["öksürük"]);
            // Missing fields default to empty
            assert!(d.symptoms_to_ask.is_empty());
            assert!(d.disease_probabilities.is_empty());
        }
        ReasonerAnswer::Unparsed(_) => panic!("repair step should have fixed the quotes"),
    }
}

#[test]
fn unreparable_text_degrades_to_raw_string() {
    let raw = "Verilen veri tabanında uygun hastalık bulunamadı";
    match parse_answer(raw) {
        ReasonerAnswer::Unparsed(text) => assert_eq!(text, raw),
        ReasonerAnswer::Parsed(_) => panic!("plain prose should not parse"),
    }
}

#[test]
fn symptoms_to_ask_is_capped_at_ten() {
    let many: Vec<String> = (0..15).map(|i| format!("belirti {i}")).collect();
    let raw = serde_json::json!({ "symptoms_to_ask": many }).to_string();
    match parse_answer(&raw) {
        ReasonerAnswer::Parsed(d) => assert_eq!(d.symptoms_to_ask.len(), 10),
        ReasonerAnswer::Unparsed(_) => panic!("expected parsed answer"),
    }
}

#[test]
fn context_block_renders_rank_disease_department_and_score() {
    let docs = vec![RetrievalResult {
        text: "baş ağrısı, mide bulantısı".to_string(),
        disease: "Migren".to_string(),
        department: "Nöroloji".to_string(),
        similarity: 0.9,
        overlap: 1.0,
        final_score: 0.93,
    }];
    let rendered = format_context(&docs);
    assert!(rendered.starts_with("1. Hastalık: Migren"));
    assert!(rendered.contains("Bölüm: Nöroloji"));
    assert!(rendered.contains("Belirtiler: baş ağrısı, mide bulantısı"));
    assert!(rendered.contains("Score: 0.930"));

    let prompt = user_prompt(&rendered, "baş ağrısı, mide bulantısı");
    assert!(prompt.starts_with("Veri tabanı kayıtları:\n1. Hastalık"));
    assert!(prompt.ends_with("Kullanıcının belirtileri: baş ağrısı, mide bulantısı"));
}
