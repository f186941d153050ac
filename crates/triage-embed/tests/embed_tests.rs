use triage_core::traits::Embedder;
use triage_embed::get_default_embedder;

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading the real checkpoint
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(768).expect("embedder");
    assert_eq!(embedder.dim(), 768);

    let v1 = embedder.embed("baş ağrısı, mide bulantısı").expect("embed");
    let v2 = embedder.embed("baş ağrısı, mide bulantısı").expect("embed");
    assert_eq!(v1.len(), 768);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }

    // Different input lands on a different vector
    let v3 = embedder.embed("öksürük, ateş").expect("embed");
    assert!(v1.iter().zip(v3.iter()).any(|(a, b)| (a - b).abs() > 1e-6));
}
