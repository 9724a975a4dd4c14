use candle_core::{DType, Device, Tensor};
use newsdb_embed::{get_default_embedder, masked_mean_l2, Embedder, FakeEmbedder, EMBEDDING_DIM};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading the model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    let texts = vec!["apple unveils new chip".to_string(), "apple unveils new chip".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), EMBEDDING_DIM);
    assert_eq!(embedder.dim(), EMBEDDING_DIM);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_query_matches_batch() {
    let embedder = FakeEmbedder::new(16);
    let q = embedder.embed_query("football final").expect("query");
    let b = embedder.embed_batch(&["football final".to_string()]).expect("batch");
    assert_eq!(q, b[0]);
    assert!(embedder.embed_query("   ").expect("blank").iter().all(|x| *x == 0.0));
}

#[test]
fn masked_mean_l2_ignores_padding() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is masked out.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0,
                                 5.0, 6.0, 7.0, 8.0],
                               (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0u32], (1, 2), &dev).unwrap()
        .to_dtype(DType::F32).unwrap();
    let out = masked_mean_l2(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    let norm: f32 = (1.0f32 + 4.0 + 9.0 + 16.0).sqrt();
    let expected = [1.0 / norm, 2.0 / norm, 3.0 / norm, 4.0 / norm];
    for (a, b) in v[0].iter().cloned().zip(expected) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_l2_rejects_mismatched_mask() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((1, 3, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((1, 2), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}

#[test]
#[ignore] // needs the model files under APP_MODEL_DIR
fn bert_embedder_produces_384_dims() {
    std::env::remove_var("APP_USE_FAKE_EMBEDDINGS");
    let embedder = newsdb_embed::BertEmbedder::new().expect("model");
    let v = embedder.embed_query("Tell me about Apple").expect("embed");
    assert_eq!(v.len(), 384);
}
