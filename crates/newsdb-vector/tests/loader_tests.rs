use chrono::{TimeZone, Utc};
use newsdb_core::traits::ArticleStore;
use newsdb_core::types::ArticleRecord;
use newsdb_vector::{load_corpus, rank_by_similarity, MemoryArticleStore};

fn record(id: &str, day: Option<u32>, text: &str, embedding: Option<Vec<Option<f32>>>) -> ArticleRecord {
    ArticleRecord {
        id: id.to_string(),
        title: Some(format!("Title {id}")),
        text: Some(text.to_string()),
        category: Some("technology".to_string()),
        source: Some("Wire".to_string()),
        url: Some(format!("https://news.example/{id}")),
        published_at: day.and_then(|d| Utc.with_ymd_and_hms(2024, 6, d, 8, 0, 0).single()),
        scraped_at: None,
        embedding,
    }
}

#[tokio::test]
async fn memory_store_orders_newest_first_with_undated_last() {
    let store = MemoryArticleStore::new(vec![
        record("old", Some(1), "a", None),
        record("undated", None, "b", None),
        record("new", Some(20), "c", None),
        record("mid", Some(10), "d", None),
    ]);
    let ids: Vec<String> = store.fetch_recent(10).await.expect("fetch").into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["new", "mid", "old", "undated"]);
    assert_eq!(store.fetch_recent(2).await.expect("fetch").len(), 2);
    assert_eq!(store.count().await.expect("count"), 4);
}

#[tokio::test]
async fn memory_store_upserts_by_url() {
    let store = MemoryArticleStore::new(vec![record("1", Some(1), "first", None)]);
    let mut replacement = record("1b", Some(2), "second", None);
    replacement.url = Some("https://news.example/1".to_string());
    store.upsert(vec![replacement, record("2", Some(3), "other", None)]);
    let records = store.fetch_recent(10).await.expect("fetch");
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.id == "1b"));
    assert!(!records.iter().any(|r| r.id == "1"));
}

#[tokio::test]
async fn loader_keeps_documents_with_bad_vectors_out_of_the_cache() {
    let store = MemoryArticleStore::new(vec![
        record("good", Some(3), "body", Some(vec![Some(1.0), Some(0.0)])),
        record("null-element", Some(2), "body", Some(vec![Some(1.0), None])),
        record("empty-vector", Some(1), "body", Some(vec![])),
        record("no-vector", None, "body", None),
    ]);
    let corpus = load_corpus(&store, 1000).await.expect("load");
    assert_eq!(corpus.documents.len(), 4);
    assert_eq!(corpus.embeddings.len(), 1);
    assert!(corpus.embeddings.contains("good"));
    assert_eq!(corpus.malformed_vectors, 2);
    for id in corpus.embeddings.ids() {
        assert!(corpus.documents.iter().any(|d| d.id == id));
    }
}

#[tokio::test]
async fn loader_skips_blank_bodies_and_formats_content() {
    let store = MemoryArticleStore::new(vec![record("blank", Some(2), "   ", None), record("full", Some(1), "Body text", None)]);
    let corpus = load_corpus(&store, 1000).await.expect("load");
    assert_eq!(corpus.documents.len(), 1);
    let doc = &corpus.documents[0];
    assert_eq!(doc.published_date, "2024-06-01");
    assert_eq!(doc.content, "Title: Title full\nCategory: technology\nDate: 2024-06-01\nSource: Wire\nContent: Body text");
}

#[tokio::test]
async fn unreachable_store_is_an_error_for_the_loader() {
    let store = MemoryArticleStore::new(vec![record("a", Some(1), "x", None)]);
    store.set_offline(true);
    assert!(load_corpus(&store, 10).await.is_err());
    store.set_offline(false);
    assert_eq!(load_corpus(&store, 10).await.expect("load").documents.len(), 1);
}

#[tokio::test]
async fn mismatched_dimensions_are_absent_from_semantic_ranking() {
    let store = MemoryArticleStore::new(vec![
        record("aligned", Some(3), "x", Some(vec![Some(0.9), Some(0.1), Some(0.0)])),
        record("short", Some(2), "y", Some(vec![Some(1.0), Some(0.0)])),
        record("orthogonal", Some(1), "z", Some(vec![Some(0.0), Some(0.0), Some(1.0)])),
        record("bare", None, "w", None),
    ]);
    let corpus = load_corpus(&store, 1000).await.expect("load");
    let ranked = rank_by_similarity(&[1.0, 0.0, 0.0], &corpus.embeddings, &corpus.documents, 10);
    let ids: Vec<&str> = ranked.iter().map(|(p, _)| corpus.documents[*p].id.as_str()).collect();
    assert_eq!(ids, vec!["aligned", "orthogonal"]);
    assert!(ranked[0].1 > ranked[1].1);
    assert_eq!(rank_by_similarity(&[1.0, 0.0, 0.0], &corpus.embeddings, &corpus.documents, 1).len(), 1);
}

#[tokio::test]
async fn equal_similarity_is_ordered_by_id() {
    let v = Some(vec![Some(1.0), Some(1.0)]);
    let store = MemoryArticleStore::new(vec![
        record("c", Some(3), "x", v.clone()),
        record("a", Some(2), "x", v.clone()),
        record("b", Some(1), "x", v),
    ]);
    let corpus = load_corpus(&store, 1000).await.expect("load");
    let ranked = rank_by_similarity(&[2.0, 2.0], &corpus.embeddings, &corpus.documents, 3);
    let ids: Vec<&str> = ranked.iter().map(|(p, _)| corpus.documents[*p].id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn blank_rows_do_not_use_up_the_load_limit() {
    let store = MemoryArticleStore::new(vec![
        record("blank1", Some(9), "", None),
        record("blank2", Some(8), "  \n ", None),
        record("a", Some(3), "alpha", None),
        record("b", Some(2), "bravo", None),
        record("c", Some(1), "charlie", None),
    ]);
    let ids: Vec<String> = store.fetch_recent(2).await.expect("fetch").into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let corpus = load_corpus(&store, 2).await.expect("load");
    let ids: Vec<&str> = corpus.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn duplicate_ids_keep_the_newest_row_and_its_vector() {
    let mut older = record("dup", Some(1), "older body", Some(vec![Some(0.0), Some(1.0)]));
    older.url = Some("https://news.example/dup-old".to_string());
    older.title = Some("Older".to_string());
    let mut newer = record("dup", Some(5), "newer body", Some(vec![Some(1.0), Some(0.0)]));
    newer.url = Some("https://news.example/dup-new".to_string());
    newer.title = Some("Newer".to_string());
    let store = MemoryArticleStore::new(vec![older, newer, record("other", Some(3), "body", None)]);
    assert_eq!(store.count().await.expect("count"), 3);

    let corpus = load_corpus(&store, 1000).await.expect("load");
    let ids: Vec<&str> = corpus.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["dup", "other"]);
    assert_eq!(corpus.documents[0].title, "Newer");
    assert_eq!(corpus.documents[0].url, "https://news.example/dup-new");
    assert_eq!(corpus.embeddings.get("dup"), Some(&[1.0f32, 0.0][..]));
}
