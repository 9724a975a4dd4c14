use figment::providers::{Format, Toml};
use figment::Figment;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use newsdb_core::category::{classify, latest_in_category, Category};
use newsdb_core::config::{resolve_with_base, Config, RetrievalSettings};
use newsdb_core::error::Error;
use newsdb_core::types::{ArticleRecord, Document};

#[test]
fn empty_config_yields_defaults() {
    let config = Config::from_figment(Figment::new());
    let settings = config.settings().expect("settings");
    assert_eq!(settings, RetrievalSettings::default());
    assert_eq!(settings.store.table, "articles");
    assert_eq!(settings.retrieval.load_limit, 1000);
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(settings.store_timeout(), Duration::from_secs(10));
    settings.validate().expect("defaults are valid");
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let figment = Figment::new().merge(Toml::string(
        r#"
        [store]
        uri = "/srv/news/lancedb"

        [retrieval]
        top_k = 5
        encoder_timeout_ms = 250
        "#,
    ));
    let settings = Config::from_figment(figment).settings().expect("settings");
    assert_eq!(settings.store.uri, "/srv/news/lancedb");
    assert_eq!(settings.store.table, "articles");
    assert_eq!(settings.retrieval.top_k, 5);
    assert_eq!(settings.retrieval.context_articles, 3);
    assert_eq!(settings.encoder_timeout(), Duration::from_millis(250));
    assert_eq!(settings.store_path(Path::new("/ignored")), Path::new("/srv/news/lancedb"));
}

#[test]
fn zero_top_k_is_rejected() {
    let figment = Figment::new().merge(Toml::string("[retrieval]\ntop_k = 0\n"));
    let settings = Config::from_figment(figment).settings().expect("settings");
    assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn wrongly_typed_value_is_an_error() {
    let figment = Figment::new().merge(Toml::string("[retrieval]\ntop_k = \"many\"\n"));
    assert!(Config::from_figment(figment).settings().is_err());
}

#[test]
fn relative_store_uri_resolves_against_base() {
    let tmp = TempDir::new().expect("tempdir");
    let resolved = resolve_with_base(tmp.path(), "data/lancedb");
    assert_eq!(resolved, tmp.path().join("data/lancedb"));
}

#[test]
fn record_json_accepts_missing_fields() {
    let record: ArticleRecord = serde_json::from_str(
        r#"{"title": "Vaccine trial results", "text": "Phase three data", "url": "https://n.example/v"}"#,
    )
    .expect("parse");
    assert!(record.id.is_empty());
    assert!(record.published_at.is_none());
    let doc = Document::from(&record);
    assert_eq!(doc.category, "general");
    assert_eq!(doc.published_date, "N/A");
}

#[test]
fn classify_and_pick_latest_in_category() {
    assert_eq!(classify("latest AI chips"), Some(Category::Technology));
    assert_eq!(classify("the climate summit in Geneva"), Some(Category::Politics));
    assert_eq!(classify("weather tomorrow"), None);

    let doc = |id: &str, category: &str, date: &str| Document {
        id: id.to_string(),
        title: id.to_string(),
        category: category.to_string(),
        published_date: date.to_string(),
        source: "Wire".to_string(),
        url: String::new(),
        content: String::new(),
    };
    let docs = vec![
        doc("a", "Technology", "2024-01-01"),
        doc("b", "sports", "2024-05-01"),
        doc("c", "technology", "N/A"),
        doc("d", "TECHNOLOGY", "2024-03-01"),
    ];
    let picked: Vec<&str> = latest_in_category(&docs, Category::Technology, 2).iter().map(|d| d.id.as_str()).collect();
    assert_eq!(picked, vec!["d", "a"]);
}
