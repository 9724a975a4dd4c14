use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use newsdb_core::config::Config;
use newsdb_core::traits::ArticleStore;
use newsdb_embed::FakeEmbedder;
use newsdb_hybrid::RetrievalSession;
use newsdb_vector::LanceArticleStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let store_uri = settings.store_path(&env::current_dir()?).to_string_lossy().to_string();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = Arc::new(LanceArticleStore::open(&store_uri, &settings.store.table).await?);
        let rows = store.count().await?;
        // Stats never encode a query; skip loading the model.
        let session = RetrievalSession::new(store, Arc::new(FakeEmbedder::new(newsdb_embed::EMBEDDING_DIM)), settings.clone());
        session.initialize().await;
        let mut stats = serde_json::to_value(session.stats())?;
        stats["store_rows"] = serde_json::json!(rows);
        stats["store"] = serde_json::json!(store_uri);
        println!("{}", serde_json::to_string_pretty(&stats)?);
        anyhow::Ok(())
    })
}
