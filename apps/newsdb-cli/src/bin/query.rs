use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use newsdb_core::config::Config;
use newsdb_core::traits::Embedder;
use newsdb_embed::get_default_embedder;
use newsdb_hybrid::RetrievalSession;
use newsdb_vector::LanceArticleStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut query = None; let mut k = settings.retrieval.top_k; let mut show_context = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-k" | "--top-k" => {
                match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) => { k = n; i += 1; }
                    None => { eprintln!("Error: -k requires a number"); std::process::exit(1); }
                }
            }
            "--context" => show_context = true,
            a if !a.starts_with('-') => query = Some(a.to_string()),
            other => { eprintln!("Unknown flag: {other}"); std::process::exit(1); }
        }
        i += 1;
    }
    let Some(query) = query else {
        eprintln!("Usage: newsdb-query \"<question>\" [-k N] [--context]");
        std::process::exit(1);
    };

    let store_uri = settings.store_path(&env::current_dir()?).to_string_lossy().to_string();
    let embedder: Arc<dyn Embedder> = Arc::from(get_default_embedder()?);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = LanceArticleStore::open(&store_uri, &settings.store.table).await?;
        let session = RetrievalSession::new(Arc::new(store), embedder, settings.clone());
        let loaded = session.initialize().await;
        println!("Corpus: {loaded} articles\nQuery: {query}\n");
        if show_context {
            let prepared = session.prepare(&query).await?;
            println!("{}", prepared.context);
            return Ok(());
        }
        let results = session.retrieve(&query, k).await?;
        if results.is_empty() { println!("No results."); }
        for (n, r) in results.iter().enumerate() {
            let d = &r.document;
            println!("{}. [{:?} {:.4}] {} ({}, {}, {})", n + 1, r.source, r.score, d.title, d.category, d.published_date, d.source);
            if !d.url.is_empty() { println!("   {}", d.url); }
        }
        anyhow::Ok(())
    })
}
