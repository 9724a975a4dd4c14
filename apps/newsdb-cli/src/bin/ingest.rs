use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::{env, fs};

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use newsdb_core::config::Config;
use newsdb_core::traits::Embedder;
use newsdb_core::types::ArticleRecord;
use newsdb_embed::get_default_embedder;
use newsdb_vector::ArticleWriter;

const EMBED_TEXT_MAX_CHARS: usize = 2500;
const DEFAULT_BATCH: usize = 32;

fn jsonl_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() { return vec![input.to_path_buf()]; }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "jsonl"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn read_records(path: &Path) -> anyhow::Result<Vec<ArticleRecord>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut records = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        match serde_json::from_str::<ArticleRecord>(&line) {
            Ok(r) => records.push(r),
            Err(e) => tracing::warn!(file = %path.display(), line = n + 1, "skipping unparseable record: {e}"),
        }
    }
    Ok(records)
}

fn embedding_text(r: &ArticleRecord) -> String {
    let joined = format!("{} {}", r.title.as_deref().unwrap_or_default(), r.text.as_deref().unwrap_or_default());
    joined.chars().take(EMBED_TEXT_MAX_CHARS).collect()
}

/// Fill in vectors for records that were scraped without one.
fn embed_missing(embedder: &dyn Embedder, records: &mut [ArticleRecord]) -> anyhow::Result<usize> {
    let missing: Vec<usize> = (0..records.len()).filter(|&i| records[i].embedding.is_none()).collect();
    if missing.is_empty() { return Ok(0); }
    let texts: Vec<String> = missing.iter().map(|&i| embedding_text(&records[i])).collect();
    let vectors = embedder.embed_batch(&texts)?;
    anyhow::ensure!(vectors.len() == missing.len(), "embedder returned {} vectors for {} texts", vectors.len(), missing.len());
    for (i, v) in missing.iter().zip(vectors) {
        anyhow::ensure!(v.len() == embedder.dim(), "embedder returned a {}-d vector, expected {}", v.len(), embedder.dim());
        records[*i].embedding = Some(v.into_iter().map(Some).collect());
    }
    Ok(missing.len())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut input = None; let mut skip_embed = false; let mut batch = DEFAULT_BATCH;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--no-embed" => skip_embed = true,
            "--batch" => {
                match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) if n > 0 => { batch = n; i += 1; }
                    _ => { eprintln!("Error: --batch requires a positive number"); std::process::exit(1); }
                }
            }
            a if !a.starts_with('-') => input = Some(PathBuf::from(a)),
            other => { eprintln!("Unknown flag: {other}"); std::process::exit(1); }
        }
        i += 1;
    }
    let Some(input) = input else {
        eprintln!("Usage: newsdb-ingest <file.jsonl|dir> [--no-embed] [--batch N]");
        std::process::exit(1);
    };

    let mut records = Vec::new();
    for file in jsonl_files(&input) { records.extend(read_records(&file)?); }
    println!("News Ingest\n===========");
    println!("Input: {} ({} records)", input.display(), records.len());
    if records.is_empty() { return Ok(()); }

    let store_path = settings.store_path(&env::current_dir()?);
    let store_uri = store_path.to_string_lossy().to_string();
    let embedder = if skip_embed { None } else { Some(get_default_embedder()?) };
    let rt = tokio::runtime::Runtime::new()?;
    let writer = rt.block_on(ArticleWriter::new(&store_uri, &settings.store.table))?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);
    let (mut written, mut embedded) = (0usize, 0usize);
    for chunk in records.chunks_mut(batch) {
        if let Some(embedder) = embedder.as_deref() { embedded += embed_missing(embedder, chunk)?; }
        written += rt.block_on(writer.upsert(chunk))?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_with_message("done");
    println!("\n✅ Upserted {written} articles into {} ({embedded} newly embedded)", store_path.display());
    println!("💡 Query with: cargo run --bin newsdb-query '<question>'");
    Ok(())
}
