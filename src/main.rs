use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use site_profiler::fetch::{FetchedPage, Fetcher};
use site_profiler::score::{quality_score, ScoreInputs};
use site_profiler::response::CrawlRecord;
use site_profiler::{respond, sitemap, ExtractConfig, ExtractResponse, Settings};

#[derive(Parser)]
#[command(name = "site_profiler", about = "Extract business profiles from web pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a profile from local HTML (file or stdin)
    Extract {
        /// Source URL of the page
        #[arg(long)]
        url: String,
        /// HTML file to read (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
    /// Fetch a page and extract its profile
    Fetch {
        url: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Fetch every page in a sitemap and emit one `{url, ...response}` line
    /// per page, in sitemap order
    Crawl {
        /// Sitemap URL (urlset or sitemap index)
        #[arg(long)]
        sitemap: String,
        /// Only keep URLs matching this regex
        #[arg(short, long)]
        pattern: Option<String>,
        /// Max pages to crawl (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Score a page summary without extracting anything
    Score {
        #[arg(long)]
        words: usize,
        #[arg(long)]
        title: bool,
        #[arg(long)]
        meta: bool,
        #[arg(long, default_value = "0")]
        headings: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { url, file, pretty } => {
            let settings = Settings::from_env()?;
            let body = match file {
                Some(path) => std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin()
                        .read_to_end(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            let response = respond(&url, &body, &settings.extract_config());
            print_response(&response, pretty)
        }
        Commands::Fetch { url, pretty } => {
            let settings = Settings::from_env()?;
            let fetcher = Fetcher::new(&settings)?;
            let response = fetch_and_extract(&fetcher, &url, &settings.extract_config()).await;
            print_response(&response, pretty)
        }
        Commands::Crawl {
            sitemap: sitemap_url,
            pattern,
            limit,
        } => {
            let settings = Settings::from_env()?;
            let pattern = pattern
                .map(|p| Regex::new(&p))
                .transpose()
                .context("Invalid --pattern")?;
            let fetcher = Arc::new(Fetcher::new(&settings)?);

            let mut urls = sitemap::fetch_urls(&fetcher, &sitemap_url, pattern.as_ref()).await?;
            if let Some(n) = limit {
                urls.truncate(n);
            }
            if urls.is_empty() {
                eprintln!("No URLs to crawl.");
                return Ok(());
            }

            let t_fetch = Instant::now();
            eprintln!("Fetching {} pages...", urls.len());
            let fetched = fetch_all(fetcher, urls, settings.fetch_concurrency).await;
            let ok = fetched.iter().filter(|(_, r)| r.is_ok()).count();
            eprintln!(
                "Fetched {} pages ({} ok, {} errors) in {:.1}s",
                fetched.len(),
                ok,
                fetched.len() - ok,
                t_fetch.elapsed().as_secs_f64()
            );

            let counts = extract_all(fetched, &settings.extract_config())?;
            counts.print();
            Ok(())
        }
        Commands::Score {
            words,
            title,
            meta,
            headings,
        } => {
            let score = quality_score(&ScoreInputs {
                word_count: words,
                has_title: title,
                has_meta_description: meta,
                heading_count: headings,
            });
            println!("{:.2}", score);
            Ok(())
        }
    };

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());

    result
}

fn print_response(response: &ExtractResponse, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{}", json);
    Ok(())
}

async fn fetch_and_extract(fetcher: &Fetcher, url: &str, config: &ExtractConfig) -> ExtractResponse {
    let started = Instant::now();
    match fetcher.fetch(url).await {
        Ok(page) => {
            info!(url, status = page.status, latency_ms = page.latency_ms, "Fetched");
            respond(&page.url, &page.body, config)
        }
        Err(e) => {
            warn!("Fetch failed for {}: {:#}", url, e);
            ExtractResponse::failure(format!("{:#}", e), started)
        }
    }
}

type FetchOutcome = (String, Result<FetchedPage, String>);

/// Fetch pages concurrently, bounded by `concurrency`. Results are returned
/// in the order of `urls`, whatever order the fetches finish in.
async fn fetch_all(fetcher: Arc<Fetcher>, urls: Vec<String>, concurrency: usize) -> Vec<FetchOutcome> {
    use indicatif::{ProgressBar, ProgressStyle};

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = urls.len();

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    // Channel: workers send results, main loop collects them
    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, FetchOutcome)>(concurrency * 2);

    for (index, url) in urls.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let result = match sem.acquire().await {
                Ok(_permit) => fetcher.fetch(&url).await.map_err(|e| format!("{:#}", e)),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = &result {
                warn!("Fetch failed for {}: {}", url, e);
            }
            let _ = tx.send((index, (url, result))).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut done = Vec::with_capacity(total);
    while let Some(indexed) = rx.recv().await {
        done.push(indexed);
        pb.inc(1);
    }

    pb.finish_and_clear();
    in_input_order(done)
}

fn in_input_order<T>(mut indexed: Vec<(usize, T)>) -> Vec<T> {
    indexed.sort_unstable_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, item)| item).collect()
}

struct CrawlCounts {
    total: usize,
    ok: usize,
    failed: usize,
    truncated: usize,
}

impl CrawlCounts {
    fn print(&self) {
        eprintln!(
            "Extracted {} pages ({} profiles, {} failures, {} truncated).",
            self.total, self.ok, self.failed, self.truncated,
        );
    }
}

/// Extract fetched pages in parallel and write one JSON line per page to
/// stdout, keyed by the URL that was requested.
fn extract_all(fetched: Vec<FetchOutcome>, config: &ExtractConfig) -> Result<CrawlCounts> {
    use rayon::prelude::*;

    let mut counts = CrawlCounts {
        total: 0,
        ok: 0,
        failed: 0,
        truncated: 0,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for chunk in fetched.chunks(500) {
        let records: Vec<(CrawlRecord, bool)> = chunk
            .par_iter()
            .map(|(url, result)| {
                let (response, truncated) = extract_fetched(url, result, config);
                let record = CrawlRecord {
                    url: url.clone(),
                    response,
                };
                (record, truncated)
            })
            .collect();

        for (record, truncated) in records {
            counts.total += 1;
            if record.response.success {
                counts.ok += 1;
            } else {
                counts.failed += 1;
            }
            if truncated {
                counts.truncated += 1;
            }
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n")?;
        }
    }

    out.flush()?;
    Ok(counts)
}

fn extract_fetched(
    url: &str,
    result: &Result<FetchedPage, String>,
    config: &ExtractConfig,
) -> (ExtractResponse, bool) {
    use site_profiler::{process_document, RawDocument};

    let started = Instant::now();
    let page = match result {
        Ok(page) => page,
        Err(e) => return (ExtractResponse::failure(e, started), false),
    };
    match RawDocument::from_bytes(page.url.as_str(), &page.body) {
        Ok(doc) => {
            let extraction = process_document(&doc, config);
            let truncated = extraction.truncation.any();
            (ExtractResponse::ok(extraction.profile, started), truncated)
        }
        Err(e) => {
            warn!("Rejected {}: {}", url, e);
            (ExtractResponse::failure(e, started), false)
        }
    }
}
