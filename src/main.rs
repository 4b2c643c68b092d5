use clap::{Parser, Subcommand};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tagsift::{app, report, server, Engine};
use tagsift_core::config::Config;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "tagsift", about = "Tag search broadened by a curated tag taxonomy")]
struct Cli {
    /// Config file to use instead of ~/.config/tagsift/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Taxonomy file (.json, .owl, .rdf, .xml); overrides [taxonomy] path.
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    /// Record file (.tsv or .json triples); overrides [store] path.
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Write debug logs to /tmp/tagsift-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search items by tag and show which results the taxonomy added.
    Search {
        tag: String,
        /// Match the literal tag only.
        #[arg(long)]
        no_expand: bool,
    },
    /// List the narrower tags of a tag.
    Descendants {
        tag: String,
        /// Immediate subtags only.
        #[arg(long)]
        direct: bool,
    },
    /// Load the taxonomy and report whether it is consistent.
    Check,
    /// Read tags from stdin and search each one; stop on EOF, an empty line or -1.
    Repl,
    /// Serve the search API over HTTP.
    Serve {
        /// Address to bind; overrides [server] bind.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.taxonomy {
        config.taxonomy.path = path;
    }
    if let Some(path) = cli.records {
        config.store.path = path;
    }

    match cli.command {
        Command::Search { tag, no_expand } => {
            let engine = app::build_engine(&config).await?;
            let expand = config.search.expand_by_default && !no_expand;
            print!("{}", search_once(&engine, &config, &tag, expand).await?);
        }
        Command::Descendants { tag, direct } => {
            let taxonomy = app::load_validated_taxonomy(&config)?;
            let expander = tagsift_core::SubsumptionExpander::new(taxonomy);
            if !expander.taxonomy().contains(&tag) {
                let suggestions = expander.taxonomy().suggest(&tag, config.search.suggestion_limit);
                print!("{}", report::render_unknown_tag(&tag, &suggestions));
            }
            let found = expander.descendants(&tag, direct);
            print!("{}", report::render_descendants(&tag, direct, &found));
        }
        Command::Check => {
            let taxonomy = app::load_taxonomy(&config)?;
            let outcome = tagsift_core::ConsistencyChecker::check(&taxonomy);
            print!("{}", report::render_consistency(&outcome, taxonomy.len()));
            if !outcome.is_consistent() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Repl => {
            let engine = app::build_engine(&config).await?;
            repl(&engine, &config).await?;
        }
        Command::Serve { bind } => {
            let engine = Arc::new(app::build_engine(&config).await?);
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            server::serve(&bind, engine, &config.search).await?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/tagsift-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("tagsift debug log started, tail -f /tmp/tagsift-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}

/// Search one tag. Expanded searches also report what the taxonomy added.
async fn search_once(
    engine: &Engine,
    config: &Config,
    tag: &str,
    expand: bool,
) -> anyhow::Result<String> {
    let mut out = String::new();
    let taxonomy = engine.expander().taxonomy();
    if !taxonomy.contains(tag) {
        let suggestions = taxonomy.suggest(tag, config.search.suggestion_limit);
        out.push_str(&report::render_unknown_tag(tag, &suggestions));
    }

    let url_prefix = config.presentation.item_url_prefix.as_str();
    if expand {
        let attribution = engine.attribute(tag).await?;
        out.push_str(&report::render_attribution(&attribution, url_prefix));
    } else {
        let results = engine.search(tag, false).await?;
        out.push_str(&report::render_results(&results, url_prefix));
    }
    Ok(out)
}

async fn repl(engine: &Engine, config: &Config) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("Enter tag to search for: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let tag = line.trim();
        if tag.is_empty() || tag == "-1" {
            break;
        }
        match search_once(engine, config, tag, config.search.expand_by_default).await {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
    Ok(())
}
