use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wikisense_cli::{
    FilePageSource, FileStorage, HttpPageSource, InMemoryPageSource, NoOpStorage, PageSource,
    PageStorage, ParserConfig, WordParser,
};

#[derive(Parser)]
#[command(name = "wikisense")]
#[command(about = "Parse a dictionary page into word senses with definitions and examples")]
struct Args {
    /// Word to look up
    word: String,

    /// Language section to read (defaults to the configured language)
    #[arg(short, long)]
    language: Option<String>,

    /// Dictionary edition, e.g. "en" or "ro"
    #[arg(long)]
    language_code: Option<String>,

    /// Page revision to fetch
    #[arg(long)]
    old_id: Option<u64>,

    /// Parse a saved HTML page, or a directory of `<word>.html` pages, instead of downloading
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON translation table merged into the configured table
    #[arg(long)]
    translations: Option<String>,

    /// Add a part of speech to the recognised set (repeatable)
    #[arg(long = "include-pos")]
    include_pos: Vec<String>,

    /// Drop a part of speech from the recognised set (repeatable)
    #[arg(long = "exclude-pos")]
    exclude_pos: Vec<String>,

    /// Add a relation type, e.g. "hypernyms" (repeatable)
    #[arg(long = "include-relation")]
    include_relation: Vec<String>,

    /// Drop a relation type (repeatable)
    #[arg(long = "exclude-relation")]
    exclude_relation: Vec<String>,

    /// Emit definitions with their examples interleaved
    #[arg(long)]
    pack: bool,

    /// Output file path (stdout when not given)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cache directory (default: the user cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the page and outcome caches
    #[arg(long)]
    no_cache: bool,

    /// Skip cache lookups and force a fresh fetch and parse
    #[arg(long)]
    skip_cache: bool,

    /// Log timings of every pipeline step
    #[arg(long)]
    profile: bool,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    info!("📋 Looking up '{}' on the {} edition", args.word, config.language_code);

    let source: Box<dyn PageSource> = match &args.input {
        Some(path) if path.is_dir() => Box::new(FilePageSource::new(path)),
        Some(path) => {
            let markup = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Box::new(InMemoryPageSource::new().with_page(&args.word, &markup))
        }
        None => {
            info!("🌐 Fetching {}", config.page_url(&args.word));
            Box::new(HttpPageSource::new(&config.url_template))
        }
    };
    // Local pages bypass the cache so a stale download never shadows them.
    let storage: Box<dyn PageStorage> = if args.no_cache || args.input.is_some() {
        Box::new(NoOpStorage::new())
    } else {
        let dir = cache_dir(args)?;
        let dir = dir
            .to_str()
            .ok_or_else(|| anyhow!("Cache directory is not valid UTF-8: {}", dir.display()))?;
        Box::new(FileStorage::new(dir)?)
    };

    let profile = config.profile;
    let parser = WordParser::new_with_dependencies(config, source, storage);
    let outcome = parser.fetch_with_options(
        &args.word,
        args.language.as_deref(),
        args.old_id,
        args.skip_cache,
        profile,
    )?;

    if outcome.is_no_entry() {
        info!("⚠️  No entry for '{}' in the requested language", args.word);
    }

    let json = if args.pack {
        serde_json::to_string_pretty(&WordParser::pack(&outcome))?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("💾 Results saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<ParserConfig> {
    let mut config = ParserConfig::load_with_fallback(args.config.as_deref());
    if let Some(path) = &args.translations {
        config.load_translations_from_file(path)?;
    }
    if let Some(code) = &args.language_code {
        config.set_language(code)?;
    }
    for pos in &args.include_pos {
        config.include_part_of_speech(pos);
    }
    for pos in &args.exclude_pos {
        config.exclude_part_of_speech(pos);
    }
    for relation in &args.include_relation {
        config.include_relation(relation);
    }
    for relation in &args.exclude_relation {
        config.exclude_relation(relation);
    }
    if args.profile {
        config.profile = true;
    }
    Ok(config)
}

fn cache_dir(args: &Args) -> Result<PathBuf> {
    match &args.cache_dir {
        Some(dir) => Ok(dir.clone()),
        None => dirs::cache_dir()
            .map(|dir| dir.join("wikisense"))
            .ok_or_else(|| anyhow!("Could not determine a cache directory; pass --cache-dir")),
    }
}
