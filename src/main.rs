use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geo_tagger::text::{split_sentences, strip_markup};
use geo_tagger::{
    Gazetteer, MatchRecord, NewspaperList, OutputFormat, Pipeline, RecognitionContext, Resolver,
    TaggerConfig, Tagger,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "geo_tagger",
    about = "Tag Chinese news text with administrative-region codes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DictArgs {
    /// Gazetteer JSON (province → city → district)
    #[arg(long)]
    dict: PathBuf,
    /// Tagger settings JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Longest span tried, overrides the config file
    #[arg(long)]
    max_window: Option<usize>,
    /// Shortest span tried, overrides the config file
    #[arg(long)]
    min_window: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Tag a CSV file (or a directory of them) of newspaper articles
    Tag {
        #[command(flatten)]
        dict: DictArgs,
        /// Whitespace-separated "newspaper code" pairs
        #[arg(long)]
        newspapers: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Skip the first CSV row
        #[arg(long)]
        has_headers: bool,
        /// Write here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        input: PathBuf,
    },
    /// Resolve names one after another within one document context
    Lookup {
        #[command(flatten)]
        dict: DictArgs,
        /// Origin region code, e.g. "11"
        #[arg(long)]
        origin: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Tag a single piece of text and print the matches as JSON
    Sentence {
        #[command(flatten)]
        dict: DictArgs,
        #[arg(long)]
        origin: Option<String>,
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Tag {
            dict,
            newspapers,
            format,
            has_headers,
            output,
            input,
        } => run_tag(&dict, &newspapers, format, has_headers, output, &input),
        Command::Lookup {
            dict,
            origin,
            names,
        } => run_lookup(&dict, origin.as_deref(), &names),
        Command::Sentence { dict, origin, text } => {
            run_sentence(&dict, origin.as_deref(), &text.join(""))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  SETUP
// ═══════════════════════════════════════════════════════════════════════

fn load_config(args: &DictArgs) -> Result<TaggerConfig> {
    let mut config = match &args.config {
        Some(path) => TaggerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TaggerConfig::default(),
    };
    if let Some(w) = args.max_window {
        config.max_window = w;
    }
    if let Some(w) = args.min_window {
        config.min_window = w;
    }
    config.validate()?;
    Ok(config)
}

fn load_gazetteer(args: &DictArgs) -> Result<Gazetteer> {
    Gazetteer::load(&args.dict).with_context(|| format!("loading gazetteer {}", args.dict.display()))
}

// ═══════════════════════════════════════════════════════════════════════
//  TAG MODE: CSV in, one line (or JSON object) per record out
// ═══════════════════════════════════════════════════════════════════════

fn run_tag(
    dict: &DictArgs,
    newspapers: &Path,
    format: OutputFormat,
    has_headers: bool,
    output: Option<PathBuf>,
    input: &Path,
) -> Result<()> {
    let config = load_config(dict)?;
    let gazetteer = load_gazetteer(dict)?;
    let list = NewspaperList::load(newspapers)
        .with_context(|| format!("loading newspaper list {}", newspapers.display()))?;

    let tagger = Tagger::new(Resolver::new(&gazetteer), &config)?;
    let pipeline = Pipeline::new(tagger, &list, &config);

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let n = pipeline.run_path(input, has_headers, format, &mut out)?;
    out.flush()?;

    info!(records = n, "done");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  LOOKUP MODE: resolve bare names, sharing one recognition context
// ═══════════════════════════════════════════════════════════════════════

fn run_lookup(dict: &DictArgs, origin: Option<&str>, names: &[String]) -> Result<()> {
    let gazetteer = load_gazetteer(dict)?;
    let resolver = Resolver::new(&gazetteer);
    let mut ctx = RecognitionContext::new();

    for name in names {
        let candidates = gazetteer.lookup(name).len();
        let code = resolver.resolve(name, origin, &mut ctx).unwrap_or("-");
        println!("{name}\t{code}\t{candidates} candidate(s)");
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  SENTENCE MODE: ad-hoc text → JSON matches on stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_sentence(dict: &DictArgs, origin: Option<&str>, raw: &str) -> Result<()> {
    let config = load_config(dict)?;
    let gazetteer = load_gazetteer(dict)?;
    let tagger = Tagger::new(Resolver::new(&gazetteer), &config)?;

    let body = strip_markup(raw);
    let sentences = split_sentences(&body, &config.sentence_delimiters);
    let matches: Vec<MatchRecord> = tagger
        .tag_document(sentences.iter().copied(), origin)
        .into_iter()
        .map(MatchRecord::from)
        .collect();

    info!(sentences = sentences.len(), matches = matches.len(), "tagged");
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
