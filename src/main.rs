use anyhow::Context;
use clap::{ArgEnum, Parser};
use rayon::ThreadPoolBuilder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use wordmine::{loader, report, Analyzer, Corpus};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Count how often target words occur across a set of text files.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Files or directories to analyze.
    ///
    /// Directories are scanned one level deep; `.gz` files are decompressed
    /// transparently.
    #[clap(required = true)]
    paths: Vec<PathBuf>,

    /// Comma-separated list of words to count.
    #[clap(
        short,
        long,
        use_value_delimiter = true,
        default_value = "architecture,security,privacy"
    )]
    words: Vec<String>,

    /// Match words exactly as written, without case folding or punctuation
    /// stripping.
    #[clap(long)]
    case_sensitive: bool,

    /// Only load files with one of these extensions when scanning a
    /// directory.
    ///
    /// By default every regular file in the directory is read.
    #[clap(short, long, use_value_delimiter = true)]
    extensions: Vec<String>,

    /// Replace invalid UTF-8 sequences instead of failing on them.
    #[clap(long)]
    lossy: bool,

    /// How results are rendered on stdout.
    #[clap(short, long, arg_enum, default_value = "report")]
    format: Format,

    /// Additionally write the flattened rows as CSV to this path.
    #[clap(long)]
    csv: Option<PathBuf>,

    /// Append per-word summary statistics and a source ranking.
    #[clap(long)]
    stats: bool,

    /// Sets the number of threads to use in thread pool.
    ///
    /// By default, only one thread is used.
    ///
    /// Specifying this with no value or a value of 0 uses the
    /// default number of threads for rayon.
    #[clap(short, long, default_value = "1", default_missing_value = "0")]
    threads: usize,
}

#[derive(ArgEnum, Debug, Clone, Copy)]
enum Format {
    /// Per-source listing with counts and percentages.
    Report,

    /// One aligned row per (source, word).
    Table,

    /// Bar chart of per-word totals across all sources.
    Bars,

    /// The flattened rows as CSV.
    Csv,

    /// The flattened rows as JSON.
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    let mut corpus = Corpus::new();
    for path in &args.paths {
        if path.is_dir() {
            let sources = loader::load_dir(path, &args.extensions, args.lossy)
                .with_context(|| format!("could not scan '{}'", path.display()))?;
            for source in sources {
                eprintln!(
                    "loaded '{}' ({} words)",
                    source.name,
                    source.text.split_whitespace().count()
                );
                corpus.add(source)?;
            }
        } else {
            let source = loader::load_file(path, args.lossy)
                .with_context(|| format!("could not load '{}'", path.display()))?;
            eprintln!(
                "loaded '{}' ({} words)",
                source.name,
                source.text.split_whitespace().count()
            );
            corpus.add(source)?;
        }
    }

    let mut options = Analyzer::builder();
    options.case_sensitive = args.case_sensitive;
    let analysis = options.build().analyze(&corpus, &args.words)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Report => report::render_report(&analysis, &mut out)?,
        Format::Table => report::render_table(&analysis, &mut out)?,
        Format::Bars => report::render_bars(&analysis, &mut out)?,
        Format::Csv => report::write_csv(&analysis, &mut out)?,
        Format::Json => report::write_json(&analysis, &mut out)?,
    }

    if args.stats {
        writeln!(out)?;
        report::render_summary(&analysis, &mut out)?;
        if corpus.len() > 1 {
            writeln!(out)?;
            writeln!(out, "sources by total hits:")?;
            for (i, (name, hits)) in report::top_sources(&analysis, 5).iter().enumerate() {
                writeln!(out, "{:>2}. {} ({})", i + 1, name, hits)?;
            }
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("could not create '{}'", path.display()))?;
        let mut file = BufWriter::new(file);
        report::write_csv(&analysis, &mut file)?;
        file.flush()?;
        eprintln!("results exported to '{}'", path.display());
    }

    Ok(())
}
