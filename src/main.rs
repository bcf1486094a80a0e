use clap::Parser;
use pasranges::options::{AnnotationConfig, AnnotationSchema, ChromStyle};
use pasranges::pasranges_info::LocusInterval;
use pasranges::pipeline::annotate_files;
use peak_alloc::PeakAlloc;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Annotate PolyA_DB sites and their upstream signal hexamers as genomic intervals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short = 'd',
        long = "db",
        value_name = "PATH",
        help = "Path to the tab separated PolyA_DB export, optionally gzipped"
    )]
    db: PathBuf,

    #[arg(
        short = 'f',
        long = "fasta",
        value_name = "PATH",
        help = "Path to the reference genome FASTA, optionally gzipped; required to extract hexamers"
    )]
    fasta: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path of the annotated intervals TSV"
    )]
    output: PathBuf,

    #[arg(
        short = 's',
        long = "stats",
        value_name = "PATH",
        help = "Path of the per-feature count TSV"
    )]
    stats: Option<PathBuf>,

    #[arg(
        short = 'a',
        long = "annotations",
        value_name = "COLUMNS",
        value_delimiter = ',',
        default_value = "hexamer_motif,conservation,percent_expressed,expression",
        help = "Ordered annotation columns to carry; most_expressed is always appended"
    )]
    annotations: Vec<String>,

    #[arg(
        long = "flank",
        value_name = "BASES",
        default_value_t = 40,
        help = "Number of bases upstream of a site searched for its signal hexamers"
    )]
    flank: u64,

    #[arg(
        long = "database",
        value_name = "NAME",
        default_value = "PolyA_DB",
        help = "Database identifier written to every output row"
    )]
    database: String,

    #[arg(
        long = "chr-style",
        value_name = "STYLE",
        default_value = "chr",
        allow_hyphen_values = true,
        help = "Chromosome naming convention: \"chr\" for prefixed names, \"\" for bare names"
    )]
    chr_style: String,

    #[arg(
        long = "subset",
        value_name = "REGIONS",
        value_delimiter = ',',
        help = "Only keep sites overlapping one of these 1-based regions, e.g. chr1:1000-2000"
    )]
    subset: Vec<String>,

    #[arg(long = "assembly", value_name = "NAME", help = "Genome assembly identifier")]
    assembly: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let start = Instant::now();

    // configuration faults abort here, before any site is read
    let chrom_style = args.chr_style.parse::<ChromStyle>()?;
    let schema = AnnotationSchema::new(&args.annotations[..])?;
    let subset = args
        .subset
        .iter()
        .map(|s| s.parse::<LocusInterval>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = AnnotationConfig::new(schema, args.flank, &args.database, chrom_style);
    if !subset.is_empty() {
        config = config.with_subset(subset);
    }
    if let Some(assembly) = &args.assembly {
        config = config.with_assembly(assembly);
    }
    config.validate()?;

    let report = annotate_files(args.db.as_path(), args.fasta.as_deref(), &config)?;

    info!("save");
    report.write_intervals(&args.output)?;
    if let Some(stats) = &args.stats {
        report.write_summary(stats)?;
    }

    let duration: Duration = start.elapsed();
    info!("annotated {} intervals in {:?}", report.intervals.len(), duration);
    info!("peak memory usage: {:.1} MB", PEAK_ALLOC.peak_usage_as_mb());
    Ok(())
}
