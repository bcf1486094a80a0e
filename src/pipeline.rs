//! The end-to-end annotation flow: database sites in, annotated PAS and hexamer intervals out.
//!
//! For every site, the pipeline normalizes the chromosome name, flags the most expressed site of
//! each gene, packs the site annotations into the interval name, optionally restricts the sites to a
//! set of regions, scans the upstream window of every PAS for the hexamers of its signal, and decodes
//! every emitted interval back into typed annotation columns.

use crate::codec::{decode_interval, SignalResolution, SiteAnnotations, MISSING_VALUE};
use crate::error::AnnotationError;
use crate::motif::scan_signal;
use crate::options::{AnnotationColumn, AnnotationConfig, AnnotationSchema, ChromStyle};
use crate::pasranges_info::{
    normalize_chrom, AnnotatedInterval, FeatureKind, GenomicInterval, LocusInterval, SiteRecord,
};
use crate::reader::fasta::{FastaSequenceStore, SequenceSource};
use crate::reader::polyadb::{read_polyadb, sites_from_dataframe, SiteTable};
use crate::selector::flag_most_expressed;
use anyhow::Context;
use polars::prelude::*;
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, warn};

type RegionLapper = Lapper<u64, ()>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Counters of a pipeline run.
///
/// ### Fields
///
/// * `records`: database rows seen, including rejected ones.
/// * `pas`: PAS intervals emitted.
/// * `hexamers`: hexamer intervals emitted.
/// * `outside_subset`: sites dropped because they do not overlap any requested region.
/// * `malformed_intervals`, `label_mismatches`, `invalid_fields`, `missing_sequences`,
///   `invalid_sequences`: rows skipped because of the corresponding [AnnotationError].
/// * `unknown_signal_classes`: signal values neither in the lookup table nor hexamer-shaped; they
///   were searched for as literal motifs.
pub struct PipelineStats {
    pub records: usize,
    pub pas: usize,
    pub hexamers: usize,
    pub outside_subset: usize,
    pub malformed_intervals: usize,
    pub label_mismatches: usize,
    pub invalid_fields: usize,
    pub missing_sequences: usize,
    pub invalid_sequences: usize,
    pub unknown_signal_classes: usize,
}

impl PipelineStats {
    /// The number of rows skipped because of a record fault.
    pub fn skipped(&self) -> usize {
        self.malformed_intervals
            + self.label_mismatches
            + self.invalid_fields
            + self.missing_sequences
            + self.invalid_sequences
    }

    /// Counts a record fault. Any other error is a configuration fault and is handed back.
    pub fn count_fault(&mut self, err: AnnotationError) -> anyhow::Result<()> {
        match err {
            AnnotationError::MalformedInterval { .. } => self.malformed_intervals += 1,
            AnnotationError::LabelFieldMismatch { .. } => self.label_mismatches += 1,
            AnnotationError::InvalidField { .. } => self.invalid_fields += 1,
            AnnotationError::MissingSequence { .. } => self.missing_sequences += 1,
            AnnotationError::InvalidSequence { .. } => self.invalid_sequences += 1,
            e => return Err(e.into()),
        }
        Ok(())
    }
}

/// An overlap index over a set of regions, one interval tree per chromosome.
pub struct RegionFilter {
    lappers: HashMap<String, RegionLapper>,
}

impl RegionFilter {
    /// Builds the index, converting the region chromosome names to `style`.
    pub fn new(regions: &[LocusInterval], style: ChromStyle) -> RegionFilter {
        let mut ivs: HashMap<String, Vec<Interval<u64, ()>>> = HashMap::new();
        for region in regions {
            let region = region.with_chrom_style(style);
            let (start, end) = region.half_open();
            ivs.entry(region.chrom).or_default().push(Interval {
                start: start as u64,
                stop: end as u64,
                val: (),
            });
        }
        let lappers = ivs
            .into_iter()
            .map(|(chrom, ivs)| (chrom, Lapper::new(ivs)))
            .collect();
        RegionFilter { lappers }
    }

    /// Whether `interval` shares at least one base with one of the regions.
    pub fn overlaps(&self, interval: &GenomicInterval) -> bool {
        self.lappers.get(interval.chrom()).map_or(false, |l| {
            l.find(interval.start() as u64, interval.end() as u64)
                .next()
                .is_some()
        })
    }
}

/// The intervals derived from a single site.
struct SiteOutcome {
    pas: AnnotatedInterval,
    hexamers: Vec<AnnotatedInterval>,
    resolution: Option<SignalResolution>,
}

/// Runs the per-site steps against one configuration and sequence source.
struct SiteAnnotator<'a, S: SequenceSource> {
    config: &'a AnnotationConfig,
    source: &'a S,
    signal_field: Option<usize>,
}

impl<'a, S: SequenceSource> SiteAnnotator<'a, S> {
    fn new(config: &'a AnnotationConfig, source: &'a S) -> SiteAnnotator<'a, S> {
        SiteAnnotator {
            config,
            source,
            signal_field: config.schema.position(AnnotationColumn::HexamerMotif),
        }
    }

    fn annotate(&self, pas: GenomicInterval, rec: &SiteRecord) -> Result<SiteOutcome, AnnotationError> {
        let schema = &self.config.schema;
        let database = self.config.database.as_str();
        let mut parent = decode_interval(pas.clone(), schema, database, FeatureKind::Pas)?;

        let signal_field = match self.signal_field {
            Some(f) => f,
            None => {
                return Ok(SiteOutcome {
                    pas: parent,
                    hexamers: Vec::new(),
                    resolution: None,
                })
            }
        };

        // the hexamer column of PAS rows only describes matched hexamers once scanning ran
        parent.annotations.hexamer_motif = None;
        let table = &self.config.signal_table;
        let signal = match rec.annotations.hexamer_motif.as_deref() {
            Some(s) if !table.is_no_signal(s) => s,
            _ => {
                return Ok(SiteOutcome {
                    pas: parent,
                    hexamers: Vec::new(),
                    resolution: Some(SignalResolution::NoSignal),
                })
            }
        };

        let window = pas.extend_upstream(
            self.config.upstream_flank,
            self.source.chrom_len(pas.chrom()),
        )?;
        let sequence = self.source.fetch(&window)?;
        let scan = scan_signal(&window, &sequence, signal_field, table)?;
        if scan.resolution == SignalResolution::Unknown {
            warn!(
                "unknown signal class {:?} at {}; searching it as a literal motif",
                signal,
                pas.to_locus_string()
            );
        }

        let hexamers = scan
            .hexamers
            .into_iter()
            .map(|h| decode_interval(h, schema, database, FeatureKind::Hexamer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SiteOutcome {
            pas: parent,
            hexamers,
            resolution: Some(scan.resolution),
        })
    }
}

/// A site is emitted only if its position makes a valid interval and its label decodes.
fn check_site(rec: &SiteRecord, schema: &AnnotationSchema) -> Result<(), AnnotationError> {
    let label = rec.annotations.encode(schema);
    rec.to_interval(label.as_str())?;
    SiteAnnotations::decode(&label, schema)?;
    Ok(())
}

/// Annotates the sites of a database.
///
/// The chromosome names of all sites are normalized to `config.chrom_style`. Sites with a malformed
/// position or an undecodable label are skipped, then the most expressed of the remaining sites of
/// every gene is flagged before the region filter, so that the flag is computed over complete genes. If `config.subset` is set, only sites overlapping one of its regions are kept.
/// When the schema holds the `hexamer_motif` column, the upstream window of every PAS is fetched from
/// `source` and searched for the hexamers of the site's signal.
///
/// Record faults of a site are logged, counted in [PipelineStats] and the site is skipped; the run
/// goes on with the next site.
///
/// ### Returns
///
/// An [AnnotationReport] holding all PAS intervals, in database order, followed by all hexamer
/// intervals.
pub fn annotate<S: SequenceSource>(
    sites: SiteTable,
    config: &AnnotationConfig,
    source: &S,
) -> anyhow::Result<AnnotationReport> {
    config.validate()?;
    let mut stats = PipelineStats {
        records: sites.records.len() + sites.faults.len(),
        ..Default::default()
    };
    for (_, fault) in sites.faults {
        stats.count_fault(fault)?;
    }

    // sites that cannot be emitted do not compete for the most expressed flag
    let mut records = Vec::with_capacity(sites.records.len());
    for mut rec in sites.records {
        rec.chrom = normalize_chrom(&rec.chrom, config.chrom_style);
        match check_site(&rec, &config.schema) {
            Ok(()) => records.push(rec),
            Err(e) => {
                warn!("skipping site {}: {}", rec.id.into_inner(), e);
                stats.count_fault(e)?;
            }
        }
    }
    flag_most_expressed(&mut records);

    let filter = config
        .subset
        .as_ref()
        .map(|regions| RegionFilter::new(regions, config.chrom_style));
    if config.scans_hexamers() {
        info!(
            "extract hexamers within {} bases upstream of {} sites",
            config.upstream_flank,
            records.len()
        );
    }
    if let Some(assembly) = &config.assembly {
        debug!("annotating sites of the {} assembly", assembly);
    }

    let annotator = SiteAnnotator::new(config, source);
    let mut pas = Vec::with_capacity(records.len());
    let mut hexamers = Vec::new();
    for rec in records.iter() {
        let label = rec.annotations.encode(&config.schema);
        let outcome = rec.to_interval(label.as_str()).and_then(|interval| {
            if let Some(f) = &filter {
                if !f.overlaps(&interval) {
                    return Ok(None);
                }
            }
            annotator.annotate(interval, rec).map(Some)
        });

        match outcome {
            Ok(Some(o)) => {
                if o.resolution == Some(SignalResolution::Unknown) {
                    stats.unknown_signal_classes += 1;
                }
                pas.push(o.pas);
                hexamers.extend(o.hexamers);
            }
            Ok(None) => stats.outside_subset += 1,
            Err(e) => {
                warn!("skipping site {}: {}", rec.id.into_inner(), e);
                stats.count_fault(e)?;
            }
        }
    }

    stats.pas = pas.len();
    stats.hexamers = hexamers.len();
    info!(
        "annotated {} PAS and {} hexamers; skipped {} of {} records",
        stats.pas,
        stats.hexamers,
        stats.skipped(),
        stats.records
    );
    if stats.unknown_signal_classes > 0 {
        warn!(
            "{} sites carried an unknown signal class",
            stats.unknown_signal_classes
        );
    }

    pas.extend(hexamers);
    Ok(AnnotationReport {
        intervals: pas,
        stats,
        schema: config.schema.clone(),
    })
}

/// Reads the database at `db_path`, and the reference at `fasta_path` if hexamers are to be
/// extracted, then runs [annotate].
pub fn annotate_files<T: AsRef<Path>>(
    db_path: T,
    fasta_path: Option<T>,
    config: &AnnotationConfig,
) -> anyhow::Result<AnnotationReport> {
    info!("read database {:?}", db_path.as_ref());
    let df = read_polyadb(&db_path)?;
    let sites = sites_from_dataframe(&df)?;

    let store = match fasta_path {
        Some(p) => FastaSequenceStore::from_path(p)?.with_chrom_style(config.chrom_style)?,
        None if config.scans_hexamers() => {
            anyhow::bail!("A reference sequence is required to extract hexamers")
        }
        None => FastaSequenceStore::default(),
    };
    annotate(sites, config, &store)
}

#[derive(Debug, Clone, PartialEq)]
/// The output of a pipeline run.
pub struct AnnotationReport {
    pub intervals: Vec<AnnotatedInterval>,
    pub stats: PipelineStats,
    schema: AnnotationSchema,
}

impl AnnotationReport {
    pub fn schema(&self) -> &AnnotationSchema {
        &self.schema
    }

    /// Converts the emitted intervals into a dataframe with one row per interval.
    ///
    /// The columns are `chromosome`, `start`, `end`, `name`, `score`, `strand`, one typed column per
    /// annotation column of the schema (named by [AnnotationColumn::name]), `feature` and `database`.
    pub fn to_dataframe(&self) -> anyhow::Result<DataFrame> {
        let ivs = &self.intervals;
        let mut columns = vec![
            Series::new(
                "chromosome",
                ivs.iter().map(|i| i.interval.chrom()).collect::<Vec<_>>(),
            ),
            Series::new(
                "start",
                ivs.iter().map(|i| i.interval.start()).collect::<Vec<_>>(),
            ),
            Series::new(
                "end",
                ivs.iter().map(|i| i.interval.end()).collect::<Vec<_>>(),
            ),
            Series::new(
                "name",
                ivs.iter().map(|i| i.interval.name()).collect::<Vec<_>>(),
            ),
            Series::new(
                "score",
                ivs.iter().map(|i| i.interval.score()).collect::<Vec<_>>(),
            ),
            Series::new(
                "strand",
                ivs.iter()
                    .map(|i| i.interval.strand().to_string())
                    .collect::<Vec<_>>(),
            ),
        ];

        for column in self.schema.columns() {
            let name = column.name();
            let s = match column {
                AnnotationColumn::HexamerMotif => Series::new(
                    name,
                    ivs.iter()
                        .map(|i| i.annotations.hexamer_motif.clone())
                        .collect::<Vec<_>>(),
                ),
                AnnotationColumn::Conservation => Series::new(
                    name,
                    ivs.iter()
                        .map(|i| i.annotations.conservation.clone())
                        .collect::<Vec<_>>(),
                ),
                AnnotationColumn::PercentExpressed => Series::new(
                    name,
                    ivs.iter()
                        .map(|i| i.annotations.percent_expressed)
                        .collect::<Vec<_>>(),
                ),
                AnnotationColumn::Expression => Series::new(
                    name,
                    ivs.iter()
                        .map(|i| i.annotations.expression)
                        .collect::<Vec<_>>(),
                ),
                AnnotationColumn::MostExpressed => Series::new(
                    name,
                    ivs.iter()
                        .map(|i| i.annotations.most_expressed)
                        .collect::<Vec<_>>(),
                ),
            };
            columns.push(s);
        }

        columns.push(Series::new(
            "feature",
            ivs.iter()
                .map(|i| i.feature.to_string())
                .collect::<Vec<_>>(),
        ));
        columns.push(Series::new(
            "database",
            ivs.iter().map(|i| i.database.as_str()).collect::<Vec<_>>(),
        ));

        Ok(DataFrame::new(columns)?)
    }

    /// Counts the emitted intervals per `feature`, in order of first appearance.
    pub fn summary(&self) -> anyhow::Result<DataFrame> {
        let df = self
            .to_dataframe()?
            .lazy()
            .group_by_stable([col("feature")])
            .agg([len().alias("count")])
            .collect()?;
        Ok(df)
    }

    /// Writes the emitted intervals as a tab separated file with a header line.
    /// Missing annotation values are written as `NA`.
    pub fn write_intervals<T: AsRef<Path>>(&self, file_path: T) -> anyhow::Result<()> {
        let mut df = self.to_dataframe()?;
        write_tsv(&mut df, file_path.as_ref())?;
        info!(
            "saved {} intervals to {:?}",
            df.height(),
            file_path.as_ref()
        );
        Ok(())
    }

    /// Writes the per-feature counts of [AnnotationReport::summary] as a tab separated file.
    pub fn write_summary<T: AsRef<Path>>(&self, file_path: T) -> anyhow::Result<()> {
        let mut df = self.summary()?;
        write_tsv(&mut df, file_path.as_ref())
    }
}

fn write_tsv(df: &mut DataFrame, file_path: &Path) -> anyhow::Result<()> {
    // create the folder if it doesn't exist
    fs::create_dir_all(file_path.parent().with_context(|| {
        format!(
            "Could not get the parent directory of the given output file path {:?}",
            file_path.as_os_str()
        )
    })?)?;

    let file = fs::File::create(file_path)
        .with_context(|| format!("Could not create output file {:?}", file_path))?;
    let mut file = BufWriter::with_capacity(4194304, file);
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b'\t')
        .with_null_value(MISSING_VALUE.to_string())
        .finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AnnotationSchema, Strand};
    use crate::pasranges_info::SiteID;
    use std::io::Cursor;

    fn site(id: u32, chrom: &str, position: i64, strand: Strand, gene: &str, signal: &str) -> SiteRecord {
        SiteRecord {
            id: SiteID::new(id),
            chrom: chrom.to_string(),
            position,
            strand,
            gene: gene.to_string(),
            annotations: SiteAnnotations {
                hexamer_motif: Some(signal.to_string()),
                percent_expressed: Some(0.5),
                expression: Some(id as f64),
                ..Default::default()
            },
        }
    }

    // AATAAA at [165, 171) of chr2 and TTTATT at [20, 26) of chr1
    fn toy_store() -> FastaSequenceStore {
        let chr2 = format!("{}AATAAA{}", "C".repeat(165), "C".repeat(80));
        let chr1 = format!("{}TTTATT{}", "G".repeat(20), "G".repeat(20));
        let fasta = format!(">2\n{}\n>1\n{}\n", chr2, chr1);
        FastaSequenceStore::from_reader(Cursor::new(fasta.into_bytes()))
            .unwrap()
            .with_chrom_style(ChromStyle::Prefixed)
            .unwrap()
    }

    #[test]
    fn test_plus_strand_hexamer() {
        let config = AnnotationConfig::default();
        let sites = SiteTable::from(vec![site(0, "2", 201, Strand::Positive, "A", "AATAAA")]);
        let report = annotate(sites, &config, &toy_store()).unwrap();

        assert_eq!(report.stats.pas, 1);
        assert_eq!(report.stats.hexamers, 1);
        let pas = &report.intervals[0];
        assert_eq!(pas.feature, FeatureKind::Pas);
        assert_eq!(pas.interval.chrom(), "chr2");
        // the window is [160, 201), the motif sits at offset 5
        assert_eq!((pas.interval.start(), pas.interval.end()), (200, 201));
        assert_eq!(pas.annotations.hexamer_motif, None);
        assert_eq!(pas.annotations.most_expressed, Some(true));
        assert_eq!(pas.interval.name(), "AATAAA|NA|0.5|0|True");

        let hex = &report.intervals[1];
        assert_eq!(hex.feature, FeatureKind::Hexamer);
        assert_eq!((hex.interval.start(), hex.interval.end()), (165, 171));
        assert_eq!(hex.annotations.hexamer_motif.as_deref(), Some("AATAAA"));
        assert_eq!(hex.database, "PolyA_DB");
    }

    #[test]
    fn test_minus_strand_hexamer() {
        // AATAAA on the - strand reads TTTATT on the + strand, at [20, 26) of chr1
        let config = AnnotationConfig::default();
        let sites = SiteTable::from(vec![site(0, "chr1", 10, Strand::Negative, "A", "Arich")]);
        let report = annotate(sites.clone(), &config, &toy_store()).unwrap();
        assert_eq!(report.stats.hexamers, 0);

        let sites = SiteTable::from(vec![site(0, "chr1", 10, Strand::Negative, "A", "AAUAAA")]);
        let report = annotate(sites, &config, &toy_store()).unwrap();
        assert_eq!(report.stats.hexamers, 1);
        let hex = &report.intervals[1];
        assert_eq!((hex.interval.start(), hex.interval.end()), (20, 26));
        assert_eq!(hex.interval.strand(), Strand::Negative);
    }

    #[test]
    fn test_record_faults_are_skipped() {
        let config = AnnotationConfig::default();
        let sites = SiteTable {
            records: vec![
                site(0, "2", 210, Strand::Positive, "A", "NoPAS"),
                site(1, "2", 0, Strand::Positive, "B", "AATAAA"),
                site(2, "3", 100, Strand::Positive, "C", "AATAAA"),
                site(3, "2", 210, Strand::Positive, "D", "weird"),
            ],
            faults: vec![(
                4,
                AnnotationError::InvalidField {
                    column: String::from("Strand"),
                    value: String::from("*"),
                },
            )],
        };
        let report = annotate(sites, &config, &toy_store()).unwrap();
        assert_eq!(
            report.stats,
            PipelineStats {
                records: 5,
                pas: 2,
                hexamers: 0,
                malformed_intervals: 1,
                invalid_fields: 1,
                missing_sequences: 1,
                unknown_signal_classes: 1,
                ..Default::default()
            }
        );
        assert_eq!(report.stats.skipped(), 3);
    }

    #[test]
    fn test_label_mismatch_is_skipped() {
        let config = AnnotationConfig::default();
        let mut broken = site(2, "2", 201, Strand::Positive, "A", "NoPAS");
        broken.annotations.conservation = Some(String::from("Y|es"));
        let mut kept = site(1, "2", 230, Strand::Positive, "A", "NoPAS");
        kept.annotations.conservation = Some(String::from("Yes"));
        let other = site(0, "2", 240, Strand::Positive, "B", "NoPAS");

        let report = annotate(SiteTable::from(vec![broken, kept, other]), &config, &toy_store()).unwrap();
        assert_eq!(report.stats.label_mismatches, 1);
        assert_eq!(report.stats.pas, 2);
        assert_eq!(report.stats.skipped(), 1);

        // the skipped site does not take the flag of its gene
        let flags = report
            .intervals
            .iter()
            .map(|i| (i.interval.end(), i.annotations.most_expressed))
            .collect::<Vec<_>>();
        assert_eq!(flags, vec![(230, Some(true)), (240, Some(true))]);
        assert_eq!(report.intervals[0].annotations.conservation.as_deref(), Some("Yes"));
    }

    #[test]
    fn test_oversized_flank_is_rejected() {
        let config = AnnotationConfig::new(
            AnnotationSchema::default(),
            u64::MAX,
            "PolyA_DB",
            ChromStyle::Prefixed,
        );
        let sites = SiteTable::from(vec![site(0, "2", 201, Strand::Positive, "A", "AATAAA")]);
        assert!(annotate(sites, &config, &toy_store()).is_err());
    }

    #[test]
    fn test_without_hexamers() {
        let schema = AnnotationSchema::new(&["expression", "conservation"]).unwrap();
        let config = AnnotationConfig::new(schema, 40, "PolyA_DB", ChromStyle::Bare);
        let sites = SiteTable::from(vec![
            site(0, "chr9", 10, Strand::Positive, "A", "AATAAA"),
            site(1, "chr9", 20, Strand::Positive, "A", "AATAAA"),
        ]);
        // no sequence is needed
        let report = annotate(sites, &config, &FastaSequenceStore::default()).unwrap();
        assert_eq!(report.stats.pas, 2);
        assert_eq!(report.intervals[0].interval.chrom(), "9");
        assert_eq!(report.intervals[1].interval.name(), "1|NA|True");
        assert_eq!(report.intervals[1].annotations.hexamer_motif, None);
    }

    #[test]
    fn test_subset() {
        let config = AnnotationConfig::default()
            .with_subset(vec!["2:200-210".parse().unwrap(), "chr5:1-10".parse().unwrap()]);
        let sites = SiteTable::from(vec![
            site(0, "chr2", 210, Strand::Positive, "A", "NoPAS"),
            site(1, "chr2", 211, Strand::Positive, "A", "NoPAS"),
        ]);
        let report = annotate(sites, &config, &toy_store()).unwrap();
        assert_eq!(report.stats.pas, 1);
        assert_eq!(report.stats.outside_subset, 1);
        // the flag is computed over the complete gene
        assert_eq!(report.intervals[0].annotations.most_expressed, Some(false));
    }

    #[test]
    fn test_region_filter() {
        let regions = vec!["chr1:101-200".parse::<LocusInterval>().unwrap()];
        let filter = RegionFilter::new(&regions, ChromStyle::Bare);
        let gi = |s, e| GenomicInterval::new("1", s, e, "f", ".", Strand::Positive).unwrap();
        assert!(filter.overlaps(&gi(100, 101)));
        assert!(filter.overlaps(&gi(199, 300)));
        assert!(!filter.overlaps(&gi(99, 100)));
        assert!(!filter.overlaps(&gi(200, 201)));
        let other = GenomicInterval::new("2", 150, 160, "f", ".", Strand::Positive).unwrap();
        assert!(!filter.overlaps(&other));
    }

    #[test]
    fn test_dataframe_and_summary() {
        let config = AnnotationConfig::default();
        let sites = SiteTable::from(vec![
            site(0, "2", 201, Strand::Positive, "A", "AATAAA"),
            site(1, "2", 205, Strand::Positive, "A", "NoPAS"),
        ]);
        let report = annotate(sites, &config, &toy_store()).unwrap();
        let df = report.to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(
            df.get_column_names(),
            vec![
                "chromosome",
                "start",
                "end",
                "name",
                "score",
                "strand",
                "hexamer_motif",
                "conservation",
                "percent_expressed",
                "expression",
                "most_expressed",
                "feature",
                "database"
            ]
        );

        let summary = report.summary().unwrap();
        let features = summary.column("feature").unwrap().str().unwrap();
        assert_eq!(features.get(0), Some("PAS"));
        assert_eq!(features.get(1), Some("hexamer"));
        let counts = summary
            .column("count")
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let counts = counts.i64().unwrap();
        assert_eq!((counts.get(0), counts.get(1)), (Some(2), Some(1)));
    }
}
