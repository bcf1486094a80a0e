use flate2::write::GzEncoder;
use flate2::Compression;
use pasranges::options::{AnnotationConfig, ChromStyle};
use pasranges::pasranges_info::FeatureKind;
use pasranges::pipeline::{annotate, annotate_files};
use pasranges::reader::{sites_from_dataframe, FastaSequenceStore};
use polars::prelude::*;
use std::io::Write;

// AATAAA at [165, 171) of chr2; on the - strand of chr1, AATAAA at [20, 26) and AGTAAA at
// [27, 33), [35, 41), [43, 49) and [51, 57)
fn fasta_string() -> String {
    format!(
        ">2 chromosome 2\n{}AATAAA{}\n>1\n{}TTTATT{}\n",
        "C".repeat(165),
        "C".repeat(80),
        "G".repeat(20),
        "CTTTACTC".repeat(4)
    )
}

fn db_frame() -> DataFrame {
    df!(
        "Chromosome" => ["chr2", "chr2", "chr1", "chr1", "chr7"],
        "Position" => [201i64, 230, 10, 12, 100],
        "Strand" => ["+", "+", "-", "-", "+"],
        "Gene Symbol" => ["G1", "G1", "G2", "G2", "G3"],
        "PSE" => ["40%", "60%", "10%", "90%", "100%"],
        "Mean RPM" => [2.0, 1.0, 5.0, 5.0, 1.0],
        "PAS Signal" => ["AATAAA", "NoPAS", "AAUAAA", "OtherPAS", "Arich"],
        "Conservation" => ["Yes", "No", "Yes", "Yes", "No"],
    )
    .unwrap()
}

#[test]
fn test_pipeline() -> anyhow::Result<()> {
    let sites = sites_from_dataframe(&db_frame())?;
    let store = FastaSequenceStore::from_reader(std::io::Cursor::new(fasta_string()))?
        .with_chrom_style(ChromStyle::Prefixed)?;

    let config = AnnotationConfig::default();
    let report = annotate(sites, &config, &store)?;

    // chr7 is not part of the reference
    assert_eq!(report.stats.records, 5);
    assert_eq!(report.stats.missing_sequences, 1);
    assert_eq!(report.stats.pas, 4);

    let pas = report
        .intervals
        .iter()
        .filter(|i| i.feature == FeatureKind::Pas)
        .collect::<Vec<_>>();
    let most_expressed = pas
        .iter()
        .map(|i| i.annotations.most_expressed)
        .collect::<Vec<_>>();
    // G2 is a tie on expression, broken by the smaller position
    assert_eq!(
        most_expressed,
        vec![Some(true), Some(false), Some(true), Some(false)]
    );
    assert!(pas.iter().all(|i| i.annotations.hexamer_motif.is_none()));
    assert_eq!(pas[0].annotations.percent_expressed, Some(0.4));

    let hexamers = report
        .intervals
        .iter()
        .filter(|i| i.feature == FeatureKind::Hexamer)
        .map(|i| {
            (
                i.interval.chrom(),
                i.interval.start(),
                i.interval.end(),
                i.annotations.hexamer_motif.clone().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    assert_eq!(
        hexamers,
        vec![
            ("chr2", 165, 171, String::from("AATAAA")),
            ("chr1", 20, 26, String::from("AATAAA")),
            ("chr1", 27, 33, String::from("AGTAAA")),
            ("chr1", 35, 41, String::from("AGTAAA")),
            ("chr1", 43, 49, String::from("AGTAAA")),
        ]
    );
    // hexamer labels carry the matched motif in place of the signal class
    let names = report
        .intervals
        .iter()
        .filter(|i| i.feature == FeatureKind::Hexamer)
        .map(|i| i.interval.name())
        .collect::<Vec<_>>();
    assert_eq!(names[0], "AATAAA|Yes|0.4|2|True");
    assert_eq!(names[2], "AGTAAA|Yes|0.9|5|False");

    let summary = report.summary()?;
    assert_eq!(summary.height(), 2);
    let counts = summary.column("count")?.cast(&DataType::Int64)?;
    assert_eq!(counts.i64()?.get(0), Some(4));
    assert_eq!(counts.i64()?.get(1), Some(5));
    Ok(())
}

#[test]
fn test_annotate_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let db_path = dir.path().join("polyadb.tsv");
    let mut df = db_frame();
    let mut file = std::fs::File::create(&db_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b'\t')
        .finish(&mut df)?;

    let fasta_path = dir.path().join("genome.fa.gz");
    let mut enc = GzEncoder::new(std::fs::File::create(&fasta_path)?, Compression::default());
    enc.write_all(fasta_string().as_bytes())?;
    enc.finish()?;

    let config = AnnotationConfig::default().with_subset(vec!["chr1:1-100".parse()?]);
    let report = annotate_files(db_path.as_path(), Some(fasta_path.as_path()), &config)?;
    assert_eq!(report.stats.pas, 2);
    assert_eq!(report.stats.hexamers, 4);
    assert_eq!(report.stats.outside_subset, 3);

    let out_path = dir.path().join("out").join("pas.tsv");
    let stats_path = dir.path().join("out").join("pas_stats.tsv");
    report.write_intervals(&out_path)?;
    report.write_summary(&stats_path)?;

    let written = std::fs::read_to_string(&out_path)?;
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("chromosome\tstart\tend\tname\tscore\tstrand\thexamer_motif\tconservation\tpercent_expressed\texpression\tmost_expressed\tfeature\tdatabase")
    );
    assert_eq!(written.lines().count(), 7);
    assert!(written.contains("\tNA\tYes\t"));

    let stats = std::fs::read_to_string(&stats_path)?;
    assert_eq!(stats, "feature\tcount\nPAS\t2\nhexamer\t4\n");
    Ok(())
}

#[test]
fn test_fasta_is_required_for_hexamers() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("polyadb.tsv");
    std::fs::write(
        &db_path,
        "Chromosome\tPosition\tStrand\tGene Symbol\nchr1\t10\t+\tG1\n",
    )
    .unwrap();
    assert!(annotate_files(db_path.as_path(), None, &AnnotationConfig::default()).is_err());
}
