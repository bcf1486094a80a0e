use crate::codec::SiteAnnotations;
use crate::error::AnnotationError;
use crate::options::{AnnotationColumn, Strand};
use crate::pasranges_info::{SiteID, SiteRecord};
use crate::pasranges_utils::{read_to_bytes, VALIDSTRANDS};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{info, warn};

pub const CHROMOSOME: &str = "Chromosome";
pub const POSITION: &str = "Position";
pub const STRAND: &str = "Strand";
pub const GENE_SYMBOL: &str = "Gene Symbol";

/// Reads a tab separated PolyA_DB export, which may be gzipped, into a dataframe.
///
/// The file must have a header line. Column types are inferred; [sites_from_dataframe] casts the
/// columns it uses.
pub fn read_polyadb<T: AsRef<Path>>(file_path: T) -> anyhow::Result<DataFrame> {
    let bytes = read_to_bytes(&file_path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(b'\t'))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    info!(
        "read {} sites from {:?}",
        df.height(),
        file_path.as_ref()
    );
    Ok(df)
}

/// Parses a percentage such as `35%` into a fraction. The percent sign is optional, the value is
/// always divided by 100.
pub fn parse_percent(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .map(|v| v / 100.0)
}

#[derive(Debug, Clone, Default, PartialEq)]
/// The sites of a database, along with the rows that could not be turned into sites.
///
/// ### Fields
///
/// * `records`: the valid sites, in row order.
/// * `faults`: the row index and fault of every rejected row.
pub struct SiteTable {
    pub records: Vec<SiteRecord>,
    pub faults: Vec<(usize, AnnotationError)>,
}

impl From<Vec<SiteRecord>> for SiteTable {
    fn from(records: Vec<SiteRecord>) -> SiteTable {
        SiteTable {
            records,
            faults: Vec::new(),
        }
    }
}

fn str_column(df: &DataFrame, name: &str) -> anyhow::Result<Series> {
    Ok(df.column(name)?.cast(&DataType::String)?)
}

fn optional_str_column(df: &DataFrame, name: &str) -> anyhow::Result<Option<Series>> {
    match df.column(name) {
        Ok(s) => Ok(Some(s.cast(&DataType::String)?)),
        Err(_) => Ok(None),
    }
}

/// Converts the rows of a PolyA_DB dataframe into [SiteRecord]s.
///
/// The `Chromosome`, `Position`, `Strand` and `Gene Symbol` columns are required; a missing one is
/// an error. The annotation columns (see [AnnotationColumn::db_column]) are optional and left empty
/// when absent. `PSE` holds percentages and is stored as a fraction. Every row gets its row index as
/// [SiteID].
///
/// Surrounding whitespace is stripped from the signal and conservation values.
///
/// A row with a missing required value, an invalid strand or an unparsable annotation is rejected:
/// it is reported in [SiteTable::faults] and processing moves on to the next row.
pub fn sites_from_dataframe(df: &DataFrame) -> anyhow::Result<SiteTable> {
    let chrom = str_column(df, CHROMOSOME)?;
    let position = df.column(POSITION)?.cast(&DataType::Int64)?;
    let strand = str_column(df, STRAND)?;
    let gene = str_column(df, GENE_SYMBOL)?;
    let (chrom, position, strand, gene) = (chrom.str()?, position.i64()?, strand.str()?, gene.str()?);

    let signal = optional_str_column(df, AnnotationColumn::HexamerMotif.db_column())?;
    let conservation = optional_str_column(df, AnnotationColumn::Conservation.db_column())?;
    let pse = optional_str_column(df, AnnotationColumn::PercentExpressed.db_column())?;
    let rpm = match df.column(AnnotationColumn::Expression.db_column()) {
        Ok(s) => Some(s.cast(&DataType::Float64)?),
        Err(_) => None,
    };

    let mut table = SiteTable::default();
    for idx in 0..df.height() {
        let missing = |column: &str| AnnotationError::InvalidField {
            column: column.to_string(),
            value: String::new(),
        };
        let record = (|| -> Result<SiteRecord, AnnotationError> {
            let chrom = chrom.get(idx).ok_or_else(|| missing(CHROMOSOME))?;
            let position = position.get(idx).ok_or_else(|| missing(POSITION))?;
            let gene = gene.get(idx).ok_or_else(|| missing(GENE_SYMBOL))?;
            let strand = strand.get(idx).ok_or_else(|| missing(STRAND))?;
            if !VALIDSTRANDS.contains(&strand.trim()) {
                return Err(AnnotationError::InvalidField {
                    column: STRAND.to_string(),
                    value: strand.to_string(),
                });
            }

            let mut annotations = SiteAnnotations::default();
            if let Some(s) = &signal {
                if let Some(v) = s.str().ok().and_then(|ca| ca.get(idx)) {
                    annotations.set_field(AnnotationColumn::HexamerMotif, v.trim())?;
                }
            }
            if let Some(s) = &conservation {
                if let Some(v) = s.str().ok().and_then(|ca| ca.get(idx)) {
                    annotations.set_field(AnnotationColumn::Conservation, v.trim())?;
                }
            }
            if let Some(s) = &pse {
                if let Some(v) = s.str().ok().and_then(|ca| ca.get(idx)) {
                    annotations.percent_expressed =
                        Some(parse_percent(v).ok_or_else(|| AnnotationError::InvalidField {
                            column: AnnotationColumn::PercentExpressed.db_column().to_string(),
                            value: v.to_string(),
                        })?);
                }
            }
            if let Some(s) = &rpm {
                annotations.expression = s.f64().ok().and_then(|ca| ca.get(idx));
            }

            Ok(SiteRecord {
                id: SiteID::new(idx as u32),
                chrom: chrom.to_string(),
                position,
                strand: strand.parse::<Strand>()?,
                gene: gene.to_string(),
                annotations,
            })
        })();

        match record {
            Ok(r) => table.records.push(r),
            Err(e) => {
                warn!("skipping database row {}: {}", idx, e);
                table.faults.push((idx, e));
            }
        }
    }
    if !table.faults.is_empty() {
        warn!(
            "{} of {} database rows were skipped",
            table.faults.len(),
            df.height()
        );
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_df() -> DataFrame {
        df!(
            "Chromosome" => ["chr1", "chr1", "chrX", "chr2"],
            "Position" => [100i64, 250, 1000, 7],
            "Strand" => ["+", "-", "+", "*"],
            "Gene Symbol" => ["A", "A", "B", "C"],
            "PSE" => ["35%", "65%", "100%", "1%"],
            "Mean RPM" => [1.5, 3.0, 0.5, 2.0],
            "PAS Signal" => ["AATAAA", "OtherPAS", "NoPAS", "Arich"],
            "Intron/Exon location" => ["3' most exon", "3' most exon", "Intron", "CDS"]
        )
        .unwrap()
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("35%"), Some(0.35));
        assert_eq!(parse_percent("100"), Some(1.0));
        assert_eq!(parse_percent("abc%"), None);
    }

    #[test]
    fn test_sites_from_dataframe() {
        let table = sites_from_dataframe(&toy_df()).unwrap();
        assert_eq!(table.records.len(), 3);

        let first = &table.records[0];
        assert_eq!(first.id.into_inner(), 0);
        assert_eq!(first.chrom, "chr1");
        assert_eq!(first.position, 100);
        assert_eq!(first.strand, Strand::Positive);
        assert_eq!(first.annotations.percent_expressed, Some(0.35));
        assert_eq!(first.annotations.expression, Some(1.5));
        assert_eq!(first.annotations.hexamer_motif.as_deref(), Some("AATAAA"));
        // the database has no conservation column
        assert_eq!(first.annotations.conservation, None);
        assert_eq!(first.annotations.most_expressed, None);

        assert_eq!(table.records[1].strand, Strand::Negative);
        assert_eq!(table.records[2].id.into_inner(), 2);

        assert_eq!(table.faults.len(), 1);
        assert_eq!(table.faults[0].0, 3);
        assert!(table.faults[0].1.is_record_fault());
    }

    #[test]
    fn test_text_values_are_trimmed() {
        let df = df!(
            "Chromosome" => ["chr1"],
            "Position" => [100i64],
            "Strand" => ["+"],
            "Gene Symbol" => ["A"],
            "PAS Signal" => [" AATAAA "],
            "Conservation" => ["Yes "]
        )
        .unwrap();
        let table = sites_from_dataframe(&df).unwrap();
        let annotations = &table.records[0].annotations;
        assert_eq!(annotations.hexamer_motif.as_deref(), Some("AATAAA"));
        assert_eq!(annotations.conservation.as_deref(), Some("Yes"));
    }

    #[test]
    fn test_read_polyadb() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"Chromosome\tPosition\tStrand\tGene Symbol\tPSE\nchr1\t10\t+\tG1\t35%\nchr2\t20\t-\tG2\t5%\n",
        )
        .unwrap();
        let df = read_polyadb(file.path()).unwrap();
        assert_eq!(df.shape(), (2, 5));
        let table = sites_from_dataframe(&df).unwrap();
        assert_eq!(table.records[1].chrom, "chr2");
        assert_eq!(table.records[1].annotations.percent_expressed, Some(0.05));
    }

    #[test]
    fn test_missing_required_column() {
        let df = df!(
            "Chromosome" => ["chr1"],
            "Position" => [100i64],
            "Strand" => ["+"]
        )
        .unwrap();
        assert!(sites_from_dataframe(&df).is_err());
    }

    #[test]
    fn test_invalid_pse() {
        let df = df!(
            "Chromosome" => ["1"],
            "Position" => [100i64],
            "Strand" => ["+"],
            "Gene Symbol" => ["A"],
            "PSE" => ["lots"]
        )
        .unwrap();
        let table = sites_from_dataframe(&df).unwrap();
        assert!(table.records.is_empty());
        assert!(matches!(
            table.faults[0].1,
            AnnotationError::InvalidField { .. }
        ));
    }
}
