use crate::error::AnnotationError;
use crate::pasranges_info::LocusInterval;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use tracing::warn;

lazy_static! {
    /// The signal classes of PolyA_DB and the hexamers each of them stands for.
    /// Motifs are written as RNA, as in the database documentation.
    static ref POLYADB_SIGNAL_CLASSES: HashMap<&'static str, Vec<&'static str>> = {
        let mut m = HashMap::new();
        m.insert(
            "OtherPAS",
            vec![
                "AGUAAA", "UAUAAA", "CAUAAA", "GAUAAA", "AAUAUA", "AAUACA", "AAUAGA", "AAAAAG",
                "ACUAAA",
            ],
        );
        m.insert("Arich", vec!["AAAAAA"]);
        m
    };
}

/// The sentinel signal class of PolyA_DB for sites without a detected signal.
pub const NO_SIGNAL_CLASS: &str = "NoPAS";

/// The width of a literal signal motif.
pub const HEXAMER_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The orientation of a feature relative to the forward strand of the reference.
///
/// The variant order follows the byte order of the textual representation,
/// so `Positive < Negative` just as `'+' < '-'`.
pub enum Strand {
    Positive,
    Negative,
}

impl Strand {
    pub fn is_negative(&self) -> bool {
        matches!(self, Strand::Negative)
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strand::Positive => write!(f, "+"),
            Strand::Negative => write!(f, "-"),
        }
    }
}

impl std::str::FromStr for Strand {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Strand, AnnotationError> {
        match s.trim() {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            _ => Err(AnnotationError::InvalidStrand(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The chromosome naming convention of a dataset.
///
/// # Variants
///
/// * `Bare`: chromosome names without prefix, e.g. `1`, `X`, `MT`. Parsed from `""`.
/// * `Prefixed`: chromosome names with the `chr` prefix, e.g. `chr1`, `chrX`. Parsed from `"chr"`.
///
/// Any other style string is rejected with [AnnotationError::UnknownChromosomeStyle].
///
/// # Examples
///
/// ```rust
/// use pasranges::options::ChromStyle;
/// let style: ChromStyle = "chr".parse().unwrap();
/// assert_eq!(style, ChromStyle::Prefixed);
/// assert!("ucsc".parse::<ChromStyle>().is_err());
/// ```
pub enum ChromStyle {
    Bare,
    Prefixed,
}

impl ChromStyle {
    pub fn prefix(&self) -> &'static str {
        match self {
            ChromStyle::Bare => "",
            ChromStyle::Prefixed => "chr",
        }
    }
}

impl std::str::FromStr for ChromStyle {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<ChromStyle, AnnotationError> {
        match s {
            "" => Ok(ChromStyle::Bare),
            "chr" => Ok(ChromStyle::Prefixed),
            _ => Err(AnnotationError::UnknownChromosomeStyle(s.to_string())),
        }
    }
}

impl std::fmt::Display for ChromStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An annotation that can be packed into the name field of a PAS interval.
///
/// Each annotation has a workflow name (used in configuration and as the output column name)
/// and a source column name in the PolyA_DB table.
///
/// | workflow name       | database column  | output type |
/// |---------------------|------------------|-------------|
/// | `hexamer_motif`     | `PAS Signal`     | string      |
/// | `conservation`      | `Conservation`   | string      |
/// | `percent_expressed` | `PSE`            | float       |
/// | `expression`        | `Mean RPM`       | float       |
/// | `most_expressed`    | `most_expressed` | boolean     |
pub enum AnnotationColumn {
    HexamerMotif,
    Conservation,
    PercentExpressed,
    Expression,
    MostExpressed,
}

impl AnnotationColumn {
    pub fn all() -> [AnnotationColumn; 5] {
        [
            AnnotationColumn::HexamerMotif,
            AnnotationColumn::Conservation,
            AnnotationColumn::PercentExpressed,
            AnnotationColumn::Expression,
            AnnotationColumn::MostExpressed,
        ]
    }

    /// the workflow name, also used as the output column name
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationColumn::HexamerMotif => "hexamer_motif",
            AnnotationColumn::Conservation => "conservation",
            AnnotationColumn::PercentExpressed => "percent_expressed",
            AnnotationColumn::Expression => "expression",
            AnnotationColumn::MostExpressed => "most_expressed",
        }
    }

    /// the column in the source database holding this annotation
    pub fn db_column(&self) -> &'static str {
        match self {
            AnnotationColumn::HexamerMotif => "PAS Signal",
            AnnotationColumn::Conservation => "Conservation",
            AnnotationColumn::PercentExpressed => "PSE",
            AnnotationColumn::Expression => "Mean RPM",
            AnnotationColumn::MostExpressed => "most_expressed",
        }
    }
}

impl std::str::FromStr for AnnotationColumn {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<AnnotationColumn, AnnotationError> {
        AnnotationColumn::all()
            .into_iter()
            .find(|c| c.name() == s || c.db_column() == s)
            .ok_or_else(|| AnnotationError::UnknownAnnotationColumn(s.to_string()))
    }
}

impl std::fmt::Display for AnnotationColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The declared, ordered list of annotation columns packed into an annotation label.
///
/// The schema is the only source of truth for the field order of a label: a label encoded with
/// one schema must be decoded with the same schema. It is fixed for a pipeline run and carried in
/// [AnnotationConfig].
///
/// # Examples
///
/// ```rust
/// use pasranges::options::{AnnotationColumn, AnnotationSchema};
/// let schema = AnnotationSchema::new(&["hexamer_motif", "expression"]).unwrap();
/// assert_eq!(schema.position(AnnotationColumn::Expression), Some(1));
/// ```
pub struct AnnotationSchema {
    columns: Vec<AnnotationColumn>,
}

impl AnnotationSchema {
    /// Builds a schema from workflow (or database) column names, keeping their order.
    ///
    /// ### Errors
    ///
    /// * [AnnotationError::UnknownAnnotationColumn] if a name is not an annotation column.
    /// * [AnnotationError::DuplicateAnnotationColumn] if a column is listed twice.
    pub fn new<T: AsRef<str>>(names: &[T]) -> Result<AnnotationSchema, AnnotationError> {
        let columns = names
            .iter()
            .map(|n| n.as_ref().parse::<AnnotationColumn>())
            .collect::<Result<Vec<_>, _>>()?;
        AnnotationSchema::from_columns(columns)
    }

    pub fn from_columns(
        columns: Vec<AnnotationColumn>,
    ) -> Result<AnnotationSchema, AnnotationError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in columns.iter() {
            if !seen.insert(*c) {
                return Err(AnnotationError::DuplicateAnnotationColumn(
                    c.name().to_string(),
                ));
            }
        }
        Ok(AnnotationSchema { columns })
    }

    /// Appends `most_expressed` if it is not declared yet. The selector always runs,
    /// so its flag is always part of the label.
    pub fn with_most_expressed(mut self) -> AnnotationSchema {
        if !self.contains(AnnotationColumn::MostExpressed) {
            self.columns.push(AnnotationColumn::MostExpressed);
        }
        self
    }

    pub fn columns(&self) -> &[AnnotationColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: AnnotationColumn) -> bool {
        self.columns.contains(&column)
    }

    pub fn position(&self, column: AnnotationColumn) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name()).collect()
    }
}

impl Default for AnnotationSchema {
    fn default() -> AnnotationSchema {
        AnnotationSchema {
            columns: AnnotationColumn::all().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lookup table from signal class names to the concrete motifs they stand for.
///
/// Motifs are stored as DNA: any `U` in a registered motif is replaced by `T` on insertion.
/// One class is the designated no-signal sentinel; it always expands to no motif at all.
///
/// # Fields
///
/// * `classes`: class name to motif list.
/// * `no_signal`: the sentinel class name, `NoPAS` for PolyA_DB.
pub struct SignalTable {
    classes: HashMap<String, Vec<String>>,
    no_signal: String,
}

impl SignalTable {
    /// Creates an empty table with the given no-signal sentinel.
    pub fn new<T: ToString>(no_signal: T) -> SignalTable {
        SignalTable {
            classes: HashMap::new(),
            no_signal: no_signal.to_string(),
        }
    }

    /// Registers (or replaces) a class. Motifs are converted from RNA to DNA.
    pub fn insert<T: AsRef<str>>(&mut self, class: &str, motifs: &[T]) {
        if class == self.no_signal {
            warn!(
                "Ignoring motifs registered for the no-signal class {:?}; it always expands to nothing.",
                class
            );
            return;
        }
        let motifs = motifs.iter().map(|m| rna_to_dna(m.as_ref())).collect();
        self.classes.insert(class.to_string(), motifs);
    }

    pub fn get(&self, class: &str) -> Option<&[String]> {
        self.classes.get(class).map(|v| v.as_slice())
    }

    pub fn no_signal(&self) -> &str {
        self.no_signal.as_str()
    }

    pub fn is_no_signal(&self, class: &str) -> bool {
        class == self.no_signal
    }
}

impl Default for SignalTable {
    fn default() -> SignalTable {
        let mut table = SignalTable::new(NO_SIGNAL_CLASS);
        for (class, motifs) in POLYADB_SIGNAL_CLASSES.iter() {
            table.insert(class, &motifs[..]);
        }
        table
    }
}

/// Converts an RNA motif to DNA by replacing `U` with `T`, keeping case.
pub fn rna_to_dna(motif: &str) -> String {
    motif
        .chars()
        .map(|c| match c {
            'U' => 'T',
            'u' => 't',
            _ => c,
        })
        .collect()
}

#[derive(Debug, Clone)]
/// The configuration of an annotation run.
///
/// A single value of this type is passed to every pipeline call instead of relying on global
/// state, so that encoding and decoding always observe the same column order.
///
/// # Fields
///
/// * `schema`: the ordered annotation columns packed into interval names.
/// * `signal_table`: signal class to motif lookup table.
/// * `upstream_flank`: number of bases added at the 5' end of each PAS before searching for hexamers.
/// * `database`: identifier of the source database, emitted as a constant output column.
/// * `chrom_style`: naming convention that chromosome names are normalized to.
/// * `subset`: if set, only PAS overlapping one of these regions are annotated.
/// * `assembly`: genome assembly identifier, informational.
///
/// # Examples
///
/// ```rust
/// use pasranges::options::{AnnotationConfig, AnnotationSchema, ChromStyle};
/// let config = AnnotationConfig::new(
///     AnnotationSchema::new(&["hexamer_motif", "conservation"]).unwrap(),
///     40,
///     "PolyA_DB",
///     ChromStyle::Prefixed,
/// );
/// assert_eq!(config.schema.len(), 3); // most_expressed is appended
/// ```
pub struct AnnotationConfig {
    pub schema: AnnotationSchema,
    pub signal_table: SignalTable,
    pub upstream_flank: u64,
    pub database: String,
    pub chrom_style: ChromStyle,
    pub subset: Option<Vec<LocusInterval>>,
    pub assembly: Option<String>,
}

impl AnnotationConfig {
    pub fn new<T: ToString>(
        schema: AnnotationSchema,
        upstream_flank: u64,
        database: T,
        chrom_style: ChromStyle,
    ) -> AnnotationConfig {
        AnnotationConfig {
            schema: schema.with_most_expressed(),
            signal_table: SignalTable::default(),
            upstream_flank,
            database: database.to_string(),
            chrom_style,
            subset: None,
            assembly: None,
        }
    }

    pub fn with_signal_table(mut self, signal_table: SignalTable) -> AnnotationConfig {
        self.signal_table = signal_table;
        self
    }

    pub fn with_subset(mut self, subset: Vec<LocusInterval>) -> AnnotationConfig {
        if subset.is_empty() {
            warn!("An empty subset was provided; no region restriction will be applied.");
            self.subset = None;
        } else {
            self.subset = Some(subset);
        }
        self
    }

    pub fn with_assembly<T: ToString>(mut self, assembly: T) -> AnnotationConfig {
        self.assembly = Some(assembly.to_string());
        self
    }

    /// Checks the configuration before any record is processed.
    ///
    /// ### Errors
    ///
    /// [AnnotationError::InvalidFlank] if `upstream_flank` does not fit a genomic coordinate.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        match i64::try_from(self.upstream_flank) {
            Ok(_) => Ok(()),
            Err(_) => Err(AnnotationError::InvalidFlank(self.upstream_flank)),
        }
    }

    /// Hexamers are only searched for when the signal annotation is part of the schema.
    pub fn scans_hexamers(&self) -> bool {
        self.schema.contains(AnnotationColumn::HexamerMotif)
    }
}

impl Default for AnnotationConfig {
    fn default() -> AnnotationConfig {
        AnnotationConfig::new(
            AnnotationSchema::default(),
            40,
            "PolyA_DB",
            ChromStyle::Prefixed,
        )
    }
}
