//! Packing of site annotations into the name field of an interval, and back.
//!
//! Interval formats only have a single free-text column per record, so the annotations of a site
//! travel through interval operations as one `|`-delimited label. The field order of the label is
//! given by an [AnnotationSchema]; decoding with a different schema than the one used for
//! encoding is a configuration error that this module cannot detect beyond the field count.

use crate::error::AnnotationError;
use crate::options::{rna_to_dna, AnnotationColumn, AnnotationSchema, SignalTable, HEXAMER_WIDTH};
use crate::pasranges_info::{AnnotatedInterval, FeatureKind, GenomicInterval};

/// The delimiter between the fields of an annotation label.
pub const LABEL_DELIMITER: &str = "|";

/// The placeholder written for a missing annotation value. It keeps the field count of a label
/// fixed; it decodes back to a missing value.
pub const MISSING_VALUE: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A `|`-delimited string holding one field per column of an [AnnotationSchema].
pub struct AnnotationLabel(String);

impl AnnotationLabel {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn fields(&self) -> std::str::Split<'_, &'static str> {
        self.0.split(LABEL_DELIMITER)
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Returns a new label in which the field at `index` is replaced by `value`.
    /// Labels with fewer fields are returned unchanged.
    pub fn with_field(&self, index: usize, value: &str) -> AnnotationLabel {
        let fields = self
            .fields()
            .enumerate()
            .map(|(i, f)| if i == index { value } else { f })
            .collect::<Vec<&str>>();
        AnnotationLabel(fields.join(LABEL_DELIMITER))
    }
}

impl From<&str> for AnnotationLabel {
    fn from(s: &str) -> AnnotationLabel {
        AnnotationLabel(s.to_string())
    }
}

impl From<String> for AnnotationLabel {
    fn from(s: String) -> AnnotationLabel {
        AnnotationLabel(s)
    }
}

impl std::fmt::Display for AnnotationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// The typed annotations of a poly-adenylation site. A missing value is `None`.
///
/// ### Fields
///
/// * `hexamer_motif`: the signal class or literal signal motif, e.g. `AATAAA`, `OtherPAS`, `NoPAS`.
/// * `conservation`: the conservation status of the site.
/// * `percent_expressed`: the fraction of samples the site is expressed in, in `[0, 1]`.
/// * `expression`: the mean expression of the site (reads per million).
/// * `most_expressed`: whether the site is the representative site of its gene.
pub struct SiteAnnotations {
    pub hexamer_motif: Option<String>,
    pub conservation: Option<String>,
    pub percent_expressed: Option<f64>,
    pub expression: Option<f64>,
    pub most_expressed: Option<bool>,
}

impl SiteAnnotations {
    /// The value of `column` rendered as label text, `None` if missing. Empty text is missing.
    pub fn field(&self, column: AnnotationColumn) -> Option<String> {
        match column {
            AnnotationColumn::HexamerMotif => self.hexamer_motif.clone().filter(|v| !v.is_empty()),
            AnnotationColumn::Conservation => self.conservation.clone().filter(|v| !v.is_empty()),
            AnnotationColumn::PercentExpressed => self.percent_expressed.map(|v| v.to_string()),
            AnnotationColumn::Expression => self.expression.map(|v| v.to_string()),
            AnnotationColumn::MostExpressed => self.most_expressed.map(|v| {
                if v {
                    String::from("True")
                } else {
                    String::from("False")
                }
            }),
        }
    }

    /// Parses `raw` into `column`. [MISSING_VALUE] and empty text set the value to `None`. Text is
    /// stored as given, surrounding whitespace included.
    ///
    /// ### Errors
    ///
    /// [AnnotationError::InvalidField] if `raw` is not a valid value of a numeric or boolean column.
    pub fn set_field(&mut self, column: AnnotationColumn, raw: &str) -> Result<(), AnnotationError> {
        let invalid = || AnnotationError::InvalidField {
            column: column.name().to_string(),
            value: raw.to_string(),
        };
        let missing = raw.is_empty() || raw == MISSING_VALUE;

        match column {
            AnnotationColumn::HexamerMotif => {
                self.hexamer_motif = (!missing).then(|| raw.to_string());
            }
            AnnotationColumn::Conservation => {
                self.conservation = (!missing).then(|| raw.to_string());
            }
            AnnotationColumn::PercentExpressed => {
                self.percent_expressed = if missing {
                    None
                } else {
                    Some(raw.parse::<f64>().map_err(|_| invalid())?)
                };
            }
            AnnotationColumn::Expression => {
                self.expression = if missing {
                    None
                } else {
                    Some(raw.parse::<f64>().map_err(|_| invalid())?)
                };
            }
            AnnotationColumn::MostExpressed => {
                self.most_expressed = match raw {
                    _ if missing => None,
                    "True" | "true" | "1" => Some(true),
                    "False" | "false" | "0" => Some(false),
                    _ => return Err(invalid()),
                };
            }
        }
        Ok(())
    }

    /// Packs the values of the schema's columns, in schema order, into a label.
    ///
    /// Missing values are written as [MISSING_VALUE] so that the label always has exactly
    /// `schema.len()` fields. A text value containing the delimiter itself yields a label that fails
    /// to decode with [AnnotationError::LabelFieldMismatch].
    ///
    /// ### Example
    ///
    /// ```rust
    /// use pasranges::codec::SiteAnnotations;
    /// use pasranges::options::AnnotationSchema;
    /// let schema = AnnotationSchema::new(&["hexamer_motif", "expression", "conservation"]).unwrap();
    /// let annotations = SiteAnnotations {
    ///     hexamer_motif: Some(String::from("AATAAA")),
    ///     expression: Some(12.5),
    ///     ..Default::default()
    /// };
    /// assert_eq!(annotations.encode(&schema).as_str(), "AATAAA|12.5|NA");
    /// ```
    pub fn encode(&self, schema: &AnnotationSchema) -> AnnotationLabel {
        let fields = schema
            .columns()
            .iter()
            .map(|c| self.field(*c).unwrap_or_else(|| MISSING_VALUE.to_string()))
            .collect::<Vec<String>>();
        AnnotationLabel(fields.join(LABEL_DELIMITER))
    }

    /// Unpacks a label encoded with the same schema.
    ///
    /// Columns that are not part of the schema stay missing.
    ///
    /// ### Errors
    ///
    /// * [AnnotationError::LabelFieldMismatch] if the label does not have exactly one field per column.
    /// * [AnnotationError::InvalidField] if a field cannot be parsed into its column's type.
    pub fn decode(
        label: &AnnotationLabel,
        schema: &AnnotationSchema,
    ) -> Result<SiteAnnotations, AnnotationError> {
        let fields = label.fields().collect::<Vec<&str>>();
        if fields.len() != schema.len() {
            return Err(AnnotationError::LabelFieldMismatch {
                label: label.to_string(),
                expected: schema.len(),
                found: fields.len(),
            });
        }

        let mut annotations = SiteAnnotations::default();
        for (column, raw) in schema.columns().iter().zip(fields) {
            annotations.set_field(*column, raw)?;
        }
        Ok(annotations)
    }
}

/// Decodes the label held in the name of `interval` into an [AnnotatedInterval] of kind `feature`
/// coming from `database`.
pub fn decode_interval(
    interval: GenomicInterval,
    schema: &AnnotationSchema,
    database: &str,
    feature: FeatureKind,
) -> Result<AnnotatedInterval, AnnotationError> {
    let annotations = SiteAnnotations::decode(&AnnotationLabel::from(interval.name()), schema)?;
    Ok(AnnotatedInterval {
        interval,
        annotations,
        feature,
        database: database.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a signal value was resolved into motifs.
pub enum SignalResolution {
    /// the no-signal sentinel; nothing to search for
    NoSignal,
    /// a class of the lookup table
    Class,
    /// a literal hexamer
    Literal,
    /// neither a class nor hexamer-shaped; passed through as a literal motif
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The motifs a signal value stands for, as DNA, along with how they were resolved.
pub struct SignalExpansion {
    pub motifs: Vec<String>,
    pub resolution: SignalResolution,
}

/// Whether `value` looks like a literal signal motif: [HEXAMER_WIDTH] nucleotides (`ACGTU`, any case).
pub fn is_literal_motif(value: &str) -> bool {
    value.len() == HEXAMER_WIDTH
        && value
            .bytes()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'U'))
}

/// Expands a signal value into the concrete DNA motifs to search for.
///
/// * the no-signal sentinel expands to nothing.
/// * a class of `table` expands to its motif list.
/// * any other value expands to itself, with `U` replaced by `T`. Values that do not look like a
///   hexamer are reported as [SignalResolution::Unknown] so that the caller can count them.
///
/// ### Example
///
/// ```rust
/// use pasranges::codec::{expand_signal, SignalResolution};
/// use pasranges::options::SignalTable;
/// let table = SignalTable::default();
/// assert_eq!(expand_signal("Arich", &table).motifs, vec![String::from("AAAAAA")]);
/// assert!(expand_signal("NoPAS", &table).motifs.is_empty());
/// assert_eq!(expand_signal("AAUAAA", &table).motifs, vec![String::from("AATAAA")]);
/// assert_eq!(expand_signal("weird", &table).resolution, SignalResolution::Unknown);
/// ```
pub fn expand_signal(value: &str, table: &SignalTable) -> SignalExpansion {
    if table.is_no_signal(value) {
        return SignalExpansion {
            motifs: Vec::new(),
            resolution: SignalResolution::NoSignal,
        };
    }
    if let Some(motifs) = table.get(value) {
        return SignalExpansion {
            motifs: motifs.to_vec(),
            resolution: SignalResolution::Class,
        };
    }
    let resolution = if is_literal_motif(value) {
        SignalResolution::Literal
    } else {
        SignalResolution::Unknown
    };
    SignalExpansion {
        motifs: vec![rna_to_dna(value)],
        resolution,
    }
}
