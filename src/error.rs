use thiserror::Error;

/// Faults raised by the annotation core.
///
/// Record-level faults (`MalformedInterval`, `LabelFieldMismatch`, `InvalidField`,
/// `MissingSequence` and `InvalidSequence`) only invalidate the record being processed; the pipeline skips and counts
/// them. The remaining variants are configuration faults and abort a run before any record is
/// touched. See [AnnotationError::is_record_fault].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("malformed interval {chrom}:{start}-{end}; start must be non-negative and smaller than end")]
    MalformedInterval { chrom: String, start: i64, end: i64 },
    #[error("annotation label {label:?} has {found} fields but {expected} columns were declared")]
    LabelFieldMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("could not parse {value:?} as a value of the {column} column")]
    InvalidField { column: String, value: String },
    #[error("unsupported chromosome style {0:?}; expected \"\" or \"chr\"")]
    UnknownChromosomeStyle(String),
    #[error("unknown annotation column {0:?}")]
    UnknownAnnotationColumn(String),
    #[error("the annotation column {0:?} was declared more than once")]
    DuplicateAnnotationColumn(String),
    #[error("invalid strand {0:?}; expected one of \"+\" or \"-\"")]
    InvalidStrand(String),
    #[error("upstream flank {0} exceeds the largest genomic coordinate")]
    InvalidFlank(u64),
    #[error("could not parse {0:?} as a locus interval of the form chrom:start-end")]
    InvalidLocus(String),
    #[error("the reference sequence has no record named {chrom:?}")]
    MissingSequence { chrom: String },
    #[error("the reference sequence of {locus} is unavailable or contains invalid bases")]
    InvalidSequence { locus: String },
}

impl AnnotationError {
    /// Returns `true` if the fault only affects the current record, in which case the record is
    /// skipped and processing continues.
    pub fn is_record_fault(&self) -> bool {
        matches!(
            self,
            AnnotationError::MalformedInterval { .. }
                | AnnotationError::LabelFieldMismatch { .. }
                | AnnotationError::InvalidField { .. }
                | AnnotationError::MissingSequence { .. }
                | AnnotationError::InvalidSequence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_faults() {
        let e = AnnotationError::LabelFieldMismatch {
            label: String::from("AATAAA|Yes"),
            expected: 3,
            found: 2,
        };
        assert!(e.is_record_fault());
        assert!(e.to_string().contains("AATAAA|Yes"));
        assert!(!AnnotationError::UnknownChromosomeStyle(String::from("ch")).is_record_fault());
        assert!(!AnnotationError::InvalidFlank(u64::MAX).is_record_fault());
    }
}
