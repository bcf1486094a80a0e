use crate::codec::{expand_signal, AnnotationLabel, SignalResolution};
use crate::error::AnnotationError;
use crate::options::{SignalTable, Strand};
use crate::pasranges_info::{transform_span, GenomicInterval};
use std::ops::Range;
use tracing::trace;

/// Finds every occurrence of `motif` in `window`, ignoring case.
///
/// The search advances one base at a time, so overlapping occurrences are all reported:
/// `AAAAAAA` contains `AAAAAA` at offsets 0 and 1. The spans are returned in ascending order of
/// their offset in `window`. An empty motif matches nothing.
///
/// ### Example
///
/// ```rust
/// use pasranges::motif::find_overlapping;
/// assert_eq!(find_overlapping("AAAAAAA", "aaaaaa"), vec![0..6, 1..7]);
/// ```
pub fn find_overlapping(window: &str, motif: &str) -> Vec<Range<usize>> {
    let (window, motif) = (window.as_bytes(), motif.as_bytes());
    if motif.is_empty() || motif.len() > window.len() {
        return Vec::new();
    }
    window
        .windows(motif.len())
        .enumerate()
        .filter(|(_, w)| w.eq_ignore_ascii_case(motif))
        .map(|(i, _)| i..i + motif.len())
        .collect()
}

/// Locates a single motif in a window and projects the hits onto the genome.
///
/// `window` is the sequence of `feature` read in transcriptional orientation (reverse complemented
/// for the `-` strand). The hits are returned in ascending genomic order, which for the `-` strand
/// is the reverse of their order in the window. Every hit is named `name`, or after the feature if
/// no name is given.
pub fn scan_motif(
    feature: &GenomicInterval,
    strand: Strand,
    window: &str,
    motif: &str,
    name: Option<&str>,
) -> Result<Vec<GenomicInterval>, AnnotationError> {
    let mut hits = find_overlapping(window, motif)
        .into_iter()
        .map(|span| transform_span(feature, strand, span, name))
        .collect::<Result<Vec<_>, _>>()?;
    if strand.is_negative() {
        hits.reverse();
    }
    trace!(
        "found {} occurrences of {} in {}",
        hits.len(),
        motif,
        feature.to_locus_string()
    );
    Ok(hits)
}

/// Locates all motifs in a window and projects the hits onto the genome.
///
/// The hits are grouped by motif, in the order the motifs are given; within a group, they are in
/// ascending genomic order. Motifs without any occurrence contribute nothing. Callers needing a
/// globally sorted result have to sort it themselves.
///
/// ### Example
///
/// ```rust
/// use pasranges::motif::scan;
/// use pasranges::options::Strand;
/// use pasranges::pasranges_info::GenomicInterval;
/// let feature = GenomicInterval::new("2", 160, 210, "pas", ".", Strand::Positive).unwrap();
/// let window = format!("{}AATAAA{}", "C".repeat(5), "C".repeat(39));
/// let hits = scan(&feature, Strand::Positive, &window, &["AATAAA", "ATTAAA"]).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!((hits[0].start(), hits[0].end()), (165, 171));
/// ```
pub fn scan<T: AsRef<str>>(
    feature: &GenomicInterval,
    strand: Strand,
    window: &str,
    motifs: &[T],
) -> Result<Vec<GenomicInterval>, AnnotationError> {
    let mut hits = Vec::new();
    for motif in motifs {
        hits.extend(scan_motif(feature, strand, window, motif.as_ref(), None)?);
    }
    Ok(hits)
}

#[derive(Debug, Clone, PartialEq)]
/// The hexamers found for one PAS.
///
/// ### Fields
///
/// * `hexamers`: the hexamer intervals, named with the parent label whose signal field holds the
///   matched motif.
/// * `resolution`: how the parent's signal value was resolved.
pub struct HexamerScan {
    pub hexamers: Vec<GenomicInterval>,
    pub resolution: SignalResolution,
}

/// Finds the hexamers of the signal annotated on a PAS within its upstream window.
///
/// The signal value is read from field `signal_field` of the window's label (its name) and expanded
/// through `table`. The no-signal sentinel short-circuits to an empty result without scanning. Each
/// hexamer interval is a new value named after the window's label with the signal field replaced by
/// the concrete motif.
///
/// ### Arguments
///
/// * `window`: the PAS interval extended upstream; its name is the PAS annotation label.
/// * `sequence`: the sequence of `window` in transcriptional orientation.
/// * `signal_field`: the index of the signal column in the label.
/// * `table`: the signal class lookup table.
///
/// ### Errors
///
/// [AnnotationError::LabelFieldMismatch] if the label has no field `signal_field`, or any error of
/// [scan_motif].
pub fn scan_signal(
    window: &GenomicInterval,
    sequence: &str,
    signal_field: usize,
    table: &SignalTable,
) -> Result<HexamerScan, AnnotationError> {
    let label = AnnotationLabel::from(window.name());
    let signal = label
        .fields()
        .nth(signal_field)
        .ok_or_else(|| AnnotationError::LabelFieldMismatch {
            label: label.to_string(),
            expected: signal_field + 1,
            found: label.field_count(),
        })?;

    let expansion = expand_signal(signal, table);
    let mut hexamers = Vec::new();
    for motif in expansion.motifs.iter() {
        let name = label.with_field(signal_field, motif);
        hexamers.extend(scan_motif(
            window,
            window.strand(),
            sequence,
            motif,
            Some(name.as_str()),
        )?);
    }
    Ok(HexamerScan {
        hexamers,
        resolution: expansion.resolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_overlapping() {
        assert_eq!(find_overlapping("AAAAAAA", "AAAAAA"), vec![0..6, 1..7]);
        assert_eq!(find_overlapping("ccAATaaAcc", "aataaa"), vec![2..8]);
        assert!(find_overlapping("AAAAA", "AAAAAA").is_empty());
        assert!(find_overlapping("AAAAA", "").is_empty());
        assert!(find_overlapping("CCCCCCCC", "AATAAA").is_empty());
    }

    #[test]
    fn test_scan_plus_strand() {
        let feature = GenomicInterval::new("1", 100, 120, "f", ".", Strand::Positive).unwrap();
        // AATAAA at 2, AAAAAA at 10 and 11
        let window = "GGAATAAAGGAAAAAAAGGG";
        let hits = scan(&feature, Strand::Positive, window, &["AAAAAA", "AATAAA", "TTTTTT"])
            .unwrap();
        let coords = hits.iter().map(|h| (h.start(), h.end())).collect::<Vec<_>>();
        assert_eq!(coords, vec![(110, 116), (111, 117), (102, 108)]);
        assert!(hits.iter().all(|h| h.name() == "f" && h.strand() == Strand::Positive));
    }

    #[test]
    fn test_scan_minus_strand() {
        let feature = GenomicInterval::new("1", 100, 120, "f", ".", Strand::Negative).unwrap();
        let window = "GGAATAAAGGAAAAAAAGGG";
        let hits = scan(&feature, Strand::Negative, window, &["AAAAAA", "AATAAA"]).unwrap();
        let coords = hits.iter().map(|h| (h.start(), h.end())).collect::<Vec<_>>();
        // window offsets 10..16 and 11..17 map to [104, 110) and [103, 109), ascending
        assert_eq!(coords, vec![(103, 109), (104, 110), (112, 118)]);
    }

    #[test]
    fn test_scan_signal() {
        let table = SignalTable::default();
        let window =
            GenomicInterval::new("1", 100, 120, "Yes|OtherPAS|True", ".", Strand::Positive)
                .unwrap();
        let sequence = "CCAGTAAACCCATAAACCCC";
        let scan = scan_signal(&window, sequence, 1, &table).unwrap();
        assert_eq!(scan.resolution, SignalResolution::Class);
        let named = scan
            .hexamers
            .iter()
            .map(|h| (h.start(), h.name()))
            .collect::<Vec<_>>();
        // grouped in the order of the OtherPAS motif list
        assert_eq!(
            named,
            vec![(102, "Yes|AGTAAA|True"), (110, "Yes|CATAAA|True")]
        );
        // the parent is untouched
        assert_eq!(window.name(), "Yes|OtherPAS|True");
    }

    #[test]
    fn test_scan_signal_no_signal() {
        let table = SignalTable::default();
        let window =
            GenomicInterval::new("1", 100, 106, "NoPAS|True", ".", Strand::Positive).unwrap();
        let scan = scan_signal(&window, "AAAAAA", 0, &table).unwrap();
        assert!(scan.hexamers.is_empty());
        assert_eq!(scan.resolution, SignalResolution::NoSignal);

        assert!(matches!(
            scan_signal(&window, "AAAAAA", 2, &table),
            Err(AnnotationError::LabelFieldMismatch { .. })
        ));
    }
}
