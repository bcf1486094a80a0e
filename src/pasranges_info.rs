use crate::codec::SiteAnnotations;
use crate::error::AnnotationError;
use crate::options::{ChromStyle, Strand};
use nutype::nutype;
use std::ops::Range;

#[nutype(derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRef))]
/// The record ID of a site, i.e. its row order in the source database.
pub struct SiteID(u32);

/// Rewrites a chromosome name into the given naming convention.
///
/// Names that already follow the convention are returned unchanged, so the function is idempotent:
/// `normalize_chrom(&normalize_chrom(x, s), s) == normalize_chrom(x, s)`.
///
/// ### Arguments
///
/// * `chrom`: a non-empty chromosome name, e.g. `chr1` or `1`.
/// * `style`: the target [ChromStyle].
///
/// ### Example
///
/// ```rust
/// use pasranges::options::ChromStyle;
/// use pasranges::pasranges_info::normalize_chrom;
/// assert_eq!(normalize_chrom("chrX", ChromStyle::Bare), "X");
/// assert_eq!(normalize_chrom("X", ChromStyle::Prefixed), "chrX");
/// assert_eq!(normalize_chrom("chrX", ChromStyle::Prefixed), "chrX");
/// ```
pub fn normalize_chrom(chrom: &str, style: ChromStyle) -> String {
    match style {
        ChromStyle::Bare => chrom.strip_prefix("chr").unwrap_or(chrom).to_string(),
        ChromStyle::Prefixed => {
            if chrom.starts_with("chr") {
                chrom.to_string()
            } else {
                format!("chr{}", chrom)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A stranded genomic interval in 0-based, half-open coordinates, i.e. `[start, end)`.
///
/// This is the shape of a BED6 record. Every constructor validates that `0 <= start < end`,
/// so an existing [GenomicInterval] is never malformed. Intervals are immutable values: every
/// transformation returns a new interval.
///
/// ### Fields
///
/// * `chrom`: the reference sequence name.
/// * `start`: the first base of the interval, 0-based.
/// * `end`: one past the last base of the interval.
/// * `name`: a free-text name; for PAS intervals it holds the annotation label.
/// * `score`: the BED score column, kept verbatim.
/// * `strand`: the [Strand] of the feature.
pub struct GenomicInterval {
    chrom: String,
    start: i64,
    end: i64,
    name: String,
    score: String,
    strand: Strand,
}

impl GenomicInterval {
    /// Creates a new interval, rejecting negative or empty coordinates with
    /// [AnnotationError::MalformedInterval].
    pub fn new<T: ToString>(
        chrom: T,
        start: i64,
        end: i64,
        name: T,
        score: T,
        strand: Strand,
    ) -> Result<GenomicInterval, AnnotationError> {
        let chrom = chrom.to_string();
        if start < 0 || start >= end {
            return Err(AnnotationError::MalformedInterval { chrom, start, end });
        }
        Ok(GenomicInterval {
            chrom,
            start,
            end,
            name: name.to_string(),
            score: score.to_string(),
            strand,
        })
    }

    /// Creates the single-base interval of a 1-based position, i.e. `[position - 1, position)`.
    pub fn from_one_based<T: ToString>(
        chrom: T,
        position: i64,
        name: T,
        score: T,
        strand: Strand,
    ) -> Result<GenomicInterval, AnnotationError> {
        GenomicInterval::new(chrom, position - 1, position, name, score, strand)
    }

    pub fn chrom(&self) -> &str {
        self.chrom.as_str()
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn score(&self) -> &str {
        self.score.as_str()
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    /// always `false`, as empty intervals cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of this interval with another name.
    pub fn with_name<T: ToString>(&self, name: T) -> GenomicInterval {
        GenomicInterval {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Returns a copy of this interval with its chromosome name in the given convention.
    pub fn with_chrom_style(&self, style: ChromStyle) -> GenomicInterval {
        GenomicInterval {
            chrom: normalize_chrom(&self.chrom, style),
            ..self.clone()
        }
    }

    /// Whether this interval shares at least one base with `[start, end)` on `chrom`.
    pub fn overlaps(&self, chrom: &str, start: i64, end: i64) -> bool {
        self.chrom == chrom && self.start < end && start < self.end
    }

    /// Extends the interval at its 5' end, in transcriptional orientation.
    ///
    /// For a `+` strand interval, `start` moves left by `width`; for a `-` strand interval, `end`
    /// moves right by `width`. The result is clamped to `[0, chrom_len)` when the chromosome length is
    /// known. The 3' end never moves.
    ///
    /// ### Example
    ///
    /// ```rust
    /// use pasranges::options::Strand;
    /// use pasranges::pasranges_info::GenomicInterval;
    /// let pas = GenomicInterval::new("chr2", 200, 210, "pas", ".", Strand::Positive).unwrap();
    /// let window = pas.extend_upstream(40, None).unwrap();
    /// assert_eq!((window.start(), window.end()), (160, 210));
    /// ```
    pub fn extend_upstream(
        &self,
        width: u64,
        chrom_len: Option<u64>,
    ) -> Result<GenomicInterval, AnnotationError> {
        // flanks beyond the coordinate range reach the chromosome boundary
        let width = i64::try_from(width).unwrap_or(i64::MAX);
        let (start, end) = match self.strand {
            Strand::Positive => (std::cmp::max(0, self.start.saturating_sub(width)), self.end),
            Strand::Negative => {
                let end = self.end.saturating_add(width);
                let end = match chrom_len {
                    Some(l) => std::cmp::min(i64::try_from(l).unwrap_or(i64::MAX), end),
                    None => end,
                };
                (self.start, end)
            }
        };
        GenomicInterval::new(
            self.chrom.as_str(),
            start,
            end,
            self.name.as_str(),
            self.score.as_str(),
            self.strand,
        )
    }

    /// Projects a span measured in this interval's local, strand-aware frame onto the genome.
    /// This is a shorthand for [transform_span] with the interval's own strand.
    pub fn project(
        &self,
        local: Range<usize>,
        name: Option<&str>,
    ) -> Result<GenomicInterval, AnnotationError> {
        transform_span(self, self.strand, local, name)
    }

    /// Renders the interval as a 1-based, closed locus string, i.e. `chrom:{start + 1}-{end}`.
    pub fn to_locus_string(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start + 1, self.end)
    }
}

/// Converts a span of a window extracted relative to `feature` into absolute genome coordinates.
///
/// The window is assumed to start at the 5' end of the feature in transcriptional orientation, i.e.
/// at `feature.start` on the `+` strand and at `feature.end` (reading leftwards) on the `-` strand.
/// For the local span `[a, b)`:
///
/// * `+` strand: `[feature.start + a, feature.start + b)`
/// * `-` strand: `[feature.end - b, feature.end - a)`
///
/// The result inherits `chrom`, `score`, `strand` and `name` from `feature`; `name` can be
/// overridden.
///
/// ### Errors
///
/// Returns [AnnotationError::MalformedInterval] if the span is empty or does not fit into the
/// feature, as such a span cannot map to a valid interval.
///
/// ### Example
///
/// ```rust
/// use pasranges::options::Strand;
/// use pasranges::pasranges_info::{transform_span, GenomicInterval};
/// let feature = GenomicInterval::new("1", 100, 110, "f", ".", Strand::Negative).unwrap();
/// let hit = transform_span(&feature, Strand::Negative, 2..8, None).unwrap();
/// assert_eq!((hit.start(), hit.end()), (102, 108));
/// ```
pub fn transform_span(
    feature: &GenomicInterval,
    strand: Strand,
    local: Range<usize>,
    name: Option<&str>,
) -> Result<GenomicInterval, AnnotationError> {
    let (a, b) = (local.start as i64, local.end as i64);
    let (start, end) = match strand {
        Strand::Positive => (feature.start + a, feature.start + b),
        Strand::Negative => (feature.end - b, feature.end - a),
    };
    if b > feature.len() || start < feature.start || end > feature.end {
        return Err(AnnotationError::MalformedInterval {
            chrom: feature.chrom.clone(),
            start,
            end,
        });
    }
    GenomicInterval::new(
        feature.chrom.as_str(),
        start,
        end,
        name.unwrap_or(feature.name.as_str()),
        feature.score.as_str(),
        feature.strand,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A region given as a 1-based, closed locus string such as `chr1:1000-2000`.
///
/// This is the notation used to restrict a run to part of the genome.
pub struct LocusInterval {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
}

impl LocusInterval {
    /// The region in 0-based, half-open coordinates.
    pub fn half_open(&self) -> (i64, i64) {
        (self.start - 1, self.end)
    }

    pub fn with_chrom_style(&self, style: ChromStyle) -> LocusInterval {
        LocusInterval {
            chrom: normalize_chrom(&self.chrom, style),
            ..self.clone()
        }
    }
}

impl std::str::FromStr for LocusInterval {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<LocusInterval, AnnotationError> {
        let err = || AnnotationError::InvalidLocus(s.to_string());
        let (chrom, range) = s.trim().rsplit_once(':').ok_or_else(err)?;
        let (start, end) = range.split_once('-').ok_or_else(err)?;
        let start = start.replace(',', "").parse::<i64>().map_err(|_| err())?;
        let end = end.replace(',', "").parse::<i64>().map_err(|_| err())?;
        if chrom.is_empty() || start < 1 || end < start {
            return Err(err());
        }
        Ok(LocusInterval {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }
}

impl std::fmt::Display for LocusInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The kind of an emitted interval: a poly-adenylation site or a hexamer found upstream of one.
pub enum FeatureKind {
    Pas,
    Hexamer,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FeatureKind::Pas => write!(f, "PAS"),
            FeatureKind::Hexamer => write!(f, "hexamer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One row of the source database: a poly-adenylation site with its annotations.
///
/// ### Fields
///
/// * `id`: the row order of the record in the database.
/// * `chrom`: chromosome name.
/// * `position`: 1-based position of the cleavage site.
/// * `strand`: the [Strand] of the site.
/// * `gene`: the gene symbol the site is assigned to; sites are grouped by it.
/// * `annotations`: the site's annotations; `most_expressed` is filled in by the selector.
pub struct SiteRecord {
    pub id: SiteID,
    pub chrom: String,
    pub position: i64,
    pub strand: Strand,
    pub gene: String,
    pub annotations: SiteAnnotations,
}

impl SiteRecord {
    /// The expression measure used to rank sites of a gene. Sites without one, or with a NaN
    /// value, rank last.
    pub fn expression(&self) -> f64 {
        self.annotations
            .expression
            .filter(|v| !v.is_nan())
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// The interval of the site, named by `name`, with `.` as score.
    pub fn to_interval<T: ToString>(&self, name: T) -> Result<GenomicInterval, AnnotationError> {
        GenomicInterval::from_one_based(
            self.chrom.clone(),
            self.position,
            name.to_string(),
            String::from("."),
            self.strand,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
/// An emitted interval: the genomic interval, its decoded annotations, its kind and the database
/// it was derived from.
pub struct AnnotatedInterval {
    pub interval: GenomicInterval,
    pub annotations: SiteAnnotations,
    pub feature: FeatureKind,
    pub database: String,
}
