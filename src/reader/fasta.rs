use crate::error::AnnotationError;
use crate::options::{ChromStyle, Strand};
use crate::pasranges_info::{normalize_chrom, GenomicInterval};
use crate::pasranges_utils::{equal_length, get_noodles_reader_from_path, get_noodles_reader_from_reader};
use anyhow::bail;
use noodles::core::Position;
use noodles::fasta;
use noodles::fasta::record::Sequence;
use std::collections::HashMap;
use std::io::{BufRead, Read};
use std::path::Path;
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Represents sequence information for a reference genome.
///
/// # Fields
///
/// * `seqname`: the names of the sequences (e.g., chromosomes).
/// * `seqlengths`: the length of each sequence, in the order of `seqname`.
/// * `genome`: an optional name or identifier of the genome, e.g. an assembly name.
///
/// # Examples
///
/// ```rust
/// use pasranges::reader::SeqInfo;
/// let seq_info = SeqInfo::new(
///     vec!["chr1".to_string(), "chr2".to_string()],
///     vec![248956422, 242193529],
///     Some("hg38".to_string()),
/// )
/// .unwrap();
/// assert_eq!(seq_info.seqlength("chr2"), Some(242193529));
/// ```
pub struct SeqInfo {
    seqname: Vec<String>,
    seqlengths: Vec<usize>,
    genome: Option<String>,
}

impl SeqInfo {
    /// Creates a new instance of SeqInfo, checking that every sequence has a length.
    pub fn new(
        seqname: Vec<String>,
        seqlengths: Vec<usize>,
        genome: Option<String>,
    ) -> anyhow::Result<SeqInfo> {
        if !equal_length(&seqname[..], &seqlengths[..]) {
            bail!("seqname and seqlengths have different length; Could not create SeqInfo")
        }
        Ok(SeqInfo {
            seqname,
            seqlengths,
            genome,
        })
    }

    /// get the seqname of the genome/reference set
    pub fn seqname(&self) -> &Vec<String> {
        &self.seqname
    }

    /// get the seqlengths of the genome/reference set
    pub fn seqlengths(&self) -> &Vec<usize> {
        &self.seqlengths
    }

    /// get the genome of the genome/reference set
    pub fn genome(&self) -> &Option<String> {
        &self.genome
    }

    /// The length of the sequence named `seqname`, if present.
    pub fn seqlength(&self, seqname: &str) -> Option<usize> {
        self.seqname
            .iter()
            .position(|s| s == seqname)
            .map(|i| self.seqlengths[i])
    }
}

fn record_name(record: &fasta::Record) -> anyhow::Result<String> {
    let record_name = std::str::from_utf8(record.name())?;
    Ok(record_name
        .split_once(' ')
        .unwrap_or((record_name, ""))
        .0
        .to_string())
}

/// A provider of reference sequence.
///
/// The pipeline only needs two things from a reference: the length of a chromosome, to clamp
/// windows at its end, and the sequence of a window in transcriptional orientation.
pub trait SequenceSource {
    /// The length of `chrom`, or `None` if the reference has no such sequence.
    fn chrom_len(&self, chrom: &str) -> Option<u64>;

    /// The sequence of `window`, reverse complemented if the window is on the `-` strand.
    ///
    /// # Errors
    ///
    /// [AnnotationError::MissingSequence] if the chromosome is absent, and
    /// [AnnotationError::InvalidSequence] if the window runs past the chromosome end or its sequence
    /// cannot be complemented.
    fn fetch(&self, window: &GenomicInterval) -> Result<String, AnnotationError>;
}

#[derive(Clone, Debug, Default)]
/// A reference genome held in memory, keyed by sequence name.
///
/// The whole FASTA file is loaded at construction. Sequence names follow the chromosome naming
/// convention of the file unless the store is converted with [FastaSequenceStore::with_chrom_style].
pub struct FastaSequenceStore {
    sequences: HashMap<String, Sequence>,
    seqinfo: SeqInfo,
}

impl FastaSequenceStore {
    /// Loads a (possibly gzipped) FASTA file.
    pub fn from_path<T: AsRef<Path>>(file_path: T) -> anyhow::Result<FastaSequenceStore> {
        let mut reader = get_noodles_reader_from_path(&file_path)?;
        let mut store = FastaSequenceStore::from_fasta_reader(&mut reader)?;
        store.seqinfo.genome = Some(file_path.as_ref().to_string_lossy().to_string());
        info!(
            "loaded {} reference sequences from {:?}",
            store.sequences.len(),
            file_path.as_ref()
        );
        Ok(store)
    }

    /// Loads the FASTA content provided by `r`, which may be gzipped.
    pub fn from_reader(r: impl Read + 'static) -> anyhow::Result<FastaSequenceStore> {
        let mut reader = get_noodles_reader_from_reader(r)?;
        FastaSequenceStore::from_fasta_reader(&mut reader)
    }

    fn from_fasta_reader<T: BufRead>(
        rdr: &mut fasta::Reader<T>,
    ) -> anyhow::Result<FastaSequenceStore> {
        let mut sequences = HashMap::new();
        let mut seqname = Vec::new();
        let mut seqlengths = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let name = record_name(&record)?;
            if sequences.contains_key(&name) {
                bail!("The reference contains more than one sequence named {}", name);
            }
            seqname.push(name.clone());
            seqlengths.push(record.sequence().len());
            sequences.insert(name, record.sequence().clone());
        }
        Ok(FastaSequenceStore {
            sequences,
            seqinfo: SeqInfo::new(seqname, seqlengths, None)?,
        })
    }

    /// Renames every sequence into the given chromosome naming convention.
    pub fn with_chrom_style(self, style: ChromStyle) -> anyhow::Result<FastaSequenceStore> {
        let mut sequences = HashMap::with_capacity(self.sequences.len());
        for (name, seq) in self.sequences {
            let name = normalize_chrom(&name, style);
            if sequences.insert(name.clone(), seq).is_some() {
                bail!(
                    "Sequences {} collide after converting chromosome names to the {:?} style",
                    name,
                    style.prefix()
                );
            }
        }
        let seqname = self
            .seqinfo
            .seqname
            .iter()
            .map(|s| normalize_chrom(s, style))
            .collect();
        debug!("converted reference sequence names to the {} style", style);
        Ok(FastaSequenceStore {
            sequences,
            seqinfo: SeqInfo::new(seqname, self.seqinfo.seqlengths, self.seqinfo.genome)?,
        })
    }

    pub fn seqinfo(&self) -> &SeqInfo {
        &self.seqinfo
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl SequenceSource for FastaSequenceStore {
    fn chrom_len(&self, chrom: &str) -> Option<u64> {
        self.seqinfo.seqlength(chrom).map(|l| l as u64)
    }

    fn fetch(&self, window: &GenomicInterval) -> Result<String, AnnotationError> {
        let seq = self
            .sequences
            .get(window.chrom())
            .ok_or_else(|| AnnotationError::MissingSequence {
                chrom: window.chrom().to_string(),
            })?;
        let invalid = || AnnotationError::InvalidSequence {
            locus: window.to_locus_string(),
        };

        // noodles positions are 1-based and closed
        let start = Position::try_from(window.start() as usize + 1).map_err(|_| invalid())?;
        let end = Position::try_from(window.end() as usize).map_err(|_| invalid())?;
        let slice = seq.slice(start..=end).ok_or_else(invalid)?;
        let slice = Sequence::from(slice.as_ref().to_ascii_uppercase());

        let slice = match window.strand() {
            Strand::Positive => slice,
            Strand::Negative => slice
                .complement()
                .rev()
                .collect::<Result<Sequence, _>>()
                .map_err(|_| invalid())?,
        };
        Ok(String::from_utf8_lossy(slice.as_ref()).into_owned())
    }
}
