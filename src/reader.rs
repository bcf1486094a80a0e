pub mod fasta;
pub mod polyadb;
pub use fasta::{FastaSequenceStore, SeqInfo, SequenceSource};
pub use polyadb::{read_polyadb, sites_from_dataframe};
