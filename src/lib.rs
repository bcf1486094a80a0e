//! pasranges annotates poly-adenylation sites (PAS) as genomic ranges. It reads the sites of a
//! [PolyA_DB](https://exon.apps.wistar.org/PolyA_DB/) export, flags the most expressed site of every
//! gene, packs the site annotations into the name of each interval and locates the signal hexamers
//! of every site within a strand-aware window upstream of it. The result is a table of annotated
//! PAS and hexamer intervals, ready to be joined against variants or other features, that can be
//! turned into a [Polars](https://pola.rs/) data frame.
//!
//! All intervals use 0-based, half-open coordinates. The 1-based positions of the database are
//! converted when the sites are read.

pub mod codec;
pub mod error;
pub mod motif;
pub mod options;
pub mod pasranges_info;
pub mod pasranges_utils;
pub mod pipeline;
pub mod reader;
pub mod selector;
pub use error::AnnotationError;
pub use options::{AnnotationConfig, AnnotationSchema, ChromStyle, SignalTable, Strand};
pub use pasranges_info::{AnnotatedInterval, GenomicInterval, SiteRecord};
pub use pipeline::{annotate, annotate_files, AnnotationReport, PipelineStats};
