//! Near-duplicate detection for source code.
//!
//! Documents are reduced to MinHash signatures over character shingles,
//! banded into an LSH index to shortlist likely pairs, and the shortlist
//! (or every pair) is scored by a precise [`compare::Comparator`].

pub mod batch;
pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;
pub mod estimator;
pub mod index;
pub mod lsh;
pub mod report;
pub mod signature;

pub use batch::{BatchComparator, BatchOptions, BatchReport, SourceFile, Strategy};
pub use compare::{Comparator, SequenceComparator, Verdict};
pub use error::{CopycatError, Result};
pub use index::{CandidateIndex, CandidatePair, DocId, Document, IndexConfig};
pub use signature::{Signature, SignatureGenerator};
