//! Core types for bintax
//!
//! Shared vocabulary for the consensus and lineage-reconciliation engine:
//! rank schemas, lineages, occurrence records, the error enum, and run
//! configuration. Algorithmic logic lives in `bintax-engine`.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ConsensusConfig, ConsensusMethod};
pub use error::{BintaxError, BintaxResult};
pub use types::{
    is_placeholder, BinLineage, BinUri, Lineage, PartialLineage, RankSet, RawRecord, Record,
    RecordId,
};
