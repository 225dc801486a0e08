//! Placeholder filling for partially classified records
//!
//! Walks ranks in parent -> child order and propagates a deterministic
//! placeholder chain from the last known ancestor downward: a fresh chain
//! appends `_X` to the ancestor label, an existing chain is extended with a
//! single `X` (`Insecta` -> `Insecta_X` -> `Insecta_XX`). A genuine label
//! resets the chain.

use bintax_core::types::extend_placeholder;
use bintax_core::{
    BintaxError, BintaxResult, Lineage, PartialLineage, RankSet, RawRecord, Record,
};

/// Fill all missing rank labels of one lineage
///
/// `record` is only used to report which record violated data integrity.
/// A missing root label is a malformed record, not a resolvable ambiguity,
/// and fails with [`BintaxError::MissingRootLabel`].
pub fn fill_lineage(
    lineage: &PartialLineage,
    ranks: &RankSet,
    record: &str,
) -> BintaxResult<Lineage> {
    if ranks.is_empty() {
        return Err(BintaxError::InsufficientRanks);
    }
    if lineage.len() != ranks.len() {
        return Err(BintaxError::RankMismatch {
            expected: ranks.len(),
            found: lineage.len(),
        });
    }

    let mut labels: Vec<String> = Vec::with_capacity(ranks.len());
    for index in 0..ranks.len() {
        match lineage.label(index) {
            Some(label) => labels.push(label.to_string()),
            None if index == 0 => {
                return Err(BintaxError::MissingRootLabel {
                    record: record.to_string(),
                    rank: ranks.name(0).to_string(),
                });
            }
            None => {
                let parent = &labels[index - 1];
                labels.push(extend_placeholder(parent));
            }
        }
    }
    Ok(Lineage::new(labels))
}

/// Fill one record, keeping identifier, BIN and weight
pub fn fill_record(raw: RawRecord, ranks: &RankSet) -> BintaxResult<Record> {
    let lineage = fill_lineage(&raw.lineage, ranks, raw.id.as_str())?;
    Ok(Record {
        id: raw.id,
        bin: raw.bin,
        lineage,
        weight: raw.weight,
    })
}

/// Fill a whole table of records
pub fn fill_records(raw: Vec<RawRecord>, ranks: &RankSet) -> BintaxResult<Vec<Record>> {
    raw.into_iter().map(|r| fill_record(r, ranks)).collect()
}
