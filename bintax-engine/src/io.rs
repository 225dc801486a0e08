//! Tab-separated input and output tables
//!
//! The column contract is the stable interface surface for collaborating
//! tools: `processid`, one column per configured rank, `bin_uri`, and an
//! optional numeric `n` weight column. Empty cells and the literal `None`
//! are read as missing labels.

use std::path::Path;

use bintax_core::{
    BinLineage, BinUri, BintaxError, BintaxResult, PartialLineage, RankSet, RawRecord, Record,
    RecordId,
};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

fn is_null(value: &str) -> bool {
    value.is_empty() || value == "None"
}

fn column_index(headers: &StringRecord, name: &str) -> BintaxResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| BintaxError::Parse(format!("missing column '{name}'")))
}

/// Read occurrence records from a TSV file
pub fn read_records(path: impl AsRef<Path>, ranks: &RankSet) -> BintaxResult<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path.as_ref())?;
    let headers = reader.headers()?.clone();

    let id_col = column_index(&headers, "processid")?;
    let bin_col = column_index(&headers, "bin_uri")?;
    let rank_cols: Vec<usize> = ranks
        .names()
        .iter()
        .map(|r| column_index(&headers, r))
        .collect::<BintaxResult<_>>()?;
    let weight_col = headers.iter().position(|h| h == "n");

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let labels = rank_cols
            .iter()
            .map(|&c| {
                let value = row.get(c).unwrap_or("");
                (!is_null(value)).then(|| value.to_string())
            })
            .collect();
        let bin_value = row.get(bin_col).unwrap_or("");
        let bin = (!is_null(bin_value)).then(|| BinUri::new(bin_value));
        let weight = match weight_col {
            Some(c) => {
                let value = row.get(c).unwrap_or("");
                if is_null(value) {
                    1
                } else {
                    value.parse().map_err(|_| {
                        BintaxError::Parse(format!("invalid weight '{value}' in column 'n'"))
                    })?
                }
            }
            None => 1,
        };
        records.push(RawRecord {
            id: RecordId::new(row.get(id_col).unwrap_or("")),
            bin,
            lineage: PartialLineage::new(labels),
            weight,
        });
    }
    Ok(records)
}

/// Write filled occurrence records to a TSV file
pub fn write_records(
    path: impl AsRef<Path>,
    records: &[Record],
    ranks: &RankSet,
) -> BintaxResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path.as_ref())?;

    let mut header = vec!["processid".to_string()];
    header.extend(ranks.names().iter().cloned());
    header.push("bin_uri".to_string());
    header.push("n".to_string());
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.id.as_str().to_string()];
        row.extend(record.lineage.labels().iter().cloned());
        row.push(
            record
                .bin
                .as_ref()
                .map(|b| b.as_str().to_string())
                .unwrap_or_default(),
        );
        row.push(record.weight.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a per-BIN lineage table (consensus output or baseline)
///
/// Every rank column must carry a label; a missing label here is malformed
/// input, not a fillable gap.
pub fn read_lineage_table(
    path: impl AsRef<Path>,
    ranks: &RankSet,
) -> BintaxResult<Vec<BinLineage>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path.as_ref())?;
    let headers = reader.headers()?.clone();

    let bin_col = column_index(&headers, "bin_uri")?;
    let rank_cols: Vec<usize> = ranks
        .names()
        .iter()
        .map(|r| column_index(&headers, r))
        .collect::<BintaxResult<_>>()?;

    let mut table = Vec::new();
    for result in reader.records() {
        let row = result?;
        let bin_value = row.get(bin_col).unwrap_or("");
        if is_null(bin_value) {
            return Err(BintaxError::Parse("row without bin_uri".to_string()));
        }
        let labels = rank_cols
            .iter()
            .map(|&c| {
                let value = row.get(c).unwrap_or("");
                if is_null(value) {
                    Err(BintaxError::Parse(format!(
                        "missing rank label for BIN '{bin_value}'"
                    )))
                } else {
                    Ok(value.to_string())
                }
            })
            .collect::<BintaxResult<Vec<String>>>()?;
        table.push(BinLineage {
            bin: BinUri::new(bin_value),
            lineage: bintax_core::Lineage::new(labels),
        });
    }
    Ok(table)
}

/// Write a per-BIN lineage table to a TSV file
pub fn write_lineage_table(
    path: impl AsRef<Path>,
    table: &[BinLineage],
    ranks: &RankSet,
) -> BintaxResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path.as_ref())?;

    let mut header: Vec<String> = ranks.names().to_vec();
    header.push("bin_uri".to_string());
    writer.write_record(&header)?;

    for row in table {
        let mut cells: Vec<String> = row.lineage.labels().to_vec();
        cells.push(row.bin.as_str().to_string());
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}
