//! Output writers and safe file replacement.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use salespilot_core::pipeline::summary::Summary;
use salespilot_core::CanonicalRecord;

/// Render records as CSV with a header row, columns in `order`.
pub fn records_csv(records: &[CanonicalRecord], order: &[&str]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(order)?;
    for record in records {
        wtr.write_record(record.row(order))?;
    }
    Ok(wtr.into_inner()?)
}

/// Render records as a pretty JSON array of objects keyed by column header,
/// keys in `order`.
pub fn records_json(records: &[CanonicalRecord], order: &[&str]) -> anyhow::Result<Vec<u8>> {
    let rows: Vec<_> = records.iter().map(|r| r.in_order(order)).collect();
    Ok(serde_json::to_vec_pretty(&rows)?)
}

/// Render summary tables as one CSV, one block per table with a total row.
pub fn summaries_csv(summaries: &[Summary]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Table", "Group", "Ventas", "Utilidad", "Gastos", "# de Orden"])?;

    for summary in summaries {
        for row in summary.rows.iter().chain(std::iter::once(&summary.total())) {
            wtr.write_record([
                summary.name.clone(),
                row.group.clone(),
                format!("{:.2}", row.sales.round_dp(2)),
                format!("{:.2}", row.profit.round_dp(2)),
                format!("{:.2}", row.costs.round_dp(2)),
                row.orders.to_string(),
            ])?;
        }
    }
    Ok(wtr.into_inner()?)
}

/// Write `contents` to `target` through a temp sibling.
///
/// If the temp file cannot replace the target (e.g. it is open in another
/// program), it is kept under a timestamped name instead. Returns the path
/// actually written.
pub fn safe_write(target: &Path, contents: &[u8]) -> anyhow::Result<PathBuf> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = sibling(target, "tmp", '.');
    fs::write(&tmp, contents)?;

    match fs::rename(&tmp, target) {
        Ok(()) => {
            debug!("Wrote {}", target.display());
            Ok(target.to_path_buf())
        }
        Err(e) => {
            let alt = sibling(target, &Utc::now().timestamp().to_string(), '_');
            warn!("Could not replace {}: {}", target.display(), e);
            fs::rename(&tmp, &alt)?;
            Ok(alt)
        }
    }
}

/// `dir/stem{sep}{tag}.ext`
fn sibling(target: &Path, tag: &str, sep: char) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{stem}{sep}{tag}.{}", ext.to_string_lossy()),
        None => format!("{stem}{sep}{tag}"),
    };
    target.with_file_name(name)
}
