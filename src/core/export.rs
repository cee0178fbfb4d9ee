use crate::core::ledger::Ledger;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::export::{ClaimExport, ExportFormat, ensure_writable, export_csv, export_json};
use crate::ui::messages::warning;
use crate::utils::date::format_date;
use chrono::NaiveDate;
use std::path::Path;

/// Which claims an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSelection {
    /// Claims of one calendar day.
    Day(NaiveDate),
    /// Claims of the trailing N days, today included.
    Window(u32),
}

impl ExportSelection {
    fn describe(&self) -> String {
        match self {
            ExportSelection::Day(d) => format_date(d),
            ExportSelection::Window(n) => format!("last {} day(s)", n),
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write the selected claims (joined with names) to `file`.
    /// Returns the number of exported rows.
    pub fn export(
        ledger: &Ledger,
        format: ExportFormat,
        file: &str,
        selection: ExportSelection,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let entries = match selection {
            ExportSelection::Day(d) => ledger.claims_on(&d)?,
            ExportSelection::Window(days) => ledger.history_window(days)?,
        };

        if entries.is_empty() {
            warning(format!(
                "No claims for {}; writing an empty {} file.",
                selection.describe(),
                format.as_str()
            ));
        }

        let rows: Vec<ClaimExport> = entries.iter().map(ClaimExport::from).collect();
        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        ttlog_quiet(
            ledger.conn(),
            "export",
            file,
            &format!(
                "{} row(s) as {} for {}",
                rows.len(),
                format.as_str(),
                selection.describe()
            ),
        );

        Ok(rows.len())
    }
}
