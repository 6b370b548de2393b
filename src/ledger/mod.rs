//! Ledger side of the conversion: opens the destination workbook (fresh
//! from the template or an existing file), locates the table by header
//! content and appends invoice records by header name.
//!
//! Reading and inspection go through `calamine`; writing goes through
//! `edit_xlsx`, which edits the workbook in place and keeps the template's
//! styles intact.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Reader};
use chrono::{Local, NaiveDate};
use edit_xlsx::Write as _;
use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::invoice::InvoiceRecord;

pub mod layout;

use layout::{SheetLayout, ANCHOR_HEADER};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),
    #[error("target file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("could not read workbook {path}: {reason}")]
    UnreadableFormat { path: PathBuf, reason: String },
    #[error("header '{0}' not found in any sheet row")]
    HeaderNotFound(String),
    #[error("workbook edit failed: {0}")]
    Edit(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the destination workbook is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// Load a fresh copy of the bundled template.
    Create,
    /// Open an existing ledger file.
    Append,
}

/// What an append pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub appended: usize,
    /// Zero-based sheet row the first record landed on.
    pub first_row: usize,
    /// Cells dropped because their target header is missing from the sheet.
    pub skipped_cells: usize,
}

/// Writes invoice records into a Borderou Centralizator workbook.
pub struct LedgerWriter {
    template: PathBuf,
}

/// An open destination workbook plus the discovered table layout.
///
/// In CREATE mode this also owns the staged template copy; the real
/// destination file only comes into existence at [`LedgerBook::save`].
pub struct LedgerBook {
    book: edit_xlsx::Workbook,
    sheet: String,
    layout: SheetLayout,
    _staging: Option<NamedTempFile>,
}

const TARGET_STEM: &str = "_Borderou Centralizator - MST - EXPORT";

impl LedgerWriter {
    pub fn new(template: impl Into<PathBuf>) -> LedgerWriter {
        LedgerWriter {
            template: template.into(),
        }
    }

    /// Opens the destination workbook and locates its table. `path` is the
    /// existing ledger in [`TargetMode::Append`] and ignored in
    /// [`TargetMode::Create`], where a scratch copy of the template is
    /// staged instead.
    pub fn open_target(&self, mode: TargetMode, path: &Path) -> Result<LedgerBook, LedgerError> {
        match mode {
            TargetMode::Create => {
                if !self.template.exists() {
                    return Err(LedgerError::TemplateNotFound(self.template.clone()));
                }
                let staging = tempfile::Builder::new()
                    .prefix("borderou-")
                    .suffix(".xlsx")
                    .tempfile()?;
                fs::copy(&self.template, staging.path())?;
                let book = open_workbook(staging.path())?;
                Ok(LedgerBook {
                    _staging: Some(staging),
                    ..book
                })
            }
            TargetMode::Append => {
                if !path.exists() {
                    return Err(LedgerError::FileNotFound(path.to_path_buf()));
                }
                open_workbook(path)
            }
        }
    }

    /// Destination file name for a freshly created ledger, named by today's
    /// date. Pure: the same day and directory resolve to the same path.
    pub fn resolve_new_target(&self, out_dir: &Path) -> PathBuf {
        self.target_for_date(out_dir, Local::now().date_naive())
    }

    fn target_for_date(&self, out_dir: &Path, date: NaiveDate) -> PathBuf {
        let extension = self
            .template
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("xlsx");
        out_dir.join(format!(
            "{}{}.{}",
            date.format("%Y%m%d"),
            TARGET_STEM,
            extension
        ))
    }
}

impl LedgerBook {
    /// Appends one sheet row per record at the cursor, writing each value
    /// into the column whose header matches its target name. A header
    /// missing from the sheet drops that cell silently; the count of such
    /// drops is reported in the summary.
    pub fn append_rows(&mut self, records: &[InvoiceRecord]) -> Result<AppendSummary, LedgerError> {
        let first_row = self.layout.next_row;
        let mut skipped_cells = 0usize;

        let sheet = self
            .book
            .get_worksheet_mut_by_name(&self.sheet)
            .map_err(|e| LedgerError::Edit(e.to_string()))?;

        for record in records {
            for (header, value) in target_cells(record) {
                let Some(&column) = self.layout.columns.get(header) else {
                    debug!("target sheet has no '{header}' column, dropping value");
                    skipped_cells += 1;
                    continue;
                };
                let cell = cell_ref(self.layout.next_row, column);
                sheet
                    .write_string(&cell, value.to_string())
                    .map_err(|e| LedgerError::Edit(e.to_string()))?;
            }
            self.layout.next_row += 1;
        }

        Ok(AppendSummary {
            appended: records.len(),
            first_row,
            skipped_cells,
        })
    }

    /// Serializes the workbook to `path`, overwriting any existing file.
    pub fn save(mut self, path: &Path) -> Result<(), LedgerError> {
        self.book
            .save_as(path)
            .map_err(|e| LedgerError::Edit(e.to_string()))?;
        Ok(())
    }
}

fn open_workbook(path: &Path) -> Result<LedgerBook, LedgerError> {
    let unreadable = |reason: String| LedgerError::UnreadableFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mut source = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let sheet = source
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| unreadable("workbook has no sheets".to_string()))?;
    let range = source
        .worksheet_range(&sheet)
        .map_err(|e| unreadable(e.to_string()))?;
    let layout = SheetLayout::discover(&range, ANCHOR_HEADER)?;

    let book = edit_xlsx::Workbook::from_path(path).map_err(|e| unreadable(e.to_string()))?;
    Ok(LedgerBook {
        book,
        sheet,
        layout,
        _staging: None,
    })
}

/// Destination header for each record field, paired with its value. The
/// transport-payment column has no source field and is always written
/// empty. Header text must match the sheet exactly, diacritics included.
fn target_cells(record: &InvoiceRecord) -> [(&'static str, &str); 19] {
    [
        ("Nr. Document transport unic AWB", record.awb().as_str()),
        ("Data", record.date().as_str()),
        ("Nume Expeditor/Exportator", record.exporter_name().as_str()),
        (
            "Strada si numarul Expeditor/Exportator",
            record.exporter_address().as_str(),
        ),
        ("Orasul Expeditor/Exportator", record.exporter_city().as_str()),
        (
            "Codul postal Expeditor/Exportator",
            record.exporter_postal_code().as_str(),
        ),
        ("Tara Expeditor/Exportator", record.exporter_country().as_str()),
        ("Nume Destinatar/Importator", record.importer_name().as_str()),
        (
            "Strada si numarul Destinatar/Importator",
            record.importer_address().as_str(),
        ),
        ("Orasul Destinatar/Importator", record.importer_city().as_str()),
        (
            "Codul postal Destinatar/Importator",
            record.importer_postal_code().as_str(),
        ),
        ("Tara Destinatar/Importator", record.importer_country().as_str()),
        ("Descrierea marfurilor", record.goods_description().as_str()),
        ("Valoare", record.value().as_str()),
        ("Moneda", record.currency().as_str()),
        ("Numar de pachete", record.number_of_packages().as_str()),
        (
            "Greutate bruta (kilograme)",
            record.weight_gross().as_str(),
        ),
        ("Metoda de plata a cheltuielilor de transport", ""),
        (
            "Codul tarilor de pe itinerar",
            record.country_itinerary_codes().as_str(),
        ),
    ]
}

fn cell_ref(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row + 1)
}

/// Zero-based column index to its A1-style letter (0→A, 25→Z, 26→AA).
fn column_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = String::new();
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}
