//! Content-driven discovery of the ledger table inside a sheet.
//!
//! Templates move their preamble around between revisions, so nothing here
//! works from fixed offsets: the header row is wherever the anchor text is
//! found, and everything else is indexed relative to it.

use std::collections::HashMap;

use calamine::{Data, DataType, Range};

use super::LedgerError;

/// Header text that anchors the table. Its row is the header row and its
/// column is the key column whose non-blank cells delimit existing data.
pub const ANCHOR_HEADER: &str = "Nr. Document transport unic AWB";

/// Position of the ledger table inside a sheet.
#[derive(Debug)]
pub struct SheetLayout {
    /// Zero-based sheet row holding the column headers.
    pub header_row: usize,
    /// Trimmed header text to zero-based column index; a duplicated header
    /// keeps its last occurrence.
    pub columns: HashMap<String, usize>,
    /// Column scanned for existing data (the anchor's column).
    pub key_column: usize,
    /// Zero-based row where the next appended record goes.
    pub next_row: usize,
}

impl SheetLayout {
    /// Scans rows top-to-bottom, cells left-to-right, for the first cell
    /// whose trimmed text equals `anchor`, then indexes the table relative
    /// to that row. Coordinates honor the range origin, so sheets whose
    /// populated extent does not start at A1 still resolve correctly.
    pub fn discover(range: &Range<Data>, anchor: &str) -> Result<SheetLayout, LedgerError> {
        let (origin_row, origin_col) = match range.start() {
            Some((row, col)) => (row as usize, col as usize),
            None => return Err(LedgerError::HeaderNotFound(anchor.to_string())),
        };

        let mut header_offset = None;
        'scan: for (offset, row) in range.rows().enumerate() {
            for cell in row {
                if text(cell) == anchor {
                    header_offset = Some(offset);
                    break 'scan;
                }
            }
        }
        let Some(header_offset) = header_offset else {
            return Err(LedgerError::HeaderNotFound(anchor.to_string()));
        };
        let header_row = origin_row + header_offset;

        let mut columns = HashMap::new();
        if let Some(row) = range.rows().nth(header_offset) {
            for (offset, cell) in row.iter().enumerate() {
                let name = text(cell);
                if !name.is_empty() {
                    columns.insert(name, origin_col + offset);
                }
            }
        }
        let key_column = columns
            .get(anchor)
            .copied()
            .ok_or_else(|| LedgerError::HeaderNotFound(anchor.to_string()))?;

        // The cursor lands one past the last row with a non-blank key cell;
        // blank key cells in between do not stop the scan.
        let mut next_row = header_row + 1;
        for (offset, row) in range.rows().enumerate().skip(header_offset + 1) {
            let populated = row
                .get(key_column - origin_col)
                .map(|cell| !text(cell).is_empty())
                .unwrap_or(false);
            if populated {
                next_row = origin_row + offset + 1;
            }
        }

        Ok(SheetLayout {
            header_row,
            columns,
            key_column,
            next_row,
        })
    }
}

fn text(cell: &Data) -> String {
    cell.as_string().unwrap_or_default().trim().to_string()
}
