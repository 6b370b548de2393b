//! Conversion of courier export CSV files into a "Borderou Centralizator"
//! spreadsheet ledger.
//!
//! The [`reader`] module maps the semi-structured CSV exports onto
//! [`invoice::InvoiceRecord`]s; the [`ledger`] module projects those records
//! onto the ledger workbook by matching header text rather than fixed
//! column positions.

pub mod invoice;
pub mod ledger;
pub mod reader;
