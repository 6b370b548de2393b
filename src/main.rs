use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use borderou::invoice::InvoiceRecord;
use borderou::ledger::{LedgerWriter, TargetMode};
use borderou::reader;

/// Converts a courier export CSV into a Borderou Centralizator ledger
#[derive(Debug, Parser)]
struct Args {
    /// Invoice CSV exported by the courier portal
    csv: PathBuf,
    /// Destination directory (new ledger) or existing .xlsx file (--append)
    target: PathBuf,
    /// Append to an existing ledger instead of creating one from the template
    #[arg(long)]
    append: bool,
    /// Ledger template a new workbook is created from
    #[arg(
        long,
        default_value = "templates/Borderou Centralizator - MST - EXPORT.xlsx"
    )]
    template: PathBuf,
    /// Print the parsed records as CSV to stdout and write nothing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let import = reader::read_csv(&args.csv)
        .with_context(|| format!("could not read {}", args.csv.display()))?;
    info!(
        "parsed {} records from {} ('{}' scheme)",
        import.records.len(),
        args.csv.display(),
        import.scheme
    );
    if import.defaulted_fields > 0 {
        warn!(
            "{} fields had no usable source column and were left empty",
            import.defaulted_fields
        );
    }

    if args.dry_run {
        return dump_records(&import.records);
    }

    let writer = LedgerWriter::new(&args.template);
    let (mode, target) = if args.append {
        if args.target.extension().and_then(|e| e.to_str()) != Some("xlsx") {
            bail!(
                "append target must be an .xlsx file: {}",
                args.target.display()
            );
        }
        (TargetMode::Append, args.target.clone())
    } else {
        (
            TargetMode::Create,
            versioned_target(writer.resolve_new_target(&args.target)),
        )
    };

    let mut book = writer.open_target(mode, &target)?;
    let summary = book.append_rows(&import.records)?;
    if summary.skipped_cells > 0 {
        warn!(
            "{} cells were dropped: their headers are missing from the target sheet",
            summary.skipped_cells
        );
    }
    book.save(&target)?;

    info!(
        "saved {}: {} records appended starting at sheet row {}",
        target.display(),
        summary.appended,
        summary.first_row + 1
    );
    println!("{} ({} records)", target.display(), summary.appended);
    Ok(())
}

/// Keeps a same-day re-run from destroying the previous output: an existing
/// destination gets a " (2)", " (3)", ... suffix instead of being reused.
fn versioned_target(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    let mut counter = 2u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem} ({counter}).{ext}"),
            None => format!("{stem} ({counter})"),
        };
        let candidate = directory.join(name);
        if !candidate.exists() {
            warn!(
                "{} already exists, writing to {} instead",
                path.display(),
                candidate.display()
            );
            return candidate;
        }
        counter += 1;
    }
}

fn dump_records(records: &[InvoiceRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(std::io::stdout());
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
