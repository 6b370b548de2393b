use anyhow::{bail, Result};
use pretty_assertions::assert_eq;

use super::*;

const LONG_HEADERS: &str = "Număr de urmărire expediere,Stat expeditor,\
Companie sau nume expeditor,Linie adresă 1 pentru expeditor,Oraș expeditor,\
Țară expeditor,Cod poștal expeditor,Destinatar – Companie sau nume,\
Destinație expediere – Linie adresă 1,Destinatar – Localitate,\
Țară sau teritoriu destinatar,Cod poștal destinatar,Descriere bunuri,\
Totaluri linie factură,Cod monedă,Nr. colete din expediere,\
Greutate reală expediere";

const SHORT_HEADERS: &str =
    "TRACKING,DATE,EXPORTER,DIR1S,DIR2S,DIR3S,IMPORTER,DIR1,DIR2,DIR3,\
     DESCRIPTION,VALUE,CURRENCY,PARTS,WEIGHT";

#[test]
fn test_long_form_row() -> Result<()> {
    let csv = format!(
        "{LONG_HEADERS}\n1Z999,05.03.2024,ExpCo SRL,Str. Lunga 10,Cluj,RO,\
         400001,ImpCo GmbH,Hauptstr. 5,Berlin,DE,10115,Electronics,250.00,\
         EUR,3,12.4\n"
    );
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.scheme, "long-form");
    assert_eq!(import.defaulted_fields, 0);
    assert_eq!(import.records.len(), 1);

    let record = &import.records[0];
    assert_eq!(record.awb(), "1Z999");
    assert_eq!(record.date(), "05.03.2024");
    assert_eq!(record.exporter_name(), "ExpCo SRL");
    assert_eq!(record.exporter_address(), "Str. Lunga 10");
    assert_eq!(record.exporter_city(), "Cluj");
    assert_eq!(record.exporter_country(), "RO");
    assert_eq!(record.exporter_postal_code(), "400001");
    assert_eq!(record.importer_name(), "ImpCo GmbH");
    assert_eq!(record.importer_address(), "Hauptstr. 5");
    assert_eq!(record.importer_city(), "Berlin");
    assert_eq!(record.importer_country(), "DE");
    assert_eq!(record.importer_postal_code(), "10115");
    assert_eq!(record.goods_description(), "Electronics");
    assert_eq!(record.value(), "250.00");
    assert_eq!(record.currency(), "EUR");
    assert_eq!(record.number_of_packages(), "3");
    assert_eq!(record.weight_gross(), "12.4");
    assert_eq!(record.country_itinerary_codes(), "RO;DE");

    Ok(())
}

#[test]
fn test_short_code_row() -> Result<()> {
    let csv = format!(
        "{SHORT_HEADERS}\nAWB1,01.01.2024,ExpCo,Street1,CityX,010100 RO,\
         ImpCo,Street2,CityY,Town 420 DE,Widgets,100,EUR,2,5.5\n"
    );
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.scheme, "short-code");
    assert_eq!(import.records.len(), 1);

    let record = &import.records[0];
    assert_eq!(record.awb(), "AWB1");
    assert_eq!(record.date(), "01.01.2024");
    assert_eq!(record.exporter_postal_code(), "010100");
    assert_eq!(record.exporter_country(), "RO");
    assert_eq!(record.importer_country(), "DE");
    assert_eq!(record.importer_postal_code(), "");
    assert_eq!(record.country_itinerary_codes(), "RO;DE");

    Ok(())
}

#[test]
fn test_importer_country_is_last_token() -> Result<()> {
    let csv = format!(
        "{SHORT_HEADERS}\nAWB1,01.01.2024,ExpCo,Street1,CityX,010100 RO,\
         ImpCo,Street2,CityY,Bucharest 077190 RO,Widgets,100,EUR,2,5.5\n"
    );
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.records[0].importer_country(), "RO");

    Ok(())
}

#[test]
fn test_blank_rows_skipped_order_preserved() -> Result<()> {
    let csv = format!(
        "{SHORT_HEADERS}\n\
         AWB1,01.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,EUR,1,1\n\
         ,,,,,,,,,,,,,,\n\
         AWB2,02.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,EUR,1,1\n"
    );
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.records.len(), 2);
    assert_eq!(import.records[0].awb(), "AWB1");
    assert_eq!(import.records[1].awb(), "AWB2");

    Ok(())
}

#[test]
fn test_single_token_combined_field_fails() -> Result<()> {
    let csv = format!(
        "{SHORT_HEADERS}\nAWB1,01.01.2024,ExpCo,S1,C1,010100,ImpCo,S2,C2,\
         X DE,G,1,EUR,1,1\n"
    );
    match read_from(csv.as_bytes()) {
        Err(SchemaError::MalformedField {
            header,
            value,
            expected,
        }) => {
            assert_eq!(header, "DIR3S");
            assert_eq!(value, "010100");
            assert_eq!(expected, 2);
        }
        other => bail!("expected MalformedField, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_empty_combined_field_is_lenient() -> Result<()> {
    // Blank DIR3S: the absent-column policy wins over the split rule.
    let csv = format!(
        "{SHORT_HEADERS}\nAWB1,01.01.2024,ExpCo,S1,C1,,ImpCo,S2,C2,X DE,G,\
         1,EUR,1,1\n"
    );
    let import = read_from(csv.as_bytes())?;

    let record = &import.records[0];
    assert_eq!(record.exporter_postal_code(), "");
    assert_eq!(record.exporter_country(), "");
    assert_eq!(record.country_itinerary_codes(), ";DE");

    Ok(())
}

#[test]
fn test_missing_header_defaults_empty() -> Result<()> {
    // No CURRENCY column at all; the record still comes out.
    let csv = "TRACKING,DATE,EXPORTER,DIR1S,DIR2S,DIR3S,IMPORTER,DIR1,DIR2,\
               DIR3,DESCRIPTION,VALUE,PARTS,WEIGHT\n\
               AWB1,01.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,1,1\n";
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.records.len(), 1);
    assert_eq!(import.records[0].currency(), "");
    assert_eq!(import.defaulted_fields, 1);

    Ok(())
}

#[test]
fn test_short_row_defaults_missing_cells() -> Result<()> {
    let csv = format!("{SHORT_HEADERS}\nAWB1,01.01.2024,ExpCo\n");
    let import = read_from(csv.as_bytes())?;

    let record = &import.records[0];
    assert_eq!(record.awb(), "AWB1");
    assert_eq!(record.exporter_name(), "ExpCo");
    assert_eq!(record.goods_description(), "");
    assert_eq!(record.country_itinerary_codes(), ";");
    assert!(import.defaulted_fields > 0);

    Ok(())
}

#[test]
fn test_header_trailing_spaces_still_match() -> Result<()> {
    let csv = "TRACKING  ,DATE ,EXPORTER,DIR1S,DIR2S,DIR3S,IMPORTER,DIR1,\
               DIR2,DIR3,DESCRIPTION,VALUE,CURRENCY,PARTS,WEIGHT\n\
               AWB1,01.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,\
               EUR,1,1\n";
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.records[0].awb(), "AWB1");
    assert_eq!(import.records[0].date(), "01.01.2024");

    Ok(())
}

#[test]
fn test_duplicate_header_last_wins() -> Result<()> {
    let csv = "TRACKING,TRACKING,DATE\nfirst,second,01.01.2024\n";
    let import = read_from(csv.as_bytes())?;

    assert_eq!(import.records[0].awb(), "second");

    Ok(())
}

#[test]
fn test_empty_input_has_no_header_row() -> Result<()> {
    match read_from(&b""[..]) {
        Err(SchemaError::MissingHeaderRow) => Ok(()),
        other => bail!("expected MissingHeaderRow, got {other:?}"),
    }
}

#[test]
fn test_unrecognized_headers_fail() -> Result<()> {
    match read_from(&b"foo,bar\n1,2\n"[..]) {
        Err(SchemaError::UnknownScheme) => Ok(()),
        other => bail!("expected UnknownScheme, got {other:?}"),
    }
}

#[test]
fn test_rereading_same_input_is_stable() -> Result<()> {
    let csv = format!(
        "{SHORT_HEADERS}\n\
         AWB1,01.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,EUR,1,1\n\
         AWB2,02.01.2024,ExpCo,S1,C1,010100 RO,ImpCo,S2,C2,X DE,G,1,EUR,1,1\n"
    );
    let first = read_from(csv.as_bytes())?;
    let second = read_from(csv.as_bytes())?;

    assert_eq!(first.records, second.records);

    Ok(())
}
