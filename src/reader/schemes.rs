//! Header-scheme descriptors for the known CSV export variants.
//!
//! A scheme is a plain data table: one extraction rule per record field,
//! naming the header(s) that may carry it and how the matched cell is read.
//! Supporting another export variant means adding a table here, nothing
//! else.

use std::collections::HashMap;

use crate::invoice::Field;

/// How a field's value is pulled out of its source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The whole trimmed cell.
    Cell,
    /// The nth whitespace-separated token (zero-based).
    Token(usize),
    /// The last whitespace-separated token.
    LastToken,
}

/// One extraction rule: the field it fills, the candidate header names that
/// may carry it (first match wins), and how to read the matched cell.
#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pub headers: &'static [&'static str],
    pub extract: Extract,
}

/// A named set of CSV column headers and extraction rules.
#[derive(Debug)]
pub struct HeaderScheme {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

impl HeaderScheme {
    /// Number of rules whose header is present in the given column map.
    fn matches(&self, columns: &HashMap<String, usize>) -> usize {
        self.rules
            .iter()
            .filter(|rule| rule.headers.iter().any(|h| columns.contains_key(*h)))
            .count()
    }
}

/// Picks the scheme whose headers best cover the column map, if any rule
/// of any scheme matched at all.
pub fn detect(columns: &HashMap<String, usize>) -> Option<&'static HeaderScheme> {
    KNOWN_SCHEMES
        .iter()
        .map(|scheme| (*scheme, scheme.matches(columns)))
        .filter(|(_, hits)| *hits > 0)
        .max_by_key(|(_, hits)| *hits)
        .map(|(scheme, _)| scheme)
}

pub static KNOWN_SCHEMES: &[&HeaderScheme] = &[&LONG_FORM, &SHORT_CODE];

/// The localized full-phrase export. One column per field; the shipment
/// date is published under the `Stat expeditor` header in this variant.
pub static LONG_FORM: HeaderScheme = HeaderScheme {
    name: "long-form",
    rules: &[
        FieldRule {
            field: Field::Awb,
            headers: &["Număr de urmărire expediere"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Date,
            headers: &["Stat expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterName,
            headers: &["Companie sau nume expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterAddress,
            headers: &["Linie adresă 1 pentru expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterCity,
            headers: &["Oraș expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterCountry,
            headers: &["Țară expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterPostalCode,
            headers: &["Cod poștal expeditor"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterName,
            headers: &["Destinatar – Companie sau nume"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterAddress,
            headers: &["Destinație expediere – Linie adresă 1"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterCity,
            headers: &["Destinatar – Localitate"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterCountry,
            headers: &["Țară sau teritoriu destinatar"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterPostalCode,
            headers: &["Cod poștal destinatar"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::GoodsDescription,
            headers: &["Descriere bunuri"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Value,
            headers: &["Totaluri linie factură"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Currency,
            headers: &["Cod monedă"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::NumberOfPackages,
            headers: &["Nr. colete din expediere"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::WeightGross,
            headers: &["Greutate reală expediere"],
            extract: Extract::Cell,
        },
    ],
};

/// The abbreviated export. Country and postal code are not separate
/// columns: `DIR3S` carries `<postal> <country>` for the exporter, and the
/// last token of `DIR3` is the importer country. No column carries the
/// importer postal code in this variant.
pub static SHORT_CODE: HeaderScheme = HeaderScheme {
    name: "short-code",
    rules: &[
        FieldRule {
            field: Field::Awb,
            headers: &["TRACKING"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Date,
            headers: &["DATE"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterName,
            headers: &["EXPORTER"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterAddress,
            headers: &["DIR1S"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterCity,
            headers: &["DIR2S"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ExporterPostalCode,
            headers: &["DIR3S"],
            extract: Extract::Token(0),
        },
        FieldRule {
            field: Field::ExporterCountry,
            headers: &["DIR3S"],
            extract: Extract::Token(1),
        },
        FieldRule {
            field: Field::ImporterName,
            headers: &["IMPORTER"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterAddress,
            headers: &["DIR1"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterCity,
            headers: &["DIR2"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::ImporterCountry,
            headers: &["DIR3"],
            extract: Extract::LastToken,
        },
        FieldRule {
            field: Field::GoodsDescription,
            headers: &["DESCRIPTION"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Value,
            headers: &["VALUE"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::Currency,
            headers: &["CURRENCY"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::NumberOfPackages,
            headers: &["PARTS"],
            extract: Extract::Cell,
        },
        FieldRule {
            field: Field::WeightGross,
            headers: &["WEIGHT"],
            extract: Extract::Cell,
        },
    ],
};
