use getset::Getters;
use serde::Serialize;

/// One shipment line extracted from a courier export CSV.
///
/// Every field carries raw trimmed text. The upstream export tools disagree
/// on date and number formats, so nothing is coerced here; the ledger wants
/// the values exactly as exported.
#[derive(Debug, Default, Clone, PartialEq, Eq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct InvoiceRecord {
    awb: String,
    date: String,
    exporter_name: String,
    exporter_address: String,
    exporter_city: String,
    exporter_country: String,
    exporter_postal_code: String,
    importer_name: String,
    importer_address: String,
    importer_city: String,
    importer_country: String,
    importer_postal_code: String,
    goods_description: String,
    value: String,
    currency: String,
    number_of_packages: String,
    weight_gross: String,
    country_itinerary_codes: String,
}

/// Fields that can be populated straight from a CSV column.
///
/// `country_itinerary_codes` has no variant: it is always derived from the
/// exporter and importer countries, never read from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Awb,
    Date,
    ExporterName,
    ExporterAddress,
    ExporterCity,
    ExporterCountry,
    ExporterPostalCode,
    ImporterName,
    ImporterAddress,
    ImporterCity,
    ImporterCountry,
    ImporterPostalCode,
    GoodsDescription,
    Value,
    Currency,
    NumberOfPackages,
    WeightGross,
}

impl InvoiceRecord {
    pub(crate) fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Awb => self.awb = value,
            Field::Date => self.date = value,
            Field::ExporterName => self.exporter_name = value,
            Field::ExporterAddress => self.exporter_address = value,
            Field::ExporterCity => self.exporter_city = value,
            Field::ExporterCountry => self.exporter_country = value,
            Field::ExporterPostalCode => self.exporter_postal_code = value,
            Field::ImporterName => self.importer_name = value,
            Field::ImporterAddress => self.importer_address = value,
            Field::ImporterCity => self.importer_city = value,
            Field::ImporterCountry => self.importer_country = value,
            Field::ImporterPostalCode => self.importer_postal_code = value,
            Field::GoodsDescription => self.goods_description = value,
            Field::Value => self.value = value,
            Field::Currency => self.currency = value,
            Field::NumberOfPackages => self.number_of_packages = value,
            Field::WeightGross => self.weight_gross = value,
        }
    }

    /// Recomputes the itinerary code pair. Called once per record, after all
    /// plain fields are in.
    pub(crate) fn derive_itinerary(&mut self) {
        self.country_itinerary_codes =
            format!("{};{}", self.exporter_country, self.importer_country);
    }
}
