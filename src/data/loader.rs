//! CSV loading for listing data.
//!
//! The source is delimited text with a seven-field header
//! (`make,model,price,year,mileage,engine,fuel`). Rows whose year or
//! mileage fall outside the configured valid ranges are dropped at
//! load time, before any training sees them.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::error::DataError;
use super::record::Record;
use super::table::RecordTable;

/// Options controlling CSV parsing and row filtering.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Field delimiter. Default: `,`.
    pub delimiter: u8,
    /// Honor quoted fields. Default: true.
    pub quoting: bool,
    /// Inclusive valid range for `year`; rows outside are dropped.
    pub year_range: Option<(f32, f32)>,
    /// Inclusive valid range for `mileage`; rows outside are dropped.
    pub mileage_range: Option<(f32, f32)>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quoting: true,
            year_range: Some((1980.0, 2018.0)),
            mileage_range: Some((10_000.0, 600_000.0)),
        }
    }
}

impl LoaderOptions {
    /// Options that parse everything and filter nothing.
    pub fn unfiltered() -> Self {
        Self {
            year_range: None,
            mileage_range: None,
            ..Self::default()
        }
    }

    fn keeps(&self, record: &Record) -> bool {
        let in_range = |range: Option<(f32, f32)>, value: f32| match range {
            Some((lo, hi)) => value >= lo && value <= hi,
            None => true,
        };
        in_range(self.year_range, record.year) && in_range(self.mileage_range, record.mileage)
    }
}

/// Load a listing file from disk.
pub fn load_csv(path: impl AsRef<Path>, options: &LoaderOptions) -> Result<RecordTable, DataError> {
    let file = File::open(path)?;
    read_records(BufReader::new(file), options)
}

/// Read listing records from any reader.
///
/// The first line must be the header. Numeric fields must parse as
/// finite floats; NaN or infinite values are rejected rather than
/// carried into training.
pub fn read_records<R: Read>(reader: R, options: &LoaderOptions) -> Result<RecordTable, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .quoting(options.quoting)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.deserialize::<Record>().enumerate() {
        let record = result?;
        validate_numeric_fields(&record, row)?;
        if options.keeps(&record) {
            records.push(record);
        }
    }
    Ok(RecordTable::new(records))
}

fn validate_numeric_fields(record: &Record, row: usize) -> Result<(), DataError> {
    let checks: [(&'static str, f32); 3] = [
        ("price", record.price),
        ("year", record.year),
        ("mileage", record.mileage),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(DataError::NonFiniteField { row, field });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
make,model,price,year,mileage,engine,fuel
bmw,320d,45000,2014,150000,2.0,Diesel
opel,astra,18500,2010,160000,1.6,Benzyna
ford,ka,4000,1975,90000,1.3,Benzyna
audi,a4,31000,2013,700000,1.9,Diesel
";

    #[test]
    fn parses_header_and_rows() {
        let table = read_records(SAMPLE.as_bytes(), &LoaderOptions::unfiltered()).unwrap();
        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.records()[0].make, "bmw");
        assert_eq!(table.records()[1].price, 18_500.0);
    }

    #[test]
    fn default_options_drop_out_of_range_rows() {
        // 1975 is before the valid year window, 700000 km beyond mileage.
        let table = read_records(SAMPLE.as_bytes(), &LoaderOptions::default()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.text_column("make").unwrap(), vec!["bmw", "opel"]);
    }

    #[test]
    fn custom_delimiter_and_quoting() {
        let semicolons = "\
make;model;price;year;mileage;engine;fuel
bmw;\"320d; xDrive\";45000;2014;150000;2.0;Diesel
";
        let options = LoaderOptions {
            delimiter: b';',
            ..LoaderOptions::unfiltered()
        };
        let table = read_records(semicolons.as_bytes(), &options).unwrap();
        assert_eq!(table.records()[0].model, "320d; xDrive");
    }

    #[test]
    fn malformed_numeric_field_is_a_csv_error() {
        let bad = "\
make,model,price,year,mileage,engine,fuel
bmw,320d,not-a-price,2014,150000,2.0,Diesel
";
        let err = read_records(bad.as_bytes(), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }
}
