//! Load filer records from CSV input data

use std::error::Error;
use std::path::Path;

use csv::Reader;
use log::info;

use super::{RawRecord, Records};

/// Load a filer table from a CSV file. Column headers must match the
/// [`RawRecord`] field names; missing columns default to zero.
pub fn load_records<P: AsRef<Path>>(path: P, data_year: u32) -> Result<Records, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    from_csv_reader(reader, data_year)
}

/// Load filer records from any reader (e.g., string buffer, network stream).
pub fn load_records_from_reader<R: std::io::Read>(
    reader: R,
    data_year: u32,
) -> Result<Records, Box<dyn Error>> {
    from_csv_reader(Reader::from_reader(reader), data_year)
}

fn from_csv_reader<R: std::io::Read>(
    mut reader: Reader<R>,
    data_year: u32,
) -> Result<Records, Box<dyn Error>> {
    let mut raw = Vec::new();
    for result in reader.deserialize() {
        let rec: RawRecord = result?;
        raw.push(rec);
    }
    let table = Records::from_raw(raw, data_year)?;
    info!(
        "loaded {} filing units describing calendar year {}",
        table.len(),
        data_year
    );
    Ok(table)
}
