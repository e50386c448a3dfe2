//! Generator and parser for the four sector configuration region used by
//! `esp-cfg-store`.
//!
//! Images can be flashed at the region's base sector at build time, so the
//! device boots with a provisioned configuration instead of the compiled-in
//! defaults.

pub mod error;
pub mod image;

mod table;

use std::fs;
use std::io::Write;
use std::path::Path;

pub use error::Error;
pub use esp_cfg_store::{
    ConfigRecord,
    FlagState,
    Slot,
};
pub use image::{
    FLASH_SECTOR_SIZE,
    IMAGE_SIZE,
};
pub use table::Field;

/// Generate a region image holding `record` in slot A with the flag
/// committing slot A.
pub fn generate_image(record: &ConfigRecord) -> Result<Vec<u8>, Error> {
    image::generate_image_data(record)
}

/// Generate a region image and write it to `path`.
pub fn generate_image_file<P: AsRef<Path>>(record: &ConfigRecord, path: P) -> Result<(), Error> {
    let data = generate_image(record)?;
    fs::File::create(path)?.write_all(&data)?;
    Ok(())
}

/// Parse `field,value` CSV content into a record.
///
/// Fields not present in the CSV keep their compiled-in defaults; the default
/// device id and topic are derived from `chip_id`.
pub fn record_from_csv(content: &str, chip_id: u32) -> Result<ConfigRecord, Error> {
    table::parser::parse_csv(content, chip_id)
}

/// Parse a `field,value` CSV file into a record. See [`record_from_csv`].
pub fn record_from_csv_file<P: AsRef<Path>>(path: P, chip_id: u32) -> Result<ConfigRecord, Error> {
    let content = fs::read_to_string(path)?;
    record_from_csv(&content, chip_id)
}

/// Serialize a record to CSV and return the content as a `String`.
pub fn record_to_csv(record: &ConfigRecord) -> Result<String, Error> {
    table::writer::write_csv_content(record)
}

/// Serialize a record to a CSV file at the given `path`.
pub fn record_to_csv_file<P: AsRef<Path>>(record: &ConfigRecord, path: P) -> Result<(), Error> {
    table::writer::write_csv(record, path)
}

/// A region image as read back from a device or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImage {
    /// The state of the flag sector.
    pub flag: FlagState,
    /// The slot the record was found in.
    pub slot: Slot,
    /// The record the device will load.
    pub record: ConfigRecord,
}

impl ParsedImage {
    /// Parse a region image from an in-memory byte slice.
    ///
    /// Fails with [`Error::NoValidRecord`] if neither slot holds a record, in
    /// which case the device would fall back to its compiled-in defaults.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        image::parse_image_data(data)
    }

    /// Parse a region image file at the given `path`.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// `false` if the image was left behind by an interrupted save.
    pub fn is_committed(&self) -> bool {
        self.flag == FlagState::Committed(self.slot)
    }
}
