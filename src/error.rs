use thiserror::Error;

/// Errors that can occur while loading or saving the configuration record. Marked as
/// non-exhaustive to allow for future additions without breaking the API. A caller would
/// usually only need to handle FlashError, everything else points at a misconfiguration.
#[derive(Error, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The four sectors of the region don't fit into the flash
    #[error("invalid region")]
    InvalidRegion,

    /// A single erase sector has to be able to hold the whole record
    #[error("sector too small")]
    SectorTooSmall,

    /// The internal error value is returned from the provided `&mut impl NorFlash`. Also
    /// returned for every write attempt after a previous flash error.
    #[error("internal flash error")]
    FlashError,

    /// String fields hold their capacity minus one byte for the null terminator.
    #[error("value too long")]
    ValueTooLong,

    /// The null byte terminates string fields and can't be part of a value
    #[error("value contains a null byte")]
    ContainsNul,

    /// A string field read back from flash does not contain valid UTF-8
    #[error("invalid utf-8")]
    InvalidUtf8,
}
