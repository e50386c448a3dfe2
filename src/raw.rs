use crate::platform::{AlignedOps, Platform};
use crate::record::ConfigRecord;
use alloc::vec;
use core::mem::{offset_of, size_of};
#[cfg(feature = "defmt")]
use defmt::trace;

/// Marker stored in the first word of a valid record. Erased flash reads as `0xFFFF_FFFF`.
pub const CFG_HOLDER: u32 = 0x00FF_55A4;

/// Slot A, slot B, one reserved sector and the flag sector.
pub const REGION_SECTORS: usize = 4;
pub(crate) const FLAG_SECTOR: usize = 3;

pub const RECORD_SIZE: usize = size_of::<ConfigRecord>();
/// The flag byte is padded to a full word. The padding keeps the erased pattern.
pub(crate) const FLAG_SIZE: usize = 4;
pub(crate) const ERASED_BYTE: u8 = 0xFF;

// Compile-time assertions pinning the on-flash layout of the record
const _: () = assert!(RECORD_SIZE == 372, "Record layout changed");
const _: () = assert!(offset_of!(ConfigRecord, device_id) == 4);
const _: () = assert!(offset_of!(ConfigRecord, sta_type) == 164);
const _: () = assert!(offset_of!(ConfigRecord, mqtt_port) == 232);
const _: () = assert!(offset_of!(ConfigRecord, mqtt_keepalive) == 300);
const _: () = assert!(offset_of!(ConfigRecord, security) == 368);

/// Byte view of a record. The record has no implicit padding, so every byte of `raw` is
/// initialized and every bit pattern of `raw` is a valid `record`.
pub(crate) union RawRecord {
    pub(crate) record: ConfigRecord,
    pub(crate) raw: [u8; RECORD_SIZE],
}

impl RawRecord {
    pub(crate) fn from_bytes(bytes: &[u8]) -> ConfigRecord {
        let mut raw = [0u8; RECORD_SIZE];
        raw.copy_from_slice(&bytes[..RECORD_SIZE]);
        unsafe { RawRecord { raw }.record }
    }

    pub(crate) fn to_bytes(record: &ConfigRecord) -> [u8; RECORD_SIZE] {
        unsafe { RawRecord { record: *record }.raw }
    }
}

pub(crate) const fn flag_bytes(flag: u8) -> [u8; FLAG_SIZE] {
    [flag, ERASED_BYTE, ERASED_BYTE, ERASED_BYTE]
}

#[inline(always)]
pub(crate) fn write_aligned<T: Platform>(
    hal: &mut T,
    offset: u32,
    bytes: &[u8],
) -> Result<(), T::Error> {
    #[cfg(feature = "defmt")]
    trace!("write_aligned @{:#08x}: [{}]", offset, bytes.len());

    if bytes.len().is_multiple_of(T::WRITE_SIZE) {
        hal.write(offset, bytes)
    } else {
        let pivot = T::align_write_floor(bytes.len());
        let header = &bytes[..pivot];
        let trailer = &bytes[pivot..];
        if !header.is_empty() {
            hal.write(offset, header)?;
        }

        // the trailer is padded with ones, which is what an erased sector holds anyway
        if trailer.iter().any(|&e| e != ERASED_BYTE) {
            let mut buf = vec![ERASED_BYTE; T::align_write_ceil(trailer.len())];
            buf[..trailer.len()].copy_from_slice(trailer);
            hal.write(offset + (pivot as u32), &buf)?
        }

        Ok(())
    }
}
