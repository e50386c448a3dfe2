#![doc = include_str ! ("../README.md")]
#![cfg_attr(not(target_arch = "x86_64"), no_std)]

mod defaults;
pub mod error;
mod internal;
pub mod platform;
mod raw;
mod record;

extern crate alloc;

use crate::error::Error;
use crate::platform::Platform;
use core::fmt;

pub use defaults::{
    DEFAULT_KEEPALIVE, DEFAULT_MQTT_HOST, DEFAULT_MQTT_PASS, DEFAULT_MQTT_USER, DEFAULT_PASS,
    DEFAULT_PORT, DEFAULT_SSID, Defaults,
};
pub use internal::{FlagState, Slot};
pub use raw::{CFG_HOLDER, RECORD_SIZE, REGION_SECTORS};
pub use record::{
    AUTH_OPEN, AUTH_WPA_PSK, AUTH_WPA2_PSK, ConfigRecord, SECURITY_PLAIN, SECURITY_TLS,
};

/// A NUL-padded string of at most `N - 1` bytes, stored inline in the record.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Maximum string length, one byte is reserved for the null terminator.
    pub const CAPACITY: usize = N - 1;

    pub const fn empty() -> Self {
        Self([0u8; N])
    }

    /// Usage: `FixedStr::<32>::new("my_value")`
    ///
    /// Panics if the string doesn't fit. Use a const context to catch this at compile time:
    ///   `let ssid = const { FixedStr::<64>::new("my_ssid") };`
    pub const fn new(s: &str) -> Self {
        let src = s.as_bytes();
        assert!(src.len() < N);
        let mut dst = [0u8; N];
        let mut i = 0;
        while i < src.len() {
            dst[i] = src[i];
            i += 1;
        }
        Self(dst)
    }

    /// Length up to the first null byte. A slot read from flash may lack the terminator, the
    /// last byte is then ignored so the value never exceeds [`Self::CAPACITY`].
    pub fn len(&self) -> usize {
        self.0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(Self::CAPACITY)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        core::str::from_utf8(self.as_bytes()).map_err(|_| Error::InvalidUtf8)
    }

    /// The full, NUL-padded array as stored on flash.
    pub const fn as_raw(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> TryFrom<&str> for FixedStr<N> {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.len() > Self::CAPACITY {
            return Err(Error::ValueTooLong);
        }
        if s.contains('\0') {
            return Err(Error::ContainsNul);
        }
        Ok(Self::new(s))
    }
}

impl<const N: usize> fmt::Write for FixedStr<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let len = self.len();
        let end = len + s.len();
        if end > Self::CAPACITY || s.contains('\0') {
            return Err(fmt::Error);
        }
        self.0[len..end].copy_from_slice(s.as_bytes());
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for &byte in self.as_bytes() {
            write!(f, "{}", core::ascii::escape_default(byte))?;
        }
        write!(f, "\"")
    }
}

/// Owns the four sectors of the configuration region and keeps exactly one committed record in
/// them at all times:
///
/// | sector   | content                    |
/// |----------|----------------------------|
/// | base + 0 | slot A                     |
/// | base + 1 | slot B                     |
/// | base + 2 | reserved                   |
/// | base + 3 | flag selecting the slot    |
///
/// All operations take `&mut self`; wrap the store in a mutex when sharing it between threads.
pub struct ConfigStore<T: Platform> {
    pub(crate) hal: T,
    pub(crate) base_address: usize,
    pub(crate) defaults: Defaults,
    pub(crate) faulted: bool,
}

impl<T: Platform> ConfigStore<T> {
    /// Creates a store for the region starting at erase sector `base_sector` of `hal`. Doesn't
    /// touch the flash.
    pub fn new(base_sector: usize, hal: T, defaults: Defaults) -> Result<ConfigStore<T>, Error> {
        if T::ERASE_SIZE < RECORD_SIZE {
            return Err(Error::SectorTooSmall);
        }

        let base_address = base_sector
            .checked_mul(T::ERASE_SIZE)
            .ok_or(Error::InvalidRegion)?;
        let end = base_address
            .checked_add(REGION_SECTORS * T::ERASE_SIZE)
            .ok_or(Error::InvalidRegion)?;
        if end > hal.capacity() || end > u32::MAX as usize {
            return Err(Error::InvalidRegion);
        }

        Ok(Self {
            hal,
            base_address,
            defaults,
            faulted: false,
        })
    }

    /// Reads the committed record. On a blank or corrupted region the other slot is tried before
    /// a record is synthesized from the defaults and saved.
    pub fn load(&mut self) -> Result<ConfigRecord, Error> {
        let result = self.load_record();
        self.track(result)
    }

    /// Writes the record into the inactive slot and commits it by rewriting the flag sector.
    /// Returns the slot which now holds the record.
    ///
    /// Fails with [`Error::FlashError`] without touching the flash if a previous operation
    /// failed; create a new store to retry.
    pub fn save(&mut self, record: &ConfigRecord) -> Result<Slot, Error> {
        if self.faulted {
            return Err(Error::FlashError);
        }

        let result = self.save_record(record);
        self.track(result)
    }

    /// Replaces the stored configuration with a fresh default record.
    pub fn reset(&mut self) -> Result<ConfigRecord, Error> {
        let record = self.default_record()?;
        self.save(&record)?;
        Ok(record)
    }

    /// The record `load` falls back to, derived from the defaults and the chip id.
    pub fn default_record(&self) -> Result<ConfigRecord, Error> {
        self.defaults.record(T::chip_id())
    }

    /// Reads the flag sector without touching anything else.
    pub fn flag_state(&mut self) -> Result<FlagState, Error> {
        let result = self.read_flag();
        self.track(result)
    }

    /// Reads a single slot, `None` if it doesn't hold a valid record.
    pub fn read_slot(&mut self, slot: Slot) -> Result<Option<ConfigRecord>, Error> {
        let result = self.read_record(slot);
        self.track(result)
    }

    pub fn into_inner(self) -> T {
        self.hal
    }

    fn track<R>(&mut self, result: Result<R, Error>) -> Result<R, Error> {
        if let Err(Error::FlashError) = result {
            self.faulted = true;
        }
        result
    }
}
