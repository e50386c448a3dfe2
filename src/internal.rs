use crate::ConfigStore;
use crate::error::Error;
use crate::platform::{AlignedOps, Platform};
use crate::raw::{FLAG_SECTOR, FLAG_SIZE, RECORD_SIZE, RawRecord, flag_bytes, write_aligned};
use crate::record::ConfigRecord;
use alloc::vec;
#[cfg(feature = "defmt")]
use defmt::{info, trace, warn};

/// One of the two sectors alternately holding the authoritative record. The discriminant is
/// the sector index inside the region and the flag value committing the slot.
#[derive(strum::FromRepr, strum::Display, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Slot {
    A = 0,
    B = 1,
}

impl Slot {
    /// Even flag values select slot A, odd ones slot B. An erased flag (`0xFF`) selects B.
    pub const fn from_flag(flag: u8) -> Self {
        if flag % 2 == 0 { Slot::A } else { Slot::B }
    }

    pub const fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    pub(crate) const fn sector(self) -> usize {
        self as usize
    }
}

/// The state of the flag sector as found on flash.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlagState {
    /// A completed save committed this slot.
    Committed(Slot),
    /// Neither `0` nor `1`. Either the region was never written or a save was interrupted
    /// between erasing and rewriting the flag sector.
    Torn(u8),
}

impl FlagState {
    pub fn from_raw(raw: u8) -> Self {
        match Slot::from_repr(raw) {
            Some(slot) => FlagState::Committed(slot),
            None => FlagState::Torn(raw),
        }
    }

    /// The slot a load reads first.
    pub const fn active_slot(&self) -> Slot {
        match self {
            FlagState::Committed(slot) => *slot,
            FlagState::Torn(raw) => Slot::from_flag(*raw),
        }
    }
}

impl<T: Platform> ConfigStore<T> {
    fn sector_address(&self, sector: usize) -> u32 {
        (self.base_address + sector * T::ERASE_SIZE) as u32
    }

    pub(crate) fn read_flag(&mut self) -> Result<FlagState, Error> {
        let address = self.sector_address(FLAG_SECTOR);
        #[cfg(feature = "defmt")]
        trace!("read_flag: @{:#08x}", address);

        let mut buf = vec![0u8; T::align_read(FLAG_SIZE)];
        self.hal
            .read(address, &mut buf)
            .map_err(|_| Error::FlashError)?;

        Ok(FlagState::from_raw(buf[0]))
    }

    /// Returns `None` if the slot doesn't hold a record with a valid holder marker.
    pub(crate) fn read_record(&mut self, slot: Slot) -> Result<Option<ConfigRecord>, Error> {
        let address = self.sector_address(slot.sector());
        #[cfg(feature = "defmt")]
        trace!("read_record: slot {} @{:#08x}", slot, address);

        let mut buf = vec![0u8; T::align_read(RECORD_SIZE)];
        self.hal
            .read(address, &mut buf)
            .map_err(|_| Error::FlashError)?;

        let record = RawRecord::from_bytes(&buf);
        if record.is_valid() {
            Ok(Some(record))
        } else {
            #[cfg(feature = "debug-logs")]
            println!("  internal: slot {slot} holds no valid record");
            Ok(None)
        }
    }

    fn erase_sector(&mut self, sector: usize) -> Result<(), Error> {
        if self.faulted {
            return Err(Error::FlashError);
        }

        let from = self.sector_address(sector);
        #[cfg(feature = "defmt")]
        trace!("erase_sector: @{:#08x}", from);

        self.hal
            .erase(from, from + T::ERASE_SIZE as u32)
            .map_err(|_| Error::FlashError)
    }

    fn write_record(&mut self, slot: Slot, record: &ConfigRecord) -> Result<(), Error> {
        self.erase_sector(slot.sector())?;

        let address = self.sector_address(slot.sector());
        let raw = RawRecord::to_bytes(record);
        write_aligned(&mut self.hal, address, &raw).map_err(|_| Error::FlashError)
    }

    /// Between erase and write the flag sector reads as erased, which selects slot B.
    pub(crate) fn commit_flag(&mut self, slot: Slot) -> Result<(), Error> {
        self.erase_sector(FLAG_SECTOR)?;

        let address = self.sector_address(FLAG_SECTOR);
        write_aligned(&mut self.hal, address, &flag_bytes(slot as u8))
            .map_err(|_| Error::FlashError)?;

        #[cfg(feature = "debug-logs")]
        println!("  internal: committed slot {slot}");
        Ok(())
    }

    /// Writes the record into the inactive slot and commits it. The active slot is not touched.
    pub(crate) fn save_record(&mut self, record: &ConfigRecord) -> Result<Slot, Error> {
        let current = self.read_flag()?.active_slot();
        let target = current.other();

        #[cfg(feature = "defmt")]
        trace!("save_record: {} -> {}", current, target);

        self.write_record(target, record)?;
        self.commit_flag(target)?;
        Ok(target)
    }

    pub(crate) fn load_record(&mut self) -> Result<ConfigRecord, Error> {
        let flag = self.read_flag()?;
        if let FlagState::Torn(_raw) = flag {
            #[cfg(feature = "defmt")]
            warn!("load_record: flag not committed ({:#04x})", _raw);
            #[cfg(feature = "debug-logs")]
            println!("  internal: flag not committed ({_raw:#04x})");
        }

        let active = flag.active_slot();
        if let Some(record) = self.read_record(active)? {
            return Ok(record);
        }

        let other = active.other();
        if let Some(record) = self.read_record(other)? {
            #[cfg(feature = "defmt")]
            warn!("load_record: slot {} invalid, recovering slot {}", active, other);

            // the next save must not overwrite the only valid copy. A faulted store refuses
            // saves, so the repair is left to the next store.
            if !self.faulted {
                self.commit_flag(other)?;
            }
            return Ok(record);
        }

        #[cfg(feature = "defmt")]
        info!("load_record: no valid record, writing defaults");
        #[cfg(feature = "debug-logs")]
        println!("  internal: default configuration");

        let record = self.defaults.record(T::chip_id())?;
        self.save_record(&record)?;
        Ok(record)
    }
}
