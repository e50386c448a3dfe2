//! Region images are produced and read by running the store itself against an
//! in-memory flash, so an image is byte for byte what the device would write.

use embedded_storage::nor_flash::{
    ErrorType,
    NorFlash,
    NorFlashError,
    NorFlashErrorKind,
    ReadNorFlash,
};
use esp_cfg_store::platform::ChipId;
use esp_cfg_store::{
    ConfigRecord,
    ConfigStore,
    Defaults,
    REGION_SECTORS,
};

use crate::error::Error;
use crate::ParsedImage;

/// Sector size of the ESP flash chips.
pub const FLASH_SECTOR_SIZE: usize = 4096;

/// Size of a complete region image: slot A, slot B, reserved and flag sector.
pub const IMAGE_SIZE: usize = REGION_SECTORS * FLASH_SECTOR_SIZE;

#[derive(Debug)]
pub(crate) struct OutOfBounds;

impl NorFlashError for OutOfBounds {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::OutOfBounds
    }
}

/// NOR flash semantics on a byte vector: erase sets bits, write clears them.
pub(crate) struct ImageFlash {
    buf: Vec<u8>,
}

impl ImageFlash {
    pub(crate) fn blank() -> Self {
        Self {
            buf: vec![0xFF; IMAGE_SIZE],
        }
    }

    pub(crate) fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != IMAGE_SIZE {
            return Err(Error::InvalidImageSize(data.len(), IMAGE_SIZE));
        }
        Ok(Self { buf: data.to_vec() })
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn range(&self, offset: u32, len: usize) -> Result<std::ops::Range<usize>, OutOfBounds> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(OutOfBounds)?;
        if end > self.buf.len() {
            return Err(OutOfBounds);
        }
        Ok(start..end)
    }
}

impl ErrorType for ImageFlash {
    type Error = OutOfBounds;
}

impl ReadNorFlash for ImageFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.buf[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl NorFlash for ImageFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = FLASH_SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        let range = self.range(from, to.saturating_sub(from) as usize)?;
        self.buf[range].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        for (dst, src) in self.buf[range].iter_mut().zip(bytes) {
            *dst &= src;
        }
        Ok(())
    }
}

impl ChipId for ImageFlash {
    /// Images are generated off-device, the device id has to come from the input.
    fn chip_id() -> u32 {
        0
    }
}

pub(crate) fn generate_image_data(record: &ConfigRecord) -> Result<Vec<u8>, Error> {
    let mut store = ConfigStore::new(0, ImageFlash::blank(), Defaults::compiled())?;
    store.save(record)?;
    Ok(store.into_inner().into_bytes())
}

/// Reads the image like `load` does, but never writes defaults.
pub(crate) fn parse_image_data(data: &[u8]) -> Result<ParsedImage, Error> {
    let flash = ImageFlash::from_bytes(data)?;
    let mut store = ConfigStore::new(0, flash, Defaults::compiled())?;

    let flag = store.flag_state()?;
    let active = flag.active_slot();

    for slot in [active, active.other()] {
        if let Some(record) = store.read_slot(slot)? {
            return Ok(ParsedImage { flag, slot, record });
        }
    }

    Err(Error::NoValidRecord)
}

