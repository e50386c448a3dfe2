use embedded_storage::nor_flash::NorFlash;

/// See README.md for an example implementation.
pub trait Platform: ChipId + NorFlash {}

impl<T: ChipId + NorFlash> Platform for T {}

/// Source of a hardware unique identifier, used to derive the default device id and topic.
pub trait ChipId {
    fn chip_id() -> u32;
}

impl<T: ChipId> ChipId for &mut T {
    fn chip_id() -> u32 {
        T::chip_id()
    }
}

pub trait AlignedOps: Platform {
    fn align_read(size: usize) -> usize {
        align_ceil(size, Self::READ_SIZE)
    }

    fn align_write_ceil(size: usize) -> usize {
        align_ceil(size, Self::WRITE_SIZE)
    }

    fn align_write_floor(size: usize) -> usize {
        align_floor(size, Self::WRITE_SIZE)
    }
}

#[inline(always)]
const fn align_ceil(size: usize, alignment: usize) -> usize {
    if alignment.is_power_of_two() {
        size.saturating_add(alignment - 1) & !(alignment - 1)
    } else {
        size.saturating_add(alignment - 1) / alignment * alignment
    }
}

#[inline(always)]
const fn align_floor(size: usize, alignment: usize) -> usize {
    if alignment.is_power_of_two() {
        size & !(alignment - 1)
    } else {
        size / alignment * alignment
    }
}

impl<T: Platform> AlignedOps for T {}

#[cfg(any(
    feature = "esp32",
    feature = "esp32s2",
    feature = "esp32s3",
    feature = "esp32c2",
    feature = "esp32c3",
    feature = "esp32c6",
    feature = "esp32h2",
))]
mod chip {
    use esp_hal::efuse::Efuse;
    use esp_storage::FlashStorage;

    use crate::platform::ChipId;

    impl ChipId for FlashStorage<'_> {
        /// The lower three bytes of the factory MAC, like `system_get_chip_id` on the ESP8266.
        fn chip_id() -> u32 {
            let [_, _, _, a, b, c] = Efuse::mac_address();
            u32::from_be_bytes([0, a, b, c])
        }
    }
}
