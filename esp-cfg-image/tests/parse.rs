use esp_cfg_image::{
    Error,
    FlagState,
    ParsedImage,
    Slot,
    FLASH_SECTOR_SIZE,
    IMAGE_SIZE,
};
use pretty_assertions::assert_eq;

fn basic_image() -> (esp_cfg_image::ConfigRecord, Vec<u8>) {
    let record = esp_cfg_image::record_from_csv_file("tests/assets/basic.csv", 0).unwrap();
    let data = esp_cfg_image::generate_image(&record).unwrap();
    (record, data)
}

#[test]
fn test_parse_generated_image() {
    let (record, data) = basic_image();

    let image = ParsedImage::parse(&data).unwrap();

    assert_eq!(image.flag, FlagState::Committed(Slot::A));
    assert_eq!(image.slot, Slot::A);
    assert_eq!(image.record, record);
    assert!(image.is_committed());
}

#[test]
fn test_parse_slot_b() {
    let (record, mut data) = basic_image();

    // what a device leaves behind after its second save
    data.copy_within(..FLASH_SECTOR_SIZE, FLASH_SECTOR_SIZE);
    data[3 * FLASH_SECTOR_SIZE] = 1;

    let image = ParsedImage::parse(&data).unwrap();
    assert_eq!(image.flag, FlagState::Committed(Slot::B));
    assert_eq!(image.slot, Slot::B);
    assert_eq!(image.record, record);
}

#[test]
fn test_parse_torn_flag() {
    let (record, mut data) = basic_image();
    data[3 * FLASH_SECTOR_SIZE..].fill(0xFF);

    let image = ParsedImage::parse(&data).unwrap();

    assert_eq!(image.flag, FlagState::Torn(0xFF));
    // slot B is empty, the record is found in slot A
    assert_eq!(image.slot, Slot::A);
    assert_eq!(image.record, record);
    assert!(!image.is_committed());
}

#[test]
fn test_parse_blank_image() {
    let data = vec![0xFF; IMAGE_SIZE];
    assert!(matches!(ParsedImage::parse(&data), Err(Error::NoValidRecord)));
}

#[test]
fn test_parse_invalid_size() {
    let data = vec![0xFF; IMAGE_SIZE - 1];
    assert!(matches!(
        ParsedImage::parse(&data),
        Err(Error::InvalidImageSize(size, expected)) if size == IMAGE_SIZE - 1 && expected == IMAGE_SIZE
    ));
}
