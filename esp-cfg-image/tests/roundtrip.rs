use std::fs;

use esp_cfg_image::ParsedImage;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

#[test]
fn test_csv_image_csv_roundtrip() {
    // Parse original CSV
    let original = esp_cfg_image::record_from_csv_file("tests/assets/basic.csv", 0xABCD).unwrap();

    // Generate image
    let bin_file = NamedTempFile::new().unwrap();
    esp_cfg_image::generate_image_file(&original, bin_file.path()).unwrap();

    // Parse image back
    let parsed = ParsedImage::parse_file(bin_file.path()).unwrap();
    assert_eq!(parsed.record, original);

    // Write to CSV and parse it again, this time with a different chip id
    // which must not matter as every field is present now
    let csv_file = NamedTempFile::new().unwrap();
    esp_cfg_image::record_to_csv_file(&parsed.record, csv_file.path()).unwrap();
    let reparsed = esp_cfg_image::record_from_csv_file(csv_file.path(), 0).unwrap();
    assert_eq!(reparsed, original);

    // Regenerate the image, it has to be identical
    let bin_file2 = NamedTempFile::new().unwrap();
    esp_cfg_image::generate_image_file(&reparsed, bin_file2.path()).unwrap();

    let bin1 = fs::read(bin_file.path()).unwrap();
    let bin2 = fs::read(bin_file2.path()).unwrap();
    assert_eq!(
        bin1, bin2,
        "CSV-image-CSV-image roundtrip should preserve the image exactly"
    );
}

#[test]
fn test_csv_content() {
    let record = esp_cfg_image::record_from_csv_file("tests/assets/basic.csv", 0x1).unwrap();

    let content = esp_cfg_image::record_to_csv(&record).unwrap();

    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "field,value");
    assert_eq!(lines[1], "device_id,DVES_00000001");
    assert_eq!(lines[2], "sta_ssid,garden");
    assert_eq!(lines[6], "mqtt_port,8883");
    assert_eq!(lines[10], "mqtt_topic,/DVES_00000001/");
    assert_eq!(lines[11], "security,1");
    assert_eq!(lines.len(), 12);
}

#[test]
fn test_unterminated_field_roundtrip() {
    let record = esp_cfg_image::record_from_csv_file("tests/assets/basic.csv", 0).unwrap();
    let mut data = esp_cfg_image::generate_image(&record).unwrap();

    // device_id spans bytes 4..36 of slot A, fill it without a terminator
    data[4..36].fill(b'X');

    let parsed = ParsedImage::parse(&data).unwrap();
    assert_eq!(parsed.record.device_id.as_str().unwrap(), "X".repeat(31));

    let content = esp_cfg_image::record_to_csv(&parsed.record).unwrap();
    let reparsed = esp_cfg_image::record_from_csv(&content, 0).unwrap();
    assert_eq!(reparsed.device_id.as_str().unwrap(), "X".repeat(31));
    assert_eq!(reparsed.sta_ssid, record.sta_ssid);
}
