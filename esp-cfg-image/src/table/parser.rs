use std::collections::HashSet;
use std::str::FromStr;

use esp_cfg_store::error::Error as StoreError;
use esp_cfg_store::{
    ConfigRecord,
    Defaults,
    FixedStr,
};

use crate::error::Error;
use crate::table::Field;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    field: String,
    value: String,
}

/// Parse `field,value` CSV content into a record. Fields missing from the CSV
/// keep the compiled-in defaults, with device id and topic derived from
/// `chip_id`.
pub(crate) fn parse_csv(content: &str, chip_id: u32) -> Result<ConfigRecord, Error> {
    let mut record = Defaults::compiled().record(chip_id)?;
    let mut seen = HashSet::new();
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let field = Field::from_str(row.field.trim())
            .map_err(|_| Error::UnknownField(row.field.clone()))?;

        if !seen.insert(field) {
            return Err(Error::DuplicateField(row.field));
        }

        set_field(&mut record, field, &row.value)?;
    }

    Ok(record)
}

fn set_field(record: &mut ConfigRecord, field: Field, value: &str) -> Result<(), Error> {
    match field {
        Field::DeviceId => record.device_id = parse_str(field, value)?,
        Field::StaSsid => record.sta_ssid = parse_str(field, value)?,
        Field::StaPwd => record.sta_pwd = parse_str(field, value)?,
        Field::StaType => record.sta_type = parse_numeric(field, value)?,
        Field::MqttHost => record.mqtt_host = parse_str(field, value)?,
        Field::MqttPort => record.mqtt_port = parse_numeric(field, value)?,
        Field::MqttUser => record.mqtt_user = parse_str(field, value)?,
        Field::MqttPass => record.mqtt_pass = parse_str(field, value)?,
        Field::MqttKeepalive => record.mqtt_keepalive = parse_numeric(field, value)?,
        Field::MqttTopic => record.mqtt_topic = parse_str(field, value)?,
        Field::Security => record.security = parse_numeric(field, value)?,
    }
    Ok(())
}

fn parse_str<const N: usize>(field: Field, value: &str) -> Result<FixedStr<N>, Error> {
    FixedStr::try_from(value).map_err(|e| match e {
        StoreError::ContainsNul => Error::InvalidValue(format!("{field} contains a null byte")),
        _ => Error::InvalidValue(format!(
            "{field} is longer than {} bytes",
            FixedStr::<N>::CAPACITY
        )),
    })
}

/// Accepts decimal and `0x` prefixed hexadecimal values.
fn parse_numeric<T>(field: Field, value: &str) -> Result<T, Error>
where
    T: TryFrom<u64>,
{
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse::<u64>().ok(),
    };

    parsed
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| Error::InvalidValue(format!("{field}: invalid number '{value}'")))
}
