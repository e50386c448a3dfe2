use std::path::Path;

use csv::Writer;
use esp_cfg_store::{
    ConfigRecord,
    FixedStr,
};
use strum::IntoEnumIterator;

use crate::error::Error;
use crate::table::Field;

/// Serialize a record to a CSV file at the given `output_path`, one row per
/// field in layout order.
pub(crate) fn write_csv<P: AsRef<Path>>(record: &ConfigRecord, output_path: P) -> Result<(), Error> {
    let mut wtr = Writer::from_path(output_path)?;
    write_records(&mut wtr, record)
}

/// Serialize a record to CSV and return the content as a `String`.
pub(crate) fn write_csv_content(record: &ConfigRecord) -> Result<String, Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    write_records(&mut wtr, record)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidValue(format!("CSV output is not valid UTF-8: {}", e)))
}

fn write_records<W: std::io::Write>(wtr: &mut Writer<W>, record: &ConfigRecord) -> Result<(), Error> {
    wtr.write_record(["field", "value"])?;

    for field in Field::iter() {
        let value = field_value(record, field)?;
        let name: &'static str = field.into();
        wtr.write_record([name, value.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

fn field_value(record: &ConfigRecord, field: Field) -> Result<String, Error> {
    let value = match field {
        Field::DeviceId => str_value(field, &record.device_id)?,
        Field::StaSsid => str_value(field, &record.sta_ssid)?,
        Field::StaPwd => str_value(field, &record.sta_pwd)?,
        Field::StaType => record.sta_type.to_string(),
        Field::MqttHost => str_value(field, &record.mqtt_host)?,
        Field::MqttPort => record.mqtt_port.to_string(),
        Field::MqttUser => str_value(field, &record.mqtt_user)?,
        Field::MqttPass => str_value(field, &record.mqtt_pass)?,
        Field::MqttKeepalive => record.mqtt_keepalive.to_string(),
        Field::MqttTopic => str_value(field, &record.mqtt_topic)?,
        Field::Security => record.security.to_string(),
    };
    Ok(value)
}

fn str_value<const N: usize>(field: Field, value: &FixedStr<N>) -> Result<String, Error> {
    value
        .as_str()
        .map(str::to_string)
        .map_err(|_| Error::InvalidValue(format!("{field} is not valid UTF-8")))
}
