pub(crate) mod parser;
pub(crate) mod writer;

/// The record fields as named in the CSV `field` column, in layout order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    DeviceId,
    StaSsid,
    StaPwd,
    StaType,
    MqttHost,
    MqttPort,
    MqttUser,
    MqttPass,
    MqttKeepalive,
    MqttTopic,
    Security,
}
