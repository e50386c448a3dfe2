//! Compiled-in values used to synthesize a record when the flash holds no valid configuration.
//!
//! The string values can be overridden at build time through the environment, e.g.
//! `CFG_STA_SSID=home CFG_STA_PASS=secret cargo build`.

use crate::error::Error;
use crate::record::{AUTH_WPA2_PSK, ConfigRecord, SECURITY_PLAIN};
use crate::FixedStr;
use core::fmt::Write;

macro_rules! env_or {
    ($name:literal, $default:expr) => {
        match option_env!($name) {
            Some(value) => value,
            None => $default,
        }
    };
}

pub const DEFAULT_SSID: &str = env_or!("CFG_STA_SSID", "DVES_HOME");
pub const DEFAULT_PASS: &str = env_or!("CFG_STA_PASS", "yourpassword");
pub const DEFAULT_MQTT_HOST: &str = env_or!("CFG_MQTT_HOST", "192.168.1.100");
pub const DEFAULT_MQTT_USER: &str = env_or!("CFG_MQTT_USER", "DVES_USER");
pub const DEFAULT_MQTT_PASS: &str = env_or!("CFG_MQTT_PASS", "DVES_PASS");
pub const DEFAULT_PORT: u32 = 1883;
pub const DEFAULT_KEEPALIVE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub sta_ssid: &'static str,
    pub sta_pwd: &'static str,
    pub sta_type: u32,
    /// The device id is this prefix followed by the chip id as 8 upper case hex digits.
    pub device_id_prefix: &'static str,
    /// The topic is this prefix followed by the chip id as 8 upper case hex digits and a `/`.
    pub mqtt_topic_prefix: &'static str,
    pub mqtt_host: &'static str,
    pub mqtt_port: u32,
    pub mqtt_user: &'static str,
    pub mqtt_pass: &'static str,
    pub mqtt_keepalive: u32,
    pub security: u8,
}

impl Defaults {
    pub const fn compiled() -> Self {
        Self {
            sta_ssid: DEFAULT_SSID,
            sta_pwd: DEFAULT_PASS,
            sta_type: AUTH_WPA2_PSK,
            device_id_prefix: "DVES_",
            mqtt_topic_prefix: "/DVES_",
            mqtt_host: DEFAULT_MQTT_HOST,
            mqtt_port: DEFAULT_PORT,
            mqtt_user: DEFAULT_MQTT_USER,
            mqtt_pass: DEFAULT_MQTT_PASS,
            mqtt_keepalive: DEFAULT_KEEPALIVE,
            security: SECURITY_PLAIN,
        }
    }

    /// Builds a zeroed record with the holder marker set and every field populated from these
    /// defaults.
    pub fn record(&self, chip_id: u32) -> Result<ConfigRecord, Error> {
        let mut record = ConfigRecord::zeroed();

        record.sta_ssid = FixedStr::try_from(self.sta_ssid)?;
        record.sta_pwd = FixedStr::try_from(self.sta_pwd)?;
        record.sta_type = self.sta_type;

        write!(record.device_id, "{}{chip_id:08X}", self.device_id_prefix)
            .map_err(|_| Error::ValueTooLong)?;
        write!(record.mqtt_topic, "{}{chip_id:08X}/", self.mqtt_topic_prefix)
            .map_err(|_| Error::ValueTooLong)?;

        record.mqtt_host = FixedStr::try_from(self.mqtt_host)?;
        record.mqtt_port = self.mqtt_port;
        record.mqtt_user = FixedStr::try_from(self.mqtt_user)?;
        record.mqtt_pass = FixedStr::try_from(self.mqtt_pass)?;
        record.security = self.security;
        record.mqtt_keepalive = self.mqtt_keepalive;

        Ok(record)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::compiled()
    }
}
