use crate::FixedStr;
use crate::raw::CFG_HOLDER;
use core::fmt;

/// Station authentication modes as understood by the Wi-Fi collaborator.
pub const AUTH_OPEN: u32 = 0;
pub const AUTH_WPA_PSK: u32 = 2;
pub const AUTH_WPA2_PSK: u32 = 3;

pub const SECURITY_PLAIN: u8 = 0;
pub const SECURITY_TLS: u8 = 1;

/// The persisted application configuration. The in-memory representation is the on-flash
/// representation, see the layout table in README.md.
///
/// Instances can only be obtained through [`ConfigRecord::zeroed`], the [`crate::Defaults`] or by
/// loading them from flash, so the holder marker of a record handed out by this crate is always
/// valid.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    holder: u32,
    pub device_id: FixedStr<32>,
    pub sta_ssid: FixedStr<64>,
    pub sta_pwd: FixedStr<64>,
    pub sta_type: u32,
    pub mqtt_host: FixedStr<64>,
    pub mqtt_port: u32,
    pub mqtt_user: FixedStr<32>,
    pub mqtt_pass: FixedStr<32>,
    pub mqtt_keepalive: u32,
    pub mqtt_topic: FixedStr<64>,
    pub security: u8,
    _reserved: [u8; 3],
}

impl ConfigRecord {
    /// All fields zero, holder marker set.
    pub const fn zeroed() -> Self {
        Self {
            holder: CFG_HOLDER,
            device_id: FixedStr::empty(),
            sta_ssid: FixedStr::empty(),
            sta_pwd: FixedStr::empty(),
            sta_type: 0,
            mqtt_host: FixedStr::empty(),
            mqtt_port: 0,
            mqtt_user: FixedStr::empty(),
            mqtt_pass: FixedStr::empty(),
            mqtt_keepalive: 0,
            mqtt_topic: FixedStr::empty(),
            security: 0,
            _reserved: [0; 3],
        }
    }

    pub const fn holder(&self) -> u32 {
        self.holder
    }

    /// Distinguishes a previously saved record from erased or corrupted flash.
    pub(crate) const fn is_valid(&self) -> bool {
        self.holder == CFG_HOLDER
    }
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Debug for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keep credentials out of logs
        f.debug_struct("ConfigRecord")
            .field("holder", &format_args!("{:#010x}", self.holder))
            .field("device_id", &self.device_id)
            .field("sta_ssid", &self.sta_ssid)
            .field("sta_pwd", &"***")
            .field("sta_type", &self.sta_type)
            .field("mqtt_host", &self.mqtt_host)
            .field("mqtt_port", &self.mqtt_port)
            .field("mqtt_user", &self.mqtt_user)
            .field("mqtt_pass", &"***")
            .field("mqtt_keepalive", &self.mqtt_keepalive)
            .field("mqtt_topic", &self.mqtt_topic)
            .field("security", &self.security)
            .finish()
    }
}
