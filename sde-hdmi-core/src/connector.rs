//! Connector framework types
//!
//! The generic display framework owns connectors and encoders; a backend
//! only fills in their HDMI-specific parts.

use heapless::{String, Vec};

use crate::config::MAX_LABEL_LEN;
use crate::mode::display_mode::push_unique;
use crate::mode::{DisplayMode, ModeList};

/// Maximum key length in a connector info record
pub const INFO_KEY_LEN: usize = 24;

/// Maximum value length in a connector info record
pub const INFO_VALUE_LEN: usize = 32;

/// Maximum entries in a connector info record
pub const MAX_INFO_ENTRIES: usize = 16;

/// Hotplug state of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectorStatus {
    /// A sink is attached
    Connected,
    /// No sink is attached
    Disconnected,
    /// State cannot be determined
    #[default]
    Unknown,
}

impl ConnectorStatus {
    /// Status for a boolean connected flag
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            ConnectorStatus::Connected
        } else {
            ConnectorStatus::Disconnected
        }
    }
}

/// Physical port type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectorType {
    /// Standard HDMI type A port
    #[default]
    HdmiA,
    /// HDMI type B (dual link) port
    HdmiB,
}

/// Encoder a display is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderHandle {
    /// Encoder object id
    pub id: u32,
    /// Bitmask of CRTCs that can feed this encoder
    pub possible_crtcs: u32,
}

/// Framework-level object representing a physical display output port
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Connector {
    /// Connector object id
    pub id: u32,
    /// Port type
    pub connector_type: ConnectorType,
    /// Last detected status
    pub status: ConnectorStatus,
    /// Physical width of the attached display in millimeters
    pub width_mm: u32,
    /// Physical height of the attached display in millimeters
    pub height_mm: u32,
    probed_modes: ModeList,
    driver: Option<String<MAX_LABEL_LEN>>,
}

impl Connector {
    /// Create a connector with no modes and unknown status
    pub fn new(id: u32, connector_type: ConnectorType) -> Self {
        Self {
            id,
            connector_type,
            status: ConnectorStatus::Unknown,
            width_mm: 0,
            height_mm: 0,
            probed_modes: ModeList::new(),
            driver: None,
        }
    }

    /// Add a probed mode
    ///
    /// Returns false if the mode duplicates an existing one or the list is full.
    pub fn probed_add(&mut self, mode: DisplayMode) -> bool {
        push_unique(&mut self.probed_modes, mode)
    }

    /// Modes added since the last clear
    pub fn probed_modes(&self) -> &[DisplayMode] {
        &self.probed_modes
    }

    /// Drop all probed modes
    pub fn clear_probed(&mut self) {
        self.probed_modes.clear();
    }

    /// Attach driver-specific data, identified by the display name
    pub fn attach_driver(&mut self, name: &str) {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        self.driver = Some(label);
    }

    /// Detach driver-specific data
    pub fn detach_driver(&mut self) {
        self.driver = None;
    }

    /// Name of the attached display, if any
    pub fn driver_name(&self) -> Option<&str> {
        self.driver.as_ref().map(|s| s.as_str())
    }

    /// Record the physical size of the attached display
    pub fn set_physical_size(&mut self, width_mm: u32, height_mm: u32) {
        self.width_mm = width_mm;
        self.height_mm = height_mm;
    }
}

/// Connector info record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InfoError {
    /// No room for another entry
    Full,
    /// Key or value longer than the record allows
    TooLong,
}

/// Key/value properties published for a connector
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectorInfo {
    entries: Vec<(String<INFO_KEY_LEN>, String<INFO_VALUE_LEN>), MAX_INFO_ENTRIES>,
}

impl ConnectorInfo {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a string property
    pub fn add_str(&mut self, key: &str, value: &str) -> Result<(), InfoError> {
        let value = String::try_from(value).map_err(|_| InfoError::TooLong)?;
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            entry.1 = value;
            return Ok(());
        }
        let key = String::try_from(key).map_err(|_| InfoError::TooLong)?;
        self.entries.push((key, value)).map_err(|_| InfoError::Full)
    }

    /// Add or replace a numeric property
    pub fn add_u32(&mut self, key: &str, value: u32) -> Result<(), InfoError> {
        let mut text: String<INFO_VALUE_LEN> = String::new();
        // u32 always fits
        let _ = core::fmt::Write::write_fmt(&mut text, format_args!("{}", value));
        self.add_str(key, &text)
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no property is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::cea_mode;

    #[test]
    fn test_probed_modes_deduplicated() {
        let mut connector = Connector::new(1, ConnectorType::HdmiA);
        assert!(connector.probed_add(cea_mode(16).unwrap()));
        assert!(!connector.probed_add(cea_mode(16).unwrap()));
        assert!(connector.probed_add(cea_mode(4).unwrap()));
        assert_eq!(connector.probed_modes().len(), 2);

        connector.clear_probed();
        assert!(connector.probed_modes().is_empty());
    }

    #[test]
    fn test_driver_attachment() {
        let mut connector = Connector::new(1, ConnectorType::HdmiA);
        assert_eq!(connector.driver_name(), None);
        connector.attach_driver("hdmi_display");
        assert_eq!(connector.driver_name(), Some("hdmi_display"));
        connector.detach_driver();
        assert_eq!(connector.driver_name(), None);
    }

    #[test]
    fn test_info_record() {
        let mut info = ConnectorInfo::new();
        info.add_str("display type", "primary").unwrap();
        info.add_u32("max pixel clock", 297_000).unwrap();
        info.add_str("display type", "secondary").unwrap();

        assert_eq!(info.len(), 2);
        assert_eq!(info.get("display type"), Some("secondary"));
        assert_eq!(info.get("max pixel clock"), Some("297000"));
        assert_eq!(info.get("missing"), None);
    }

    #[test]
    fn test_info_limits() {
        let mut info = ConnectorInfo::new();
        assert_eq!(
            info.add_str("key", "a value that is definitely longer than thirty two bytes"),
            Err(InfoError::TooLong)
        );
        for i in 0..MAX_INFO_ENTRIES as u32 {
            let mut key: String<INFO_KEY_LEN> = String::new();
            let _ = core::fmt::Write::write_fmt(&mut key, format_args!("k{}", i));
            info.add_u32(&key, i).unwrap();
        }
        assert_eq!(info.add_str("one more", "x"), Err(InfoError::Full));
    }
}
