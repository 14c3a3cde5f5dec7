//! Base block parsing

use heapless::String;

use super::cea_ext::parse_cea_extension;
use super::{block_checksum_ok, EDID_BLOCK_SIZE, EDID_HEADER};
use crate::mode::display_mode::push_unique;
use crate::mode::{cea_mode, DisplayMode, ModeFlags, ModeList, ModeType, SyncTiming};

/// Maximum monitor name length (one display descriptor)
pub const MONITOR_NAME_LEN: usize = 13;

/// Offset of the first 18-byte descriptor in the base block
const DESCRIPTOR_OFFSET: usize = 54;

/// Size of a detailed timing or display descriptor
pub(super) const DESCRIPTOR_LEN: usize = 18;

/// Display descriptor tag for the monitor name
const TAG_MONITOR_NAME: u8 = 0xFC;

/// Extension block tag for CEA-861
const TAG_CEA_EXTENSION: u8 = 0x02;

/// EDID parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdidError {
    /// Less than one block of data
    TooShort,
    /// Base block does not start with the fixed header
    BadHeader,
    /// Block checksum does not sum to zero
    BadChecksum(u8),
}

/// Parsed EDID
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edid {
    /// Three-letter PNP manufacturer id
    pub manufacturer: [u8; 3],
    /// Manufacturer product code
    pub product_code: u16,
    /// Serial number (0 if unused)
    pub serial: u32,
    /// EDID version
    pub version: u8,
    /// EDID revision
    pub revision: u8,
    /// Physical width in millimeters (0 if unknown)
    pub width_mm: u32,
    /// Physical height in millimeters (0 if unknown)
    pub height_mm: u32,
    /// Monitor name from the name descriptor
    pub name: String<MONITOR_NAME_LEN>,
    /// Extension blocks announced by the base block
    pub extension_count: u8,
    /// Sink carries an HDMI vendor-specific data block
    pub is_hdmi: bool,
    /// Modes in discovery order, preferred first
    pub modes: ModeList,
}

impl Edid {
    /// Parse raw EDID bytes
    ///
    /// The base block must be intact. Extension blocks that are missing or
    /// fail their checksum are skipped.
    pub fn parse(data: &[u8]) -> Result<Self, EdidError> {
        if data.len() < EDID_BLOCK_SIZE {
            return Err(EdidError::TooShort);
        }
        let base = &data[..EDID_BLOCK_SIZE];
        if base[..8] != EDID_HEADER {
            return Err(EdidError::BadHeader);
        }
        if !block_checksum_ok(base) {
            return Err(EdidError::BadChecksum(0));
        }

        let mfg = u16::from_be_bytes([base[8], base[9]]);
        let letter = |shift: u16| (((mfg >> shift) & 0x1F) as u8).wrapping_add(b'@');

        let mut edid = Self {
            manufacturer: [letter(10), letter(5), letter(0)],
            product_code: u16::from_le_bytes([base[10], base[11]]),
            serial: u32::from_le_bytes([base[12], base[13], base[14], base[15]]),
            version: base[18],
            revision: base[19],
            width_mm: 0,
            height_mm: 0,
            name: String::new(),
            extension_count: base[126],
            is_hdmi: false,
            modes: ModeList::new(),
        };

        // Screen size in cm; zero in either byte means unknown or an aspect ratio
        if base[21] != 0 && base[22] != 0 {
            edid.width_mm = u32::from(base[21]) * 10;
            edid.height_mm = u32::from(base[22]) * 10;
        }

        for i in 0..4 {
            let offset = DESCRIPTOR_OFFSET + i * DESCRIPTOR_LEN;
            let desc = &base[offset..offset + DESCRIPTOR_LEN];

            if desc[0] == 0 && desc[1] == 0 {
                if desc[3] == TAG_MONITOR_NAME {
                    edid.name = parse_monitor_name(&desc[5..]);
                }
                continue;
            }

            if let Some((mut mode, size)) = parse_detailed_timing(desc) {
                if edid.modes.is_empty() {
                    mode.mode_type |= ModeType::PREFERRED;
                    if edid.width_mm == 0 {
                        edid.width_mm = size.0;
                        edid.height_mm = size.1;
                    }
                }
                push_unique(&mut edid.modes, mode);
            }
        }

        // Established timing I, bit 5: 640x480@60
        if base[35] & 0x20 != 0 {
            if let Some(mode) = cea_mode(1) {
                push_unique(&mut edid.modes, mode);
            }
        }

        let available = data.len() / EDID_BLOCK_SIZE - 1;
        let extensions = usize::from(edid.extension_count).min(available);
        for index in 1..=extensions {
            let block = &data[index * EDID_BLOCK_SIZE..(index + 1) * EDID_BLOCK_SIZE];
            if block[0] != TAG_CEA_EXTENSION || !block_checksum_ok(block) {
                continue;
            }
            parse_cea_extension(block, &mut edid);
        }

        Ok(edid)
    }

    /// The preferred mode, if the sink announced one
    pub fn preferred_mode(&self) -> Option<&DisplayMode> {
        self.modes.iter().find(|m| m.is_preferred())
    }

    /// Manufacturer id as a string
    pub fn manufacturer_str(&self) -> &str {
        core::str::from_utf8(&self.manufacturer).unwrap_or("???")
    }
}

fn parse_monitor_name(bytes: &[u8]) -> String<MONITOR_NAME_LEN> {
    let mut name = String::new();
    for &b in bytes.iter().take(MONITOR_NAME_LEN) {
        if b == 0x0A || b == 0x00 {
            break;
        }
        if b.is_ascii_graphic() || b == b' ' {
            let _ = name.push(b as char);
        }
    }
    while name.ends_with(' ') {
        name.pop();
    }
    name
}

/// Decode an 18-byte detailed timing descriptor
///
/// Returns the mode and the image size in millimeters, or `None` for a
/// descriptor whose blanking cannot contain its sync pulse.
pub(super) fn parse_detailed_timing(d: &[u8]) -> Option<(DisplayMode, (u32, u32))> {
    let clock_10khz = u16::from_le_bytes([d[0], d[1]]);
    if clock_10khz == 0 {
        return None;
    }

    let hi = |byte: u8, mask: u8, shift: u32| u16::from(byte & mask) << shift;

    let h_active = u16::from(d[2]) | hi(d[4], 0xF0, 4);
    let h_blank = u16::from(d[3]) | hi(d[4], 0x0F, 8);
    let v_active = u16::from(d[5]) | hi(d[7], 0xF0, 4);
    let v_blank = u16::from(d[6]) | hi(d[7], 0x0F, 8);
    let h_sync_offset = u16::from(d[8]) | hi(d[11], 0xC0, 2);
    let h_sync_width = u16::from(d[9]) | hi(d[11], 0x30, 4);
    let v_sync_offset = u16::from(d[10] >> 4) | hi(d[11], 0x0C, 2);
    let v_sync_width = u16::from(d[10] & 0x0F) | hi(d[11], 0x03, 4);

    if h_active == 0 || v_active == 0 {
        return None;
    }
    let h_back = h_blank.checked_sub(h_sync_offset + h_sync_width)?;
    let v_back = v_blank.checked_sub(v_sync_offset + v_sync_width)?;

    let features = d[17];
    let mut flags = ModeFlags::empty();
    if features & 0x80 != 0 {
        flags |= ModeFlags::INTERLACE;
    }
    // Digital separate sync carries both polarities
    if features & 0x18 == 0x18 {
        flags |= if features & 0x04 != 0 {
            ModeFlags::PVSYNC
        } else {
            ModeFlags::NVSYNC
        };
        flags |= if features & 0x02 != 0 {
            ModeFlags::PHSYNC
        } else {
            ModeFlags::NHSYNC
        };
    } else {
        flags |= ModeFlags::NHSYNC | ModeFlags::NVSYNC;
    }

    let mode = DisplayMode::from_timings(
        u32::from(clock_10khz) * 10,
        SyncTiming::new(h_active, h_sync_offset, h_sync_width, h_back),
        SyncTiming::new(v_active, v_sync_offset, v_sync_width, v_back),
        flags,
    )
    .with_type(ModeType::DRIVER);

    let width_mm = u32::from(d[12]) | u32::from(d[14] & 0xF0) << 4;
    let height_mm = u32::from(d[13]) | u32::from(d[14] & 0x0F) << 8;

    Some((mode, (width_mm, height_mm)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::edid::EDID_BLOCK_SIZE;

    /// 1920x1080@60 detailed timing, 527x296 mm, positive syncs
    pub(crate) const DTD_1080P: [u8; 18] = [
        0x02, 0x3A, 0x80, 0x18, 0x71, 0x38, 0x2D, 0x40, 0x58, 0x2C, 0x45, 0x00, 0x0F, 0x28,
        0x21, 0x00, 0x00, 0x1E,
    ];

    pub(crate) fn fix_checksum(block: &mut [u8]) {
        let sum = block[..EDID_BLOCK_SIZE - 1]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        block[EDID_BLOCK_SIZE - 1] = 0u8.wrapping_sub(sum);
    }

    /// Base block: "DEL", 52x29 cm, 1080p DTD, name "TEST MONITOR", VGA established
    pub(crate) fn base_block(extensions: u8) -> [u8; 128] {
        let mut b = [0u8; 128];
        b[..8].copy_from_slice(&EDID_HEADER);
        b[8] = 0x10;
        b[9] = 0xAC;
        b[10] = 0x34;
        b[11] = 0x12;
        b[12] = 0x01;
        b[18] = 1;
        b[19] = 4;
        b[20] = 0x80;
        b[21] = 52;
        b[22] = 29;
        b[35] = 0x20;
        b[54..72].copy_from_slice(&DTD_1080P);
        b[72..77].copy_from_slice(&[0, 0, 0, TAG_MONITOR_NAME, 0]);
        b[77..90].copy_from_slice(b"TEST MONITOR\n");
        b[90..95].copy_from_slice(&[0, 0, 0, 0x10, 0]);
        b[108..113].copy_from_slice(&[0, 0, 0, 0x10, 0]);
        b[126] = extensions;
        fix_checksum(&mut b);
        b
    }

    #[test]
    fn test_base_block_identity() {
        let edid = Edid::parse(&base_block(0)).unwrap();
        assert_eq!(edid.manufacturer_str(), "DEL");
        assert_eq!(edid.product_code, 0x1234);
        assert_eq!(edid.serial, 1);
        assert_eq!((edid.version, edid.revision), (1, 4));
        assert_eq!((edid.width_mm, edid.height_mm), (520, 290));
        assert_eq!(edid.name.as_str(), "TEST MONITOR");
        assert!(!edid.is_hdmi);
    }

    #[test]
    fn test_base_block_modes() {
        let edid = Edid::parse(&base_block(0)).unwrap();
        assert_eq!(edid.modes.len(), 2);

        let preferred = edid.preferred_mode().unwrap();
        assert_eq!(preferred.name.as_str(), "1920x1080");
        assert_eq!(preferred.clock_khz, 148_500);
        assert_eq!(preferred.htotal, 2200);
        assert_eq!(preferred.vtotal, 1125);
        assert_eq!(preferred.flags, ModeFlags::PHSYNC | ModeFlags::PVSYNC);
        assert_eq!(preferred.refresh_hz(), 60);

        assert_eq!(edid.modes[1].name.as_str(), "640x480");
        assert!(!edid.modes[1].is_preferred());
    }

    #[test]
    fn test_dtd_size_fallback() {
        let mut block = base_block(0);
        block[21] = 0;
        block[22] = 0;
        fix_checksum(&mut block);
        let edid = Edid::parse(&block).unwrap();
        assert_eq!((edid.width_mm, edid.height_mm), (527, 296));
    }

    #[test]
    fn test_errors() {
        assert_eq!(Edid::parse(&[0u8; 64]).unwrap_err(), EdidError::TooShort);

        let mut block = base_block(0);
        block[0] = 0x55;
        assert_eq!(Edid::parse(&block).unwrap_err(), EdidError::BadHeader);

        let mut block = base_block(0);
        block[100] ^= 0xFF;
        assert_eq!(Edid::parse(&block).unwrap_err(), EdidError::BadChecksum(0));
    }

    #[test]
    fn test_missing_extension_ignored() {
        // Announces one extension but only the base block was read
        let edid = Edid::parse(&base_block(1)).unwrap();
        assert_eq!(edid.extension_count, 1);
        assert_eq!(edid.modes.len(), 2);
    }

    #[test]
    fn test_dtd_rejects_overlapping_sync() {
        let mut dtd = DTD_1080P;
        dtd[8] = 0xFF; // h sync offset larger than h blank
        assert!(parse_detailed_timing(&dtd).is_none());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..600)) {
                let _ = Edid::parse(&data);
            }

            #[test]
            fn valid_header_never_panics(
                body in proptest::collection::vec(any::<u8>(), 120..=504),
            ) {
                let mut data = std::vec::Vec::from(EDID_HEADER);
                data.extend_from_slice(&body);
                fix_checksum(&mut data[..EDID_BLOCK_SIZE]);
                let edid = Edid::parse(&data).unwrap();
                prop_assert!(edid.modes.len() <= crate::mode::MAX_MODES);
            }
        }
    }
}
