//! CEA-861 extension block

use super::parser::{parse_detailed_timing, Edid, DESCRIPTOR_LEN};
use super::EDID_BLOCK_SIZE;
use crate::mode::cea_mode;
use crate::mode::display_mode::push_unique;

/// Data block tag: video data block (short video descriptors)
const TAG_VIDEO: u8 = 2;

/// Data block tag: vendor-specific data block
const TAG_VENDOR: u8 = 3;

/// IEEE OUI of HDMI Licensing, LLC, little endian as stored in the block
const HDMI_OUI: [u8; 3] = [0x03, 0x0C, 0x00];

/// Merge the modes and capabilities of one CEA extension into `edid`
///
/// The caller has already checked the tag and checksum.
pub(super) fn parse_cea_extension(block: &[u8], edid: &mut Edid) {
    let dtd_offset = usize::from(block[2]);

    // Offset 0 means no data blocks and no timings; offsets below 4 are invalid
    if dtd_offset < 4 || dtd_offset >= EDID_BLOCK_SIZE {
        return;
    }

    let mut pos = 4;
    while pos < dtd_offset {
        let header = block[pos];
        let tag = header >> 5;
        let len = usize::from(header & 0x1F);
        let end = pos + 1 + len;
        if end > dtd_offset {
            break;
        }
        let payload = &block[pos + 1..end];

        match tag {
            TAG_VIDEO => {
                for &svd in payload {
                    // Codes 129..=192 carry the native flag in bit 7
                    let code = if (129..=192).contains(&svd) { svd & 0x7F } else { svd };
                    if let Some(mode) = cea_mode(code) {
                        push_unique(&mut edid.modes, mode);
                    }
                }
            }
            TAG_VENDOR if payload.len() >= 3 && payload[..3] == HDMI_OUI => {
                edid.is_hdmi = true;
            }
            _ => {}
        }
        pos = end;
    }

    let mut offset = dtd_offset;
    while offset + DESCRIPTOR_LEN < EDID_BLOCK_SIZE {
        let desc = &block[offset..offset + DESCRIPTOR_LEN];
        match parse_detailed_timing(desc) {
            Some((mode, _)) => {
                push_unique(&mut edid.modes, mode);
            }
            None if desc[0] == 0 && desc[1] == 0 => break,
            None => {}
        }
        offset += DESCRIPTOR_LEN;
    }
}

#[cfg(test)]
mod tests {
    use crate::edid::parser::tests::{base_block, fix_checksum};
    use crate::edid::Edid;

    /// 1280x720@60 detailed timing, positive syncs
    const DTD_720P: [u8; 18] = [
        0x01, 0x1D, 0x00, 0x72, 0x51, 0xD0, 0x1E, 0x20, 0x6E, 0x28, 0x55, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x1E,
    ];

    /// CEA block with VICs 16 (native), 4 and 1, an HDMI VSDB and an 1280x720 DTD
    fn cea_block(with_vsdb: bool) -> [u8; 128] {
        let mut b = [0u8; 128];
        b[0] = 0x02;
        b[1] = 0x03;
        b[3] = 0x00;

        let mut pos = 4;
        b[pos..pos + 4].copy_from_slice(&[0x43, 0x90, 0x04, 0x01]);
        pos += 4;
        if with_vsdb {
            b[pos..pos + 6].copy_from_slice(&[0x65, 0x03, 0x0C, 0x00, 0x10, 0x00]);
            pos += 6;
        }
        b[2] = pos as u8;
        b[pos..pos + 18].copy_from_slice(&DTD_720P);
        fix_checksum(&mut b);
        b
    }

    fn edid_with(ext: [u8; 128]) -> Edid {
        let mut data = [0u8; 256];
        data[..128].copy_from_slice(&base_block(1));
        data[128..].copy_from_slice(&ext);
        Edid::parse(&data).unwrap()
    }

    #[test]
    fn test_hdmi_vsdb() {
        assert!(edid_with(cea_block(true)).is_hdmi);
        assert!(!edid_with(cea_block(false)).is_hdmi);
    }

    #[test]
    fn test_svd_modes_merged_without_duplicates() {
        let edid = edid_with(cea_block(true));
        let names: std::vec::Vec<&str> = edid.modes.iter().map(|m| m.name.as_str()).collect();

        // 1080p DTD and VGA from the base block, VIC 16 and 1 are duplicates,
        // VIC 4 and the 720p DTD are the same timing
        assert_eq!(names, ["1920x1080", "640x480", "1280x720"]);
        assert!(edid.modes[0].is_preferred());
    }

    #[test]
    fn test_bad_extension_checksum_skipped() {
        let mut ext = cea_block(true);
        ext[10] ^= 0x01;
        let edid = edid_with(ext);
        assert!(!edid.is_hdmi);
        assert_eq!(edid.modes.len(), 2);
    }

    #[test]
    fn test_truncated_data_block() {
        let mut ext = cea_block(true);
        // Video block claims more bytes than fit before the DTDs
        ext[4] = 0x5F;
        fix_checksum(&mut ext);
        let edid = edid_with(ext);
        assert_eq!(edid.modes.len(), 3);
    }
}
