//! EDID (Extended Display Identification Data)
//!
//! The sink describes itself in 128-byte blocks read over DDC. Block 0 is
//! the base EDID; following blocks are extensions, of which only the
//! CEA-861 extension is interpreted.

mod cea_ext;
mod parser;
mod read;

pub use parser::{Edid, EdidError, MONITOR_NAME_LEN};
pub use read::read_edid;

/// Size of one EDID block
pub const EDID_BLOCK_SIZE: usize = 128;

/// Maximum blocks read from a sink (base + 3 extensions)
pub const MAX_EDID_BLOCKS: usize = 4;

/// Maximum raw EDID length
pub const MAX_EDID_LEN: usize = EDID_BLOCK_SIZE * MAX_EDID_BLOCKS;

/// Fixed header of the base block
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Check that a block's bytes sum to zero modulo 256
pub fn block_checksum_ok(block: &[u8]) -> bool {
    block.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) == 0
}
