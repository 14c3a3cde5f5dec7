//! Fetching raw EDID through a controller

use heapless::Vec;

use super::{EDID_BLOCK_SIZE, MAX_EDID_BLOCKS, MAX_EDID_LEN};
use crate::traits::{ControllerError, HdmiController};

/// Read the base block and as many extensions as the sink announces
///
/// Extensions beyond [`MAX_EDID_BLOCKS`] are not read. `out` is cleared
/// first and holds whole blocks on success.
pub fn read_edid<C: HdmiController + ?Sized>(
    ctrl: &mut C,
    out: &mut Vec<u8, MAX_EDID_LEN>,
) -> Result<usize, ControllerError> {
    out.clear();

    let mut block = [0u8; EDID_BLOCK_SIZE];
    ctrl.read_edid_block(0, &mut block)?;
    let _ = out.extend_from_slice(&block);

    let extensions = usize::from(block[126]).min(MAX_EDID_BLOCKS - 1);
    for index in 1..=extensions {
        ctrl.read_edid_block(index as u8, &mut block)?;
        let _ = out.extend_from_slice(&block);
    }

    Ok(extensions + 1)
}
