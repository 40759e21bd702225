//! Splits a loaded buffer into independently decodable blocks.
//!
//! Both formats are scanned structurally: VoLTE reads only the fixed
//! prefix and header of each message, Voz reads only the tag and length of
//! each top-level TLV. Neither looks inside a block, so the blocks can be
//! decoded in any order.

use tracing::warn;

use crate::ber::read_tlv;
use crate::config::Format;
use crate::diameter::parse_header;
use crate::error::{BlockFailure, DecodeError, Result};

/// Byte range `[start, end)` of one record or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

/// Ordered blocks plus the fault that stopped the scan, if any.
/// Bytes from the fault onwards are not part of any block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub blocks: Vec<Block>,
    pub trailing: Option<BlockFailure>,
}

pub fn segment(format: Format, data: &[u8]) -> Segmentation {
    let seg = match format {
        Format::Voz => segment_voz(data),
        Format::Volte => segment_volte(data),
    };
    if let Some(failure) = &seg.trailing {
        warn!(
            %format,
            offset = failure.offset,
            dropped = data.len() - failure.offset,
            error = %failure.error,
            "dropping trailing bytes"
        );
    }
    seg
}

/// Locate the Diameter message starting at `offset`. `None` at end of buffer.
pub fn slice_next_block(data: &[u8], offset: usize) -> Result<Option<Block>> {
    if offset >= data.len() {
        return Ok(None);
    }
    let header = parse_header(data, offset)?;
    let end = header.message_end(offset);
    if end > data.len() {
        return Err(DecodeError::MessageTruncated {
            offset,
            needed: end - offset,
            available: data.len() - offset,
        });
    }
    Ok(Some(Block { start: offset, end }))
}

pub fn segment_volte(data: &[u8]) -> Segmentation {
    let mut seg = Segmentation::default();
    let mut offset = 0usize;
    loop {
        match slice_next_block(data, offset) {
            Ok(Some(block)) => {
                seg.blocks.push(block);
                offset = block.end;
            }
            Ok(None) => break,
            Err(error) => {
                seg.trailing = Some(BlockFailure { offset, error });
                break;
            }
        }
    }
    seg
}

/// One block per top-level TLV. EOC markers and empty nodes between
/// records are stepped over.
pub fn segment_voz(data: &[u8]) -> Segmentation {
    let mut seg = Segmentation::default();
    let mut offset = 0usize;
    while offset < data.len() {
        match read_tlv(data, offset, data.len()) {
            Ok(tlv) => {
                if !tlv.is_skippable() {
                    seg.blocks.push(Block {
                        start: offset,
                        end: tlv.end(),
                    });
                }
                offset = tlv.end();
            }
            Err(error) => {
                seg.trailing = Some(BlockFailure { offset, error });
                break;
            }
        }
    }
    seg
}
