use bitflags::bitflags;
use tracing::{debug, trace};

use super::dictionary;
use crate::config::FlagPolicy;
use crate::error::{DecodeError, Result};
use crate::record::FlatRecord;
use crate::value::ValueType;

pub const AVP_HEADER_LEN: usize = 8;
pub const AVP_VENDOR_HEADER_LEN: usize = 12;
pub const AVP_RESERVED_FLAGS: u8 = 0x1F;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AvpFlags: u8 {
        const VENDOR = 0b_1000_0000;
        const MANDATORY = 0b_0100_0000;
        const PROTECTED = 0b_0010_0000;
    }
}

/// Reserved bits must be clear, and every expected bit must be set.
pub fn flags_satisfy(raw: u8, expected: Option<AvpFlags>) -> bool {
    if raw & AVP_RESERVED_FLAGS != 0 {
        return false;
    }
    expected.map_or(true, |e| AvpFlags::from_bits_truncate(raw).contains(e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvpHeader {
    pub code: u32,
    pub raw_flags: u8,
    /// Declared length including this header, without padding.
    pub length: usize,
    pub vendor_id: u32,
    pub header_len: usize,
}

impl AvpHeader {
    /// Distance to the next AVP: the length rounded up to a multiple of 4.
    #[inline]
    pub fn padded_len(&self) -> usize {
        (self.length + 3) & !3
    }
}

/// Read and bounds-check the AVP header at `pos`; the AVP must end by `end`.
pub fn read_avp_header(data: &[u8], pos: usize, end: usize) -> Result<AvpHeader> {
    let end = end.min(data.len());
    if end.saturating_sub(pos) < AVP_HEADER_LEN {
        return Err(DecodeError::AvpTruncated { offset: pos });
    }
    let h = &data[pos..pos + AVP_HEADER_LEN];
    let code = u32::from_be_bytes([h[0], h[1], h[2], h[3]]);
    let raw_flags = h[4];
    let length = u32::from_be_bytes([0, h[5], h[6], h[7]]) as usize;

    let header_len = if raw_flags & AvpFlags::VENDOR.bits() != 0 {
        AVP_VENDOR_HEADER_LEN
    } else {
        AVP_HEADER_LEN
    };
    if length < header_len {
        return Err(DecodeError::AvpLengthInvalid { offset: pos, length });
    }
    if length > end - pos {
        return Err(DecodeError::ValueTruncated {
            offset: pos,
            needed: length,
            available: end - pos,
        });
    }

    let vendor_id = if header_len == AVP_VENDOR_HEADER_LEN {
        u32::from_be_bytes([data[pos + 8], data[pos + 9], data[pos + 10], data[pos + 11]])
    } else {
        dictionary::VENDOR_DIAMETER
    };

    Ok(AvpHeader {
        code,
        raw_flags,
        length,
        vendor_id,
        header_len,
    })
}

#[derive(Debug, Clone, Copy)]
struct AvpFrame {
    cursor: usize,
    end: usize,
}

/// Grouped-AVP stack reused across messages by one worker.
#[derive(Debug, Default)]
pub struct AvpScratch {
    frames: Vec<AvpFrame>,
}

/// Flattens an AVP sequence into a record, descending into grouped AVPs
/// with an explicit stack.
#[derive(Debug, Clone, Copy)]
pub struct AvpWalker {
    pub flag_policy: FlagPolicy,
    pub max_depth: usize,
}

impl AvpWalker {
    pub fn new(flag_policy: FlagPolicy, max_depth: usize) -> Self {
        Self {
            flag_policy,
            max_depth: max_depth.max(1),
        }
    }

    /// Decode the AVPs in `[start, end)` into `record`.
    ///
    /// Returns the charging variant announced by the first message-level AVP
    /// that carries one.
    pub fn walk(
        &self,
        data: &[u8],
        start: usize,
        end: usize,
        record: &mut FlatRecord,
        scratch: &mut AvpScratch,
    ) -> Result<Option<u8>> {
        scratch.frames.clear();
        scratch.frames.push(AvpFrame { cursor: start, end });
        let mut variant = None;

        while let Some(frame) = scratch.frames.last_mut() {
            if frame.cursor >= frame.end {
                scratch.frames.pop();
                continue;
            }

            let pos = frame.cursor;
            let avp = read_avp_header(data, pos, frame.end)?;
            frame.cursor = (pos + avp.padded_len()).min(frame.end);
            let top_level = scratch.frames.len() == 1;

            let Some(def) = dictionary::lookup(avp.code, avp.vendor_id) else {
                trace!(code = avp.code, vendor = avp.vendor_id, offset = pos, "unknown avp skipped");
                continue;
            };

            if !self.accept_flags(&avp, def.expected_flags) {
                if self.flag_policy == FlagPolicy::AbortBlock {
                    return Err(DecodeError::AvpFlagsRejected {
                        offset: pos,
                        code: avp.code,
                        flags: avp.raw_flags,
                    });
                }
                debug!(avp = def.name, flags = avp.raw_flags, offset = pos, "avp flags rejected, skipped");
                continue;
            }

            // Any message-level AVP may carry the variant, not only the first one.
            if top_level && variant.is_none() {
                variant = def.variant;
            }

            let value_start = pos + avp.header_len;
            let value_end = pos + avp.length;
            match def.value_type {
                ValueType::Grouped => {
                    if scratch.frames.len() >= self.max_depth {
                        return Err(DecodeError::DepthExceeded {
                            offset: pos,
                            limit: self.max_depth,
                        });
                    }
                    scratch.frames.push(AvpFrame {
                        cursor: value_start,
                        end: value_end,
                    });
                }
                leaf => record.insert(def.name, leaf.decode(&data[value_start..value_end])),
            }
        }
        Ok(variant)
    }

    fn accept_flags(&self, avp: &AvpHeader, expected: Option<AvpFlags>) -> bool {
        match self.flag_policy {
            FlagPolicy::Ignore => avp.raw_flags & AVP_RESERVED_FLAGS == 0,
            FlagPolicy::SkipAvp | FlagPolicy::AbortBlock => flags_satisfy(avp.raw_flags, expected),
        }
    }
}
