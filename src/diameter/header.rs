use bitflags::bitflags;

use crate::error::{DecodeError, HeaderFault, Result};

/// Bytes in front of every Diameter header in VoLTE CDR files.
pub const PREFIX_LEN: usize = 2;
pub const HEADER_LEN: usize = 20;
pub const COMMAND_ACCOUNTING: u32 = 271;
pub const DIAMETER_VERSION: u8 = 1;

const RESERVED_COMMAND_FLAGS: u8 = 0x0F;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CommandFlags: u8 {
        const REQUEST = 0b_1000_0000;
        const PROXIABLE = 0b_0100_0000;
        const ERROR = 0b_0010_0000;
        const RETRANSMITTED = 0b_0001_0000;
    }
}

impl CommandFlags {
    /// Set flags as letters, e.g. `RP`.
    pub fn letters(self) -> String {
        [
            (CommandFlags::REQUEST, 'R'),
            (CommandFlags::PROXIABLE, 'P'),
            (CommandFlags::ERROR, 'E'),
            (CommandFlags::RETRANSMITTED, 'T'),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, c)| *c)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiameterHeader {
    pub version: u8,
    /// Includes the 20 header bytes, excludes the 2-byte prefix.
    pub message_length: u32,
    pub flags: CommandFlags,
    pub command_code: u32,
    pub application_id: u32,
    pub hop_by_hop_id: u32,
    pub end_to_end_id: u32,
}

impl DiameterHeader {
    /// `ACR` for requests, `ACA` for answers.
    pub fn message_type(&self) -> &'static str {
        if self.flags.contains(CommandFlags::REQUEST) {
            "ACR"
        } else {
            "ACA"
        }
    }

    /// First AVP byte for a block starting at `block_start`.
    pub fn avps_start(&self, block_start: usize) -> usize {
        block_start + PREFIX_LEN + HEADER_LEN
    }

    /// One past the last byte of the message for a block starting at `block_start`.
    pub fn message_end(&self, block_start: usize) -> usize {
        block_start + PREFIX_LEN + self.message_length as usize
    }
}

#[inline]
fn be24(b: &[u8]) -> u32 {
    u32::from_be_bytes([0, b[0], b[1], b[2]])
}

#[inline]
fn be32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Parse and validate the header of the block starting at `start`.
///
/// Only the fixed prefix and header are read, never the AVPs.
pub fn parse_header(data: &[u8], start: usize) -> Result<DiameterHeader> {
    let from = start + PREFIX_LEN;
    let h = data
        .get(from..from + HEADER_LEN)
        .ok_or(DecodeError::HeaderTruncated {
            offset: start,
            available: data.len().saturating_sub(start),
        })?;

    let invalid = |fault| DecodeError::HeaderInvalid { offset: start, fault };

    let version = h[0];
    if version != DIAMETER_VERSION {
        return Err(invalid(HeaderFault::Version(version)));
    }
    let message_length = be24(&h[1..4]);
    let raw_flags = h[4];
    if raw_flags & RESERVED_COMMAND_FLAGS != 0 {
        return Err(invalid(HeaderFault::ReservedFlags(raw_flags)));
    }
    let command_code = be24(&h[5..8]);
    if command_code != COMMAND_ACCOUNTING {
        return Err(invalid(HeaderFault::CommandCode(command_code)));
    }
    if (message_length as usize) < HEADER_LEN {
        return Err(invalid(HeaderFault::MessageLength(message_length)));
    }

    Ok(DiameterHeader {
        version,
        message_length,
        flags: CommandFlags::from_bits_truncate(raw_flags),
        command_code,
        application_id: be32(&h[8..12]),
        hop_by_hop_id: be32(&h[12..16]),
        end_to_end_id: be32(&h[16..20]),
    })
}
