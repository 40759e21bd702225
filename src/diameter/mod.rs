//! Diameter accounting (command 271) engine for VoLTE CDR files.

pub mod avp;
pub mod dictionary;
pub mod header;

pub use avp::{flags_satisfy, read_avp_header, AvpFlags, AvpHeader, AvpScratch, AvpWalker};
pub use dictionary::AvpDefinition;
pub use header::{parse_header, CommandFlags, DiameterHeader};

use crate::config::FlagPolicy;
use crate::error::{DecodeError, Result};
use crate::record::{FieldValue, FlatRecord};
use crate::scheduler::BlockDecoder;
use crate::segment::Block;

/// Variant assumed when no message-level AVP announces one.
pub const DEFAULT_VARIANT: u8 = 2;

#[derive(Debug, Clone, Copy)]
pub struct DiameterDecoder {
    avps: AvpWalker,
}

impl DiameterDecoder {
    pub fn new(flag_policy: FlagPolicy, max_depth: usize) -> Self {
        Self {
            avps: AvpWalker::new(flag_policy, max_depth),
        }
    }

    /// Decode the message whose 2-byte prefix starts at `start`.
    /// Returns the record and the bytes the message occupies.
    pub fn decode_message(
        &self,
        data: &[u8],
        start: usize,
        scratch: &mut AvpScratch,
    ) -> Result<(FlatRecord, usize)> {
        let header = parse_header(data, start)?;
        let end = header.message_end(start);
        if end > data.len() {
            return Err(DecodeError::MessageTruncated {
                offset: start,
                needed: end - start,
                available: data.len() - start,
            });
        }

        let mut record = FlatRecord::new();
        record.insert("message_type", header.message_type().into());
        record.insert("flags", header.flags.letters().into());
        record.insert("application_id", FieldValue::UInt(header.application_id.into()));
        record.insert("hop_by_hop_id", FieldValue::UInt(header.hop_by_hop_id.into()));
        record.insert("end_to_end_id", FieldValue::UInt(header.end_to_end_id.into()));

        let variant = self
            .avps
            .walk(data, header.avps_start(start), end, &mut record, scratch)?
            .unwrap_or(DEFAULT_VARIANT);
        record.insert("variant", FieldValue::UInt(variant.into()));

        Ok((record, end - start))
    }
}

impl BlockDecoder for DiameterDecoder {
    type Scratch = AvpScratch;

    fn decode_block(&self, data: &[u8], block: Block, scratch: &mut AvpScratch) -> Result<FlatRecord> {
        self.decode_message(&data[..block.end.min(data.len())], block.start, scratch)
            .map(|(record, _)| record)
    }
}
