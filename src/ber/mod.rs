//! BER/TLV engine for Voz call data records.

mod decoder;
pub mod schema;
pub mod tag;

pub use decoder::{BerDecoder, BerScratch};
pub use schema::{Decoded, FieldDecoder, SchemaEntry, SchemaTable, VOZ_ROOT};
pub use tag::{read_length, read_tag, read_tlv, Tag, TagClass, Tlv};

use crate::error::Result;
use crate::record::FlatRecord;
use crate::scheduler::BlockDecoder;
use crate::segment::Block;

impl BlockDecoder for BerDecoder {
    type Scratch = BerScratch;

    fn decode_block(&self, data: &[u8], block: Block, scratch: &mut BerScratch) -> Result<FlatRecord> {
        self.decode_node(data, block.start, block.end, scratch)
    }
}
