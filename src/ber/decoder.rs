use tracing::trace;

use super::schema::{Decoded, FieldDecoder, SchemaEntry, SchemaTable};
use super::tag::{read_tlv, Tlv};
use crate::error::{DecodeError, Result};
use crate::record::FlatRecord;

/// An open constructed node: children are read from `cursor` up to `end`
/// and resolved against `table`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    cursor: usize,
    end: usize,
    table: &'static SchemaTable,
    /// Start of this frame's positional counters in [`BerScratch::counters`].
    counters_from: usize,
}

/// Working memory reused across blocks by one worker.
#[derive(Debug, Default)]
pub struct BerScratch {
    frames: Vec<Frame>,
    /// `(tag, occurrences)` pairs for positional entries, one run per frame.
    counters: Vec<(u32, usize)>,
}

impl BerScratch {
    fn reset(&mut self) {
        self.frames.clear();
        self.counters.clear();
    }
}

/// Schema-driven BER walk producing one flat record per top-level TLV.
#[derive(Debug, Clone, Copy)]
pub struct BerDecoder {
    root: &'static SchemaTable,
    max_depth: usize,
}

impl BerDecoder {
    pub fn new(root: &'static SchemaTable, max_depth: usize) -> Self {
        Self {
            root,
            max_depth: max_depth.max(1),
        }
    }

    /// Decode the record starting at `offset`.
    ///
    /// EOC markers and zero-length nodes in front of the record are consumed
    /// first. Returns `None` once only such filler remains. The consumed count
    /// covers the filler and the record.
    pub fn decode(
        &self,
        data: &[u8],
        offset: usize,
        scratch: &mut BerScratch,
    ) -> Result<Option<(FlatRecord, usize)>> {
        let mut pos = offset;
        let top = loop {
            if pos >= data.len() {
                return Ok(None);
            }
            let tlv = read_tlv(data, pos, data.len())?;
            if !tlv.is_skippable() {
                break tlv;
            }
            pos = tlv.end();
        };

        let mut record = FlatRecord::new();
        self.walk(data, pos, top, &mut record, scratch)?;
        Ok(Some((record, top.end() - offset)))
    }

    /// Decode exactly the TLV at `offset`, which must end by `end`.
    pub fn decode_node(
        &self,
        data: &[u8],
        offset: usize,
        end: usize,
        scratch: &mut BerScratch,
    ) -> Result<FlatRecord> {
        let tlv = read_tlv(data, offset, end)?;
        let mut record = FlatRecord::new();
        if !tlv.is_skippable() {
            self.walk(data, offset, tlv, &mut record, scratch)?;
        }
        Ok(record)
    }

    fn walk(
        &self,
        data: &[u8],
        at: usize,
        top: Tlv<'_>,
        record: &mut FlatRecord,
        scratch: &mut BerScratch,
    ) -> Result<()> {
        scratch.reset();
        self.visit(at, top, self.root, record, scratch)?;

        while let Some(frame) = scratch.frames.last_mut() {
            if frame.cursor >= frame.end {
                let done = scratch.frames.pop();
                if let Some(done) = done {
                    scratch.counters.truncate(done.counters_from);
                }
                continue;
            }

            let at = frame.cursor;
            let tlv = read_tlv(data, at, frame.end)?;
            frame.cursor = tlv.end();
            let table = frame.table;

            if tlv.tag.is_eoc(tlv.length) {
                continue;
            }
            self.visit(at, tlv, table, record, scratch)?;
        }
        Ok(())
    }

    /// Resolve one node against `table`: emit a leaf, or open a frame for a group.
    fn visit(
        &self,
        at: usize,
        tlv: Tlv<'_>,
        table: &'static SchemaTable,
        record: &mut FlatRecord,
        scratch: &mut BerScratch,
    ) -> Result<()> {
        let Some(entry) = table.lookup(tlv.tag.number) else {
            trace!(tag = tlv.tag.number, table = table.name, offset = at, "unknown tag skipped");
            return Ok(());
        };

        match entry {
            SchemaEntry::Leaf { name, decoder } => {
                if tlv.length > 0 {
                    emit(record, name, *decoder, tlv.value);
                }
            }
            SchemaEntry::Positional { names, decoder } => {
                if tlv.length == 0 {
                    return Ok(());
                }
                let index = next_position(scratch, tlv.tag.number);
                if let Some(name) = names.get(index) {
                    emit(record, name, *decoder, tlv.value);
                }
            }
            SchemaEntry::Group { key, name, table } => {
                if tlv.length == 0 {
                    return Ok(());
                }
                if let Some(key) = key {
                    record.insert(*key, (*name).into());
                }
                if tlv.tag.constructed {
                    if scratch.frames.len() >= self.max_depth {
                        return Err(DecodeError::DepthExceeded {
                            offset: at,
                            limit: self.max_depth,
                        });
                    }
                    scratch.frames.push(Frame {
                        cursor: tlv.value_start,
                        end: tlv.end(),
                        table: *table,
                        counters_from: scratch.counters.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Occurrence index of `tag` within the innermost open frame.
fn next_position(scratch: &mut BerScratch, tag: u32) -> usize {
    let from = scratch.frames.last().map_or(0, |f| f.counters_from);
    match scratch.counters[from..].iter_mut().find(|(t, _)| *t == tag) {
        Some((_, seen)) => {
            let index = *seen;
            *seen += 1;
            index
        }
        None => {
            scratch.counters.push((tag, 1));
            0
        }
    }
}

fn emit(record: &mut FlatRecord, name: &str, decoder: FieldDecoder, bytes: &[u8]) {
    match decoder.decode(bytes) {
        Ok(Decoded::Single(value)) => record.insert(name, value),
        Ok(Decoded::Parts(parts)) => {
            for (part, value) in parts {
                record.insert(format!("{}.{}", name, part), value);
            }
        }
        Err(err) => trace!(field = name, error = %err, "value rejected"),
    }
}
