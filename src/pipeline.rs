use std::ops::AddAssign;

use serde::Serialize;
use tracing::debug;

use crate::ber::{BerDecoder, VOZ_ROOT};
use crate::config::{DecodeConfig, Format};
use crate::diameter::DiameterDecoder;
use crate::error::BlockFailure;
use crate::record::FlatRecord;
use crate::scheduler::{BlockDecoder, Scheduler};
use crate::segment::{segment, Segmentation};

/// Per-buffer block counts. `skipped` blocks decoded cleanly but produced
/// no fields; `failed` includes a dropped trailing region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub attempted: usize,
    pub decoded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AddAssign for DecodeStats {
    fn add_assign(&mut self, other: Self) {
        self.attempted += other.attempted;
        self.decoded += other.decoded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// One record per decoded block, in buffer order.
    pub records: Vec<FlatRecord>,
    /// Failed blocks in buffer order, the dropped tail (if any) last.
    pub failures: Vec<BlockFailure>,
    pub stats: DecodeStats,
}

/// Segment `data`, decode every block on `scheduler`, and collect the results.
pub fn decode_buffer(data: &[u8], config: &DecodeConfig, scheduler: &Scheduler) -> DecodeReport {
    let seg = segment(config.format, data);
    match config.format {
        Format::Voz => {
            let decoder = BerDecoder::new(&VOZ_ROOT, config.max_depth);
            collect(&decoder, data, seg, scheduler)
        }
        Format::Volte => {
            let decoder = DiameterDecoder::new(config.flag_policy, config.max_depth);
            collect(&decoder, data, seg, scheduler)
        }
    }
}

fn collect<D: BlockDecoder>(decoder: &D, data: &[u8], seg: Segmentation, scheduler: &Scheduler) -> DecodeReport {
    let mut report = DecodeReport::default();
    report.stats.attempted = seg.blocks.len();

    for outcome in scheduler.run(decoder, data, &seg.blocks) {
        match outcome {
            Ok(record) if record.is_empty() => report.stats.skipped += 1,
            Ok(record) => {
                report.stats.decoded += 1;
                report.records.push(record);
            }
            Err(failure) => {
                debug!(offset = failure.offset, error = %failure.error, "block failed");
                report.stats.failed += 1;
                report.failures.push(failure);
            }
        }
    }

    if let Some(trailing) = seg.trailing {
        report.stats.attempted += 1;
        report.stats.failed += 1;
        report.failures.push(trailing);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    #[test]
    fn empty_buffer() {
        let config = DecodeConfig::new(Format::Volte);
        let report = decode_buffer(&[], &config, &Scheduler::sequential());
        assert_eq!(report, DecodeReport::default());
    }

    #[test]
    fn voz_records_without_known_fields_are_skipped() {
        // [5] is not a record type; [0] { [0] { [1] 7C3BAC } }
        let data = [
            0xA5, 0x01, 0x00, //
            0xA0, 0x07, 0xA0, 0x05, 0x81, 0x03, 0x7C, 0x3B, 0xAC,
        ];
        let config = DecodeConfig::new(Format::Voz);
        let report = decode_buffer(&data, &config, &Scheduler::sequential());
        assert_eq!(
            report.stats,
            DecodeStats {
                attempted: 2,
                decoded: 1,
                skipped: 1,
                failed: 0
            }
        );
        assert_eq!(
            report.records[0].get("callIdentificationNumber"),
            Some(&FieldValue::UInt(0x7C3BAC))
        );
    }

    #[test]
    fn stats_accumulate() {
        let mut total = DecodeStats::default();
        total += DecodeStats {
            attempted: 3,
            decoded: 2,
            skipped: 0,
            failed: 1,
        };
        total += DecodeStats {
            attempted: 1,
            decoded: 1,
            skipped: 0,
            failed: 0,
        };
        assert_eq!(total.attempted, 4);
        assert_eq!(total.failed, 1);
    }
}
