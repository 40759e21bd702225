mod common;

#[cfg(test)]
mod tests {
    use crate::common::{simple_request, tlv};
    use cdr_decoder_fast::{decode_buffer, DecodeConfig, DecodeError, FieldValue, Format, Scheduler};
    use proptest::prelude::*;

    /// Concatenated requests and the start offset of each.
    fn volte_file(count: u32) -> (Vec<u8>, Vec<usize>) {
        let mut data = Vec::new();
        let mut starts = Vec::with_capacity(count as usize);
        for n in 0..count {
            starts.push(data.len());
            data.extend(simple_request(n));
        }
        (data, starts)
    }

    /// Concatenated single transit records, 9 bytes each, numbered by call id.
    fn voz_file(count: u32) -> (Vec<u8>, Vec<usize>) {
        let mut data = Vec::new();
        let mut starts = Vec::with_capacity(count as usize);
        for n in 0..count {
            starts.push(data.len());
            let call_id = [(n >> 16) as u8, (n >> 8) as u8, n as u8];
            data.extend(tlv(0xA0, &tlv(0xA0, &tlv(0x81, &call_id))));
        }
        (data, starts)
    }

    #[test]
    fn test_voz_worker_count_does_not_change_output() {
        let (data, _) = voz_file(600);
        let config = DecodeConfig::new(Format::Voz);
        let one = decode_buffer(&data, &config, &Scheduler::sequential());
        assert_eq!(one.records.len(), 600);
        assert!(one.failures.is_empty());

        for workers in [2, 4, 7] {
            let scheduler = Scheduler::new(workers).unwrap();
            let many = decode_buffer(&data, &config, &scheduler);
            assert_eq!(one, many, "workers = {}", workers);
        }

        for (n, rec) in one.records.iter().enumerate() {
            assert_eq!(rec.get("callIdentificationNumber"), Some(&FieldValue::UInt(n as u64)));
        }
    }

    #[test]
    fn test_worker_count_does_not_change_output() {
        let (data, _) = volte_file(600);
        let config = DecodeConfig::new(Format::Volte);
        let one = decode_buffer(&data, &config, &Scheduler::sequential());
        assert_eq!(one.records.len(), 600);

        for workers in [2, 4, 7] {
            let scheduler = Scheduler::new(workers).unwrap();
            let many = decode_buffer(&data, &config, &scheduler);
            assert_eq!(one, many, "workers = {}", workers);
        }

        for (n, rec) in one.records.iter().enumerate() {
            assert_eq!(rec.get("hop_by_hop_id"), Some(&FieldValue::UInt(n as u64)));
            assert_eq!(rec.get("CC-Time"), Some(&FieldValue::UInt(n as u64)));
        }
    }

    #[test]
    fn test_jsonl_output_is_identical_across_workers() {
        let (data, _) = volte_file(64);
        let config = DecodeConfig::new(Format::Volte);
        let render = |scheduler: &Scheduler| {
            let mut out = Vec::new();
            for rec in decode_buffer(&data, &config, scheduler).records {
                rec.write_jsonl(&mut out).unwrap();
            }
            out
        };
        let sequential = render(&Scheduler::sequential());
        let pooled = render(&Scheduler::new(3).unwrap());
        assert_eq!(sequential, pooled);
        assert_eq!(sequential.iter().filter(|&&b| b == b'\n').count(), 64);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_voz_truncation_keeps_earlier_records(cut_permille in 0usize..1000) {
            let (data, starts) = voz_file(40);
            let cut = data.len() * cut_permille / 1000;

            let scheduler = Scheduler::new(2).unwrap();
            let report = decode_buffer(&data[..cut], &DecodeConfig::new(Format::Voz), &scheduler);

            let complete = starts.iter().skip(1).chain(std::iter::once(&data.len())).filter(|&&end| end <= cut).count();
            prop_assert_eq!(report.records.len(), complete);
            for (n, rec) in report.records.iter().enumerate() {
                prop_assert_eq!(rec.get("callIdentificationNumber"), Some(&FieldValue::UInt(n as u64)));
            }

            if starts.contains(&cut) {
                prop_assert!(report.failures.is_empty());
            } else {
                prop_assert_eq!(report.failures.len(), 1);
                prop_assert_eq!(report.failures[0].offset, starts[complete]);
                let is_truncation = matches!(
                    report.failures[0].error,
                    DecodeError::LengthTruncated { .. } | DecodeError::ValueTruncated { .. }
                );
                prop_assert!(is_truncation);
            }
        }

        #[test]
        fn prop_truncation_keeps_earlier_messages(cut_permille in 0usize..1000) {
            let (data, starts) = volte_file(40);
            let cut = data.len() * cut_permille / 1000;
            let truncated = &data[..cut];

            let scheduler = Scheduler::new(2).unwrap();
            let report = decode_buffer(truncated, &DecodeConfig::new(Format::Volte), &scheduler);

            let complete = starts.iter().skip(1).chain(std::iter::once(&data.len())).filter(|&&end| end <= cut).count();
            prop_assert_eq!(report.records.len(), complete);
            for (n, rec) in report.records.iter().enumerate() {
                prop_assert_eq!(rec.get("hop_by_hop_id"), Some(&FieldValue::UInt(n as u64)));
            }

            if starts.contains(&cut) || cut == data.len() {
                prop_assert!(report.failures.is_empty());
            } else {
                prop_assert_eq!(report.failures.len(), 1);
                prop_assert_eq!(report.failures[0].offset, starts[complete]);
                let is_truncation = matches!(
                    report.failures[0].error,
                    DecodeError::HeaderTruncated { .. } | DecodeError::MessageTruncated { .. }
                );
                prop_assert!(is_truncation);
            }
        }
    }
}
