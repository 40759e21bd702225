mod common;

#[cfg(test)]
mod tests {
    use crate::common::{avp, grouped, message, simple_request, FLAG_M, FLAG_V, FLAG_VM};
    use cdr_decoder_fast::diameter::dictionary::{VENDOR_3GPP, VENDOR_ERICSSON};
    use cdr_decoder_fast::diameter::{
        flags_satisfy, parse_header, AvpFlags, AvpScratch, DiameterDecoder, DEFAULT_VARIANT,
    };
    use cdr_decoder_fast::error::HeaderFault;
    use cdr_decoder_fast::{decode_buffer, DecodeConfig, DecodeError, FieldValue, FlagPolicy, Format, Scheduler};

    fn subscription(kind: i32, data: &str) -> Vec<u8> {
        grouped(
            443,
            FLAG_M,
            None,
            &[avp(450, FLAG_M, None, &kind.to_be_bytes()), avp(444, FLAG_M, None, data.as_bytes())],
        )
    }

    fn decode(msg: &[u8]) -> Result<cdr_decoder_fast::FlatRecord, DecodeError> {
        DiameterDecoder::new(FlagPolicy::SkipAvp, 64)
            .decode_message(msg, 0, &mut AvpScratch::default())
            .map(|(rec, used)| {
                assert_eq!(used, msg.len());
                rec
            })
    }

    #[test]
    fn test_header_spans_message_length_from_version_byte() {
        let msg = message(0x80, 7, &[0u8; 20]);
        let header = parse_header(&msg, 0).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.message_length, 40);
        assert_eq!(header.command_code, 271);
        assert_eq!(header.message_end(0) - 2, 40);
        assert_eq!(header.message_type(), "ACR");
    }

    #[test]
    fn test_header_rejects_version_and_command() {
        let mut bad_version = message(0x80, 1, &[]);
        bad_version[2] = 2;
        assert!(matches!(
            parse_header(&bad_version, 0),
            Err(DecodeError::HeaderInvalid { fault: HeaderFault::Version(2), .. })
        ));

        let mut bad_command = message(0x80, 1, &[]);
        bad_command[9] = 0x10;
        assert!(matches!(
            parse_header(&bad_command, 0),
            Err(DecodeError::HeaderInvalid { fault: HeaderFault::CommandCode(272), .. })
        ));
    }

    #[test]
    fn test_expected_flag_patterns() {
        let vm = AvpFlags::VENDOR | AvpFlags::MANDATORY;
        assert!(flags_satisfy(0xC0, Some(vm)));
        assert!(!flags_satisfy(0x80, Some(vm)));
        assert!(!flags_satisfy(0xC4, Some(vm)));
        assert!(flags_satisfy(0xA0, Some(AvpFlags::VENDOR)));
    }

    #[test]
    fn test_full_accounting_request() {
        let avps = [
            avp(263, FLAG_M, None, b"scscf.ims;4242;7"),
            avp(264, 0x00, None, b"scscf01.ims.example"),
            avp(480, FLAG_M, None, &2i32.to_be_bytes()),
            subscription(0, "5511987654321"),
            subscription(2, "sip:alice@ims.example"),
            avp(9999, FLAG_M, None, b"unknown"),
            grouped(
                873,
                FLAG_VM,
                Some(VENDOR_3GPP),
                &[grouped(
                    876,
                    FLAG_VM,
                    Some(VENDOR_3GPP),
                    &[
                        avp(829, FLAG_VM, Some(VENDOR_3GPP), &0i32.to_be_bytes()),
                        avp(830, FLAG_VM, Some(VENDOR_3GPP), b"tel:+5511987654321"),
                    ],
                )],
            ),
        ]
        .concat();
        let msg = message(0xC0, 0xABCD, &avps);
        let rec = decode(&msg).unwrap();

        assert_eq!(rec.get("message_type"), Some(&FieldValue::from("ACR")));
        assert_eq!(rec.get("flags"), Some(&FieldValue::from("RP")));
        assert_eq!(rec.get("hop_by_hop_id"), Some(&FieldValue::UInt(0xABCD)));
        assert_eq!(rec.get("Session-Id"), Some(&FieldValue::from("scscf.ims;4242;7")));
        assert_eq!(rec.get("Origin-Host"), Some(&FieldValue::from("scscf01.ims.example")));
        assert_eq!(rec.get("Accounting-Record-Type"), Some(&FieldValue::Int(2)));
        assert_eq!(
            rec.get("Subscription-Id-Data"),
            Some(&FieldValue::from("5511987654321;sip:alice@ims.example"))
        );
        assert_eq!(rec.get("Subscription-Id-Type"), Some(&FieldValue::from("0;2")));
        assert_eq!(rec.get("Role-of-Node"), Some(&FieldValue::Int(0)));
        assert_eq!(rec.get("User-Session-Id"), Some(&FieldValue::from("tel:+5511987654321")));
        assert_eq!(rec.get("variant"), Some(&FieldValue::UInt(2)));
        assert!(rec.iter().all(|(k, _)| !k.contains("9999")));
    }

    #[test]
    fn test_ericsson_service_information_selects_variant_one() {
        let avps = [
            avp(263, FLAG_M, None, b"s"),
            grouped(
                285,
                FLAG_V,
                Some(VENDOR_ERICSSON),
                &[avp(1207, FLAG_V, Some(VENDOR_ERICSSON), b"5511000")],
            ),
        ]
        .concat();
        let rec = decode(&message(0x80, 1, &avps)).unwrap();
        assert_eq!(rec.get("variant"), Some(&FieldValue::UInt(1)));
        assert_eq!(rec.get("MSC-Address"), Some(&FieldValue::from("5511000")));

        let plain = decode(&simple_request(3)).unwrap();
        assert_eq!(plain.get("variant"), Some(&FieldValue::UInt(DEFAULT_VARIANT.into())));
    }

    #[test]
    fn test_answer_and_value_fallback() {
        // CC-Time with 3 bytes cannot be an Unsigned32
        let avps = avp(420, FLAG_M, None, &[1, 2, 3]);
        let rec = decode(&message(0x40, 1, &avps)).unwrap();
        assert_eq!(rec.get("message_type"), Some(&FieldValue::from("ACA")));
        assert_eq!(rec.get("flags"), Some(&FieldValue::from("P")));
        assert_eq!(rec.get("CC-Time"), Some(&FieldValue::from("010203")));
    }

    #[test]
    fn test_child_overrunning_group_fails_only_its_message() {
        let mut group = subscription(0, "5511");
        // inflate the inner Subscription-Id-Type length past the group end
        group[8 + 7] = 0x40;
        let mut data = message(0x80, 1, &group);
        data.extend(simple_request(2));

        let config = DecodeConfig::new(Format::Volte);
        let report = decode_buffer(&data, &config, &Scheduler::sequential());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].offset, 0);
        assert!(matches!(report.failures[0].error, DecodeError::ValueTruncated { .. }));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].get("hop_by_hop_id"), Some(&FieldValue::UInt(2)));
    }

    #[test]
    fn test_flag_policy_abort_block() {
        // Session-Id without its M bit
        let mut data = message(0x80, 1, &avp(263, 0x00, None, b"s"));
        data.extend(simple_request(2));

        let skip = decode_buffer(&data, &DecodeConfig::new(Format::Volte), &Scheduler::sequential());
        assert_eq!(skip.records.len(), 2);
        assert_eq!(skip.records[0].get("Session-Id"), None);

        let abort = DecodeConfig::new(Format::Volte).with_flag_policy(FlagPolicy::AbortBlock);
        let report = decode_buffer(&data, &abort, &Scheduler::sequential());
        assert_eq!(report.records.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            DecodeError::AvpFlagsRejected { code: 263, flags: 0x00, .. }
        ));
    }

    #[test]
    fn test_truncated_trailing_message() {
        let mut data = simple_request(1);
        data.extend(simple_request(2));
        let tail_at = data.len();
        let third = simple_request(3);
        data.extend_from_slice(&third[..third.len() - 5]);

        let report = decode_buffer(&data, &DecodeConfig::new(Format::Volte), &Scheduler::sequential());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.stats.attempted, 3);
        assert_eq!(report.stats.failed, 1);
        assert_eq!(report.failures[0].offset, tail_at);
        assert!(matches!(report.failures[0].error, DecodeError::MessageTruncated { .. }));
    }
}
