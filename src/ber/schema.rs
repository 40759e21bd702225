//! Static Voz schema tables.
//!
//! A table maps a context tag number to either a leaf field (with the
//! primitive decoder bound to it) or a nested record whose children are
//! resolved against another table. Tables are sorted by tag so lookups are
//! a binary search over read-only data shared by every worker.

use crate::error::ValueError;
use crate::record::FieldValue;
use crate::value;

#[derive(Debug)]
pub struct SchemaTable {
    pub name: &'static str,
    pub entries: &'static [(u32, SchemaEntry)],
}

impl SchemaTable {
    #[inline]
    pub fn lookup(&self, tag: u32) -> Option<&SchemaEntry> {
        self.entries
            .binary_search_by_key(&tag, |(t, _)| *t)
            .ok()
            .map(|i| &self.entries[i].1)
    }
}

#[derive(Debug)]
pub enum SchemaEntry {
    /// A named field decoded from the node's value bytes.
    Leaf {
        name: &'static str,
        decoder: FieldDecoder,
    },
    /// Untagged components that share one tag, named by occurrence order
    /// within the enclosing node. Occurrences past the last name are dropped.
    Positional {
        names: &'static [&'static str],
        decoder: FieldDecoder,
    },
    /// A nested record. With a key, `key = name` is emitted before the
    /// children; without one the node is a plain container.
    Group {
        key: Option<&'static str>,
        name: &'static str,
        table: &'static SchemaTable,
    },
}

/// Primitive interpretation bound to a leaf.
#[derive(Debug, Clone, Copy)]
pub enum FieldDecoder {
    /// Big-endian unsigned of exactly this many bytes.
    UnsignedInt(usize),
    /// Big-endian unsigned of 1 to 8 bytes.
    Unsigned,
    Integer,
    /// Raw bytes as upper-case hex.
    OctetString,
    Tac,
    AddressString,
    Tbcd,
    Date,
    Time,
    Ia5String,
    Enumerated(&'static [(u64, &'static str)]),
    NetworkCallReference,
    InternalCauseAndLoc,
}

/// Output of a leaf decoder: one value, or named parts emitted as `field.part`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Single(FieldValue),
    Parts([(&'static str, FieldValue); 2]),
}

impl FieldDecoder {
    pub fn decode(self, bytes: &[u8]) -> Result<Decoded, ValueError> {
        use FieldDecoder::*;

        let single = match self {
            UnsignedInt(size) => FieldValue::UInt(value::fixed_unsigned(bytes, size)?),
            Unsigned => FieldValue::UInt(value::ranged_unsigned(bytes, 1, 8)?),
            Integer => FieldValue::Int(value::ber_integer(bytes)?),
            OctetString => FieldValue::Str(value::hex_upper(bytes)),
            Tac => FieldValue::Str(tac(bytes)?),
            AddressString => FieldValue::Str(value::address_string(bytes)?),
            Tbcd => FieldValue::Str(value::tbcd_digits(bytes)),
            Date => FieldValue::Str(value::ber_date(bytes)?),
            Time => FieldValue::Str(value::ber_time(bytes)?),
            Ia5String => FieldValue::Str(value::ia5_string(bytes)?),
            Enumerated(names) => {
                let raw = value::ranged_unsigned(bytes, 1, 8)?;
                let name = names
                    .iter()
                    .find(|(v, _)| *v == raw)
                    .map(|(_, n)| *n)
                    .ok_or(ValueError::UnknownEnum(raw))?;
                FieldValue::from(name)
            }
            NetworkCallReference => {
                let raw = value::fixed_unsigned(bytes, 5)?;
                return Ok(Decoded::Parts([
                    ("sequenceNumber", FieldValue::UInt(raw >> 16)),
                    ("switchIdentity", FieldValue::UInt(raw & 0xFFFF)),
                ]));
            }
            InternalCauseAndLoc => {
                let raw = value::fixed_unsigned(bytes, 2)?;
                return Ok(Decoded::Parts([
                    ("location", FieldValue::UInt(raw >> 8)),
                    ("cause", FieldValue::UInt(raw & 0xFF)),
                ]));
            }
        };
        Ok(Decoded::Single(single))
    }
}

/// Traffic Activity Code: TSC, TOS, TOI and an optional TOP octet.
fn tac(bytes: &[u8]) -> Result<String, ValueError> {
    match bytes {
        [tsc, tos, toi] => Ok(format!("TSC={:02X} TOS={:02X} TOI={:02X}", tsc, tos, toi)),
        [tsc, tos, toi, top] => Ok(format!(
            "TSC={:02X} TOS={:02X} TOI={:02X} TOP={:02X}",
            tsc, tos, toi, top
        )),
        _ => Err(ValueError::SizeRange {
            min: 3,
            max: 4,
            actual: bytes.len(),
        }),
    }
}

const CALL_POSITION: &[(u64, &str)] = &[
    (0, "valueUsedForAllCallsToDetermineIfOutputToTakePlace"),
    (1, "callHasReachedCongestionOrBusyState"),
    (2, "callHasOnlyReachedThroughConnection"),
    (3, "answerHasBeenReceived"),
];

const CHARGED_PARTY: &[(u64, &str)] = &[
    (0, "chargingOfCallingSubscriber"),
    (1, "chargingOfCalledSubscriber"),
    (2, "noCharging"),
];

const DISCONNECTING_PARTY: &[(u64, &str)] = &[
    (0, "callingPartyRelease"),
    (1, "calledPartyRelease"),
    (2, "networkRelease"),
];

const TARIFF_SWITCH_IND: &[(u64, &str)] = &[(0, "noTariffSwitch"), (2, "tariffSwitchAfterStartOfCharging")];

const OUTPUT_FOR_SUBSCRIBER: &[(u64, &str)] = &[(0, "callingParty"), (1, "calledParty"), (2, "callingAndCalledParty")];

const OUTPUT_TYPE: &[(u64, &str)] = &[
    (0, "noOutput"),
    (1, "iCIoutputForCallingSubscriber"),
    (2, "iCIOutputForCalledSubscriber"),
    (3, "iCIOutputForCallingAndCalledSubscribers"),
    (4, "tTOutputOnly"),
    (5, "tTAndICIForCallingSubscriber"),
    (6, "tTAndICIForCalledSubscriber"),
    (7, "tTAndICIForCallingAndCalledSubscribers"),
];

const IN_MARKING_OF_MS: &[(u64, &str)] = &[
    (1, "originatingINService"),
    (2, "terminatingINService"),
    (3, "originatingINCategoryKeyService"),
    (4, "terminatingINCategoryKeyService"),
    (5, "originatingCAMELService"),
    (6, "terminatingCAMELService"),
    (7, "originatingExtendedCAMELServiceWithINCapabilityIndicator"),
    (8, "terminatingExtendedCAMELServiceWithINCapabilityIndicator"),
    (9, "originatingExtendedCAMELServiceWithOriginatingINCategoryKey"),
    (10, "terminatingExtendedCAMELServiceWithTerminatingINCategoryKey"),
    (11, "subscriberDialledCAMELService"),
    (12, "subscriberDialledCAMELServiceAndOriginatingCAMELService"),
    (13, "visitedTerminatingCAMELService"),
];

const fn leaf(name: &'static str, decoder: FieldDecoder) -> SchemaEntry {
    SchemaEntry::Leaf { name, decoder }
}

const fn call_module(name: &'static str, table: &'static SchemaTable) -> SchemaEntry {
    SchemaEntry::Group {
        key: Some("CallModule"),
        name,
        table,
    }
}

use FieldDecoder as F;

/// Entry point for Voz files: one top-level node per Call Data Record.
pub static VOZ_ROOT: SchemaTable = SchemaTable {
    name: "CallDataRecord",
    entries: &[
        (
            0,
            SchemaEntry::Group {
                key: Some("CallDataRecord"),
                name: "singleDataRecord",
                table: &CALL_MODULES,
            },
        ),
        (
            1,
            SchemaEntry::Group {
                key: Some("CallDataRecord"),
                name: "compositeCallDataRecord",
                table: &COMPOSITE,
            },
        ),
    ],
};

/// A composite record is a sequence of single records.
pub static COMPOSITE: SchemaTable = SchemaTable {
    name: "CompositeCallDataRecord",
    entries: &[(
        0,
        SchemaEntry::Group {
            key: None,
            name: "singleDataRecord",
            table: &CALL_MODULES,
        },
    )],
};

pub static CALL_MODULES: SchemaTable = SchemaTable {
    name: "CallModule",
    entries: &[
        (0, call_module("transit", &TRANSIT)),
        (2, call_module("roamingCallForwarding", &ROAMING_CALL_FORWARDING)),
    ],
};

pub static TRANSIT: SchemaTable = SchemaTable {
    name: "Transit",
    entries: &[
        (0, leaf("tAC", F::Tac)),
        (1, leaf("callIdentificationNumber", F::UnsignedInt(3))),
        (2, leaf("recordSequenceNumber", F::UnsignedInt(3))),
        (3, leaf("typeOfCallingSubscriber", F::UnsignedInt(1))),
        (4, leaf("callingPartyNumber", F::AddressString)),
        (5, leaf("calledPartyNumber", F::AddressString)),
        (6, leaf("calledSubscriberIMSI", F::Tbcd)),
        (7, leaf("disconnectingParty", F::Enumerated(DISCONNECTING_PARTY))),
        (8, leaf("dateForStartOfCharge", F::Date)),
        (9, leaf("timeForStartOfCharge", F::Time)),
        (10, leaf("timeForStopOfCharge", F::Time)),
        (11, leaf("chargeableDuration", F::Time)),
        (12, leaf("interruptionTime", F::Time)),
        (13, leaf("timeFromRegisterSeizureToStartOfCharging", F::Time)),
        (14, leaf("chargedParty", F::Enumerated(CHARGED_PARTY))),
        (15, leaf("originForCharging", F::UnsignedInt(1))),
        (16, leaf("tariffClass", F::Unsigned)),
        (17, leaf("tariffSwitchInd", F::Enumerated(TARIFF_SWITCH_IND))),
        (18, leaf("numberOfMeterPulses", F::Unsigned)),
        (19, leaf("exchangeIdentity", F::Ia5String)),
        (20, leaf("mSCIdentification", F::AddressString)),
        (21, leaf("outgoingRoute", F::Ia5String)),
        (22, leaf("incomingRoute", F::Ia5String)),
        (23, leaf("miscellaneousInformation", F::OctetString)),
        (24, leaf("originatedCode", F::UnsignedInt(1))),
        (25, leaf("iNMarkingOfMS", F::Enumerated(IN_MARKING_OF_MS))),
        (26, leaf("callPosition", F::Enumerated(CALL_POSITION))),
        (27, leaf("eosInfo", F::UnsignedInt(1))),
        (28, leaf("internalCauseAndLoc", F::InternalCauseAndLoc)),
        (29, leaf("originalCalledNumber", F::AddressString)),
        (30, leaf("redirectingNumber", F::AddressString)),
        (31, leaf("redirectionCounter", F::UnsignedInt(1))),
        (32, leaf("redirectingDropBackNumber", F::AddressString)),
        (37, leaf("outputForSubscriber", F::Enumerated(OUTPUT_FOR_SUBSCRIBER))),
        (39, leaf("partialOutputRecNum", F::UnsignedInt(1))),
        (40, leaf("relatedCallNumber", F::UnsignedInt(3))),
        (41, leaf("faultCode", F::Unsigned)),
        (42, leaf("subscriptionType", F::UnsignedInt(1))),
        (45, leaf("switchIdentity", F::UnsignedInt(2))),
        (46, leaf("networkCallReference", F::NetworkCallReference)),
        (50, leaf("translatedNumber", F::AddressString)),
        (51, leaf("bCSMTDPData1", F::OctetString)),
        (52, leaf("bCSMTDPData2", F::OctetString)),
        (53, leaf("bCSMTDPData3", F::OctetString)),
        (54, leaf("bCSMTDPData4", F::OctetString)),
        (55, leaf("bCSMTDPData5", F::OctetString)),
        (56, leaf("bCSMTDPData6", F::OctetString)),
        (57, leaf("bCSMTDPData7", F::OctetString)),
        (58, leaf("bCSMTDPData8", F::OctetString)),
        (59, leaf("bCSMTDPData9", F::OctetString)),
        (60, leaf("bCSMTDPData10", F::OctetString)),
        (61, leaf("gSMCallReferenceNumber", F::OctetString)),
        (62, leaf("c7ChargingMessage", F::OctetString)),
        (63, leaf("c7FirstCHTMessage", F::OctetString)),
        (64, leaf("c7SecondCHTMessage", F::OctetString)),
        (65, leaf("aCMChargingIndicator", F::OctetString)),
        (66, leaf("aNMChargingIndicator", F::OctetString)),
        (67, leaf("mSCAddress", F::AddressString)),
        (68, leaf("carrierInformationBackward", F::OctetString)),
        (69, leaf("carrierInformationForward", F::OctetString)),
        (70, leaf("chargeInformation", F::OctetString)),
        (71, leaf("disconnectionDate", F::Date)),
        (72, leaf("disconnectionTime", F::Time)),
        (73, leaf("entryPOICA", F::Tbcd)),
        (74, leaf("exitPOICA", F::Tbcd)),
        (76, leaf("mobileUserClass1", F::UnsignedInt(1))),
        (77, leaf("mobileUserClass2", F::UnsignedInt(1))),
        (79, leaf("originatingCarrier", F::OctetString)),
        (80, leaf("originatingChargeArea", F::Tbcd)),
        (81, leaf("tDSCounter", F::Unsigned)),
        (83, leaf("terminatingCarrier", F::OctetString)),
        (84, leaf("terminatingChargeArea", F::Tbcd)),
        (85, leaf("terminatingMobileUserClass1", F::UnsignedInt(1))),
        (86, leaf("terminatingMobileUserClass2", F::UnsignedInt(1))),
        (87, leaf("contractorNumber", F::AddressString)),
        (88, leaf("terminatingUserClass", F::UnsignedInt(1))),
        (89, leaf("userClass", F::UnsignedInt(1))),
        (90, leaf("calledPartyMNPInfo", F::AddressString)),
        (91, leaf("chargeNumber", F::AddressString)),
        (92, leaf("originatingLineInformation", F::UnsignedInt(1))),
        (93, leaf("multimediaInformation", F::OctetString)),
        (102, leaf("outputType", F::Enumerated(OUTPUT_TYPE))),
    ],
};

pub static ROAMING_CALL_FORWARDING: SchemaTable = SchemaTable {
    name: "RoamingCallForwarding",
    entries: &[
        (0, leaf("tAC", F::Tac)),
        (1, leaf("callIdentificationNumber", F::UnsignedInt(3))),
        (2, leaf("recordSequenceNumber", F::UnsignedInt(3))),
        (3, leaf("typeOfCallingSubscriber", F::UnsignedInt(1))),
        (4, leaf("callingPartyNumber", F::AddressString)),
        (5, leaf("calledPartyNumber", F::AddressString)),
        (6, leaf("calledSubscriberIMSI", F::Tbcd)),
        (7, leaf("mobileStationRoamingNumber", F::AddressString)),
        (8, leaf("disconnectingParty", F::Enumerated(DISCONNECTING_PARTY))),
        (9, leaf("dateForStartOfCharge", F::Date)),
        (10, leaf("timeForStartOfCharge", F::Time)),
        (11, leaf("timeForStopOfCharge", F::Time)),
        (12, leaf("chargeableDuration", F::Time)),
        (13, leaf("interruptionTime", F::Time)),
        (14, leaf("timeFromRegisterSeizureToStartOfCharging", F::Time)),
        (15, leaf("chargedParty", F::Enumerated(CHARGED_PARTY))),
        (16, leaf("originForCharging", F::UnsignedInt(1))),
        (17, leaf("tariffClass", F::Unsigned)),
        (18, leaf("tariffSwitchInd", F::Enumerated(TARIFF_SWITCH_IND))),
        (19, leaf("numberOfMeterPulses", F::Unsigned)),
        (20, leaf("exchangeIdentity", F::Ia5String)),
        (21, leaf("mSCIdentification", F::AddressString)),
        (22, leaf("outgoingRoute", F::Ia5String)),
        (23, leaf("incomingRoute", F::Ia5String)),
        (24, leaf("miscellaneousInformation", F::OctetString)),
        (25, leaf("callPosition", F::Enumerated(CALL_POSITION))),
        (26, leaf("eosInfo", F::UnsignedInt(1))),
        (27, leaf("internalCauseAndLoc", F::InternalCauseAndLoc)),
        (28, leaf("originalCalledNumber", F::AddressString)),
        (29, leaf("redirectingNumber", F::AddressString)),
        (30, leaf("redirectionCounter", F::UnsignedInt(1))),
        (34, leaf("partialOutputRecNum", F::UnsignedInt(1))),
        (35, leaf("relatedCallNumber", F::UnsignedInt(3))),
        (36, leaf("faultCode", F::Unsigned)),
        (37, leaf("subscriptionType", F::UnsignedInt(1))),
        (38, leaf("switchIdentity", F::UnsignedInt(2))),
        (39, leaf("networkCallReference", F::NetworkCallReference)),
        (41, leaf("disconnectionDate", F::Date)),
        (42, leaf("disconnectionTime", F::Time)),
        (43, leaf("outputType", F::Enumerated(OUTPUT_TYPE))),
    ],
};
