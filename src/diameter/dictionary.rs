//! AVP database: `(code, vendor-id)` to name, type, expected flags and
//! charging variant, covering Diameter base (vendor 0), 3GPP (10415) and
//! Ericsson (193) attributes.

use super::avp::AvpFlags;
use crate::value::ValueType;

pub const VENDOR_DIAMETER: u32 = 0;
pub const VENDOR_ERICSSON: u32 = 193;
pub const VENDOR_3GPP: u32 = 10415;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvpDefinition {
    pub code: u32,
    pub vendor_id: u32,
    pub name: &'static str,
    pub value_type: ValueType,
    /// Flags an accounting request must carry; `None` skips the check.
    pub expected_flags: Option<AvpFlags>,
    /// Charging variant this AVP identifies when it appears at message level.
    pub variant: Option<u8>,
}

impl AvpDefinition {
    const fn variant(mut self, variant: u8) -> Self {
        self.variant = Some(variant);
        self
    }
}

const fn avp(
    code: u32,
    vendor_id: u32,
    name: &'static str,
    value_type: ValueType,
    expected_flags: Option<AvpFlags>,
) -> AvpDefinition {
    AvpDefinition {
        code,
        vendor_id,
        name,
        value_type,
        expected_flags,
        variant: None,
    }
}

const V: AvpFlags = AvpFlags::VENDOR;
const M: AvpFlags = AvpFlags::MANDATORY;
const VM: AvpFlags = AvpFlags::VENDOR.union(AvpFlags::MANDATORY);

use ValueType::*;

/// Sorted by `(code, vendor_id)`.
static AVPS: &[AvpDefinition] = &[
    avp(1, 0, "User-Name", Utf8String, None),
    avp(23, 10415, "3GPP-MS-TimeZone", OctetString, Some(V)),
    avp(55, 0, "Event-Timestamp", Time, Some(M)),
    avp(85, 0, "Acct-Interim-Interval", UInt32, Some(M)),
    avp(259, 0, "Acct-Application-Id", UInt32, Some(M)),
    avp(263, 0, "Session-Id", Utf8String, Some(M)),
    avp(264, 0, "Origin-Host", DiameterIdentity, None),
    avp(266, 0, "Vendor-Id", UInt32, None),
    avp(268, 0, "Result-Code", UInt32, Some(M)),
    avp(283, 0, "Destination-Realm", DiameterIdentity, None),
    avp(284, 193, "IMS-Service-Identification", Utf8String, Some(V)),
    avp(285, 193, "Ericsson-Service-Information", Grouped, Some(V)).variant(1),
    avp(293, 0, "Destination-Host", DiameterIdentity, Some(M)),
    avp(296, 0, "Origin-Realm", DiameterIdentity, None),
    avp(297, 0, "Experimental-Result", Grouped, None),
    avp(298, 0, "Experimental-Result-Code", UInt32, None),
    avp(338, 193, "SIP-Ringing-Timestamp", Time, Some(V)),
    avp(420, 0, "CC-Time", UInt32, Some(M)),
    avp(443, 0, "Subscription-Id", Grouped, Some(M)),
    avp(444, 0, "Subscription-Id-Data", Utf8String, Some(M)),
    avp(450, 0, "Subscription-Id-Type", Enumerated, Some(M)),
    avp(458, 0, "User-Equipment-Info", Grouped, Some(M)),
    avp(459, 0, "User-Equipment-Info-Type", Enumerated, Some(M)),
    avp(460, 0, "User-Equipment-Info-Value", OctetString, Some(M)),
    avp(461, 0, "Service-Context-Id", Utf8String, Some(M)),
    avp(480, 0, "Accounting-Record-Type", Enumerated, Some(M)),
    avp(485, 0, "Accounting-Record-Number", UInt32, Some(M)),
    avp(650, 10415, "Session-Priority", Enumerated, Some(V)),
    avp(701, 10415, "MSISDN", OctetString, Some(VM)),
    avp(823, 10415, "Event-Type", Grouped, Some(VM)),
    avp(824, 10415, "SIP-Method", Utf8String, Some(VM)),
    avp(826, 10415, "Content-Type", Utf8String, Some(VM)),
    avp(827, 10415, "Content-Length", UInt32, Some(VM)),
    avp(828, 10415, "Content-Disposition", Utf8String, Some(VM)),
    avp(829, 10415, "Role-of-Node", Enumerated, Some(VM)),
    avp(830, 10415, "User-Session-Id", Utf8String, Some(VM)),
    avp(831, 10415, "Calling-Party-Address", Utf8String, Some(VM)),
    avp(832, 10415, "Called-Party-Address", Utf8String, Some(VM)),
    avp(833, 10415, "Time-Stamps", Grouped, Some(VM)),
    avp(834, 10415, "SIP-Request-Timestamp", Time, Some(VM)),
    avp(835, 10415, "SIP-Response-Timestamp", Time, Some(VM)),
    avp(838, 10415, "Inter-Operator-Identifier", Grouped, Some(VM)),
    avp(839, 10415, "Originating-IOI", Utf8String, Some(VM)),
    avp(840, 10415, "Terminating-IOI", Utf8String, Some(VM)),
    avp(841, 10415, "IMS-Charging-Identifier", Utf8String, Some(VM)),
    avp(842, 10415, "SDP-Session-Description", Utf8String, Some(VM)),
    avp(843, 10415, "SDP-Media-Component", Grouped, Some(VM)),
    avp(844, 10415, "SDP-Media-Name", Utf8String, Some(VM)),
    avp(845, 10415, "SDP-Media-Description", Utf8String, Some(VM)),
    avp(861, 10415, "Cause-Code", Int32, Some(VM)),
    avp(862, 10415, "Node-Functionality", Enumerated, Some(VM)),
    avp(863, 10415, "Service-Specific-Data", Utf8String, Some(VM)),
    avp(864, 10415, "Originator", Enumerated, Some(VM)),
    avp(873, 10415, "Service-Information", Grouped, Some(VM)).variant(2),
    avp(874, 10415, "PS-Information", Grouped, Some(VM)),
    avp(876, 10415, "IMS-Information", Grouped, Some(VM)).variant(2),
    avp(878, 10415, "LCS-Information", Grouped, Some(VM)),
    avp(882, 10415, "Media-Initiator-Flag", Enumerated, Some(VM)),
    avp(889, 10415, "Message-Body", Grouped, Some(VM)),
    avp(1061, 193, "MMT-Information", Grouped, Some(V)),
    avp(1127, 193, "Conference-Id", Utf8String, Some(V)),
    avp(1128, 193, "Related-ICID", Utf8String, Some(V)),
    avp(1129, 193, "Supplementary-Service-Information", Grouped, Some(V)),
    avp(1130, 193, "Supplementary-Service-Identity", Enumerated, Some(V)),
    avp(1131, 193, "Supplementary-Service-Action", Enumerated, Some(V)),
    avp(1133, 193, "Redirecting-Party-Address", Utf8String, Some(V)),
    avp(1141, 193, "Calling-Party-Address-Presentation-Status", Enumerated, Some(V)),
    avp(1142, 193, "Called-Asserted-Identity-Presentation-Status", Enumerated, Some(V)),
    avp(1153, 193, "From-Header", Utf8String, Some(V)),
    avp(1160, 193, "Dial-Around-Indicator", Utf8String, Some(V)),
    avp(1206, 193, "GSM-Call-Reference-Number", Utf8String, Some(V)),
    avp(1207, 193, "MSC-Address", Utf8String, Some(V)),
    avp(1249, 10415, "Service-Specific-Info", Grouped, Some(VM)),
    avp(1250, 10415, "Called-Asserted-Identity", Utf8String, Some(VM)),
    avp(1251, 10415, "Requested-Party-Address", Utf8String, Some(VM)),
    avp(1256, 193, "SIP-Ringing-Timestamp-Fraction", UInt32, Some(V)),
    avp(1257, 10415, "Service-Specific-Type", UInt32, Some(VM)),
    avp(1262, 193, "From-Header-Presentation-Status", Enumerated, Some(V)),
    avp(1263, 10415, "Access-Network-Information", OctetString, Some(VM)),
    avp(1264, 193, "Transaction-Info", Grouped, Some(V)).variant(1),
    avp(1265, 193, "Transaction-Type", Enumerated, Some(V)),
    avp(1266, 193, "Transaction-Data-Name", Utf8String, Some(V)),
    avp(1267, 193, "Transaction-Data-Value", Utf8String, Some(V)),
    avp(1302, 193, "Routing-Call-Type", Utf8String, Some(V)),
    avp(1303, 193, "Analyzed-Call-Type", Utf8String, Some(V)),
    avp(1307, 193, "Service-Number-Type", Enumerated, Some(V)),
    avp(1308, 193, "Common-Policy-Rule-Identity", Utf8String, Some(V)),
    avp(1314, 193, "SCC-Service-Identity", Enumerated, Some(V)),
    avp(1315, 193, "SCC-TADS-Decision", Enumerated, Some(V)),
    avp(1330, 193, "Served-User", Utf8String, Some(V)),
    avp(1346, 193, "XCON-Id", Utf8String, Some(V)),
    avp(1357, 193, "Party-To-Charge", UInt32, Some(V)),
    avp(1371, 193, "Service-Suppression-Info", Grouped, Some(V)),
    avp(1372, 193, "Matched-Regular-Expression", Utf8String, Some(V)),
    avp(1373, 193, "Services-To-Suppress", Utf8String, Some(V)),
    avp(1380, 193, "Tenant", Utf8String, Some(V)),
    avp(1384, 193, "CCMP-User-Info", Utf8String, Some(V)),
    avp(1388, 193, "UHTZ-Offset", Utf8String, Some(V)),
    avp(1389, 193, "Participants-Involved", Utf8String, Some(V)),
    avp(1390, 193, "Participants-List", Utf8String, Some(V)),
    avp(1393, 193, "Forward-TTC-Charging-Headers", Grouped, Some(V)),
    avp(1394, 193, "Backward-TTC-Charging-Headers", Grouped, Some(V)),
    avp(1395, 193, "Charging-Area", Utf8String, Some(V)),
    avp(1396, 193, "Carrier-Information", OctetString, Some(V)),
    avp(1397, 193, "Additional-User-Category", OctetString, Some(V)),
    avp(1398, 193, "Flexible-Charging-Info", OctetString, Some(V)),
    avp(1406, 193, "Forward-TTC-Charging-Parameters", Utf8String, Some(V)),
    avp(1407, 193, "Backward-TTC-Charging-Parameters", Utf8String, Some(V)),
    avp(1433, 193, "AS-Type", Enumerated, Some(V)),
    avp(1460, 193, "Transaction-SIP-Message", Utf8String, Some(V)),
    avp(1463, 193, "Subscriber-Type", Enumerated, Some(V)),
    avp(1464, 193, "UC-Mobility-Call-Leg", Enumerated, Some(V)),
    avp(1465, 193, "Interim-Reason", Enumerated, Some(V)),
    avp(1477, 193, "Ro-Status", Enumerated, Some(V)),
    avp(1478, 193, "Ro-Information", Grouped, Some(V)),
    avp(1527, 193, "Analyzed-B-Number-Type", Utf8String, Some(V)),
    avp(1531, 193, "Caller-Category", UInt32, Some(V)),
    avp(1532, 193, "Caller-Sub-Category", UInt32, Some(V)),
    avp(1533, 193, "Caller-Treatment", Enumerated, Some(V)),
    avp(1536, 193, "Caller-Category-Presentation", Utf8String, Some(V)),
    avp(2023, 10415, "Carrier-Select-Routing-Information", Utf8String, Some(VM)),
    avp(2024, 10415, "Number-Portability-Routing-Information", Utf8String, Some(VM)),
    avp(2030, 10415, "MMTel-Information", Grouped, Some(VM)),
    avp(2035, 10415, "Associated-Party-Address", Utf8String, Some(VM)),
    avp(2036, 10415, "SDP-Type", Enumerated, Some(VM)),
    avp(2048, 10415, "Supplementary-Service", Grouped, Some(VM)),
    avp(2301, 10415, "SIP-Request-Timestamp-Fraction", UInt32, Some(VM)),
    avp(2302, 10415, "SIP-Response-Timestamp-Fraction", UInt32, Some(VM)),
    avp(2304, 10415, "CUG-Information", OctetString, Some(VM)),
    avp(2320, 10415, "Outgoing-Session-Id", Utf8String, Some(VM)),
    avp(2713, 10415, "IMS-Visited-Network-Identifier", Utf8String, Some(VM)),
    avp(3401, 10415, "Reason-Header", Utf8String, Some(VM)),
    avp(3402, 10415, "Instance-id", Utf8String, Some(VM)),
];

/// Look up a definition. Vendor-specific codes only match their own vendor.
pub fn lookup(code: u32, vendor_id: u32) -> Option<&'static AvpDefinition> {
    AVPS.binary_search_by_key(&(code, vendor_id), |d| (d.code, d.vendor_id))
        .ok()
        .map(|i| &AVPS[i])
}
