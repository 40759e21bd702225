#![allow(dead_code)]

pub const FLAG_V: u8 = 0x80;
pub const FLAG_M: u8 = 0x40;
pub const FLAG_VM: u8 = 0xC0;

/// One AVP, padded to a 4-byte boundary.
pub fn avp(code: u32, flags: u8, vendor: Option<u32>, value: &[u8]) -> Vec<u8> {
    let header = if vendor.is_some() { 12 } else { 8 };
    let len = (header + value.len()) as u32;
    let mut out = code.to_be_bytes().to_vec();
    out.push(flags);
    out.extend_from_slice(&len.to_be_bytes()[1..]);
    if let Some(v) = vendor {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out.extend_from_slice(value);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

pub fn grouped(code: u32, flags: u8, vendor: Option<u32>, children: &[Vec<u8>]) -> Vec<u8> {
    avp(code, flags, vendor, &children.concat())
}

/// Two-byte record prefix, a Diameter accounting header, then `avps`.
pub fn message(command_flags: u8, hop_by_hop: u32, avps: &[u8]) -> Vec<u8> {
    let len = 20 + avps.len() as u32;
    let mut out = vec![0x00, 0x00, 0x01];
    out.extend_from_slice(&len.to_be_bytes()[1..]);
    out.push(command_flags);
    out.extend_from_slice(&271u32.to_be_bytes()[1..]);
    out.extend_from_slice(&3u32.to_be_bytes());
    out.extend_from_slice(&hop_by_hop.to_be_bytes());
    out.extend_from_slice(&(hop_by_hop ^ 0xFFFF_0000).to_be_bytes());
    out.extend_from_slice(avps);
    out
}

/// A request carrying a Session-Id and CC-Time derived from `n`.
pub fn simple_request(n: u32) -> Vec<u8> {
    let session = format!("scscf.ims;{};{}", n, "x".repeat((n % 5) as usize));
    let mut avps = avp(263, FLAG_M, None, session.as_bytes());
    avps.extend(avp(420, FLAG_M, None, &n.to_be_bytes()));
    message(0xC0, n, &avps)
}

/// BER TLV with a short-form length.
pub fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    assert!(value.len() < 0x80);
    let mut out = vec![tag, value.len() as u8];
    out.extend_from_slice(value);
    out
}
