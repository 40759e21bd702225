//! Primitive interpreters shared by the BER and Diameter engines.
//!
//! Every function here works on a borrowed value slice and only allocates
//! when it has to produce an owned string.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{Duration, NaiveDate};

use crate::error::ValueError;
use crate::record::FieldValue;

/// Big-endian unsigned integer of exactly `size` bytes (`size <= 8`).
pub fn fixed_unsigned(bytes: &[u8], size: usize) -> Result<u64, ValueError> {
    if bytes.len() != size || size > 8 {
        return Err(ValueError::Size {
            expected: size,
            actual: bytes.len(),
        });
    }
    Ok(be_unsigned(bytes))
}

/// Big-endian unsigned integer of 1..=8 bytes.
pub fn ranged_unsigned(bytes: &[u8], min: usize, max: usize) -> Result<u64, ValueError> {
    let max = max.min(8);
    if bytes.len() < min || bytes.len() > max {
        return Err(ValueError::SizeRange {
            min,
            max,
            actual: bytes.len(),
        });
    }
    Ok(be_unsigned(bytes))
}

/// BER INTEGER: two's complement, big-endian, 1..=8 bytes.
pub fn ber_integer(bytes: &[u8]) -> Result<i64, ValueError> {
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(ValueError::SizeRange {
            min: 1,
            max: 8,
            actual: bytes.len(),
        });
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(i64::from_be_bytes(buf))
}

#[inline]
fn be_unsigned(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

pub fn be_i32(bytes: &[u8]) -> Result<i32, ValueError> {
    array::<4>(bytes).map(i32::from_be_bytes)
}

pub fn be_u32(bytes: &[u8]) -> Result<u32, ValueError> {
    array::<4>(bytes).map(u32::from_be_bytes)
}

pub fn be_u64(bytes: &[u8]) -> Result<u64, ValueError> {
    array::<8>(bytes).map(u64::from_be_bytes)
}

#[inline]
fn array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], ValueError> {
    bytes.try_into().map_err(|_| ValueError::Size {
        expected: N,
        actual: bytes.len(),
    })
}

pub fn hex_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// UTF-8 text with trailing NUL padding removed.
pub fn utf8_trimmed(bytes: &[u8]) -> Result<String, ValueError> {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    std::str::from_utf8(&bytes[..end])
        .map(str::to_owned)
        .map_err(|_| ValueError::NonUtf8)
}

/// IA5 (7-bit ASCII) text.
pub fn ia5_string(bytes: &[u8]) -> Result<String, ValueError> {
    if !bytes.is_ascii() {
        return Err(ValueError::NonAscii);
    }
    // ASCII is always valid UTF-8.
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// TBCD digits, low nibble first. A filler nibble (0xF) ends the string.
pub fn tbcd_digits(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    'octets: for &octet in bytes {
        for nibble in [octet & 0x0F, octet >> 4] {
            match tbcd_char(nibble) {
                Some(c) => out.push(c),
                None => break 'octets,
            }
        }
    }
    out
}

#[inline]
fn tbcd_char(nibble: u8) -> Option<char> {
    match nibble {
        0..=9 => Some((b'0' + nibble) as char),
        0x0A => Some('*'),
        0x0B => Some('#'),
        0x0C => Some('a'),
        0x0D => Some('b'),
        0x0E => Some('c'),
        _ => None,
    }
}

/// AddressString: one TON/NPI octet followed by the number.
///
/// ISDN numbering (NPI 1) carries TBCD digits; international numbers are
/// prefixed with `+`. Any other plan is rendered as upper-case hex.
pub fn address_string(bytes: &[u8]) -> Result<String, ValueError> {
    if bytes.is_empty() || bytes.len() > 20 {
        return Err(ValueError::SizeRange {
            min: 1,
            max: 20,
            actual: bytes.len(),
        });
    }
    let ton = (bytes[0] >> 4) & 0x07;
    let npi = bytes[0] & 0x0F;
    if npi != 1 {
        return Ok(hex_upper(&bytes[1..]));
    }
    let digits = tbcd_digits(&bytes[1..]);
    Ok(if ton == 1 { format!("+{}", digits) } else { digits })
}

/// Switch date: `YY MM DD` or `CC YY MM DD`, rendered `DD-MM-YY` / `DD-MM-YYYY`.
pub fn ber_date(bytes: &[u8]) -> Result<String, ValueError> {
    let (year, rest, four_digit) = match bytes {
        [yy, rest @ ..] if rest.len() == 2 => (*yy as u32, rest, false),
        [cc, yy, rest @ ..] if rest.len() == 2 => {
            check_range("century", *cc as u32, 19, 20)?;
            check_range("year", *yy as u32, 0, 99)?;
            (*cc as u32 * 100 + *yy as u32, rest, true)
        }
        _ => {
            return Err(ValueError::SizeRange {
                min: 3,
                max: 4,
                actual: bytes.len(),
            })
        }
    };
    let month = check_range("month", rest[0] as u32, 1, 12)?;
    let day = check_range("day", rest[1] as u32, 1, 31)?;
    if four_digit {
        Ok(format!("{:02}-{:02}-{:04}", day, month, year))
    } else {
        check_range("year", year, 0, 99)?;
        Ok(format!("{:02}-{:02}-{:02}", day, month, year))
    }
}

/// Switch time or duration: `HH MM SS [tenths]`.
pub fn ber_time(bytes: &[u8]) -> Result<String, ValueError> {
    if bytes.len() < 3 || bytes.len() > 4 {
        return Err(ValueError::SizeRange {
            min: 3,
            max: 4,
            actual: bytes.len(),
        });
    }
    let hour = check_range("hour", bytes[0] as u32, 0, 23)?;
    let minute = check_range("minute", bytes[1] as u32, 0, 59)?;
    let second = check_range("second", bytes[2] as u32, 0, 59)?;
    match bytes.get(3) {
        Some(&t) => {
            let tenth = check_range("tenth of second", t as u32, 0, 9)?;
            Ok(format!("{:02}:{:02}:{:02}.{}", hour, minute, second, tenth))
        }
        None => Ok(format!("{:02}:{:02}:{:02}", hour, minute, second)),
    }
}

#[inline]
fn check_range(field: &'static str, value: u32, lo: u32, hi: u32) -> Result<u32, ValueError> {
    if (lo..=hi).contains(&value) {
        Ok(value)
    } else {
        Err(ValueError::OutOfRange { field, value })
    }
}

/// Diameter Time: 32-bit seconds since 1900-01-01 00:00:00 UTC.
pub fn ntp_timestamp(bytes: &[u8]) -> Result<String, ValueError> {
    let seconds = be_u32(bytes)?;
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(ValueError::OutOfRange {
            field: "epoch",
            value: 0,
        })?;
    let ts = epoch + Duration::seconds(seconds as i64);
    Ok(ts.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Diameter Address: 2-byte address family followed by the address.
/// Family 1 is IPv4, family 2 is IPv6; anything else is hex.
pub fn diameter_address(bytes: &[u8]) -> String {
    match bytes {
        [0x00, 0x01, a, b, c, d] => Ipv4Addr::new(*a, *b, *c, *d).to_string(),
        [0x00, 0x02, rest @ ..] if rest.len() == 16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rest);
            Ipv6Addr::from(octets).to_string()
        }
        _ => hex_lower(bytes),
    }
}

/// Closed set of Diameter leaf/grouped data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int32,
    UInt32,
    UInt64,
    Utf8String,
    OctetString,
    DiameterIdentity,
    Time,
    Enumerated,
    Address,
    Grouped,
}

impl ValueType {
    /// Payload size for fixed-width types.
    pub fn known_size(self) -> Option<usize> {
        match self {
            ValueType::Int32 | ValueType::UInt32 | ValueType::Time | ValueType::Enumerated => Some(4),
            ValueType::UInt64 => Some(8),
            _ => None,
        }
    }

    /// Decode a leaf payload. A payload the type rejects is kept as lower-case hex.
    pub fn decode(self, bytes: &[u8]) -> FieldValue {
        if self.known_size().is_some_and(|size| size != bytes.len()) {
            return FieldValue::Str(hex_lower(bytes));
        }
        let decoded = match self {
            ValueType::Int32 | ValueType::Enumerated => be_i32(bytes).map(|v| FieldValue::Int(v as i64)),
            ValueType::UInt32 => be_u32(bytes).map(|v| FieldValue::UInt(v as u64)),
            ValueType::UInt64 => be_u64(bytes).map(FieldValue::UInt),
            ValueType::Utf8String | ValueType::DiameterIdentity | ValueType::OctetString => {
                utf8_trimmed(bytes).map(FieldValue::Str)
            }
            ValueType::Time => ntp_timestamp(bytes).map(FieldValue::Str),
            ValueType::Address => Ok(FieldValue::Str(diameter_address(bytes))),
            ValueType::Grouped => Ok(FieldValue::Str(hex_lower(bytes))),
        };
        decoded.unwrap_or_else(|_| FieldValue::Str(hex_lower(bytes)))
    }
}
