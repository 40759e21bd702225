use crate::error::{DecodeError, Result};

const CLASS_SHIFT: u8 = 6;
const CONSTRUCTED_BIT: u8 = 0x20;
const SHORT_NUMBER_MASK: u8 = 0x1F;
const CONTINUE_BIT: u8 = 0x80;
const LONG_FORM_BIT: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    Context,
    Private,
}

impl TagClass {
    #[inline]
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::Context,
            _ => TagClass::Private,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    /// End-of-content markers: universal primitive 0, or the context
    /// constructed 1 variant some switches emit, both with zero length.
    #[inline]
    pub fn is_eoc(&self, length: usize) -> bool {
        length == 0
            && matches!(
                (self.class, self.constructed, self.number),
                (TagClass::Universal, false, 0) | (TagClass::Context, true, 1)
            )
    }
}

/// Read an identifier octet sequence. Returns the tag and the bytes consumed.
pub fn read_tag(data: &[u8], offset: usize) -> Result<(Tag, usize)> {
    let first = *data.get(offset).ok_or(DecodeError::TagTruncated { offset })?;
    let class = TagClass::from_bits(first >> CLASS_SHIFT);
    let constructed = first & CONSTRUCTED_BIT != 0;
    let mut number = (first & SHORT_NUMBER_MASK) as u32;
    let mut pos = offset + 1;

    if number == SHORT_NUMBER_MASK as u32 {
        number = 0;
        loop {
            let b = *data.get(pos).ok_or(DecodeError::TagTruncated { offset })?;
            pos += 1;
            if number > (u32::MAX >> 7) {
                return Err(DecodeError::TagOverflow { offset });
            }
            number = (number << 7) | (b & !CONTINUE_BIT) as u32;
            if b & CONTINUE_BIT == 0 {
                break;
            }
        }
    }

    Ok((
        Tag {
            class,
            constructed,
            number,
        },
        pos - offset,
    ))
}

/// Read a length. Returns the length value and the bytes consumed.
///
/// A long-form octet count of zero (the indefinite form, `0x80`) yields
/// length 0; the caller treats it like any zero-length node.
pub fn read_length(data: &[u8], offset: usize) -> Result<(usize, usize)> {
    let first = *data.get(offset).ok_or(DecodeError::LengthTruncated { offset })?;
    if first & LONG_FORM_BIT == 0 {
        return Ok((first as usize, 1));
    }

    let octets = (first & !LONG_FORM_BIT) as usize;
    if octets == 0 {
        return Ok((0, 1));
    }
    if octets > std::mem::size_of::<usize>() {
        return Err(DecodeError::LengthOverflow { offset, octets });
    }
    let bytes = data
        .get(offset + 1..offset + 1 + octets)
        .ok_or(DecodeError::LengthTruncated { offset })?;
    let length = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((length, 1 + octets))
}

/// One TLV whose value has been bounds-checked against its container.
#[derive(Debug, Clone, Copy)]
pub struct Tlv<'a> {
    pub tag: Tag,
    pub length: usize,
    pub value_start: usize,
    pub value: &'a [u8],
}

impl Tlv<'_> {
    /// Offset just past the value.
    #[inline]
    pub fn end(&self) -> usize {
        self.value_start + self.length
    }

    /// EOC markers and empty nodes are consumed without emitting anything.
    #[inline]
    pub fn is_skippable(&self) -> bool {
        self.length == 0 || self.tag.is_eoc(self.length)
    }
}

/// Read the TLV at `offset`, requiring its value to end at or before `limit`.
pub fn read_tlv(data: &[u8], offset: usize, limit: usize) -> Result<Tlv<'_>> {
    let limit = limit.min(data.len());
    let bounded = &data[..limit];
    let (tag, tag_len) = read_tag(bounded, offset)?;
    let (length, len_len) = read_length(bounded, offset + tag_len)?;
    let value_start = offset + tag_len + len_len;

    let available = limit.saturating_sub(value_start);
    if length > available {
        return Err(DecodeError::ValueTruncated {
            offset,
            needed: length,
            available,
        });
    }

    Ok(Tlv {
        tag,
        length,
        value_start,
        value: &data[value_start..value_start + length],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tags() {
        let (tag, used) = read_tag(&[0x02], 0).unwrap();
        assert_eq!(
            tag,
            Tag {
                class: TagClass::Universal,
                constructed: false,
                number: 2
            }
        );
        assert_eq!(used, 1);

        let (tag, _) = read_tag(&[0x30], 0).unwrap();
        assert_eq!(
            tag,
            Tag {
                class: TagClass::Universal,
                constructed: true,
                number: 16
            }
        );

        let (tag, _) = read_tag(&[0xA2], 0).unwrap();
        assert_eq!(tag.class, TagClass::Context);
        assert!(tag.constructed);
        assert_eq!(tag.number, 2);
    }

    #[test]
    fn high_tag_numbers() {
        // [CONTEXT 121] primitive: 0x9F 0x79
        let (tag, used) = read_tag(&[0x9F, 0x79], 0).unwrap();
        assert_eq!(tag.number, 121);
        assert_eq!(used, 2);

        // two continuation octets: 0x81 0x00 -> 128
        let (tag, used) = read_tag(&[0xBF, 0x81, 0x00], 0).unwrap();
        assert_eq!(tag.number, 128);
        assert_eq!(used, 3);
    }

    #[test]
    fn truncated_tags() {
        assert_eq!(read_tag(&[], 0), Err(DecodeError::TagTruncated { offset: 0 }));
        assert_eq!(read_tag(&[0x9F, 0x81], 0), Err(DecodeError::TagTruncated { offset: 0 }));
        assert_eq!(
            read_tag(&[0x9F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01], 0),
            Err(DecodeError::TagOverflow { offset: 0 })
        );
    }

    #[test]
    fn lengths() {
        assert_eq!(read_length(&[0x05], 0), Ok((5, 1)));
        assert_eq!(read_length(&[0x82, 0x01, 0x00], 0), Ok((256, 3)));
        assert_eq!(read_length(&[0x80], 0), Ok((0, 1)));
        assert_eq!(read_length(&[0x82, 0x01], 0), Err(DecodeError::LengthTruncated { offset: 0 }));
        assert_eq!(read_length(&[], 3), Err(DecodeError::LengthTruncated { offset: 3 }));
    }

    #[test]
    fn eoc_markers() {
        let universal = Tag {
            class: TagClass::Universal,
            constructed: false,
            number: 0,
        };
        let context = Tag {
            class: TagClass::Context,
            constructed: true,
            number: 1,
        };
        assert!(universal.is_eoc(0));
        assert!(context.is_eoc(0));
        assert!(!context.is_eoc(3));
    }

    #[test]
    fn value_must_fit_container() {
        let data = [0x30, 0x06, 0x02, 0x01, 0x2A];
        assert_eq!(
            read_tlv(&data, 0, data.len()).unwrap_err(),
            DecodeError::ValueTruncated {
                offset: 0,
                needed: 6,
                available: 3
            }
        );

        let tlv = read_tlv(&data, 2, data.len()).unwrap();
        assert_eq!(tlv.value, &[0x2A]);
        assert_eq!(tlv.end(), 5);
        // same TLV, but its container ends one byte early
        assert!(read_tlv(&data, 2, 4).is_err());
    }
}
