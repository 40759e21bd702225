use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

/// A decoded scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

/// Flat mapping from dotted field path to value; the output of one block.
///
/// Inserting a key that is already present concatenates the textual values
/// with `;` in encounter order, so repeated sub-records never overwrite
/// each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        match self.fields.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                let joined = format!("{};{}", slot.get(), value);
                slot.insert(FieldValue::Str(joined));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Write the record as one JSON object followed by a newline.
    pub fn write_jsonl<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut itoa_buf = itoa::Buffer::new();
        w.write_all(b"{")?;
        let mut first = true;
        for (key, value) in &self.fields {
            if !first {
                w.write_all(b",")?;
            }
            first = false;

            write_json_str(w, key)?;
            w.write_all(b":")?;
            match value {
                FieldValue::Str(s) => write_json_str(w, s)?,
                FieldValue::Int(i) => w.write_all(itoa_buf.format(*i).as_bytes())?,
                FieldValue::UInt(u) => w.write_all(itoa_buf.format(*u).as_bytes())?,
                FieldValue::Bool(true) => w.write_all(b"true")?,
                FieldValue::Bool(false) => w.write_all(b"false")?,
            }
        }
        w.write_all(b"}\n")
    }
}

impl<'a> IntoIterator for &'a FlatRecord {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[inline]
fn write_json_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    w.write_all(b"\"")?;
    let bytes = s.as_bytes();
    let mut run_start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let escaped: Option<&[u8]> = match b {
            b'"' => Some(b"\\\""),
            b'\\' => Some(b"\\\\"),
            b'\n' => Some(b"\\n"),
            b'\r' => Some(b"\\r"),
            b'\t' => Some(b"\\t"),
            _ => None,
        };
        if escaped.is_none() && b >= 0x20 {
            continue;
        }
        w.write_all(&bytes[run_start..i])?;
        match escaped {
            Some(esc) => w.write_all(esc)?,
            None => {
                let esc = [b'\\', b'u', b'0', b'0', HEX[(b >> 4) as usize], HEX[(b & 0x0F) as usize]];
                w.write_all(&esc)?;
            }
        }
        run_start = i + 1;
    }
    w.write_all(&bytes[run_start..])?;
    w.write_all(b"\"")
}
