use super::{DecodeError, Fields};
use crate::names::NameResolver;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StringDescriptor {
    /// String descriptor zero: the language IDs the device supports.
    Languages(Vec<Language>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: u16,
    pub name: String,
}

impl StringDescriptor {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("String", buf);
        match f.len() {
            4 => {
                let id = f.u16(2)?;
                Ok(Self::Languages(vec![Language {
                    id,
                    name: names.language_name(id),
                }]))
            }
            // A lone byte cannot hold a UTF-16 code unit.
            3 => Err(f.invalid("bLength", 3)),
            _ => {
                let units: Vec<u16> = f
                    .rest(2)
                    .chunks(2)
                    .map(|c| match *c {
                        [lo, hi] => u16::from_le_bytes([lo, hi]),
                        [lo] => u16::from(lo),
                        _ => 0,
                    })
                    .collect();
                Ok(Self::Text(String::from_utf16_lossy(&units)))
            }
        }
    }
}
