//! Splits a raw GET_DESCRIPTOR response into length-prefixed records.

use serde::Serialize;
use thiserror::Error;

/// One length-prefixed descriptor inside the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Position of `bLength` in the input buffer.
    pub offset: usize,
    /// The whole record, `bLength` and `bDescriptorType` included. At least two bytes long.
    pub bytes: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn declared_length(&self) -> u8 {
        self.bytes[0]
    }

    pub fn type_tag(&self) -> u8 {
        self.bytes[1]
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[2..]
    }
}

/// Corruption in the length/type framing. Segmentation stops at the first one.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize)]
pub enum FramingError {
    #[error("descriptor at offset {offset} declares a length of 0")]
    ZeroLength { offset: usize },
    #[error("descriptor at offset {offset} declares a length of 1, shorter than its header")]
    TooShort { offset: usize },
    #[error("trailing byte at offset {offset} has no descriptor type")]
    MissingType { offset: usize },
    #[error(
        "descriptor at offset {offset} declares {declared} bytes but only {available} remain"
    )]
    Truncated {
        offset: usize,
        declared: u8,
        available: usize,
    },
}

impl FramingError {
    pub fn offset(&self) -> usize {
        match *self {
            Self::ZeroLength { offset }
            | Self::TooShort { offset }
            | Self::MissingType { offset }
            | Self::Truncated { offset, .. } => offset,
        }
    }
}

/// Iterator over the records of a buffer.
///
/// Iteration ends at the end of the buffer or at the first framing error, which is then available
/// through [`Records::framing_error`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    buf: &'a [u8],
    index: usize,
    error: Option<FramingError>,
}

impl<'a> Records<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            index: 0,
            error: None,
        }
    }

    pub fn framing_error(&self) -> Option<FramingError> {
        self.error
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.index
    }

    fn frame(&self) -> Result<Option<Record<'a>>, FramingError> {
        let offset = self.index;
        let remaining = self.buf.len() - offset;
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < 2 {
            return Err(FramingError::MissingType { offset });
        }
        let declared = self.buf[offset];
        match declared {
            0 => Err(FramingError::ZeroLength { offset }),
            1 => Err(FramingError::TooShort { offset }),
            l if usize::from(l) > remaining => Err(FramingError::Truncated {
                offset,
                declared,
                available: remaining,
            }),
            l => Ok(Some(Record {
                offset,
                bytes: &self.buf[offset..offset + usize::from(l)],
            })),
        }
    }

    /// Consumes the next record only if it is well framed and `pred` accepts it.
    ///
    /// Nothing is consumed and no error is recorded otherwise.
    pub fn next_if(&mut self, pred: impl FnOnce(&Record<'a>) -> bool) -> Option<Record<'a>> {
        if self.error.is_some() {
            return None;
        }
        match self.frame() {
            Ok(Some(r)) if pred(&r) => {
                self.index += r.bytes.len();
                Some(r)
            }
            _ => None,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        match self.frame() {
            Ok(r) => {
                if let Some(r) = r {
                    self.index += r.bytes.len();
                }
                r
            }
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Segmentation<'a> {
        records: Vec<Record<'a>>,
        error: Option<FramingError>,
    }

    fn segment(buf: &[u8]) -> Segmentation<'_> {
        let mut it = Records::new(buf);
        let records = it.by_ref().collect();
        Segmentation {
            records,
            error: it.framing_error(),
        }
    }

    #[test]
    fn splits_records() {
        let buf = [0x04, 0x03, 0x09, 0x04, 0x02, 0x30, 0x03, 0xaa, 0xbb];
        let s = segment(&buf);
        assert_eq!(s.error, None);
        assert_eq!(s.records.len(), 3);
        assert_eq!(s.records[0].type_tag(), 0x03);
        assert_eq!(s.records[0].payload(), &[0x09, 0x04]);
        assert_eq!(s.records[1].offset, 4);
        assert!(s.records[1].payload().is_empty());
        assert_eq!(s.records[2].declared_length(), 3);
        assert_eq!(s.records[2].payload(), &[0xbb]);
    }

    #[test]
    fn zero_length_halts_and_keeps_earlier_records() {
        let buf = [0x02, 0x30, 0x00, 0x05, 0x02, 0x30];
        let s = segment(&buf);
        assert_eq!(s.records.len(), 1);
        assert_eq!(s.error, Some(FramingError::ZeroLength { offset: 2 }));
    }

    #[test]
    fn truncated_record_halts() {
        let buf = [0x02, 0x30, 0x09, 0x04, 0x00];
        let s = segment(&buf);
        assert_eq!(s.records.len(), 1);
        assert_eq!(
            s.error,
            Some(FramingError::Truncated {
                offset: 2,
                declared: 9,
                available: 3
            })
        );
    }

    #[test]
    fn trailing_single_byte() {
        let s = segment(&[0x02, 0x30, 0x07]);
        assert_eq!(s.records.len(), 1);
        assert_eq!(s.error, Some(FramingError::MissingType { offset: 2 }));
        assert_eq!(s.error.map(|e| e.offset()), Some(2));
    }

    #[test]
    fn length_one_halts() {
        let s = segment(&[0x01, 0x05, 0x02, 0x30]);
        assert!(s.records.is_empty());
        assert_eq!(s.error, Some(FramingError::TooShort { offset: 0 }));
    }

    #[test]
    fn empty_buffer() {
        let s = segment(&[]);
        assert!(s.records.is_empty());
        assert_eq!(s.error, None);
    }

    #[test]
    fn next_if_leaves_rejected_records() {
        let buf = [0x02, 0x30, 0x02, 0x04, 0x00];
        let mut it = Records::new(&buf);
        assert!(it.next_if(|r| r.type_tag() == 0x30).is_some());
        assert!(it.next_if(|r| r.type_tag() == 0x30).is_none());
        assert_eq!(it.position(), 2);
        assert_eq!(it.next().map(|r| r.type_tag()), Some(0x04));
        assert!(it.next_if(|_| true).is_none());
        assert_eq!(it.framing_error(), None);
        assert!(it.next().is_none());
        assert_eq!(it.framing_error(), Some(FramingError::ZeroLength { offset: 4 }));
    }
}
