//! USB Audio Class 1.0 class-specific descriptors.

use super::{DecodeError, Fields};
use crate::registry;
use serde::Serialize;

/// Interface subclass of an AudioControl interface.
pub const AUDIO_CONTROL: u8 = 0x01;
/// Interface subclass of an AudioStreaming interface.
pub const AUDIO_STREAMING: u8 = 0x02;

// AudioControl interface subtypes
const HEADER: u8 = 0x01;
const INPUT_TERMINAL: u8 = 0x02;
const OUTPUT_TERMINAL: u8 = 0x03;
const FEATURE_UNIT: u8 = 0x06;

// AudioStreaming interface subtypes
const AS_GENERAL: u8 = 0x01;
const FORMAT_TYPE: u8 = 0x02;

const FORMAT_TYPE_I: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AudioControl {
    Header {
        bcd_adc: String,
        total_length: u16,
        in_collection: u8,
        interface_numbers: Vec<u8>,
    },
    InputTerminal {
        terminal_id: u8,
        terminal_type: u16,
        terminal_type_name: &'static str,
        assoc_terminal: u8,
        nr_channels: u8,
        channel_config: u16,
        index_channel_names: u8,
        index_terminal: u8,
    },
    OutputTerminal {
        terminal_id: u8,
        terminal_type: u16,
        terminal_type_name: &'static str,
        assoc_terminal: u8,
        source_id: u8,
        index_terminal: u8,
    },
    FeatureUnit {
        unit_id: u8,
        source_id: u8,
        control_size: u8,
        /// One control bitmap per channel, master channel first.
        controls: Vec<u32>,
        index_feature: u8,
    },
    Unknown {
        subtype: u8,
        data: Vec<u8>,
    },
}

impl AudioControl {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("AudioControl Interface", buf);
        Ok(match f.u8(2)? {
            HEADER => {
                let in_collection = f.u8(7)?;
                Self::Header {
                    bcd_adc: f.bcd(3)?,
                    total_length: f.u16(5)?,
                    in_collection,
                    interface_numbers: f.bytes(8, in_collection.into())?.to_vec(),
                }
            }
            INPUT_TERMINAL => {
                let terminal_type = f.u16(4)?;
                Self::InputTerminal {
                    terminal_id: f.u8(3)?,
                    terminal_type,
                    terminal_type_name: registry::audio_terminal_type_name(terminal_type),
                    assoc_terminal: f.u8(6)?,
                    nr_channels: f.u8(7)?,
                    channel_config: f.u16(8)?,
                    index_channel_names: f.u8(10)?,
                    index_terminal: f.u8(11)?,
                }
            }
            OUTPUT_TERMINAL => {
                let terminal_type = f.u16(4)?;
                Self::OutputTerminal {
                    terminal_id: f.u8(3)?,
                    terminal_type,
                    terminal_type_name: registry::audio_terminal_type_name(terminal_type),
                    assoc_terminal: f.u8(6)?,
                    source_id: f.u8(7)?,
                    index_terminal: f.u8(8)?,
                }
            }
            FEATURE_UNIT => feature_unit(&f)?,
            subtype => Self::Unknown {
                subtype,
                data: f.rest(3).to_vec(),
            },
        })
    }
}

fn feature_unit(f: &Fields<'_>) -> Result<AudioControl, DecodeError> {
    let b_unit_id = f.u8(3)?;
    let b_source_id = f.u8(4)?;
    let b_control_size = f.u8(5)?;
    if b_control_size == 0 || b_control_size > 4 {
        return Err(f.invalid("bControlSize", b_control_size.into()));
    }
    let size = usize::from(b_control_size);

    let n = f.len().saturating_sub(7) / size;
    let mut controls = Vec::with_capacity(n);
    let mut offset = 6;
    for _ in 0..n {
        let control = f
            .bytes(offset, size)?
            .iter()
            .enumerate()
            .fold(0u32, |acc, (j, &b)| acc | u32::from(b) << (8 * j));
        controls.push(control);
        offset += size;
    }

    Ok(AudioControl::FeatureUnit {
        unit_id: b_unit_id,
        source_id: b_source_id,
        control_size: b_control_size,
        controls,
        index_feature: f.u8(offset)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AudioStreaming {
    General {
        terminal_link: u8,
        delay: u8,
        format_tag: u16,
    },
    FormatType(FormatType),
    Unknown {
        subtype: u8,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FormatType {
    TypeI {
        nr_channels: u8,
        subframe_size: u8,
        bit_resolution: u8,
        sam_freq_type: u8,
        frequencies: SampleFrequencies,
    },
    Unsupported {
        format_type: u8,
    },
}

/// Sampling frequencies in Hz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SampleFrequencies {
    Continuous { lower: u32, upper: u32 },
    Discrete(Vec<u32>),
}

impl AudioStreaming {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("AudioStreaming Interface", buf);
        Ok(match f.u8(2)? {
            AS_GENERAL => Self::General {
                terminal_link: f.u8(3)?,
                delay: f.u8(4)?,
                format_tag: f.u16(5)?,
            },
            FORMAT_TYPE => Self::FormatType(format_type(&f)?),
            subtype => Self::Unknown {
                subtype,
                data: f.rest(3).to_vec(),
            },
        })
    }
}

fn format_type(f: &Fields<'_>) -> Result<FormatType, DecodeError> {
    let b_format_type = f.u8(3)?;
    if b_format_type != FORMAT_TYPE_I {
        return Ok(FormatType::Unsupported {
            format_type: b_format_type,
        });
    }
    let b_sam_freq_type = f.u8(7)?;
    let frequencies = match b_sam_freq_type {
        0 => SampleFrequencies::Continuous {
            lower: f.u24(8)?,
            upper: f.u24(11)?,
        },
        n => SampleFrequencies::Discrete(
            (0..usize::from(n))
                .map(|i| f.u24(8 + 3 * i))
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(FormatType::TypeI {
        nr_channels: f.u8(4)?,
        subframe_size: f.u8(5)?,
        bit_resolution: f.u8(6)?,
        sam_freq_type: b_sam_freq_type,
        frequencies,
    })
}

/// Class-specific isochronous audio data endpoint (EP_GENERAL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioEndpoint {
    pub subtype: u8,
    pub attributes: u8,
    pub sampling_frequency_control: bool,
    pub pitch_control: bool,
    pub lock_delay_units: u8,
    pub lock_delay_units_name: &'static str,
    pub lock_delay: u16,
}

impl AudioEndpoint {
    pub(crate) fn from_raw(buf: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("Audio Streaming Endpoint", buf);
        let bm_attributes = f.u8(3)?;
        let b_lock_delay_units = f.u8(4)?;
        Ok(AudioEndpoint {
            subtype: f.u8(2)?,
            attributes: bm_attributes,
            sampling_frequency_control: bm_attributes & 0x01 != 0,
            pitch_control: bm_attributes & 0x02 != 0,
            lock_delay_units: b_lock_delay_units,
            lock_delay_units_name: registry::lock_delay_unit_name(b_lock_delay_units),
            lock_delay: f.u16(5)?,
        })
    }
}
