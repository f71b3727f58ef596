use crate::error::TransportError;
use crate::frame::{Framebuffer, quantize};

pub const DEFAULT_PORT: u16 = 7890;
pub const HEADER_SIZE: usize = 4;

pub const BROADCAST_CHANNEL: u8 = 0;

pub mod command {
    pub const SET_PIXEL_COLORS: u8 = 0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub command: u8,
    pub channel: u8,
    pub length: u16,
}

impl FrameHeader {
    pub fn new(command: u8, channel: u8, length: u16) -> Self {
        Self {
            command,
            channel,
            length,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [hi, lo] = self.length.to_be_bytes();
        [self.command, self.channel, hi, lo]
    }

    pub fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [command, channel, hi, lo, ..] => Some(Self {
                command: *command,
                channel: *channel,
                length: u16::from_be_bytes([*hi, *lo]),
            }),
            _ => None,
        }
    }

    pub fn frame_len(&self) -> usize {
        HEADER_SIZE + self.length as usize
    }
}

pub fn frame_len(fb: &Framebuffer) -> usize {
    HEADER_SIZE + fb.channel_count()
}

/// Encodes raw channel values into `out`, replacing its contents.
pub fn encode_channels_into(
    channels: &[f64],
    channel: u8,
    command: u8,
    out: &mut Vec<u8>,
) -> Result<(), TransportError> {
    let length = u16::try_from(channels.len())
        .map_err(|_| TransportError::FrameTooLarge(channels.len()))?;

    out.clear();
    out.reserve(HEADER_SIZE + channels.len());
    out.extend_from_slice(&FrameHeader::new(command, channel, length).to_bytes());
    out.extend(channels.iter().map(|&value| quantize(value)));

    Ok(())
}

pub fn encode_frame_into(
    fb: &Framebuffer,
    channel: u8,
    command: u8,
    out: &mut Vec<u8>,
) -> Result<(), TransportError> {
    encode_channels_into(fb.channels(), channel, command, out)
}

pub fn encode_frame(fb: &Framebuffer, channel: u8, command: u8) -> Result<Vec<u8>, TransportError> {
    let mut out = Vec::with_capacity(frame_len(fb));
    encode_frame_into(fb, channel, command, &mut out)?;
    Ok(out)
}
