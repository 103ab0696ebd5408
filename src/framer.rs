use bytes::{Bytes, BytesMut};
use std::fmt::{Display, Formatter};

/// Smallest possible PDU: the 16-byte header alone.
const PDU_HEADER_LEN: usize = 16;

/// Malformed `command_length` prefix. Connection-fatal: the stream can
/// not be resynchronised once the length field is wrong.
#[derive(Debug, PartialEq)]
pub enum FrameError {
    LengthTooShort { command_length: u32 },
    LengthTooLong { command_length: u32, max: u32 },
}

impl Display for FrameError {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            FrameError::LengthTooShort { command_length } => write!(
                formatter,
                "command_length {} is shorter than a PDU header",
                command_length
            ),
            FrameError::LengthTooLong {
                command_length,
                max,
            } => write!(
                formatter,
                "command_length {} exceeds the maximum of {}",
                command_length, max
            ),
        }
    }
}

impl std::error::Error for FrameError {}

/// Accumulates raw bytes from the transport and yields one PDU-sized
/// slice at a time, using the 4-byte big-endian `command_length` prefix.
///
/// `feed` accepts arbitrary TCP chunking; callers drain `try_pop` in a
/// loop after each feed. A frame is never partially consumed.
pub struct Framer {
    buffer: BytesMut,
    max_pdu_len: u32,
}

impl Framer {
    pub fn new(max_pdu_len: u32) -> Framer {
        Framer {
            buffer: BytesMut::with_capacity(4096),
            max_pdu_len,
        }
    }

    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn try_pop(&mut self) -> Result<Option<Bytes>, FrameError> {
        if self.buffer.len() < 4 {
            return Ok(None);
        }
        let command_length = u32::from_be_bytes([
            self.buffer[0],
            self.buffer[1],
            self.buffer[2],
            self.buffer[3],
        ]);
        if command_length < PDU_HEADER_LEN as u32 {
            return Err(FrameError::LengthTooShort { command_length });
        }
        if command_length > self.max_pdu_len {
            return Err(FrameError::LengthTooLong {
                command_length,
                max: self.max_pdu_len,
            });
        }
        if self.buffer.len() < command_length as usize {
            return Ok(None);
        }
        Ok(Some(self.buffer.split_to(command_length as usize).freeze()))
    }
}
