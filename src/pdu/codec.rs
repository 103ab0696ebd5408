//! Field-level helpers shared by the PDU bodies: integers, C-octet
//! strings (NUL-terminated ASCII) and raw TLVs.

use ascii::AsciiStr;
use bytes::{BufMut, BytesMut};

use crate::pdu::PduError;

/// One optional parameter, kept raw. Readers that understand a tag can
/// interpret the value; everything else round-trips untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Tlv {
    pub tag: u16,
    pub value: Vec<u8>,
}

pub mod tags {
    pub const SAR_MSG_REF_NUM: u16 = 0x020C;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
}

/// Cursor over one PDU frame.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8, PduError> {
        if self.remaining() < 1 {
            return Err(PduError::Truncated { field });
        }
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    pub fn u16(&mut self, field: &'static str) -> Result<u16, PduError> {
        if self.remaining() < 2 {
            return Err(PduError::Truncated { field });
        }
        let value =
            u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn u32(&mut self, field: &'static str) -> Result<u32, PduError> {
        if self.remaining() < 4 {
            return Err(PduError::Truncated { field });
        }
        let value = u32::from_be_bytes([
            self.buf[self.pos],
            self.buf[self.pos + 1],
            self.buf[self.pos + 2],
            self.buf[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }

    pub fn octets(
        &mut self,
        len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], PduError> {
        if self.remaining() < len {
            return Err(PduError::Truncated { field });
        }
        let value = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(value)
    }

    /// Reads a NUL-terminated ASCII string of at most `max` octets
    /// (terminator included), consuming the terminator.
    pub fn c_octet_string(
        &mut self,
        max: usize,
        field: &'static str,
    ) -> Result<String, PduError> {
        let rest = self.rest();
        let nul = match rest.iter().position(|b| *b == 0) {
            Some(nul) => nul,
            None => return Err(PduError::UnterminatedString { field }),
        };
        if nul + 1 > max {
            return Err(PduError::FieldTooLong { field, max });
        }
        let value = AsciiStr::from_ascii(&rest[..nul])
            .map_err(|_| PduError::NotAscii { field })?;
        self.pos += nul + 1;
        Ok(value.to_string())
    }

    /// Consumes the remainder of the frame as optional parameters.
    pub fn tlvs(&mut self) -> Result<Vec<Tlv>, PduError> {
        let mut tlvs = Vec::new();
        while self.remaining() > 0 {
            let tag = self.u16("tlv tag")?;
            let len = self.u16("tlv length")? as usize;
            let value = self.octets(len, "tlv value")?.to_vec();
            tlvs.push(Tlv { tag, value });
        }
        Ok(tlvs)
    }
}

/// Appends a NUL-terminated ASCII string of at most `max` octets
/// (terminator included).
pub fn put_c_octet_string(
    buf: &mut BytesMut,
    value: &str,
    max: usize,
    field: &'static str,
) -> Result<(), PduError> {
    if value.len() + 1 > max {
        return Err(PduError::FieldTooLong { field, max });
    }
    let value = AsciiStr::from_ascii(value.as_bytes())
        .map_err(|_| PduError::NotAscii { field })?;
    if value.as_bytes().contains(&0) {
        return Err(PduError::NotAscii { field });
    }
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

pub fn put_tlvs(buf: &mut BytesMut, tlvs: &[Tlv]) {
    for tlv in tlvs {
        buf.put_u16(tlv.tag);
        buf.put_u16(tlv.value.len() as u16);
        buf.put_slice(&tlv.value);
    }
}

pub fn find_tlv<'a>(tlvs: &'a [Tlv], tag: u16) -> Option<&'a [u8]> {
    tlvs.iter().find(|tlv| tlv.tag == tag).map(|tlv| &tlv.value[..])
}
