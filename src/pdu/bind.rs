use bytes::{BufMut, BytesMut};

use crate::pdu::codec::{put_c_octet_string, Reader};
use crate::pdu::PduError;

/// bind_transceiver body, the only bind mode this client speaks.
#[derive(Debug, Clone, PartialEq)]
pub struct BindTransceiverBody {
    pub system_id: String,
    pub password: String,
    pub system_type: String,
    pub interface_version: u8,
    pub addr_ton: u8,
    pub addr_npi: u8,
    pub address_range: String,
}

impl BindTransceiverBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        let body = BindTransceiverBody {
            system_id: reader.c_octet_string(16, "system_id")?,
            password: reader.c_octet_string(9, "password")?,
            system_type: reader.c_octet_string(13, "system_type")?,
            interface_version: reader.u8("interface_version")?,
            addr_ton: reader.u8("addr_ton")?,
            addr_npi: reader.u8("addr_npi")?,
            address_range: reader.c_octet_string(41, "address_range")?,
        };
        Ok(body)
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        put_c_octet_string(buf, &self.system_id, 16, "system_id")?;
        put_c_octet_string(buf, &self.password, 9, "password")?;
        put_c_octet_string(buf, &self.system_type, 13, "system_type")?;
        buf.put_u8(self.interface_version);
        buf.put_u8(self.addr_ton);
        buf.put_u8(self.addr_npi);
        put_c_octet_string(buf, &self.address_range, 41, "address_range")?;
        Ok(())
    }
}

/// bind_transceiver_resp body. An error response may carry no body at
/// all, in which case `system_id` is absent. Optional parameters (e.g.
/// sc_interface_version) are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BindTransceiverRespBody {
    pub system_id: Option<String>,
}

impl BindTransceiverRespBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        if reader.remaining() == 0 {
            return Ok(BindTransceiverRespBody { system_id: None });
        }
        let system_id = reader.c_octet_string(16, "system_id")?;
        reader.tlvs()?;
        Ok(BindTransceiverRespBody {
            system_id: Some(system_id),
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if let Some(system_id) = &self.system_id {
            put_c_octet_string(buf, system_id, 16, "system_id")?;
        }
        Ok(())
    }
}
