use bytes::{BufMut, BytesMut};

use crate::pdu::codec::{put_c_octet_string, Reader};
use crate::pdu::PduError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySmBody {
    pub message_id: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
}

impl QuerySmBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        Ok(QuerySmBody {
            message_id: reader.c_octet_string(65, "message_id")?,
            source_addr_ton: reader.u8("source_addr_ton")?,
            source_addr_npi: reader.u8("source_addr_npi")?,
            source_addr: reader.c_octet_string(21, "source_addr")?,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        put_c_octet_string(buf, &self.message_id, 65, "message_id")?;
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        put_c_octet_string(buf, &self.source_addr, 21, "source_addr")
    }
}

/// query_sm_resp body; absent when the SMSC rejected the query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySmRespBody {
    pub message_id: Option<String>,
    pub final_date: String,
    pub message_state: u8,
    pub error_code: u8,
}

impl QuerySmRespBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        if reader.remaining() == 0 {
            return Ok(QuerySmRespBody {
                message_id: None,
                final_date: String::new(),
                message_state: 0,
                error_code: 0,
            });
        }
        Ok(QuerySmRespBody {
            message_id: Some(reader.c_octet_string(65, "message_id")?),
            final_date: reader.c_octet_string(17, "final_date")?,
            message_state: reader.u8("message_state")?,
            error_code: reader.u8("error_code")?,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if let Some(message_id) = &self.message_id {
            put_c_octet_string(buf, message_id, 65, "message_id")?;
            put_c_octet_string(buf, &self.final_date, 17, "final_date")?;
            buf.put_u8(self.message_state);
            buf.put_u8(self.error_code);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::{CommandStatus, Pdu, PduBody};

    #[test]
    fn query_sm_round_trips() {
        let body = QuerySmBody {
            message_id: String::from("ABC123"),
            source_addr_ton: 1,
            source_addr_npi: 1,
            source_addr: String::from("447000123123"),
        };
        let pdu = Pdu::new(
            CommandStatus::ESME_ROK,
            4,
            PduBody::QuerySm(body.clone()),
        );
        match Pdu::parse(&pdu.to_bytes().unwrap()).unwrap().body() {
            PduBody::QuerySm(parsed) => assert_eq!(*parsed, body),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn query_sm_resp_round_trips() {
        let body = QuerySmRespBody {
            message_id: Some(String::from("ABC123")),
            final_date: String::new(),
            message_state: 2,
            error_code: 0,
        };
        let pdu = Pdu::new(
            CommandStatus::ESME_ROK,
            4,
            PduBody::QuerySmResp(body.clone()),
        );
        match Pdu::parse(&pdu.to_bytes().unwrap()).unwrap().body() {
            PduBody::QuerySmResp(parsed) => assert_eq!(*parsed, body),
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
