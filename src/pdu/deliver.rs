use bytes::BytesMut;

use crate::pdu::codec::{put_c_octet_string, Reader};
use crate::pdu::PduError;

/// deliver_sm_resp body. The message_id field is unused in SMPP v3.4
/// and always set to the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliverSmRespBody {
    pub message_id: String,
}

impl DeliverSmRespBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        if reader.remaining() == 0 {
            return Ok(DeliverSmRespBody::default());
        }
        Ok(DeliverSmRespBody {
            message_id: reader.c_octet_string(65, "message_id")?,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        put_c_octet_string(buf, &self.message_id, 65, "message_id")
    }
}
