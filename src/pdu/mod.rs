//! PDU records and a wire codec for the subset of SMPP v3.4 this client
//! emits and consumes. PDUs are held as a header plus a tagged body;
//! optional parameters travel as raw TLVs.

pub mod bind;
pub mod codec;
pub mod command_id;
pub mod command_status;
pub mod deliver;
pub mod query;
pub mod submit;

use bytes::{BufMut, BytesMut};
use std::fmt::{Display, Formatter};

pub use bind::{BindTransceiverBody, BindTransceiverRespBody};
pub use codec::Tlv;
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use deliver::DeliverSmRespBody;
pub use query::{QuerySmBody, QuerySmRespBody};
pub use submit::{
    DestAddress, SmBody, SubmitMultiBody, SubmitMultiRespBody,
    SubmitSmRespBody, UnsuccessSme,
};

use codec::Reader;

/// Anything that stops a PDU from being encoded or decoded.
#[derive(Debug, PartialEq)]
pub enum PduError {
    Truncated { field: &'static str },
    UnterminatedString { field: &'static str },
    NotAscii { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
    LengthMismatch { command_length: u32, actual: usize },
}

impl Display for PduError {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            PduError::Truncated { field } => {
                write!(formatter, "PDU ends inside field '{}'", field)
            }
            PduError::UnterminatedString { field } => {
                write!(formatter, "field '{}' has no NUL terminator", field)
            }
            PduError::NotAscii { field } => {
                write!(formatter, "field '{}' contains non-ASCII bytes", field)
            }
            PduError::FieldTooLong { field, max } => write!(
                formatter,
                "field '{}' is longer than its maximum of {} octets",
                field, max
            ),
            PduError::LengthMismatch {
                command_length,
                actual,
            } => write!(
                formatter,
                "command_length {} does not match the {} bytes supplied",
                command_length, actual
            ),
        }
    }
}

impl std::error::Error for PduError {}

/// One SMPP PDU: the header fields this client cares about plus a typed
/// body. `command_length` is computed on encode; `command_id` is implied
/// by the body variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    body: PduBody,
}

impl Pdu {
    pub fn new(
        command_status: CommandStatus,
        sequence_number: u32,
        body: PduBody,
    ) -> Pdu {
        Pdu {
            command_status,
            sequence_number,
            body,
        }
    }

    pub fn body(&self) -> &PduBody {
        &self.body
    }

    pub fn command_id(&self) -> CommandId {
        self.body.command_id()
    }

    /// Decodes one complete frame, as produced by the framer.
    pub fn parse(frame: &[u8]) -> Result<Pdu, PduError> {
        let mut reader = Reader::new(frame);
        let command_length = reader.u32("command_length")?;
        if command_length as usize != frame.len() {
            return Err(PduError::LengthMismatch {
                command_length,
                actual: frame.len(),
            });
        }
        let command_id = reader.u32("command_id")?;
        let command_status =
            CommandStatus::from_u32(reader.u32("command_status")?);
        let sequence_number = reader.u32("sequence_number")?;
        let body = PduBody::parse(command_id, reader)?;
        Ok(Pdu {
            command_status,
            sequence_number,
            body,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PduError> {
        let mut body = BytesMut::new();
        self.body.write(&mut body)?;
        let mut bytes = Vec::with_capacity(16 + body.len());
        bytes.extend_from_slice(&(16 + body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.command_id().as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.command_status.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.sequence_number.to_be_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }
}

/// The PDU types this client understands, plus `Other` for anything else
/// (kept as raw bytes and ignored after classifier dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum PduBody {
    BindTransceiver(BindTransceiverBody),
    BindTransceiverResp(BindTransceiverRespBody),
    SubmitSm(SmBody),
    SubmitSmResp(SubmitSmRespBody),
    SubmitMulti(SubmitMultiBody),
    SubmitMultiResp(SubmitMultiRespBody),
    DeliverSm(SmBody),
    DeliverSmResp(DeliverSmRespBody),
    QuerySm(QuerySmBody),
    QuerySmResp(QuerySmRespBody),
    EnquireLink,
    EnquireLinkResp,
    GenericNack,
    Other { command_id: u32, body: Vec<u8> },
}

impl PduBody {
    pub fn command_id(&self) -> CommandId {
        match self {
            PduBody::BindTransceiver(_) => CommandId::BindTransceiver,
            PduBody::BindTransceiverResp(_) => CommandId::BindTransceiverResp,
            PduBody::SubmitSm(_) => CommandId::SubmitSm,
            PduBody::SubmitSmResp(_) => CommandId::SubmitSmResp,
            PduBody::SubmitMulti(_) => CommandId::SubmitMulti,
            PduBody::SubmitMultiResp(_) => CommandId::SubmitMultiResp,
            PduBody::DeliverSm(_) => CommandId::DeliverSm,
            PduBody::DeliverSmResp(_) => CommandId::DeliverSmResp,
            PduBody::QuerySm(_) => CommandId::QuerySm,
            PduBody::QuerySmResp(_) => CommandId::QuerySmResp,
            PduBody::EnquireLink => CommandId::EnquireLink,
            PduBody::EnquireLinkResp => CommandId::EnquireLinkResp,
            PduBody::GenericNack => CommandId::GenericNack,
            PduBody::Other { command_id, .. } => {
                CommandId::Other(*command_id)
            }
        }
    }

    fn parse(command_id: u32, reader: Reader) -> Result<PduBody, PduError> {
        match CommandId::from_u32(command_id) {
            CommandId::BindTransceiver => Ok(PduBody::BindTransceiver(
                BindTransceiverBody::parse(reader)?,
            )),
            CommandId::BindTransceiverResp => {
                Ok(PduBody::BindTransceiverResp(
                    BindTransceiverRespBody::parse(reader)?,
                ))
            }
            CommandId::SubmitSm => {
                Ok(PduBody::SubmitSm(SmBody::parse(reader)?))
            }
            CommandId::SubmitSmResp => {
                Ok(PduBody::SubmitSmResp(SubmitSmRespBody::parse(reader)?))
            }
            CommandId::SubmitMulti => {
                Ok(PduBody::SubmitMulti(SubmitMultiBody::parse(reader)?))
            }
            CommandId::SubmitMultiResp => Ok(PduBody::SubmitMultiResp(
                SubmitMultiRespBody::parse(reader)?,
            )),
            CommandId::DeliverSm => {
                Ok(PduBody::DeliverSm(SmBody::parse(reader)?))
            }
            CommandId::DeliverSmResp => Ok(PduBody::DeliverSmResp(
                DeliverSmRespBody::parse(reader)?,
            )),
            CommandId::QuerySm => {
                Ok(PduBody::QuerySm(QuerySmBody::parse(reader)?))
            }
            CommandId::QuerySmResp => {
                Ok(PduBody::QuerySmResp(QuerySmRespBody::parse(reader)?))
            }
            CommandId::EnquireLink => Ok(PduBody::EnquireLink),
            CommandId::EnquireLinkResp => Ok(PduBody::EnquireLinkResp),
            CommandId::GenericNack => Ok(PduBody::GenericNack),
            CommandId::Other(id) => Ok(PduBody::Other {
                command_id: id,
                body: reader.rest().to_vec(),
            }),
        }
    }

    fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        match self {
            PduBody::BindTransceiver(body) => body.write(buf),
            PduBody::BindTransceiverResp(body) => body.write(buf),
            PduBody::SubmitSm(body) => body.write(buf),
            PduBody::SubmitSmResp(body) => body.write(buf),
            PduBody::SubmitMulti(body) => body.write(buf),
            PduBody::SubmitMultiResp(body) => body.write(buf),
            PduBody::DeliverSm(body) => body.write(buf),
            PduBody::DeliverSmResp(body) => body.write(buf),
            PduBody::QuerySm(body) => body.write(buf),
            PduBody::QuerySmResp(body) => body.write(buf),
            PduBody::EnquireLink
            | PduBody::EnquireLinkResp
            | PduBody::GenericNack => Ok(()),
            PduBody::Other { body, .. } => {
                buf.put_slice(body);
                Ok(())
            }
        }
    }
}
