use bytes::{BufMut, BytesMut};

use crate::pdu::codec::{
    find_tlv, put_c_octet_string, put_tlvs, tags, Reader, Tlv,
};
use crate::pdu::PduError;

/// Mandatory parameters shared by `submit_sm` and `deliver_sm`, whose
/// bodies are identical on the wire, plus any optional parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmBody {
    pub service_type: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub destination_addr: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Vec<u8>,
    pub tlvs: Vec<Tlv>,
}

impl SmBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        let service_type = reader.c_octet_string(6, "service_type")?;
        let source_addr_ton = reader.u8("source_addr_ton")?;
        let source_addr_npi = reader.u8("source_addr_npi")?;
        let source_addr = reader.c_octet_string(21, "source_addr")?;
        let dest_addr_ton = reader.u8("dest_addr_ton")?;
        let dest_addr_npi = reader.u8("dest_addr_npi")?;
        let destination_addr =
            reader.c_octet_string(21, "destination_addr")?;
        let esm_class = reader.u8("esm_class")?;
        let protocol_id = reader.u8("protocol_id")?;
        let priority_flag = reader.u8("priority_flag")?;
        let schedule_delivery_time =
            reader.c_octet_string(17, "schedule_delivery_time")?;
        let validity_period =
            reader.c_octet_string(17, "validity_period")?;
        let registered_delivery = reader.u8("registered_delivery")?;
        let replace_if_present_flag =
            reader.u8("replace_if_present_flag")?;
        let data_coding = reader.u8("data_coding")?;
        let sm_default_msg_id = reader.u8("sm_default_msg_id")?;
        let sm_length = reader.u8("sm_length")? as usize;
        let short_message =
            reader.octets(sm_length, "short_message")?.to_vec();
        let tlvs = reader.tlvs()?;
        Ok(SmBody {
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addr_ton,
            dest_addr_npi,
            destination_addr,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            short_message,
            tlvs,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if self.short_message.len() > 254 {
            return Err(PduError::FieldTooLong {
                field: "short_message",
                max: 254,
            });
        }
        put_c_octet_string(buf, &self.service_type, 6, "service_type")?;
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        put_c_octet_string(buf, &self.source_addr, 21, "source_addr")?;
        buf.put_u8(self.dest_addr_ton);
        buf.put_u8(self.dest_addr_npi);
        put_c_octet_string(
            buf,
            &self.destination_addr,
            21,
            "destination_addr",
        )?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        put_c_octet_string(
            buf,
            &self.schedule_delivery_time,
            17,
            "schedule_delivery_time",
        )?;
        put_c_octet_string(
            buf,
            &self.validity_period,
            17,
            "validity_period",
        )?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);
        put_tlvs(buf, &self.tlvs);
        Ok(())
    }

    /// UDHI bit: the short_message starts with a User Data Header.
    pub fn has_udh(&self) -> bool {
        self.esm_class & 0x40 != 0
    }

    pub fn sar_msg_ref_num(&self) -> Option<u16> {
        match find_tlv(&self.tlvs, tags::SAR_MSG_REF_NUM) {
            Some([high, low]) => Some(u16::from_be_bytes([*high, *low])),
            Some([low]) => Some(*low as u16),
            _ => None,
        }
    }

    pub fn sar_total_segments(&self) -> Option<u8> {
        match find_tlv(&self.tlvs, tags::SAR_TOTAL_SEGMENTS) {
            Some([total]) => Some(*total),
            _ => None,
        }
    }

    pub fn sar_segment_seqnum(&self) -> Option<u8> {
        match find_tlv(&self.tlvs, tags::SAR_SEGMENT_SEQNUM) {
            Some([seqnum]) => Some(*seqnum),
            _ => None,
        }
    }
}

/// submit_sm_resp body; absent entirely when the SMSC reports an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitSmRespBody {
    pub message_id: Option<String>,
}

impl SubmitSmRespBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        if reader.remaining() == 0 {
            return Ok(SubmitSmRespBody { message_id: None });
        }
        Ok(SubmitSmRespBody {
            message_id: Some(reader.c_octet_string(65, "message_id")?),
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if let Some(message_id) = &self.message_id {
            put_c_octet_string(buf, message_id, 65, "message_id")?;
        }
        Ok(())
    }
}

/// One destination in a submit_multi: either an SME address with its
/// own TON/NPI, or the name of a distribution list held by the SMSC.
#[derive(Debug, Clone, PartialEq)]
pub enum DestAddress {
    Sme {
        dest_addr_ton: u8,
        dest_addr_npi: u8,
        destination_addr: String,
    },
    DistributionList(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitMultiBody {
    pub service_type: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
    pub dest_addresses: Vec<DestAddress>,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Vec<u8>,
    pub tlvs: Vec<Tlv>,
}

impl SubmitMultiBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        let service_type = reader.c_octet_string(6, "service_type")?;
        let source_addr_ton = reader.u8("source_addr_ton")?;
        let source_addr_npi = reader.u8("source_addr_npi")?;
        let source_addr = reader.c_octet_string(21, "source_addr")?;
        let number_of_dests = reader.u8("number_of_dests")?;
        let mut dest_addresses = Vec::with_capacity(number_of_dests as usize);
        for _ in 0..number_of_dests {
            let dest_flag = reader.u8("dest_flag")?;
            match dest_flag {
                1 => dest_addresses.push(DestAddress::Sme {
                    dest_addr_ton: reader.u8("dest_addr_ton")?,
                    dest_addr_npi: reader.u8("dest_addr_npi")?,
                    destination_addr: reader
                        .c_octet_string(21, "destination_addr")?,
                }),
                2 => dest_addresses.push(DestAddress::DistributionList(
                    reader.c_octet_string(21, "dl_name")?,
                )),
                _ => {
                    return Err(PduError::Truncated { field: "dest_flag" })
                }
            }
        }
        let esm_class = reader.u8("esm_class")?;
        let protocol_id = reader.u8("protocol_id")?;
        let priority_flag = reader.u8("priority_flag")?;
        let schedule_delivery_time =
            reader.c_octet_string(17, "schedule_delivery_time")?;
        let validity_period =
            reader.c_octet_string(17, "validity_period")?;
        let registered_delivery = reader.u8("registered_delivery")?;
        let replace_if_present_flag =
            reader.u8("replace_if_present_flag")?;
        let data_coding = reader.u8("data_coding")?;
        let sm_default_msg_id = reader.u8("sm_default_msg_id")?;
        let sm_length = reader.u8("sm_length")? as usize;
        let short_message =
            reader.octets(sm_length, "short_message")?.to_vec();
        let tlvs = reader.tlvs()?;
        Ok(SubmitMultiBody {
            service_type,
            source_addr_ton,
            source_addr_npi,
            source_addr,
            dest_addresses,
            esm_class,
            protocol_id,
            priority_flag,
            schedule_delivery_time,
            validity_period,
            registered_delivery,
            replace_if_present_flag,
            data_coding,
            sm_default_msg_id,
            short_message,
            tlvs,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if self.dest_addresses.len() > 254 {
            return Err(PduError::FieldTooLong {
                field: "dest_addresses",
                max: 254,
            });
        }
        if self.short_message.len() > 254 {
            return Err(PduError::FieldTooLong {
                field: "short_message",
                max: 254,
            });
        }
        put_c_octet_string(buf, &self.service_type, 6, "service_type")?;
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        put_c_octet_string(buf, &self.source_addr, 21, "source_addr")?;
        buf.put_u8(self.dest_addresses.len() as u8);
        for dest in &self.dest_addresses {
            match dest {
                DestAddress::Sme {
                    dest_addr_ton,
                    dest_addr_npi,
                    destination_addr,
                } => {
                    buf.put_u8(1);
                    buf.put_u8(*dest_addr_ton);
                    buf.put_u8(*dest_addr_npi);
                    put_c_octet_string(
                        buf,
                        destination_addr,
                        21,
                        "destination_addr",
                    )?;
                }
                DestAddress::DistributionList(dl_name) => {
                    buf.put_u8(2);
                    put_c_octet_string(buf, dl_name, 21, "dl_name")?;
                }
            }
        }
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        put_c_octet_string(
            buf,
            &self.schedule_delivery_time,
            17,
            "schedule_delivery_time",
        )?;
        put_c_octet_string(
            buf,
            &self.validity_period,
            17,
            "validity_period",
        )?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);
        put_tlvs(buf, &self.tlvs);
        Ok(())
    }
}

/// One failed destination reported in a submit_multi_resp.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsuccessSme {
    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub destination_addr: String,
    pub error_status_code: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitMultiRespBody {
    pub message_id: Option<String>,
    pub unsuccess_smes: Vec<UnsuccessSme>,
}

impl SubmitMultiRespBody {
    pub(crate) fn parse(mut reader: Reader) -> Result<Self, PduError> {
        if reader.remaining() == 0 {
            return Ok(SubmitMultiRespBody {
                message_id: None,
                unsuccess_smes: Vec::new(),
            });
        }
        let message_id = reader.c_octet_string(65, "message_id")?;
        let no_unsuccess = reader.u8("no_unsuccess")?;
        let mut unsuccess_smes = Vec::with_capacity(no_unsuccess as usize);
        for _ in 0..no_unsuccess {
            unsuccess_smes.push(UnsuccessSme {
                dest_addr_ton: reader.u8("dest_addr_ton")?,
                dest_addr_npi: reader.u8("dest_addr_npi")?,
                destination_addr: reader
                    .c_octet_string(21, "destination_addr")?,
                error_status_code: reader.u32("error_status_code")?,
            });
        }
        Ok(SubmitMultiRespBody {
            message_id: Some(message_id),
            unsuccess_smes,
        })
    }

    pub(crate) fn write(&self, buf: &mut BytesMut) -> Result<(), PduError> {
        if let Some(message_id) = &self.message_id {
            put_c_octet_string(buf, message_id, 65, "message_id")?;
            buf.put_u8(self.unsuccess_smes.len() as u8);
            for sme in &self.unsuccess_smes {
                buf.put_u8(sme.dest_addr_ton);
                buf.put_u8(sme.dest_addr_npi);
                put_c_octet_string(
                    buf,
                    &sme.destination_addr,
                    21,
                    "destination_addr",
                )?;
                buf.put_u32(sme.error_status_code);
            }
        }
        Ok(())
    }
}
