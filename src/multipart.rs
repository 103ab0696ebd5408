//! Detection and reassembly of concatenated (multipart) short messages.
//!
//! Fragments are recognised either by a User Data Header concatenation
//! element (8- or 16-bit reference) or by the `sar_*` optional
//! parameter triple. Partial assemblies are round-tripped through the
//! session store as a JSON array of `[seq_no, base64-fragment]`
//! entries; entries of any other shape are preserved untouched so that
//! other writers sharing the store are not corrupted.

use log::*;
use serde_json::Value;

use crate::pdu::SmBody;

const IE_CONCAT_8BIT: u8 = 0x00;
const IE_CONCAT_16BIT: u8 = 0x08;

/// One fragment of a concatenated message, with its payload already
/// stripped of the UDH.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartFragment {
    pub ref_num: u16,
    pub total: u8,
    pub seq: u8,
    pub bytes: Vec<u8>,
}

impl MultipartFragment {
    /// Store-key component identifying the message this fragment
    /// belongs to. Stable across reimplementations.
    pub fn key(&self, source_addr: &str, destination_addr: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            self.ref_num, self.total, source_addr, destination_addr
        )
    }
}

/// Recognises a multipart fragment in a deliver_sm body.
pub fn detect_multipart(body: &SmBody) -> Option<MultipartFragment> {
    if body.has_udh() {
        if let Some(fragment) = fragment_from_udh(&body.short_message) {
            return Some(fragment);
        }
    }
    fragment_from_sar(body)
}

fn fragment_from_udh(short_message: &[u8]) -> Option<MultipartFragment> {
    let udh_len = *short_message.first()? as usize;
    if short_message.len() < 1 + udh_len {
        return None;
    }
    let mut elements = &short_message[1..1 + udh_len];
    let payload = short_message[1 + udh_len..].to_vec();
    while elements.len() >= 2 {
        let id = elements[0];
        let len = elements[1] as usize;
        if elements.len() < 2 + len {
            return None;
        }
        let data = &elements[2..2 + len];
        match (id, len) {
            (IE_CONCAT_8BIT, 3) => {
                return Some(MultipartFragment {
                    ref_num: data[0] as u16,
                    total: data[1],
                    seq: data[2],
                    bytes: payload,
                })
            }
            (IE_CONCAT_16BIT, 4) => {
                return Some(MultipartFragment {
                    ref_num: u16::from_be_bytes([data[0], data[1]]),
                    total: data[2],
                    seq: data[3],
                    bytes: payload,
                })
            }
            _ => elements = &elements[2 + len..],
        }
    }
    None
}

fn fragment_from_sar(body: &SmBody) -> Option<MultipartFragment> {
    Some(MultipartFragment {
        ref_num: body.sar_msg_ref_num()?,
        total: body.sar_total_segments()?,
        seq: body.sar_segment_seqnum()?,
        bytes: body.short_message.clone(),
    })
}

enum AssemblyEntry {
    Part { seq: u8, bytes: Vec<u8> },
    Foreign(Value),
}

/// The accumulating state of one concatenated message.
pub struct MultipartAssembly {
    entries: Vec<AssemblyEntry>,
}

impl MultipartAssembly {
    /// Decodes a stored buffer; `None` (key absent) or unparseable
    /// bytes start a fresh assembly.
    pub fn from_stored(stored: Option<&[u8]>) -> MultipartAssembly {
        let entries = stored
            .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
            .and_then(|value| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default()
            .into_iter()
            .map(|item| match part_from_value(&item) {
                Some((seq, bytes)) => AssemblyEntry::Part { seq, bytes },
                None => AssemblyEntry::Foreign(item),
            })
            .collect();
        MultipartAssembly { entries }
    }

    /// Inserts a fragment at its sequence slot. A duplicate sequence
    /// number overwrites the earlier fragment.
    pub fn add(&mut self, fragment: &MultipartFragment) {
        for entry in &mut self.entries {
            if let AssemblyEntry::Part { seq, bytes } = entry {
                if *seq == fragment.seq {
                    *bytes = fragment.bytes.clone();
                    return;
                }
            }
        }
        self.entries.push(AssemblyEntry::Part {
            seq: fragment.seq,
            bytes: fragment.bytes.clone(),
        });
    }

    /// When every slot `1..=total` is filled, the payloads concatenated
    /// in sequence order, independent of arrival order.
    pub fn completed(&self, total: u8) -> Option<Vec<u8>> {
        let mut parts: Vec<(u8, &[u8])> = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                AssemblyEntry::Part { seq, bytes } => {
                    Some((*seq, &bytes[..]))
                }
                AssemblyEntry::Foreign(_) => None,
            })
            .collect();
        for slot in 1..=total {
            if !parts.iter().any(|(seq, _)| *seq == slot) {
                return None;
            }
        }
        parts.sort_by_key(|(seq, _)| *seq);
        Some(
            parts
                .iter()
                .flat_map(|(_, bytes)| bytes.iter().copied())
                .collect(),
        )
    }

    pub fn to_stored(&self) -> Vec<u8> {
        let items: Vec<Value> = self
            .entries
            .iter()
            .map(|entry| match entry {
                AssemblyEntry::Part { seq, bytes } => Value::Array(vec![
                    Value::from(*seq),
                    Value::from(base64::encode(bytes)),
                ]),
                AssemblyEntry::Foreign(value) => value.clone(),
            })
            .collect();
        serde_json::to_vec(&Value::Array(items))
            .expect("JSON arrays always serialise")
    }
}

fn part_from_value(value: &Value) -> Option<(u8, Vec<u8>)> {
    let items = value.as_array()?;
    if items.len() != 2 {
        return None;
    }
    let seq = items[0].as_u64()?;
    if seq > u8::MAX as u64 {
        return None;
    }
    let text = items[1].as_str()?;
    let bytes = match base64::decode(text) {
        Ok(bytes) => bytes,
        Err(_) => {
            // A writer that stored the fragment as plain text.
            debug!("Multipart entry is not base64, keeping raw text");
            text.as_bytes().to_vec()
        }
    };
    Some((seq as u8, bytes))
}
