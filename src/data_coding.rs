use ascii::AsciiStr;
use log::*;

/// A decoded short_message, or the raw bytes when the data_coding is
/// one this client does not interpret.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveredText {
    Text(String),
    Raw(Vec<u8>),
}

impl DeliveredText {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DeliveredText::Text(text) => Some(text),
            DeliveredText::Raw(_) => None,
        }
    }
}

/// Decodes a short_message according to its data_coding octet:
/// 1 is ASCII, 3 is Latin-1, 8 is UTF-16BE (UCS-2 in the SMPP spec,
/// but close enough). Anything else is handed back raw with a warning.
pub fn decode_short_message(bytes: &[u8], data_coding: u8) -> DeliveredText {
    match data_coding {
        1 => match AsciiStr::from_ascii(bytes) {
            Ok(text) => DeliveredText::Text(text.to_string()),
            Err(_) => {
                warn!("Non-ASCII payload with data_coding=1, passing raw");
                DeliveredText::Raw(bytes.to_vec())
            }
        },
        3 => DeliveredText::Text(
            bytes.iter().map(|b| char::from(*b)).collect(),
        ),
        8 => {
            if bytes.len() % 2 != 0 {
                warn!("Odd-length UTF-16BE payload, passing raw");
                return DeliveredText::Raw(bytes.to_vec());
            }
            let units: Vec<u16> = bytes
                .chunks(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            match String::from_utf16(&units) {
                Ok(text) => DeliveredText::Text(text),
                Err(_) => {
                    warn!("Invalid UTF-16BE payload, passing raw");
                    DeliveredText::Raw(bytes.to_vec())
                }
            }
        }
        other => {
            warn!("Not decoding message with data_coding={}", other);
            DeliveredText::Raw(bytes.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_decodes() {
        assert_eq!(
            decode_short_message(b"hello", 1),
            DeliveredText::Text(String::from("hello"))
        );
    }

    #[test]
    fn latin1_decodes_every_octet() {
        assert_eq!(
            decode_short_message(&[b'h', 0xE9, b'!'], 3),
            DeliveredText::Text(String::from("h\u{e9}!"))
        );
    }

    #[test]
    fn utf16be_decodes() {
        assert_eq!(
            decode_short_message(&[0x00, 0x68, 0x00, 0x69], 8),
            DeliveredText::Text(String::from("hi"))
        );
    }

    #[test]
    fn unknown_codings_pass_raw_bytes() {
        assert_eq!(
            decode_short_message(&[0x01, 0x02], 4),
            DeliveredText::Raw(vec![0x01, 0x02])
        );
    }

    #[test]
    fn non_ascii_with_ascii_coding_passes_raw() {
        assert_eq!(
            decode_short_message(&[0xFF], 1),
            DeliveredText::Raw(vec![0xFF])
        );
    }
}
