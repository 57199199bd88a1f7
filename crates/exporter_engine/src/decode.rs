use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("snapshot is not valid {encoding}")]
    Malformed { encoding: String },
}

/// Decode a captured page to UTF-8: BOM first, then `chardetng` detection.
///
/// Saved pages carry no transport headers, so the bytes are all we have.
pub fn decode_snapshot(bytes: &[u8]) -> Result<DecodedSnapshot, DecodeError> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        }
    };

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedSnapshot {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
