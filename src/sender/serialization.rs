use crate::domain::{GelfError, GelfRecord};

/// GELF over TCP frames each message with a trailing null byte.
pub const FRAME_TERMINATOR: u8 = 0;

/// Compact JSON rendering of a record, without framing.
pub fn encode_record(record: &GelfRecord) -> Result<String, GelfError> {
    Ok(serde_json::to_string(record)?)
}

/// Append the frame terminator to an encoded record.
pub fn frame_payload(json: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(json.len() + 1);
    frame.extend_from_slice(json.as_bytes());
    frame.push(FRAME_TERMINATOR);
    frame
}
