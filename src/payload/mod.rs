pub mod decoder;

pub use decoder::{decode_payload, DecodeError, RawLogEvent};
