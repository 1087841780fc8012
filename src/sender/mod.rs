pub mod serialization;
pub mod transport;

pub use serialization::{FRAME_TERMINATOR, encode_record, frame_payload};
pub use transport::{Transport, WRITE_DEADLINE};
