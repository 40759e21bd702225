//! Decoder for telecom CDR files: ASN.1 BER "Voz" call data records and
//! Diameter accounting "VoLTE" messages, flattened to one field map per
//! record.
//!
//! A loaded buffer is split into blocks ([`segment`]), the blocks are decoded
//! on a worker pool ([`scheduler`]) by the engine for the file's format
//! ([`ber`] or [`diameter`]), and the records come back in file order.
//! [`pipeline::decode_buffer`] runs the whole sequence.

pub mod ber;
pub mod config;
pub mod diameter;
pub mod error;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod scheduler;
pub mod segment;
pub mod value;

pub use config::{DecodeConfig, FlagPolicy, Format};
pub use error::{BlockFailure, DecodeError, ValueError};
pub use pipeline::{decode_buffer, DecodeReport, DecodeStats};
pub use record::{FieldValue, FlatRecord};
pub use scheduler::{BlockDecoder, Scheduler};
pub use segment::{segment, slice_next_block, Block, Segmentation};
