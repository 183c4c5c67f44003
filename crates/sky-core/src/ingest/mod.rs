//! Input decoding: uploaded tables and streamed samples.

pub mod normalize;
pub mod reader;
pub mod sample;

pub use normalize::{canonical_field, normalize, ColumnMapping};
pub use reader::{read_table, RawRow, RawTable, ReadStrategy, UnreadableFile};
pub use sample::{parse_sample, parse_sample_value, SamplePayload};
