//! Sidecast Streams - Addon stream normalization
//!
//! Turns the loosely structured stream records returned by content addons
//! into display-ready entries: size, seeders, codec, HDR, audio and
//! resolution metadata, a human-readable name and a container hint.

pub mod errors;
pub mod parser;
pub mod providers;
pub mod rules;
pub mod service;
pub mod types;

// Re-export main types
pub use errors::StreamsError;
pub use parser::{display_name, parse};
pub use providers::{FixtureProvider, StreamDiscoveryProvider, StreamQuery};
pub use service::StreamListService;
pub use types::{
    AudioFormat, HdrFormat, ParsedStream, ParsedStreamMetadata, Resolution, StreamDescriptor,
    VideoCodec,
};

/// Convenience type alias for Results with StreamsError.
pub type Result<T> = std::result::Result<T, StreamsError>;
