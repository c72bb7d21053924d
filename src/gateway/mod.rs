//! Gateway context and its builder

mod builder;
mod context;

pub use builder::{Heimdall, HeimdallBuilder};
pub use context::{Gateway, Health, SearchResults};
