pub mod capsule;
pub mod config;
pub mod email;
pub mod error;
pub mod prompt;
pub mod roadmap;
pub mod seal;
pub mod store;

pub use error::{Result, VisionaryError};
pub use roadmap::{extract_roadmap, ExtractionResult, Outcome, Roadmap};
