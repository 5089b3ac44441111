pub mod cli;
pub mod commit;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feed;
pub mod git;
pub mod render;
pub mod request;

pub use commit::Commit;
pub use error::{DevdashError, ExtractionError, ParseError, Result};
pub use feed::{CommitFeed, CommitLog};
