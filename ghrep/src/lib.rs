// ghrep/src/lib.rs
//! # ghrep CLI Application
//!
//! Command-line front end for `ghrep-core`. It finds the local checkouts,
//! turns term specs into grep and perl pipelines, computes topic edits and
//! applies rules to single files in-process.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod sink;
pub mod ui;
pub mod utils;

pub use commands::{dispatch, Session};

#[cfg(any(test, feature = "test-exposed"))]
pub mod test_exposed {
    pub mod config {
        pub use ghrep_core::config::*;
    }
    pub mod sink {
        pub use crate::sink::*;
    }
    pub mod utils {
        pub use crate::utils::repo_dir::*;
    }
}
