//! Command-line harness for `lineseek`.
//!
//! The `lineseek` binary is a thin wrapper around this library so the
//! commands can be driven from tests:
//!
//! - `generate`: write a sorted fixture file ([`fixture`])
//! - `find`, `between`, `bounds`: query a file
//! - `verify`: differential check against a linear read ([`verify`])

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod commands;
pub mod config;
pub mod error;
pub mod fixture;
pub mod verify;

pub use commands::run;
pub use config::{Cli, Command, GenerateArgs, KeyType, SessionArgs};
pub use error::{HarnessError, Result};
pub use fixture::{FixtureSpec, FixtureSummary, generate_file, write_fixture};
pub use verify::{Mismatch, VerifyReport, load_reference, verify};
