//! Lookups and range scans over sorted key/value text files.
//!
//! A text file whose lines are sorted by key already is an index: a binary
//! search over byte offsets finds a key in a logarithmic number of reads,
//! without loading the file or building a separate index. This crate does
//! exactly that for files shaped like
//!
//! ```text
//! 10:value for ten
//! 20:value for twenty
//! 30:value for thirty
//! ```
//!
//! # Architecture
//!
//! - `codec`: [`LineCodec`] trait and the default [`SeparatedCodec`]
//! - `reader`: buffered line access at arbitrary offsets ([`LineReader`])
//! - `bounds`: first/last record resolution ([`Bounds`])
//! - `search`: binary search over byte offsets
//! - `scan`: backtracking range scans for duplicate keys ([`RangeScan`])
//! - `session`: [`SortedFile`], the query entry point
//! - `shared`: [`SharedSortedFile`], a mutex-guarded session
//!
//! # Example
//!
//! ```no_run
//! use lineseek::{Lookup, SearchConfig, SeparatedCodec, SortedFile};
//!
//! let codec = SeparatedCodec::<u64, String>::default();
//! let config = SearchConfig::default().with_unique(false);
//! let mut file = SortedFile::open("prices.txt", codec, config)?;
//!
//! if let Lookup::Records(records) = file.find(&20)? {
//!     for record in records {
//!         println!("{} => {}", record.key, record.value);
//!     }
//! }
//!
//! for record in file.between(&100, &200)? {
//!     println!("{}", record.value);
//! }
//! # Ok::<(), lineseek::SearchError>(())
//! ```
//!
//! # Requirements on the file
//!
//! Lines must be sorted ascending by decoded key and the file must not change
//! while a session is open. Unsorted input produces wrong answers, not
//! panics.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bounds;
pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod record;
pub mod scan;
pub mod search;
pub mod session;
pub mod shared;

pub use bounds::Bounds;
pub use codec::{DEFAULT_SEPARATOR, LineCodec, SeparatedCodec};
pub use config::{DEFAULT_BACKTRACK_STEP, SearchConfig};
pub use error::{CodecError, ConfigError, Result, SearchError};
pub use reader::LineReader;
pub use record::Record;
pub use scan::RangeScan;
pub use search::Probe;
pub use session::{Lookup, MissHandler, MissPolicy, SearchStats, SortedFile};
pub use shared::SharedSortedFile;
