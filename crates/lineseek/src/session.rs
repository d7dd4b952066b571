//! Search sessions over one sorted file
//!
//! A [`SortedFile`] owns the file handle, the codec and the cached bounds.
//! Every query takes `&mut self`: binary search and range scans both move the
//! single read cursor, so one session serves one caller at a time. Open one
//! session per thread with [`SortedFile::reopen`] or share one through
//! [`SharedSortedFile`](crate::SharedSortedFile).

use crate::bounds::Bounds;
use crate::codec::LineCodec;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::reader::LineReader;
use crate::record::Record;
use crate::scan::{RangeScan, locate_scan_start};
use crate::search::binary_search;
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Custom not-found handler
pub type MissHandler<K, V> = Arc<dyn Fn(&K) -> Result<V> + Send + Sync>;

/// What a unique-mode lookup does when the key is absent.
pub enum MissPolicy<K, V> {
    /// Fail with [`SearchError::NotFound`]
    NotFound,
    /// Return a fallback value, e.g. `V::default`
    Fallback(fn() -> V),
    /// Delegate to a caller-supplied handler
    Custom(MissHandler<K, V>),
}

impl<K: fmt::Debug, V> MissPolicy<K, V> {
    fn resolve(&self, key: &K) -> Result<V> {
        match self {
            Self::NotFound => Err(SearchError::NotFound {
                key: format!("{key:?}"),
            }),
            Self::Fallback(fallback) => Ok(fallback()),
            Self::Custom(handler) => handler(key),
        }
    }
}

impl<K, V> Clone for MissPolicy<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::NotFound => Self::NotFound,
            Self::Fallback(fallback) => Self::Fallback(*fallback),
            Self::Custom(handler) => Self::Custom(Arc::clone(handler)),
        }
    }
}

impl<K, V> fmt::Debug for MissPolicy<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NotFound"),
            Self::Fallback(_) => f.write_str("Fallback"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Result of [`SortedFile::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<K, V> {
    /// Unique mode: the single value for the key
    Value(V),
    /// Non-unique mode: every record of the key-run, in file order
    Records(Vec<Record<K, V>>),
}

impl<K, V> Lookup<K, V> {
    /// The unique-mode value, if this is one
    pub const fn value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Records(_) => None,
        }
    }

    /// The non-unique-mode records, if this is one
    pub fn records(&self) -> Option<&[Record<K, V>]> {
        match self {
            Self::Value(_) => None,
            Self::Records(records) => Some(records),
        }
    }
}

/// Cumulative query statistics for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Point lookups served
    pub lookups: u64,
    /// Lookups answered from the cached bounds
    pub bound_hits: u64,
    /// Lines decoded by binary search
    pub probes: u64,
}

/// A read-only session over a sorted key/value text file.
///
/// # Example
///
/// ```
/// use lineseek::{SearchConfig, SeparatedCodec, SortedFile};
/// use std::io::Cursor;
///
/// let data = Cursor::new(b"10:a\n20:b\n30:c\n40:d\n".to_vec());
/// let codec = SeparatedCodec::<u32, String>::default();
/// let mut file = SortedFile::from_reader(data, codec, SearchConfig::default())?;
///
/// assert_eq!(file.find_value(&30)?, "c");
/// assert!(file.find_value(&25).unwrap_err().is_not_found());
///
/// let keys: Vec<u32> = file.between(&15, &35)?.into_iter().map(|r| r.key).collect();
/// assert_eq!(keys, vec![20, 30]);
/// # Ok::<(), lineseek::SearchError>(())
/// ```
pub struct SortedFile<C: LineCodec, R = File> {
    reader: LineReader<R>,
    codec: C,
    config: SearchConfig,
    bounds: Bounds<C::Key, C::Value>,
    on_miss: MissPolicy<C::Key, C::Value>,
    stats: SearchStats,
    path: Option<PathBuf>,
}

impl<C: LineCodec> SortedFile<C, File> {
    /// Open `path` read-only and resolve its bounds.
    ///
    /// The handle is closed again if bounds resolution fails.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Open`] if the file cannot be opened, plus any
    /// error from [`from_reader`](Self::from_reader).
    pub fn open(path: impl AsRef<Path>, codec: C, config: SearchConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SearchError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut session = Self::from_reader(file, codec, config)?;
        debug!("Opened sorted file {}", path.display());
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    /// Open a second handle on the same file.
    ///
    /// The new session shares this one's bounds, configuration and miss
    /// policy without re-reading them, and has its own cursor and
    /// statistics.
    ///
    /// # Errors
    ///
    /// Fails if the session was not created by [`open`](Self::open) or the
    /// file cannot be reopened.
    pub fn reopen(&self) -> Result<Self>
    where
        C: Clone,
    {
        let Some(path) = &self.path else {
            return Err(SearchError::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "session was not opened from a path",
            )));
        };
        let file = File::open(path).map_err(|source| SearchError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            reader: LineReader::new(file)?,
            codec: self.codec.clone(),
            config: self.config,
            bounds: self.bounds.clone(),
            on_miss: self.on_miss.clone(),
            stats: SearchStats::default(),
            path: Some(path.clone()),
        })
    }

    /// Path this session was opened from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl<C: LineCodec, R: Read + Seek> SortedFile<C, R> {
    /// Build a session over any seekable source.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] for an invalid configuration
    /// - [`SearchError::EmptyFile`] if the source has no line
    /// - [`SearchError::Parse`] if the first or last line cannot be decoded
    pub fn from_reader(reader: R, codec: C, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let mut reader = LineReader::new(reader)?;
        let bounds = Bounds::resolve(&mut reader, &codec)?;

        debug!(
            "Session ready: keys {:?}..={:?}, {} searchable bytes, unique={}",
            bounds.min_key, bounds.max_key, bounds.file_size, config.unique
        );

        Ok(Self {
            reader,
            codec,
            config,
            bounds,
            on_miss: MissPolicy::NotFound,
            stats: SearchStats::default(),
            path: None,
        })
    }

    /// Replace the not-found policy.
    #[must_use]
    pub fn with_miss_policy(mut self, policy: MissPolicy<C::Key, C::Value>) -> Self {
        self.on_miss = policy;
        self
    }

    /// Handle unique-mode misses with `handler` instead of failing.
    #[must_use]
    pub fn with_miss_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&C::Key) -> Result<C::Value> + Send + Sync + 'static,
    {
        self.with_miss_policy(MissPolicy::Custom(Arc::new(handler)))
    }

    /// Answer unique-mode misses with `Value::default()`.
    #[must_use]
    pub fn default_on_miss(self) -> Self
    where
        C::Value: Default,
    {
        self.with_miss_policy(MissPolicy::Fallback(<C::Value as Default>::default))
    }

    /// Cached bounds
    pub const fn bounds(&self) -> &Bounds<C::Key, C::Value> {
        &self.bounds
    }

    /// Smallest key in the file
    pub const fn min_key(&self) -> &C::Key {
        &self.bounds.min_key
    }

    /// Largest key in the file
    pub const fn max_key(&self) -> &C::Key {
        &self.bounds.max_key
    }

    /// Session configuration
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Line codec
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Query statistics since the session opened
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Look up `key` according to the configured mode.
    ///
    /// Unique files yield [`Lookup::Value`], non-unique files
    /// [`Lookup::Records`].
    pub fn find(&mut self, key: &C::Key) -> Result<Lookup<C::Key, C::Value>> {
        if self.config.unique {
            self.find_value(key).map(Lookup::Value)
        } else {
            self.find_all(key).map(Lookup::Records)
        }
    }

    /// Point lookup returning the value of the first matching line found.
    ///
    /// Hits on the first or last key are served from the cached bounds and
    /// keys outside them go straight to the miss policy; neither touches the
    /// file.
    ///
    /// # Errors
    ///
    /// Whatever the miss policy returns for absent keys (by default
    /// [`SearchError::NotFound`]), or a parse/I/O error on the search path.
    pub fn find_value(&mut self, key: &C::Key) -> Result<C::Value> {
        self.stats.lookups += 1;

        if *key == self.bounds.min_key {
            self.stats.bound_hits += 1;
            return Ok(self.bounds.min_value.clone());
        }
        if *key == self.bounds.max_key {
            self.stats.bound_hits += 1;
            return Ok(self.bounds.max_value.clone());
        }
        if !self.bounds.contains(key) {
            debug!("Key {key:?} outside file bounds");
            return self.on_miss.resolve(key);
        }

        let probe = binary_search(&mut self.reader, &self.codec, key, self.bounds.file_size)?;
        self.stats.probes += u64::from(probe.iterations);
        debug!(
            "Lookup {key:?}: {} after {} probes",
            if probe.is_hit() { "hit" } else { "miss" },
            probe.iterations
        );

        match probe.value {
            Some(value) => Ok(value),
            None => self.on_miss.resolve(key),
        }
    }

    /// Every record whose key equals `key`, in file order.
    ///
    /// An absent key yields an empty vector; the miss policy does not apply.
    pub fn find_all(&mut self, key: &C::Key) -> Result<Vec<Record<C::Key, C::Value>>> {
        self.stats.lookups += 1;

        if !self.bounds.contains(key) {
            return Ok(Vec::new());
        }

        let seed = if *key == self.bounds.min_key {
            self.stats.bound_hits += 1;
            0
        } else if *key == self.bounds.max_key {
            self.stats.bound_hits += 1;
            self.bounds.file_size
        } else {
            let probe = binary_search(&mut self.reader, &self.codec, key, self.bounds.file_size)?;
            self.stats.probes += u64::from(probe.iterations);
            probe.offset
        };

        self.scan_seeded(key, key, Some(seed))?.collect()
    }

    /// All records with `low <= key <= high`, in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line in the scanned region; use
    /// [`scan`](Self::scan) to skip over them instead.
    pub fn between(
        &mut self,
        low: &C::Key,
        high: &C::Key,
    ) -> Result<Vec<Record<C::Key, C::Value>>> {
        self.scan(low, high)?.collect()
    }

    /// Like [`between`](Self::between), but backtrack from `start` instead of
    /// running a binary search for `low` first.
    ///
    /// Any offset inside or just past the first run of `low` works; offsets
    /// further away only cost extra backtracking.
    pub fn between_from(
        &mut self,
        low: &C::Key,
        high: &C::Key,
        start: u64,
    ) -> Result<Vec<Record<C::Key, C::Value>>> {
        self.scan_seeded(low, high, Some(start))?.collect()
    }

    /// Lazily scan the records with `low <= key <= high`.
    ///
    /// The iterator yields malformed lines as errors and keeps going.
    pub fn scan(&mut self, low: &C::Key, high: &C::Key) -> Result<RangeScan<'_, R, C>> {
        self.scan_seeded(low, high, None)
    }

    fn scan_seeded(
        &mut self,
        low: &C::Key,
        high: &C::Key,
        seed: Option<u64>,
    ) -> Result<RangeScan<'_, R, C>> {
        if !self.bounds.overlaps(low, high) {
            return Ok(RangeScan::empty(
                &mut self.reader,
                &self.codec,
                low.clone(),
                high.clone(),
            ));
        }

        let start = if *low <= self.bounds.min_key {
            0
        } else {
            let seed = match seed {
                Some(seed) => seed,
                None => {
                    let probe =
                        binary_search(&mut self.reader, &self.codec, low, self.bounds.file_size)?;
                    self.stats.probes += u64::from(probe.iterations);
                    probe.offset
                }
            };
            locate_scan_start(
                &mut self.reader,
                &self.codec,
                low,
                seed,
                self.config.backtrack_step,
                self.bounds.file_size,
            )?
        };

        debug!("Scanning {low:?}..={high:?} from offset {start}");
        RangeScan::new(
            &mut self.reader,
            &self.codec,
            low.clone(),
            high.clone(),
            start,
            self.bounds.file_size,
        )
    }

    /// Close the session, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<C: LineCodec, R> fmt::Debug for SortedFile<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedFile")
            .field("path", &self.path)
            .field("min_key", &self.bounds.min_key)
            .field("max_key", &self.bounds.max_key)
            .field("file_size", &self.bounds.file_size)
            .field("config", &self.config)
            .field("on_miss", &self.on_miss)
            .finish_non_exhaustive()
    }
}
