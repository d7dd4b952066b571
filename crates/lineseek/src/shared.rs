//! Thread-safe access to one session
//!
//! Queries on a [`SortedFile`] move its read cursor, so concurrent callers
//! either open their own session or go through this wrapper, which holds the
//! session behind a mutex for the duration of each call.

use crate::bounds::Bounds;
use crate::codec::LineCodec;
use crate::error::Result;
use crate::record::Record;
use crate::session::{Lookup, SearchStats, SortedFile};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{Read, Seek};
use std::sync::Arc;

/// Cloneable handle serializing queries on a shared [`SortedFile`].
pub struct SharedSortedFile<C: LineCodec, R = File> {
    inner: Arc<Mutex<SortedFile<C, R>>>,
}

impl<C: LineCodec, R> Clone for SharedSortedFile<C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: LineCodec, R: Read + Seek> SharedSortedFile<C, R> {
    /// Wrap a session.
    pub fn new(session: SortedFile<C, R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// See [`SortedFile::find`]
    pub fn find(&self, key: &C::Key) -> Result<Lookup<C::Key, C::Value>> {
        self.inner.lock().find(key)
    }

    /// See [`SortedFile::find_value`]
    pub fn find_value(&self, key: &C::Key) -> Result<C::Value> {
        self.inner.lock().find_value(key)
    }

    /// See [`SortedFile::find_all`]
    pub fn find_all(&self, key: &C::Key) -> Result<Vec<Record<C::Key, C::Value>>> {
        self.inner.lock().find_all(key)
    }

    /// See [`SortedFile::between`]
    pub fn between(
        &self,
        low: &C::Key,
        high: &C::Key,
    ) -> Result<Vec<Record<C::Key, C::Value>>> {
        self.inner.lock().between(low, high)
    }

    /// Copy of the cached bounds
    pub fn bounds(&self) -> Bounds<C::Key, C::Value> {
        self.inner.lock().bounds().clone()
    }

    /// Statistics accumulated across all callers
    pub fn stats(&self) -> SearchStats {
        self.inner.lock().stats()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<T>(&self, f: impl FnOnce(&mut SortedFile<C, R>) -> T) -> T {
        f(&mut *self.inner.lock())
    }
}
