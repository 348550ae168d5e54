//! Serialized access to a [`FileReader`] from several threads

use super::callback::ReadCallbackResult;
use super::file_reader::FileReader;
use crate::vfs::{HostFilesystem, OsFilesystem};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A [`FileReader`] behind a single lock.
///
/// The reader has no internal synchronization, so concurrent import
/// resolution goes through this wrapper: one read at a time, in lock order.
pub struct SharedFileReader<F: HostFilesystem = OsFilesystem> {
    inner: Arc<Mutex<FileReader<F>>>,
}

impl<F: HostFilesystem> Clone for SharedFileReader<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: HostFilesystem> SharedFileReader<F> {
    pub fn new(reader: FileReader<F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reader)),
        }
    }

    pub fn read_file(&self, kind: &str, source_unit_name: &str) -> ReadCallbackResult {
        self.inner.lock().read_file(kind, source_unit_name)
    }

    /// Exclusive access, e.g. to inspect the collected sources
    pub fn lock(&self) -> MutexGuard<'_, FileReader<F>> {
        self.inner.lock()
    }

    /// The reader back, if this is the last handle
    pub fn try_into_inner(self) -> Result<FileReader<F>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<F: HostFilesystem + Send + 'static> SharedFileReader<F> {
    /// A thread-safe read callback sharing this reader
    pub fn callback(&self) -> impl Fn(&str, &str) -> ReadCallbackResult + Send + Sync + 'static {
        let shared = self.clone();
        move |kind, source_unit_name| shared.read_file(kind, source_unit_name)
    }
}
