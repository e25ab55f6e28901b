//! Purpose: Own one engine session handle and serialize module invocations
//! through it.
//! Exports: `Session`.
//! Role: Root resource; figures and virtual files borrow a `Session` and can
//! never outlive it.
//! Invariants: The handle is released exactly once, on `close()` or drop,
//! whichever comes first.
//! Invariants: `Session` is `!Send + !Sync`; concurrent work takes one
//! session per worker.
use std::path::{Path, PathBuf};

use crate::core::atlas;
use crate::core::error::{Error, ErrorKind};
use crate::core::vectors::VirtualVectors;

pub struct Session {
    handle: Option<atlas::Handle>,
    datadir: Option<PathBuf>,
}

impl Session {
    /// Open a session against the engine's built-in defaults.
    pub fn open() -> Result<Self, Error> {
        Self::open_inner(None)
    }

    /// Open a session that reads its runtime data from `dir`. Fails with an
    /// `Init` error when the directory does not exist; the process is fine,
    /// only this session failed to come up.
    pub fn open_with_data_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_inner(Some(dir.as_ref().to_path_buf()))
    }

    fn open_inner(datadir: Option<PathBuf>) -> Result<Self, Error> {
        let handle = atlas::create(datadir.as_deref())?;
        tracing::debug!(datadir = ?datadir, "opened engine session");
        Ok(Self {
            handle: Some(handle),
            datadir,
        })
    }

    /// Dispatch a module by name with a space-joined argument string. The
    /// engine parses the tokens itself; a non-zero return comes back as a
    /// `Module` error carrying the native code and diagnostic.
    pub fn call_module(&self, name: &str, args: &str) -> Result<(), Error> {
        atlas::call_module(self.handle()?, name, args, None)
    }

    /// Like `call_module`, with a registered virtual file supplied as the
    /// input filename token.
    pub fn call_module_with_input(
        &self,
        name: &str,
        args: &str,
        input: &VirtualVectors<'_>,
    ) -> Result<(), Error> {
        let args = if args.is_empty() {
            input.name().to_string()
        } else {
            format!("{args} {}", input.name())
        };
        atlas::call_module(self.handle()?, name, &args, None)
    }

    /// Register equal-length columns as a zero-copy virtual file, usable as
    /// a filename token for the duration of the returned scope.
    pub fn register_vectors<'a>(
        &'a self,
        columns: &[&'a [f64]],
    ) -> Result<VirtualVectors<'a>, Error> {
        VirtualVectors::register(self, columns)
    }

    /// Release the engine handle. Idempotent: a second `close()` is a no-op.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!("closed engine session");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Number of currently open virtual files, for leak diagnostics.
    pub fn open_virtual_files(&self) -> usize {
        match &self.handle {
            Some(handle) => atlas::vfile_count(handle),
            None => 0,
        }
    }

    /// Read back a session default mutated by prior module calls (for
    /// example `"region"`). `Ok(None)` means the default is unset.
    pub fn default_value(&self, key: &str) -> Result<Option<String>, Error> {
        atlas::get_default(self.handle()?, key)
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.datadir.as_deref()
    }

    pub fn engine_version() -> &'static str {
        atlas::version()
    }

    pub(crate) fn handle(&self) -> Result<&atlas::Handle, Error> {
        self.handle
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("session is closed"))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("closed", &self.is_closed())
            .field("datadir", &self.datadir)
            .finish()
    }
}
