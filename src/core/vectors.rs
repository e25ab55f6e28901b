//! Purpose: Scoped zero-copy registration of host columns as an engine
//! virtual file.
//! Exports: `VirtualVectors`.
//! Role: Bridge between borrowed `&[f64]` columns and the filename tokens
//! module calls accept.
//! Invariants: The engine holds raw pointers into the borrowed columns; the
//! borrow pins them for the whole scope and no copy is ever made.
//! Invariants: Teardown is one routine, drop-only: close the virtual file,
//! then destroy the container, in that order.
use std::marker::PhantomData;
use std::os::raw::c_int;

use crate::core::atlas;
use crate::core::error::{Error, ErrorKind};
use crate::core::session::Session;

#[derive(Debug)]
pub struct VirtualVectors<'a> {
    session: &'a Session,
    container: c_int,
    name: String,
    ncols: usize,
    nrows: usize,
    /// Pins the column borrows: the engine reads them by pointer until the
    /// scope exits.
    _columns: PhantomData<&'a [f64]>,
}

impl<'a> VirtualVectors<'a> {
    pub(crate) fn register(
        session: &'a Session,
        columns: &[&'a [f64]],
    ) -> Result<Self, Error> {
        if columns.is_empty() {
            return Err(Error::new(ErrorKind::EmptyInput).with_message("no columns supplied"));
        }
        let nrows = columns[0].len();
        if nrows == 0 {
            return Err(Error::new(ErrorKind::EmptyInput).with_message("columns are empty"));
        }
        for (index, column) in columns.iter().enumerate() {
            if column.len() != nrows {
                return Err(Error::new(ErrorKind::ShapeMismatch).with_message(format!(
                    "column {index} has {} rows, expected {nrows}",
                    column.len()
                )));
            }
        }

        let handle = session.handle()?;
        let container = atlas::vectors_create(handle, columns.len(), nrows)?;
        for (index, column) in columns.iter().enumerate() {
            if let Err(err) = atlas::vectors_attach(handle, container, index, column) {
                let _ = atlas::vectors_destroy(handle, container);
                return Err(err);
            }
        }
        // The container must not leak if the virtual file fails to open.
        let name = match atlas::vfile_open(handle, container) {
            Ok(name) => name,
            Err(err) => {
                let _ = atlas::vectors_destroy(handle, container);
                return Err(err);
            }
        };

        tracing::debug!(name = %name, columns = columns.len(), rows = nrows, "registered virtual vectors");
        Ok(Self {
            session,
            container,
            name,
            ncols: columns.len(),
            nrows,
            _columns: PhantomData,
        })
    }

    /// The generated name, substitutable wherever a module accepts a
    /// filename argument.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> usize {
        self.ncols
    }

    pub fn rows(&self) -> usize {
        self.nrows
    }
}

impl Drop for VirtualVectors<'_> {
    fn drop(&mut self) {
        // Close before destroy; the engine refuses the reverse order.
        let Ok(handle) = self.session.handle() else {
            return;
        };
        if let Err(err) = atlas::vfile_close(handle, &self.name) {
            tracing::warn!(name = %self.name, error = %err, "failed to close virtual file");
        }
        if let Err(err) = atlas::vectors_destroy(handle, self.container) {
            tracing::warn!(name = %self.name, error = %err, "failed to release vector container");
        }
    }
}
