//! Purpose: Accumulate drawing-module output into one artifact, threading
//! the continuation flags that keep a multi-call document well-formed.
//! Exports: `Figure`, `FigureState`.
//! Role: Single writer for one artifact sink; the only component that knows
//! whether a call opens, continues, or terminates the document.
//! Invariants: State changes only through `append`/`finalize`, and only on
//! success.
//! Invariants: A figure dropped while open still terminates its sink, best
//! effort, so the artifact is never left unterminated.
use std::path::{Path, PathBuf};

use crate::core::atlas::{self, PsMode};
use crate::core::error::{Error, ErrorKind};
use crate::core::session::Session;
use crate::core::vectors::VirtualVectors;

/// Terminating module: writes no body of its own and exists to carry the
/// "continue, terminate" flag combination.
const END_MODULE: &str = "end";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FigureState {
    Empty,
    Open,
    Finalized,
}

pub struct Figure<'a> {
    session: &'a Session,
    path: PathBuf,
    state: FigureState,
}

impl<'a> Figure<'a> {
    /// Bind a figure to its artifact sink. Nothing is written until the
    /// first `append`.
    pub fn new(session: &'a Session, path: impl Into<PathBuf>) -> Self {
        Self {
            session,
            path: path.into(),
            state: FigureState::Empty,
        }
    }

    pub fn state(&self) -> FigureState {
        self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one drawing call to the artifact. The first successful append
    /// opens the sink; later ones continue it.
    pub fn append(&mut self, module: &str, args: &str) -> Result<(), Error> {
        self.append_inner(module, args)
    }

    /// Append a drawing call that reads from a registered virtual file; the
    /// generated name is passed as a filename token.
    pub fn append_with_input(
        &mut self,
        module: &str,
        args: &str,
        input: &VirtualVectors<'_>,
    ) -> Result<(), Error> {
        let args = if args.is_empty() {
            input.name().to_string()
        } else {
            format!("{args} {}", input.name())
        };
        self.append_inner(module, &args)
    }

    fn append_inner(&mut self, module: &str, args: &str) -> Result<(), Error> {
        let mode = match self.state {
            FigureState::Empty => PsMode::Open,
            FigureState::Open => PsMode::Continue,
            FigureState::Finalized => {
                return Err(Error::new(ErrorKind::Finalized)
                    .with_message("figure is already finalized")
                    .with_module(module)
                    .with_path(&self.path));
            }
        };
        atlas::call_module(
            self.session.handle()?,
            module,
            args,
            Some((&self.path, mode)),
        )?;
        self.state = FigureState::Open;
        Ok(())
    }

    /// Write the terminating trailer. Finalizing an empty figure is reported
    /// as the empty-artifact condition without any native call; finalizing
    /// twice is a no-op.
    pub fn finalize(&mut self) -> Result<(), Error> {
        match self.state {
            FigureState::Empty => Err(Error::new(ErrorKind::EmptyArtifact)
                .with_message("figure has no content")
                .with_path(&self.path)),
            FigureState::Finalized => {
                tracing::debug!(path = %self.path.display(), "figure already finalized");
                Ok(())
            }
            FigureState::Open => {
                self.terminate()?;
                self.state = FigureState::Finalized;
                Ok(())
            }
        }
    }

    fn terminate(&self) -> Result<(), Error> {
        atlas::call_module(
            self.session.handle()?,
            END_MODULE,
            "",
            Some((&self.path, PsMode::Terminate)),
        )
    }
}

impl Drop for Figure<'_> {
    fn drop(&mut self) {
        if self.state != FigureState::Open {
            return;
        }
        // Leave the sink recoverable even when the caller forgot to finalize.
        match self.terminate() {
            Ok(()) => self.state = FigureState::Finalized,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to terminate figure on drop");
            }
        }
    }
}
