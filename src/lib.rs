//! Purpose: Session, virtual-file, and figure-composition layer over the
//! in-tree Atlas plotting engine.
//! Exports: `core` (session/handle ownership, virtual files, figure state
//! machine, conversion glue, errors), `plotspec` (argument-building option
//! structs), `info_json` (diagnostics).
//! Invariants: A `Session` is single-threaded; use one per worker.
//! Invariants: Figures and virtual files borrow their `Session` and cannot
//! outlive it.
pub mod core;
pub mod info_json;
pub mod plotspec;

pub use self::core::convert::{ConvertRequest, Encoding, convert};
pub use self::core::error::{Error, ErrorKind};
pub use self::core::figure::{Figure, FigureState};
pub use self::core::session::Session;
pub use self::core::vectors::VirtualVectors;
