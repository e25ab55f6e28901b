//! Purpose: Interface glue for turning a finalized artifact into a
//! requested output encoding.
//! Exports: `Encoding`, `ConvertRequest`, `convert`.
//! Role: Stateless request serializer; the conversion itself is the
//! engine's business and its failures are surfaced verbatim.
//! Invariants: The encoding code is passed through unchanged; the core
//! never interprets or retries conversion failures.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};
use crate::core::session::Session;

const CONVERT_MODULE: &str = "psconvert";

/// Single-character output encoding owned by the native ecosystem. `Raw`
/// forwards an arbitrary code unchanged; whether the engine supports it is
/// the engine's call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Encoding {
    Raster,
    Pdf,
    Eps,
    Raw(char),
}

impl Encoding {
    pub fn code(self) -> char {
        match self {
            Encoding::Raster => 'g',
            Encoding::Pdf => 'f',
            Encoding::Eps => 'e',
            Encoding::Raw(code) => code,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    pub encoding: Encoding,
    pub dpi: u32,
    pub tight_bounding_box: bool,
    pub transparent: bool,
}

impl ConvertRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        encoding: Encoding,
    ) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            encoding,
            dpi: 300,
            tight_bounding_box: false,
            transparent: false,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_tight_bounding_box(mut self, tight: bool) -> Self {
        self.tight_bounding_box = tight;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.dpi == 0 {
            return Err(Error::new(ErrorKind::Usage).with_message("dpi must be non-zero"));
        }
        arg_path(&self.source)?;
        arg_path(&self.output)?;
        Ok(())
    }

    fn to_args(&self) -> Result<String, Error> {
        self.validate()?;
        let mut args = format!(
            "{} -T{} -E{} -F{}",
            arg_path(&self.source)?,
            self.encoding.code(),
            self.dpi,
            arg_path(&self.output)?,
        );
        if self.tight_bounding_box {
            args.push_str(" -A");
        }
        if self.transparent {
            args.push_str(" -Q");
        }
        Ok(args)
    }
}

/// Run the conversion. Failures carry the tool's diagnostic text and
/// native code as a `Convert` error; the source artifact is never touched.
pub fn convert(session: &Session, request: &ConvertRequest) -> Result<(), Error> {
    let args = request.to_args()?;
    session
        .call_module(CONVERT_MODULE, &args)
        .map_err(|err| match err.kind() {
            ErrorKind::Module => err.with_kind(ErrorKind::Convert).with_path(&request.source),
            _ => err,
        })
}

/// Module arguments are space-joined tokens, so paths embedded in them must
/// not contain whitespace.
fn arg_path(path: &Path) -> Result<&str, Error> {
    let text = path.to_str().ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("path is not valid UTF-8")
            .with_path(path)
    })?;
    if text.is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("path is empty"));
    }
    if text.chars().any(char::is_whitespace) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("path must not contain whitespace")
            .with_path(path));
    }
    Ok(text)
}
