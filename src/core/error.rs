use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Init,
    Module,
    ShapeMismatch,
    EmptyInput,
    Finalized,
    EmptyArtifact,
    Convert,
    NotFound,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    module: Option<String>,
    code: Option<i32>,
    path: Option<PathBuf>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            module: None,
            code: None,
            path: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The native return code, for `Module` and `Convert` errors.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The module whose dispatch produced this error, when known.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub(crate) fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(module) = &self.module {
            write!(f, " (module: {module})")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code: {code})")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_context() {
        let err = Error::new(ErrorKind::Module)
            .with_message("no virtual file named '@avec_9'")
            .with_module("plot")
            .with_code(-8);
        let text = err.to_string();
        assert!(text.starts_with("Module: no virtual file named"));
        assert!(text.contains("(module: plot)"));
        assert!(text.contains("(code: -8)"));
    }

    #[test]
    fn source_is_preserved() {
        let io = std::io::Error::from_raw_os_error(libc::ENOENT);
        let err = Error::new(ErrorKind::Io)
            .with_message("cannot open artifact")
            .with_source(io);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn accessors_report_fields() {
        let err = Error::new(ErrorKind::Convert).with_code(-5).with_module("psconvert");
        assert_eq!(err.kind(), ErrorKind::Convert);
        assert_eq!(err.code(), Some(-5));
        assert_eq!(err.module(), Some("psconvert"));
        assert_eq!(err.message(), None);
    }
}
