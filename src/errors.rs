// SPDX-License-Identifier: MIT

//! The `errors` module defines `gitignorer`'s [`Error`] type, [`ErrorKind`] with their accompanying trait & method implementations.

use std::error::Error as StdErr;
use std::fmt::{Display, Formatter, Result};

/// `enum` containing the possible kinds of errors for `gitignorer`.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// None of the user requested gitignore fragments could be found.
    MissingTemplates,

    /// User requested stored template not found.
    MissingTemplate,

    /// Template name isn't a plain file name.
    InvalidTemplateName,

    /// The gitignore fragment tree hasn't been downloaded.
    MissingCache,

    /// Fetching the gitignore archive failed.
    Download,

    /// Reading or unpacking the gitignore archive failed.
    Archive,

    /// An archive entry would be written outside of the extraction directory.
    PathTraversal,

    /// Filesystem failure while reading fragments or writing output.
    Io,

    /// Error type for arbitrary (no fixed rule) errors.
    Other,
}

/// `struct` containing `gitignorer`'s error content.
#[derive(Debug)]
pub struct Error {
    /// The kind of error as enumerated in [`ErrorKind`].
    kind: ErrorKind,

    /// Context for the error, e.g. the offending path; the whole message for
    /// [`ErrorKind::Other`].
    message: String,

    /// Optional field containing error resulting in this error.
    error: Option<Box<dyn StdErr + Send + Sync>>,
}

/// Method implementations for [`Error`].
impl Error {
    /// Creates a new [`Error`] from a supplied [`ErrorKind`] & `Into<Box<dyn std::error::Error>>`
    /// (type that can be converted into a boxable error struct).
    pub fn new<T>(error_kind: ErrorKind, error_source: T) -> Self
    where
        T: Into<Box<dyn StdErr + Send + Sync>>,
    {
        Self {
            kind: error_kind,
            message: "".to_owned(),
            error: Some(error_source.into()),
        }
    }

    /// Attaches a context message to the error.
    pub fn context<S: Into<String>>(mut self, message: S) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the error's [`ErrorKind`].
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let message = match self.kind() {
            ErrorKind::MissingTemplates => {
                "None of the requested gitignore template(s) could be found"
            }
            ErrorKind::MissingTemplate => "Template doesn't exist",
            ErrorKind::InvalidTemplateName => {
                "Template names can't contain path separators or be `.`/`..`"
            }
            ErrorKind::MissingCache => {
                "Gitignore templates aren't cached locally, run the update command first"
            }
            ErrorKind::Download => "Failed to download the gitignore archive",
            ErrorKind::Archive => "Failed to extract the gitignore archive",
            ErrorKind::PathTraversal => "Illegal file path in archive",
            ErrorKind::Io => "I/O error",
            ErrorKind::Other => {
                if self.message.is_empty() {
                    "User defined error with no payload encountered"
                } else {
                    return write!(f, "{}", &self.message);
                }
            }
        };
        write!(f, "{}", &message)?;

        if !self.message.is_empty() {
            write!(f, ": {}", &self.message)?;
        }
        if let Some(err) = &self.error {
            write!(f, " ({})", err)?;
        }

        Ok(())
    }
}

impl StdErr for Error {
    fn source(&self) -> Option<&(dyn StdErr + 'static)> {
        match &self.error {
            Some(err) => Some(&**err),
            None => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self {
            kind: error_kind,
            message: "".to_owned(),
            error: None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self {
            kind: ErrorKind::Other,
            message,
            error: None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_message() {
        let err = Error::from(ErrorKind::MissingTemplate).context("JavaEmacs");
        assert_eq!(err.to_string(), "Template doesn't exist: JavaEmacs");
    }

    #[test]
    fn other_uses_payload() {
        let err = Error::from("no data directory".to_owned());
        assert_eq!(err.kind(), &ErrorKind::Other);
        assert_eq!(err.to_string(), "no data directory");
    }

    #[test]
    fn io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from(io).context("Python.gitignore");

        assert_eq!(err.kind(), &ErrorKind::Io);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "I/O error: Python.gitignore (gone)");
    }
}
