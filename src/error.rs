//! Crate-wide error type
//!
//! Every variant says *where* things went wrong. Lifecycle misuse is not an
//! error here: those paths log a warning and do nothing.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// SDL context or subsystem could not be initialized
    Platform(String),
    /// Native window allocation failed
    WindowCreate(String),
    /// Backing texture could not be (re)built or written
    Backing(String),
    /// Blitting the backing store to the window failed
    Present(String),
    /// Reading, writing or parsing a configuration file failed
    Config(String),
    /// Pixel storage for the requested size could not be allocated
    Allocation { width: u32, height: u32 },
    /// Buffer length no longer matches width * height
    BufferMismatch { expected: usize, actual: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Platform(s) => write!(f, "platform init error: {s}"),
            Error::WindowCreate(s) => write!(f, "window creation error: {s}"),
            Error::Backing(s) => write!(f, "backing store error: {s}"),
            Error::Present(s) => write!(f, "present error: {s}"),
            Error::Config(s) => write!(f, "config error: {s}"),
            Error::Allocation { width, height } => {
                write!(f, "cannot allocate a {width}x{height} pixel buffer")
            },
            Error::BufferMismatch { expected, actual } => write!(
                f,
                "pixel buffer holds {actual} pixels, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failing_stage() {
        let e = Error::Allocation {
            width: 4,
            height: 2,
        };
        assert_eq!(e.to_string(), "cannot allocate a 4x2 pixel buffer");

        let e = Error::WindowCreate("no video device".into());
        assert!(e.to_string().contains("no video device"));
    }
}
