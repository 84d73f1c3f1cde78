use core::fmt;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned when constructing a map.
///
/// A missing key is not an error: lookups, inserts and removals report it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An argument was outside the range the map accepts.
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{}`: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for Error {}
