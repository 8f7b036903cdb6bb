//! API-level errors. Parse-layer problems never reach here; they are
//! counted in [`crate::ErrorCounters`] and otherwise ignored, since the
//! framing protocol is best-effort at that layer.

use std::fmt;
use std::io;

/// Errors surfaced directly to a caller of the node's public API.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// No free publisher or subscriber slot remained at `advertise`/`subscribe` time.
    RegistryFull,
    /// An outbound payload exceeded the configured maximum.
    PayloadTooLarge { len: usize, max: usize },
    /// `get_param` did not receive a response within its timeout.
    ParamTimeout,
    /// The byte link signalled end of stream; the driver loop must exit.
    LinkClosed,
    /// The underlying transport returned an I/O error other than would-block.
    Io(io::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RegistryFull => write!(f, "registry has no free slot"),
            Error::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds max of {max}")
            }
            Error::ParamTimeout => write!(f, "parameter request timed out"),
            Error::LinkClosed => write!(f, "byte link closed"),
            Error::Io(kind) => write!(f, "io error: {kind:?}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.kind())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
