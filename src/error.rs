use std::fmt;

/// Errors reported by the driver.
///
/// `E` is the error type of the [`Interface`](crate::Interface) in use. It is
/// passed through untouched, the driver never inspects or retries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// An argument was out of range.
    Param,
    /// The bus transport reported a failure.
    Interface(E),
    /// The chip at the address is not a BME280. Holds the ID that was read.
    Id(u8),
    /// `init` has not completed successfully yet.
    NotInitialized,
    /// The sensor is in the wrong mode for the requested operation.
    Condition,
    /// A forced measurement did not finish in time.
    Timeout,
}

impl<E> From<ParamError> for Error<E> {
    fn from(_: ParamError) -> Self {
        Error::Param
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Param => write!(f, "parameter out of range"),
            Error::Interface(e) => write!(f, "interface error: {}", e),
            Error::Id(id) => write!(f, "unexpected chip id 0x{:02X}", id),
            Error::NotInitialized => write!(f, "sensor not initialized"),
            Error::Condition => write!(f, "operation not allowed in the current mode"),
            Error::Timeout => write!(f, "measurement timed out"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

/// A raw register value or user-supplied number does not map to a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamError;

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "parameter out of range")
    }
}

impl std::error::Error for ParamError {}

/// Result type alias for driver operations.
pub type Result<T, E> = core::result::Result<T, Error<E>>;
