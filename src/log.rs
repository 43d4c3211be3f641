//! Conditional logging macros.
//!
//! With the `tracing` feature these re-export the `tracing` macros; without
//! it they expand to nothing, so conversion stays allocation-free on the
//! diagnostics side. Warnings are still collected on the
//! [`Conversion`](crate::Conversion) either way.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, trace, warn};
