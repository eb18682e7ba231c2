/// Conditional logging module for development builds
///
/// The `log!` macro provides informational logging that is compiled out
/// in production (release) builds by default. Errors and warnings should continue
/// using `log::error!` and `log::warn!` directly.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use train_conf::logging::log;
///
/// let step_id = "abc";
/// log!("Inserted path step {}", step_id);
/// ```
/// Conditionally log in development builds
///
/// This macro expands to `log::debug!()` in debug builds or when
/// the `console_logging` feature is enabled. In production release builds,
/// it compiles to nothing.
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            $crate::logging::backend::debug!($($arg),+);
        }
    };
}

pub use crate::log;

#[doc(hidden)]
pub use ::log as backend;
