/// Development console logging
///
/// The `log!` macro writes informational messages to the browser console and
/// compiles to nothing in release builds unless the `console_logging` feature
/// is enabled. Failures that must always surface use `leptos::logging::error!`.
///
/// ```rust,ignore
/// use crate::logging::log;
///
/// log!("Tick {} published {} trains", tick, count);
/// ```
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {{
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            web_sys::console::log_1(&format!($($arg),+).into());
        }
        #[cfg(not(any(debug_assertions, feature = "console_logging")))]
        {
            let _ = ($(&$arg),+);
        }
    }};
}

pub(crate) use log;
