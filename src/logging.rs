//! Logging macros.
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Otherwise the
//! arguments are borrowed and discarded so the calls cost nothing.

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::defmt::debug!($($arg)*)
    };
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => {
        ::defmt::info!($($arg)*)
    };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::defmt::warn!($($arg)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}
