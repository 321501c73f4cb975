//! Logging macros
//!
//! Forward to `defmt` on the robot and to `tracing` on the host. With
//! neither feature enabled the arguments are type-checked and dropped.

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);

        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);

        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);

        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);

        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
