//! Custom macros for reducing code repetition in catkiosk

/// Log an error and continue execution (non-fatal error handling)
///
/// # Example
/// ```
/// log_and_continue!(self.display.set_power(PowerState::Off).await, "switch display off");
/// ```
#[macro_export]
macro_rules! log_and_continue {
    ($expr:expr, $context:expr) => {
        if let Err(e) = $expr {
            log::error!("Failed to {}: {:#}", $context, e);
        }
    };
}

/// Validate that a string value is one of the allowed variants
///
/// # Example
/// ```
/// validate_enum!(level, "trace", "debug", "info", "warn", "error");
/// ```
#[macro_export]
macro_rules! validate_enum {
    ($value:expr, $($variant:expr),+) => {
        match $value {
            $($variant)|+ => Ok(()),
            _ => anyhow::bail!("Invalid value: {} (expected one of: {})", $value, [$($variant),+].join(", ")),
        }
    };
}
