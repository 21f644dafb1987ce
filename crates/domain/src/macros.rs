//! Macro for implementing Display and FromStr for keyword enums
//!
//! Settings keys and occupation states are spelled out in configuration files,
//! CLI arguments and log lines. This macro keeps the string form and the
//! parser in one place.
//!
//! # Example
//!
//! ```rust
//! use focusguard_domain::impl_domain_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Trigger {
//!     Startup,
//!     Hourly,
//!     Manual,
//! }
//!
//! impl_domain_keyword_conversions!(Trigger {
//!     Startup => "startup",
//!     Hourly => "hourly",
//!     Manual => "manual",
//! });
//! ```

/// Implements Display and FromStr traits for keyword enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their keyword
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
