/// Configuration macros for zero-repetition config definitions
///
/// The `config_struct!` macro defines a configuration structure with its
/// defaults embedded next to each field.

/// Define a configuration struct with embedded defaults
///
/// # Example
/// ```
/// tokenpad::config_struct! {
///     pub struct PollConfig {
///         interval_ms: u64 = 500,
///         max_attempts: u32 = 20,
///     }
/// }
///
/// let config = PollConfig::default();
/// assert_eq!(config.max_attempts, 20);
/// ```
///
/// This generates:
/// - A struct with public fields
/// - A Default implementation with the specified values
/// - Serde support with `#[serde(default)]`, so missing keys take the default
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
