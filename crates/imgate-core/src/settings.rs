//! Operator settings lookup.

/// Read-only access to operator-configured properties.
///
/// Sessions consult this for behaviour the operator must opt into, such as
/// publishing status text on the user's behalf.
pub trait SettingsService: Send + Sync {
    /// Returns the boolean property `key`, or `default` when unset or not a
    /// boolean.
    fn bool_property(&self, key: &str, default: bool) -> bool;
}

/// Settings with nothing configured; every lookup yields its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSettings;

impl SettingsService for DefaultSettings {
    fn bool_property(&self, _key: &str, default: bool) -> bool {
        default
    }
}
