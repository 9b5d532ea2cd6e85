use serde::{Deserialize, Serialize};

/// Per-call or validator-wide option table. Unset fields fall through to the
/// next layer (call → validator defaults → built-ins).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_source: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_on_first_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on_first_error: Option<bool>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(mut self, enabled: bool) -> Self {
        self.cast = Some(enabled);
        self
    }

    pub fn cast_source(mut self, enabled: bool) -> Self {
        self.cast_source = Some(enabled);
        self
    }

    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn apply_default_value(mut self, enabled: bool) -> Self {
        self.apply_default_value = Some(enabled);
        self
    }

    pub fn validate_default_value(mut self, enabled: bool) -> Self {
        self.validate_default_value = Some(enabled);
        self
    }

    pub fn exit_on_first_error(mut self, enabled: bool) -> Self {
        self.exit_on_first_error = Some(enabled);
        self
    }

    pub fn fail_on_first_error(mut self, enabled: bool) -> Self {
        self.fail_on_first_error = Some(enabled);
        self
    }

    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: &ValidationOptions) -> Self {
        Self {
            cast: self.cast.or(fallback.cast),
            cast_source: self.cast_source.or(fallback.cast_source),
            additional_properties: self
                .additional_properties
                .or(fallback.additional_properties),
            apply_default_value: self.apply_default_value.or(fallback.apply_default_value),
            validate_default_value: self
                .validate_default_value
                .or(fallback.validate_default_value),
            exit_on_first_error: self.exit_on_first_error.or(fallback.exit_on_first_error),
            fail_on_first_error: self.fail_on_first_error.or(fallback.fail_on_first_error),
        }
    }

    /// Resolves against the built-in defaults.
    pub fn resolve(&self) -> Settings {
        let builtin = Settings::default();
        Settings {
            cast: self.cast.unwrap_or(builtin.cast),
            cast_source: self.cast_source.unwrap_or(builtin.cast_source),
            additional_properties: self
                .additional_properties
                .unwrap_or(builtin.additional_properties),
            apply_default_value: self
                .apply_default_value
                .unwrap_or(builtin.apply_default_value),
            validate_default_value: self
                .validate_default_value
                .unwrap_or(builtin.validate_default_value),
            exit_on_first_error: self
                .exit_on_first_error
                .unwrap_or(builtin.exit_on_first_error),
            fail_on_first_error: self
                .fail_on_first_error
                .unwrap_or(builtin.fail_on_first_error),
        }
    }
}

/// Fully resolved options used during one evaluation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub cast: bool,
    pub cast_source: bool,
    pub additional_properties: bool,
    pub apply_default_value: bool,
    pub validate_default_value: bool,
    pub exit_on_first_error: bool,
    pub fail_on_first_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cast: false,
            cast_source: false,
            additional_properties: true,
            apply_default_value: false,
            validate_default_value: false,
            exit_on_first_error: false,
            fail_on_first_error: false,
        }
    }
}
