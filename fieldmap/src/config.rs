//! Container configuration.

use serde::{Deserialize, Serialize};

/// What to do with a record type that has no field to map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPlanPolicy {
    /// Synthesize a mapper that does nothing.
    #[default]
    Allow,
    /// Treat the empty plan as a synthesis failure.
    Reject,
}

/// Configuration for a [`MapperContainer`](crate::MapperContainer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Name used in log fields.
    #[serde(default = "default_name")]
    pub name: String,
    /// Handling of record types with no eligible field.
    #[serde(default)]
    pub empty_plan: EmptyPlanPolicy,
    /// Whether to emit debug events when mappers are synthesized.
    #[serde(default = "default_log_synthesis")]
    pub log_synthesis: bool,
}

fn default_name() -> String {
    "default".to_string()
}

const fn default_log_synthesis() -> bool {
    true
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            empty_plan: EmptyPlanPolicy::default(),
            log_synthesis: default_log_synthesis(),
        }
    }
}

impl ContainerConfig {
    /// Creates the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the empty plan policy.
    #[must_use]
    pub fn with_empty_plan(mut self, policy: EmptyPlanPolicy) -> Self {
        self.empty_plan = policy;
        self
    }

    /// Enables or disables synthesis events.
    #[must_use]
    pub fn with_log_synthesis(mut self, enabled: bool) -> Self {
        self.log_synthesis = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContainerConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.empty_plan, EmptyPlanPolicy::Allow);
        assert!(config.log_synthesis);
    }

    #[test]
    fn test_builder() {
        let config = ContainerConfig::new()
            .with_name("rows")
            .with_empty_plan(EmptyPlanPolicy::Reject)
            .with_log_synthesis(false);

        assert_eq!(config.name, "rows");
        assert_eq!(config.empty_plan, EmptyPlanPolicy::Reject);
        assert!(!config.log_synthesis);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ContainerConfig =
            serde_json::from_value(serde_json::json!({"empty_plan": "reject"})).unwrap();

        assert_eq!(config.name, "default");
        assert_eq!(config.empty_plan, EmptyPlanPolicy::Reject);
        assert!(config.log_synthesis);
    }
}
