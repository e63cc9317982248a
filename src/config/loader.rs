//! Wizard definition loading.
//!
//! This module provides the [`DefinitionLoader`] type for loading wizard
//! definitions from YAML files, and [`YamlStepResolver`] for resolving a
//! wizard's steps from such a file during a load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{HookError, WizardError, WizardResult};
use crate::hooks::StepResolver;
use crate::models::Step;

use super::types::{WizardDefinition, WizardSettings};

/// Loads and provides access to a wizard definition.
///
/// # Example
///
/// ```no_run
/// use wizard_engine::config::DefinitionLoader;
///
/// let loader = DefinitionLoader::load("./config/onboarding.yaml").unwrap();
/// println!("Loaded wizard: {}", loader.title());
/// ```
#[derive(Debug, Clone)]
pub struct DefinitionLoader {
    definition: WizardDefinition,
}

impl DefinitionLoader {
    /// Loads a definition from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `DefinitionLoader` on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML or a required field is missing
    ///   (`ConfigParseError`)
    /// - Two steps share an id (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> WizardResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| WizardError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Loads a definition without blocking the async runtime.
    pub async fn load_async<P: AsRef<Path>>(path: P) -> WizardResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| WizardError::ConfigNotFound {
                path: path_str.clone(),
            })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses a definition from YAML text; `origin` names the source in errors.
    pub fn from_yaml_str(content: &str, origin: &str) -> WizardResult<Self> {
        let definition: WizardDefinition =
            serde_yaml::from_str(content).map_err(|e| WizardError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = definition.steps.iter().find(|step| !seen.insert(&step.id)) {
            return Err(WizardError::ConfigParseError {
                path: origin.to_string(),
                message: format!("duplicate step id '{}'", duplicate.id),
            });
        }

        debug!(
            origin = %origin,
            steps = definition.steps.len(),
            "Loaded wizard definition"
        );

        Ok(Self { definition })
    }

    /// Returns the underlying definition.
    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    /// Consumes the loader, returning the definition.
    pub fn into_definition(self) -> WizardDefinition {
        self.definition
    }

    /// Returns the wizard title.
    pub fn title(&self) -> &str {
        &self.definition.title
    }

    /// Returns the runtime settings.
    pub fn settings(&self) -> &WizardSettings {
        &self.definition.settings
    }

    /// Returns the extra model seed.
    pub fn extra_model(&self) -> &Value {
        &self.definition.extra_model
    }

    /// Returns the steps in navigation order.
    pub fn steps(&self) -> &[Step] {
        &self.definition.steps
    }

    /// Gets a step definition by id.
    pub fn get_step(&self, id: &str) -> Option<&Step> {
        self.definition.steps.iter().find(|step| step.id == id)
    }
}

/// Resolves a wizard's steps from a YAML definition file.
///
/// The file is read when the wizard loads, not when the resolver is built.
#[derive(Debug, Clone)]
pub struct YamlStepResolver {
    path: PathBuf,
}

impl YamlStepResolver {
    /// Creates a resolver for the definition at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the definition path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StepResolver for YamlStepResolver {
    async fn resolve(&self) -> Result<Vec<Step>, HookError> {
        let loader = DefinitionLoader::load_async(&self.path)
            .await
            .map_err(HookError::other)?;
        Ok(loader.into_definition().steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergeMode;
    use serde_json::json;

    fn config_path() -> &'static str {
        "./config/onboarding.yaml"
    }

    #[test]
    fn test_load_valid_definition() {
        let result = DefinitionLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load definition: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.title(), "Onboarding");
        assert_eq!(loader.extra_model(), &json!({ "source": "web" }));
        assert_eq!(loader.steps().len(), 4);
    }

    #[test]
    fn test_step_fields_loaded() {
        let loader = DefinitionLoader::load(config_path()).unwrap();

        let address = loader.get_step("address").unwrap();
        assert_eq!(address.alias(), Some("contact"));
        assert_eq!(address.merge_mode, MergeMode::Merge);
        assert_eq!(address.kind.as_deref(), Some("address-form"));

        let account = loader.get_step("account").unwrap();
        assert_eq!(
            account.error_message.as_deref(),
            Some("Choose a username and password")
        );
        assert!(!account.visited);
    }

    #[test]
    fn test_settings_override_and_defaults() {
        let loader = DefinitionLoader::load(config_path()).unwrap();
        let messages = &loader.settings().messages;

        assert_eq!(messages.finish_success, "Welcome aboard!");
        assert_eq!(messages.validation_default, "Please correct errors");
        assert_eq!(messages.unexpected_error, "An unexpected error has occurred");
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        match DefinitionLoader::load("/nonexistent/wizard.yaml") {
            Err(WizardError::ConfigNotFound { path }) => {
                assert!(path.contains("wizard.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = DefinitionLoader::from_yaml_str("title: [unclosed", "inline");
        match result {
            Err(WizardError::ConfigParseError { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_title_returns_parse_error() {
        let result = DefinitionLoader::from_yaml_str("steps: []", "inline");
        assert!(matches!(result, Err(WizardError::ConfigParseError { .. })));
    }

    #[test]
    fn test_duplicate_step_ids_rejected() {
        let yaml = r#"
title: Dupes
steps:
  - id: a
    title: A
  - id: a
    title: A again
"#;
        match DefinitionLoader::from_yaml_str(yaml, "inline") {
            Err(WizardError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate step id 'a'"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_definition_uses_defaults() {
        let loader = DefinitionLoader::from_yaml_str("title: Minimal", "inline").unwrap();
        assert!(loader.steps().is_empty());
        assert_eq!(loader.extra_model(), &json!({}));
        assert_eq!(loader.settings(), &WizardSettings::default());
    }

    #[tokio::test]
    async fn test_yaml_step_resolver_reads_steps() {
        let resolver = YamlStepResolver::new(config_path());
        let steps = resolver.resolve().await.unwrap();

        let ids: Vec<&str> = steps.iter().map(|step| step.id.as_str()).collect();
        assert_eq!(ids, vec!["account", "address", "billing", "confirm"]);
    }

    #[tokio::test]
    async fn test_yaml_step_resolver_missing_file_fails() {
        let resolver = YamlStepResolver::new("/nonexistent/wizard.yaml");
        let err = resolver.resolve().await.unwrap_err();
        assert!(err.user_message().is_none());
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
