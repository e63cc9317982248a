//! Wizard definition loading and runtime settings.
//!
//! This module provides functionality to load wizard definitions from YAML
//! files: the title, the extra model seed, user-facing messages and the
//! ordered step list.
//!
//! # Example
//!
//! ```no_run
//! use wizard_engine::config::DefinitionLoader;
//!
//! let loader = DefinitionLoader::load("./config/onboarding.yaml").unwrap();
//! println!("Loaded wizard: {} ({} steps)", loader.title(), loader.steps().len());
//! ```

mod loader;
mod types;

pub use loader::{DefinitionLoader, YamlStepResolver};
pub use types::{Messages, WizardDefinition, WizardSettings};
