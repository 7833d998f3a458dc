//! `nova.toml` configuration.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration.

use std::path::Path;

use nova_core::ClassKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod diagnostics;
mod logging;
mod schema;

pub use diagnostics::{ConfigDiagnostics, ConfigValidationError};
pub use logging::{global_log_buffer, init_tracing, LogBuffer, LoggingConfig};
pub use schema::json_schema;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct NovaConfig {
    #[serde(default)]
    pub create_class: CreateClassConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How far the "Create class" quick fix widens an inaccessible class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityPolicy {
    /// Always make the class public.
    #[default]
    Public,
    /// Widen one level at a time and stop at the first accessible level.
    Minimal,
}

/// File template names, per class kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default = "TemplatesConfig::default_class")]
    pub class: String,
    #[serde(default = "TemplatesConfig::default_interface")]
    pub interface: String,
    #[serde(default = "TemplatesConfig::default_enum", rename = "enum")]
    pub enum_: String,
    #[serde(default = "TemplatesConfig::default_annotation")]
    pub annotation: String,
}

impl TemplatesConfig {
    fn default_class() -> String {
        "GroovyClass.groovy".to_owned()
    }

    fn default_interface() -> String {
        "GroovyInterface.groovy".to_owned()
    }

    fn default_enum() -> String {
        "GroovyEnum.groovy".to_owned()
    }

    fn default_annotation() -> String {
        "GroovyAnnotation.groovy".to_owned()
    }

    pub fn get(&self, kind: ClassKind) -> &str {
        match kind {
            ClassKind::Class => &self.class,
            ClassKind::Interface => &self.interface,
            ClassKind::Enum => &self.enum_,
            ClassKind::Annotation => &self.annotation,
        }
    }

    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("class", &self.class),
            ("interface", &self.interface),
            ("enum", &self.enum_),
            ("annotation", &self.annotation),
        ]
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            class: Self::default_class(),
            interface: Self::default_interface(),
            enum_: Self::default_enum(),
            annotation: Self::default_annotation(),
        }
    }
}

/// Settings for the "Create class" quick fix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct CreateClassConfig {
    /// Extension of created files, without the leading dot.
    #[serde(default = "CreateClassConfig::default_file_extension")]
    pub file_extension: String,

    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub visibility: VisibilityPolicy,
}

impl CreateClassConfig {
    fn default_file_extension() -> String {
        "groovy".to_owned()
    }

    pub fn template_for(&self, kind: ClassKind) -> &str {
        self.templates.get(kind)
    }

    /// `<name>.<extension>`, tolerating an extension configured with a leading dot.
    pub fn file_name_for(&self, class_name: &str) -> String {
        let extension = self.file_extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            class_name.to_owned()
        } else {
            format!("{class_name}.{extension}")
        }
    }
}

impl Default for CreateClassConfig {
    fn default() -> Self {
        Self {
            file_extension: Self::default_file_extension(),
            templates: TemplatesConfig::default(),
            visibility: VisibilityPolicy::default(),
        }
    }
}

impl NovaConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from TOML and report unknown keys and invalid values.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<NovaConfig>(text)?;
        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            errors: config.validate(),
        };
        Ok((config, diagnostics))
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self
            .create_class
            .file_extension
            .trim()
            .trim_start_matches('.')
            .is_empty()
        {
            errors.push(ConfigValidationError::InvalidValue {
                toml_path: "create_class.file_extension".to_owned(),
                message: "must not be empty".to_owned(),
            });
        }

        for (key, template) in self.create_class.templates.entries() {
            if template.trim().is_empty() {
                errors.push(ConfigValidationError::InvalidValue {
                    toml_path: format!("create_class.templates.{key}"),
                    message: "template name must not be empty".to_owned(),
                });
            }
        }

        if let Err(message) = self.logging.validate_level() {
            errors.push(ConfigValidationError::InvalidValue {
                toml_path: "logging.level".to_owned(),
                message,
            });
        }

        errors
    }
}
