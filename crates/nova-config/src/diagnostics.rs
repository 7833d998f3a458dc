use serde::de::DeserializeOwned;

/// Diagnostics produced while loading a Nova config.
///
/// Loading is best effort: callers always get a `NovaConfig` when
/// deserialization succeeds, plus whatever looked wrong about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the TOML that the schema does not know, as full dotted
    /// paths (for example `create_class.templates.klass`).
    pub unknown_keys: Vec<String>,
    pub errors: Vec<ConfigValidationError>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.errors.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    InvalidValue { toml_path: String, message: String },
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(path.to_string().trim_start_matches('.').to_owned());
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}
