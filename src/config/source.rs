use crate::constants::{COMMAND_LINE_SOURCE, NON_OPTION_ARGS, SYSTEM_ENVIRONMENT_SOURCE};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A named layer of configuration properties
pub trait PropertySource: Send + Sync + Debug {
    /// Name identifying this layer inside an [`Environment`](super::Environment)
    fn name(&self) -> &str;

    /// Look up a property value
    fn get(&self, key: &str) -> Option<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys exposed by this layer
    fn keys(&self) -> Vec<String>;
}

/// Property source backed by an in-memory map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapPropertySource {
    name: String,
    properties: BTreeMap<String, String>,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::new(name, properties)
    }

    /// Parse command line arguments.
    ///
    /// `--key=value` becomes a property, `--flag` becomes `flag=true` and a
    /// repeated option joins its values with commas. Everything else is kept
    /// in order under `nonOptionArgs`.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties: BTreeMap<String, String> = BTreeMap::new();
        let mut non_options: Vec<String> = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            let option = match arg.strip_prefix("--") {
                Some(option) if !option.is_empty() => option,
                _ => {
                    non_options.push(arg.to_string());
                    continue;
                }
            };

            let (key, value) = match option.split_once('=') {
                Some((key, value)) => (key.trim(), value),
                None => (option.trim(), "true"),
            };
            if key.is_empty() {
                non_options.push(arg.to_string());
                continue;
            }

            properties
                .entry(key.to_string())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        if !non_options.is_empty() {
            properties.insert(NON_OPTION_ARGS.to_string(), non_options.join(","));
        }

        Self::new(COMMAND_LINE_SOURCE, properties)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }
}

/// OS environment variables with relaxed key binding.
///
/// A lookup of `app.profiles.active` also matches `app_profiles_active`,
/// `APP_PROFILES_ACTIVE` and, for dashed keys, the variant with dashes removed.
#[derive(Debug, Clone)]
pub struct SystemEnvironmentSource {
    variables: BTreeMap<String, String>,
}

impl SystemEnvironmentSource {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            variables: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    fn candidates(key: &str) -> [String; 4] {
        let underscored = key.replace('.', "_");
        [
            key.to_string(),
            underscored.clone(),
            underscored.replace('-', "_").to_uppercase(),
            underscored.replace('-', "").to_uppercase(),
        ]
    }
}

impl PropertySource for SystemEnvironmentSource {
    fn name(&self) -> &str {
        SYSTEM_ENVIRONMENT_SOURCE
    }

    fn get(&self, key: &str) -> Option<String> {
        Self::candidates(key)
            .iter()
            .find_map(|candidate| self.variables.get(candidate).cloned())
    }

    fn keys(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }
}
