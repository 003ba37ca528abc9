//! Session environment variables.

use std::collections::BTreeMap;

use xmms_types::config::ShellConfig;

/// Name of the prompt template used while the player is unreachable.
pub const PS1: &str = "PS1";
/// Name of the prompt template used while the player is running.
pub const RUNNING_PS1: &str = "RUNNING_PS1";

/// Variables of one shell session, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the `[env]` table of the configuration.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            vars: config.env.clone(),
        }
    }

    /// Value of `name`, or `None` when unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Remove `name`; returns whether it was set.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_unset() {
        let mut env = Environment::new();
        env.set("A", "1");
        assert_eq!(env.get("A"), Some("1"));
        assert!(env.contains("A"));
        assert!(env.unset("A"));
        assert!(!env.unset("A"));
        assert_eq!(env.get("A"), None);
    }

    #[test]
    fn iterates_sorted() {
        let mut env = Environment::new();
        env.set("b", "2");
        env.set("a", "1");
        env.set("C", "3");
        let names: Vec<&str> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["C", "a", "b"]);
    }

    #[test]
    fn seeded_from_config() {
        let cfg = ShellConfig::parse("[env]\nMUSIC = \"/srv/music\"\n").unwrap();
        let env = Environment::from_config(&cfg);
        assert_eq!(env.get("MUSIC"), Some("/srv/music"));
        assert_eq!(env.len(), 1);
    }
}
