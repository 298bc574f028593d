mod client;
mod error;
mod timings;

pub use client::*;
pub use error::*;
pub use timings::*;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    pub name: String,
    pub base_url: String,
    pub path: String,
}

impl Target {
    pub fn new(name: &str, base_url: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.to_string(),
            path: path.to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Fixed set of platforms under test, in the order they are probed within each test point.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    // Restrict to the named platforms. Registry order is kept regardless of the order the names
    // were given in. An empty selection keeps every platform.
    pub fn select(&self, names: &[String]) -> Result<Self, String> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(unknown.clone());
        }
        let targets = self
            .targets
            .iter()
            .filter(|t| names.contains(&t.name))
            .cloned()
            .collect();
        Ok(Self { targets })
    }
}

impl<'a> IntoIterator for &'a TargetRegistry {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Settings;

    fn registry() -> TargetRegistry {
        TargetRegistry::new(Settings::default().targets)
    }

    #[test]
    fn get_returns_azure_target_with_classify_endpoint() {
        let registry = registry();
        let azure = registry.get("Azure").expect("Azure target missing.");
        assert_eq!(
            azure.endpoint(),
            "https://vin-image-processing-workflow.azurewebsites.net/api/classify_image"
        );
    }

    #[test]
    fn get_returns_none_for_unregistered_platform() {
        assert!(registry().get("Lambda").is_none());
    }

    #[test]
    fn endpoint_joins_base_and_path_with_single_slash() {
        let target = Target::new("local", "http://127.0.0.1:8080/", "function/echo");
        assert_eq!(target.endpoint(), "http://127.0.0.1:8080/function/echo");
        let target = Target::new("local", "http://127.0.0.1:8080", "/function/echo");
        assert_eq!(target.endpoint(), "http://127.0.0.1:8080/function/echo");
    }

    #[test]
    fn select_keeps_registry_order() {
        let selected = registry()
            .select(&["OpenFaaS".to_string(), "Azure".to_string()])
            .expect("Failed to select platforms.");
        assert_eq!(selected.names(), vec!["Azure", "OpenFaaS"]);
    }

    #[test]
    fn select_with_no_names_keeps_every_platform() {
        let selected = registry().select(&[]).expect("Failed to select platforms.");
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_rejects_unknown_platform() {
        let err = registry()
            .select(&["Azure".to_string(), "Lambda".to_string()])
            .unwrap_err();
        assert_eq!(err, "Lambda");
    }
}
