use crate::tokenize::ModelInfo;

/// Which listed models are checked for the next calculation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSelection {
    models: Vec<ModelInfo>,
    selected: Vec<String>,
}

impl ModelSelection {
    /// Every available model starts selected.
    pub fn new(models: Vec<ModelInfo>) -> Self {
        let selected = models
            .iter()
            .filter(|m| m.available)
            .map(|m| m.key.clone())
            .collect();
        Self { models, selected }
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    /// Selected keys in listing order.
    pub fn selected(&self) -> Vec<String> {
        self.models
            .iter()
            .filter(|m| self.is_selected(&m.key))
            .map(|m| m.key.clone())
            .collect()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.models.iter().any(|m| m.key == key && m.available)
    }

    pub fn select_all(&mut self) {
        self.selected = self
            .models
            .iter()
            .filter(|m| m.available)
            .map(|m| m.key.clone())
            .collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Replaces the selection with the available keys from `keys`.
    /// Returns the keys that were ignored.
    pub fn select_only(&mut self, keys: &[String]) -> Vec<String> {
        let (usable, ignored): (Vec<String>, Vec<String>) =
            keys.iter().cloned().partition(|k| self.is_available(k));
        self.selected = usable;
        ignored
    }

    /// Flips one model. Returns false when the model is not available.
    pub fn toggle(&mut self, key: &str) -> bool {
        if !self.is_available(key) {
            return false;
        }
        match self.selected.iter().position(|k| k == key) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(key.to_string()),
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// One-line feedback shown under the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}
