use serde::{Deserialize, Serialize};

use crate::safe::SafeStorage;
use crate::PREFERENCES_KEY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub language: Language,
    pub notifications: bool,
    pub auto_optimize_images: bool,
    pub preferred_categories: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: Language::Ko,
            notifications: true,
            auto_optimize_images: true,
            preferred_categories: Vec::new(),
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub notifications: Option<bool>,
    pub auto_optimize_images: Option<bool>,
    pub preferred_categories: Option<Vec<String>>,
}

impl UserPreferences {
    fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(auto) = patch.auto_optimize_images {
            self.auto_optimize_images = auto;
        }
        if let Some(categories) = patch.preferred_categories {
            self.preferred_categories = categories;
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferencesManager {
    storage: SafeStorage,
}

impl PreferencesManager {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn get(&self) -> UserPreferences {
        self.storage.get(PREFERENCES_KEY, UserPreferences::default())
    }

    /// Merges `patch` into the stored preferences and returns the result.
    pub fn update(&self, patch: PreferencesPatch) -> UserPreferences {
        let mut prefs = self.get();
        prefs.apply(patch);
        self.storage.set(PREFERENCES_KEY, &prefs);
        prefs
    }

    pub fn reset(&self) -> bool {
        self.storage.set(PREFERENCES_KEY, &UserPreferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_stored() {
        let prefs = PreferencesManager::new(SafeStorage::in_memory()).get();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, Language::Ko);
        assert!(prefs.notifications);
        assert!(prefs.auto_optimize_images);
        assert!(prefs.preferred_categories.is_empty());
    }

    #[test]
    fn update_merges_only_given_fields() {
        let manager = PreferencesManager::new(SafeStorage::in_memory());
        manager.update(PreferencesPatch {
            language: Some(Language::En),
            ..PreferencesPatch::default()
        });
        let prefs = manager.update(PreferencesPatch {
            notifications: Some(false),
            ..PreferencesPatch::default()
        });

        assert_eq!(prefs.language, Language::En);
        assert!(!prefs.notifications);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(manager.get(), prefs);
    }

    #[test]
    fn reset_restores_defaults() {
        let manager = PreferencesManager::new(SafeStorage::in_memory());
        manager.update(PreferencesPatch {
            theme: Some(Theme::Light),
            ..PreferencesPatch::default()
        });
        assert!(manager.reset());
        assert_eq!(manager.get(), UserPreferences::default());
    }

    #[test]
    fn stored_json_uses_camel_case() {
        let storage = SafeStorage::in_memory();
        PreferencesManager::new(storage.clone()).reset();
        let raw: serde_json::Value = storage.get_opt(PREFERENCES_KEY).expect("stored");
        assert_eq!(raw["autoOptimizeImages"], true);
        assert_eq!(raw["theme"], "dark");
    }
}
