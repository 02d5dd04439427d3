//! Settings manager
//!
//! Owns the display settings, persists them, applies them to the document
//! root, and notifies subscribers. There is exactly one per process; the
//! host constructs it once and passes it to whatever renders the settings.
//!
//! Every successful mutation runs the same sequence: update the in-memory
//! record, persist it, re-apply root styling, then notify listeners.

use crate::document::{
    filter_value, DocumentRoot, ANIMATION_DURATION_VAR, TRANSITION_DURATION_VAR,
};
use crate::listeners::{ListenerList, Subscription};
use crate::settings::{AppSettings, SettingsPatch};
use crate::storage::{Storage, StorageError};
use crate::store::PreferenceStore;
use crate::theme::{ColorSchemeProbe, ResolvedTheme, Theme};

pub struct SettingsManager<S, D, C> {
    store: PreferenceStore<AppSettings, S>,
    document: D,
    color_scheme: C,
    listeners: ListenerList<AppSettings>,
}

impl<S, D, C> SettingsManager<S, D, C>
where
    S: Storage,
    D: DocumentRoot,
    C: ColorSchemeProbe,
{
    /// Load persisted settings (merged over defaults) and apply them once.
    pub fn new(storage: S, document: D, color_scheme: C) -> Self {
        let mut manager = Self {
            store: PreferenceStore::load(storage),
            document,
            color_scheme,
            listeners: ListenerList::new(),
        };
        manager.apply_settings();
        manager
    }

    /// Copy of the current settings
    pub fn get_settings(&self) -> AppSettings {
        self.store.get()
    }

    /// Merge `patch` into the settings. Values are stored as given; range
    /// limits belong to the controls that produce them. A NaN or infinite
    /// brightness or contrast is ignored.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        let saved = self.store.update(patch);
        self.commit(saved);
    }

    /// Restore the default settings
    pub fn reset_settings(&mut self) {
        let saved = self.store.reset();
        self.commit(saved);
    }

    /// Register a listener called with the new settings after every
    /// successful mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&AppSettings) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Pretty-printed JSON of the current settings
    pub fn export_settings(&self) -> String {
        serde_json::to_string_pretty(self.store.current()).unwrap_or_default()
    }

    /// Replace the settings with `json` merged over the defaults.
    ///
    /// Returns false, leaving everything untouched, if `json` is not a valid
    /// settings object.
    pub fn import_settings(&mut self, json: &str) -> bool {
        match serde_json::from_str::<AppSettings>(json) {
            Ok(imported) => {
                let saved = self.store.replace(imported);
                self.commit(saved);
                true
            }
            Err(e) => {
                log::error!("settings import failed: {}", e);
                false
            }
        }
    }

    /// Platform light/dark preference, independent of the chosen theme
    pub fn get_system_theme(&self) -> ResolvedTheme {
        self.color_scheme.system_theme()
    }

    /// Theme actually in effect after resolving `auto`
    pub fn effective_theme(&self) -> ResolvedTheme {
        self.store.current().theme.resolve(&self.color_scheme)
    }

    /// Host hook for platform color-scheme changes.
    ///
    /// Only the theme is re-applied; settings and listeners are untouched.
    pub fn color_scheme_changed(&mut self) {
        if self.store.current().theme == Theme::Auto {
            log::debug!("system color scheme changed to {}", self.get_system_theme().as_str());
        }
        self.apply_theme();
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn color_scheme(&self) -> &C {
        &self.color_scheme
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    fn commit(&mut self, saved: Result<(), StorageError>) {
        if let Err(e) = saved {
            log::warn!("settings not persisted: {}", e);
        }
        self.apply_settings();
        let snapshot = self.store.get();
        self.listeners.notify(&snapshot);
    }

    // ========================================================================
    // Root styling
    // ========================================================================

    fn apply_settings(&mut self) {
        self.apply_theme();
        self.apply_font_size();
        self.apply_filter();
        self.apply_animations();
    }

    fn apply_theme(&mut self) {
        let dark = self.effective_theme().is_dark();
        self.document.set_dark(dark);
    }

    fn apply_font_size(&mut self) {
        let px = self.store.current().font_size.root_px();
        self.document.set_font_size(&format!("{}px", px));
    }

    // Brightness and contrast share the one root filter
    fn apply_filter(&mut self) {
        let settings = self.store.current();
        let filter = filter_value(settings.brightness, settings.contrast);
        self.document.set_filter(&filter);
    }

    fn apply_animations(&mut self) {
        if self.store.current().animations {
            self.document.remove_property(ANIMATION_DURATION_VAR);
            self.document.remove_property(TRANSITION_DURATION_VAR);
        } else {
            self.document.set_property(ANIMATION_DURATION_VAR, "0s");
            self.document.set_property(TRANSITION_DURATION_VAR, "0s");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RootStyle;
    use crate::settings::FontSize;
    use crate::storage::MemoryStorage;
    use crate::theme::FixedColorScheme;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type TestManager = SettingsManager<MemoryStorage, RootStyle, FixedColorScheme>;

    fn manager() -> (TestManager, MemoryStorage, FixedColorScheme) {
        let storage = MemoryStorage::new();
        let scheme = FixedColorScheme::default();
        let manager = SettingsManager::new(storage.clone(), RootStyle::new(), scheme.clone());
        (manager, storage, scheme)
    }

    #[test]
    fn test_startup_applies_defaults() {
        let (manager, _, _) = manager();
        let root = manager.document();

        assert!(!root.dark);
        assert_eq!(root.font_size.as_deref(), Some("16px"));
        assert_eq!(root.filter.as_deref(), Some("brightness(1) contrast(1)"));
        assert!(root.properties.is_empty());
    }

    #[test]
    fn test_startup_loads_persisted_settings() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("app-settings", r#"{"theme":"dark","fontSize":"small"}"#)
            .unwrap();

        let manager = SettingsManager::new(storage, RootStyle::new(), FixedColorScheme::default());
        let settings = manager.get_settings();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size, FontSize::Small);
        assert_eq!(settings.refresh_interval, 15);
        assert!(manager.document().dark);
        assert_eq!(manager.document().font_size.as_deref(), Some("14px"));
    }

    #[test]
    fn test_startup_with_malformed_blob_uses_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set_item("app-settings", "{{{").unwrap();

        let manager = SettingsManager::new(storage, RootStyle::new(), FixedColorScheme::default());
        assert_eq!(manager.get_settings(), AppSettings::default());
    }

    #[test]
    fn test_update_overwrites_only_given_fields() {
        let (mut manager, storage, _) = manager();
        manager.update_settings(SettingsPatch { compact_mode: Some(true), ..Default::default() });
        let before = manager.get_settings();

        manager.update_settings(SettingsPatch {
            font_size: Some(FontSize::Large),
            refresh_interval: Some(30),
            ..Default::default()
        });

        let expected = AppSettings { font_size: FontSize::Large, refresh_interval: 30, ..before };
        assert_eq!(manager.get_settings(), expected);

        let blob = storage.get_item("app-settings").unwrap().unwrap();
        let stored: AppSettings = serde_json::from_str(&blob).unwrap();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_get_settings_is_a_copy() {
        let (manager, _, _) = manager();
        let mut copy = manager.get_settings();
        copy.brightness = 0.5;
        assert_eq!(manager.get_settings().brightness, 1.0);
    }

    #[test]
    fn test_out_of_range_values_are_stored_as_given() {
        let (mut manager, _, _) = manager();
        manager.update_settings(SettingsPatch {
            brightness: Some(3.0),
            contrast: Some(0.1),
            refresh_interval: Some(240),
            ..Default::default()
        });

        let settings = manager.get_settings();
        assert_eq!(settings.brightness, 3.0);
        assert_eq!(settings.contrast, 0.1);
        assert_eq!(settings.refresh_interval, 240);
        assert_eq!(manager.document().filter.as_deref(), Some("brightness(3) contrast(0.1)"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (mut manager, _, _) = manager();
        manager.update_settings(SettingsPatch {
            theme: Some(Theme::Dark),
            animations: Some(false),
            brightness: Some(0.7),
            ..Default::default()
        });

        manager.reset_settings();

        assert_eq!(manager.get_settings(), AppSettings::default());
        assert!(manager.document().properties.is_empty());
        assert!(!manager.document().dark);
    }

    #[test]
    fn test_animations_toggle_duration_variables() {
        let (mut manager, _, _) = manager();

        manager.update_settings(SettingsPatch { animations: Some(false), ..Default::default() });
        assert_eq!(manager.document().property(ANIMATION_DURATION_VAR), Some("0s"));
        assert_eq!(manager.document().property(TRANSITION_DURATION_VAR), Some("0s"));

        manager.update_settings(SettingsPatch { animations: Some(true), ..Default::default() });
        assert_eq!(manager.document().property(ANIMATION_DURATION_VAR), None);
        assert_eq!(manager.document().property(TRANSITION_DURATION_VAR), None);
    }

    #[test]
    fn test_auto_theme_follows_color_scheme_changes() {
        let (mut manager, _, scheme) = manager();
        assert!(!manager.document().dark);

        scheme.set(ResolvedTheme::Dark);
        manager.color_scheme_changed();
        assert!(manager.document().dark);
        assert_eq!(manager.get_system_theme(), ResolvedTheme::Dark);

        manager.update_settings(SettingsPatch { theme: Some(Theme::Light), ..Default::default() });
        assert!(!manager.document().dark);

        // Explicit theme wins over the platform
        manager.color_scheme_changed();
        assert!(!manager.document().dark);
        assert_eq!(manager.effective_theme(), ResolvedTheme::Light);
    }

    #[test]
    fn test_export_import_is_idempotent() {
        let (mut manager, _, _) = manager();
        manager.update_settings(SettingsPatch {
            theme: Some(Theme::Dark),
            font_size: Some(FontSize::ExtraLarge),
            contrast: Some(1.4),
            ..Default::default()
        });
        let before = manager.get_settings();

        let exported = manager.export_settings();
        assert!(exported.contains("\n  \"fontSize\": \"extra-large\""));

        assert!(manager.import_settings(&exported));
        assert_eq!(manager.get_settings(), before);
    }

    #[test]
    fn test_long_decimals_survive_export_and_reload() {
        let (mut manager, storage, _) = manager();
        manager.update_settings(SettingsPatch {
            brightness: Some(1.1047802727761427),
            contrast: Some(0.6180339887498949),
            ..Default::default()
        });
        let before = manager.get_settings();

        let exported = manager.export_settings();
        assert!(manager.import_settings(&exported));
        assert_eq!(manager.get_settings(), before);

        let reloaded = SettingsManager::new(storage, RootStyle::new(), FixedColorScheme::default());
        assert_eq!(reloaded.get_settings(), before);
    }

    #[test]
    fn test_non_finite_factor_keeps_other_fields() {
        let (mut manager, storage, _) = manager();
        manager.update_settings(SettingsPatch {
            font_size: Some(FontSize::Large),
            compact_mode: Some(true),
            ..Default::default()
        });
        manager.update_settings(SettingsPatch { brightness: Some(f64::NAN), ..Default::default() });

        assert_eq!(manager.get_settings().brightness, 1.0);
        let exported = manager.export_settings();
        assert!(manager.import_settings(&exported));

        let reloaded = SettingsManager::new(storage, RootStyle::new(), FixedColorScheme::default());
        assert_eq!(reloaded.get_settings().font_size, FontSize::Large);
        assert!(reloaded.get_settings().compact_mode);
    }

    #[test]
    fn test_null_field_in_stored_blob_falls_back_alone() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("app-settings", r#"{"fontSize":"large","brightness":null,"compactMode":true}"#)
            .unwrap();

        let manager = SettingsManager::new(storage, RootStyle::new(), FixedColorScheme::default());
        let settings = manager.get_settings();

        assert_eq!(settings.font_size, FontSize::Large);
        assert!(settings.compact_mode);
        assert_eq!(settings.brightness, 1.0);
    }

    #[test]
    fn test_import_fills_missing_fields_from_defaults() {
        let (mut manager, _, _) = manager();
        manager.update_settings(SettingsPatch { compact_mode: Some(true), ..Default::default() });

        assert!(manager.import_settings(r#"{"theme": "light"}"#));

        let expected = AppSettings { theme: Theme::Light, ..AppSettings::default() };
        assert_eq!(manager.get_settings(), expected);
    }

    #[test]
    fn test_import_rejects_malformed_input() {
        let (mut manager, storage, _) = manager();
        manager.update_settings(SettingsPatch { brightness: Some(1.2), ..Default::default() });
        let before = manager.get_settings();
        let blob_before = storage.get_item("app-settings").unwrap();

        let calls = Rc::new(Cell::new(0));
        {
            let calls = Rc::clone(&calls);
            manager.subscribe(move |_| calls.set(calls.get() + 1));
        }

        assert!(!manager.import_settings("not json"));
        assert!(!manager.import_settings(r#"{"theme": "purple"}"#));
        assert!(!manager.import_settings("[1, 2, 3]"));

        assert_eq!(manager.get_settings(), before);
        assert_eq!(storage.get_item("app-settings").unwrap(), blob_before);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_listeners_receive_every_successful_mutation() {
        let (mut manager, _, _) = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            manager.subscribe(move |s: &AppSettings| seen.borrow_mut().push(s.theme));
        }

        manager.update_settings(SettingsPatch { theme: Some(Theme::Dark), ..Default::default() });
        manager.reset_settings();
        assert!(manager.import_settings(r#"{"theme":"light"}"#));

        assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Auto, Theme::Light]);
    }

    #[test]
    fn test_listener_unsubscribing_itself_does_not_skip_next() {
        let (mut manager, _, _) = manager();
        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));

        let own_handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let first = {
            let own_handle = Rc::clone(&own_handle);
            let first_calls = Rc::clone(&first_calls);
            manager.subscribe(move |_| {
                first_calls.set(first_calls.get() + 1);
                if let Some(sub) = own_handle.borrow().as_ref() {
                    sub.unsubscribe();
                }
            })
        };
        *own_handle.borrow_mut() = Some(first);
        {
            let second_calls = Rc::clone(&second_calls);
            manager.subscribe(move |_| second_calls.set(second_calls.get() + 1));
        }

        manager.update_settings(SettingsPatch { compact_mode: Some(true), ..Default::default() });
        manager.update_settings(SettingsPatch { compact_mode: Some(false), ..Default::default() });

        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 2);
    }
}
