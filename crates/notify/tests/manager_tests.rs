// Notification manager behaviour against the recording platform.
//
// Run with: cargo test -p kirzach-notify --test manager_tests

use kirzach_config::{MemoryStorage, Storage};
use kirzach_notify::testing::{Delivery, RecordingPlatform};
use kirzach_notify::{
    NotificationManager, NotificationOptions, NotificationPreferences, PermissionState,
    PermissionStatus, PreferencesPatch,
    ALL_CATEGORIES,
};

type Manager = NotificationManager<RecordingPlatform, MemoryStorage>;

fn manager() -> (Manager, RecordingPlatform, MemoryStorage) {
    let platform = RecordingPlatform::new();
    let storage = MemoryStorage::new();
    let manager = NotificationManager::new(platform.clone(), storage.clone());
    (manager, platform, storage)
}

/// Manager with a registration, permission granted and notifications enabled
fn ready_manager() -> (Manager, RecordingPlatform) {
    let (mut manager, platform, _) = manager();
    platform.set_permission(PermissionState::Granted);
    smol::block_on(async {
        assert!(manager.init().await);
        assert!(manager.request_permission().await);
    });
    (manager, platform)
}

// ===========================================================================
// Capability probes and permission
// ===========================================================================

#[test]
fn supported_requires_both_capabilities() {
    let (manager, platform, _) = manager();
    assert!(manager.is_supported());

    platform.set_capabilities(true, false);
    assert!(!manager.is_supported());
    assert_eq!(manager.permission_status(), PermissionStatus::Unsupported);

    platform.set_capabilities(false, true);
    assert!(!manager.is_supported());
}

#[test]
fn permission_status_reflects_platform() {
    let (manager, platform, _) = manager();
    assert_eq!(manager.permission_status(), PermissionStatus::Default);

    platform.set_permission(PermissionState::Denied);
    assert_eq!(manager.permission_status(), PermissionStatus::Denied);
}

#[test]
fn request_permission_already_granted_skips_prompt() {
    let (mut manager, platform, storage) = manager();
    platform.set_permission(PermissionState::Granted);

    assert!(smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 0);
    assert!(manager.get_preferences().enabled);

    let blob = storage.get_item("notification-preferences").unwrap().unwrap();
    assert!(blob.contains("\"enabled\":true"));
}

#[test]
fn request_permission_denied_never_prompts() {
    let (mut manager, platform, _) = manager();
    platform.set_permission(PermissionState::Denied);

    assert!(!smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 0);
    assert!(!manager.get_preferences().enabled);
}

#[test]
fn request_permission_prompts_once_from_default() {
    let (mut manager, platform, _) = manager();

    assert!(smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 1);
    assert!(manager.get_preferences().enabled);

    // Granted now, so a second request does not prompt again
    assert!(smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 1);
}

#[test]
fn request_permission_rejected_prompt() {
    let (mut manager, platform, _) = manager();
    platform.set_prompt_answer(PermissionState::Denied);

    assert!(!smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 1);
    assert!(!manager.get_preferences().enabled);
    assert_eq!(manager.permission_status(), PermissionStatus::Denied);
}

#[test]
fn request_permission_without_notification_capability() {
    let (mut manager, platform, _) = manager();
    platform.set_capabilities(false, true);

    assert!(!smol::block_on(manager.request_permission()));
    assert_eq!(platform.prompts(), 0);
}

// ===========================================================================
// Registration and push subscription
// ===========================================================================

#[test]
fn init_registers_background_script() {
    let (mut manager, platform, _) = manager();

    assert!(smol::block_on(manager.init()));
    assert!(manager.has_registration());
    assert_eq!(platform.registered_scripts(), vec!["/sw.js".to_string()]);
}

#[test]
fn init_failure_leaves_no_registration() {
    let (mut manager, platform, _) = manager();
    platform.fail_register(true);

    assert!(!smol::block_on(manager.init()));
    assert!(!manager.has_registration());
}

#[test]
fn init_without_background_capability() {
    let (mut manager, platform, _) = manager();
    platform.set_capabilities(true, false);

    assert!(!smol::block_on(manager.init()));
    assert!(platform.registered_scripts().is_empty());
}

#[test]
fn subscribe_requires_registration() {
    let (mut manager, platform, _) = manager();

    assert!(!smol::block_on(manager.subscribe_to_notifications()));
    assert!(platform.subscribe_requests().is_empty());
    assert!(manager.push_subscription().is_none());
}

#[test]
fn subscribe_sends_decoded_application_key() {
    let (mut manager, platform, _) = manager();
    smol::block_on(async {
        manager.init().await;
        assert!(manager.subscribe_to_notifications().await);
    });

    let requests = platform.subscribe_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user_visible_only);
    assert_eq!(requests[0].application_server_key, manager.config().application_key_bytes().unwrap());
    assert!(manager.push_subscription().is_some());
}

#[test]
fn subscribe_failure_returns_false() {
    let (mut manager, platform, _) = manager();
    platform.fail_subscribe(true);
    smol::block_on(async {
        manager.init().await;
        assert!(!manager.subscribe_to_notifications().await);
    });
    assert!(manager.push_subscription().is_none());
}

// ===========================================================================
// Dispatch
// ===========================================================================

#[test]
fn show_requires_enabled_preference() {
    let (mut manager, platform) = ready_manager();
    manager.update_preferences(PreferencesPatch { enabled: Some(false), ..Default::default() });

    assert!(!smol::block_on(manager.show_notification("t", NotificationOptions::default())));
    assert!(platform.shown().is_empty());
}

#[test]
fn show_checks_permission_at_call_time() {
    let (manager, platform) = ready_manager();

    // Permission revoked after the user enabled notifications
    platform.set_permission(PermissionState::Denied);
    assert!(!smol::block_on(manager.show_notification("t", NotificationOptions::default())));
    assert!(platform.shown().is_empty());
}

#[test]
fn show_prefers_registration_and_applies_defaults() {
    let (manager, platform) = ready_manager();

    let options = NotificationOptions {
        body: Some("hello".into()),
        tag: Some("custom-tag".into()),
        ..Default::default()
    };
    assert!(smol::block_on(manager.show_notification("Title", options)));

    let shown = platform.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].delivery, Delivery::Registration);
    assert_eq!(shown[0].title, "Title");
    assert_eq!(shown[0].options.body.as_deref(), Some("hello"));
    assert_eq!(shown[0].options.icon.as_deref(), Some("/favicon.svg"));
    assert_eq!(shown[0].options.badge.as_deref(), Some("/favicon.svg"));
    assert_eq!(shown[0].options.tag.as_deref(), Some("custom-tag"));
}

#[test]
fn show_falls_back_to_direct_without_registration() {
    let (mut manager, platform, _) = manager();
    platform.set_permission(PermissionState::Granted);
    assert!(smol::block_on(manager.request_permission()));

    assert!(smol::block_on(manager.show_notification("t", NotificationOptions::default())));

    let shown = platform.shown();
    assert_eq!(shown[0].delivery, Delivery::Direct);
    assert_eq!(shown[0].options.tag.as_deref(), Some("kirzach-news"));
}

#[test]
fn breaking_news_requires_interaction_and_has_two_actions() {
    let (mut manager, platform) = ready_manager();
    // Category filter does not apply to breaking news
    manager.update_preferences(PreferencesPatch { categories: Some(vec![]), ..Default::default() });

    assert!(smol::block_on(manager.simulate_breaking_news()));

    let shown = platform.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].options.require_interaction, Some(true));
    let actions: Vec<&str> = shown[0]
        .options
        .actions
        .as_ref()
        .unwrap()
        .iter()
        .map(|a| a.action.as_str())
        .collect();
    assert_eq!(actions, vec!["view", "dismiss"]);
}

#[test]
fn news_notification_filters_by_category() {
    let (mut manager, platform) = ready_manager();
    manager.update_preferences(PreferencesPatch {
        categories: Some(vec!["Спорт".into()]),
        ..Default::default()
    });

    assert!(!smol::block_on(manager.simulate_news_notification("Экономика", "x")));
    assert!(platform.shown().is_empty());

    assert!(smol::block_on(manager.simulate_news_notification("Спорт", "x")));
    let shown = platform.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "📰 Спорт");
    assert_eq!(shown[0].options.body.as_deref(), Some("x"));
    assert_eq!(shown[0].options.require_interaction, None);
}

#[test]
fn news_notification_sentinel_matches_everything() {
    let (manager, platform) = ready_manager();
    assert_eq!(manager.get_preferences().categories, vec![ALL_CATEGORIES.to_string()]);

    for category in ["Экономика", "Спорт", "Неизвестно"] {
        assert!(smol::block_on(manager.simulate_news_notification(category, "x")));
    }
    assert_eq!(platform.shown().len(), 3);
}

// ===========================================================================
// Preferences
// ===========================================================================

#[test]
fn preferences_persist_across_managers() {
    let (mut manager, _, storage) = manager();
    manager.update_preferences(PreferencesPatch { breaking: Some(false), ..Default::default() });
    manager.toggle_category("Спорт");

    let reloaded = NotificationManager::new(RecordingPlatform::new(), storage);
    let prefs = reloaded.get_preferences();
    assert!(!prefs.breaking);
    assert_eq!(prefs.categories, vec![ALL_CATEGORIES.to_string(), "Спорт".to_string()]);
}

#[test]
fn malformed_stored_preferences_fall_back_to_defaults() {
    let mut storage = MemoryStorage::new();
    storage.set_item("notification-preferences", "{\"categories\": 5}").unwrap();

    let manager = NotificationManager::new(RecordingPlatform::new(), storage);
    assert_eq!(manager.get_preferences(), NotificationPreferences::default());
}

#[test]
fn mistyped_stored_field_keeps_the_others() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item("notification-preferences", "{\"categories\": 5, \"enabled\": true}")
        .unwrap();

    let manager = NotificationManager::new(RecordingPlatform::new(), storage);
    let prefs = manager.get_preferences();
    assert!(prefs.enabled);
    assert_eq!(prefs.categories, vec![ALL_CATEGORIES.to_string()]);
}
