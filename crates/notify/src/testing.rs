//! In-memory platform for tests (enabled by the `testing` feature).
//!
//! `RecordingPlatform` answers capability probes and permission prompts from
//! scripted state and records every notification it is asked to show.
//! Clones share state, so a test can keep a handle after moving the platform
//! into a manager.

use std::cell::RefCell;
use std::rc::Rc;

use crate::options::NotificationOptions;
use crate::platform::{
    BackgroundRegistration, NotificationPlatform, PermissionState, PlatformError,
    PushSubscription, PushSubscriptionOptions,
};

/// How a recorded notification reached the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Registration,
    Direct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    pub title: String,
    pub options: NotificationOptions,
    pub delivery: Delivery,
}

#[derive(Debug)]
struct State {
    notifications: bool,
    background: bool,
    permission: PermissionState,
    prompt_answer: PermissionState,
    prompts: usize,
    fail_register: bool,
    fail_subscribe: bool,
    registered_scripts: Vec<String>,
    subscribe_requests: Vec<PushSubscriptionOptions>,
    shown: Vec<ShownNotification>,
}

#[derive(Debug, Clone)]
pub struct RecordingPlatform {
    state: Rc<RefCell<State>>,
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPlatform {
    /// Fully capable platform, permission not yet requested, prompts granted
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                notifications: true,
                background: true,
                permission: PermissionState::Default,
                prompt_answer: PermissionState::Granted,
                prompts: 0,
                fail_register: false,
                fail_subscribe: false,
                registered_scripts: Vec::new(),
                subscribe_requests: Vec::new(),
                shown: Vec::new(),
            })),
        }
    }

    pub fn set_capabilities(&self, notifications: bool, background: bool) {
        let mut state = self.state.borrow_mut();
        state.notifications = notifications;
        state.background = background;
    }

    pub fn set_permission(&self, permission: PermissionState) {
        self.state.borrow_mut().permission = permission;
    }

    /// What the user answers the next time a prompt is shown
    pub fn set_prompt_answer(&self, answer: PermissionState) {
        self.state.borrow_mut().prompt_answer = answer;
    }

    pub fn fail_register(&self, fail: bool) {
        self.state.borrow_mut().fail_register = fail;
    }

    pub fn fail_subscribe(&self, fail: bool) {
        self.state.borrow_mut().fail_subscribe = fail;
    }

    pub fn prompts(&self) -> usize {
        self.state.borrow().prompts
    }

    pub fn registered_scripts(&self) -> Vec<String> {
        self.state.borrow().registered_scripts.clone()
    }

    pub fn subscribe_requests(&self) -> Vec<PushSubscriptionOptions> {
        self.state.borrow().subscribe_requests.clone()
    }

    pub fn shown(&self) -> Vec<ShownNotification> {
        self.state.borrow().shown.clone()
    }

    fn record(&self, title: &str, options: &NotificationOptions, delivery: Delivery) {
        self.state.borrow_mut().shown.push(ShownNotification {
            title: title.to_string(),
            options: options.clone(),
            delivery,
        });
    }
}

impl NotificationPlatform for RecordingPlatform {
    type Registration = RecordingRegistration;

    fn has_notifications(&self) -> bool {
        self.state.borrow().notifications
    }

    fn has_background_registration(&self) -> bool {
        self.state.borrow().background
    }

    fn permission(&self) -> PermissionState {
        self.state.borrow().permission
    }

    async fn request_permission(&self) -> PermissionState {
        let mut state = self.state.borrow_mut();
        state.prompts += 1;
        state.permission = state.prompt_answer;
        state.permission
    }

    async fn register(&self, script_url: &str) -> Result<RecordingRegistration, PlatformError> {
        let mut state = self.state.borrow_mut();
        if state.fail_register {
            return Err(PlatformError::Failed("registration rejected".to_string()));
        }
        state.registered_scripts.push(script_url.to_string());
        Ok(RecordingRegistration { platform: self.clone() })
    }

    fn show_direct(&self, title: &str, options: &NotificationOptions) -> Result<(), PlatformError> {
        self.record(title, options, Delivery::Direct);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordingRegistration {
    platform: RecordingPlatform,
}

impl BackgroundRegistration for RecordingRegistration {
    async fn subscribe_push(
        &self,
        options: &PushSubscriptionOptions,
    ) -> Result<PushSubscription, PlatformError> {
        let mut state = self.platform.state.borrow_mut();
        state.subscribe_requests.push(options.clone());
        if state.fail_subscribe {
            return Err(PlatformError::Failed("push service unavailable".to_string()));
        }
        Ok(PushSubscription { endpoint: format!("memory://push/{}", state.subscribe_requests.len()) })
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError> {
        self.platform.record(title, options, Delivery::Registration);
        Ok(())
    }
}
