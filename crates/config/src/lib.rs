// Preference storage and display settings

pub mod document;
pub mod listeners;
pub mod manager;
pub mod settings;
pub mod storage;
pub mod store;
pub mod theme;

pub use document::{DocumentRoot, RootStyle};
pub use listeners::{ListenerList, Subscription};
pub use manager::SettingsManager;
pub use settings::{AppSettings, FontSize, SettingsPatch};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{Preference, PreferenceStore};
pub use theme::{ColorSchemeProbe, FixedColorScheme, ResolvedTheme, Theme};
