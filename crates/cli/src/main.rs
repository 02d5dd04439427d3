// KirzachLive CLI - display settings and notification preferences, headless
// Reads and writes the same storage blobs as the reader itself

mod config;
mod exit_codes;
mod terminal;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use kirzach_config::settings::{clamp_refresh_interval, clamp_visual_factor};
use kirzach_config::{
    FileStorage, FixedColorScheme, FontSize, ResolvedTheme, RootStyle, SettingsManager,
    SettingsPatch, Theme,
};
use kirzach_notify::{
    NotificationData, NotificationManager, PermissionStatus,
    PreferencesPatch, FEED_CATEGORIES,
};
use kirzach_worker::{
    handle_push, notification_click, BackgroundWorker, DiskCache, HttpNetwork, ShownNotification,
    CACHE_NAME,
};

use config::CliConfig;
use exit_codes::{
    EXIT_ERROR, EXIT_IMPORT_REJECTED, EXIT_IO, EXIT_NOTIFY_DENIED, EXIT_NOTIFY_SUBSCRIBE,
    EXIT_NOTIFY_SUPPRESSED, EXIT_NOTIFY_UNSUPPORTED, EXIT_PRECACHE, EXIT_PUSH, EXIT_SUCCESS,
    EXIT_USAGE,
};
use terminal::{stored_subscription, TerminalClients, TerminalPlatform, TerminalSurface};

type Settings = SettingsManager<FileStorage, RootStyle, FixedColorScheme>;
type Notifications = NotificationManager<TerminalPlatform, FileStorage>;

#[derive(Parser)]
#[command(name = "kirzach")]
#[command(about = "KirzachLive reader preferences (display, notifications, offline cache)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Storage file holding the preference blobs
    #[arg(long, global = true, env = "KIRZACH_STORAGE")]
    storage: Option<PathBuf>,

    /// Config file (default: ~/.config/kirzach-live/config.toml)
    #[arg(long, global = true, env = "KIRZACH_CONFIG")]
    config: Option<PathBuf>,

    /// Platform color scheme used to resolve the `auto` theme
    #[arg(long, global = true, env = "KIRZACH_COLOR_SCHEME")]
    color_scheme: Option<SchemeArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Notification preferences and permission
    #[command(subcommand)]
    Notify(NotifyCommands),

    /// Background worker: offline cache and push handling
    #[command(subcommand)]
    Worker(WorkerCommands),
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings as JSON
    Show,

    /// Change one or more settings
    #[command(after_help = "\
Examples:
  kirzach settings set --theme dark --font-size large
  kirzach settings set --brightness 1.2 --contrast 0.9
  kirzach settings set --animations false --refresh-interval 30")]
    Set {
        #[arg(long)]
        theme: Option<ThemeArg>,
        #[arg(long)]
        font_size: Option<FontSizeArg>,
        /// 0.5 - 1.5
        #[arg(long)]
        brightness: Option<f64>,
        /// 0.5 - 1.5
        #[arg(long)]
        contrast: Option<f64>,
        #[arg(long)]
        compact_mode: Option<bool>,
        #[arg(long)]
        animations: Option<bool>,
        #[arg(long)]
        auto_refresh: Option<bool>,
        /// Minutes, 1 - 60
        #[arg(long)]
        refresh_interval: Option<u32>,
    },

    /// Restore default settings
    Reset,

    /// Export settings as pretty JSON
    Export {
        /// Write to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Import settings from a JSON file (`-` for stdin)
    Import { file: PathBuf },

    /// Print the root style the settings produce
    Css,

    /// Print the platform color scheme (light or dark)
    SystemTheme,
}

#[derive(Subcommand)]
enum NotifyCommands {
    /// Show support, permission and preferences
    Status {
        #[arg(long)]
        json: bool,
    },

    /// Update notification preferences
    Prefs {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        #[arg(long)]
        breaking: Option<bool>,
        /// Replace the followed categories (comma separated)
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
    },

    /// Follow or unfollow a category
    Toggle { category: String },

    /// Ask for notification permission (prompts on the terminal)
    Request,

    /// Create a push subscription
    Subscribe,

    /// Send the sample breaking-news notification
    Breaking,

    /// Send a sample news notification for a category
    News { category: String, title: String },
}

#[derive(Subcommand)]
enum WorkerCommands {
    /// Download the app shell into the offline cache
    Precache {
        /// Site origin, e.g. http://localhost:5173
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Display a push message the way the background worker does
    Push { message: Option<String> },

    /// Simulate a click on a displayed notification
    Click {
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Auto,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Auto => Theme::Auto,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FontSizeArg {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl From<FontSizeArg> for FontSize {
    fn from(arg: FontSizeArg) -> Self {
        match arg {
            FontSizeArg::Small => FontSize::Small,
            FontSizeArg::Medium => FontSize::Medium,
            FontSizeArg::Large => FontSize::Large,
            FontSizeArg::ExtraLarge => FontSize::ExtraLarge,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Light,
    Dark,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("KIRZACH_COMMIT"), ")",
        "\ntarget:  ", env!("KIRZACH_TARGET"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Everything a command needs, built once per invocation
struct Context {
    config: CliConfig,
    storage: FileStorage,
    color_scheme: FixedColorScheme,
}

impl Context {
    fn new(cli: &Cli) -> Self {
        let config = CliConfig::load(cli.config.as_deref());

        let storage_path = cli
            .storage
            .clone()
            .or_else(|| config.storage.clone())
            .unwrap_or_else(FileStorage::default_path);

        let scheme = match cli.color_scheme {
            Some(SchemeArg::Dark) => ResolvedTheme::Dark,
            Some(SchemeArg::Light) => ResolvedTheme::Light,
            None => config.color_scheme.unwrap_or_default(),
        };

        Self {
            storage: FileStorage::new(storage_path),
            color_scheme: FixedColorScheme::new(scheme),
            config,
        }
    }

    fn settings(&self) -> Settings {
        SettingsManager::new(self.storage.clone(), RootStyle::new(), self.color_scheme.clone())
    }

    /// Notification manager with its background registration in place
    fn notifications(&self) -> Notifications {
        let mut manager = NotificationManager::with_config(
            TerminalPlatform::new(self.storage.clone()),
            self.storage.clone(),
            self.config.notifications.clone(),
        );
        smol::block_on(manager.init());
        manager
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = Context::new(&cli);

    let result = match cli.command {
        Commands::Settings(cmd) => cmd_settings(&ctx, cmd),
        Commands::Notify(cmd) => cmd_notify(&ctx, cmd),
        Commands::Worker(cmd) => cmd_worker(&ctx, cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// settings
// ============================================================================

fn cmd_settings(ctx: &Context, cmd: SettingsCommands) -> Result<(), CliError> {
    let mut settings = ctx.settings();

    match cmd {
        SettingsCommands::Show => {
            println!("{}", settings.export_settings());
        }
        SettingsCommands::Set {
            theme,
            font_size,
            brightness,
            contrast,
            compact_mode,
            animations,
            auto_refresh,
            refresh_interval,
        } => {
            let patch = SettingsPatch {
                theme: theme.map(Theme::from),
                font_size: font_size.map(FontSize::from),
                brightness: brightness.map(|v| clamp_slider("brightness", v)),
                contrast: contrast.map(|v| clamp_slider("contrast", v)),
                compact_mode,
                animations,
                auto_refresh,
                refresh_interval: refresh_interval.map(|v| {
                    let clamped = clamp_refresh_interval(v);
                    if clamped != v {
                        eprintln!("note: refresh-interval clamped to {}", clamped);
                    }
                    clamped
                }),
            };
            if patch.is_empty() {
                return Err(CliError::usage("nothing to set")
                    .with_hint("see `kirzach settings set --help`"));
            }
            settings.update_settings(patch);
            println!("{}", settings.export_settings());
        }
        SettingsCommands::Reset => {
            settings.reset_settings();
            println!("{}", settings.export_settings());
        }
        SettingsCommands::Export { output } => {
            let json = settings.export_settings();
            match output {
                Some(path) => fs::write(&path, format!("{}\n", json))
                    .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?,
                None => println!("{}", json),
            }
        }
        SettingsCommands::Import { file } => {
            let json = read_input(&file)?;
            if !settings.import_settings(&json) {
                return Err(CliError::new(
                    EXIT_IMPORT_REJECTED,
                    format!("{} is not a valid settings export", file.display()),
                )
                .with_hint("settings were left unchanged"));
            }
            println!("{}", settings.export_settings());
        }
        SettingsCommands::Css => {
            println!("{}", settings.document().to_css());
        }
        SettingsCommands::SystemTheme => {
            println!("{}", settings.get_system_theme().as_str());
        }
    }
    Ok(())
}

fn clamp_slider(name: &str, value: f64) -> f64 {
    let clamped = clamp_visual_factor(value);
    if clamped != value {
        eprintln!("note: {} clamped to {}", name, clamped);
    }
    clamped
}

fn read_input(file: &Path) -> Result<String, CliError> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::io(format!("stdin: {}", e)))?;
        return Ok(buf);
    }
    fs::read_to_string(file).map_err(|e| CliError::usage(format!("{}: {}", file.display(), e)))
}

// ============================================================================
// notify
// ============================================================================

fn cmd_notify(ctx: &Context, cmd: NotifyCommands) -> Result<(), CliError> {
    let mut notifications = ctx.notifications();

    match cmd {
        NotifyCommands::Status { json } => {
            let status = notifications.permission_status();
            let prefs = notifications.get_preferences();
            let subscription = stored_subscription(&ctx.storage);

            if json {
                let value = serde_json::json!({
                    "supported": notifications.is_supported(),
                    "permission": status,
                    "preferences": prefs,
                    "subscription": subscription,
                });
                let out = serde_json::to_string_pretty(&value)
                    .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
                println!("{}", out);
            } else {
                println!("supported:    {}", notifications.is_supported());
                println!("permission:   {}", status.as_str());
                println!("enabled:      {}", prefs.enabled);
                println!("breaking:     {}", prefs.breaking);
                println!("categories:   {}", prefs.categories.join(", "));
                if let Some(sub) = subscription {
                    println!("subscription: {}", sub.endpoint);
                }
            }
        }
        NotifyCommands::Prefs { enable, disable, breaking, categories } => {
            let enabled = match (enable, disable) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            if let Some(categories) = &categories {
                warn_unknown_categories(categories);
            }
            notifications.update_preferences(PreferencesPatch { breaking, categories, enabled });
            print_preferences(&notifications);
        }
        NotifyCommands::Toggle { category } => {
            warn_unknown_categories(std::slice::from_ref(&category));
            notifications.toggle_category(&category);
            print_preferences(&notifications);
        }
        NotifyCommands::Request => {
            match notifications.permission_status() {
                PermissionStatus::Unsupported => {
                    return Err(CliError::new(EXIT_NOTIFY_UNSUPPORTED, "notifications are not supported"));
                }
                PermissionStatus::Denied => {
                    return Err(CliError::new(EXIT_NOTIFY_DENIED, "notification permission was denied")
                        .with_hint("permission is not asked again; clear it from the storage file to retry"));
                }
                _ => {}
            }
            if !smol::block_on(notifications.request_permission()) {
                return Err(CliError::new(EXIT_NOTIFY_DENIED, "notification permission not granted"));
            }
            if !smol::block_on(notifications.subscribe_to_notifications()) {
                eprintln!("note: push subscription could not be created");
            }
            println!("notifications enabled");
        }
        NotifyCommands::Subscribe => {
            if !smol::block_on(notifications.subscribe_to_notifications()) {
                return Err(CliError::new(EXIT_NOTIFY_SUBSCRIBE, "push subscription failed")
                    .with_hint("run with RUST_LOG=error for details"));
            }
            if let Some(sub) = notifications.push_subscription() {
                println!("{}", sub.endpoint);
            }
        }
        NotifyCommands::Breaking => {
            if !smol::block_on(notifications.simulate_breaking_news()) {
                return Err(suppressed(&notifications));
            }
        }
        NotifyCommands::News { category, title } => {
            if !smol::block_on(notifications.simulate_news_notification(&category, &title)) {
                return Err(suppressed(&notifications));
            }
        }
    }
    Ok(())
}

fn print_preferences(notifications: &Notifications) {
    let prefs = notifications.get_preferences();
    println!("{}", serde_json::to_string_pretty(&prefs).unwrap_or_default());
}

fn warn_unknown_categories(categories: &[String]) {
    for category in categories {
        let known = category == kirzach_notify::ALL_CATEGORIES
            || FEED_CATEGORIES.contains(&category.as_str());
        if !known {
            eprintln!("note: '{}' is not a feed category ({})", category, FEED_CATEGORIES.join(", "));
        }
    }
}

fn suppressed(notifications: &Notifications) -> CliError {
    let err = CliError::new(EXIT_NOTIFY_SUPPRESSED, "notification not shown");
    if notifications.permission_status() != PermissionStatus::Granted {
        err.with_hint("run `kirzach notify request` first")
    } else if !notifications.get_preferences().enabled {
        err.with_hint("notifications are disabled; run `kirzach notify prefs --enable`")
    } else {
        err.with_hint("category is not followed; see `kirzach notify status`")
    }
}

// ============================================================================
// worker
// ============================================================================

struct ClickedNotification {
    data: Option<NotificationData>,
}

impl ShownNotification for ClickedNotification {
    fn close(&mut self) {
        log::debug!("notification closed");
    }

    fn data(&self) -> Option<&NotificationData> {
        self.data.as_ref()
    }
}

fn cmd_worker(ctx: &Context, cmd: WorkerCommands) -> Result<(), CliError> {
    match cmd {
        WorkerCommands::Precache { origin, cache_dir } => {
            let origin = origin
                .or_else(|| ctx.config.origin.clone())
                .ok_or_else(|| {
                    CliError::usage("no origin given").with_hint("pass --origin or set `origin` in config.toml")
                })?;
            let cache = match cache_dir.or_else(|| ctx.config.cache_dir.clone()) {
                Some(dir) => DiskCache::new(&dir, CACHE_NAME),
                None => DiskCache::open_default(CACHE_NAME),
            };
            let cache_path = cache.dir().to_path_buf();

            let network = HttpNetwork::new(&origin).map_err(|e| CliError::usage(e.to_string()))?;
            let mut worker = BackgroundWorker::new(cache, network);
            let count = worker
                .install()
                .map_err(|e| CliError::new(EXIT_PRECACHE, format!("pre-cache failed: {}", e)))?;
            println!("cached {} assets in {}", count, cache_path.display());
        }
        WorkerCommands::Push { message } => {
            handle_push(&mut TerminalSurface, message.as_deref())
                .map_err(|e| CliError::new(EXIT_PUSH, e.to_string()))?;
        }
        WorkerCommands::Click { action, url } => {
            let mut notification = ClickedNotification {
                data: url.map(|url| NotificationData { url: Some(url) }),
            };
            let outcome = notification_click(&mut notification, action.as_deref(), &mut TerminalClients);
            log::info!("click outcome: {:?}", outcome);
        }
    }
    Ok(())
}
