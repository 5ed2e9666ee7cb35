use std::path::PathBuf;

/// Argument template shared by all Chromium-family entries
const CHROMIUM_TEMPLATE: &str = "--profile-directory={profile}";

/// Argument template for Firefox: `-P` selects a profile by name
const FIREFOX_TEMPLATE: &str = "-P {profile}";

/// Which profile scanner a catalog entry uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Chromium,
    Firefox,
}

/// A known browser the discovery pass probes for
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Product name shown to the user
    pub name: &'static str,
    /// Executable file name searched under the install bases
    pub exe_name: &'static str,
    /// Path segment between an install base and the executable name
    pub install_subpath: PathBuf,
    /// Binary names probed on PATH when the base search misses
    pub path_names: &'static [&'static str],
    /// Where the profiles live: the user-data directory, or the
    /// profiles.ini path for Firefox entries
    pub profile_root: PathBuf,
    pub kind: ProfileKind,
    pub launch_argument_template: &'static str,
}

/// The browsers probed on this platform, in inventory order
#[cfg(target_os = "windows")]
pub fn known_browsers() -> Vec<CatalogEntry> {
    let local = env_path("LOCALAPPDATA");
    let roaming = env_path("APPDATA");

    vec![
        CatalogEntry {
            name: "Google Chrome",
            exe_name: "chrome.exe",
            install_subpath: PathBuf::from(r"Google\Chrome\Application"),
            path_names: &[],
            profile_root: local.join(r"Google\Chrome\User Data"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Microsoft Edge",
            exe_name: "msedge.exe",
            install_subpath: PathBuf::from(r"Microsoft\Edge\Application"),
            path_names: &[],
            profile_root: local.join(r"Microsoft\Edge\User Data"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Brave",
            exe_name: "brave.exe",
            install_subpath: PathBuf::from(r"BraveSoftware\Brave-Browser\Application"),
            path_names: &[],
            profile_root: local.join(r"BraveSoftware\Brave-Browser\User Data"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Mozilla Firefox",
            exe_name: "firefox.exe",
            install_subpath: PathBuf::from("Mozilla Firefox"),
            path_names: &[],
            profile_root: roaming.join(r"Mozilla\Firefox\profiles.ini"),
            kind: ProfileKind::Firefox,
            launch_argument_template: FIREFOX_TEMPLATE,
        },
    ]
}

/// The browsers probed on this platform, in inventory order
#[cfg(target_os = "linux")]
pub fn known_browsers() -> Vec<CatalogEntry> {
    let config = dirs::config_dir().unwrap_or_default();
    let home = dirs::home_dir().unwrap_or_default();

    vec![
        CatalogEntry {
            name: "Google Chrome",
            exe_name: "google-chrome",
            install_subpath: PathBuf::new(),
            path_names: &["google-chrome", "google-chrome-stable"],
            profile_root: config.join("google-chrome"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Chromium",
            exe_name: "chromium",
            install_subpath: PathBuf::new(),
            path_names: &["chromium", "chromium-browser"],
            profile_root: config.join("chromium"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Microsoft Edge",
            exe_name: "microsoft-edge",
            install_subpath: PathBuf::new(),
            path_names: &["microsoft-edge", "microsoft-edge-stable"],
            profile_root: config.join("microsoft-edge"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Brave",
            exe_name: "brave-browser",
            install_subpath: PathBuf::new(),
            path_names: &["brave-browser", "brave"],
            profile_root: config.join("BraveSoftware/Brave-Browser"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Mozilla Firefox",
            exe_name: "firefox",
            install_subpath: PathBuf::new(),
            path_names: &["firefox"],
            profile_root: home.join(".mozilla/firefox/profiles.ini"),
            kind: ProfileKind::Firefox,
            launch_argument_template: FIREFOX_TEMPLATE,
        },
    ]
}

/// The browsers probed on this platform, in inventory order
#[cfg(target_os = "macos")]
pub fn known_browsers() -> Vec<CatalogEntry> {
    let support = dirs::config_dir().unwrap_or_default();

    vec![
        CatalogEntry {
            name: "Google Chrome",
            exe_name: "Google Chrome",
            install_subpath: PathBuf::from("Google Chrome.app/Contents/MacOS"),
            path_names: &[],
            profile_root: support.join("Google/Chrome"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Microsoft Edge",
            exe_name: "Microsoft Edge",
            install_subpath: PathBuf::from("Microsoft Edge.app/Contents/MacOS"),
            path_names: &[],
            profile_root: support.join("Microsoft Edge"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Brave",
            exe_name: "Brave Browser",
            install_subpath: PathBuf::from("Brave Browser.app/Contents/MacOS"),
            path_names: &[],
            profile_root: support.join("BraveSoftware/Brave-Browser"),
            kind: ProfileKind::Chromium,
            launch_argument_template: CHROMIUM_TEMPLATE,
        },
        CatalogEntry {
            name: "Mozilla Firefox",
            exe_name: "firefox",
            install_subpath: PathBuf::from("Firefox.app/Contents/MacOS"),
            path_names: &[],
            profile_root: support.join("Firefox/profiles.ini"),
            kind: ProfileKind::Firefox,
            launch_argument_template: FIREFOX_TEMPLATE,
        },
    ]
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub fn known_browsers() -> Vec<CatalogEntry> {
    Vec::new()
}

#[cfg(target_os = "windows")]
fn env_path(var: &str) -> PathBuf {
    std::env::var_os(var).map(PathBuf::from).unwrap_or_default()
}
