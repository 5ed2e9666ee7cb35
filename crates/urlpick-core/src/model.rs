use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the profile identifier in launch templates
pub const PROFILE_TOKEN: &str = "{profile}";

/// A single selectable profile inside a browser installation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserProfile {
    /// Identifier passed to the browser (Chromium: profile directory name,
    /// Firefox: profile name)
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Executable the profile belongs to, used as its icon source
    #[serde(rename = "iconSourcePath")]
    pub icon_source_path: PathBuf,
    /// Profile avatar image, present only when the file exists on disk
    #[serde(rename = "pictureOverridePath", skip_serializing_if = "Option::is_none")]
    pub picture_override_path: Option<PathBuf>,
}

/// An installed browser together with its discovered profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Browser {
    pub name: String,
    #[serde(rename = "executablePath")]
    pub executable_path: PathBuf,
    /// Directory the profiles live under (for Firefox, the profiles.ini path)
    #[serde(rename = "profileRootPath")]
    pub profile_root_path: PathBuf,
    /// Whitespace-separated argument template containing `{profile}`
    #[serde(rename = "launchArgumentTemplate")]
    pub launch_argument_template: String,
    pub profiles: Vec<BrowserProfile>,
}

impl Browser {
    /// Build the argument vector for opening a URL in the given profile.
    ///
    /// The template is tokenized on whitespace before `{profile}` is
    /// substituted, so profile identifiers containing spaces stay a single
    /// argument. The URL is always the final argument.
    pub fn launch_args(&self, profile_id: &str, url: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .launch_argument_template
            .split_whitespace()
            .map(|token| token.replace(PROFILE_TOKEN, profile_id))
            .collect();
        args.push(url.to_string());
        args
    }
}

/// The complete discovered browser list, in catalog order.
///
/// Replaced wholesale by each scan, never merged with previous contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub browsers: Vec<Browser>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }

    /// Total number of profiles across all browsers
    pub fn profile_count(&self) -> usize {
        self.browsers.iter().map(|b| b.profiles.len()).sum()
    }
}
