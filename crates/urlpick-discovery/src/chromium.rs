use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use urlpick_core::BrowserProfile;

/// Metadata document at the root of a Chromium user-data directory
const LOCAL_STATE_FILE: &str = "Local State";

/// Per-profile preferences document inside a profile directory
const PREFERENCES_FILE: &str = "Preferences";

/// Account name Chromium writes for profiles that never signed in; it must
/// not win name resolution
const PLACEHOLDER_ACCOUNT_NAME: &str = "Default";

/// Sentinel Chromium writes when an account has no hosted domain
const NO_HOSTED_DOMAIN: &str = "NO_HOSTED_DOMAIN";

/// One entry of the `profile.info_cache` map inside Local State.
///
/// All fields are optional; absent and empty values are treated alike.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default)]
    gaia_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    hosted_domain: Option<String>,
    #[serde(default)]
    gaia_picture_file_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalState {
    #[serde(default)]
    profile: ProfileSection,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileSection {
    #[serde(default)]
    info_cache: HashMap<String, ProfileMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Preferences {
    #[serde(default)]
    profile: PreferencesProfile,
}

#[derive(Debug, Default, Deserialize)]
struct PreferencesProfile {
    #[serde(default)]
    name: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Scans a Chromium-family user-data directory for selectable profiles
pub struct ChromiumProfileScanner;

impl ChromiumProfileScanner {
    /// Scan the user-data directory under `profile_root`.
    ///
    /// Failures stay scoped: a missing or undecodable metadata document
    /// degrades to per-directory fallbacks, and a directory with a broken
    /// Preferences file keeps its raw name. Only an unreadable root yields
    /// an empty result.
    pub fn scan(profile_root: &Path, icon_source: &Path) -> Vec<BrowserProfile> {
        tracing::debug!("Scanning Chromium profiles under: {}", profile_root.display());

        let metadata = match Self::load_metadata(profile_root) {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!("No profile metadata in {}: {}", profile_root.display(), e);
                HashMap::new()
            }
        };

        let mut dirs: Vec<String> = match std::fs::read_dir(profile_root) {
            Ok(entries) => entries
                .flatten()
                .filter(|entry| entry.path().is_dir())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| Self::is_profile_dir(name))
                .collect(),
            Err(e) => {
                tracing::debug!("Cannot enumerate {}: {}", profile_root.display(), e);
                return Vec::new();
            }
        };
        dirs.sort();

        let profiles: Vec<BrowserProfile> = dirs
            .into_iter()
            .map(|dir_name| Self::build_profile(profile_root, &dir_name, &metadata, icon_source))
            .collect();

        tracing::info!(
            "Found {} Chromium profiles under {}",
            profiles.len(),
            profile_root.display()
        );
        profiles
    }

    /// Only `Default` and `Profile <n>` directories hold selectable
    /// profiles; system, guest, and cache directories are skipped
    fn is_profile_dir(name: &str) -> bool {
        name == "Default" || name.starts_with("Profile ")
    }

    fn load_metadata(profile_root: &Path) -> Result<HashMap<String, ProfileMetadata>> {
        let file = File::open(profile_root.join(LOCAL_STATE_FILE))?;
        let state: LocalState = serde_json::from_reader(BufReader::new(file))?;
        Ok(state.profile.info_cache)
    }

    fn build_profile(
        profile_root: &Path,
        dir_name: &str,
        metadata: &HashMap<String, ProfileMetadata>,
        icon_source: &Path,
    ) -> BrowserProfile {
        let dir = profile_root.join(dir_name);

        let (display_name, picture_override_path) = match metadata.get(dir_name) {
            Some(meta) => {
                let picture = non_empty(&meta.gaia_picture_file_name)
                    .map(|file_name| dir.join(file_name))
                    .filter(|path| path.is_file());
                (Self::resolve_display_name(dir_name, meta), picture)
            }
            None => {
                let name = Self::read_preferences_name(&dir)
                    .unwrap_or_else(|| dir_name.to_string());
                (name, None)
            }
        };

        tracing::debug!("Profile {}: {}", dir_name, display_name);
        BrowserProfile {
            id: dir_name.to_string(),
            display_name,
            icon_source_path: icon_source.to_path_buf(),
            picture_override_path,
        }
    }

    /// Resolve the human-readable name for a profile with metadata.
    ///
    /// Precedence: account display name (unless it is the placeholder),
    /// then the user-editable label, then the account identifier, then the
    /// directory name. The account identifier and hosted domain are
    /// appended in parentheses when they add information not already
    /// visible in the name.
    fn resolve_display_name(dir_name: &str, meta: &ProfileMetadata) -> String {
        let base = non_empty(&meta.gaia_name)
            .filter(|gaia| *gaia != PLACEHOLDER_ACCOUNT_NAME)
            .or_else(|| non_empty(&meta.name))
            .or_else(|| non_empty(&meta.user_name))
            .unwrap_or(dir_name);
        let mut display = base.to_string();

        if let Some(user_name) = non_empty(&meta.user_name) {
            if display != user_name
                && !contains_ignore_case(&display, user_name)
                && !display.contains('@')
            {
                display = format!("{} ({})", display, user_name);
            }
        }

        if let Some(domain) = non_empty(&meta.hosted_domain) {
            if domain != NO_HOSTED_DOMAIN && !contains_ignore_case(&display, domain) {
                display = format!("{} ({})", display, domain);
            }
        }

        display
    }

    /// Fallback label for directories absent from the metadata map
    fn read_preferences_name(profile_dir: &Path) -> Option<String> {
        let file = File::open(profile_dir.join(PREFERENCES_FILE)).ok()?;
        let prefs: Preferences = serde_json::from_reader(BufReader::new(file)).ok()?;
        prefs.profile.name.filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn meta(
        gaia_name: Option<&str>,
        name: Option<&str>,
        user_name: Option<&str>,
        hosted_domain: Option<&str>,
    ) -> ProfileMetadata {
        ProfileMetadata {
            gaia_name: gaia_name.map(String::from),
            name: name.map(String::from),
            user_name: user_name.map(String::from),
            hosted_domain: hosted_domain.map(String::from),
            gaia_picture_file_name: None,
        }
    }

    fn resolve(meta: &ProfileMetadata) -> String {
        ChromiumProfileScanner::resolve_display_name("Profile 1", meta)
    }

    #[test]
    fn test_gaia_name_wins_resolution() {
        let meta = meta(Some("Jane"), Some("Person 1"), None, None);

        assert_eq!(resolve(&meta), "Jane");
    }

    #[test]
    fn test_placeholder_gaia_name_never_wins() {
        let meta = meta(Some("Default"), Some("Personal"), None, None);

        assert_eq!(resolve(&meta), "Personal");
    }

    #[test]
    fn test_account_identifier_appended() {
        let meta = meta(Some("Work"), None, Some("jane@example.com"), None);

        assert_eq!(resolve(&meta), "Work (jane@example.com)");
    }

    #[test]
    fn test_account_identifier_not_appended_to_name_with_at_sign() {
        let meta = meta(Some("jane@corp"), None, Some("jane@example.com"), None);

        assert_eq!(resolve(&meta), "jane@corp");
    }

    #[test]
    fn test_account_identifier_not_appended_when_already_contained() {
        let meta = meta(Some("Jane (JANE@EXAMPLE.COM)"), None, Some("jane@example.com"), None);

        assert_eq!(resolve(&meta), "Jane (JANE@EXAMPLE.COM)");
    }

    #[test]
    fn test_identifier_fallback_when_only_user_name_present() {
        let meta = meta(None, None, Some("jane@example.com"), None);

        assert_eq!(resolve(&meta), "jane@example.com");
    }

    #[test]
    fn test_hosted_domain_appended() {
        let meta = meta(Some("Jane"), None, None, Some("example.com"));

        assert_eq!(resolve(&meta), "Jane (example.com)");
    }

    #[test]
    fn test_no_hosted_domain_sentinel_never_appended() {
        let meta = meta(Some("Jane"), None, None, Some("NO_HOSTED_DOMAIN"));

        assert_eq!(resolve(&meta), "Jane");
    }

    #[test]
    fn test_hosted_domain_skipped_when_visible_in_identifier() {
        let meta = meta(
            Some("Work"),
            None,
            Some("jane@example.com"),
            Some("example.com"),
        );

        assert_eq!(resolve(&meta), "Work (jane@example.com)");
    }

    #[test]
    fn test_directory_name_fallback_without_any_candidate() {
        let meta = meta(None, Some(""), None, None);

        assert_eq!(resolve(&meta), "Profile 1");
    }

    fn write_local_state(root: &Path, body: &str) {
        fs::write(root.join(LOCAL_STATE_FILE), body).unwrap();
    }

    #[test]
    fn test_scan_reads_metadata_and_orders_directories() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("Default")).unwrap();
        fs::create_dir(root.path().join("Profile 1")).unwrap();
        fs::create_dir(root.path().join("System Profile")).unwrap();
        fs::create_dir(root.path().join("GrShaderCache")).unwrap();
        write_local_state(
            root.path(),
            r#"{
                "profile": {
                    "info_cache": {
                        "Default": { "gaia_name": "Jane", "user_name": "jane@example.com" },
                        "Profile 1": { "name": "Work" }
                    }
                }
            }"#,
        );

        let profiles =
            ChromiumProfileScanner::scan(root.path(), Path::new("/usr/bin/google-chrome"));

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "Default");
        assert_eq!(profiles[0].display_name, "Jane (jane@example.com)");
        assert_eq!(profiles[1].id, "Profile 1");
        assert_eq!(profiles[1].display_name, "Work");
        assert_eq!(
            profiles[0].icon_source_path,
            PathBuf::from("/usr/bin/google-chrome")
        );
    }

    #[test]
    fn test_scan_directory_without_metadata_uses_preferences_name() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Profile 2");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join(PREFERENCES_FILE),
            r#"{ "profile": { "name": "Scratch" } }"#,
        )
        .unwrap();
        write_local_state(root.path(), r#"{ "profile": { "info_cache": {} } }"#);

        let profiles = ChromiumProfileScanner::scan(root.path(), Path::new("/usr/bin/chromium"));

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].display_name, "Scratch");
    }

    #[test]
    fn test_scan_directory_without_any_metadata_keeps_raw_name() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("Profile 3")).unwrap();

        let profiles = ChromiumProfileScanner::scan(root.path(), Path::new("/usr/bin/chromium"));

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id, "Profile 3");
        assert_eq!(profiles[0].display_name, "Profile 3");
    }

    #[test]
    fn test_scan_survives_malformed_documents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Profile 1");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(PREFERENCES_FILE), "garbage").unwrap();
        write_local_state(root.path(), "also garbage");

        let profiles = ChromiumProfileScanner::scan(root.path(), Path::new("/usr/bin/chromium"));

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].display_name, "Profile 1");
    }

    #[test]
    fn test_scan_picture_override_requires_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let with_picture = root.path().join("Default");
        let without_picture = root.path().join("Profile 1");
        fs::create_dir(&with_picture).unwrap();
        fs::create_dir(&without_picture).unwrap();
        fs::write(with_picture.join("avatar.png"), "png").unwrap();
        write_local_state(
            root.path(),
            r#"{
                "profile": {
                    "info_cache": {
                        "Default": { "name": "A", "gaia_picture_file_name": "avatar.png" },
                        "Profile 1": { "name": "B", "gaia_picture_file_name": "gone.png" }
                    }
                }
            }"#,
        );

        let profiles = ChromiumProfileScanner::scan(root.path(), Path::new("/usr/bin/chromium"));

        assert_eq!(
            profiles[0].picture_override_path,
            Some(with_picture.join("avatar.png"))
        );
        assert_eq!(profiles[1].picture_override_path, None);
    }

    #[test]
    fn test_scan_missing_root_yields_empty() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("never-created");

        let profiles = ChromiumProfileScanner::scan(&gone, Path::new("/usr/bin/chromium"));

        assert!(profiles.is_empty());
    }
}
