use crate::catalog::{self, CatalogEntry, ProfileKind};
use crate::chromium::ChromiumProfileScanner;
use crate::firefox::FirefoxProfileScanner;
use crate::locator::{self, ExecutableLocator};
use std::path::PathBuf;
use urlpick_core::{Browser, Inventory, SettingsStore};

/// Runs the full discovery pass and persists the result
pub struct DiscoveryCoordinator {
    locator: ExecutableLocator,
    store: SettingsStore,
}

impl DiscoveryCoordinator {
    /// Coordinator over the platform's default install bases
    pub fn new(store: SettingsStore) -> Self {
        Self {
            locator: ExecutableLocator::new(locator::install_bases()),
            store,
        }
    }

    /// Coordinator with explicit install bases
    pub fn with_locator(locator: ExecutableLocator, store: SettingsStore) -> Self {
        Self { locator, store }
    }

    /// Scan the machine for browsers and their profiles, persist the
    /// inventory, and return it.
    ///
    /// Failures stay scoped: a browser that cannot be located or scanned is
    /// skipped, and a failed persist still returns the in-memory result.
    /// The fresh scan is authoritative for this process lifetime.
    pub fn run(&self) -> Inventory {
        self.run_catalog(&catalog::known_browsers())
    }

    fn run_catalog(&self, entries: &[CatalogEntry]) -> Inventory {
        tracing::info!("Starting browser discovery");

        let mut browsers = Vec::new();
        for entry in entries {
            match self.discover(entry) {
                Some(browser) => {
                    tracing::info!(
                        "Discovered {} with {} profiles",
                        browser.name,
                        browser.profiles.len()
                    );
                    browsers.push(browser);
                }
                None => tracing::debug!("Skipping {}", entry.name),
            }
        }

        let inventory = Inventory { browsers };
        if let Err(e) = self.store.save(&inventory) {
            tracing::warn!(
                "Could not persist inventory to {}: {}",
                self.store.path().display(),
                e
            );
        }

        inventory
    }

    /// Locate one catalog entry and scan its profiles. A browser without a
    /// locatable executable, or with zero profiles, never enters the
    /// inventory.
    fn discover(&self, entry: &CatalogEntry) -> Option<Browser> {
        let executable = self.locate_executable(entry)?;

        let profiles = match entry.kind {
            ProfileKind::Chromium => {
                ChromiumProfileScanner::scan(&entry.profile_root, &executable)
            }
            ProfileKind::Firefox => FirefoxProfileScanner::scan(&entry.profile_root, &executable),
        };
        if profiles.is_empty() {
            tracing::debug!(
                "{} has no profiles under {}",
                entry.name,
                entry.profile_root.display()
            );
            return None;
        }

        Some(Browser {
            name: entry.name.to_string(),
            executable_path: executable,
            profile_root_path: entry.profile_root.clone(),
            launch_argument_template: entry.launch_argument_template.to_string(),
            profiles,
        })
    }

    /// Ordered base search first, then PATH probes for installs that ship
    /// as bare binaries
    fn locate_executable(&self, entry: &CatalogEntry) -> Option<PathBuf> {
        if let Some(path) = self.locator.locate(&entry.install_subpath, entry.exe_name) {
            return Some(path);
        }

        for name in entry.path_names {
            if let Ok(path) = which::which(name) {
                tracing::debug!("Found {} on PATH: {}", entry.name, path.display());
                return Some(path);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn chromium_entry(profile_root: &Path) -> CatalogEntry {
        CatalogEntry {
            name: "Test Chromium",
            exe_name: "testbrowser",
            install_subpath: PathBuf::from("Vendor/App"),
            path_names: &[],
            profile_root: profile_root.to_path_buf(),
            kind: ProfileKind::Chromium,
            launch_argument_template: "--profile-directory={profile}",
        }
    }

    fn place_exe(base: &Path) -> PathBuf {
        let dir = base.join("Vendor/App");
        fs::create_dir_all(&dir).unwrap();
        let exe = dir.join("testbrowser");
        fs::write(&exe, "").unwrap();
        exe
    }

    fn place_profiles(profile_root: &Path) {
        fs::create_dir_all(profile_root.join("Default")).unwrap();
        fs::write(
            profile_root.join("Local State"),
            r#"{ "profile": { "info_cache": { "Default": { "name": "Personal" } } } }"#,
        )
        .unwrap();
    }

    #[test]
    fn test_run_catalog_collects_and_persists() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("base");
        let profile_root = root.path().join("userdata");
        let settings = root.path().join("settings.json");
        let exe = place_exe(&base);
        place_profiles(&profile_root);

        let coordinator = DiscoveryCoordinator::with_locator(
            ExecutableLocator::with_base(base.clone()),
            SettingsStore::new(&settings),
        );
        let inventory = coordinator.run_catalog(&[chromium_entry(&profile_root)]);

        assert_eq!(inventory.browsers.len(), 1);
        assert_eq!(inventory.browsers[0].name, "Test Chromium");
        assert_eq!(inventory.browsers[0].executable_path, exe);
        assert_eq!(inventory.browsers[0].profiles[0].display_name, "Personal");
        assert!(settings.is_file());
    }

    #[test]
    fn test_unlocatable_browser_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("base");
        let profile_root = root.path().join("userdata");
        place_profiles(&profile_root);

        let coordinator = DiscoveryCoordinator::with_locator(
            ExecutableLocator::with_base(base.clone()),
            SettingsStore::new(root.path().join("settings.json")),
        );
        let inventory = coordinator.run_catalog(&[chromium_entry(&profile_root)]);

        assert!(inventory.is_empty());
    }

    #[test]
    fn test_browser_without_profiles_is_never_added() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("base");
        let profile_root = root.path().join("userdata");
        fs::create_dir_all(&profile_root).unwrap();
        place_exe(&base);

        let coordinator = DiscoveryCoordinator::with_locator(
            ExecutableLocator::with_base(base.clone()),
            SettingsStore::new(root.path().join("settings.json")),
        );
        let inventory = coordinator.run_catalog(&[chromium_entry(&profile_root)]);

        assert!(inventory.is_empty());
    }

    #[test]
    fn test_failed_persist_still_returns_inventory() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("base");
        let profile_root = root.path().join("userdata");
        place_exe(&base);
        place_profiles(&profile_root);
        let blocker = root.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let coordinator = DiscoveryCoordinator::with_locator(
            ExecutableLocator::with_base(base.clone()),
            SettingsStore::new(blocker.join("settings.json")),
        );
        let inventory = coordinator.run_catalog(&[chromium_entry(&profile_root)]);

        assert_eq!(inventory.browsers.len(), 1);
    }
}
