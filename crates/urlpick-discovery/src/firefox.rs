use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use urlpick_core::BrowserProfile;

/// Scans a Firefox `profiles.ini` registry for selectable profiles
pub struct FirefoxProfileScanner;

impl FirefoxProfileScanner {
    /// Scan the profile registry at `profiles_ini`.
    ///
    /// A missing or unreadable registry yields an empty result; the caller
    /// then skips the browser.
    pub fn scan(profiles_ini: &Path, icon_source: &Path) -> Vec<BrowserProfile> {
        tracing::debug!("Scanning Firefox profiles at: {}", profiles_ini.display());

        let file = match File::open(profiles_ini) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!("No profile registry at {}: {}", profiles_ini.display(), e);
                return Vec::new();
            }
        };

        match Self::parse(BufReader::new(file), icon_source) {
            Ok(profiles) => {
                tracing::info!(
                    "Found {} Firefox profiles in {}",
                    profiles.len(),
                    profiles_ini.display()
                );
                profiles
            }
            Err(e) => {
                tracing::warn!("Failed reading {}: {}", profiles_ini.display(), e);
                Vec::new()
            }
        }
    }

    /// Walk the INI-like registry line by line. A `[Profile...]` header
    /// closes the record before it, `Name=`/`Path=` lines fill the current
    /// record, and EOF closes the last one. A record emits a profile only
    /// when both keys were captured.
    fn parse<R: BufRead>(reader: R, icon_source: &Path) -> Result<Vec<BrowserProfile>> {
        let mut profiles = Vec::new();
        let mut name: Option<String> = None;
        let mut path: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.starts_with("[Profile") {
                Self::close_record(&mut profiles, &mut name, &mut path, icon_source);
            } else if let Some(value) = line.strip_prefix("Name=") {
                name = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Path=") {
                path = Some(value.to_string());
            }
        }
        Self::close_record(&mut profiles, &mut name, &mut path, icon_source);

        Ok(profiles)
    }

    fn close_record(
        profiles: &mut Vec<BrowserProfile>,
        name: &mut Option<String>,
        path: &mut Option<String>,
        icon_source: &Path,
    ) {
        if let (Some(name), Some(_)) = (name.take(), path.take()) {
            tracing::debug!("Profile: {}", name);
            profiles.push(BrowserProfile {
                id: name.clone(),
                display_name: name,
                icon_source_path: icon_source.to_path_buf(),
                picture_override_path: None,
            });
        }
    }
}
