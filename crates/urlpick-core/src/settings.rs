use crate::Result;
use crate::model::{Browser, Inventory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// On-disk shape of the settings document
#[derive(Debug, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(rename = "scannedAt", skip_serializing_if = "Option::is_none")]
    scanned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    browsers: Vec<Browser>,
}

/// Reads and writes the persisted browser inventory
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted inventory.
    ///
    /// A missing, unreadable, or undecodable document yields an empty
    /// inventory. Startup never fails on settings state.
    pub fn load(&self) -> Inventory {
        tracing::debug!("Loading settings from: {}", self.path.display());

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!("No settings at {}: {}", self.path.display(), e);
                return Inventory::default();
            }
        };

        match serde_json::from_reader::<_, SettingsDocument>(BufReader::new(file)) {
            Ok(doc) => {
                tracing::info!(
                    "Loaded {} browsers from {}",
                    doc.browsers.len(),
                    self.path.display()
                );
                Inventory {
                    browsers: doc.browsers,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Discarding undecodable settings at {}: {}",
                    self.path.display(),
                    e
                );
                Inventory::default()
            }
        }
    }

    /// Persist the inventory, stamping the scan time
    pub fn save(&self, inventory: &Inventory) -> Result<()> {
        tracing::debug!("Writing settings to: {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let doc = SettingsDocument {
            scanned_at: Some(Utc::now()),
            browsers: inventory.browsers.clone(),
        };
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &doc)?;

        tracing::info!(
            "Saved {} browsers to {}",
            doc.browsers.len(),
            self.path.display()
        );

        Ok(())
    }
}
