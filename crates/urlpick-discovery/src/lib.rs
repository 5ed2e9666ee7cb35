// Browser and profile discovery: executable location, Chromium and Firefox
// profile scanning, and the coordinator that assembles the inventory

pub mod catalog;
pub mod chromium;
pub mod coordinator;
pub mod error;
pub mod firefox;
pub mod locator;

pub use chromium::ChromiumProfileScanner;
pub use coordinator::DiscoveryCoordinator;
pub use error::{Error, Result};
pub use firefox::FirefoxProfileScanner;
pub use locator::ExecutableLocator;
