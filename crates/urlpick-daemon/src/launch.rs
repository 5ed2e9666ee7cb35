use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use urlpick_core::{Browser, BrowserProfile};

/// Launch the chosen browser detached, with the URL as the final argument.
/// The child is not awaited.
pub fn spawn_browser(browser: &Browser, profile: &BrowserProfile, url: &str) -> Result<()> {
    let args = browser.launch_args(&profile.id, url);
    tracing::info!(
        "Launching {} [{}]: {:?}",
        browser.name,
        profile.display_name,
        args
    );

    Command::new(&browser.executable_path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {}", browser.executable_path.display()))?;

    Ok(())
}
