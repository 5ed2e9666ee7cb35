use console::{Term, style};
use std::io;
use urlpick_core::{Browser, BrowserProfile, Inventory};

/// A browser profile chosen for one URL
pub struct Selection<'a> {
    pub browser: &'a Browser,
    pub profile: &'a BrowserProfile,
}

/// Chooses the destination profile for one URL; sessions run one at a time
pub trait ProfilePicker {
    fn pick<'a>(&mut self, inventory: &'a Inventory, url: &str) -> Option<Selection<'a>>;
}

/// The picker for this process: interactive on a terminal, first-profile
/// auto-selection when the service runs detached
pub fn select_picker() -> Box<dyn ProfilePicker + Send> {
    let term = Term::stderr();
    if term.is_term() {
        Box::new(ConsolePicker::new())
    } else {
        Box::new(FirstProfilePicker)
    }
}

/// Flattened browser/profile choices, in inventory order
fn choices(inventory: &Inventory) -> Vec<Selection<'_>> {
    inventory
        .browsers
        .iter()
        .flat_map(|browser| {
            browser
                .profiles
                .iter()
                .map(move |profile| Selection { browser, profile })
        })
        .collect()
}

/// The URL's host where it parses, the raw string otherwise
fn display_target(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{} ({})", host, url),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Empty input accepts the preselected first entry; anything else must be
/// a number within the list
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

/// Interactive picker on the controlling terminal
pub struct ConsolePicker {
    term: Term,
}

impl ConsolePicker {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn render(&self, choices: &[Selection<'_>], url: &str) -> io::Result<()> {
        self.term.write_line("")?;
        self.term
            .write_line(&format!("Open {}", style(display_target(url)).bold()))?;
        for (idx, choice) in choices.iter().enumerate() {
            let marker = if idx == 0 { "*" } else { " " };
            self.term.write_line(&format!(
                "{} {:>2}. {} [{}]",
                marker,
                idx + 1,
                choice.profile.display_name,
                choice.browser.name
            ))?;
        }
        self.term.write_str("Profile [1]: ")?;
        Ok(())
    }
}

impl Default for ConsolePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfilePicker for ConsolePicker {
    fn pick<'a>(&mut self, inventory: &'a Inventory, url: &str) -> Option<Selection<'a>> {
        let choices = choices(inventory);
        self.render(&choices, url).ok()?;

        let answer = self.term.read_line().ok()?;
        let index = match parse_choice(&answer, choices.len()) {
            Some(index) => index,
            None => {
                tracing::info!("Dismissed: {:?}", answer.trim());
                return None;
            }
        };
        choices.into_iter().nth(index)
    }
}

/// Non-interactive fallback for a detached service: the preselected first
/// profile is accepted automatically
pub struct FirstProfilePicker;

impl ProfilePicker for FirstProfilePicker {
    fn pick<'a>(&mut self, inventory: &'a Inventory, url: &str) -> Option<Selection<'a>> {
        let selection = choices(inventory).into_iter().next()?;
        tracing::info!(
            "Auto-selecting {} / {} for {}",
            selection.browser.name,
            selection.profile.display_name,
            url
        );
        Some(selection)
    }
}
