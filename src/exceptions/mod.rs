//! Per-window exceptions
//!
//! An exception applies its own full settings record to every window whose
//! class or title matches a pattern. The list is ordered: when a window
//! matches several exceptions, the first enabled one wins.

use crate::settings::DecorationSettings;
use crate::store::ConfigStore;
use anyhow::bail;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Groups holding exceptions are named `<prefix> <index>`
pub const EXCEPTION_GROUP_PREFIX: &str = "Windeco Exception";

const KEY_PATTERN: &str = "ExceptionPattern";
const KEY_TYPE: &str = "ExceptionType";
const KEY_ENABLED: &str = "Enabled";

/// Store group for the exception at `index`
pub fn exception_group_name(index: usize) -> String {
    format!("{} {}", EXCEPTION_GROUP_PREFIX, index)
}

fn is_exception_group(group: &str) -> bool {
    group
        .strip_prefix(EXCEPTION_GROUP_PREFIX)
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|index| index.parse::<usize>().is_ok())
}

/// Which window property an exception pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExceptionType {
    #[default]
    WindowClass,
    WindowTitle,
}

impl ExceptionType {
    pub fn index(self) -> i32 {
        match self {
            ExceptionType::WindowClass => 0,
            ExceptionType::WindowTitle => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExceptionType::WindowClass => "Window Class Name",
            ExceptionType::WindowTitle => "Window Title",
        }
    }
}

/// Persisted as the numeric index
impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl FromStr for ExceptionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "class" | "windowclass" => Ok(ExceptionType::WindowClass),
            "1" | "title" | "windowtitle" => Ok(ExceptionType::WindowTitle),
            other => bail!("Unknown exception type: {}", other),
        }
    }
}

/// Identity of a window, as seen by exception matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowIdentity<'a> {
    pub title: &'a str,
    pub class: &'a str,
}

/// One override bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionRecord {
    pub pattern: String,
    pub exception_type: ExceptionType,
    pub enabled: bool,
    pub settings: DecorationSettings,
}

impl ExceptionRecord {
    /// Enabled exception carrying the default settings
    pub fn new(pattern: impl Into<String>, exception_type: ExceptionType) -> Self {
        Self {
            pattern: pattern.into(),
            exception_type,
            enabled: true,
            settings: DecorationSettings::default(),
        }
    }

    /// Whether the pattern matches the relevant window property.
    /// Invalid patterns never match.
    pub fn matches(&self, window: &WindowIdentity<'_>) -> bool {
        let haystack = match self.exception_type {
            ExceptionType::WindowClass => window.class,
            ExceptionType::WindowTitle => window.title,
        };

        match Regex::new(&self.pattern) {
            Ok(regex) => regex.is_match(haystack),
            Err(e) => {
                debug!("Invalid exception pattern '{}': {}", self.pattern, e);
                false
            }
        }
    }

    /// Deserialize a record. `None` when the group is malformed.
    fn read_group(store: &ConfigStore, group: &str) -> Option<Self> {
        let pattern = store
            .raw_entry(group, KEY_PATTERN)
            .map(str::trim)
            .filter(|p| !p.is_empty())?
            .to_string();

        let exception_type = match store.raw_entry(group, KEY_TYPE) {
            Some(raw) => raw.parse().ok()?,
            None => ExceptionType::default(),
        };

        Some(Self {
            pattern,
            exception_type,
            enabled: store.read_entry(group, KEY_ENABLED, true),
            settings: DecorationSettings::load_group(store, group),
        })
    }

    fn write_group(&self, store: &mut ConfigStore, group: &str) {
        store.write_entry(group, KEY_PATTERN, &self.pattern);
        store.write_entry(group, KEY_TYPE, &self.exception_type);
        store.write_entry(group, KEY_ENABLED, &self.enabled);
        self.settings.save_group(store, group);
    }
}

/// Ordered list of exceptions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExceptionList {
    exceptions: Vec<ExceptionRecord>,
}

impl ExceptionList {
    pub fn new(exceptions: Vec<ExceptionRecord>) -> Self {
        Self { exceptions }
    }

    pub fn get(&self) -> &[ExceptionRecord] {
        &self.exceptions
    }

    pub fn into_inner(self) -> Vec<ExceptionRecord> {
        self.exceptions
    }

    /// Read every persisted exception, in persisted order.
    ///
    /// Groups are visited by index from 0 up to the first missing one;
    /// malformed groups are skipped.
    pub fn read_config(store: &ConfigStore) -> Self {
        let mut exceptions = Vec::new();
        for index in 0.. {
            let group = exception_group_name(index);
            if !store.has_group(&group) {
                break;
            }
            match ExceptionRecord::read_group(store, &group) {
                Some(record) => exceptions.push(record),
                None => warn!("Skipping malformed exception group [{}]", group),
            }
        }
        debug!("Read {} window exceptions", exceptions.len());
        Self { exceptions }
    }

    /// Replace every persisted exception with this list. Does not flush.
    pub fn write_config(&self, store: &mut ConfigStore) {
        for group in store.group_list() {
            if is_exception_group(&group) {
                store.delete_group(&group);
            }
        }

        for (index, record) in self.exceptions.iter().enumerate() {
            record.write_group(store, &exception_group_name(index));
        }
        debug!("Wrote {} window exceptions", self.exceptions.len());
    }

    /// First enabled exception matching `window`
    pub fn find_match(&self, window: &WindowIdentity<'_>) -> Option<&ExceptionRecord> {
        self.exceptions
            .iter()
            .filter(|record| record.enabled)
            .find(|record| record.matches(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Color, TitleAlignment};

    fn sample_exceptions() -> Vec<ExceptionRecord> {
        let mut terminal = ExceptionRecord::new("konsole", ExceptionType::WindowClass);
        terminal.settings.button_size = 24;
        terminal.settings.title_alignment = TitleAlignment::Left;

        let mut video = ExceptionRecord::new(r"^.* - YouTube", ExceptionType::WindowTitle);
        video.enabled = false;
        video.settings.shadow_color = Color::rgba(20, 20, 20, 200);

        let browser = ExceptionRecord::new("firefox", ExceptionType::WindowClass);
        vec![terminal, video, browser]
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut store = ConfigStore::in_memory();
        let exceptions = sample_exceptions();
        ExceptionList::new(exceptions.clone()).write_config(&mut store);

        let read = ExceptionList::read_config(&store);
        assert_eq!(read.get(), exceptions.as_slice());
    }

    #[test]
    fn test_write_removes_stale_groups() {
        let mut store = ConfigStore::in_memory();
        ExceptionList::new(sample_exceptions()).write_config(&mut store);
        assert!(store.has_group("Windeco Exception 2"));

        let shorter = vec![ExceptionRecord::new("xterm", ExceptionType::WindowClass)];
        ExceptionList::new(shorter.clone()).write_config(&mut store);

        assert!(!store.has_group("Windeco Exception 1"));
        assert!(!store.has_group("Windeco Exception 2"));
        assert_eq!(ExceptionList::read_config(&store).into_inner(), shorter);
    }

    #[test]
    fn test_write_keeps_global_group() {
        let mut store = ConfigStore::in_memory();
        DecorationSettings::default().save(&mut store);
        ExceptionList::default().write_config(&mut store);
        assert!(store.has_group("Windeco"));
    }

    #[test]
    fn test_malformed_groups_are_skipped() {
        let mut store = ConfigStore::in_memory();
        ExceptionList::new(sample_exceptions()).write_config(&mut store);
        store.write_entry("Windeco Exception 0", KEY_PATTERN, "");
        store.write_entry("Windeco Exception 1", KEY_TYPE, "7");

        let read = ExceptionList::read_config(&store);
        assert_eq!(read.get().len(), 1);
        assert_eq!(read.get()[0].pattern, "firefox");
    }

    #[test]
    fn test_missing_type_defaults_to_class() {
        let mut store = ConfigStore::in_memory();
        store.write_entry("Windeco Exception 0", KEY_PATTERN, "gimp");

        let read = ExceptionList::read_config(&store);
        assert_eq!(read.get()[0].exception_type, ExceptionType::WindowClass);
        assert!(read.get()[0].enabled);
    }

    #[test]
    fn test_find_match_first_enabled_wins() {
        let mut exceptions = sample_exceptions();
        exceptions.push(ExceptionRecord::new("fire", ExceptionType::WindowClass));
        let list = ExceptionList::new(exceptions);

        let browser = WindowIdentity {
            title: "Rust - YouTube",
            class: "firefox",
        };
        let found = list.find_match(&browser).unwrap();
        assert_eq!(found.pattern, "firefox");

        let terminal = WindowIdentity {
            title: "~",
            class: "org.kde.konsole",
        };
        assert_eq!(list.find_match(&terminal).unwrap().settings.button_size, 24);

        let other = WindowIdentity {
            title: "Untitled",
            class: "kate",
        };
        assert!(list.find_match(&other).is_none());
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let record = ExceptionRecord::new("(unclosed", ExceptionType::WindowTitle);
        let window = WindowIdentity {
            title: "(unclosed",
            class: "",
        };
        assert!(!record.matches(&window));
    }

    #[test]
    fn test_group_name_detection() {
        assert!(is_exception_group("Windeco Exception 0"));
        assert!(is_exception_group("Windeco Exception 12"));
        assert!(!is_exception_group("Windeco"));
        assert!(!is_exception_group("Windeco Exception"));
        assert!(!is_exception_group("Windeco Exceptional 1"));
    }
}
