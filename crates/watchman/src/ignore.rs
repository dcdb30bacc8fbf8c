//! Exclusion rules: which folders never make it into the record list.
//!
//! Patterns are case-folded substrings, matched anywhere in the path. This
//! errs towards excluding too much: a missed temp folder only adds noise,
//! while a leaked system folder clutters the list.

use filetracker_core::config::AppConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fragments excluded on every platform.
const COMMON_PATTERNS: &[&str] = &[
    "AppData",
    "Temp",
    "cache",
    "__pycache__",
    "$Recycle.Bin",
    "System Volume Information",
    ".Trash",
    ".Trashes",
    ".Spotlight-V100",
    ".fseventsd",
    "lost+found",
];

const WINDOWS_PATTERNS: &[&str] = &[
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\ProgramData",
    "C:\\Users\\Public",
    "C:\\Users\\Default",
    "C:\\Users\\All Users",
    "C:\\Recovery",
    "C:\\PerfLogs",
];

const UNIX_PATTERNS: &[&str] = &[
    "/proc/", "/sys/", "/dev/", "/run/", "/usr/", "/etc/", "/var/", "/opt/", "/snap/", "/boot/",
    "/tmp/", "/System/", "/Library/", "/Applications/", "/private/",
];

/// Per-user subpaths, joined onto the home directory.
const WINDOWS_PROFILE_SUBPATHS: &[&[&str]] = &[
    &["Documents", "WeChat Files"],
    &["Documents", "Tencent Files"],
];

const UNIX_PROFILE_SUBPATHS: &[&[&str]] = &[
    &[".local", "share", "Trash"],
    &[".config"],
    &["Library"],
    &[".npm"],
    &[".cargo", "registry"],
];

/// The user whose profile folders are excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub home: Option<PathBuf>,
}

impl UserProfile {
    pub fn current() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }
}

/// Ordered, case-insensitive substring patterns. Fixed once built.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    folded: Vec<String>,
}

impl ExclusionSet {
    /// Builds a set from explicit patterns. Blank patterns are dropped, since
    /// an empty substring would match every path.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().with_patterns(patterns)
    }

    /// System, profile and cache patterns for the host platform.
    pub fn defaults_for(profile: &UserProfile) -> Self {
        let (system, subpaths) = if cfg!(windows) {
            (WINDOWS_PATTERNS, WINDOWS_PROFILE_SUBPATHS)
        } else {
            (UNIX_PATTERNS, UNIX_PROFILE_SUBPATHS)
        };

        let profile_patterns = profile.home.iter().flat_map(|home| {
            subpaths.iter().map(move |parts| {
                parts
                    .iter()
                    .fold(home.clone(), |acc, part| acc.join(part))
                    .to_string_lossy()
                    .into_owned()
            })
        });

        Self::new(system.iter().copied())
            .with_patterns(profile_patterns)
            .with_patterns(COMMON_PATTERNS.iter().copied())
    }

    /// Defaults plus `extra_exclusions` and the optional ignore file.
    pub fn from_config(config: &AppConfig, profile: &UserProfile) -> Self {
        let mut set = Self::defaults_for(profile).with_patterns(config.extra_exclusions.iter().cloned());

        if let Some(ignore_file) = &config.ignore_file {
            match load_ignore_rules(ignore_file) {
                Ok(rules) => set = set.with_patterns(rules),
                Err(e) => warn!("Could not read ignore file {:?}: {}", ignore_file, e),
            }
        }

        info!("🚫 {} exclusion patterns active", set.len());
        set
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern: String = pattern.into();
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                continue;
            }
            let folded = trimmed.to_lowercase();
            if self.folded.contains(&folded) {
                continue;
            }
            self.patterns.push(trimmed.to_string());
            self.folded.push(folded);
        }
        self
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern (as written) that occurs in `path`, ignoring case.
    ///
    /// `path` is treated as a folder: a trailing separator is assumed, so
    /// `/tmp/` also matches `/tmp` itself.
    pub fn matching(&self, path: &str) -> Option<&str> {
        let mut path = path.to_lowercase();
        if !path.ends_with(['/', '\\']) {
            path.push('/');
        }
        self.folded
            .iter()
            .position(|pattern| path.contains(pattern.as_str()))
            .map(|i| self.patterns[i].as_str())
    }
}

/// Reads one pattern per line; blank lines and `#` comments are skipped.
pub fn load_ignore_rules(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Decides whether a folder is eligible for tracking.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    exclusions: ExclusionSet,
}

impl PathClassifier {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self { exclusions }
    }

    /// True when any exclusion pattern occurs in `path`. Never fails.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.matching(path).is_some()
    }

    pub fn is_excluded_path(&self, path: &Path) -> bool {
        self.is_excluded(&path.to_string_lossy())
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}
