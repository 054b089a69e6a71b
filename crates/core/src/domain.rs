use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Build state derived once from the raw Jenkins color token: the pass/fail
/// verdict plus an in-progress flag.
///
/// Jenkins reports color as a free-form string and appends `_anime` while a
/// build is running, so both facets come from substring containment rather
/// than equality. The modifier never flips the verdict: `blue_anime` is a
/// passing job with a rebuild in flight. Downstream code reads this struct
/// and never re-reads the raw token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildState {
    passing: bool,
    building: bool,
}

impl BuildState {
    pub fn from_color(raw: &str) -> Self {
        let color = raw.trim().to_ascii_lowercase();
        Self { passing: color.contains("blue"), building: color.contains("anime") }
    }

    pub fn is_passing(self) -> bool {
        self.passing
    }

    pub fn is_building(self) -> bool {
        self.building
    }

    /// Settled green: passing with no build in flight. The listing marker
    /// and the morning headline count a running rebuild as not-ok until it
    /// lands.
    pub fn is_green(self) -> bool {
        self.passing && !self.building
    }
}

/// One row of the per-view listing: job name plus its classified state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSummary {
    pub name: String,
    pub state: BuildState,
}

impl JobSummary {
    pub fn from_color(name: impl Into<String>, color: &str) -> Self {
        Self { name: name.into(), state: BuildState::from_color(color) }
    }
}

/// Reference to a numbered build of a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildRef {
    pub number: u32,
}

/// Jenkins job health entry (the "weather report").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthReport {
    pub score: u8,
    pub description: String,
    pub icon: String,
}

/// Contributor blamed for a broken build, as reported by Jenkins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Culprit {
    pub full_name: String,
    pub absolute_url: String,
}

impl Culprit {
    /// Recovers the Jenkins username from the culprit's attribution URL by
    /// stripping the `{base_url}/user/` prefix. Returns `None` when the URL
    /// does not point at the expected server.
    pub fn username<'a>(&'a self, base_url: &str) -> Option<&'a str> {
        let rest = self.absolute_url.strip_prefix(base_url)?;
        let name = rest.trim_start_matches('/').strip_prefix("user/")?;
        let name = name.trim_end_matches('/');
        (!name.is_empty()).then_some(name)
    }
}

/// Job metadata needed for the detail reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobDetail {
    pub name: String,
    pub display_name: String,
    pub state: BuildState,
    pub health: Vec<HealthReport>,
    pub last_build: Option<BuildRef>,
    pub last_successful_build: Option<BuildRef>,
    pub last_unsuccessful_build: Option<BuildRef>,
}

/// Resolved build detail, including blame attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    pub number: u32,
    pub timestamp: Option<DateTime<Utc>>,
    pub culprits: Vec<Culprit>,
}

/// Immutable id → display-name snapshot built once at bootstrap.
///
/// Also keeps the reverse mapping so culprit usernames can be resolved back
/// to mentionable ids. Handlers share it read-only; no interior mutability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    by_id: HashMap<String, String>,
    by_name: HashMap<String, String>,
}

impl Directory {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (id, name) in entries {
            let id = id.into();
            let name = name.into();
            by_name.insert(name.clone(), id.clone());
            by_id.insert(id, name);
        }
        Self { by_id, by_name }
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn id_for(&self, display_name: &str) -> Option<&str> {
        self.by_name.get(display_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
