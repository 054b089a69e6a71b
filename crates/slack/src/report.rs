//! Plain-text report formatting. Replies are a single text block in the
//! team's language, with Slack emoji tokens as status markers.

use chrono::{DateTime, Utc};
use maestro_core::domain::{Culprit, Directory, JobSummary};
use maestro_jenkins::DetailedStatus;

pub const OK: &str = ":heavy_check_mark:";
pub const NOT_OK: &str = ":x:";
pub const BUILDING: &str = ":hammer:";

fn greeting(user: Option<&str>) -> String {
    match user {
        Some(name) => format!("Bom dia {name}"),
        None => "Bom dia".to_string(),
    }
}

/// One line per job, in input order: check/cross marker, then the name, with
/// a hammer appended while a build is running. The check requires settled
/// green; a job mid-rebuild shows a cross until the build lands.
pub fn job_listing(jobs: &[JobSummary]) -> String {
    let mut listing = String::new();
    for job in jobs {
        let marker = if job.state.is_green() { OK } else { NOT_OK };
        listing.push_str(marker);
        listing.push_str("\t-\t");
        listing.push_str(&job.name);
        if job.state.is_building() {
            listing.push(' ');
            listing.push_str(BUILDING);
        }
        listing.push('\n');
    }
    listing
}

/// Morning-build reply: aggregate pass/fail headline plus the full listing.
pub fn greeting_report(user: Option<&str>, jobs: &[JobSummary]) -> String {
    let has_failures = jobs.iter().any(|job| !job.state.is_green());

    let mut message = format!("{}, você criou uma GM ", greeting(user));
    if has_failures {
        message.push_str("com os testes *QUEBRADOS!*\n");
    } else {
        message.push_str("e todos os testes estão passando!\n");
    }
    message.push_str(&job_listing(jobs));
    message
}

/// Status reply: greeting plus the listing, no aggregate headline.
pub fn status_summary(user: Option<&str>, jobs: &[JobSummary]) -> String {
    format!("{}, os status do jenkins são:\n{}", greeting(user), job_listing(jobs))
}

/// Maps a Jenkins weather icon token to a Slack emoji.
pub fn health_emoji(icon: &str) -> &'static str {
    if icon.contains("80plus") {
        ":sunny:"
    } else if icon.contains("60to79") {
        ":partly_sunny:"
    } else if icon.contains("40to59") {
        ":cloud:"
    } else if icon.contains("20to39") {
        ":rain_cloud:"
    } else if icon.contains("00to19") {
        ":thunder_cloud_and_rain:"
    } else {
        ":grey_question:"
    }
}

/// Single-job detail reply.
///
/// Passing jobs report how long they have been green (time since the last
/// unsuccessful build); broken jobs report how long they have been broken
/// (time since the last successful build) and blame the culprits of the
/// latest build. Either duration is omitted when the contrasting build does
/// not exist.
pub fn job_detail(
    user: Option<&str>,
    detail: &DetailedStatus,
    users: &Directory,
    jenkins_base_url: &str,
    now: DateTime<Utc>,
) -> String {
    let job = &detail.job;
    let since = detail
        .contrast_build
        .as_ref()
        .and_then(|build| build.timestamp)
        .map(|timestamp| relative_duration(timestamp, now));

    let mut message = greeting(user);
    let verdict = if job.state.is_passing() { "passando" } else { "quebrado" };
    match since {
        Some(duration) => message.push_str(&format!(
            ", o job *{}* está {verdict} há {duration}!\n",
            job.display_name
        )),
        None => message.push_str(&format!(", o job *{}* está {verdict}!\n", job.display_name)),
    }

    if !job.health.is_empty() {
        message.push_str("Saúde do job:\n");
        for entry in &job.health {
            message.push_str(&format!(
                "{}\t-\t{}\n",
                health_emoji(&entry.icon),
                entry.description
            ));
        }
    }

    if !job.state.is_passing() {
        if let Some(build) = &detail.last_build {
            if !build.culprits.is_empty() {
                message.push_str("Culpados:\n");
                for culprit in &build.culprits {
                    message.push_str(&culprit_mention(culprit, users, jenkins_base_url));
                    message.push('\n');
                }
            }
        }
    }

    message
}

/// Resolves a culprit to a Slack mention. The Jenkins username recovered
/// from the attribution URL is looked up in the user directory; when the
/// lookup misses, only the mention literal `<@username>` is emitted and it
/// will not resolve in Slack. That mirrors the production behavior on
/// purpose; there is no agreed fallback. An attribution URL pointing at a
/// different server yields the culprit's plain full name instead.
pub fn culprit_mention(culprit: &Culprit, users: &Directory, jenkins_base_url: &str) -> String {
    match culprit.username(jenkins_base_url) {
        Some(username) => match users.id_for(username) {
            Some(id) => format!("<@{id}>"),
            None => format!("<@{username}>"),
        },
        None => culprit.full_name.clone(),
    }
}

/// Coarse relative-duration buckets, newest first: seconds, minutes, hours,
/// days. A timestamp in the future clamps to "alguns segundos".
pub fn relative_duration(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - from).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "alguns segundos".to_string()
    } else if minutes < 60 {
        plural(minutes, "minuto", "minutos")
    } else if hours < 24 {
        plural(hours, "hora", "horas")
    } else {
        plural(days, "dia", "dias")
    }
}

fn plural(count: i64, singular: &str, many: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {many}")
    }
}
