//! 🧩 Fields every enriched document gets, whatever its type.
//!
//! Raw pass-through, metadata stamp, project and label decoration, grimoire
//! date, reactions. The per-type modules call these in the same order every
//! time so that two documents of different types still look like siblings.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::EnrichContext;
use super::dates::to_iso;
use crate::common::{EnrichedItem, RawItem};
use crate::payloads::Reactions;

/// 👻 Stand-in login for comments whose author deleted their account.
pub(crate) const DELETED_USER_LOGIN: &str = "Deleted user login";
pub(crate) const DELETED_USER_NAME: &str = "Deleted user";

pub(crate) const BACKEND_NAME: &str = "GitlinkEnrich";
pub(crate) const ENRICHER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 📋 Envelope fields copied verbatim into every document.
pub(crate) const RAW_FIELDS_COPY: [&str; 6] = [
    "metadata__updated_on",
    "metadata__timestamp",
    "offset",
    "origin",
    "tag",
    "uuid",
];

pub(crate) fn copy_raw_fields(item: &RawItem, eitem: &mut EnrichedItem) {
    for (key, value) in item.raw_fields() {
        eitem.insert(key, value);
    }
}

/// 👨‍👧 Children take the envelope fields from their parent document, not the raw item.
pub(crate) fn copy_parent_fields(parent: &EnrichedItem, keys: &[&str], eitem: &mut EnrichedItem) {
    for key in keys {
        eitem.insert(*key, parent.get_or_null(key));
    }
}

/// 🗂️ Project from the configured map (by origin), overridden by an explicit project.
pub(crate) fn add_project(ctx: &EnrichContext<'_>, eitem: &mut EnrichedItem, explicit: Option<&str>) {
    let mapped = eitem
        .get("origin")
        .and_then(Value::as_str)
        .and_then(|origin| ctx.config.projects.get(origin))
        .cloned();
    if let Some(project) = mapped {
        eitem.insert("project", project.clone());
        eitem.insert("project_1", project);
    }
    if let Some(project) = explicit {
        eitem.insert("project", project);
    }
}

/// 📅 `grimoire_creation_date` plus the `is_gitlink_<type>` flag.
pub(crate) fn add_grimoire_fields(
    eitem: &mut EnrichedItem,
    created: Option<DateTime<Utc>>,
    item_type: &str,
) {
    eitem.insert("grimoire_creation_date", created.as_ref().map(to_iso));
    eitem.insert(format!("is_gitlink_{item_type}"), 1);
}

/// 🎭 `reaction_<name>` per counter. `+1`/`-1` get readable names, `url` is dropped.
pub(crate) fn add_reactions(eitem: &mut EnrichedItem, reactions: Option<&Reactions>) {
    for (name, count) in reactions.into_iter().flatten() {
        let name = match name.as_str() {
            "url" => continue,
            "+1" => "thumb_up",
            "-1" => "thumb_down",
            other => other,
        };
        eitem.insert(format!("reaction_{name}"), count.clone());
    }
}

/// 🏁 Labels, raw filter and metadata stamp. The last thing every document gets.
pub(crate) fn finish(ctx: &EnrichContext<'_>, eitem: &mut EnrichedItem) {
    if let Some(labels) = &ctx.config.repository_labels {
        eitem.insert("repository_labels", labels.clone());
    }
    if let Some(filter) = &ctx.config.filter_raw {
        eitem.insert("metadata__filter_raw", filter.as_str());
    }
    eitem.insert("metadata__gelk_version", ENRICHER_VERSION);
    eitem.insert("metadata__gelk_backend_name", BACKEND_NAME);
    eitem.insert("metadata__enriched_on", to_iso(&ctx.now));
}

/// 📧 Everything after the `@`, or `None` if there is no usable domain.
pub(crate) fn email_domain(email: Option<&str>) -> Option<String> {
    email
        .and_then(|e| e.split_once('@'))
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
}

/// ✂️ First `max` characters, never splitting a code point.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
