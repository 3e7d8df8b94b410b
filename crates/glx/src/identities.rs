//! 🪪 Identities — who touched this item, and how to forget them.
//!
//! 🎬 COLD OPEN — INT. RECORDS OFFICE — THE FILING CABINET MARKED "PEOPLE"
//!
//! Every issue has an author. Some have an assignee. Pull requests have
//! whoever pressed the merge button. Comments have commenters. The identity
//! subsystem wants a list of all of them; the privacy officer wants all of
//! them replaced with hashes. This module serves both customers.
//!
//! Both operations walk the raw `data` as an untyped [`Value`] rather than the
//! typed payloads: an item too broken to enrich can still have people in it.
//!
//! 🧠 Knowledge graph:
//! - Roles: issue `author` / `assignee`, pull request `merged_by`
//! - Commenters: `comments_data` (issues), `review_comments_data` + `reviews_data` (pulls)
//! - Used by: the `identities` / `anonymize` CLI commands, and `transforms::actors`
//!   for the `<role>_uuid` fields when identity enrichment is on. 🦆

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::common::{ISSUE_TYPE, PULL_TYPE, RawItem};
use crate::payloads::User;

/// 🏷️ Source name baked into every identity uuid.
pub const IDENTITY_SOURCE: &str = "gitlink";

/// 🪪 One person as the identity database wants to see them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// 🔁 `name` and `username` both fall back to `login` when the forge left them out.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone().or_else(|| user.login.clone()),
            name: user.name.clone().or_else(|| user.login.clone()),
            email: user.email.clone(),
        }
    }

    fn from_value(user: &Value) -> Option<Self> {
        let obj = user.as_object().filter(|o| !o.is_empty())?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            username: text("username").or_else(|| text("login")),
            name: text("name").or_else(|| text("login")),
            email: text("email"),
        })
    }

    /// 🔑 Deterministic id: `sha256("gitlink:email:name:username")`, lowercased first.
    pub fn uuid(&self) -> String {
        identity_uuid(
            IDENTITY_SOURCE,
            self.email.as_deref(),
            self.name.as_deref(),
            self.username.as_deref(),
        )
    }
}

/// 🔑 Hex SHA-256 of `source:email:name:username`, missing parts as empty strings.
pub fn identity_uuid(
    source: &str,
    email: Option<&str>,
    name: Option<&str>,
    username: Option<&str>,
) -> String {
    let key = format!(
        "{source}:{}:{}:{}",
        email.unwrap_or_default(),
        name.unwrap_or_default(),
        username.unwrap_or_default()
    )
    .to_lowercase();
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// 🙈 One-way hash used for anonymization.
pub fn hash_value(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// 🎭 Which data keys hold role actors and which hold comment lists, per category.
fn actor_layout(category: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match category {
        ISSUE_TYPE => (&["author", "assignee"], &["comments_data"]),
        PULL_TYPE => (&["merged_by"], &["review_comments_data", "reviews_data"]),
        _ => (&[], &[]),
    }
}

/// 🤷 Truthiness: null, false, 0, "", [] and {} all mean "nobody".
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// 🔍 Every user object hanging off the item, roles first, commenters after.
fn actor_values(item: &RawItem) -> impl Iterator<Item = &Value> {
    let data = &item.data;
    let (roles, comment_lists) = actor_layout(&item.category);

    let role_actors = roles
        .iter()
        .filter(move |role| is_truthy(data.get(**role)))
        .filter_map(move |role| data.get(format!("{role}_data").as_str()));

    let commenters = comment_lists
        .iter()
        .filter_map(move |key| data.get(*key).and_then(Value::as_array))
        .flatten()
        .filter_map(|comment| comment.get("user_data"));

    role_actors.chain(commenters)
}

/// 📇 Lazily yield the distinct identities of an item.
///
/// A role counts only when its bare field is non-empty and `<role>_data` is
/// present. Identities without a username are skipped. Duplicates are
/// yielded once, in order of first appearance.
pub fn identities(item: &RawItem) -> impl Iterator<Item = Identity> + '_ {
    let mut seen = HashSet::new();
    actor_values(item)
        .filter_map(Identity::from_value)
        .filter(|identity| identity.username.is_some())
        .filter(move |identity| seen.insert(identity.clone()))
}

fn hashed_login(user: &Value) -> Value {
    user.get("login")
        .and_then(Value::as_str)
        .map(|login| Value::String(hash_value(login)))
        .unwrap_or(Value::Null)
}

fn anonymous_login(user: &Value) -> Value {
    json!({ "login": hashed_login(user) })
}

fn anonymous_profile(user: &Value) -> Value {
    let login = hashed_login(user);
    json!({
        "name": login.clone(),
        "login": login,
        "email": null,
        "company": null,
        "location": null,
    })
}

fn anonymize_comment(comment: &mut Map<String, Value>) {
    if let Some(user) = comment.get_mut("user").filter(|u| is_truthy(Some(&**u))) {
        *user = anonymous_login(user);
    }
    if let Some(user) = comment.get_mut("user_data").filter(|u| is_truthy(Some(&**u))) {
        *user = anonymous_profile(user);
    }
    let reactions = comment
        .get_mut("reactions_data")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten();
    for reaction in reactions {
        if let Some(user) = reaction.get_mut("user").filter(|u| is_truthy(Some(&**u))) {
            *user = anonymous_login(user);
        }
    }
}

/// 🙈 Replace every personal field in the item with a hash or a null, in place.
///
/// - bare role (`author`) → `{login: hash(login)}`
/// - `<role>_data` → `{name: hash(login), login: hash(login), email/company/location: null}`
/// - comment `user` / `user_data` likewise, and each `reactions_data[].user`
///
/// Everything outside those paths is left alone.
pub fn anonymize_item(item: &mut RawItem) {
    let (roles, comment_lists) = actor_layout(&item.category);
    let Some(data) = item.data.as_object_mut() else {
        return;
    };

    for role in roles {
        if !is_truthy(data.get(*role)) {
            continue;
        }
        if let Some(bare) = data.get_mut(*role) {
            *bare = anonymous_login(bare);
        }
        if let Some(profile) = data.get_mut(&format!("{role}_data")) {
            *profile = anonymous_profile(profile);
        }
    }

    for key in comment_lists {
        let comments = data
            .get_mut(*key)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut);
        for comment in comments {
            anonymize_comment(comment);
        }
    }
}
