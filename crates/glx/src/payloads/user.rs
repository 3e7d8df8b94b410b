use serde::Deserialize;
use serde_json::Value;

use super::{Reactions, Scalar, lenient};

/// 👤 A forge user as it appears in `*_data` fields and comment authors.
///
/// Every field is optional. The forge uses `{"organizations": []}` as a
/// "this person is unavailable" sentinel, which decodes fine and is then
/// caught by [`User::is_available`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organizations: Option<Vec<Value>>,
}

impl User {
    /// ✅ False for the `{"organizations": []}` sentinel and any other user
    /// with neither a login nor a name.
    pub fn is_available(&self) -> bool {
        self.login.is_some() || self.name.is_some()
    }

    /// 🤖 Bot heuristic: display name ends in `bot`.
    pub fn is_bot(&self) -> bool {
        self.name.as_deref().is_some_and(|n| n.ends_with("bot"))
    }
}

/// 💬 One comment, review comment or review action.
///
/// Reviews ("Approve", "Changes requested") carry `submitted_at` instead of
/// `updated_at`; [`Comment::updated_at`] papers over the difference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: Scalar,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "updated_at")]
    pub raw_updated_at: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_data: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub reactions: Option<Reactions>,
}

impl Comment {
    /// ⏱️ `updated_at`, or `submitted_at` for review actions that only have that.
    pub fn updated_at(&self) -> Option<&str> {
        self.raw_updated_at
            .as_deref()
            .or(self.submitted_at.as_deref())
    }
}
