use serde::Deserialize;

use super::{Comment, Reactions, Scalar, User, lenient, null_as_empty};

/// 🔀 A pull request payload.
///
/// The forge's PR API has no `created_at`, `closed_at`, `title` or labels, so
/// neither do we. `merged_by` shows up as `merge_by` in some fetcher versions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestData {
    pub id: Scalar,
    pub index: Scalar,
    pub issue: PullIssueRef,
    pub status: Scalar,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub merged_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_data: Option<User>,
    #[serde(default, alias = "merge_by", deserialize_with = "lenient")]
    pub merged_by: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub merged_by_data: Option<User>,
    pub comments: PullComments,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub review_comments_data: Vec<Comment>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reviews_data: Vec<Comment>,
    #[serde(default, deserialize_with = "lenient")]
    pub reactions: Option<Reactions>,
}

impl PullRequestData {
    /// 🧑‍⚖️ Whoever merged it, unless the forge handed us the unavailable sentinel.
    pub fn merger(&self) -> Option<&User> {
        self.merged_by
            .as_ref()
            .or(self.merged_by_data.as_ref())
            .filter(|u| u.is_available())
    }

    /// 💬 Review comments first, then review actions. Order matters for the fan-out.
    pub fn all_reviews(&self) -> impl Iterator<Item = &Comment> {
        self.review_comments_data.iter().chain(self.reviews_data.iter())
    }
}

/// 🔗 The issue a PR is attached to. Only the id is of interest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullIssueRef {
    pub id: Scalar,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullComments {
    pub total_count: i64,
}
