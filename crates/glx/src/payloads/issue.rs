use serde::Deserialize;
use serde_json::Value;

use super::{Comment, Reactions, Scalar, User, lenient, null_as_empty};

/// 🐛 An issue payload.
///
/// Required: `id`, `html_url`, `status`, `created_at`. Everything else may be
/// missing and is treated as `None` / empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IssueData {
    pub id: Scalar,
    pub html_url: String,
    pub status: IssueStatus,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_data: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee_data: Option<User>,
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments_data: Vec<Comment>,
    #[serde(default, deserialize_with = "lenient")]
    pub reactions: Option<Reactions>,
    #[serde(default)]
    pub head: Option<Value>,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl IssueData {
    /// 🔢 Status codes 1 (new) and 2 (processing) mean the issue is still open.
    pub fn is_open(&self) -> bool {
        matches!(self.status.id, 1 | 2)
    }

    /// 🔗 Issue number within the repo: last path segment of the web URL.
    pub fn id_in_repo(&self) -> &str {
        self.html_url.rsplit('/').next().unwrap_or_default()
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .flatten()
            .filter_map(|label| label.name.clone())
            .collect()
    }

    /// 🔀 An "issue" that carries `head` or `pull_request` is really a PR in disguise.
    pub fn is_pull_request(&self) -> bool {
        self.head.is_some() || self.pull_request.is_some()
    }

    /// 👤 Login of whoever opened the issue, if the forge told us.
    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.login.as_deref())
    }
}

/// 🚦 `{ "id": 1..5, "name": "新增" | ... }` — 1 new, 2 processing, 3 resolved, 4 closed, 5 refused.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IssueStatus {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn the_one_where_an_issue_knows_its_own_number() -> anyhow::Result<()> {
        let issue: IssueData = serde_json::from_value(json!({
            "id": 101,
            "html_url": "https://www.gitlink.org.cn/owner/repo/issues/7",
            "status": {"id": 3, "name": "已解决"},
            "created_at": "2023-01-01 10:00",
            "labels": [{"name": "bug"}, {"name": "help wanted"}],
            "comments_data": null
        }))?;
        assert_eq!(issue.id_in_repo(), "7");
        assert!(!issue.is_open());
        assert_eq!(issue.label_names(), vec!["bug", "help wanted"]);
        assert!(issue.comments_data.is_empty());
        assert!(!issue.is_pull_request());
        Ok(())
    }
}
