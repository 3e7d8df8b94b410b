//! 💬 Comment fan-out: issue comments, PR review comments and PR review actions.
//!
//! Every child document copies a slice of its parent (whatever the parent has,
//! `null` for whatever it doesn't), then adds its own body, reactions, dates
//! and author. Ids are `<parent id>_<sub type>_<comment id>` so children of
//! different parents and types can share one index without stepping on each other.

use super::actors::add_role_identity;
use super::dates::parse_datetime;
use super::fields::{
    DELETED_USER_LOGIN, DELETED_USER_NAME, RAW_FIELDS_COPY, add_grimoire_fields, add_project,
    add_reactions, copy_parent_fields, finish, truncate_chars,
};
use super::EnrichContext;
use crate::common::{COMMENT_TYPE, EnrichedItem, ISSUE_COMMENT_TYPE, REVIEW_COMMENT_TYPE};
use crate::errors::ItemError;
use crate::payloads::{Comment, User};

/// 📋 What an issue comment inherits from its issue.
const ISSUE_PARENT_FIELDS: &[&str] = &[
    "issue_labels",
    "issue_id",
    "issue_id_in_repo",
    "issue_url",
    "issue_title",
    "issue_state",
    "issue_created_at",
    "issue_updated_at",
    "issue_pull_request",
    "gitlink_repo",
    "repository",
];

/// 📋 What a review comment inherits from its pull request.
const PULL_PARENT_FIELDS: &[&str] = &[
    "pull_labels",
    "pull_id",
    "pull_id_in_repo",
    "issue_id_in_repo",
    "issue_title",
    "issue_url",
    "pull_url",
    "pull_state",
    "pull_created_at",
    "pull_updated_at",
    "pull_merged_at",
    "pull_closed_at",
    "pull_merged",
    "gitlink_repo",
    "repository",
];

pub(crate) fn rich_issue_comment(
    ctx: &EnrichContext<'_>,
    parent: &EnrichedItem,
    comment: &Comment,
) -> Result<EnrichedItem, ItemError> {
    let updated_at = comment.updated_at().ok_or(ItemError::MissingField {
        category: ISSUE_COMMENT_TYPE,
        field: "updated_at",
    })?;

    let mut ecomment = EnrichedItem::new();
    copy_parent_fields(parent, &RAW_FIELDS_COPY, &mut ecomment);
    copy_parent_fields(parent, ISSUE_PARENT_FIELDS, &mut ecomment);
    ecomment.insert("issue_closed_at", parent.get_or_null("closed_at"));
    ecomment.insert("item_type", COMMENT_TYPE);
    ecomment.insert("sub_type", ISSUE_COMMENT_TYPE);

    add_body(ctx, &mut ecomment, comment);
    add_reactions(&mut ecomment, comment.reactions.as_ref());
    ecomment.insert("comment_updated_at", updated_at);

    add_common_tail(ctx, parent, &mut ecomment, comment, ISSUE_COMMENT_TYPE, updated_at);
    Ok(ecomment)
}

/// 🔍 Review comments and review actions share a shape; actions only carry `submitted_at`.
pub(crate) fn rich_review(
    ctx: &EnrichContext<'_>,
    parent: &EnrichedItem,
    comment: &Comment,
) -> Result<EnrichedItem, ItemError> {
    let updated_at = comment.updated_at().ok_or(ItemError::MissingField {
        category: REVIEW_COMMENT_TYPE,
        field: "updated_at",
    })?;

    let mut ecomment = EnrichedItem::new();
    copy_parent_fields(parent, &RAW_FIELDS_COPY, &mut ecomment);
    ecomment.insert("review_state", comment.state.as_deref().unwrap_or_default());
    copy_parent_fields(parent, PULL_PARENT_FIELDS, &mut ecomment);
    ecomment.insert("item_type", COMMENT_TYPE);
    ecomment.insert("sub_type", REVIEW_COMMENT_TYPE);

    add_body(ctx, &mut ecomment, comment);
    ecomment.insert("url", comment.html_url.clone());
    add_reactions(&mut ecomment, comment.reactions.as_ref());
    ecomment.insert("comment_updated_at", updated_at);
    ecomment.insert(
        "comment_created_at",
        comment.created_at.as_deref().unwrap_or(updated_at),
    );

    add_common_tail(ctx, parent, &mut ecomment, comment, REVIEW_COMMENT_TYPE, updated_at);
    Ok(ecomment)
}

fn add_body(ctx: &EnrichContext<'_>, ecomment: &mut EnrichedItem, comment: &Comment) {
    let body = comment.body.as_deref();
    ecomment.insert(
        "body",
        body.map(|b| truncate_chars(b, ctx.config.keyword_max_length)),
    );
    ecomment.insert("body_analyzed", body);
}

/// 🧵 Id, grimoire fields, author, project and the stamp. Same for every comment flavour.
fn add_common_tail(
    ctx: &EnrichContext<'_>,
    parent: &EnrichedItem,
    ecomment: &mut EnrichedItem,
    comment: &Comment,
    sub_type: &str,
    updated_at: &str,
) {
    let parent_id = parent.id_string("id").unwrap_or_default();
    ecomment.insert("id", format!("{parent_id}_{sub_type}_{}", comment.id));
    add_grimoire_fields(ecomment, parse_datetime(updated_at), sub_type);
    ecomment.insert("is_gitlink_comment", 1);

    let author = commenter(comment);
    ecomment.insert("user_login", author.login.clone());
    if ctx.config.sortinghat {
        add_role_identity(ecomment, "author_data", Some(&author));
    }

    let parent_project = parent
        .get("project")
        .and_then(|p| p.as_str())
        .map(str::to_string);
    add_project(ctx, ecomment, parent_project.as_deref());
    finish(ctx, ecomment);
}

/// 👻 The comment's `user_data`, or the deleted-user stand-in.
fn commenter(comment: &Comment) -> User {
    comment
        .user_data
        .clone()
        .filter(User::is_available)
        .unwrap_or_else(|| User {
            login: Some(DELETED_USER_LOGIN.to_string()),
            name: Some(DELETED_USER_NAME.to_string()),
            ..User::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_fixtures::*;
    use crate::transforms::{EnrichConfig, Enricher};
    use serde_json::{Value, json};

    #[test]
    fn the_one_where_issue_comments_inherit_from_their_issue() -> anyhow::Result<()> {
        let item = issue(3, json!([comment(7, Some("bo"), "Bo", "2023-01-02T10:00:00")]));
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now())?;
        let parent = &docs[0];
        let child = &docs[1];

        assert_eq!(child.get("id"), Some(&json!("101_issue_comment_7")));
        assert_eq!(child.get("item_type"), Some(&json!("comment")));
        assert_eq!(child.get("sub_type"), Some(&json!("issue_comment")));
        assert_eq!(child.get("issue_id"), parent.get("issue_id"));
        assert_eq!(child.get("issue_labels"), Some(&json!(["bug"])));
        assert_eq!(child.get("issue_title"), Some(&json!("Crash on startup")));
        assert_eq!(child.get("repository"), Some(&json!(ORIGIN)));
        assert_eq!(child.get("uuid"), parent.get("uuid"));
        assert_eq!(child.get("issue_url"), Some(&Value::Null), "never set on the parent");
        assert_eq!(child.get("issue_closed_at"), Some(&Value::Null));
        assert_eq!(child.get("gitlink_repo"), Some(&Value::Null));
        assert_eq!(child.get("body"), Some(&json!("comment 7")));
        assert_eq!(child.get("user_login"), Some(&json!("bo")));
        assert_eq!(child.get("comment_updated_at"), Some(&json!("2023-01-02T10:00:00")));
        assert_eq!(
            child.get("grimoire_creation_date"),
            Some(&json!("2023-01-02T10:00:00+00:00"))
        );
        assert_eq!(child.get("is_gitlink_issue_comment"), Some(&json!(1)));
        assert_eq!(child.get("is_gitlink_comment"), Some(&json!(1)));
        assert!(child.contains_key("metadata__enriched_on"));
        Ok(())
    }

    #[test]
    fn the_one_where_long_bodies_are_clipped_but_still_searchable() -> anyhow::Result<()> {
        let long = "字".repeat(30);
        let item = issue(
            3,
            json!([{
                "id": 1, "body": long, "updated_at": "2023-01-02T10:00:00",
                "user_data": null
            }]),
        );
        let config = EnrichConfig {
            keyword_max_length: 10,
            ..EnrichConfig::default()
        };
        let docs = Enricher::new(config).enrich_item_at(&item, now())?;
        assert_eq!(docs[1].get("body"), Some(&json!("字".repeat(10))));
        assert_eq!(docs[1].get("body_analyzed"), Some(&json!(long)));
        assert_eq!(docs[1].get("user_login"), Some(&json!(DELETED_USER_LOGIN)));
        Ok(())
    }

    #[test]
    fn the_one_where_a_dateless_comment_sinks_its_issue() {
        let item = issue(3, json!([{"id": 1, "body": "when?"}]));
        let result = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now());
        assert!(matches!(
            result,
            Err(ItemError::MissingField {
                field: "updated_at",
                ..
            })
        ));
    }

    #[test]
    fn the_one_where_children_follow_the_parent_project() -> anyhow::Result<()> {
        let mut item = issue(3, json!([comment(1, Some("bo"), "Bo", "2023-01-02T10:00:00")]));
        item.project = Some("envelope-project".into());
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now())?;
        assert_eq!(docs[0].get("project"), Some(&json!("envelope-project")));
        assert_eq!(docs[1].get("project"), Some(&json!("envelope-project")));
        Ok(())
    }

    #[test]
    fn the_one_where_reviews_and_review_comments_share_a_mold() -> anyhow::Result<()> {
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&pull(), now())?;
        assert_eq!(docs.len(), 3);

        let review_comment = &docs[1];
        assert_eq!(review_comment.get("id"), Some(&json!("9_review_comment_1")));
        assert_eq!(review_comment.get("review_state"), Some(&json!("")));
        assert_eq!(review_comment.get("pull_id"), Some(&json!(9)));
        assert_eq!(review_comment.get("pull_merged"), Some(&json!(true)));
        assert_eq!(review_comment.get("pull_created_at"), Some(&Value::Null));
        assert_eq!(review_comment.get("url"), Some(&json!(format!("{ORIGIN}/pulls/2#1"))));
        assert_eq!(
            review_comment.get("comment_created_at"),
            Some(&json!("2023-01-02T10:00:00"))
        );
        assert_eq!(review_comment.get("user_login"), Some(&json!("rita")));

        let review = &docs[2];
        assert_eq!(review.get("id"), Some(&json!("9_review_comment_2")));
        assert_eq!(review.get("review_state"), Some(&json!("APPROVED")));
        assert_eq!(
            review.get("comment_updated_at"),
            Some(&json!("2023-01-03T10:00:00")),
            "submitted_at stands in for updated_at"
        );
        assert_eq!(review.get("comment_created_at"), review.get("comment_updated_at"));
        assert_eq!(review.get("user_login"), Some(&json!(DELETED_USER_LOGIN)));
        assert_eq!(review.get("is_gitlink_review_comment"), Some(&json!(1)));
        Ok(())
    }

    #[test]
    fn the_one_where_ghost_commenters_still_get_an_identity() -> anyhow::Result<()> {
        let config = EnrichConfig {
            sortinghat: true,
            ..EnrichConfig::default()
        };
        let item = issue(3, json!([comment(1, None, "", "2023-01-02T10:00:00")]));
        let docs = Enricher::new(config).enrich_item_at(&item, now())?;
        assert_eq!(docs[1].get("author_data_name"), Some(&json!(DELETED_USER_NAME)));
        assert_eq!(docs[1].get("author_data_user_name"), Some(&json!(DELETED_USER_LOGIN)));
        Ok(())
    }
}
