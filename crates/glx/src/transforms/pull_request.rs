//! 🔀 Pull requests: one parent document plus one `review_comment` document per
//! review comment and per review action, in that order.
//!
//! The forge's PR API has no creation date, so there is no `time_to_close_days`,
//! no `time_open_days` and no `grimoire_creation_date` here.

use serde_json::Value;

use super::actors::{add_actor_profile, add_author_profile, add_role_identity};
use super::comments::rich_review;
use super::fields::{add_project, add_reactions, copy_raw_fields, finish};
use super::EnrichContext;
use crate::common::{EnrichedItem, PULL_TYPE, RawItem};
use crate::errors::ItemError;
use crate::payloads::PullRequestData;

pub(crate) fn enrich(
    ctx: &EnrichContext<'_>,
    item: &RawItem,
    pull: &PullRequestData,
) -> Result<Vec<EnrichedItem>, ItemError> {
    let parent = rich_pull(ctx, item, pull);
    let children = pull
        .all_reviews()
        .map(|review| rich_review(ctx, &parent, review))
        .collect::<Result<Vec<_>, _>>()?;

    let mut docs = Vec::with_capacity(1 + children.len());
    docs.push(parent);
    docs.extend(children);
    Ok(docs)
}

fn rich_pull(ctx: &EnrichContext<'_>, item: &RawItem, pull: &PullRequestData) -> EnrichedItem {
    let mut eitem = EnrichedItem::new();
    copy_raw_fields(item, &mut eitem);

    add_author_profile(&mut eitem, pull.user_data.as_ref());
    add_actor_profile(&mut eitem, "merge_author", pull.merger());

    let id = Value::from(&pull.id);
    eitem.insert("id", id.clone());
    eitem.insert("pull_id", id);
    eitem.insert("pull_id_in_repo", Value::from(&pull.index));
    eitem.insert("issue_id_in_repo", Value::from(&pull.issue.id));
    eitem.insert("repository", item.origin.clone());
    eitem.insert("pull_state", Value::from(&pull.status));
    eitem.insert("pull_updated_at", item.updated_on.clone());
    eitem.insert("pull_merged", pull.merged);
    eitem.insert("pull_merged_at", pull.merged_at.clone());
    for key in ["url", "pull_url", "issue_url"] {
        eitem.insert(key, item.origin.clone());
    }

    add_reactions(&mut eitem, pull.reactions.as_ref());
    eitem.insert("item_type", PULL_TYPE);
    eitem.insert("num_review_comments", pull.comments.total_count);
    // 🚧 needs a PR creation date the API does not give us
    eitem.insert_null("time_to_merge_request_response");

    add_project(ctx, &mut eitem, item.project.as_deref());
    eitem.insert(format!("is_gitlink_{PULL_TYPE}"), 1);

    if ctx.config.sortinghat {
        add_role_identity(&mut eitem, "merged_by_data", pull.merger());
    }

    finish(ctx, &mut eitem);
    eitem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_fixtures::*;
    use crate::transforms::{EnrichConfig, Enricher};
    use serde_json::json;

    #[test]
    fn the_one_where_the_pull_document_has_everything() -> anyhow::Result<()> {
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&pull(), now())?;
        let doc = &docs[0];
        assert_eq!(doc.get("id"), Some(&json!(9)));
        assert_eq!(doc.get("pull_id_in_repo"), Some(&json!(2)));
        assert_eq!(doc.get("issue_id_in_repo"), Some(&json!(33)));
        assert_eq!(doc.get("pull_state"), Some(&json!("merged")));
        assert_eq!(doc.get("pull_updated_at"), Some(&json!(1672567200.0)));
        assert_eq!(doc.get("pull_merged"), Some(&json!(true)));
        assert_eq!(doc.get("pull_url"), Some(&json!(ORIGIN)));
        assert_eq!(doc.get("issue_url"), Some(&json!(ORIGIN)));
        assert_eq!(doc.get("user_name"), Some(&json!("Ana")));
        assert_eq!(doc.get("merge_author_login"), Some(&json!("mo")));
        assert_eq!(doc.get("merge_author_domain"), Some(&json!("example.com")));
        assert_eq!(doc.get("num_review_comments"), Some(&json!(2)));
        assert_eq!(doc.get("time_to_merge_request_response"), Some(&Value::Null));
        assert_eq!(doc.get("reaction_thumb_up"), Some(&json!(1)));
        assert_eq!(doc.get("is_gitlink_pull_request"), Some(&json!(1)));
        assert!(!doc.contains_key("grimoire_creation_date"));
        assert!(!doc.contains_key("issue_title"));
        assert!(!doc.contains_key("pull_created_at"));
        Ok(())
    }

    #[test]
    fn the_one_where_an_unmerged_pull_has_no_merger() -> anyhow::Result<()> {
        let item = raw(
            "pull_request",
            json!({
                "id": 10, "index": 3, "issue": {"id": 34}, "status": "open",
                "merged": false, "merged_at": null,
                "merge_by": {"organizations": []},
                "comments": {"total_count": 0}
            }),
        );
        let config = EnrichConfig {
            sortinghat: true,
            ..EnrichConfig::default()
        };
        let docs = Enricher::new(config).enrich_item_at(&item, now())?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("merge_author_login"), Some(&Value::Null));
        assert_eq!(docs[0].get("merged_by_data_uuid"), Some(&Value::Null));
        assert_eq!(docs[0].get("user_name"), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn the_one_where_a_pull_without_comment_counts_is_malformed() {
        let item = raw(
            "pull_request",
            json!({"id": 10, "index": 3, "issue": {"id": 34}, "status": "open"}),
        );
        assert!(matches!(
            Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now()),
            Err(ItemError::Malformed {
                category: "pull_request",
                ..
            })
        ));
    }
}
