//! 🐛 Issues: one parent document plus one `issue_comment` document per comment.

use chrono::{DateTime, Utc};

use super::actors::{add_actor_profile, add_author_profile, add_role_identity};
use super::comments::rich_issue_comment;
use super::dates::{days_between, parse_datetime};
use super::fields::{
    DELETED_USER_LOGIN, add_grimoire_fields, add_project, add_reactions, copy_raw_fields, finish,
};
use super::EnrichContext;
use crate::common::{EnrichedItem, ISSUE_TYPE, RawItem};
use crate::errors::ItemError;
use crate::payloads::{Comment, IssueData};

pub(crate) fn enrich(
    ctx: &EnrichContext<'_>,
    item: &RawItem,
    issue: &IssueData,
) -> Result<Vec<EnrichedItem>, ItemError> {
    let parent = rich_issue(ctx, item, issue);
    let children = issue
        .comments_data
        .iter()
        .map(|comment| rich_issue_comment(ctx, &parent, comment))
        .collect::<Result<Vec<_>, _>>()?;

    let mut docs = Vec::with_capacity(1 + children.len());
    docs.push(parent);
    docs.extend(children);
    Ok(docs)
}

fn rich_issue(ctx: &EnrichContext<'_>, item: &RawItem, issue: &IssueData) -> EnrichedItem {
    let mut eitem = EnrichedItem::new();
    copy_raw_fields(item, &mut eitem);

    let created = parse_datetime(&issue.created_at);
    let finished = issue.finished_at.as_deref().and_then(parse_datetime);
    let time_to_close = days_between(created, finished);
    eitem.insert("time_to_close_days", time_to_close);
    // ⏳ still open: count up to now; otherwise it stopped counting when it closed
    let time_open = if issue.is_open() {
        days_between(created, Some(ctx.now))
    } else {
        time_to_close
    };
    eitem.insert("time_open_days", time_open);

    eitem.insert("user_login", issue.author_login());
    add_author_profile(&mut eitem, issue.author_data.as_ref());
    add_actor_profile(&mut eitem, "assignee", issue.assignee_data.as_ref());

    let id = serde_json::Value::from(&issue.id);
    eitem.insert("id", id.clone());
    eitem.insert("issue_id", id);
    eitem.insert("issue_id_in_repo", issue.id_in_repo());
    eitem.insert("repository", item.origin.clone());
    eitem.insert("issue_title", issue.title.clone());
    eitem.insert("issue_title_analyzed", issue.title.clone());
    eitem.insert("issue_state", issue.status.name.clone());
    eitem.insert("issue_created_at", issue.created_at.as_str());
    eitem.insert("issue_updated_at", issue.updated_at.clone());

    add_reactions(&mut eitem, issue.reactions.as_ref());
    eitem.insert("issue_labels", issue.label_names());
    eitem.insert("item_type", ISSUE_TYPE);
    eitem.insert("issue_pull_request", issue.is_pull_request());

    add_project(ctx, &mut eitem, item.project.as_deref());
    add_attention_fields(&mut eitem, issue, created);
    add_grimoire_fields(&mut eitem, created, ISSUE_TYPE);

    if ctx.config.sortinghat {
        add_role_identity(&mut eitem, "author_data", issue.author_data.as_ref());
        add_role_identity(&mut eitem, "assignee_data", issue.assignee_data.as_ref());
    }

    finish(ctx, &mut eitem);
    eitem
}

/// 👀 Who got there first, and how long it took them.
fn add_attention_fields(
    eitem: &mut EnrichedItem,
    issue: &IssueData,
    created: Option<DateTime<Utc>>,
) {
    if issue.comments_data.is_empty() {
        eitem.insert_null("time_to_first_attention");
        return;
    }

    let author = issue.author_login();
    let from_others: Vec<&Comment> = issue
        .comments_data
        .iter()
        .filter(|c| Some(commenter_login(c)) != author)
        .collect();
    let humans: Vec<&Comment> = from_others
        .iter()
        .copied()
        .filter(|c| !c.user.as_ref().is_some_and(|u| u.is_bot()))
        .collect();

    eitem.insert(
        "time_to_first_attention",
        days_between(created, earliest(&from_others)),
    );
    eitem.insert("num_of_comments_without_bot", humans.len());
    eitem.insert(
        "time_to_first_attention_without_bot",
        days_between(created, earliest(&humans)),
    );
}

/// 👻 Ghost commenters (no `user`) are all the same deleted person.
fn commenter_login(comment: &Comment) -> &str {
    comment
        .user
        .as_ref()
        .and_then(|u| u.login.as_deref())
        .unwrap_or(DELETED_USER_LOGIN)
}

fn earliest(comments: &[&Comment]) -> Option<DateTime<Utc>> {
    comments
        .iter()
        .filter_map(|c| c.created_at.as_deref().and_then(parse_datetime))
        .min()
}
