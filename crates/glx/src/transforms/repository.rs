//! 🏠 Repository snapshots: one document per fetch, keyed by the fetch time.

use super::dates::parse_value;
use super::fields::{add_grimoire_fields, add_project, copy_raw_fields, finish};
use super::EnrichContext;
use crate::common::{EnrichedItem, REPOSITORY_TYPE, RawItem};
use crate::payloads::RepositoryData;

pub(crate) fn enrich(ctx: &EnrichContext<'_>, item: &RawItem, repo: &RepositoryData) -> EnrichedItem {
    let mut eitem = EnrichedItem::new();
    copy_raw_fields(item, &mut eitem);

    eitem.insert("id", repo.fetched_on.to_string());
    eitem.insert("forks_count", repo.forks_count);
    eitem.insert("subscribers_count", repo.subscribers_count);
    eitem.insert("stargazers_count", repo.stargazers_count);
    eitem.insert("releases_count", repo.releases.len());
    eitem.insert("fetched_on", serde_json::Value::from(&repo.fetched_on));
    eitem.insert("url", repo.origin.clone());
    eitem.insert("item_type", REPOSITORY_TYPE);

    add_project(ctx, &mut eitem, None);
    let updated = item.metadata_updated_on.as_ref().and_then(parse_value);
    add_grimoire_fields(&mut eitem, updated, REPOSITORY_TYPE);

    finish(ctx, &mut eitem);
    eitem
}

#[cfg(test)]
mod tests {
    use crate::transforms::test_fixtures::*;
    use crate::transforms::{EnrichConfig, Enricher};
    use serde_json::{Value, json};

    #[test]
    fn the_one_where_a_repository_is_just_its_numbers() -> anyhow::Result<()> {
        let item = raw(
            "repository",
            json!({
                "forks_count": 3,
                "subscribers_count": 10,
                "stargazers_count": 7,
                "fetched_on": "2023-01-01T00:00:00"
            }),
        );
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now())?;
        assert_eq!(docs.len(), 1);

        let doc = &docs[0];
        assert_eq!(doc.item_type(), Some("repository"));
        assert_eq!(doc.get("id"), Some(&json!("2023-01-01T00:00:00")));
        assert_eq!(doc.get("forks_count"), Some(&json!(3)));
        assert_eq!(doc.get("subscribers_count"), Some(&json!(10)));
        assert_eq!(doc.get("stargazers_count"), Some(&json!(7)));
        assert_eq!(doc.get("releases_count"), Some(&json!(0)));
        assert_eq!(doc.get("url"), Some(&Value::Null));
        assert_eq!(
            doc.get("grimoire_creation_date"),
            Some(&json!("2023-01-01T10:00:00+00:00")),
            "from the envelope's metadata__updated_on"
        );
        assert_eq!(doc.get("is_gitlink_repository"), Some(&json!(1)));
        Ok(())
    }

    #[test]
    fn the_one_where_epoch_fetch_times_become_string_ids() -> anyhow::Result<()> {
        let item = raw(
            "repository",
            json!({
                "fetched_on": 1672531200.5,
                "origin": ORIGIN,
                "releases": [{"tag": "v1"}, {"tag": "v2"}]
            }),
        );
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now())?;
        let doc = &docs[0];
        assert_eq!(doc.get("id"), Some(&json!("1672531200.5")));
        assert_eq!(doc.get("fetched_on"), Some(&json!(1672531200.5)));
        assert_eq!(doc.get("url"), Some(&json!(ORIGIN)));
        assert_eq!(doc.get("releases_count"), Some(&json!(2)));
        assert_eq!(doc.get("forks_count"), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn the_one_where_a_whole_second_keeps_its_point_zero() -> anyhow::Result<()> {
        let item = raw("repository", json!({"fetched_on": 1672567200.0}));
        let docs = Enricher::new(EnrichConfig::default()).enrich_item_at(&item, now())?;
        assert_eq!(
            docs[0].get("id"),
            Some(&json!("1672567200.0")),
            "ids already indexed for this repository end in .0"
        );
        Ok(())
    }
}
