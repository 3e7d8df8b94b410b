//! 👤 Actor fields: the flat `user_*` / `assignee_*` / `merge_author_*` profile
//! columns, and the identity-role columns added when identity enrichment is on.

use super::fields::email_domain;
use crate::common::EnrichedItem;
use crate::identities::Identity;
use crate::payloads::User;

/// ✍️ The author block. Its columns do not follow the `<prefix>_*` pattern, so it gets its own function.
pub(crate) fn add_author_profile(eitem: &mut EnrichedItem, user: Option<&User>) {
    let user = user.filter(|u| u.is_available());
    let name = user.and_then(|u| u.name.clone());
    eitem.insert("user_name", name.clone());
    eitem.insert("author_name", name);
    eitem.insert(
        "user_domain",
        email_domain(user.and_then(|u| u.email.as_deref())),
    );
    eitem.insert("user_org", user.and_then(|u| u.company.clone()));
    eitem.insert("user_location", user.and_then(|u| u.location.clone()));
    eitem.insert_null("user_geolocation");
}

/// 🧑‍🤝‍🧑 `<prefix>_login`, `_name`, `_domain`, `_org`, `_location`, `_geolocation`.
///
/// The unavailable sentinel counts as nobody: every column lands as `null`.
pub(crate) fn add_actor_profile(eitem: &mut EnrichedItem, prefix: &str, user: Option<&User>) {
    let user = user.filter(|u| u.is_available());
    eitem.insert(format!("{prefix}_login"), user.and_then(|u| u.login.clone()));
    eitem.insert(format!("{prefix}_name"), user.and_then(|u| u.name.clone()));
    eitem.insert(
        format!("{prefix}_domain"),
        email_domain(user.and_then(|u| u.email.as_deref())),
    );
    eitem.insert(format!("{prefix}_org"), user.and_then(|u| u.company.clone()));
    eitem.insert(
        format!("{prefix}_location"),
        user.and_then(|u| u.location.clone()),
    );
    eitem.insert_null(format!("{prefix}_geolocation"));
}

/// 🪪 `<role>_uuid`, `<role>_name`, `<role>_user_name`, `<role>_domain` for one role.
///
/// Roles are named after their payload field (`author_data`, `assignee_data`,
/// `merged_by_data`) so these columns never land on a profile column.
///
/// Roles without an available user still get the columns, as `null`s, so that
/// every document of a type has the same shape.
pub(crate) fn add_role_identity(eitem: &mut EnrichedItem, role: &str, user: Option<&User>) {
    let user = user.filter(|u| u.is_available());
    let identity = user.map(Identity::from_user);
    eitem.insert(format!("{role}_uuid"), identity.as_ref().map(Identity::uuid));
    eitem.insert(
        format!("{role}_name"),
        identity.as_ref().and_then(|i| i.name.clone()),
    );
    eitem.insert(
        format!("{role}_user_name"),
        identity.as_ref().and_then(|i| i.username.clone()),
    );
    eitem.insert(
        format!("{role}_domain"),
        email_domain(user.and_then(|u| u.email.as_deref())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn ana() -> User {
        serde_json::from_value(json!({
            "login": "ana", "name": "Ana", "email": "ana@example.com",
            "company": "ACME", "location": "Lisbon"
        }))
        .expect("💀 fixture")
    }

    #[test]
    fn the_one_where_the_author_block_is_filled_in() {
        let mut eitem = EnrichedItem::new();
        add_author_profile(&mut eitem, Some(&ana()));
        assert_eq!(eitem.get("user_name"), Some(&json!("Ana")));
        assert_eq!(eitem.get("author_name"), Some(&json!("Ana")));
        assert_eq!(eitem.get("user_domain"), Some(&json!("example.com")));
        assert_eq!(eitem.get("user_org"), Some(&json!("ACME")));
        assert_eq!(eitem.get("user_location"), Some(&json!("Lisbon")));
        assert_eq!(eitem.get("user_geolocation"), Some(&Value::Null));
    }

    #[test]
    fn the_one_where_the_sentinel_is_all_nulls() {
        let ghost = User {
            organizations: Some(vec![]),
            ..User::default()
        };
        let mut eitem = EnrichedItem::new();
        add_actor_profile(&mut eitem, "assignee", Some(&ghost));
        assert_eq!(eitem.len(), 6);
        assert!(eitem.as_map().values().all(Value::is_null));
    }

    #[test]
    fn the_one_where_roles_get_stable_uuids() {
        let mut first = EnrichedItem::new();
        let mut second = EnrichedItem::new();
        add_role_identity(&mut first, "author_data", Some(&ana()));
        add_role_identity(&mut second, "author_data", Some(&ana()));
        assert_eq!(first, second);
        assert_eq!(
            first.get("author_data_uuid"),
            Some(&json!(Identity::from_user(&ana()).uuid()))
        );
        assert_eq!(first.get("author_data_user_name"), Some(&json!("ana")));
        assert_eq!(first.get("author_data_domain"), Some(&json!("example.com")));

        let mut nobody = EnrichedItem::new();
        add_role_identity(&mut nobody, "merged_by_data", None);
        assert_eq!(nobody.get("merged_by_data_uuid"), Some(&Value::Null));
    }
}
