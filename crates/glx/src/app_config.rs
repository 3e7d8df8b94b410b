//! 🔧 App Configuration — the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." — every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! ```toml
//! [source_config.File]
//! file_name = "raw/gitlink_issues.ndjson"
//!
//! [sink_config.Elasticsearch]
//! url = "http://localhost:9200"
//! index = "gitlink_issues_enriched"
//!
//! [enrich]
//! data_source = "gitlink_issues"
//! sortinghat = true
//!
//! [enrich.projects]
//! "https://www.gitlink.org.cn/owner/repo" = "Main Project"
//! ```

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backends::{ElasticsearchSinkConfig, FileSinkConfig, FileSourceConfig};
use crate::transforms::EnrichConfig;

/// 🚰 Where the raw items come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceConfig {
    File(FileSourceConfig),
}

/// 🕳️ Where the enriched documents go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SinkConfig {
    Elasticsearch(ElasticsearchSinkConfig),
    File(FileSinkConfig),
    /// 🧪 Dry run: enrich everything, keep it in RAM, throw it away at exit.
    InMemory,
}

/// 📦 The AppConfig: one struct to rule them all, one struct to find them,
/// one struct to bring them all, and in the Figment bind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub source_config: SourceConfig,
    pub sink_config: SinkConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

/// 🚀 Load the config — from a file, from env vars, or from the sheer power of hoping.
///
/// 🔧 Merges environment variables (`GLX_*`, `__` for nesting, so
/// `GLX_ENRICH__DATA_SOURCE=gitlink_pulls`) with an optional TOML file.
///   - `None` → env vars only. No file. No assumptions. No pizza defaults.
///   - `Some` → env vars + TOML file, merged. TOML wins on conflicts.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("GLX_").split("__"));
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (GLX_*). \
             The file exists in our hearts, but apparently not on disk.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (GLX_*). \
                 No file was provided — this one's all on the environment. Classic."
            .to_string(),
    };

    config.extract().context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_test_config(contents: &str) -> tempfile::NamedTempFile {
        // 🧪 Figment wants TOML from disk, like it's method acting.
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("💀 The filesystem said 'new phone who dis'.");
        file.write_all(contents.as_bytes())
            .expect("💀 Failed to write test config.");
        file
    }

    #[test]
    fn the_one_where_everything_is_spelled_out() {
        let file = write_test_config(
            r#"
            [source_config.File]
            file_name = "raw.ndjson"

            [sink_config.Elasticsearch]
            url = "http://localhost:9200"
            index = "gitlink_enriched"
            api_key = "c2VjcmV0"

            [enrich]
            data_source = "gitlink_pulls"
            batch_size = 50
            sortinghat = true
            repository_labels = ["core"]

            [enrich.projects]
            "https://www.gitlink.org.cn/owner/repo" = "Main Project"
            "#,
        );

        let app_config = load_config(Some(file.path()))
            .expect("💀 A complete config should parse. The schema drift goblin does not get this win.");

        assert_eq!(
            app_config.source_config,
            SourceConfig::File(FileSourceConfig {
                file_name: "raw.ndjson".into()
            })
        );
        match app_config.sink_config {
            SinkConfig::Elasticsearch(es) => {
                assert_eq!(es.index, "gitlink_enriched");
                assert_eq!(es.api_key.as_deref(), Some("c2VjcmV0"));
                assert_eq!(es.username, None);
            }
            honestly_who_knows => panic!(
                "💀 Expected an Elasticsearch sink, but serde took us to {:?}. Plot twist energy.",
                honestly_who_knows
            ),
        }
        assert_eq!(app_config.enrich.data_source.as_deref(), Some("gitlink_pulls"));
        assert_eq!(app_config.enrich.batch_size, 50);
        assert!(app_config.enrich.sortinghat);
        assert_eq!(app_config.enrich.repository_labels, Some(vec!["core".to_string()]));
        assert_eq!(
            app_config
                .enrich
                .projects
                .get("https://www.gitlink.org.cn/owner/repo")
                .map(String::as_str),
            Some("Main Project")
        );
    }

    #[test]
    fn the_one_where_enrich_defaults_show_up_uninvited_but_helpful() {
        let app_config: AppConfig = toml::from_str(
            r#"
            sink_config = "InMemory"

            [source_config.File]
            file_name = "raw.ndjson"
            "#,
        )
        .expect("💀 A minimal config should parse.");

        assert_eq!(app_config.sink_config, SinkConfig::InMemory);
        assert_eq!(app_config.enrich, EnrichConfig::default());
        assert_eq!(app_config.enrich.batch_size, 200);
        assert_eq!(app_config.enrich.keyword_max_length, 1000);
        assert!(app_config.enrich.data_source.is_none(), "checked at run time, not here");
    }

    #[test]
    fn the_one_where_the_file_has_no_sink() {
        let file = write_test_config(
            r#"
            [source_config.File]
            file_name = "raw.ndjson"
            "#,
        );
        let err = load_config(Some(file.path())).expect_err("💀 no sink, no run");
        assert!(err.to_string().contains("Failed to parse configuration"));
    }
}
