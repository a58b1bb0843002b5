//! イメージメタデータの導出
//!
//! タグイベントから、公開するイメージのタグ集合とOCIラベル集合を
//! 計算します。1回のリリース実行につき1度だけ計算され、永続化されません。

use crate::model::Ship;
use crate::version::TagEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OCI image-spec の標準アノテーションキー
pub const LABEL_TITLE: &str = "org.opencontainers.image.title";
pub const LABEL_VERSION: &str = "org.opencontainers.image.version";
pub const LABEL_CREATED: &str = "org.opencontainers.image.created";
pub const LABEL_REVISION: &str = "org.opencontainers.image.revision";

/// 1回のリリースで公開されるイメージの識別情報
///
/// タグイベントから導出された、リポジトリ・タグ集合・ラベル集合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// イメージリポジトリ（レジストリ込み、タグなし）
    pub repository: String,
    /// 導出されたタグ（先頭がプライマリビルドタグ）
    pub tags: Vec<String>,
    /// イメージに焼き込むラベル
    pub labels: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// タグイベントからメタデータを導出
    ///
    /// 副作用なし: ネットワークもファイルシステムも触りません。
    /// `revision` はソースリビジョン（コミットSHA等）が分かる場合のみ。
    pub fn derive(
        ship: &Ship,
        event: &TagEvent,
        revision: Option<&str>,
        created: DateTime<Utc>,
    ) -> Self {
        // パターン展開。重複は除去し、順序は保つ
        let mut tags = Vec::new();
        for pattern in &ship.release.patterns {
            if let Some(tag) = pattern.expand(&event.version)
                && !tags.contains(&tag)
            {
                tags.push(tag);
            }
        }

        // ユーザー定義ラベルを先に入れ、導出ラベルで上書きする
        let mut labels = ship.release.labels.clone();
        labels.insert(LABEL_TITLE.to_string(), ship.name.clone());
        labels.insert(LABEL_VERSION.to_string(), event.version.to_string());
        labels.insert(
            LABEL_CREATED.to_string(),
            created.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        if let Some(revision) = revision {
            labels.insert(LABEL_REVISION.to_string(), revision.to_string());
        }

        Self {
            repository: ship.release.image.clone(),
            tags,
            labels,
        }
    }

    /// プライマリビルドタグ（`{repository}:{tag}` 形式）
    pub fn primary_image(&self) -> Option<String> {
        self.tags
            .first()
            .map(|tag| format!("{}:{}", self.repository, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthConfig, BuildConfig, ReleaseConfig, TagPattern};
    use chrono::TimeZone;

    fn ship_with_patterns(patterns: Vec<TagPattern>) -> Ship {
        Ship {
            name: "bayer-axum".to_string(),
            release: ReleaseConfig {
                image: "hseeberger/bayer-axum".to_string(),
                patterns,
                ..Default::default()
            },
            build: BuildConfig {
                binary: "bayer-axum".to_string(),
                ..Default::default()
            },
            auth: AuthConfig::default(),
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_derives_exactly_the_version() {
        let ship = ship_with_patterns(vec![TagPattern::Version]);
        let event = TagEvent::parse("v1.2.3", "v").unwrap();

        let metadata = ImageMetadata::derive(&ship, &event, None, created());

        assert_eq!(metadata.repository, "hseeberger/bayer-axum");
        assert_eq!(metadata.tags, vec!["1.2.3"]);
        assert_eq!(
            metadata.primary_image().unwrap(),
            "hseeberger/bayer-axum:1.2.3"
        );
    }

    #[test]
    fn test_floating_patterns() {
        let ship = ship_with_patterns(vec![
            TagPattern::Version,
            TagPattern::MajorMinor,
            TagPattern::Major,
            TagPattern::Latest,
        ]);
        let event = TagEvent::parse("v1.2.3", "v").unwrap();

        let metadata = ImageMetadata::derive(&ship, &event, None, created());
        assert_eq!(metadata.tags, vec!["1.2.3", "1.2", "1", "latest"]);
    }

    #[test]
    fn test_prerelease_keeps_floating_tags_out() {
        let ship = ship_with_patterns(vec![
            TagPattern::Version,
            TagPattern::MajorMinor,
            TagPattern::Latest,
        ]);
        let event = TagEvent::parse("v2.0.0-rc.1", "v").unwrap();

        let metadata = ImageMetadata::derive(&ship, &event, None, created());
        assert_eq!(metadata.tags, vec!["2.0.0-rc.1"]);
    }

    #[test]
    fn test_duplicate_patterns_deduplicated() {
        let ship = ship_with_patterns(vec![TagPattern::Version, TagPattern::Version]);
        let event = TagEvent::parse("v1.0.0", "v").unwrap();

        let metadata = ImageMetadata::derive(&ship, &event, None, created());
        assert_eq!(metadata.tags, vec!["1.0.0"]);
    }

    #[test]
    fn test_labels() {
        let mut ship = ship_with_patterns(vec![TagPattern::Version]);
        ship.release.labels.insert(
            "org.opencontainers.image.source".to_string(),
            "https://github.com/hseeberger/bayer-axum".to_string(),
        );
        // ユーザーが導出ラベルを乗っ取ろうとしても導出側が勝つ
        ship.release
            .labels
            .insert(LABEL_VERSION.to_string(), "hijacked".to_string());

        let event = TagEvent::parse("v1.2.3", "v").unwrap();
        let metadata = ImageMetadata::derive(&ship, &event, Some("abc123"), created());

        assert_eq!(metadata.labels[LABEL_VERSION], "1.2.3");
        assert_eq!(metadata.labels[LABEL_TITLE], "bayer-axum");
        assert_eq!(metadata.labels[LABEL_CREATED], "2024-01-15T12:00:00Z");
        assert_eq!(metadata.labels[LABEL_REVISION], "abc123");
        assert_eq!(
            metadata.labels["org.opencontainers.image.source"],
            "https://github.com/hseeberger/bayer-axum"
        );
    }

    #[test]
    fn test_no_revision_no_label() {
        let ship = ship_with_patterns(vec![TagPattern::Version]);
        let event = TagEvent::parse("v1.2.3", "v").unwrap();

        let metadata = ImageMetadata::derive(&ship, &event, None, created());
        assert!(!metadata.labels.contains_key(LABEL_REVISION));
    }
}
