//! リリース設定

use crate::error::{Result, ShipError};
use crate::version::SemVer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// semverからイメージタグへの展開パターン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPattern {
    /// `1.2.3`
    Version,
    /// `1.2`
    MajorMinor,
    /// `1`
    Major,
    /// `latest`
    Latest,
}

impl TagPattern {
    /// 設定ファイル上の表記からパターンを解決
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "version" => Ok(Self::Version),
            "major.minor" => Ok(Self::MajorMinor),
            "major" => Ok(Self::Major),
            "latest" => Ok(Self::Latest),
            other => Err(ShipError::UnknownTagPattern(other.to_string())),
        }
    }

    /// バージョンをタグ文字列に展開
    ///
    /// フローティングタグ（major.minor / major / latest）はプレリリース版では
    /// 展開されません。rc版のプッシュで `latest` が動いてはならないためです。
    pub fn expand(&self, version: &SemVer) -> Option<String> {
        if version.is_prerelease() && *self != Self::Version {
            return None;
        }
        match self {
            Self::Version => Some(version.to_string()),
            Self::MajorMinor => Some(format!("{}.{}", version.major, version.minor)),
            Self::Major => Some(format!("{}", version.major)),
            Self::Latest => Some("latest".to_string()),
        }
    }
}

/// リリース設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// イメージリポジトリ（例: "hseeberger/bayer-axum", "ghcr.io/acme/app"）
    pub image: String,
    /// 明示的なレジストリホスト（省略時はimageから導出、裸の場合はDocker Hub）
    #[serde(default)]
    pub registry: Option<String>,
    /// タグのプレフィックス（デフォルト: "v"）
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// タグ展開パターン（デフォルト: versionのみ）
    #[serde(default = "default_patterns")]
    pub patterns: Vec<TagPattern>,
    /// 追加のイメージラベル（導出ラベルを上書きしない）
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_patterns() -> Vec<TagPattern> {
    vec![TagPattern::Version]
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            image: String::new(),
            registry: None,
            tag_prefix: default_tag_prefix(),
            patterns: default_patterns(),
            labels: BTreeMap::new(),
        }
    }
}

impl ReleaseConfig {
    /// イメージ参照からレジストリホストを解決
    ///
    /// # Examples
    /// - `ghcr.io/org/app` -> `ghcr.io`
    /// - `myuser/app` -> `docker.io`
    /// - `localhost:5000/app` -> `localhost:5000`
    pub fn registry_host(&self) -> String {
        if let Some(registry) = &self.registry {
            return registry.clone();
        }

        let parts: Vec<&str> = self.image.split('/').collect();
        if parts.len() >= 2 {
            let first = parts[0];
            // ホストの判定: `.` か `:` を含む（例: ghcr.io, localhost:5000）
            if first.contains('.') || first.contains(':') {
                return first.to_string();
            }
        }

        // デフォルトは Docker Hub
        "docker.io".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(major: u64, minor: u64, patch: u64) -> SemVer {
        SemVer {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(TagPattern::parse("version").unwrap(), TagPattern::Version);
        assert_eq!(
            TagPattern::parse("major.minor").unwrap(),
            TagPattern::MajorMinor
        );
        assert_eq!(TagPattern::parse("latest").unwrap(), TagPattern::Latest);
        assert!(TagPattern::parse("calver").is_err());
    }

    #[test]
    fn test_pattern_expand() {
        let v = version(1, 2, 3);
        assert_eq!(TagPattern::Version.expand(&v).unwrap(), "1.2.3");
        assert_eq!(TagPattern::MajorMinor.expand(&v).unwrap(), "1.2");
        assert_eq!(TagPattern::Major.expand(&v).unwrap(), "1");
        assert_eq!(TagPattern::Latest.expand(&v).unwrap(), "latest");
    }

    #[test]
    fn test_floating_patterns_skip_prereleases() {
        let mut v = version(2, 0, 0);
        v.pre = Some("rc.1".to_string());

        assert_eq!(TagPattern::Version.expand(&v).unwrap(), "2.0.0-rc.1");
        assert_eq!(TagPattern::MajorMinor.expand(&v), None);
        assert_eq!(TagPattern::Major.expand(&v), None);
        assert_eq!(TagPattern::Latest.expand(&v), None);
    }

    #[test]
    fn test_registry_host_docker_hub() {
        let config = ReleaseConfig {
            image: "hseeberger/bayer-axum".to_string(),
            ..Default::default()
        };
        assert_eq!(config.registry_host(), "docker.io");
    }

    #[test]
    fn test_registry_host_ghcr() {
        let config = ReleaseConfig {
            image: "ghcr.io/acme/app".to_string(),
            ..Default::default()
        };
        assert_eq!(config.registry_host(), "ghcr.io");
    }

    #[test]
    fn test_registry_host_explicit_wins() {
        let config = ReleaseConfig {
            image: "ghcr.io/acme/app".to_string(),
            registry: Some("localhost:5000".to_string()),
            ..Default::default()
        };
        assert_eq!(config.registry_host(), "localhost:5000");
    }
}
