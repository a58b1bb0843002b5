//! タグイベントの解釈
//!
//! `v1.2.3` のようなバージョンタグからsemverを抽出します。
//! パターンに一致しないタグはパイプラインの最初の段階で拒否されます。

use crate::error::{Result, ShipError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// semver 2.0 のコア部分にマッチする正規表現
///
/// 数値フィールドの先頭ゼロは不正（semver 2.0 準拠）
const SEMVER_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$";

/// セマンティックバージョン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// プレリリース識別子（例: "rc.1"）
    pub pre: Option<String>,
    /// ビルドメタデータ（例: "20240101"）
    pub build: Option<String>,
}

impl SemVer {
    /// プレリリース版かどうか
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// `1.2.3` 形式（プレリリース・ビルドメタデータを除く）
    pub fn core(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// バージョンタグのプッシュ通知
///
/// パイプラインのトリガーであり、導出されるイメージタグの唯一の情報源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// 受信したタグ文字列そのもの（例: "v1.2.3"）
    pub raw: String,
    /// 抽出されたバージョン
    pub version: SemVer,
}

impl TagEvent {
    /// タグ文字列からバージョンを抽出
    ///
    /// タグは `{prefix}{semver}` に完全一致する必要があります。
    /// 一致しない場合は `ShipError::TagMismatch` を返し、
    /// 認証・ビルド・プッシュは一切実行されません。
    pub fn parse(tag: &str, prefix: &str) -> Result<Self> {
        let mismatch = || ShipError::TagMismatch {
            tag: tag.to_string(),
            pattern: format!("{}<major>.<minor>.<patch>", prefix),
        };

        let rest = tag.strip_prefix(prefix).ok_or_else(mismatch)?;

        let re = Regex::new(SEMVER_PATTERN)
            .map_err(|e| ShipError::InvalidConfig(format!("無効なバージョン正規表現: {}", e)))?;
        let caps = re.captures(rest).ok_or_else(mismatch)?;

        // 数値形式は正規表現が保証済み。u64を溢れる桁数だけは不一致扱い
        let field = |i: usize| -> Result<u64> {
            caps.get(i)
                .ok_or_else(mismatch)?
                .as_str()
                .parse()
                .map_err(|_| mismatch())
        };

        Ok(Self {
            raw: tag.to_string(),
            version: SemVer {
                major: field(1)?,
                minor: field(2)?,
                patch: field(3)?,
                pre: caps.get(4).map(|m| m.as_str().to_string()),
                build: caps.get(5).map(|m| m.as_str().to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_tag() {
        let event = TagEvent::parse("v1.2.3", "v").unwrap();
        assert_eq!(event.raw, "v1.2.3");
        assert_eq!(event.version.major, 1);
        assert_eq!(event.version.minor, 2);
        assert_eq!(event.version.patch, 3);
        assert!(event.version.pre.is_none());
        assert_eq!(event.version.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_prerelease_tag() {
        let event = TagEvent::parse("v2.0.0-rc.1", "v").unwrap();
        assert_eq!(event.version.pre.as_deref(), Some("rc.1"));
        assert!(event.version.is_prerelease());
        assert_eq!(event.version.to_string(), "2.0.0-rc.1");
        assert_eq!(event.version.core(), "2.0.0");
    }

    #[test]
    fn test_parse_build_metadata() {
        let event = TagEvent::parse("v1.0.0+20240101", "v").unwrap();
        assert_eq!(event.version.build.as_deref(), Some("20240101"));
        assert_eq!(event.version.to_string(), "1.0.0+20240101");
    }

    #[test]
    fn test_parse_custom_prefix() {
        let event = TagEvent::parse("release-0.4.0", "release-").unwrap();
        assert_eq!(event.version.to_string(), "0.4.0");
    }

    #[test]
    fn test_reject_missing_prefix() {
        let err = TagEvent::parse("1.2.3", "v").unwrap_err();
        assert!(matches!(err, ShipError::TagMismatch { .. }));
    }

    #[test]
    fn test_reject_partial_version() {
        assert!(TagEvent::parse("v1.2", "v").is_err());
        assert!(TagEvent::parse("v1", "v").is_err());
    }

    #[test]
    fn test_reject_leading_zeroes() {
        assert!(TagEvent::parse("v01.2.3", "v").is_err());
        assert!(TagEvent::parse("v1.02.3", "v").is_err());
    }

    #[test]
    fn test_reject_trailing_garbage() {
        assert!(TagEvent::parse("v1.2.3hotfix", "v").is_err());
        assert!(TagEvent::parse("v1.2.3 ", "v").is_err());
    }

    #[test]
    fn test_reject_branch_names() {
        assert!(TagEvent::parse("main", "v").is_err());
        assert!(TagEvent::parse("v-latest", "v").is_err());
    }
}
