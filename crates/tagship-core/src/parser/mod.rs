//! KDLパーサー
//!
//! Tagshipの ship.kdl 設定ファイルをパースします。

use crate::error::{Result, ShipError};
use crate::model::{AuthConfig, BuildConfig, ReleaseConfig, Ship, TagPattern};
use kdl::{KdlDocument, KdlNode};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// KDLファイルをパースしてShipを生成
pub fn parse_kdl_file<P: AsRef<Path>>(path: P) -> Result<Ship> {
    let content = fs::read_to_string(path.as_ref())?;
    let name = path
        .as_ref()
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    parse_kdl_string(&content, name)
}

/// KDL文字列をパース
pub fn parse_kdl_string(content: &str, default_name: String) -> Result<Ship> {
    let doc: KdlDocument = content.parse()?;

    let mut name = default_name;
    let mut release: Option<ReleaseConfig> = None;
    let mut build: Option<BuildConfig> = None;
    let mut auth = AuthConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "name" => {
                if let Some(value) = string_value(node) {
                    name = value;
                }
            }
            "release" => {
                release = Some(parse_release(node)?);
            }
            "build" => {
                build = Some(parse_build(node)?);
            }
            "auth" => {
                auth = parse_auth(node);
            }
            _ => {}
        }
    }

    let release = release.ok_or(ShipError::MissingImage)?;
    if release.image.is_empty() {
        return Err(ShipError::MissingImage);
    }
    let build = build.ok_or(ShipError::MissingBinary)?;
    if build.binary.is_empty() {
        return Err(ShipError::MissingBinary);
    }

    Ok(Ship {
        name,
        release,
        build,
        auth,
    })
}

/// release ノードをパース
fn parse_release(node: &KdlNode) -> Result<ReleaseConfig> {
    let mut config = ReleaseConfig::default();
    let mut patterns: Vec<TagPattern> = Vec::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "image" => {
                    if let Some(value) = string_value(child) {
                        config.image = value;
                    }
                }
                "registry" => {
                    config.registry = string_value(child);
                }
                "tag-prefix" => {
                    if let Some(value) = string_value(child) {
                        config.tag_prefix = value;
                    }
                }
                // tag "version" を繰り返して展開パターンを指定
                "tag" => {
                    if let Some(value) = string_value(child) {
                        patterns.push(TagPattern::parse(&value)?);
                    }
                }
                "labels" => {
                    config.labels = parse_string_map(child);
                }
                _ => {}
            }
        }
    }

    if !patterns.is_empty() {
        config.patterns = patterns;
    }

    Ok(config)
}

/// build ノードをパース
fn parse_build(node: &KdlNode) -> Result<BuildConfig> {
    let mut config = BuildConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "dockerfile" => {
                    config.dockerfile = string_value(child).map(PathBuf::from);
                }
                "context" => {
                    config.context = string_value(child).map(PathBuf::from);
                }
                "builder-image" => {
                    if let Some(value) = string_value(child) {
                        config.builder_image = value;
                    }
                }
                "runtime-image" => {
                    if let Some(value) = string_value(child) {
                        config.runtime_image = value;
                    }
                }
                "binary" => {
                    if let Some(value) = string_value(child) {
                        config.binary = value;
                    }
                }
                "config-dir" => {
                    if let Some(value) = string_value(child) {
                        config.config_dir = value;
                    }
                }
                "args" => {
                    config.args = parse_string_map(child).into_iter().collect();
                }
                _ => {}
            }
        }
    }

    Ok(config)
}

/// auth ノードをパース
fn parse_auth(node: &KdlNode) -> AuthConfig {
    let mut config = AuthConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "username-env" => {
                    if let Some(value) = string_value(child) {
                        config.username_env = value;
                    }
                }
                "token-env" => {
                    if let Some(value) = string_value(child) {
                        config.token_env = value;
                    }
                }
                _ => {}
            }
        }
    }

    config
}

/// 子ノード群を `キー "値"` のマップとして読む
fn parse_string_map(node: &KdlNode) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            let key = child.name().value().to_string();
            let value = child
                .entries()
                .first()
                .and_then(|e| e.value().as_string())
                .unwrap_or("")
                .to_string();
            map.insert(key, value);
        }
    }
    map
}

/// ノードの最初のエントリを文字列として読む
fn string_value(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}
