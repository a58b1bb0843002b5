//! イメージビルド設定

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// イメージビルド設定
///
/// Dockerfileを明示的に指定しない場合、2ステージのビルドレシピが
/// 自動生成されます（ツールチェイン込みのビルドステージ + 最小ランタイム）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// 既存Dockerfileのパス（指定時は自動生成をスキップ）
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,
    /// ビルドコンテキストのパス（デフォルト: プロジェクトルート）
    #[serde(default)]
    pub context: Option<PathBuf>,
    /// ビルドステージのベースイメージ
    #[serde(default = "default_builder_image")]
    pub builder_image: String,
    /// ランタイムステージのベースイメージ
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// インストールする実行ファイル名
    pub binary: String,
    /// ランタイムイメージへコピーする設定ディレクトリ
    #[serde(default = "default_config_dir")]
    pub config_dir: String,
    /// ビルド引数（値の {VAR} は環境変数で展開される）
    #[serde(default)]
    pub args: HashMap<String, String>,
}

fn default_builder_image() -> String {
    "rust:1.88-bookworm".to_string()
}

fn default_runtime_image() -> String {
    "debian:bookworm-slim".to_string()
}

fn default_config_dir() -> String {
    "config".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dockerfile: None,
            context: None,
            builder_image: default_builder_image(),
            runtime_image: default_runtime_image(),
            binary: String::new(),
            config_dir: default_config_dir(),
            args: HashMap::new(),
        }
    }
}

impl BuildConfig {
    /// ランタイムイメージの作業ディレクトリ
    ///
    /// 設定ディレクトリの配置先でもある（`{workdir}/{config_dir}`）。
    pub fn workdir(&self) -> String {
        format!("/opt/{}", self.binary)
    }
}
