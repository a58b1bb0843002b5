//! Ship定義

use super::auth::AuthConfig;
use super::build::BuildConfig;
use super::release::ReleaseConfig;
use serde::{Deserialize, Serialize};

/// Ship - リリースパイプラインの設計図
///
/// 1つのShipは、タグイベントからどのイメージをどのレジストリへ
/// 公開するか、およびそのイメージをどうビルドするかを記述します。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// プロジェクト名（省略時はディレクトリ名）
    pub name: String,
    /// リリース設定（イメージ名、タグパターン、ラベル）
    pub release: ReleaseConfig,
    /// イメージビルド設定
    pub build: BuildConfig,
    /// レジストリ認証設定
    #[serde(default)]
    pub auth: AuthConfig,
}
