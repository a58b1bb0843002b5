//! レジストリ認証設定

use serde::{Deserialize, Serialize};

/// レジストリ認証設定
///
/// 資格情報そのものは設定ファイルに置かず、環境変数名だけを持ちます。
/// 値は外部のシークレットストア（CI secrets等）から注入される前提です。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// ユーザー名を保持する環境変数名
    #[serde(default = "default_username_env")]
    pub username_env: String,
    /// トークンを保持する環境変数名
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_username_env() -> String {
    "DOCKERHUB_USERNAME".to_string()
}

fn default_token_env() -> String {
    "DOCKERHUB_TOKEN".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username_env: default_username_env(),
            token_env: default_token_env(),
        }
    }
}
