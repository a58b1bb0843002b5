use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dockerfile not found: {0}")]
    DockerfileNotFound(PathBuf),

    #[error("Build context directory not found: {0}")]
    ContextNotFound(PathBuf),

    #[error("Docker connection error: {0}")]
    DockerConnection(#[from] bollard::errors::Error),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Invalid build configuration: {0}")]
    InvalidConfig(String),

    #[error("Registry credentials missing: set {username_var} and {token_var}")]
    CredentialsMissing {
        username_var: String,
        token_var: String,
    },

    #[error("Registry {registry} rejected the credentials: {message}")]
    AuthRejected { registry: String, message: String },

    #[error("Registry authentication failed for {registry}: {message}")]
    AuthFailed { registry: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid image tag: {tag}")]
    InvalidTag { tag: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::DockerfileNotFound(path) => {
                format!(
                    "Dockerfileが見つかりません: {}\n\
                     \n\
                     解決方法:\n\
                     1. Dockerfileのパスを確認してください\n\
                     2. ship.kdlで明示的にパスを指定してください:\n\
                        dockerfile \"path/to/Dockerfile\"\n\
                     3. dockerfile指定を外せば2ステージレシピが自動生成されます",
                    path.display()
                )
            }
            BuildError::BuildFailed(msg) => {
                format!(
                    "ビルドに失敗しました: {}\n\
                     \n\
                     コンパイルエラーを修正してから再実行してください。\n\
                     イメージはプッシュされていません。",
                    msg
                )
            }
            BuildError::ContextNotFound(path) => {
                format!(
                    "ビルドコンテキストが見つかりません: {}\n\
                     \n\
                     ship.kdlでcontextパスを確認してください。",
                    path.display()
                )
            }
            BuildError::CredentialsMissing {
                username_var,
                token_var,
            } => {
                format!(
                    "レジストリの資格情報が見つかりません。\n\
                     \n\
                     環境変数 {} と {} を設定してください。\n\
                     CI上ではシークレットストアから注入するのが前提です。",
                    username_var, token_var
                )
            }
            BuildError::AuthRejected { registry, message } => {
                format!(
                    "レジストリ {} が資格情報を拒否しました: {}\n\
                     \n\
                     ユーザー名とトークンを確認してください。ビルドは開始されていません。",
                    registry, message
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
