//! レジストリ認証処理
//!
//! 環境変数ペア（CIシークレット）を正規ルートとして資格情報を解決し、
//! 無ければ Docker config.json / credential helper にフォールバックします。

use crate::error::{BuildError, BuildResult};
use base64::Engine;
use bollard::auth::DockerCredentials;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tagship_core::AuthConfig;

/// Docker config.json の構造
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DockerConfig {
    /// 認証情報 (レジストリ -> AuthEntry)
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
    /// credential helper 名 (例: "osxkeychain", "desktop")
    #[serde(default)]
    creds_store: Option<String>,
}

/// 認証エントリ
#[derive(Debug, Deserialize)]
struct AuthEntry {
    /// Base64エンコードされた "username:password"
    auth: Option<String>,
}

/// credential helper からのレスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialResponse {
    username: String,
    secret: String,
}

/// 解決済みのレジストリ資格情報
///
/// トークンは `SecretString` として保持され、Debug出力やログには
/// 現れません。1回のリリース実行の間だけ読み取り専用で使われます。
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub token: SecretString,
    pub registry: String,
}

impl Credentials {
    /// Bollard の DockerCredentials に変換
    pub fn to_docker(&self) -> DockerCredentials {
        DockerCredentials {
            username: Some(self.username.clone()),
            password: Some(self.token.expose_secret().to_string()),
            serveraddress: Some(self.registry.clone()),
            ..Default::default()
        }
    }
}

/// レジストリ認証を管理
#[derive(Debug)]
pub struct RegistryAuth {
    config_path: PathBuf,
}

impl Default for RegistryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryAuth {
    /// 新しい RegistryAuth を作成
    ///
    /// フォールバック用にデフォルトで ~/.docker/config.json を使用
    pub fn new() -> Self {
        let config_path = std::env::var("DOCKER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|h| h.join(".docker"))
                    .unwrap_or_else(|| PathBuf::from(".docker"))
            })
            .join("config.json");

        Self { config_path }
    }

    /// 指定したパスの config.json を使用
    pub fn with_config_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 資格情報を解決
    ///
    /// # Resolution order
    /// 1. 設定された環境変数ペア（例: DOCKERHUB_USERNAME / DOCKERHUB_TOKEN）
    /// 2. Docker config.json の auths セクション
    /// 3. credential helper
    ///
    /// どこにも見つからない場合は `CredentialsMissing`。
    pub fn resolve(&self, auth: &AuthConfig, registry: &str) -> BuildResult<Credentials> {
        // 1. 環境変数ペア
        if let Some(creds) = self.from_env(auth, registry) {
            tracing::debug!("Using credentials from environment variables");
            return Ok(creds);
        }

        // 2. config.json の auths セクション
        if self.config_path.exists() {
            let config = self.load_docker_config()?;

            if let Some(auth_entry) = config.auths.get(registry)
                && let Some(auth_b64) = &auth_entry.auth
                && let Some(creds) = self.decode_auth(auth_b64, registry)?
            {
                tracing::debug!("Found credentials in auths for {}", registry);
                return Ok(creds);
            }

            // 3. credential helper
            if let Some(helper) = &config.creds_store {
                tracing::debug!("Trying credential helper: {}", helper);
                if let Ok(Some(creds)) = self.get_from_helper(helper, registry) {
                    return Ok(creds);
                }
            }
        } else {
            tracing::debug!("Docker config.json not found at {:?}", self.config_path);
        }

        Err(BuildError::CredentialsMissing {
            username_var: auth.username_env.clone(),
            token_var: auth.token_env.clone(),
        })
    }

    /// 環境変数ペアから資格情報を読む
    ///
    /// 未設定・空文字列は欠落として扱います。
    fn from_env(&self, auth: &AuthConfig, registry: &str) -> Option<Credentials> {
        let username = std::env::var(&auth.username_env).ok().filter(|s| !s.is_empty())?;
        let token = std::env::var(&auth.token_env).ok().filter(|s| !s.is_empty())?;

        Some(Credentials {
            username,
            token: SecretString::from(token),
            registry: registry.to_string(),
        })
    }

    /// Docker config.json を読み込み
    fn load_docker_config(&self) -> BuildResult<DockerConfig> {
        let content =
            std::fs::read_to_string(&self.config_path).map_err(|e| BuildError::AuthFailed {
                registry: self.config_path.display().to_string(),
                message: format!("Failed to read config.json: {}", e),
            })?;

        serde_json::from_str(&content).map_err(|e| BuildError::AuthFailed {
            registry: self.config_path.display().to_string(),
            message: format!("Failed to parse config.json: {}", e),
        })
    }

    /// Base64エンコードされた認証情報をデコード
    fn decode_auth(&self, auth_b64: &str, registry: &str) -> BuildResult<Option<Credentials>> {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(auth_b64)
            .map_err(|e| BuildError::AuthFailed {
                registry: registry.to_string(),
                message: format!("Failed to decode auth: {}", e),
            })?;

        let auth_str = String::from_utf8(decoded).map_err(|e| BuildError::AuthFailed {
            registry: registry.to_string(),
            message: format!("Invalid UTF-8 in auth: {}", e),
        })?;

        if let Some((username, password)) = auth_str.split_once(':') {
            Ok(Some(Credentials {
                username: username.to_string(),
                token: SecretString::from(password.to_string()),
                registry: registry.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    /// credential helper から認証情報を取得
    fn get_from_helper(&self, helper: &str, registry: &str) -> BuildResult<Option<Credentials>> {
        let helper_cmd = format!("docker-credential-{}", helper);

        let mut child = Command::new(&helper_cmd)
            .arg("get")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::AuthFailed {
                registry: registry.to_string(),
                message: format!("Failed to run {}: {}", helper_cmd, e),
            })?;

        // レジストリ名を stdin に渡す
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(registry.as_bytes()).ok();
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BuildError::AuthFailed {
                registry: registry.to_string(),
                message: format!("Credential helper failed: {}", e),
            })?;

        if !output.status.success() {
            // credential helper が認証情報を持っていない場合は None を返す
            tracing::debug!(
                "Credential helper returned error for {}: {}",
                registry,
                String::from_utf8_lossy(&output.stderr)
            );
            return Ok(None);
        }

        let response: CredentialResponse =
            serde_json::from_slice(&output.stdout).map_err(|e| BuildError::AuthFailed {
                registry: registry.to_string(),
                message: format!("Failed to parse credential helper response: {}", e),
            })?;

        Ok(Some(Credentials {
            username: response.username,
            token: SecretString::from(response.secret),
            registry: registry.to_string(),
        }))
    }
}
