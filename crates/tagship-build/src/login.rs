//! レジストリログイン検証
//!
//! ビルドを開始する前に、資格情報を Docker Registry v2 のトークン
//! エンドポイントと交換して検証します。拒否された場合はその場で
//! 実行を打ち切り、ビルドは一切開始されません。

use crate::auth::Credentials;
use crate::error::{BuildError, BuildResult};
use reqwest::StatusCode;
use reqwest::header::WWW_AUTHENTICATE;
use secrecy::ExposeSecret;

/// `WWW-Authenticate: Bearer` チャレンジ
#[derive(Debug, Clone, PartialEq, Eq)]
struct BearerChallenge {
    realm: String,
    service: Option<String>,
}

/// レジストリAPIクライアント
pub struct RegistryClient {
    http: reqwest::Client,
}

impl RegistryClient {
    pub fn new() -> BuildResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tagship/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// 資格情報をレジストリに対して検証
    ///
    /// Docker Registry v2 のログインフロー:
    /// 1. `/v2/` をプローブ。200ならば認証不要のレジストリとして受理。
    /// 2. 401の場合、`WWW-Authenticate: Bearer` チャレンジに従い、
    ///    Basic認証付きでpull/pushスコープのトークンを要求。
    /// 3. 401/403は資格情報の拒否（`AuthRejected`、致命的・リトライなし）。
    pub async fn verify(&self, credentials: &Credentials, repository: &str) -> BuildResult<()> {
        let registry = &credentials.registry;
        let host = api_host(registry);
        let probe_url = format!("https://{}/v2/", host);

        tracing::debug!("Probing registry: {}", probe_url);
        let probe = self
            .http
            .get(&probe_url)
            .send()
            .await
            .map_err(|e| BuildError::AuthFailed {
                registry: registry.clone(),
                message: format!("Failed to reach registry: {}", e),
            })?;

        match probe.status() {
            // 認証不要のレジストリ（ローカル等）
            StatusCode::OK => {
                tracing::debug!("Registry {} accepts anonymous access", registry);
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                let challenge = probe
                    .headers()
                    .get(WWW_AUTHENTICATE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_bearer_challenge)
                    .ok_or_else(|| BuildError::AuthFailed {
                        registry: registry.clone(),
                        message: "Registry returned 401 without a Bearer challenge".to_string(),
                    })?;

                self.exchange_token(credentials, &challenge, repository)
                    .await
            }
            status => Err(BuildError::AuthFailed {
                registry: registry.clone(),
                message: format!("Unexpected registry response: {}", status),
            }),
        }
    }

    /// トークンエンドポイントと資格情報を交換
    async fn exchange_token(
        &self,
        credentials: &Credentials,
        challenge: &BearerChallenge,
        repository: &str,
    ) -> BuildResult<()> {
        let registry = &credentials.registry;
        let scope = format!("repository:{}:pull,push", scope_repository(repository));

        let mut query: Vec<(&str, &str)> = vec![("scope", scope.as_str())];
        if let Some(service) = &challenge.service {
            query.push(("service", service.as_str()));
        }

        tracing::debug!("Requesting token from {} (scope: {})", challenge.realm, scope);
        let response = self
            .http
            .get(&challenge.realm)
            .query(&query)
            .basic_auth(
                &credentials.username,
                Some(credentials.token.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| BuildError::AuthFailed {
                registry: registry.clone(),
                message: format!("Token endpoint unreachable: {}", e),
            })?;

        match response.status() {
            status if status.is_success() => {
                let body: serde_json::Value =
                    response.json().await.map_err(|e| BuildError::AuthFailed {
                        registry: registry.clone(),
                        message: format!("Invalid token response: {}", e),
                    })?;

                // トークンフィールドの欠落は実質的な拒否
                if body.get("token").is_some() || body.get("access_token").is_some() {
                    tracing::info!("Registry login verified for {}", registry);
                    Ok(())
                } else {
                    Err(BuildError::AuthRejected {
                        registry: registry.clone(),
                        message: "Token endpoint returned no token".to_string(),
                    })
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BuildError::AuthRejected {
                registry: registry.clone(),
                message: format!("Token endpoint returned {}", response.status()),
            }),
            status => Err(BuildError::AuthFailed {
                registry: registry.clone(),
                message: format!("Token endpoint returned {}", status),
            }),
        }
    }
}

/// レジストリ名からAPIホストを解決
///
/// Docker Hub だけは論理名（docker.io）とAPIホストが異なる
fn api_host(registry: &str) -> &str {
    if registry == "docker.io" {
        "registry-1.docker.io"
    } else {
        registry
    }
}

/// トークンスコープ用のリポジトリパスを解決
///
/// # Examples
/// - `ghcr.io/org/app` -> `org/app`
/// - `hseeberger/bayer-axum` -> `hseeberger/bayer-axum`
/// - `nginx` -> `library/nginx` (Docker Hub公式イメージの名前空間)
fn scope_repository(image: &str) -> String {
    let parts: Vec<&str> = image.split('/').collect();

    // 先頭要素がレジストリホストなら取り除く
    let has_host = parts.len() >= 2 && (parts[0].contains('.') || parts[0].contains(':'));
    let path: Vec<&str> = if has_host {
        parts[1..].to_vec()
    } else {
        parts
    };

    // library/ 名前空間はDocker Hubの裸イメージ名のみ
    if !has_host && path.len() == 1 {
        format!("library/{}", path[0])
    } else {
        path.join("/")
    }
}

/// `Bearer realm="...",service="..."` 形式のチャレンジをパース
fn parse_bearer_challenge(header: &str) -> Option<BearerChallenge> {
    let rest = header.strip_prefix("Bearer ")?;

    let mut realm = None;
    let mut service = None;

    for part in rest.split(',') {
        let (key, value) = part.split_once('=')?;
        let value = value.trim().trim_matches('"');
        match key.trim() {
            "realm" => realm = Some(value.to_string()),
            "service" => service = Some(value.to_string()),
            _ => {}
        }
    }

    Some(BearerChallenge {
        realm: realm?,
        service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_challenge_docker_hub() {
        let header = r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io""#;
        let challenge = parse_bearer_challenge(header).unwrap();

        assert_eq!(challenge.realm, "https://auth.docker.io/token");
        assert_eq!(challenge.service.as_deref(), Some("registry.docker.io"));
    }

    #[test]
    fn test_parse_bearer_challenge_no_service() {
        let header = r#"Bearer realm="https://registry.example.com/auth""#;
        let challenge = parse_bearer_challenge(header).unwrap();

        assert_eq!(challenge.realm, "https://registry.example.com/auth");
        assert!(challenge.service.is_none());
    }

    #[test]
    fn test_parse_bearer_challenge_rejects_basic() {
        assert!(parse_bearer_challenge(r#"Basic realm="registry""#).is_none());
        assert!(parse_bearer_challenge("garbage").is_none());
    }

    #[test]
    fn test_api_host() {
        assert_eq!(api_host("docker.io"), "registry-1.docker.io");
        assert_eq!(api_host("ghcr.io"), "ghcr.io");
        assert_eq!(api_host("localhost:5000"), "localhost:5000");
    }

    #[test]
    fn test_scope_repository() {
        assert_eq!(scope_repository("ghcr.io/org/app"), "org/app");
        assert_eq!(
            scope_repository("hseeberger/bayer-axum"),
            "hseeberger/bayer-axum"
        );
        assert_eq!(scope_repository("nginx"), "library/nginx");
        assert_eq!(scope_repository("localhost:5000/app"), "app");
    }
}
