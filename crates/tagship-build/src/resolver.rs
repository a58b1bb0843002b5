use crate::dockerfile::DockerfileGenerator;
use crate::error::{BuildError, BuildResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tagship_core::BuildConfig;

/// 解決済みのDockerfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDockerfile {
    /// ディスク上の既存ファイル
    File(PathBuf),
    /// 自動生成されたレシピ
    Generated(String),
}

impl ResolvedDockerfile {
    /// Dockerfileの内容を読む
    pub fn content(&self) -> BuildResult<String> {
        match self {
            Self::File(path) => Ok(std::fs::read_to_string(path)?),
            Self::Generated(content) => Ok(content.clone()),
        }
    }
}

pub struct BuildResolver {
    project_root: PathBuf,
}

impl BuildResolver {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Dockerfileを解決
    ///
    /// 検索順序:
    /// 1. 明示的な指定（build.dockerfileフィールド）
    /// 2. 規約ベース: ./Dockerfile, ./docker/Dockerfile
    /// 3. どちらも無ければ2ステージレシピを生成
    pub fn resolve_dockerfile(&self, build: &BuildConfig) -> BuildResult<ResolvedDockerfile> {
        // 明示的な指定がある場合
        if let Some(dockerfile) = &build.dockerfile {
            let path = self.project_root.join(dockerfile);
            if path.exists() {
                return Ok(ResolvedDockerfile::File(path));
            } else {
                return Err(BuildError::DockerfileNotFound(path));
            }
        }

        // 規約ベースの検索
        let candidates = ["Dockerfile", "docker/Dockerfile"];
        for candidate in candidates {
            let path = self.project_root.join(candidate);
            if path.exists() {
                tracing::debug!("Found Dockerfile at: {}", path.display());
                return Ok(ResolvedDockerfile::File(path));
            }
        }

        // 見つからない場合はレシピを生成
        tracing::debug!("No Dockerfile found, generating two-stage recipe");
        Ok(ResolvedDockerfile::Generated(
            DockerfileGenerator::new(build).render(),
        ))
    }

    /// ビルドコンテキストのパスを解決
    ///
    /// デフォルトはプロジェクトルート
    pub fn resolve_context(&self, build: &BuildConfig) -> BuildResult<PathBuf> {
        let context = if let Some(ctx) = &build.context {
            self.project_root.join(ctx)
        } else {
            self.project_root.clone()
        };

        // コンテキストディレクトリの存在確認
        if !context.exists() {
            return Err(BuildError::ContextNotFound(context));
        }

        if !context.is_dir() {
            return Err(BuildError::InvalidConfig(format!(
                "Build context is not a directory: {}",
                context.display()
            )));
        }

        Ok(context)
    }

    /// ビルド引数の変数展開
    pub fn resolve_build_args(
        &self,
        build: &BuildConfig,
        variables: &HashMap<String, String>,
    ) -> HashMap<String, String> {
        let mut resolved_args = HashMap::new();

        for (key, value) in &build.args {
            // 変数展開: {VAR_NAME} → 実際の値
            let resolved_value = self.expand_variables(value, variables);
            self.validate_build_arg(key);
            resolved_args.insert(key.clone(), resolved_value);
        }

        resolved_args
    }

    /// 変数展開処理
    ///
    /// テンプレート文字列内の {VAR_NAME} を実際の値に置換
    fn expand_variables(&self, template: &str, variables: &HashMap<String, String>) -> String {
        let mut result = template.to_string();

        for (key, value) in variables {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// ビルド引数の検証（機密情報の警告）
    fn validate_build_arg(&self, key: &str) {
        let sensitive_patterns = ["password", "token", "secret", "api_key", "private_key"];

        let key_lower = key.to_lowercase();
        for pattern in &sensitive_patterns {
            if key_lower.contains(pattern) {
                tracing::warn!(
                    "警告: ビルド引数 '{}' は機密情報を含む可能性があります。\n\
                     ビルド引数はイメージ履歴に記録されます。\n\
                     機密情報はビルド引数ではなく、環境変数やシークレットマウントを使用してください。",
                    key
                );
            }
        }
    }
}
