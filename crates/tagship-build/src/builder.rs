use crate::error::{BuildError, BuildResult};
use bollard::Docker;
use bollard::image::BuildImageOptions;
use colored::Colorize;
use futures_util::stream::StreamExt;
use std::collections::HashMap;

pub struct ImageBuilder {
    docker: Docker,
}

impl ImageBuilder {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// イメージをビルド
    ///
    /// プライマリタグでビルドし、導出されたラベルを焼き込みます。
    /// ストリーム中のエラーフレームは即座に失敗となり、
    /// 部分的な成果物は残りません。
    pub async fn build_image(
        &self,
        context_data: Vec<u8>,
        tag: &str,
        build_args: &HashMap<String, String>,
        labels: &HashMap<String, String>,
        no_cache: bool,
    ) -> BuildResult<()> {
        tracing::info!("Building image: {}", tag);

        // build_argsとlabelsを&str型に変換
        let build_args_refs: HashMap<&str, &str> = build_args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let labels_refs: HashMap<&str, &str> = labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        #[allow(deprecated)]
        let options = BuildImageOptions {
            dockerfile: "Dockerfile",
            t: tag,
            buildargs: build_args_refs,
            labels: labels_refs,
            nocache: no_cache,
            rm: true,      // 中間コンテナを削除
            forcerm: true, // ビルド失敗時も中間コンテナを削除
            pull: true,    // ベースイメージを常にpull
            ..Default::default()
        };

        tracing::debug!("Build options: {:?}", options);
        if !build_args.is_empty() {
            tracing::debug!("Build args: {:?}", build_args);
        }

        // ビルドストリームの開始
        use bytes::Bytes;
        use http_body_util::{Either, Full};
        let context_bytes = Bytes::from(context_data);
        let body = Full::new(context_bytes);
        #[allow(deprecated)]
        let mut stream = self
            .docker
            .build_image(options, None, Some(Either::Left(body)));

        // ビルド進捗の表示
        while let Some(msg) = stream.next().await {
            match msg {
                Ok(output) => {
                    self.handle_build_output(output)?;
                }
                Err(e) => {
                    return Err(BuildError::DockerConnection(e));
                }
            }
        }

        tracing::info!("Successfully built: {}", tag);
        Ok(())
    }

    /// ビルド出力の処理
    fn handle_build_output(&self, output: bollard::models::BuildInfo) -> BuildResult<()> {
        if let Some(stream) = output.stream {
            // ビルドステップの出力
            print!("{}", stream);
        }

        if let Some(error) = output.error {
            // エラーが発生した場合
            return Err(BuildError::BuildFailed(error));
        }

        if let Some(error_detail) = output.error_detail {
            // 詳細なエラー情報
            let error_msg = error_detail
                .message
                .unwrap_or_else(|| "Unknown build error".to_string());
            return Err(BuildError::BuildFailed(error_msg));
        }

        if let Some(status) = output.status {
            // ステータスメッセージ（pull等）
            println!("{}", status.cyan());
        }

        Ok(())
    }

    /// ビルド済みイメージに追加タグを付与
    ///
    /// プライマリタグでビルドした後、残りの導出タグを適用します。
    pub async fn apply_tag(&self, source: &str, repo: &str, tag: &str) -> BuildResult<()> {
        tracing::debug!("Tagging {} as {}:{}", source, repo, tag);

        #[allow(deprecated)]
        let options = bollard::image::TagImageOptions { repo, tag };

        self.docker
            .tag_image(source, Some(options))
            .await
            .map_err(BuildError::DockerConnection)
    }

    /// イメージの存在確認
    pub async fn image_exists(&self, image_tag: &str) -> BuildResult<bool> {
        match self.docker.inspect_image(image_tag).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(BuildError::DockerConnection(e)),
        }
    }
}
