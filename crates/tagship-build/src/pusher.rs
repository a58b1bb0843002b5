//! イメージプッシュ処理
//!
//! ビルドしたイメージを、導出されたタグごとにレジストリへプッシュします。
//! 最初のタグで失敗した時点で実行は打ち切られ、残りのタグは試行されません。

use crate::auth::Credentials;
use crate::error::{BuildError, BuildResult};
use bollard::Docker;
use bollard::models::PushImageInfo;
use colored::Colorize;
use futures_util::StreamExt;
use std::io::Write;

/// イメージプッシュを実行するハンドラ
pub struct ImagePusher {
    docker: Docker,
}

impl ImagePusher {
    /// 新しい ImagePusher を作成
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// イメージをレジストリにプッシュ
    ///
    /// # Arguments
    /// * `image` - イメージ名（レジストリ込み、タグなし）
    /// * `tag` - イメージタグ
    /// * `credentials` - 解決済みの資格情報
    ///
    /// # Returns
    /// プッシュ成功時は完全なイメージ名を返す
    pub async fn push(
        &self,
        image: &str,
        tag: &str,
        credentials: &Credentials,
    ) -> BuildResult<String> {
        let full_image = format!("{}:{}", image, tag);

        // タグのバリデーション
        self.validate_tag(tag)?;

        // プッシュオプション
        #[allow(deprecated)]
        let options = bollard::image::PushImageOptions::<String> {
            tag: tag.to_string(),
        };

        println!("  → {}", full_image.cyan());

        // プッシュを実行
        #[allow(deprecated)]
        let mut stream = self
            .docker
            .push_image(image, Some(options), Some(credentials.to_docker()));

        let mut last_status = String::new();
        let mut error_message: Option<String> = None;

        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(err) = info.error {
                        error_message = Some(err);
                    } else {
                        self.handle_progress(&info, &mut last_status);
                    }
                }
                Err(e) => {
                    return Err(BuildError::PushFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        // 最終行の改行
        println!();

        // エラーがあった場合
        if let Some(err) = error_message {
            return Err(BuildError::PushFailed { message: err });
        }

        Ok(full_image)
    }

    /// タグのバリデーション
    fn validate_tag(&self, tag: &str) -> BuildResult<()> {
        // Docker タグの制約:
        // - 128文字以下
        // - 英数字、ピリオド、ハイフン、アンダースコアのみ
        // - 先頭はピリオドまたはハイフンではない

        if tag.is_empty() {
            return Err(BuildError::InvalidTag {
                tag: "(empty)".to_string(),
            });
        }

        if tag.len() > 128 {
            return Err(BuildError::InvalidTag {
                tag: format!("Tag too long ({} characters, max 128)", tag.len()),
            });
        }

        if tag.starts_with('.') || tag.starts_with('-') {
            return Err(BuildError::InvalidTag {
                tag: tag.to_string(),
            });
        }

        for c in tag.chars() {
            if !c.is_ascii_alphanumeric() && c != '.' && c != '-' && c != '_' {
                return Err(BuildError::InvalidTag {
                    tag: format!("Invalid character '{}' in tag: {}", c, tag),
                });
            }
        }

        Ok(())
    }

    /// プッシュ進捗を表示
    fn handle_progress(&self, info: &PushImageInfo, last_status: &mut String) {
        if let Some(status) = &info.status {
            let progress = info.progress.as_deref().unwrap_or("");

            // 状態に応じた表示
            match status.as_str() {
                "Pushing" => {
                    // プログレスバー表示
                    print!("\r  ↑ {} {}     ", status, progress);
                    std::io::stdout().flush().ok();
                }
                "Pushed" => {
                    println!("\r  {} Pushed                    ", "✓".green());
                }
                "Layer already exists" => {
                    println!("\r  {} Layer already exists      ", "✓".green());
                }
                "Preparing" | "Waiting" => {
                    // 準備中は表示をスキップ（ノイズ軽減）
                }
                _ => {
                    // その他のステータス
                    if status != last_status {
                        println!("\r  ℹ {}                    ", status);
                        *last_status = status.clone();
                    }
                }
            }
        }
    }
}
