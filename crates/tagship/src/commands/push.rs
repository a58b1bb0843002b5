//! ship push コマンドハンドラ
//!
//! ビルド済みイメージを導出された全タグでプッシュします。
//! ビルドは実行しません（`ship build` を先に実行しておくこと）。

use crate::docker;
use chrono::Utc;
use colored::Colorize;
use tagship_core::{ImageMetadata, Ship, TagEvent};
use tagship_build::{ImageBuilder, ImagePusher, RegistryAuth, RegistryClient};

pub async fn handle(ship: &Ship, tag: &str) -> anyhow::Result<()> {
    // メタデータ導出（タグ不一致はここで打ち切り）
    let event = TagEvent::parse(tag, &ship.release.tag_prefix)?;
    let metadata = ImageMetadata::derive(ship, &event, None, Utc::now());

    // 資格情報の解決とログイン検証
    let registry = ship.release.registry_host();
    let auth = RegistryAuth::new();
    let credentials = match auth.resolve(&ship.auth, &registry) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e.user_message());
            return Err(anyhow::anyhow!("資格情報の解決に失敗しました"));
        }
    };

    let client = RegistryClient::new()?;
    if let Err(e) = client.verify(&credentials, &metadata.repository).await {
        eprintln!("{} {}", "✗".red().bold(), e.user_message());
        return Err(anyhow::anyhow!("レジストリ認証に失敗しました"));
    }

    // ビルド済みイメージの存在確認
    let docker_conn = docker::init_docker_with_error_handling().await?;
    let primary_image = metadata
        .primary_image()
        .ok_or_else(|| anyhow::anyhow!("導出されたタグがありません"))?;

    let builder = ImageBuilder::new(docker_conn.clone());
    if !builder.image_exists(&primary_image).await? {
        eprintln!(
            "{} イメージ {} が見つかりません。先に ship build {} を実行してください。",
            "✗".red().bold(),
            primary_image.cyan(),
            tag
        );
        return Err(anyhow::anyhow!("イメージがビルドされていません"));
    }

    // 全タグをプッシュ
    println!("{}", "📤 イメージをプッシュ中...".blue().bold());
    let pusher = ImagePusher::new(docker_conn);

    for tag in &metadata.tags {
        match pusher.push(&metadata.repository, tag, &credentials).await {
            Ok(pushed_image) => {
                println!("  {} {}", "✓".green(), pushed_image.cyan());
            }
            Err(e) => {
                eprintln!("  {} プッシュエラー: {}", "✗".red().bold(), e);
                return Err(anyhow::anyhow!("プッシュに失敗しました"));
            }
        }
    }

    println!();
    println!("{}", "✓ すべてのタグがプッシュされました！".green().bold());

    Ok(())
}
