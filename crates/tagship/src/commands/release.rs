//! ship release コマンドハンドラ
//!
//! パイプラインは直列の一本道: メタデータ導出 → レジストリログイン →
//! イメージビルド → タグごとのプッシュ。どのステップの失敗も実行全体を
//! 打ち切ります。部分的な成功状態は存在しません。

use crate::commands::build::build_image;
use crate::docker;
use chrono::Utc;
use colored::Colorize;
use tagship_core::{ImageMetadata, Ship, TagEvent};
use tagship_build::{ImagePusher, RegistryAuth, RegistryClient};

pub async fn handle(
    ship: &Ship,
    project_root: &std::path::Path,
    tag: &str,
    revision: Option<&str>,
    no_cache: bool,
) -> anyhow::Result<()> {
    println!("{}", format!("🚢 {} をリリース中...", tag).green().bold());
    println!();

    // ステップ 1/4: タグイベントからメタデータを導出
    // 不一致のタグはここで打ち切り。認証は試行されない
    println!("{}", "[1/4] メタデータを導出中...".blue());
    let event = match TagEvent::parse(tag, &ship.release.tag_prefix) {
        Ok(event) => event,
        Err(e) => {
            eprintln!("  {} {}", "✗".red().bold(), e);
            return Err(anyhow::anyhow!("タグがリリースパターンに一致しません"));
        }
    };
    let metadata = ImageMetadata::derive(ship, &event, revision, Utc::now());

    println!("  バージョン: {}", event.version.to_string().cyan());
    println!("  リポジトリ: {}", metadata.repository.cyan());
    for tag in &metadata.tags {
        println!("  • {}", tag.cyan());
    }

    // ステップ 2/4: レジストリログイン
    // 拒否は致命的・リトライなし。ビルドは開始されない
    println!();
    println!("{}", "[2/4] レジストリにログイン中...".blue());
    let registry = ship.release.registry_host();
    let auth = RegistryAuth::new();
    let credentials = match auth.resolve(&ship.auth, &registry) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("  {} {}", "✗".red().bold(), e.user_message());
            return Err(anyhow::anyhow!("資格情報の解決に失敗しました"));
        }
    };

    let client = RegistryClient::new()?;
    match client.verify(&credentials, &metadata.repository).await {
        Ok(()) => {
            println!("  {} {} として認証されました", "✓".green(), credentials.username.cyan());
        }
        Err(e) => {
            eprintln!("  {} {}", "✗".red().bold(), e.user_message());
            return Err(anyhow::anyhow!("レジストリ認証に失敗しました"));
        }
    }

    // ステップ 3/4: イメージビルド
    // 失敗時はプッシュに進まない
    println!();
    println!("{}", "[3/4] イメージをビルド中...".blue());
    let docker_conn = docker::init_docker_with_error_handling().await?;
    let primary_image = build_image(&docker_conn, ship, project_root, &metadata, no_cache).await?;

    // ステップ 4/4: 導出された全タグをプッシュ
    // 最初の失敗で打ち切り
    println!();
    println!("{}", "[4/4] イメージをプッシュ中...".blue());
    let pusher = ImagePusher::new(docker_conn);
    let mut pushed: Vec<String> = Vec::new();

    for tag in &metadata.tags {
        match pusher.push(&metadata.repository, tag, &credentials).await {
            Ok(pushed_image) => {
                pushed.push(pushed_image);
            }
            Err(e) => {
                eprintln!("  {} プッシュエラー: {}", "✗".red().bold(), e);
                return Err(anyhow::anyhow!("プッシュに失敗しました"));
            }
        }
    }

    // 完了メッセージ
    println!();
    println!(
        "{}",
        format!("✓ {} がリリースされました！", primary_image)
            .green()
            .bold()
    );
    println!();
    println!("{}", "結果サマリー:".bold());
    for image in &pushed {
        println!("  {} {}", "✓".green(), image.cyan());
    }

    Ok(())
}
