//! ship build コマンドハンドラ

use crate::docker;
use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;
use tagship_core::metadata::LABEL_TITLE;
use tagship_core::{ImageMetadata, Ship, TagEvent};
use tagship_build::resolver::ResolvedDockerfile;
use tagship_build::{BuildResolver, ContextBuilder, ImageBuilder};

/// イメージをビルドし、導出された全タグを適用する
///
/// release と build の両コマンドが共有するビルド本体。
/// 成功時はプライマリイメージ名（`{repository}:{tag}`）を返す。
pub async fn build_image(
    docker_conn: &bollard::Docker,
    ship: &Ship,
    project_root: &Path,
    metadata: &ImageMetadata,
    no_cache: bool,
) -> anyhow::Result<String> {
    let resolver = BuildResolver::new(project_root.to_path_buf());
    let builder = ImageBuilder::new(docker_conn.clone());

    // Dockerfileを解決（無ければ2ステージレシピを生成）
    let dockerfile = match resolver.resolve_dockerfile(&ship.build) {
        Ok(dockerfile) => dockerfile,
        Err(e) => {
            eprintln!("  {} {}", "✗".red().bold(), e.user_message());
            return Err(anyhow::anyhow!("Dockerfile解決に失敗しました"));
        }
    };

    // コンテキストを解決
    let context_path = match resolver.resolve_context(&ship.build) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("  {} コンテキスト解決エラー: {}", "✗".red().bold(), e);
            return Err(anyhow::anyhow!("コンテキスト解決に失敗しました"));
        }
    };

    // ビルド引数を解決
    let variables: HashMap<String, String> = std::env::vars().collect();
    let build_args = resolver.resolve_build_args(&ship.build, &variables);

    let primary_image = metadata
        .primary_image()
        .ok_or_else(|| anyhow::anyhow!("導出されたタグがありません"))?;

    match &dockerfile {
        ResolvedDockerfile::File(path) => {
            println!("  → Dockerfile: {}", path.display().to_string().cyan());
        }
        ResolvedDockerfile::Generated(_) => {
            println!("  → Dockerfile: {}", "(2ステージレシピを自動生成)".cyan());
        }
    }
    println!("  → Context: {}", context_path.display().to_string().cyan());
    println!("  → Image: {}", primary_image.cyan());

    // コンテキストを作成してビルド実行
    let dockerfile_content = dockerfile.content()?;
    let context_data = ContextBuilder::create_context(&context_path, &dockerfile_content)?;

    let labels: HashMap<String, String> = metadata
        .labels
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    match builder
        .build_image(
            context_data,
            &primary_image,
            &build_args,
            &labels,
            no_cache,
        )
        .await
    {
        Ok(_) => {
            println!("  {} ビルド完了", "✓".green());
        }
        Err(e) => {
            eprintln!("  {} {}", "✗".red().bold(), e.user_message());
            return Err(anyhow::anyhow!("ビルドに失敗しました"));
        }
    }

    // 残りの導出タグを適用
    for tag in metadata.tags.iter().skip(1) {
        match builder
            .apply_tag(&primary_image, &metadata.repository, tag)
            .await
        {
            Ok(_) => {
                println!("  {} タグ付与: {}", "✓".green(), tag.cyan());
            }
            Err(e) => {
                eprintln!("  {} タグ付与エラー: {}", "✗".red().bold(), e);
                return Err(anyhow::anyhow!("タグ付与に失敗しました"));
            }
        }
    }

    Ok(primary_image)
}

/// ship build コマンド本体（ローカルビルドのみ、認証・プッシュなし）
pub async fn handle(
    ship: &Ship,
    project_root: &Path,
    tag: Option<&str>,
    no_cache: bool,
) -> anyhow::Result<()> {
    // タグ指定があればリリースと同じメタデータ、なければdevビルド
    let metadata = match tag {
        Some(tag) => {
            let event = TagEvent::parse(tag, &ship.release.tag_prefix)?;
            ImageMetadata::derive(ship, &event, None, chrono::Utc::now())
        }
        None => ImageMetadata {
            repository: ship.release.image.clone(),
            tags: vec!["dev".to_string()],
            labels: [(LABEL_TITLE.to_string(), ship.name.clone())]
                .into_iter()
                .collect(),
        },
    };

    println!("{}", "Dockerイメージをビルド中...".green());

    let docker_conn = docker::init_docker_with_error_handling().await?;
    let primary_image = build_image(&docker_conn, ship, project_root, &metadata, no_cache).await?;

    println!();
    println!(
        "{}",
        format!("✓ {} がビルドされました！", primary_image)
            .green()
            .bold()
    );

    Ok(())
}
