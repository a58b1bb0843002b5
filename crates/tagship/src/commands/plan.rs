//! ship plan コマンドハンドラ
//!
//! リリースパイプラインのステップ1だけを実行し、導出される
//! タグとラベルを表示します。ネットワークにもDockerにも触れません。

use chrono::Utc;
use colored::Colorize;
use tagship_core::{ImageMetadata, Ship, TagEvent};

pub fn handle(ship: &Ship, tag: &str, revision: Option<&str>) -> anyhow::Result<()> {
    let event = match TagEvent::parse(tag, &ship.release.tag_prefix) {
        Ok(event) => event,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let metadata = ImageMetadata::derive(ship, &event, revision, Utc::now());

    println!("{}  {}", "リリースプラン:".bold(), tag.cyan().bold());
    println!();
    println!("バージョン: {}", event.version.to_string().cyan());
    println!("レジストリ: {}", ship.release.registry_host().cyan());
    println!();

    println!("{}", "イメージタグ:".bold());
    for tag in &metadata.tags {
        println!("  • {}:{}", metadata.repository, tag.cyan());
    }
    println!();

    println!("{}", "ラベル:".bold());
    for (key, value) in &metadata.labels {
        println!("  {} = {}", key.dimmed(), value);
    }

    Ok(())
}
