//! ship validate コマンドハンドラ

use colored::Colorize;

pub async fn handle() -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    // 設定ファイルを検索
    let ship_file = match tagship_config::find_ship_file() {
        Ok(path) => {
            println!("設定ファイル: {}", path.display().to_string().cyan());
            path
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定ファイルが見つかりません".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    match tagship_core::parse_kdl_file(&ship_file) {
        Ok(ship) => {
            println!("{}", "✓ 設定ファイルは正常です！".green().bold());
            println!();
            println!("サマリー:");
            println!("  プロジェクト: {}", ship.name.cyan());
            println!("  イメージ: {}", ship.release.image.cyan());
            println!("  レジストリ: {}", ship.release.registry_host().cyan());
            println!(
                "  タグプレフィックス: {}",
                ship.release.tag_prefix.cyan()
            );
            println!("  タグパターン: {}個", ship.release.patterns.len());

            println!("  バイナリ: {}", ship.build.binary.cyan());
            match &ship.build.dockerfile {
                Some(path) => {
                    println!("  Dockerfile: {}", path.display().to_string().cyan());
                }
                None => {
                    println!(
                        "  Dockerfile: {} ({} / {})",
                        "(自動生成)".cyan(),
                        ship.build.builder_image,
                        ship.build.runtime_image
                    );
                }
            }

            println!(
                "  資格情報: {} / {}",
                ship.auth.username_env.cyan(),
                ship.auth.token_env.cyan()
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
