mod commands;
mod docker;

use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "ship")]
#[command(about = "タグを打つ。イメージが出る。リリースは、それだけになった。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// リリースパイプラインを実行（メタデータ導出 → ログイン → ビルド → プッシュ）
    Release {
        /// バージョンタグ（例: v1.2.3）
        tag: String,
        /// イメージラベルに記録するソースリビジョン（コミットSHA等）
        #[arg(long, env = "TAGSHIP_REVISION")]
        revision: Option<String>,
        /// キャッシュを使用しない
        #[arg(long)]
        no_cache: bool,
    },
    /// 導出されるタグとラベルを表示（副作用なし）
    Plan {
        /// バージョンタグ（例: v1.2.3）
        tag: String,
        /// イメージラベルに記録するソースリビジョン（コミットSHA等）
        #[arg(long, env = "TAGSHIP_REVISION")]
        revision: Option<String>,
    },
    /// イメージをローカルでビルド（認証・プッシュなし）
    Build {
        /// バージョンタグ（省略時は dev タグでビルド）
        tag: Option<String>,
        /// キャッシュを使用しない
        #[arg(long)]
        no_cache: bool,
    },
    /// ビルド済みイメージをプッシュ
    Push {
        /// バージョンタグ（例: v1.2.3）
        tag: String,
    },
    /// 設定を検証
    Validate,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stderrにログ出力
    tracing_subscriber::fmt::init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("tagship {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Validateコマンドは独自のファイル発見ロジックを使用
    if matches!(cli.command, Commands::Validate) {
        return commands::validate::handle().await;
    }

    // プロジェクトルートを検索
    let project_root = match tagship_core::find_project_root() {
        Ok(root) => root,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ プロジェクトルートが見つかりません".red().bold());
            eprintln!("  {}", e);
            eprintln!();
            eprintln!("ship.kdl が存在するディレクトリで実行してください");
            std::process::exit(1);
        }
    };

    // ship.kdl をロード
    let ship = match tagship_core::load_project_from_root(&project_root) {
        Ok(ship) => ship,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    // コマンドディスパッチ
    match cli.command {
        Commands::Release {
            tag,
            revision,
            no_cache,
        } => {
            commands::release::handle(&ship, &project_root, &tag, revision.as_deref(), no_cache)
                .await?;
        }
        Commands::Plan { tag, revision } => {
            commands::plan::handle(&ship, &tag, revision.as_deref())?;
        }
        Commands::Build { tag, no_cache } => {
            commands::build::handle(&ship, &project_root, tag.as_deref(), no_cache).await?;
        }
        Commands::Push { tag } => {
            commands::push::handle(&ship, &tag).await?;
        }
        Commands::Validate => {
            unreachable!("Validate is handled before config loading");
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
