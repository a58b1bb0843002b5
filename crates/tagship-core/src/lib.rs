//! Tagship core
//!
//! タグイベントの解釈、イメージメタデータの導出、ship.kdl 設定の
//! パースとプロジェクトルート発見を提供します。

pub mod discovery;
pub mod error;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod version;

pub use discovery::find_project_root;
pub use error::{Result, ShipError};
pub use metadata::ImageMetadata;
pub use model::*;
pub use parser::{parse_kdl_file, parse_kdl_string};
pub use version::{SemVer, TagEvent};

use std::path::Path;
use tracing::{debug, info, instrument};

/// プロジェクト全体をロードしてShipを生成
///
/// 1. プロジェクトルートの検出
/// 2. ship.kdl のパース
#[instrument]
pub fn load_project() -> Result<Ship> {
    info!("Starting project load");
    let project_root = find_project_root()?;
    load_project_from_root(&project_root)
}

/// 指定されたルートディレクトリからプロジェクトをロード
#[instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn load_project_from_root(project_root: &Path) -> Result<Ship> {
    debug!("Parsing ship.kdl");
    let ship_file = discovery::ship_file_in(project_root)?;
    let ship = parse_kdl_file(&ship_file)?;
    info!(
        image = %ship.release.image,
        tags = ship.release.patterns.len(),
        "Project loaded successfully"
    );
    Ok(ship)
}
