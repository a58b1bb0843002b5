//! プロジェクトルートの発見
//!
//! カレントディレクトリから上に向かって ship.kdl を探します。

use crate::error::{Result, ShipError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// プロジェクトルートを検出
///
/// 以下の優先順位で検索:
/// 1. 環境変数 TAGSHIP_PROJECT_ROOT
/// 2. カレントディレクトリから上に向かって以下を探す:
///    - ship.kdl
///    - .tagship/ship.kdl
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    // 1. 環境変数
    if let Ok(root) = std::env::var("TAGSHIP_PROJECT_ROOT") {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking TAGSHIP_PROJECT_ROOT");
        if path.join("ship.kdl").exists() || path.join(".tagship/ship.kdl").exists() {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
    }

    // 2. カレントディレクトリから上に向かって探す
    let start_dir = std::env::current_dir()?;
    let mut current = start_dir.clone();
    debug!(start_dir = %start_dir.display(), "Searching for project root");

    loop {
        let ship_file = current.join("ship.kdl");
        if ship_file.exists() {
            info!(project_root = %current.display(), "Found project root (ship.kdl)");
            return Ok(current);
        }

        let tagship_dir_file = current.join(".tagship/ship.kdl");
        if tagship_dir_file.exists() {
            info!(project_root = %current.display(), "Found project root (.tagship/ship.kdl)");
            return Ok(current);
        }

        // 親ディレクトリへ
        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(ShipError::ProjectRootNotFound(start_dir))
}

/// プロジェクトルート内の ship.kdl のパスを解決
pub fn ship_file_in(project_root: &Path) -> Result<PathBuf> {
    let candidates = [
        project_root.join("ship.kdl"),
        project_root.join(".tagship/ship.kdl"),
    ];
    for candidate in candidates {
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(ShipError::ProjectRootNotFound(project_root.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_ship_file_in_root() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("ship.kdl"), "// test").unwrap();

        let found = ship_file_in(temp_dir.path()).unwrap();
        assert!(found.ends_with("ship.kdl"));
    }

    #[test]
    fn test_ship_file_in_hidden_dir() {
        let temp_dir = tempdir().unwrap();
        let hidden = temp_dir.path().join(".tagship");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("ship.kdl"), "// test").unwrap();

        let found = ship_file_in(temp_dir.path()).unwrap();
        assert!(found.ends_with(".tagship/ship.kdl"));
    }

    #[test]
    fn test_ship_file_not_found() {
        let temp_dir = tempdir().unwrap();
        let err = ship_file_in(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ShipError::ProjectRootNotFound(_)));
    }
}
