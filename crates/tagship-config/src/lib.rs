pub mod error;

pub use error::*;

use std::path::PathBuf;

/// Tagshipの設定ファイルパスを取得
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("tagship");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// プロジェクトのship.kdlファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 SHIP_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: ship.local.kdl, .ship.local.kdl, ship.kdl, .ship.kdl
/// 3. ./.tagship/ ディレクトリ内: 同様の順序
/// 4. ~/.config/tagship/ship.kdl (グローバル設定)
pub fn find_ship_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var("SHIP_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    let candidates = ["ship.local.kdl", ".ship.local.kdl", "ship.kdl", ".ship.kdl"];

    // 2. カレントディレクトリで検索
    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.tagship/ ディレクトリで検索
    let ship_dir = current_dir.join(".tagship");
    if ship_dir.is_dir() {
        for filename in &candidates {
            let path = ship_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    // 4. グローバル設定ファイル (~/.config/tagship/ship.kdl)
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("tagship").join("ship.kdl");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    // どの設定ファイルも見つからなかった
    Err(ConfigError::ShipFileNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_get_config_dir() {
        let result = get_config_dir();
        assert!(result.is_ok());

        let config_dir = result.unwrap();
        assert!(config_dir.ends_with("tagship"));
        assert!(config_dir.exists());
    }

    #[test]
    #[serial]
    fn test_find_ship_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("ship.kdl"), "// test").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_ship_file();
        assert!(result.is_ok());

        let ship_file = result.unwrap();
        assert!(ship_file.ends_with("ship.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_ship_file_local_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        // ship.kdl と ship.local.kdl の両方を作成
        fs::write(temp_dir.path().join("ship.kdl"), "// global").unwrap();
        fs::write(temp_dir.path().join("ship.local.kdl"), "// local").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_ship_file().unwrap();
        assert!(result.ends_with("ship.local.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_ship_file_in_tagship_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let ship_dir = temp_dir.path().join(".tagship");
        fs::create_dir(&ship_dir).unwrap();
        fs::write(ship_dir.join("ship.kdl"), "// test").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_ship_file().unwrap();
        assert!(result.ends_with(".tagship/ship.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }
}
