use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: ship.kdl, ship.local.kdl, .ship.kdl, .ship.local.kdl\n\
        - ./.tagship/ ディレクトリ\n\
        - ~/.config/tagship/ship.kdl\n\
        または SHIP_CONFIG_PATH 環境変数で直接指定できます"
    )]
    ShipFileNotFound,

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
