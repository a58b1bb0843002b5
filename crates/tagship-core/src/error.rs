use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipError {
    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error("タグ '{tag}' はリリースパターン '{pattern}' に一致しません")]
    TagMismatch { tag: String, pattern: String },

    #[error("不明なタグパターン: {0}")]
    UnknownTagPattern(String),

    #[error(
        "プロジェクトルートが見つかりません\n探索開始位置: {0}\nヒント: ship.kdl ファイルを含むディレクトリで実行してください"
    )]
    ProjectRootNotFound(PathBuf),

    #[error("release に image が指定されていません")]
    MissingImage,

    #[error("build に binary が指定されていません")]
    MissingBinary,
}

pub type Result<T> = std::result::Result<T, ShipError>;
