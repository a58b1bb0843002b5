use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_ship_kdl(&self, content: &str) {
        let path = self.root.path().join("ship.kdl");
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}

/// 最小構成のship.kdl
pub const MINIMAL_SHIP_KDL: &str = r#"
name "bayer-axum"

release {
    image "hseeberger/bayer-axum"
}

build {
    binary "bayer-axum"
}
"#;
