use crate::error::{BuildError, BuildResult};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::Path;
use tar::Builder;

pub struct ContextBuilder;

impl ContextBuilder {
    /// ビルドコンテキストをtar.gzアーカイブとして作成
    ///
    /// ソースツリーは読み取り専用で、アーカイブは1回のビルドが所有し
    /// ビルド後に破棄されます。Dockerfileは解決済みの内容（ディスク上の
    /// ファイルまたは生成レシピ）を "Dockerfile" として注入します。
    pub fn create_context(context_path: &Path, dockerfile_content: &str) -> BuildResult<Vec<u8>> {
        tracing::debug!("Creating build context from: {}", context_path.display());

        // tarアーカイブの作成
        let mut archive_data = Vec::new();
        {
            let encoder = GzEncoder::new(&mut archive_data, Compression::default());
            let mut tar = Builder::new(encoder);

            // コンテキストディレクトリを再帰的に追加
            tar.append_dir_all(".", context_path)
                .map_err(BuildError::Io)?;

            // Dockerfileを "Dockerfile" として追加
            let dockerfile_bytes = dockerfile_content.as_bytes();

            let mut header = tar::Header::new_gnu();
            header.set_path("Dockerfile").map_err(|e| {
                BuildError::InvalidConfig(format!("Failed to set Dockerfile path: {}", e))
            })?;
            header.set_size(dockerfile_bytes.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();

            tar.append(&header, dockerfile_bytes)
                .map_err(BuildError::Io)?;

            tar.finish().map_err(BuildError::Io)?;
        }

        tracing::debug!("Build context created: {} bytes", archive_data.len());

        // コンテキストサイズの警告
        Self::check_context_size(archive_data.len());

        Ok(archive_data)
    }

    /// コンテキストサイズのチェックと警告
    fn check_context_size(size: usize) {
        const MAX_CONTEXT_SIZE: usize = 500 * 1024 * 1024; // 500MB

        if size > MAX_CONTEXT_SIZE {
            tracing::warn!(
                "警告: ビルドコンテキストが大きすぎます（{}MB）\n\
                 .dockerignoreファイルで不要なファイルを除外することを推奨します。",
                size / 1024 / 1024
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_context() {
        let temp_dir = tempdir().unwrap();

        // テスト用のファイル構造を作成
        fs::write(temp_dir.path().join("Cargo.toml"), "[package]").unwrap();

        let src = temp_dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("main.rs"), "fn main() {}").unwrap();

        // コンテキストを作成
        let result = ContextBuilder::create_context(temp_dir.path(), "FROM alpine\n");
        assert!(result.is_ok());

        let archive = result.unwrap();
        assert!(!archive.is_empty());

        // tarアーカイブとして展開できるか確認
        let extract_dir = tempdir().unwrap();
        let mut archive_reader = std::io::Cursor::new(archive);
        let decoder = flate2::read::GzDecoder::new(&mut archive_reader);
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(extract_dir.path()).unwrap();

        // Dockerfileが注入されているか確認
        let dockerfile = extract_dir.path().join("Dockerfile");
        assert!(dockerfile.exists());
        assert_eq!(fs::read_to_string(dockerfile).unwrap(), "FROM alpine\n");
        assert!(extract_dir.path().join("src/main.rs").exists());
    }

    #[test]
    fn test_create_context_overrides_existing_dockerfile() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("Dockerfile"), "FROM old").unwrap();

        let archive =
            ContextBuilder::create_context(temp_dir.path(), "FROM new\n").unwrap();

        let extract_dir = tempdir().unwrap();
        let mut archive_reader = std::io::Cursor::new(archive);
        let decoder = flate2::read::GzDecoder::new(&mut archive_reader);
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(extract_dir.path()).unwrap();

        // 注入されたDockerfile（アーカイブ内で後勝ち）が採用される
        assert_eq!(
            fs::read_to_string(extract_dir.path().join("Dockerfile")).unwrap(),
            "FROM new\n"
        );
    }

    #[test]
    fn test_create_context_empty_dir() {
        let temp_dir = tempdir().unwrap();

        let result = ContextBuilder::create_context(temp_dir.path(), "FROM alpine");
        assert!(result.is_ok());
    }
}
