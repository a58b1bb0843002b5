//! 2ステージDockerfileの生成
//!
//! ship.kdl でDockerfileを指定しない場合、ツールチェイン込みの
//! ビルドステージと最小ランタイムステージからなるレシピを生成します。
//! ランタイムイメージに入るのは実行ファイルと設定ディレクトリだけです。

use tagship_core::BuildConfig;

/// ビルド設定から2ステージのDockerfileを生成
pub struct DockerfileGenerator<'a> {
    build: &'a BuildConfig,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(build: &'a BuildConfig) -> Self {
        Self { build }
    }

    /// Dockerfileのテキストを生成
    ///
    /// ランタイムステージがビルドステージを参照するのは
    /// 2行の `COPY --from=builder` だけ。ツールチェイン、ソース、
    /// 中間生成物は最終イメージへ持ち込まれません。
    pub fn render(&self) -> String {
        let workdir = self.build.workdir();

        format!(
            r#"# === Stage 1: Builder ===
FROM {builder} AS builder
WORKDIR /build
COPY . .
RUN cargo install --locked --path . --root /build/dist

# === Stage 2: Runtime ===
FROM {runtime}
COPY --from=builder /build/dist/bin/{binary} /usr/local/bin/{binary}
COPY --from=builder /build/{config_dir} {workdir}/{config_dir}
WORKDIR {workdir}
ENTRYPOINT ["{binary}"]
"#,
            builder = self.build.builder_image,
            runtime = self.build.runtime_image,
            binary = self.build.binary,
            config_dir = self.build.config_dir,
            workdir = workdir,
        )
    }
}
