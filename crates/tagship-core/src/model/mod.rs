//! モデル定義
//!
//! Tagshipで使用されるデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod auth;
mod build;
mod release;
mod ship;

// Re-exports
pub use auth::*;
pub use build::*;
pub use release::*;
pub use ship::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_creation() {
        let ship = Ship {
            name: "bayer-axum".to_string(),
            release: ReleaseConfig {
                image: "hseeberger/bayer-axum".to_string(),
                ..Default::default()
            },
            build: BuildConfig {
                binary: "bayer-axum".to_string(),
                ..Default::default()
            },
            auth: AuthConfig::default(),
        };

        assert_eq!(ship.name, "bayer-axum");
        assert_eq!(ship.release.image, "hseeberger/bayer-axum");
        assert_eq!(ship.release.tag_prefix, "v");
        assert_eq!(ship.release.patterns, vec![TagPattern::Version]);
    }

    #[test]
    fn test_ship_serialization() {
        let ship = Ship {
            name: "demo".to_string(),
            release: ReleaseConfig {
                image: "ghcr.io/acme/demo".to_string(),
                ..Default::default()
            },
            build: BuildConfig {
                binary: "demo".to_string(),
                ..Default::default()
            },
            auth: AuthConfig::default(),
        };

        let json = serde_json::to_string(&ship).unwrap();
        assert!(json.contains("ghcr.io/acme/demo"));

        let deserialized: Ship = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.release.image, ship.release.image);
        assert_eq!(deserialized.build.binary, ship.build.binary);
    }
}
