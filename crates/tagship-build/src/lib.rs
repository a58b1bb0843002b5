//! Tagship image build functionality
//!
//! This crate provides the container image side of the release pipeline:
//! Dockerfile generation and resolution, build context creation, image
//! building, registry authentication and image pushing.

pub mod auth;
pub mod builder;
pub mod context;
pub mod dockerfile;
pub mod error;
pub mod login;
pub mod progress;
pub mod pusher;
pub mod resolver;

pub use auth::{Credentials, RegistryAuth};
pub use builder::ImageBuilder;
pub use context::ContextBuilder;
pub use dockerfile::DockerfileGenerator;
pub use error::{BuildError, BuildResult};
pub use login::RegistryClient;
pub use progress::BuildProgress;
pub use pusher::ImagePusher;
pub use resolver::{BuildResolver, ResolvedDockerfile};
