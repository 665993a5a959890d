//! Default values for multi-compose configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Repository set file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "repos.yaml";

/// Directory repositories are cloned into.
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// Compose manifest expected at the root of every repository.
pub const DEFAULT_MANIFEST_FILENAME: &str = "docker-compose.yml";

/// Network every namespaced service is attached to.
pub const DEFAULT_NETWORK: &str = "common_network";

/// Program (and leading arguments) used to drive compose.
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker-compose";

/// Container engine CLI used for network management.
pub const DEFAULT_DOCKER_COMMAND: &str = "docker";

/// Placeholder written in place of a port in synthesized service URLs.
pub const PORT_PLACEHOLDER: &str = "port";
