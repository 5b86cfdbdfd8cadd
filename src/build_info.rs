//! Build and schema metadata
//!
//! `build.rs` stamps every compile with a build number and UTC timestamp.

use std::path::Path;

use serde::Serialize;

use crate::db::migrations::SCHEMA_VERSION;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build number from `build.rs`; 0 when the stamp is missing or unreadable
pub fn build_number() -> u64 {
    option_env!("FITTRACK_BUILD_NUMBER")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

pub fn compiled_at() -> &'static str {
    option_env!("FITTRACK_BUILD_TIMESTAMP").unwrap_or("unknown")
}

/// What this binary is and which schema it migrates databases to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build: u64,
    pub compiled_at: &'static str,
    pub schema_version: i32,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build: build_number(),
            compiled_at: compiled_at(),
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "fittrack {} (build {}, schema v{})",
            self.version, self.build, self.schema_version
        )
    }
}

/// Startup banner on stderr, leaving stdout to command output
pub fn print_startup_banner(database_path: &Path) {
    let info = BuildInfo::current();
    eprintln!("{}", info.label());
    eprintln!("  compiled {}", info.compiled_at);
    eprintln!("  database {}", database_path.display());
}
