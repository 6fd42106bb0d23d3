//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization. The build
//! defaults reproduce the fixed project layout, so `stitch.toml` is optional.

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn media() -> PathBuf {
        "assets/media".into()
    }

    pub fn styles() -> PathBuf {
        "assets/scss".into()
    }

    pub const fn max_depth() -> usize {
        64
    }

    pub mod sass {
        pub fn command() -> Vec<String> {
            vec!["sass".into()]
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub const fn port() -> u16 {
        8080
    }
}
