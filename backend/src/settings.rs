//! Server settings loaded via OrthoConfig.
//!
//! Values come from `BLOG_*` environment variables, command-line flags or a
//! configuration file. Every field is optional; accessors supply defaults.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATA_FILE: &str = "data/posts.json";
const DEFAULT_UPLOADS_DIR: &str = "public/uploads";
const DEFAULT_UPLOADS_URL_PREFIX: &str = "/uploads";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const MIB: usize = 1024 * 1024;
const DEFAULT_MAX_BODY_BYTES: usize = 8 * MIB;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * MIB;

/// Configuration for the blog server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct BlogSettings {
    /// Path of the posts JSON document.
    pub data_file: Option<PathBuf>,
    /// Directory uploaded images are written to.
    pub uploads_dir: Option<PathBuf>,
    /// Public URL prefix under which uploaded images are served.
    pub uploads_url_prefix: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Largest accepted JSON request body in bytes.
    pub max_body_bytes: Option<usize>,
    /// Largest accepted decoded image in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Route reads through the write queue for read-after-write consistency.
    #[ortho_config(default = false)]
    pub serialize_reads: bool,
}

impl BlogSettings {
    /// Posts document location.
    pub fn data_file(&self) -> &Path {
        self.data_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATA_FILE))
    }

    /// Upload directory.
    pub fn uploads_dir(&self) -> &Path {
        self.uploads_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_UPLOADS_DIR))
    }

    /// URL prefix for stored uploads.
    pub fn uploads_url_prefix(&self) -> &str {
        self.uploads_url_prefix
            .as_deref()
            .unwrap_or(DEFAULT_UPLOADS_URL_PREFIX)
    }

    /// `(host, port)` pair to bind.
    pub fn bind_address(&self) -> (String, u16) {
        (
            self.host.as_deref().unwrap_or(DEFAULT_HOST).to_owned(),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// JSON body limit.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    /// Decoded image limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "BLOG_DATA_FILE",
        "BLOG_UPLOADS_DIR",
        "BLOG_UPLOADS_URL_PREFIX",
        "BLOG_HOST",
        "BLOG_PORT",
        "BLOG_MAX_BODY_BYTES",
        "BLOG_MAX_UPLOAD_BYTES",
        "BLOG_SERIALIZE_READS",
    ];

    fn load_from_empty_args() -> BlogSettings {
        BlogSettings::load_from_iter([OsString::from("blog-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.data_file(), Path::new("data/posts.json"));
        assert_eq!(settings.uploads_dir(), Path::new("public/uploads"));
        assert_eq!(settings.uploads_url_prefix(), "/uploads");
        assert_eq!(settings.bind_address(), ("0.0.0.0".to_owned(), 3000));
        assert_eq!(settings.max_body_bytes(), 8 * 1024 * 1024);
        assert_eq!(settings.max_upload_bytes(), 5 * 1024 * 1024);
        assert!(!settings.serialize_reads);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BLOG_DATA_FILE", Some("/srv/blog/posts.json".to_owned())),
            ("BLOG_UPLOADS_DIR", Some("/srv/blog/uploads".to_owned())),
            ("BLOG_UPLOADS_URL_PREFIX", Some("/media".to_owned())),
            ("BLOG_HOST", Some("127.0.0.1".to_owned())),
            ("BLOG_PORT", Some("8081".to_owned())),
            ("BLOG_MAX_BODY_BYTES", Some("1024".to_owned())),
            ("BLOG_MAX_UPLOAD_BYTES", Some("512".to_owned())),
            ("BLOG_SERIALIZE_READS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.data_file(), Path::new("/srv/blog/posts.json"));
        assert_eq!(settings.uploads_dir(), Path::new("/srv/blog/uploads"));
        assert_eq!(settings.uploads_url_prefix(), "/media");
        assert_eq!(settings.bind_address(), ("127.0.0.1".to_owned(), 8081));
        assert_eq!(settings.max_body_bytes(), 1024);
        assert_eq!(settings.max_upload_bytes(), 512);
        assert!(settings.serialize_reads);
    }
}
