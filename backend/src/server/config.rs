//! HTTP server configuration object and helpers.

use std::io;
use std::path::Path;

use camino::Utf8PathBuf;

use blog_backend::domain::ReadConsistency;
use blog_backend::settings::BlogSettings;

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) data_file: Utf8PathBuf,
    pub(crate) uploads_dir: Utf8PathBuf,
    pub(crate) uploads_url_prefix: String,
    pub(crate) max_body_bytes: usize,
    pub(crate) max_upload_bytes: usize,
    pub(crate) reads: ReadConsistency,
}

fn utf8_path(path: &Path, setting: &str) -> io::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|raw| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{setting} must be valid UTF-8: {}", raw.display()),
        )
    })
}

impl ServerConfig {
    /// Resolve settings into concrete paths and limits.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] when a configured path is not
    /// valid UTF-8.
    pub fn from_settings(settings: &BlogSettings) -> io::Result<Self> {
        Ok(Self {
            bind_addr: settings.bind_address(),
            data_file: utf8_path(settings.data_file(), "data_file")?,
            uploads_dir: utf8_path(settings.uploads_dir(), "uploads_dir")?,
            uploads_url_prefix: settings.uploads_url_prefix().to_owned(),
            max_body_bytes: settings.max_body_bytes(),
            max_upload_bytes: settings.max_upload_bytes(),
            reads: if settings.serialize_reads {
                ReadConsistency::Serialized
            } else {
                ReadConsistency::Relaxed
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn settings(serialize_reads: bool) -> BlogSettings {
        BlogSettings {
            data_file: Some(PathBuf::from("/tmp/blog/posts.json")),
            uploads_dir: None,
            uploads_url_prefix: None,
            host: Some("127.0.0.1".to_owned()),
            port: Some(0),
            max_body_bytes: None,
            max_upload_bytes: Some(10),
            serialize_reads,
        }
    }

    #[rstest]
    #[case(false, ReadConsistency::Relaxed)]
    #[case(true, ReadConsistency::Serialized)]
    fn resolves_settings(#[case] serialize_reads: bool, #[case] reads: ReadConsistency) {
        let config = ServerConfig::from_settings(&settings(serialize_reads)).expect("config");

        assert_eq!(config.bind_addr, ("127.0.0.1".to_owned(), 0));
        assert_eq!(config.data_file, Utf8PathBuf::from("/tmp/blog/posts.json"));
        assert_eq!(config.uploads_dir, Utf8PathBuf::from("public/uploads"));
        assert_eq!(config.max_upload_bytes, 10);
        assert_eq!(config.reads, reads);
    }
}
