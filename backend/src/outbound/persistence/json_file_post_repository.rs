//! Single-document JSON file repository.
//!
//! The whole collection lives in one file holding a JSON array. Writes go
//! through [`crate::outbound::atomic_write`], so a crash at any point leaves
//! either the previous or the new document on disk. A missing or unparsable
//! document loads as an empty collection. A document that exists but cannot
//! be read is a [`PostRepositoryError::Read`]; the service serves reads as
//! empty in that case but refuses to write over it.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::post_record::normalize_document;
use crate::domain::Post;
use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::outbound::atomic_write::{sweep_staging_residue, write_atomic};

const EMPTY_DOCUMENT: &[u8] = b"[]";

/// Posts stored in one JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFilePostRepository {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl JsonFilePostRepository {
    /// Open the document at `path`, creating its directory and an empty
    /// document on first boot.
    ///
    /// Staging files left by an interrupted write are removed here, before
    /// any write can be in flight.
    ///
    /// # Errors
    /// Returns [`PostRepositoryError::Write`] when the directory cannot be
    /// created or opened, or the initial document cannot be written.
    ///
    /// # Examples
    /// ```no_run
    /// use blog_backend::outbound::persistence::JsonFilePostRepository;
    ///
    /// let repo = JsonFilePostRepository::open("data/posts.json")?;
    /// # Ok::<(), blog_backend::domain::ports::PostRepositoryError>(())
    /// ```
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, PostRepositoryError> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(Utf8PathBuf::from)
            .ok_or_else(|| PostRepositoryError::write(format!("{path} has no file name")))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };

        Dir::create_ambient_dir_all(&parent, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(&parent, ambient_authority()))
            .map_err(|err| PostRepositoryError::write(format!("{parent}: {err}")))
            .and_then(|dir| {
                let repo = Self {
                    dir: Arc::new(dir),
                    file_name,
                    path,
                };
                repo.initialise()?;
                Ok(repo)
            })
    }

    fn initialise(&self) -> Result<(), PostRepositoryError> {
        let swept = sweep_staging_residue(&self.dir, &self.file_name);
        if swept > 0 {
            info!(path = %self.path, swept, "removed staging files from an interrupted write");
        }
        if self.dir.exists(&self.file_name) {
            return Ok(());
        }
        write_atomic(&self.dir, &self.file_name, EMPTY_DOCUMENT)
            .map_err(|err| PostRepositoryError::write(err.to_string()))?;
        info!(path = %self.path, "created empty posts store");
        Ok(())
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn read_document(
    dir: &Dir,
    file_name: &Utf8Path,
    path: &Utf8Path,
) -> Result<Vec<Post>, PostRepositoryError> {
    let bytes = match dir.read(file_name) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(%path, "posts store missing; serving empty collection");
            return Ok(Vec::new());
        }
        Err(err) => {
            warn!(%path, error = %err, "posts store unreadable");
            return Err(PostRepositoryError::read(format!("{path}: {err}")));
        }
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(document) => Ok(normalize_document(document)),
        Err(err) => {
            warn!(%path, error = %err, "posts store corrupt; serving empty collection");
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl PostRepository for JsonFilePostRepository {
    async fn load(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_document(&dir, &file_name, &path))
            .await
            .map_err(|err| PostRepositoryError::read(err.to_string()))?
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), PostRepositoryError> {
        let contents = serde_json::to_vec_pretty(posts)
            .map_err(|err| PostRepositoryError::write(err.to_string()))?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &file_name, &contents))
            .await
            .map_err(|err| PostRepositoryError::write(err.to_string()))?
            .map_err(|err| {
                warn!(path = %self.path, error = %err, "posts store write failed");
                PostRepositoryError::write(err.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPost, PostId, ReactionDirection, ReactionKind};
    use crate::outbound::atomic_write::stage;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Store {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    impl Store {
        fn raw(&self) -> String {
            std::fs::read_to_string(&self.path).expect("read store file")
        }

        fn write_raw(&self, contents: &str) {
            std::fs::write(&self.path, contents).expect("write store file");
        }

        fn entries(&self) -> Vec<String> {
            let mut names: Vec<_> = std::fs::read_dir(self.path.parent().expect("parent"))
                .expect("list dir")
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect();
            names.sort();
            names
        }
    }

    #[fixture]
    fn store() -> Store {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir");
        Store {
            path: root.join("data").join("posts.json"),
            _temp: temp,
        }
    }

    fn post(id: &str) -> Post {
        Post::create(
            PostId::new(id).expect("id"),
            NewPost {
                title: format!("Post {id}"),
                content: "Body".to_owned(),
                ..NewPost::default()
            },
            1_700_000_000_000,
        )
        .expect("post")
    }

    #[rstest]
    fn first_boot_writes_an_empty_array(store: Store) {
        JsonFilePostRepository::open(&store.path).expect("open");

        assert_eq!(store.raw(), "[]");
    }

    #[rstest]
    fn reopening_keeps_existing_document(store: Store) {
        JsonFilePostRepository::open(&store.path).expect("first open");
        store.write_raw(r#"[{"id":"x","title":"kept"}]"#);

        JsonFilePostRepository::open(&store.path).expect("second open");

        assert!(store.raw().contains("kept"));
    }

    #[rstest]
    #[tokio::test]
    async fn persisted_posts_load_back(store: Store) {
        let repo = JsonFilePostRepository::open(&store.path).expect("open");
        let mut liked = post("a");
        liked.react(ReactionKind::Like, ReactionDirection::Add, 1_700_000_000_500);

        repo.persist(&[liked.clone(), post("b")]).await.expect("persist");

        let loaded = repo.load().await.expect("load");
        assert_eq!(loaded, vec![liked, post("b")]);
        assert!(store.raw().contains("\"createdAt\""));
        assert_eq!(store.entries(), vec!["posts.json".to_owned()]);
    }

    #[rstest]
    #[case::corrupt("[{\"id\": \"a\"")]
    #[case::not_json("hello")]
    #[case::wrong_shape("{\"posts\": []}")]
    #[tokio::test]
    async fn unusable_documents_fail_open(store: Store, #[case] contents: &str) {
        let repo = JsonFilePostRepository::open(&store.path).expect("open");
        store.write_raw(contents);

        assert!(repo.load().await.expect("load fails open").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_document_fails_open(store: Store) {
        let repo = JsonFilePostRepository::open(&store.path).expect("open");
        std::fs::remove_file(&store.path).expect("remove");

        assert!(repo.load().await.expect("load fails open").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_document_is_an_error(store: Store) {
        let repo = JsonFilePostRepository::open(&store.path).expect("open");
        std::fs::remove_file(&store.path).expect("remove");
        std::fs::create_dir(&store.path).expect("directory in place of the document");

        let err = repo.load().await.expect_err("unreadable store");

        assert!(matches!(err, PostRepositoryError::Read { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn interrupted_write_is_invisible_and_swept_on_open(store: Store) {
        let repo = JsonFilePostRepository::open(&store.path).expect("open");
        repo.persist(&[post("a")]).await.expect("persist");

        let dir = Dir::open_ambient_dir(store.path.parent().expect("parent"), ambient_authority())
            .expect("open dir");
        let staged = stage(&dir, Utf8Path::new("posts.json"), b"[{\"id\": \"trunc").expect("stage");
        std::mem::forget(staged);
        assert_eq!(store.entries().len(), 2);

        assert_eq!(repo.load().await.expect("load"), vec![post("a")]);

        let reopened = JsonFilePostRepository::open(&store.path).expect("reopen");
        assert_eq!(store.entries(), vec!["posts.json".to_owned()]);
        assert_eq!(reopened.load().await.expect("load"), vec![post("a")]);
    }
}
