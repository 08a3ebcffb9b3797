//! Tests for the queue-serialised post service.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use futures::future::join_all;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockPostRepository;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

/// Shared in-memory collection that yields between load and persist so
/// unserialised read-modify-write sequences would interleave.
#[derive(Default)]
struct YieldingRepository {
    posts: Mutex<Vec<Post>>,
    fail_persist: AtomicBool,
}

impl YieldingRepository {
    fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            fail_persist: AtomicBool::new(false),
        }
    }

    fn snapshot(&self) -> Vec<Post> {
        self.posts.lock().expect("posts lock").clone()
    }
}

#[async_trait]
impl PostRepository for YieldingRepository {
    async fn load(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self.snapshot();
        tokio::task::yield_now().await;
        Ok(posts)
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), PostRepositoryError> {
        tokio::task::yield_now().await;
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(PostRepositoryError::write("simulated disk failure"));
        }
        *self.posts.lock().expect("posts lock") = posts.to_vec();
        Ok(())
    }
}

fn seeded_post(id: &str, likes: u64) -> Post {
    Post::from_parts(crate::domain::PostParts {
        id: PostId::new(id).expect("id"),
        title: "Seeded".to_owned(),
        content: "Body".to_owned(),
        author: "Ada".to_owned(),
        created_at: 1_000,
        updated_at: 1_000,
        likes,
        dislikes: 0,
        image_url: None,
        comments: Vec::new(),
    })
}

fn service_over(
    repo: YieldingRepository,
    clock: Arc<dyn Clock>,
) -> (Arc<YieldingRepository>, PostsService<YieldingRepository>) {
    let repo = Arc::new(repo);
    let service = PostsService::new(Arc::clone(&repo), clock);
    (repo, service)
}

#[rstest]
#[tokio::test]
async fn create_post_assigns_identity_and_persists(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(YieldingRepository::default(), clock);

    let post = service
        .create_post(NewPost {
            title: "Hello".to_owned(),
            content: "World".to_owned(),
            author: Some("   ".to_owned()),
            image_url: None,
        })
        .await
        .expect("post created");

    let now = fixture_now().timestamp_millis();
    assert!(!post.id().as_str().is_empty());
    assert_eq!(post.author(), crate::domain::DEFAULT_AUTHOR);
    assert_eq!((post.likes(), post.dislikes()), (0, 0));
    assert_eq!((post.created_at(), post.updated_at()), (now, now));
    assert_eq!(repo.snapshot(), vec![post]);
}

#[rstest]
#[tokio::test]
async fn create_post_rejects_blank_title_without_touching_storage(clock: Arc<dyn Clock>) {
    let mut repo = MockPostRepository::new();
    repo.expect_load().never();
    repo.expect_persist().never();
    let service = PostsService::new(Arc::new(repo), clock);

    let err = service
        .create_post(NewPost {
            title: " ".to_owned(),
            ..NewPost::default()
        })
        .await
        .expect_err("blank title rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::update("update")]
#[case::delete("delete")]
#[case::like("like")]
#[case::comment("comment")]
#[tokio::test]
async fn missing_posts_are_not_found_and_never_persisted(
    clock: Arc<dyn Clock>,
    #[case] operation: &str,
) {
    let mut repo = MockPostRepository::new();
    repo.expect_load()
        .returning(|| Ok(vec![seeded_post("present", 0)]));
    repo.expect_persist().never();
    let service = PostsService::new(Arc::new(repo), clock);
    let id = PostId::new("absent").expect("id");

    let err = match operation {
        "update" => service
            .update_post(&id, PostChanges::default())
            .await
            .map(drop),
        "delete" => service.delete_post(&id).await,
        "like" => service
            .react(&id, ReactionKind::Like, ReactionDirection::Add)
            .await
            .map(drop),
        _ => service
            .add_comment(
                &id,
                NewComment {
                    content: "hi".to_owned(),
                    author: None,
                },
            )
            .await
            .map(drop),
    }
    .expect_err("missing post");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_post_applies_changes_and_bumps_updated_at(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("p", 3)]),
        clock,
    );
    let id = PostId::new("p").expect("id");

    let updated = service
        .update_post(
            &id,
            PostChanges {
                title: Some("Renamed".to_owned()),
                ..PostChanges::default()
            },
        )
        .await
        .expect("updated");

    assert_eq!(updated.title(), "Renamed");
    assert_eq!(updated.content(), "Body");
    assert_eq!(updated.likes(), 3);
    assert_eq!(updated.created_at(), 1_000);
    assert_eq!(updated.updated_at(), fixture_now().timestamp_millis());
    assert_eq!(repo.snapshot(), vec![updated]);
}

#[rstest]
#[tokio::test]
async fn delete_post_removes_it_once(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("a", 0), seeded_post("b", 0)]),
        clock,
    );
    let id = PostId::new("a").expect("id");

    service.delete_post(&id).await.expect("deleted");
    let again = service.delete_post(&id).await.expect_err("already gone");

    assert_eq!(again.code(), ErrorCode::NotFound);
    let remaining: Vec<_> = repo
        .snapshot()
        .iter()
        .map(|post| post.id().to_string())
        .collect();
    assert_eq!(remaining, vec!["b".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_are_never_lost(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("hot", 0)]),
        clock,
    );
    let id = PostId::new("hot").expect("id");

    let results = join_all((0..40).map(|_| {
        let service = service.clone();
        let id = id.clone();
        tokio::spawn(async move {
            service
                .react(&id, ReactionKind::Like, ReactionDirection::Add)
                .await
        })
    }))
    .await;

    let counts: BTreeSet<u64> = results
        .into_iter()
        .map(|joined| joined.expect("task joined").expect("like applied").count)
        .collect();
    assert_eq!(counts, (1..=40).collect::<BTreeSet<u64>>());
    assert_eq!(repo.snapshot()[0].likes(), 40);
}

#[rstest]
#[case(ReactionKind::Like, 0, 0)]
#[case(ReactionKind::Dislike, 0, 0)]
#[case(ReactionKind::Like, 5, 4)]
#[tokio::test]
async fn removing_a_reaction_clamps_at_zero(
    clock: Arc<dyn Clock>,
    #[case] kind: ReactionKind,
    #[case] initial_likes: u64,
    #[case] expected: u64,
) {
    let (_repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("p", initial_likes)]),
        clock,
    );
    let id = PostId::new("p").expect("id");

    let outcome = service
        .react(&id, kind, ReactionDirection::Remove)
        .await
        .expect("reaction applied");

    assert_eq!(outcome.kind, kind);
    assert_eq!(outcome.count, expected);
}

#[rstest]
#[tokio::test]
async fn failed_persist_leaves_collection_untouched(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("p", 7)]),
        clock,
    );
    let before = repo.snapshot();
    repo.fail_persist.store(true, Ordering::SeqCst);
    let id = PostId::new("p").expect("id");

    let err = service
        .react(&id, ReactionKind::Like, ReactionDirection::Add)
        .await
        .expect_err("persist failed");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(repo.snapshot(), before);

    repo.fail_persist.store(false, Ordering::SeqCst);
    let next = service
        .react(&id, ReactionKind::Like, ReactionDirection::Add)
        .await
        .expect("queue still usable");
    assert_eq!(next.count, 8);
}

#[rstest]
#[tokio::test]
async fn add_comment_appends_in_order(clock: Arc<dyn Clock>) {
    let (repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("p", 0)]),
        clock,
    );
    let id = PostId::new("p").expect("id");

    for content in ["first", "second"] {
        service
            .add_comment(
                &id,
                NewComment {
                    content: content.to_owned(),
                    author: Some("Grace".to_owned()),
                },
            )
            .await
            .expect("comment added");
    }

    let stored = repo.snapshot();
    let contents: Vec<_> = stored[0]
        .comments()
        .iter()
        .map(|comment| comment.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
    assert!(stored[0].comments().iter().all(|c| c.id.is_some()));
}

#[rstest]
#[case::relaxed(ReadConsistency::Relaxed)]
#[case::serialized(ReadConsistency::Serialized)]
#[tokio::test]
async fn reads_return_stored_posts(clock: Arc<dyn Clock>, #[case] reads: ReadConsistency) {
    let (_repo, service) = service_over(
        YieldingRepository::with_posts(vec![seeded_post("a", 1), seeded_post("b", 2)]),
        clock,
    );
    let service = service.with_read_consistency(reads);

    let listed = service.list_posts().await.expect("listed");
    let found = service
        .get_post(&PostId::new("b").expect("id"))
        .await
        .expect("found");
    let missing = service
        .get_post(&PostId::new("zzz").expect("id"))
        .await
        .expect_err("missing");

    assert_eq!(listed.len(), 2);
    assert_eq!(found.likes(), 2);
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn serialized_reads_observe_earlier_writes(clock: Arc<dyn Clock>) {
    let (_repo, service) = service_over(YieldingRepository::default(), clock);
    let service = service.with_read_consistency(ReadConsistency::Serialized);

    let (created, listed) = tokio::join!(
        service.create_post(NewPost {
            title: "First".to_owned(),
            ..NewPost::default()
        }),
        service.list_posts(),
    );

    let created = created.expect("created");
    assert_eq!(listed.expect("listed"), vec![created]);
}

#[rstest]
#[tokio::test]
async fn unreadable_store_reads_as_empty(clock: Arc<dyn Clock>) {
    let mut repo = MockPostRepository::new();
    repo.expect_load()
        .returning(|| Err(PostRepositoryError::read("too many open files")));
    let service = PostsService::new(Arc::new(repo), clock);

    let listed = service.list_posts().await.expect("list fails open");
    let missing = service
        .get_post(&PostId::new("a").expect("id"))
        .await
        .expect_err("nothing to find");

    assert!(listed.is_empty());
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unreadable_store_aborts_mutations_without_persisting(clock: Arc<dyn Clock>) {
    let mut repo = MockPostRepository::new();
    repo.expect_load()
        .times(2)
        .returning(|| Err(PostRepositoryError::read("too many open files")));
    repo.expect_persist().never();
    let service = PostsService::new(Arc::new(repo), clock);

    let created = service
        .create_post(NewPost {
            title: "Would overwrite".to_owned(),
            ..NewPost::default()
        })
        .await
        .expect_err("create aborted");
    let liked = service
        .react(
            &PostId::new("a").expect("id"),
            ReactionKind::Like,
            ReactionDirection::Add,
        )
        .await
        .expect_err("like aborted");

    assert_eq!(created.code(), ErrorCode::InternalError);
    assert_eq!(liked.code(), ErrorCode::InternalError);
}
