use folio_core::{ContactMessage, Retention, ShortCode, ShortUrlRecord};
use folio_storage::{ContactRepository, MySqlRepository, ReadRepository, Repository, StorageError};
use folio_test_infra::mysql::{MySqlConfig, MySqlServer};
use jiff::{SignedDuration, Timestamp};
use sqlx::Row;

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start(retention: Retention) -> Self {
        let mysql = MySqlServer::new(MySqlConfig::default())
            .await
            .expect("start mysql");
        let repo = mysql.repository(retention).await.expect("mysql repository");

        Self {
            _mysql: mysql,
            repo,
        }
    }
}

fn ts(second: i64) -> Timestamp {
    Timestamp::from_second(second).unwrap()
}

fn record(code: &str, url: &str, created_at: Timestamp) -> ShortUrlRecord {
    ShortUrlRecord {
        original_url: url.to_string(),
        short_code: ShortCode::new_unchecked(code),
        created_at,
    }
}

fn one_hour() -> Retention {
    Retention::from_duration(SignedDuration::from_hours(1))
}

#[tokio::test]
async fn insert_and_get_live_record() {
    let fixture = Fixture::start(Retention::default()).await;
    let rec = record("abc123", "https://example.com/very/long/path", ts(1_700_000_000));

    fixture.repo.insert(rec.clone()).await.unwrap();

    let got = fixture
        .repo
        .get(&rec.short_code, ts(1_700_000_001))
        .await
        .unwrap();
    assert_eq!(got, Some(rec));
}

#[tokio::test]
async fn insert_conflicts_when_code_is_live() {
    let fixture = Fixture::start(Retention::default()).await;

    fixture
        .repo
        .insert(record("abc123", "https://one.example", ts(1_000)))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(record("abc123", "https://two.example", ts(1_001)))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn codes_differing_only_in_case_are_distinct() {
    let fixture = Fixture::start(Retention::default()).await;

    fixture
        .repo
        .insert(record("AbCdEf", "https://upper.example", ts(1_000)))
        .await
        .unwrap();
    fixture
        .repo
        .insert(record("abcdef", "https://lower.example", ts(1_000)))
        .await
        .unwrap();

    let got = fixture
        .repo
        .get(&ShortCode::new_unchecked("AbCdEf"), ts(1_001))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got.original_url, "https://upper.example");
}

#[tokio::test]
async fn expired_record_is_hidden_and_reclaimable() {
    let fixture = Fixture::start(one_hour()).await;
    let code = ShortCode::new_unchecked("expire");

    fixture
        .repo
        .insert(record("expire", "https://old.example", ts(0)))
        .await
        .unwrap();

    assert!(fixture.repo.get(&code, ts(3_599)).await.unwrap().is_some());
    assert!(fixture.repo.get(&code, ts(3_600)).await.unwrap().is_none());

    fixture
        .repo
        .insert(record("expire", "https://new.example", ts(3_600)))
        .await
        .unwrap();
    let got = fixture.repo.get(&code, ts(3_601)).await.unwrap().unwrap();
    assert_eq!(got.original_url, "https://new.example");
}

#[tokio::test]
async fn purge_deletes_expired_rows() {
    let fixture = Fixture::start(one_hour()).await;

    for (code, created) in [("gone01", 0), ("gone02", 10), ("kept01", 3_000)] {
        fixture
            .repo
            .insert(record(code, "https://example.com", ts(created)))
            .await
            .unwrap();
    }

    let removed = fixture.repo.purge_expired(ts(3_700)).await.unwrap();
    assert_eq!(removed, 2);

    let remaining: i64 = sqlx::query("SELECT COUNT(*) AS n FROM short_urls")
        .fetch_one(fixture.repo.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn saves_contact_message() {
    let fixture = Fixture::start(Retention::default()).await;
    let message = ContactMessage::new(
        "Ada",
        "ada@example.com",
        "Hello",
        "Loved the projects page",
        ts(1_700_000_000),
    )
    .unwrap();

    fixture.repo.save(message).await.unwrap();

    let row = sqlx::query("SELECT email, subject FROM contact_messages")
        .fetch_one(fixture.repo.pool())
        .await
        .unwrap();
    assert_eq!(row.get::<String, _>("email"), "ada@example.com");
    assert_eq!(row.get::<String, _>("subject"), "Hello");
}

#[tokio::test]
async fn close_rejects_further_operations() {
    let fixture = Fixture::start(Retention::default()).await;

    fixture.repo.close().await;

    let err = fixture
        .repo
        .get(&ShortCode::new_unchecked("abc123"), ts(0))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}
