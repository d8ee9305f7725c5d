//! Shared harness: in-memory stores behind the real router, plus token minting.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use geo_blog::app::{build_api, build_router};
use geo_blog::config::{AppEnv, AuthConfig, Config, GeoConfig, HttpConfig};
use geo_blog::repos::error::{RepoError, RepoResult};
use geo_blog::repos::post_repo::{PostRow, PostWithAuthorRow};
use geo_blog::repos::user_repo::UserRow;
use geo_blog::repos::{PostStore, UserStore};
use geo_blog::services::auth::build_access_gate;
use geo_blog::services::geo::{LocationTagger, RangeTable};
use geo_blog::services::id_codec::IdCodec;
use geo_blog::services::password::PasswordHasher;
use geo_blog::state::AppState;

pub const SECRET: &str = "integration-test-secret";

pub const GEO_TABLE: &str = "\
203.0.113.0,203.0.113.255,US
198.51.100.0,198.51.100.255,FR
";

pub const US_PEER: [u8; 4] = [203, 0, 113, 7];
pub const FR_PEER: [u8; 4] = [198, 51, 100, 7];

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<UserRow>>,
    hashes: Mutex<Vec<(Uuid, String)>>,
    pub unavailable: AtomicBool,
}

impl MemoryUsers {
    pub fn insert(&self, username: &str, location: Option<&str>) -> UserRow {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: username.to_string(),
            location: location.map(str::to_string),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn password_hash(&self, user_id: Uuid) -> Option<String> {
        self.hashes
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, hash)| hash.clone())
    }

    pub fn remove(&self, user_id: Uuid) {
        self.rows.lock().unwrap().retain(|u| u.id != user_id);
    }

    fn username(&self, user_id: Uuid) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        location: Option<&str>,
    ) -> RepoResult<UserRow> {
        self.check_available()?;
        if self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username)
        {
            return Err(RepoError::Conflict("username"));
        }
        let row = self.insert(username, location);
        self.hashes
            .lock()
            .unwrap()
            .push((row.id, password_hash.to_string()));
        Ok(row)
    }

    async fn get(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }
}

pub struct MemoryPosts {
    users: Arc<MemoryUsers>,
    rows: Mutex<BTreeMap<i64, PostRow>>,
    next_id: AtomicI64,
    pub unavailable: AtomicBool,
}

impl MemoryPosts {
    pub fn new(users: Arc<MemoryUsers>) -> Self {
        Self {
            users,
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn with_author(&self, post: PostRow) -> Option<PostWithAuthorRow> {
        let author_name = self.users.username(post.author_id)?;
        Some(PostWithAuthorRow { post, author_name })
    }
}

#[async_trait]
impl PostStore for MemoryPosts {
    async fn create(
        &self,
        title: &str,
        content: &str,
        author_id: Uuid,
        location: Option<&str>,
    ) -> RepoResult<PostRow> {
        self.check_available()?;
        let now = Utc::now();
        let row = PostRow {
            post_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            location: location.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(row.post_id, row.clone());
        Ok(row)
    }

    async fn list_by_location(&self, location: &str) -> RepoResult<Vec<PostWithAuthorRow>> {
        self.check_available()?;
        let rows: Vec<PostRow> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .rev()
            .filter(|p| p.location.as_deref() == Some(location))
            .cloned()
            .collect();
        Ok(rows.into_iter().filter_map(|p| self.with_author(p)).collect())
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().get(&post_id).cloned())
    }

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>> {
        self.check_available()?;
        let row = self.rows.lock().unwrap().get(&post_id).cloned();
        Ok(row.and_then(|p| self.with_author(p)))
    }

    async fn update(
        &self,
        post_id: i64,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> RepoResult<Option<PostRow>> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&post_id).filter(|p| p.author_id == author_id) else {
            return Ok(None);
        };
        row.title = title.to_string();
        row.content = content.to_string();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, post_id: i64, author_id: Uuid) -> RepoResult<bool> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&post_id).is_some_and(|p| p.author_id == author_id) {
            rows.remove(&post_id);
            return Ok(true);
        }
        Ok(false)
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUsers>,
    pub posts: Arc<MemoryPosts>,
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_string(),
        issuer: None,
        audience: None,
        leeway_seconds: 0,
    }
}

/// Config for driving the full transport stack; nothing here touches a database.
pub fn test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        app_env: AppEnv::Development,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        sqids_min_length: 10,
        sqids_alphabet: ALPHABET.to_string(),
        password_hash_cost: 4,
        auth: auth_config(),
        geo: GeoConfig {
            table_path: None,
            trust_forwarded_for: false,
        },
        http: HttpConfig {
            request_timeout: Duration::from_secs(5),
            body_limit_bytes: 64 * 1024,
            cors_allowed_origins: Vec::new(),
        },
    }
}

impl TestApp {
    /// Routes only.
    pub fn new() -> Self {
        Self::build(build_api)
    }

    /// Routes plus request id, timeout, CORS and security header layers.
    pub fn with_transport() -> Self {
        Self::build(|state| build_router(state, &test_config()))
    }

    fn build(router: impl FnOnce(AppState) -> Router) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let posts = Arc::new(MemoryPosts::new(users.clone()));

        let gate = build_access_gate(&auth_config(), users.clone());
        let tagger = LocationTagger::new(Arc::new(RangeTable::parse(GEO_TABLE).unwrap()), false);
        let id_codec = IdCodec::new(10, ALPHABET).unwrap();

        let state = AppState::new(
            users.clone(),
            posts.clone(),
            id_codec,
            PasswordHasher::new(4),
            gate,
            Arc::new(tagger),
        );

        Self {
            router: router(state),
            users,
            posts,
        }
    }

    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, Bytes) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(req).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Create a post as `token`'s subject and return its public id.
    pub async fn create_post(&self, token: &str, title: &str, content: &str) -> String {
        let (status, body) = self
            .send(post_json(
                "/api/v1/posts",
                Some(token),
                json!({ "title": title, "content": content }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn mint(sub: &str, exp: i64, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": exp, "iat": Utc::now().timestamp() }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn token_for(user_id: Uuid) -> String {
    mint(&user_id.to_string(), Utc::now().timestamp() + 3600, SECRET)
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn get_from(uri: &str, peer: [u8; 4]) -> Request<Body> {
    Request::get(uri)
        .extension(ConnectInfo(SocketAddr::from((peer, 40000))))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_auth(Request::post(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn put_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_auth(Request::put(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::delete(uri), token)
        .body(Body::empty())
        .unwrap()
}
