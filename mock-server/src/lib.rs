use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Seconds a login session is advertised as valid.
pub const SESSION_TTL_SECS: u64 = 3600;
pub const RATE_LIMIT: &str = "5000";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<i32>,
}

#[derive(Deserialize)]
pub struct LoginParams {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Users keyed by username.
pub type Db = Arc<RwLock<HashMap<String, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/user", post(create_user))
        .route("/user/createWithArray", post(create_users))
        .route("/user/createWithList", post(create_users))
        .route("/user/login", get(login_user))
        .route("/user/logout", get(logout_user))
        .route(
            "/user/{username}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock pet store serving");
    }
    axum::serve(listener, app()).await
}

async fn create_user(State(db): State<Db>, Json(user): Json<User>) -> StatusCode {
    let Some(username) = user.username.clone() else {
        return StatusCode::BAD_REQUEST;
    };
    debug!(%username, "create user");
    db.write().await.insert(username, user);
    StatusCode::OK
}

async fn create_users(State(db): State<Db>, Json(users): Json<Vec<User>>) -> StatusCode {
    if users.iter().any(|user| user.username.is_none()) {
        return StatusCode::BAD_REQUEST;
    }
    debug!(count = users.len(), "create users");
    let mut store = db.write().await;
    for user in users {
        if let Some(username) = user.username.clone() {
            store.insert(username, user);
        }
    }
    StatusCode::OK
}

async fn get_user(
    State(db): State<Db>,
    Path(username): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let users = db.read().await;
    users.get(&username).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(username): Path<String>,
    Json(mut user): Json<User>,
) -> StatusCode {
    let mut users = db.write().await;
    if users.remove(&username).is_none() {
        return StatusCode::NOT_FOUND;
    }
    let key = user.username.get_or_insert_with(|| username.clone()).clone();
    debug!(%username, renamed_to = %key, "update user");
    users.insert(key, user);
    StatusCode::OK
}

async fn delete_user(State(db): State<Db>, Path(username): Path<String>) -> StatusCode {
    let mut users = db.write().await;
    users
        .remove(&username)
        .map(|_| StatusCode::OK)
        .unwrap_or(StatusCode::NOT_FOUND)
}

async fn login_user(Query(params): Query<LoginParams>) -> impl IntoResponse {
    let (Some(username), Some(_password)) = (params.username, params.password) else {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid username/password supplied".to_string(),
        )
            .into_response();
    };
    debug!(%username, "login");
    let expires_after = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|now| now.as_secs() + SESSION_TTL_SECS)
        .unwrap_or(SESSION_TTL_SECS);
    (
        StatusCode::OK,
        [
            ("X-Rate-Limit", RATE_LIMIT.to_string()),
            ("X-Expires-After", expires_after.to_string()),
        ],
        format!("logged in user session:{}", Uuid::new_v4()),
    )
        .into_response()
}

async fn logout_user() -> StatusCode {
    StatusCode::OK
}
