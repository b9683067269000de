//! Fake auth emulator: `accounts:lookup` and `accounts:update`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

/// The bearer token the auth emulator accepts.
pub const EMULATOR_TOKEN: &str = "owner";

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub uid: String,
    pub email: String,
    /// Serialized custom claims, as the API stores them.
    pub custom_attributes: Option<String>,
}

/// Shared user table.
#[derive(Debug, Clone, Default)]
pub struct FakeIdentity {
    users: Arc<Mutex<HashMap<String, FakeUser>>>,
}

impl FakeIdentity {
    /// Add a user with optional existing claims.
    ///
    /// # Panics
    ///
    /// Panics if the user table lock is poisoned.
    pub fn add_user(&self, uid: &str, email: &str, claims: Option<Value>) {
        self.users.lock().expect("users lock").insert(
            uid.to_string(),
            FakeUser {
                uid: uid.to_string(),
                email: email.to_string(),
                custom_attributes: claims.map(|c| c.to_string()),
            },
        );
    }

    /// Current claims of `uid`, parsed.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned or stored claims are not JSON.
    #[must_use]
    pub fn claims(&self, uid: &str) -> Option<Value> {
        let users = self.users.lock().expect("users lock");
        users
            .get(uid)?
            .custom_attributes
            .as_deref()
            .map(|raw| serde_json::from_str(raw).expect("stored claims are JSON"))
    }

    /// Router serving the emulator's REST paths.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/identitytoolkit.googleapis.com/v1/projects/{project}/{method}",
                post(handle),
            )
            .with_state(self.clone())
    }
}

async fn handle(
    State(fake): State<FakeIdentity>,
    Path((_project, method)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {EMULATOR_TOKEN}"));
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "MISSING_OR_INVALID_TOKEN");
    }

    match method.as_str() {
        "accounts:lookup" => lookup(&fake, &body),
        "accounts:update" => update(&fake, &body),
        _ => error(StatusCode::NOT_FOUND, "UNKNOWN_METHOD"),
    }
}

fn lookup(fake: &FakeIdentity, body: &Value) -> (StatusCode, Json<Value>) {
    let Some(email) = body
        .get("email")
        .and_then(|e| e.get(0))
        .and_then(Value::as_str)
    else {
        return error(StatusCode::BAD_REQUEST, "MISSING_EMAIL");
    };

    let users = fake.users.lock().expect("users lock");
    let matches: Vec<Value> = users
        .values()
        .filter(|u| u.email == email)
        .map(|u| {
            let mut user = json!({ "localId": u.uid, "email": u.email });
            if let Some(attrs) = &u.custom_attributes {
                user["customAttributes"] = json!(attrs);
            }
            user
        })
        .collect();
    drop(users);

    // No `users` key at all when nothing matches.
    if matches.is_empty() {
        (
            StatusCode::OK,
            Json(json!({ "kind": "identitytoolkit#GetAccountInfoResponse" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "users": matches })))
    }
}

fn update(fake: &FakeIdentity, body: &Value) -> (StatusCode, Json<Value>) {
    let Some(uid) = body.get("localId").and_then(Value::as_str) else {
        return error(StatusCode::BAD_REQUEST, "MISSING_LOCAL_ID");
    };
    let attrs = body.get("customAttributes").and_then(Value::as_str);
    if attrs.is_some_and(|a| serde_json::from_str::<Value>(a).is_err()) {
        return error(StatusCode::BAD_REQUEST, "INVALID_CLAIMS");
    }

    let mut users = fake.users.lock().expect("users lock");
    let Some(user) = users.get_mut(uid) else {
        return error(StatusCode::BAD_REQUEST, "USER_NOT_FOUND");
    };
    user.custom_attributes = attrs.map(ToString::to_string);
    drop(users);

    (StatusCode::OK, Json(json!({ "localId": uid })))
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "error": { "code": status.as_u16(), "message": message } })),
    )
}
