//! In-process stand-in for the hosted backend plus request helpers for driving the router.
#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::{Path, RawQuery, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, post},
};
use axum_extra::extract::cookie::Key;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use jobboard::{
    BackendClient,
    config::Config,
    server::{AppState, jobboard_router},
};
use serde_json::{Map, Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

pub const ANON_KEY: &str = "anon-test-key";

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    /// Percent-decoded query string.
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

pub struct Store {
    pub users: Vec<User>,
    pub jobs: Vec<Value>,
    pub applications: Vec<Value>,
    pub profiles: Vec<Value>,
    pub uploads: Vec<String>,
    pub requests: Vec<Captured>,
    pub require_confirmation: bool,
    pub failing_tables: Vec<String>,
    epoch: DateTime<Utc>,
    clock: i64,
}

impl Store {
    fn new() -> Self {
        Self {
            users: Vec::new(),
            jobs: Vec::new(),
            applications: Vec::new(),
            profiles: Vec::new(),
            uploads: Vec::new(),
            requests: Vec::new(),
            require_confirmation: false,
            failing_tables: Vec::new(),
            epoch: Utc::now() - ChronoDuration::days(1),
            clock: 0,
        }
    }

    /// Strictly increasing timestamps so "newest first" ordering is deterministic.
    fn next_timestamp(&mut self) -> String {
        self.clock += 1;
        (self.epoch + ChronoDuration::seconds(self.clock))
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn table(&self, name: &str) -> Option<&Vec<Value>> {
        match name {
            "jobs" => Some(&self.jobs),
            "applications" => Some(&self.applications),
            "profiles" => Some(&self.profiles),
            _ => None,
        }
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        match name {
            "jobs" => Some(&mut self.jobs),
            "applications" => Some(&mut self.applications),
            "profiles" => Some(&mut self.profiles),
            _ => None,
        }
    }
}

type Shared = Arc<Mutex<Store>>;

#[derive(Clone)]
pub struct FakeBackend {
    store: Shared,
    base: Url,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store::new()));
        let app = Router::new()
            .route("/auth/v1/token", post(token_handler))
            .route("/auth/v1/signup", post(signup_handler))
            .route("/auth/v1/logout", post(logout_handler))
            .route("/storage/v1/object/{*path}", post(upload_handler))
            .route("/rest/v1/{table}", any(rest_handler))
            .layer(middleware::from_fn_with_state(store.clone(), record))
            .with_state(store.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let base = Url::parse(&format!("http://{addr}")).expect("valid base url");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server run");
        });

        Self { store, base }
    }

    pub fn url(&self) -> Url {
        self.base.clone()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut self.store.lock().unwrap())
    }

    pub fn add_user(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|s| {
            s.users.push(User {
                id,
                email: email.to_string(),
                password: password.to_string(),
            });
        });
        id
    }

    pub fn insert_job(&self, employer_id: Uuid, title: &str, description: &str, status: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|s| {
            let created_at = s.next_timestamp();
            s.jobs.push(json!({
                "id": id,
                "title": title,
                "company": "Acme",
                "location": "Remote",
                "description": description,
                "requirements": "Experience",
                "salary_range": null,
                "job_type": "full-time",
                "status": status,
                "employer_id": employer_id,
                "created_at": created_at,
            }));
        });
        id
    }

    pub fn insert_application(&self, job_id: Uuid, candidate_id: Uuid, status: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|s| {
            let created_at = s.next_timestamp();
            s.applications.push(json!({
                "id": id,
                "job_id": job_id,
                "candidate_id": candidate_id,
                "cover_letter": "Please consider me.",
                "resume_url": null,
                "status": status,
                "created_at": created_at,
            }));
        });
        id
    }

    pub fn insert_profile(&self, id: Uuid, full_name: &str, title: &str) {
        self.with(|s| {
            s.profiles.push(json!({
                "id": id,
                "full_name": full_name,
                "title": title,
                "bio": null,
                "resume_url": null,
            }));
        });
    }

    pub fn jobs(&self) -> Vec<Value> {
        self.with(|s| s.jobs.clone())
    }

    pub fn applications(&self) -> Vec<Value> {
        self.with(|s| s.applications.clone())
    }

    pub fn profiles(&self) -> Vec<Value> {
        self.with(|s| s.profiles.clone())
    }

    pub fn uploads(&self) -> Vec<String> {
        self.with(|s| s.uploads.clone())
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.with(|s| s.requests.clone())
    }

    pub fn clear_requests(&self) {
        self.with(|s| s.requests.clear());
    }

    pub fn require_confirmation(&self) {
        self.with(|s| s.require_confirmation = true);
    }

    /// Every request against `table` answers 500 from now on.
    pub fn fail_table(&self, table: &str) {
        self.with(|s| s.failing_tables.push(table.to_string()));
    }
}

async fn record(State(store): State<Shared>, req: Request, next: Next) -> Response {
    let query = req
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&")
        })
        .unwrap_or_default();
    let captured = Captured {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
        query,
        authorization: req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    store.lock().unwrap().requests.push(captured);
    next.run(req).await
}

fn session_json(user: &User) -> Value {
    json!({
        "access_token": format!("access-{}", user.id),
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("refresh-{}", user.id),
        "user": { "id": user.id, "email": user.email },
    })
}

async fn token_handler(
    State(store): State<Shared>,
    RawQuery(raw): RawQuery,
    Json(body): Json<Value>,
) -> Response {
    let params: HashMap<String, String> =
        url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
    let store = store.lock().unwrap();
    let user = match params.get("grant_type").map(String::as_str) {
        Some("password") => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            store
                .users
                .iter()
                .find(|u| u.email == email && u.password == password)
        }
        Some("refresh_token") => {
            let token = body["refresh_token"].as_str().unwrap_or_default();
            store
                .users
                .iter()
                .find(|u| format!("refresh-{}", u.id) == token)
        }
        _ => None,
    };
    match user {
        Some(user) => Json(session_json(user)).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            })),
        )
            .into_response(),
    }
}

async fn signup_handler(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if store.users.iter().any(|u| u.email == email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        )
            .into_response();
    }
    let user = User {
        id: Uuid::new_v4(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
    };
    let response = if store.require_confirmation {
        json!({ "id": user.id, "email": user.email, "confirmation_sent_at": Utc::now() })
    } else {
        session_json(&user)
    };
    store.users.push(user);
    Json(response).into_response()
}

async fn logout_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn upload_handler(
    State(store): State<Shared>,
    Path(path): Path<String>,
    _body: Bytes,
) -> Json<Value> {
    store.lock().unwrap().uploads.push(path.clone());
    Json(json!({ "Key": path }))
}

enum Filter {
    Eq(String, String),
    In(String, Vec<String>),
    AnyIlike(Vec<(String, String)>),
}

/// Splits on commas outside quotes and parentheses.
fn split_top(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let (mut depth, mut quoted, mut escaped) = (0usize, false, false);
    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);
    parts
}

fn unquote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_string(),
    }
}

/// Drops the backslash in front of escaped LIKE characters.
fn like_literal(pattern: &str) -> String {
    let mut out = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

fn parse_filter(key: &str, value: &str) -> Option<Filter> {
    if key == "or" {
        let inner = value.strip_prefix('(')?.strip_suffix(')')?;
        let clauses = split_top(inner)
            .iter()
            .filter_map(|clause| {
                let (column, pattern) = clause.split_once(".ilike.")?;
                Some((
                    column.to_string(),
                    like_literal(&unquote(pattern).replace('*', "")).to_lowercase(),
                ))
            })
            .collect();
        return Some(Filter::AnyIlike(clauses));
    }
    if let Some(v) = value.strip_prefix("eq.") {
        return Some(Filter::Eq(key.to_string(), unquote(v)));
    }
    let list = value.strip_prefix("in.(")?.strip_suffix(')')?;
    Some(Filter::In(
        key.to_string(),
        split_top(list)
            .iter()
            .map(|v| unquote(v))
            .filter(|v| !v.is_empty())
            .collect(),
    ))
}

fn cell(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match filter {
        Filter::Eq(column, value) => cell(row, column) == *value,
        Filter::In(column, values) => values.contains(&cell(row, column)),
        Filter::AnyIlike(clauses) => clauses
            .iter()
            .any(|(column, needle)| cell(row, column).to_lowercase().contains(needle)),
    })
}

fn pick(row: &Value, columns: &str) -> Value {
    let mut out = Map::new();
    for column in columns.split(',').filter(|c| !c.is_empty()) {
        out.insert(
            column.to_string(),
            row.get(column).cloned().unwrap_or(Value::Null),
        );
    }
    Value::Object(out)
}

fn related(rows: &[Value], id: &str, columns: &str) -> Value {
    rows.iter()
        .find(|r| cell(r, "id") == id)
        .map_or(Value::Null, |r| pick(r, columns))
}

fn embed(store: &Store, table: &str, row: &Value, target: &str, columns: &str) -> Value {
    match (table, target) {
        ("jobs", "applications") => {
            let id = cell(row, "id");
            let count = store
                .applications
                .iter()
                .filter(|a| cell(a, "job_id") == id)
                .count();
            json!([{ "count": count }])
        }
        ("applications", "jobs") => related(&store.jobs, &cell(row, "job_id"), columns),
        ("applications", "candidate_id" | "profiles") => {
            related(&store.profiles, &cell(row, "candidate_id"), columns)
        }
        _ => Value::Null,
    }
}

fn project(store: &Store, table: &str, row: &Value, select: &str) -> Value {
    let mut out = Map::new();
    for item in split_top(select) {
        if item == "*" {
            if let Some(all) = row.as_object() {
                out.extend(all.clone());
            }
            continue;
        }
        match item.split_once('(') {
            None => {
                out.insert(item.clone(), row.get(&item).cloned().unwrap_or(Value::Null));
            }
            Some((head, columns)) => {
                let columns = columns.trim_end_matches(')');
                let (alias, target) = head.split_once(':').unwrap_or((head, head));
                out.insert(alias.to_string(), embed(store, table, row, target, columns));
            }
        }
    }
    Value::Object(out)
}

fn respond(status: StatusCode, rows: Vec<Value>, single: bool) -> Response {
    if !single {
        return (status, Json(Value::Array(rows))).into_response();
    }
    if rows.len() == 1 {
        let row = rows.into_iter().next().unwrap_or(Value::Null);
        return (status, Json(row)).into_response();
    }
    (
        StatusCode::NOT_ACCEPTABLE,
        Json(json!({
            "code": "PGRST116",
            "details": format!("The result contains {} rows", rows.len()),
            "hint": null,
            "message": "JSON object requested, multiple (or no) rows returned",
        })),
    )
        .into_response()
}

fn fill_defaults(store: &mut Store, table: &str, row: &mut Map<String, Value>) {
    if !row.contains_key("id") {
        row.insert("id".into(), json!(Uuid::new_v4()));
    }
    if table == "profiles" {
        return;
    }
    if !row.contains_key("created_at") {
        row.insert("created_at".into(), json!(store.next_timestamp()));
    }
    let default_status = if table == "jobs" { "draft" } else { "pending" };
    if row.get("status").is_none_or(Value::is_null) {
        row.insert("status".into(), json!(default_status));
    }
}

async fn rest_handler(
    State(store): State<Shared>,
    Path(table): Path<String>,
    method: Method,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
    body: Bytes,
) -> Response {
    let params: Vec<(String, String)> =
        url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
    let single = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("vnd.pgrst.object"));
    let prefer = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let filters: Vec<Filter> = params
        .iter()
        .filter(|(k, _)| k != "select" && k != "order")
        .filter_map(|(k, v)| parse_filter(k, v))
        .collect();

    let mut store = store.lock().unwrap();
    if store.table(&table).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": "42P01", "message": format!("relation \"{table}\" does not exist") })),
        )
            .into_response();
    }
    if store.failing_tables.contains(&table) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": "XX000", "message": "simulated failure" })),
        )
            .into_response();
    }

    match method {
        Method::GET => {
            let select = params
                .iter()
                .find(|(k, _)| k == "select")
                .map_or("*", |(_, v)| v.as_str());
            let mut rows: Vec<Value> = store
                .table(&table)
                .into_iter()
                .flatten()
                .filter(|r| matches(r, &filters))
                .cloned()
                .collect();
            if let Some((_, order)) = params.iter().find(|(k, _)| k == "order") {
                let (column, direction) = order.split_once('.').unwrap_or((order.as_str(), "asc"));
                rows.sort_by_key(|r| cell(r, column));
                if direction == "desc" {
                    rows.reverse();
                }
            }
            let rows = rows
                .iter()
                .map(|r| project(&store, &table, r, select))
                .collect();
            respond(StatusCode::OK, rows, single)
        }
        Method::POST => {
            let incoming = match serde_json::from_slice::<Value>(&body) {
                Ok(Value::Array(rows)) => rows,
                Ok(row) => vec![row],
                Err(_) => return StatusCode::BAD_REQUEST.into_response(),
            };
            let upsert = prefer.contains("merge-duplicates");
            let mut written = Vec::new();
            for row in incoming {
                let mut row = row.as_object().cloned().unwrap_or_default();
                fill_defaults(&mut store, &table, &mut row);
                let id = cell(&Value::Object(row.clone()), "id");
                let rows = store.table_mut(&table).expect("known table");
                let existing = rows.iter_mut().find(|r| upsert && cell(r, "id") == id);
                match existing {
                    Some(current) => {
                        if let Some(obj) = current.as_object_mut() {
                            obj.extend(row);
                        }
                        written.push(current.clone());
                    }
                    None => {
                        let row = Value::Object(row);
                        rows.push(row.clone());
                        written.push(row);
                    }
                }
            }
            respond(StatusCode::CREATED, written, single)
        }
        Method::PATCH => {
            let patch = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .unwrap_or_default();
            let rows = store.table_mut(&table).expect("known table");
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|r| matches(r, &filters)) {
                if let Some(obj) = row.as_object_mut() {
                    obj.extend(patch.clone());
                }
                updated.push(row.clone());
            }
            respond(StatusCode::OK, updated, false)
        }
        Method::DELETE => {
            let rows = store.table_mut(&table).expect("known table");
            let (removed, kept): (Vec<Value>, Vec<Value>) =
                rows.drain(..).partition(|r| matches(r, &filters));
            *rows = kept;
            if table == "jobs" {
                let gone: Vec<String> = removed.iter().map(|r| cell(r, "id")).collect();
                store
                    .applications
                    .retain(|a| !gone.contains(&cell(a, "job_id")));
            }
            respond(StatusCode::OK, removed, false)
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Router wired to `backend`, with a short search debounce.
pub fn app(backend: &FakeBackend) -> Router {
    app_with(backend, |_| {})
}

pub fn app_with(backend: &FakeBackend, tweak: impl FnOnce(&mut Config)) -> Router {
    let mut cfg = Config::default();
    cfg.backend.url = Some(backend.url());
    cfg.backend.anon_key = ANON_KEY.to_string();
    cfg.basic.insecure_cookie = true;
    cfg.basic.search_debounce_ms = 50;
    tweak(&mut cfg);
    let client = BackendClient::new(&cfg.backend).expect("backend client");
    jobboard_router(AppState::new(&cfg, client, Key::generate()))
}

pub async fn send(app: &Router, req: axum::http::Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub fn get(uri: &str, cookie: Option<&str>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn post_form(uri: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> axum::http::Request<Body> {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();
    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("failed to build request")
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "jobboard-test-boundary";

pub fn post_multipart(uri: &str, cookie: Option<&str>, parts: &[Part<'_>]) -> axum::http::Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("failed to build request")
}

pub async fn body_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Value shown on the dashboard card headed `label`.
pub fn stat_card(body: &str, label: &str) -> String {
    let heading = format!(">{label}</h3>");
    let after = &body[body.find(&heading).unwrap_or_else(|| panic!("no {label} card"))..];
    let value = &after[after.find("<p").expect("card value")..];
    let open = value.find('>').expect("card value tag") + 1;
    let close = value.find("</p>").expect("card value end");
    value[open..close].trim().to_string()
}

pub fn location(resp: &Response) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Applies the response's `Set-Cookie` headers to a `Cookie` header value, the way a
/// browser would. Removed cookies come back with an empty value and are dropped.
pub fn merge_cookies(current: &str, headers: &HeaderMap) -> String {
    let mut jar: Vec<(String, String)> = current
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for v in headers.get_all(header::SET_COOKIE) {
        let s = v.to_str().expect("set-cookie header was not valid utf-8");
        let first = s.split(';').next().unwrap_or("");
        let Some((name, value)) = first.split_once('=') else {
            continue;
        };
        let name = name.trim().to_string();
        jar.retain(|(k, _)| *k != name);
        if !value.is_empty() {
            jar.push((name, value.to_string()));
        }
    }
    jar.into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Signs in through the login form and returns the browser's cookie header.
pub async fn sign_in(app: &Router, email: &str, password: &str) -> String {
    let resp = send(
        app,
        post_form("/login", None, &[("email", email), ("password", password), ("next", "/")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "sign-in should redirect");
    let cookies = merge_cookies("", resp.headers());
    assert!(cookies.contains("jb_session="), "sign-in should set a session cookie");
    cookies
}
