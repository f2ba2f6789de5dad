//! Router test harness: in-memory database, seed helpers, oneshot requests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use casework_server::api::build_app;
use casework_server::auth::hash_password;
use casework_server::db::DbService;
use casework_server::db::repository::{agency, case, site, user};
use casework_server::{Config, ServerState};
use shared::models::{Agency, Bed, BedCreate, Case, CaseCreate, Site, SiteCreate, User};

pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub state: ServerState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::from_lookup(|name| match name {
            "JWT_SECRET" => Some("router-test-secret-0123456789abcdefghij".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = DbService::in_memory().await.unwrap().pool;
        let state = ServerState::with_pool(config, pool);
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    // ── Seeding ─────────────────────────────────────────────────────

    pub async fn agency(&self, name: &str, parent_id: Option<i64>) -> Agency {
        agency::create(&self.state.pool, name, parent_id).await.unwrap()
    }

    pub async fn user(&self, username: &str, role: &str, company_id: i64) -> User {
        let password_hash = hash_password(PASSWORD).unwrap();
        user::create(
            &self.state.pool,
            user::NewUser {
                username,
                display_name: username,
                password_hash: &password_hash,
                property_role: role,
                company_id,
                active_location: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn site(&self, agency_id: i64, name: &str) -> Site {
        site::create_site(
            &self.state.pool,
            agency_id,
            &SiteCreate {
                name: name.to_string(),
                address: None,
                agency_id: None,
                location_id: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn bed(&self, site_id: i64, name: &str) -> Bed {
        site::create_bed(
            &self.state.pool,
            site_id,
            &BedCreate {
                name: name.to_string(),
                room_name: Some("Room 1".to_string()),
                bed_type: Some("Single".to_string()),
            },
        )
        .await
        .unwrap()
    }

    pub async fn case(&self, agency_id: i64, created_by: i64, first_name: &str) -> Case {
        case::create(
            &self.state.pool,
            agency_id,
            created_by,
            &CaseCreate {
                first_name: first_name.to_string(),
                last_name: "Client".to_string(),
                date_of_birth: None,
                agency_id: None,
                location_id: None,
            },
        )
        .await
        .unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.jwt_service().generate_token(user).unwrap()
    }

    // ── Requests ────────────────────────────────────────────────────

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }
}

/// Agency with an administrator, one site and beds "X" and "Y"
pub struct Shelter {
    pub agency: Agency,
    pub admin: User,
    pub admin_token: String,
    pub site: Site,
    pub beds: Vec<Bed>,
}

pub async fn shelter(app: &TestApp) -> Shelter {
    let agency = app.agency("Harbor House", None).await;
    let admin = app.user("harbor-admin", "Agency Administrator", agency.id).await;
    let admin_token = app.token_for(&admin);
    let site = app.site(agency.id, "North Shelter").await;
    let beds = vec![app.bed(site.id, "X").await, app.bed(site.id, "Y").await];
    Shelter {
        agency,
        admin,
        admin_token,
        site,
        beds,
    }
}

/// Numeric error code of a failure body
pub fn code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap_or_default()
}
