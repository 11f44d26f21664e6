//! Guest access-code session handlers.
//!
//! ```text
//! POST /api/v1/guest/login {"accessCode":"482913"}
//! POST /api/v1/guest/logout
//! GET  /api/v1/guest/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AccessCode, Error, GuestSession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::guards::GuestActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_present};

const ACCESS_CODE_FIELD: FieldName = FieldName::new("accessCode");

/// Access-code login body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestLoginRequest {
    /// Six-digit code issued by an administrator.
    #[schema(example = "482913")]
    pub access_code: Option<String>,
}

/// Established guest session.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestSessionResponse {
    /// Caregiver the guest acts as.
    #[schema(format = Uuid)]
    pub caregiver_id: String,
    /// Name shown in the guest area.
    pub caregiver_name: String,
    /// When the session started.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl From<&GuestSession> for GuestSessionResponse {
    fn from(session: &GuestSession) -> Self {
        Self {
            caregiver_id: session.caregiver_id.to_string(),
            caregiver_name: session.caregiver_name.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at(),
        }
    }
}

fn parse_access_code(raw: Option<String>) -> Result<AccessCode, Error> {
    let raw = require_present(raw, ACCESS_CODE_FIELD)?;
    AccessCode::parse(raw.trim()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "accessCode", "code": "invalid_format" }))
    })
}

/// Exchange an access code for a guest session.
///
/// Nothing is stored in the session when the code is rejected.
#[utoipa::path(
    post,
    path = "/api/v1/guest/login",
    request_body = GuestLoginRequest,
    responses(
        (status = 200, description = "Guest session established", body = GuestSessionResponse),
        (status = 400, description = "Code is not six digits", body = ErrorSchema),
        (status = 401, description = "Unknown code", body = ErrorSchema),
        (status = 403, description = "Caregiver is inactive", body = ErrorSchema)
    ),
    tags = ["guest"],
    operation_id = "guestLogin",
    security([])
)]
#[post("/guest/login")]
pub async fn guest_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GuestLoginRequest>,
) -> ApiResult<HttpResponse> {
    let code = parse_access_code(payload.into_inner().access_code)?;
    let guest = state.guest_access.login(&code).await?;
    session.persist_guest(&guest)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(GuestSessionResponse::from(&guest)))
}

/// Discard the guest session. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/guest/logout",
    responses((status = 204, description = "Guest session cleared")),
    tags = ["guest"],
    operation_id = "guestLogout",
    security([])
)]
#[post("/guest/logout")]
pub async fn guest_logout(session: SessionContext) -> HttpResponse {
    session.forget_guest();
    HttpResponse::NoContent().finish()
}

/// Current guest session after re-validation.
#[utoipa::path(
    get,
    path = "/api/v1/guest/session",
    responses(
        (status = 200, description = "Guest session is valid", body = GuestSessionResponse),
        (status = 401, description = "Missing, expired or revoked session", body = ErrorSchema)
    ),
    tags = ["guest"],
    operation_id = "guestSession"
)]
#[get("/guest/session")]
pub async fn guest_session(GuestActor(guest): GuestActor) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(GuestSessionResponse::from(&guest))
}
