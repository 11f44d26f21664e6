//! Care recipients and caregivers.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ActiveFlagRequest, optional_text};
use crate::domain::ports::{CreateCareRecipientRequest, CreateCaregiverRequest};
use crate::domain::{CareRecipientId, CaregiverId, Error, NewCaregiverContact, ProfileId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{CareRecipientResponse, CaregiverResponse};
use crate::inbound::http::guards::AdminActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_optional_date, parse_optional_id, require_present,
};

/// Body of `POST /admin/care-recipients`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCareRecipientBody {
    /// Display name.
    pub name: Option<String>,
    /// Date of birth, `YYYY-MM-DD`.
    pub date_of_birth: Option<String>,
    /// Notes for caregivers.
    pub notes: Option<String>,
}

/// Body of `POST /admin/caregivers`.
///
/// Send `profileId` to link an existing account, or `name` (plus optional
/// `phone` and `email`) to register a guest caregiver.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCaregiverBody {
    /// Profile to link.
    #[schema(format = Uuid)]
    pub profile_id: Option<String>,
    /// Guest display name.
    pub name: Option<String>,
    /// Guest phone number.
    pub phone: Option<String>,
    /// Guest email address.
    pub email: Option<String>,
    /// Issue an access code straight away.
    pub generate_access_code: bool,
}

/// Freshly issued access code.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeResponse {
    /// Six-digit code; earlier codes and their sessions stop working.
    #[schema(example = "482913")]
    pub access_code: String,
}

fn caregiver_contact(body: &mut CreateCaregiverBody) -> Result<NewCaregiverContact, Error> {
    if let Some(profile_id) =
        parse_optional_id::<ProfileId>(body.profile_id.as_deref(), FieldName::new("profileId"))?
    {
        return Ok(NewCaregiverContact::Linked(profile_id));
    }
    Ok(NewCaregiverContact::Guest {
        name: require_present(body.name.take(), FieldName::new("name"))?,
        phone: optional_text(body.phone.take()),
        email: optional_text(body.email.take()),
    })
}

/// List every care recipient.
#[utoipa::path(
    get,
    path = "/api/v1/admin/care-recipients",
    responses(
        (status = 200, description = "Care recipients", body = [CareRecipientResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listCareRecipients"
)]
#[get("/admin/care-recipients")]
pub async fn list_care_recipients(
    state: web::Data<HttpState>,
    _admin: AdminActor,
) -> ApiResult<HttpResponse> {
    let recipients = state.care_team.list_care_recipients().await?;
    let body: Vec<_> = recipients.iter().map(CareRecipientResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Register a care recipient.
#[utoipa::path(
    post,
    path = "/api/v1/admin/care-recipients",
    request_body = CreateCareRecipientBody,
    responses(
        (status = 201, description = "Care recipient created", body = CareRecipientResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createCareRecipient"
)]
#[post("/admin/care-recipients")]
pub async fn create_care_recipient(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<CreateCareRecipientBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = CreateCareRecipientRequest {
        name: require_present(body.name, FieldName::new("name"))?,
        date_of_birth: parse_optional_date(
            body.date_of_birth.as_deref(),
            FieldName::new("dateOfBirth"),
        )?,
        notes: optional_text(body.notes),
    };
    let recipient = state.care_team.create_care_recipient(request).await?;
    Ok(HttpResponse::Created().json(CareRecipientResponse::from(&recipient)))
}

/// Delete a care recipient together with its plans and logs.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/care-recipients/{id}",
    params(("id" = String, Path, description = "Care recipient identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown care recipient", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteCareRecipient"
)]
#[delete("/admin/care-recipients/{id}")]
pub async fn delete_care_recipient(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CareRecipientId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_team.delete_care_recipient(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List every caregiver with resolved contact details.
#[utoipa::path(
    get,
    path = "/api/v1/admin/caregivers",
    responses(
        (status = 200, description = "Caregivers", body = [CaregiverResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listCaregivers"
)]
#[get("/admin/caregivers")]
pub async fn list_caregivers(
    state: web::Data<HttpState>,
    _admin: AdminActor,
) -> ApiResult<HttpResponse> {
    let caregivers = state.care_team.list_caregivers().await?;
    let body: Vec<_> = caregivers.iter().map(CaregiverResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Register a linked or guest caregiver.
#[utoipa::path(
    post,
    path = "/api/v1/admin/caregivers",
    request_body = CreateCaregiverBody,
    responses(
        (status = 201, description = "Caregiver created", body = CaregiverResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown profile", body = ErrorSchema),
        (status = 409, description = "Profile already linked or no free code", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "createCaregiver"
)]
#[post("/admin/caregivers")]
pub async fn create_caregiver(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    payload: web::Json<CreateCaregiverBody>,
) -> ApiResult<HttpResponse> {
    let mut body = payload.into_inner();
    let request = CreateCaregiverRequest {
        contact: caregiver_contact(&mut body)?,
        issue_access_code: body.generate_access_code,
    };
    let caregiver = state.care_team.create_caregiver(request).await?;
    Ok(HttpResponse::Created().json(CaregiverResponse::from(&caregiver)))
}

/// Activate or deactivate a caregiver.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/caregivers/{id}",
    params(("id" = String, Path, description = "Caregiver identifier")),
    request_body = ActiveFlagRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown caregiver", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setCaregiverActive"
)]
#[patch("/admin/caregivers/{id}")]
pub async fn set_caregiver_active(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
    payload: web::Json<ActiveFlagRequest>,
) -> ApiResult<HttpResponse> {
    let id: CaregiverId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let is_active = payload.into_inner().into_flag()?;
    state.care_team.set_caregiver_active(&id, is_active).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a caregiver together with their schedules and logs.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/caregivers/{id}",
    params(("id" = String, Path, description = "Caregiver identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown caregiver", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteCaregiver"
)]
#[delete("/admin/caregivers/{id}")]
pub async fn delete_caregiver(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CaregiverId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.care_team.delete_caregiver(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Issue a new access code, revoking guest sessions opened with the old one.
#[utoipa::path(
    post,
    path = "/api/v1/admin/caregivers/{id}/access-code",
    params(("id" = String, Path, description = "Caregiver identifier")),
    responses(
        (status = 200, description = "New code", body = AccessCodeResponse),
        (status = 404, description = "Unknown caregiver", body = ErrorSchema),
        (status = 409, description = "No free code after retries", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "regenerateAccessCode"
)]
#[post("/admin/caregivers/{id}/access-code")]
pub async fn regenerate_access_code(
    state: web::Data<HttpState>,
    _admin: AdminActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: CaregiverId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let code = state.guest_access.regenerate_code(&id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(AccessCodeResponse {
            access_code: code.as_str().to_owned(),
        }))
}
