use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::ports::bootcamp_repository::BootcampPatch;
use crate::application::use_cases::bootcamps::bootcamps_in_radius::BootcampsInRadius;
use crate::application::use_cases::bootcamps::create_bootcamp::{
    CreateBootcamp as CreateBootcampUc, CreateBootcampInput, CreateOutcome,
};
use crate::application::use_cases::bootcamps::delete_bootcamp::DeleteBootcamp as DeleteBootcampUc;
use crate::application::use_cases::bootcamps::get_bootcamp::GetBootcamp as GetBootcampUc;
use crate::application::use_cases::bootcamps::list_bootcamps::{
    ListBootcamps as ListBootcampsUc, ListQuery,
};
use crate::application::use_cases::bootcamps::update_bootcamp::{
    MutateOutcome, UpdateBootcamp as UpdateBootcampUc,
};
use crate::application::use_cases::bootcamps::upload_photo::UploadPhoto as UploadPhotoUc;
use crate::bootstrap::app_context::AppContext;
use crate::domain::bootcamps::{Bootcamp, Location, bootcamp as bootcamp_rules};
use crate::domain::users::Role;
use crate::presentation::http::auth::{Bearer, require_roles, validate_bearer};
use crate::presentation::http::error::{ApiError, map_db_err};

#[derive(Debug, Serialize, ToSchema)]
pub struct BootcampResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Object)]
    pub location: Location,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_rating: Option<f64>,
    pub average_cost: Option<i32>,
    pub photo: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Bootcamp> for BootcampResponse {
    fn from(b: Bootcamp) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            name: b.name,
            slug: b.slug,
            description: b.description,
            website: b.website,
            phone: b.phone,
            email: b.email,
            location: b.location,
            careers: b.careers,
            housing: b.housing,
            job_assistance: b.job_assistance,
            job_guarantee: b.job_guarantee,
            accept_gi: b.accept_gi,
            average_rating: b.average_rating,
            average_cost: b.average_cost,
            photo: b.photo,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BootcampEnvelope {
    pub success: bool,
    pub data: BootcampResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BootcampListResponse {
    pub success: bool,
    pub count: i64,
    pub pagination: Pagination,
    pub data: Vec<BootcampResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBootcampRequest {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
    pub average_cost: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBootcampRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
    pub average_cost: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ListBootcampsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub career: Option<String>,
    pub housing: Option<bool>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(list_bootcamps).post(create_bootcamp))
        .route(
            "/:id",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        .route("/radius/:zipcode/:distance", get(bootcamps_in_radius))
        .route("/:id/photo", put(upload_photo))
        .with_state(ctx)
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Bootcamp not found with id of {id}"))
}

// Invalid uuids get the same 404 an unknown id would
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| not_found(id))
}

#[utoipa::path(get, path = "/api/v1/bootcamp", tag = "Bootcamps", security(()), params(
    ("page" = Option<i64>, Query, description = "Page number (1-based)"),
    ("limit" = Option<i64>, Query, description = "Page size, default 25"),
    ("sort" = Option<String>, Query, description = "Comma-separated sort columns, '-' prefix for descending"),
    ("career" = Option<String>, Query, description = "Filter by career"),
    ("housing" = Option<bool>, Query, description = "Filter by housing availability")
), responses((status = 200, body = BootcampListResponse)))]
pub async fn list_bootcamps(
    State(ctx): State<AppContext>,
    Query(q): Query<ListBootcampsQuery>,
) -> Result<Json<BootcampListResponse>, ApiError> {
    let repo = ctx.bootcamp_repo();
    let uc = ListBootcampsUc {
        repo: repo.as_ref(),
    };
    let page = uc
        .execute(&ListQuery {
            page: q.page.unwrap_or(1),
            limit: q.limit.unwrap_or(25),
            sort: q.sort,
            career: q.career,
            housing: q.housing,
        })
        .await?;
    let pagination = Pagination {
        next: page.next_page().map(|p| PageRef {
            page: p,
            limit: page.limit,
        }),
        prev: page.prev_page().map(|p| PageRef {
            page: p,
            limit: page.limit,
        }),
    };
    Ok(Json(BootcampListResponse {
        success: true,
        count: page.total,
        pagination,
        data: page.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(get, path = "/api/v1/bootcamp/{id}", tag = "Bootcamps", security(()), params(
    ("id" = String, Path, description = "Bootcamp ID")
), responses(
    (status = 200, body = BootcampEnvelope),
    (status = 404, description = "Unknown bootcamp")
))]
pub async fn get_bootcamp(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<BootcampEnvelope>, ApiError> {
    let uuid = parse_id(&id)?;
    let repo = ctx.bootcamp_repo();
    let uc = GetBootcampUc {
        repo: repo.as_ref(),
    };
    let b = uc.execute(uuid).await?.ok_or_else(|| not_found(&id))?;
    Ok(Json(BootcampEnvelope {
        success: true,
        data: b.into(),
    }))
}

#[utoipa::path(post, path = "/api/v1/bootcamp", tag = "Bootcamps", request_body = CreateBootcampRequest, responses(
    (status = 201, body = BootcampEnvelope),
    (status = 400, description = "Validation failure or publisher already has a bootcamp"),
    (status = 403, description = "Role not allowed")
))]
pub async fn create_bootcamp(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CreateBootcampRequest>,
) -> Result<(axum::http::StatusCode, Json<BootcampEnvelope>), ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    require_roles(&claims, &[Role::Publisher, Role::Admin])?;
    let user_id = claims.user_id()?;

    bootcamp_rules::validate_name(&req.name).map_err(ApiError::bad_request)?;
    bootcamp_rules::validate_description(&req.description).map_err(ApiError::bad_request)?;
    bootcamp_rules::validate_careers(&req.careers).map_err(ApiError::bad_request)?;

    let repo = ctx.bootcamp_repo();
    let geocoder = ctx.geocoder();
    let uc = CreateBootcampUc {
        repo: repo.as_ref(),
        geocoder: geocoder.as_ref(),
    };
    let outcome = uc
        .execute(
            user_id,
            claims.role(),
            CreateBootcampInput {
                name: req.name,
                description: req.description,
                website: req.website,
                phone: req.phone,
                email: req.email,
                address: req.address,
                careers: req.careers,
                housing: req.housing,
                job_assistance: req.job_assistance,
                job_guarantee: req.job_guarantee,
                accept_gi: req.accept_gi,
                average_cost: req.average_cost,
            },
        )
        .await
        .map_err(map_db_err)?;
    match outcome {
        CreateOutcome::AlreadyPublished => Err(ApiError::bad_request(format!(
            "The user with ID {user_id} has already published a bootcamp"
        ))),
        CreateOutcome::Created(b) => Ok((
            axum::http::StatusCode::CREATED,
            Json(BootcampEnvelope {
                success: true,
                data: b.into(),
            }),
        )),
    }
}

#[utoipa::path(put, path = "/api/v1/bootcamp/{id}", tag = "Bootcamps", request_body = UpdateBootcampRequest, params(
    ("id" = String, Path, description = "Bootcamp ID")
), responses(
    (status = 200, body = BootcampEnvelope),
    (status = 401, description = "Not the owner"),
    (status = 403, description = "Role not allowed"),
    (status = 404, description = "Unknown bootcamp")
))]
pub async fn update_bootcamp(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<UpdateBootcampRequest>,
) -> Result<Json<BootcampEnvelope>, ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    require_roles(&claims, &[Role::Publisher, Role::Admin])?;
    let user_id = claims.user_id()?;
    let uuid = parse_id(&id)?;

    if let Some(name) = &req.name {
        bootcamp_rules::validate_name(name).map_err(ApiError::bad_request)?;
    }
    if let Some(desc) = &req.description {
        bootcamp_rules::validate_description(desc).map_err(ApiError::bad_request)?;
    }
    if let Some(careers) = &req.careers {
        bootcamp_rules::validate_careers(careers).map_err(ApiError::bad_request)?;
    }

    let repo = ctx.bootcamp_repo();
    let uc = UpdateBootcampUc {
        repo: repo.as_ref(),
    };
    let patch = BootcampPatch {
        name: req.name,
        slug: None,
        description: req.description,
        website: req.website,
        phone: req.phone,
        email: req.email,
        careers: req.careers,
        housing: req.housing,
        job_assistance: req.job_assistance,
        job_guarantee: req.job_guarantee,
        accept_gi: req.accept_gi,
        average_cost: req.average_cost,
    };
    match uc
        .execute(user_id, claims.role(), uuid, patch)
        .await
        .map_err(map_db_err)?
    {
        MutateOutcome::NotFound => Err(not_found(&id)),
        MutateOutcome::NotOwner => Err(ApiError::unauthorized(format!(
            "User {user_id} is not authorized to update this bootcamp"
        ))),
        MutateOutcome::Done(b) => Ok(Json(BootcampEnvelope {
            success: true,
            data: b.into(),
        })),
    }
}

#[utoipa::path(delete, path = "/api/v1/bootcamp/{id}", tag = "Bootcamps", params(
    ("id" = String, Path, description = "Bootcamp ID")
), responses(
    (status = 200, description = "Deleted"),
    (status = 401, description = "Not the owner"),
    (status = 404, description = "Unknown bootcamp")
))]
pub async fn delete_bootcamp(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    require_roles(&claims, &[Role::Publisher, Role::Admin])?;
    let user_id = claims.user_id()?;
    let uuid = parse_id(&id)?;

    let repo = ctx.bootcamp_repo();
    let uc = DeleteBootcampUc {
        repo: repo.as_ref(),
    };
    match uc.execute(user_id, claims.role(), uuid).await? {
        MutateOutcome::NotFound => Err(not_found(&id)),
        MutateOutcome::NotOwner => Err(ApiError::unauthorized(format!(
            "User {user_id} is not authorized to delete this bootcamp"
        ))),
        MutateOutcome::Done(()) => {
            Ok(Json(serde_json::json!({ "success": true, "data": {} })))
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RadiusResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<BootcampResponse>,
}

#[utoipa::path(get, path = "/api/v1/bootcamp/radius/{zipcode}/{distance}", tag = "Bootcamps", security(()), params(
    ("zipcode" = String, Path, description = "Center zipcode"),
    ("distance" = f64, Path, description = "Radius in miles")
), responses(
    (status = 200, body = RadiusResponse),
    (status = 400, description = "Zipcode could not be geocoded")
))]
pub async fn bootcamps_in_radius(
    State(ctx): State<AppContext>,
    Path((zipcode, distance)): Path<(String, f64)>,
) -> Result<Json<RadiusResponse>, ApiError> {
    let repo = ctx.bootcamp_repo();
    let geocoder = ctx.geocoder();
    let uc = BootcampsInRadius {
        repo: repo.as_ref(),
        geocoder: geocoder.as_ref(),
    };
    let items = uc.execute(&zipcode, distance).await?.ok_or_else(|| {
        ApiError::bad_request(format!("Could not geocode the zipcode {zipcode}"))
    })?;
    Ok(Json(RadiusResponse {
        success: true,
        count: items.len(),
        data: items.into_iter().map(Into::into).collect(),
    }))
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoMultipart {
    /// Image file to upload
    #[schema(value_type = String, format = Binary)]
    file: String,
}

#[utoipa::path(put, path = "/api/v1/bootcamp/{id}/photo", tag = "Bootcamps", request_body(
    content = UploadPhotoMultipart,
    content_type = "multipart/form-data",
), params(
    ("id" = String, Path, description = "Bootcamp ID")
), responses(
    (status = 200, description = "Photo stored"),
    (status = 400, description = "Missing or non-image file"),
    (status = 401, description = "Not the owner")
))]
pub async fn upload_photo(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    require_roles(&claims, &[Role::Publisher, Role::Admin])?;
    let user_id = claims.user_id()?;
    let uuid = parse_id(&id)?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut ext: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Please upload a file"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(|s| s.to_string());
        if !content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false)
        {
            return Err(ApiError::bad_request("Please upload an image file"));
        }
        ext = photo_extension(field.file_name(), content_type.as_deref());
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Please upload a file"))?;
        if data.len() > ctx.cfg.max_file_upload {
            return Err(ApiError::bad_request(format!(
                "Please upload an image less than {} bytes",
                ctx.cfg.max_file_upload
            )));
        }
        file_bytes = Some(data.to_vec());
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::bad_request("Please upload a file"))?;
    let ext = ext.ok_or_else(|| ApiError::bad_request("Please upload an image file"))?;

    let repo = ctx.bootcamp_repo();
    let store = ctx.photo_store();
    let uc = UploadPhotoUc {
        repo: repo.as_ref(),
        store: store.as_ref(),
    };
    match uc
        .execute(user_id, claims.role(), uuid, &bytes, &ext)
        .await?
    {
        MutateOutcome::NotFound => Err(not_found(&id)),
        MutateOutcome::NotOwner => Err(ApiError::unauthorized(format!(
            "User {user_id} is not authorized to update this bootcamp"
        ))),
        MutateOutcome::Done(filename) => {
            Ok(Json(serde_json::json!({ "success": true, "data": filename })))
        }
    }
}

/// Extension for the stored photo, preferring the uploaded filename and
/// falling back to the MIME subtype.
fn photo_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    if let Some(name) = file_name {
        if let Some(ext) = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
        {
            return Some(format!(".{}", ext.to_ascii_lowercase()));
        }
    }
    match content_type {
        Some("image/jpeg") => Some(".jpg".into()),
        Some("image/png") => Some(".png".into()),
        Some("image/gif") => Some(".gif".into()),
        Some("image/webp") => Some(".webp".into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_extension_prefers_filename_then_mime() {
        assert_eq!(
            photo_extension(Some("Logo.JPG"), Some("image/png")),
            Some(".jpg".into())
        );
        assert_eq!(
            photo_extension(Some("photo"), Some("image/png")),
            Some(".png".into())
        );
        assert_eq!(photo_extension(None, Some("image/webp")), Some(".webp".into()));
        assert_eq!(photo_extension(None, Some("application/pdf")), None);
    }

    #[test]
    fn invalid_uuid_maps_to_the_resource_404() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Bootcamp not found with id of not-a-uuid");
    }
}
