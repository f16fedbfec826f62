use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;
use crate::navigation::MenuEntry;

// --- Identity ---

/// User
///
/// Canonical identity record from the `users` table. The role is stored as
/// text and mapped into the closed `Role` set at the authentication boundary;
/// a value outside the set authenticates but unlocks no gated screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Input payload for creating a user (POST /usuarios). The password is passed
/// through to the external auth provider and never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub image: Option<String>,
    pub role: Role,
}

/// Partial update payload for a user (PUT /usuarios/{id}). Only provided
/// fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// --- Posts & Tags ---

/// Post
///
/// A content post from the `posts` table. `home_position` is set only for
/// posts pinned to the public home screen; ordering follows that column.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub published: bool,
    pub home_position: Option<i32>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Tag
///
/// Free-form labels attached to posts; the tag picker suggests existing names.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Reorder payload for the home screen (PUT /home): posts appear in the given
/// order; posts absent from the list are unpinned.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct HomeOrderRequest {
    pub post_ids: Vec<Uuid>,
}

// --- Academic Entities ---

/// School
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSchoolRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSchoolRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Professor
///
/// `document` is the national identity document number; trainings attendance
/// is looked up by it on the search screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Professor {
    pub id: Uuid,
    pub document: String,
    pub name: String,
    pub email: String,
    pub school_id: Option<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateProfessorRequest {
    pub document: String,
    pub name: String,
    pub email: String,
    pub school_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfessorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Uuid>,
}

/// ProfessorRequest
///
/// A professor's application to join the platform, submitted from the public
/// site and reviewed on the dashboard. Approval creates the professor record.
/// Status is one of `pending`, `approved`, `rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ProfessorRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub document: String,
    pub school_id: Option<Uuid>,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Resolution payload shared by both request screens.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ResolveRequest {
    pub approve: bool,
}

/// Competency
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Competency {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCompetencyRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCompetencyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Semester
///
/// Academic period trainings are scheduled into. At most one is expected to be
/// active at a time; the dashboard does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Semester {
    pub id: Uuid,
    pub name: String,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSemesterRequest {
    pub name: String,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSemesterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// --- Trainings ---

/// Training
///
/// A professional-development session offered to professors within a semester.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Training {
    pub id: Uuid,
    pub name: String,
    pub semester_id: Uuid,
    pub competency_id: Option<Uuid>,
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateTrainingRequest {
    pub name: String,
    pub semester_id: Uuid,
    pub competency_id: Option<Uuid>,
    #[ts(type = "string")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateTrainingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub competency_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
}

/// Attendance
///
/// One professor's attendance at one training. Composite primary key in the
/// `training_attendance` table; registration is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Attendance {
    pub training_id: Uuid,
    pub professor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterAttendanceRequest {
    pub professor_id: Uuid,
}

/// SchoolAttendance
///
/// One row of the "assistance by school" statistics feed: how many attendance
/// records professors of a school accumulated.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct SchoolAttendance {
    pub school: String,
    pub attendees: i64,
}

// --- General Requests ---

/// Request
///
/// A general inquiry submitted from the public site (`solicitudes` screen).
/// Status is one of `pending`, `approved`, `rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Request {
    pub id: Uuid,
    pub kind: String,
    pub requester_name: String,
    pub requester_email: String,
    pub message: String,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Authorities ---

/// Authority
///
/// University authority displayed on the public site, ordered by
/// `order_position`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Authority {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub image: Option<String>,
    pub order_position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateAuthorityRequest {
    pub name: String,
    pub position: String,
    pub image: Option<String>,
    #[serde(default)]
    pub order_position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateAuthorityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_position: Option<i32>,
}

// --- Storage ---

/// Input payload for requesting a short-lived upload URL.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// Original filename, used to derive the stored extension.
    #[schema(example = "portada.jpg")]
    pub filename: String,
    /// MIME type the upload is constrained to.
    #[schema(example = "image/jpeg")]
    pub file_type: String,
}

/// Output schema containing the temporary URL for client-to-cloud transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlResponse {
    /// Time-limited URL for the PUT request.
    pub upload_url: String,
    /// Object key the file will live under, referenced from entity records.
    pub resource_key: String,
}

/// StoredObject
///
/// One object listed on the cloud screen.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct StoredObject {
    pub key: String,
    pub size: i64,
    #[ts(type = "string | null")]
    pub last_modified: Option<DateTime<Utc>>,
}

// --- Session & Shell ---

/// Credential grant relayed to the external auth provider (POST /login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus mirrored profile returned after a successful grant.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Profile of the authenticated principal (GET /me). The role is the parsed
/// closed-set value; `null` means the stored role was unrecognized.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Option<Role>,
    pub image: Option<String>,
}

/// Dashboard shell payload (GET /): greeting plus the menu materialized from
/// the route-authorization table for the requesting principal.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardResponse {
    pub message: String,
    pub menu: Vec<MenuEntry>,
}
