use crate::models::{
    Attendance, Authority, Competency, CreateAuthorityRequest, CreateCompetencyRequest,
    CreatePostRequest, CreateProfessorRequest, CreateSchoolRequest, CreateSemesterRequest,
    CreateTrainingRequest, Post, Professor, ProfessorRequest, Request, School, SchoolAttendance,
    Semester, Tag, Training, UpdateAuthorityRequest, UpdateCompetencyRequest, UpdatePostRequest,
    UpdateProfessorRequest, UpdateSchoolRequest, UpdateSemesterRequest, UpdateTrainingRequest,
    UpdateUserRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepositoryError
///
/// Failure of a persistence operation that callers must be able to tell apart
/// from an empty result. Only `get_user` reports it: session resolution
/// retries on backend failure but treats a missing user as terminal. Every
/// other operation keeps the log-and-degrade signatures below.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

/// Repository
///
/// Abstract contract for all persistence operations, one group per dashboard
/// screen. Handlers interact with the data layer only through this trait;
/// `PostgresRepository` backs production and `MemoryRepository` (testing
/// module) backs the test suites.
///
/// Conventions: list operations return deterministic order; `update_*` apply
/// only provided fields and return `None` when the row does not exist (or on
/// backend error, logged); `delete_*` report whether a row was removed.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn get_users(&self, search: Option<String>) -> Vec<User>;
    async fn create_user(&self, user: User) -> Option<User>;
    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> Option<User>;
    async fn delete_user(&self, id: Uuid) -> bool;

    // --- Posts ---
    async fn get_posts(&self, search: Option<String>, tag: Option<String>) -> Vec<Post>;
    async fn get_post(&self, id: Uuid) -> Option<Post>;
    async fn create_post(&self, req: CreatePostRequest, author_id: Uuid) -> Option<Post>;
    async fn update_post(&self, id: Uuid, req: UpdatePostRequest) -> Option<Post>;
    async fn delete_post(&self, id: Uuid) -> bool;
    // Home screen: pinned posts in position order, and wholesale reorder.
    async fn get_home_posts(&self) -> Vec<Post>;
    async fn set_home_order(&self, post_ids: Vec<Uuid>) -> bool;

    // --- Tags ---
    async fn get_tags(&self, search: Option<String>) -> Vec<Tag>;
    async fn create_tag(&self, name: String) -> Option<Tag>;

    // --- Schools ---
    async fn get_schools(&self) -> Vec<School>;
    async fn create_school(&self, req: CreateSchoolRequest) -> Option<School>;
    async fn update_school(&self, id: Uuid, req: UpdateSchoolRequest) -> Option<School>;
    async fn delete_school(&self, id: Uuid) -> bool;

    // --- Professors ---
    async fn get_professors(&self, search: Option<String>) -> Vec<Professor>;
    async fn get_professor_by_document(&self, document: &str) -> Option<Professor>;
    async fn create_professor(&self, req: CreateProfessorRequest) -> Option<Professor>;
    async fn update_professor(&self, id: Uuid, req: UpdateProfessorRequest) -> Option<Professor>;
    async fn delete_professor(&self, id: Uuid) -> bool;

    // --- Professor Requests ---
    async fn get_professor_requests(&self, status: Option<String>) -> Vec<ProfessorRequest>;
    // Only pending requests can be resolved; approval creates the professor.
    async fn resolve_professor_request(&self, id: Uuid, approve: bool)
    -> Option<ProfessorRequest>;

    // --- Competencies ---
    async fn get_competencies(&self) -> Vec<Competency>;
    async fn create_competency(&self, req: CreateCompetencyRequest) -> Option<Competency>;
    async fn update_competency(&self, id: Uuid, req: UpdateCompetencyRequest)
    -> Option<Competency>;
    async fn delete_competency(&self, id: Uuid) -> bool;

    // --- Semesters ---
    async fn get_semesters(&self) -> Vec<Semester>;
    async fn create_semester(&self, req: CreateSemesterRequest) -> Option<Semester>;
    async fn update_semester(&self, id: Uuid, req: UpdateSemesterRequest) -> Option<Semester>;
    async fn delete_semester(&self, id: Uuid) -> bool;

    // --- Trainings ---
    async fn get_trainings(&self, semester_id: Option<Uuid>) -> Vec<Training>;
    async fn create_training(&self, req: CreateTrainingRequest) -> Option<Training>;
    async fn update_training(&self, id: Uuid, req: UpdateTrainingRequest) -> Option<Training>;
    async fn delete_training(&self, id: Uuid) -> bool;
    // Idempotent: returns true only if a new attendance row was inserted.
    async fn register_attendance(&self, attendance: Attendance) -> bool;
    async fn get_trainings_by_document(&self, document: &str) -> Vec<Training>;
    async fn attendance_by_school(&self, semester_id: Option<Uuid>) -> Vec<SchoolAttendance>;

    // --- General Requests ---
    async fn get_requests(&self, status: Option<String>) -> Vec<Request>;
    async fn resolve_request(&self, id: Uuid, approve: bool) -> Option<Request>;

    // --- Authorities ---
    async fn get_authorities(&self) -> Vec<Authority>;
    async fn create_authority(&self, req: CreateAuthorityRequest) -> Option<Authority>;
    async fn update_authority(&self, id: Uuid, req: UpdateAuthorityRequest) -> Option<Authority>;
    async fn delete_authority(&self, id: Uuid) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// Production implementation of the `Repository` trait. Queries are
/// parameterized through runtime binding (`query_as`/`QueryBuilder`), so the
/// crate compiles without a reachable database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const STATUS_PENDING: &str = "pending";

fn status_for(approve: bool) -> &'static str {
    if approve { "approved" } else { "rejected" }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, image, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Flexible search over email and name, parameterized through the builder.
    async fn get_users(&self, search: Option<String>) -> Vec<User> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, email, name, image, role, created_at, updated_at FROM users WHERE true",
        );

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (email ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR name ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY created_at DESC");

        match builder.build_query_as::<User>().fetch_all(&self.pool).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("get_users error: {:?}", e);
                vec![]
            }
        }
    }

    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, email, name, image, role, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
               RETURNING id, email, name, image, role, created_at, updated_at"#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.name)
        .bind(user.image)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_user error: {:?}", e);
            None
        })
    }

    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> Option<User> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   image = COALESCE($3, image),
                   role = COALESCE($4, role),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, email, name, image, role, created_at, updated_at"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.image)
        .bind(req.role.map(|role| role.as_str().to_string()))
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_user error: {:?}", e);
            None
        })
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_user error: {:?}", e);
                false
            }
        }
    }

    // --- POSTS ---

    async fn get_posts(&self, search: Option<String>, tag: Option<String>) -> Vec<Post> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"SELECT id, title, content, image, tags, author_id, published, home_position,
                      created_at, updated_at
               FROM posts WHERE true"#,
        );

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR content ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(t) = tag {
            builder.push(" AND ");
            builder.push_bind(t);
            builder.push(" = ANY(tags)");
        }

        builder.push(" ORDER BY created_at DESC");

        match builder.build_query_as::<Post>().fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("get_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_post(&self, id: Uuid) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, content, image, tags, author_id, published, home_position,
                      created_at, updated_at
               FROM posts WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post error: {:?}", e);
            None
        })
    }

    async fn create_post(&self, req: CreatePostRequest, author_id: Uuid) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (id, title, content, image, tags, author_id, published,
                                  created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
               RETURNING id, title, content, image, tags, author_id, published, home_position,
                         created_at, updated_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.content)
        .bind(req.image)
        .bind(req.tags)
        .bind(author_id)
        .bind(req.published)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_post error: {:?}", e);
            None
        })
    }

    async fn update_post(&self, id: Uuid, req: UpdatePostRequest) -> Option<Post> {
        sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET title = COALESCE($2, title),
                   content = COALESCE($3, content),
                   image = COALESCE($4, image),
                   tags = COALESCE($5, tags),
                   published = COALESCE($6, published),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, title, content, image, tags, author_id, published, home_position,
                         created_at, updated_at"#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.image)
        .bind(req.tags)
        .bind(req.published)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_post error: {:?}", e);
            None
        })
    }

    async fn delete_post(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_post error: {:?}", e);
                false
            }
        }
    }

    async fn get_home_posts(&self) -> Vec<Post> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, content, image, tags, author_id, published, home_position,
                      created_at, updated_at
               FROM posts WHERE home_position IS NOT NULL
               ORDER BY home_position ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_home_posts error: {:?}", e);
            vec![]
        })
    }

    /// Replaces the home-screen layout wholesale: clears every position, then
    /// assigns positions in the order given. Runs in one transaction so a
    /// partial reorder is never observable.
    async fn set_home_order(&self, post_ids: Vec<Uuid>) -> bool {
        let mut tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!("set_home_order begin error: {:?}", e);
                return false;
            }
        };

        if let Err(e) = sqlx::query("UPDATE posts SET home_position = NULL")
            .execute(&mut *tx)
            .await
        {
            tracing::error!("set_home_order clear error: {:?}", e);
            return false;
        }

        for (position, post_id) in post_ids.iter().enumerate() {
            if let Err(e) = sqlx::query("UPDATE posts SET home_position = $1 WHERE id = $2")
                .bind(position as i32)
                .bind(post_id)
                .execute(&mut *tx)
                .await
            {
                tracing::error!("set_home_order assign error: {:?}", e);
                return false;
            }
        }

        match tx.commit().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("set_home_order commit error: {:?}", e);
                false
            }
        }
    }

    // --- TAGS ---

    async fn get_tags(&self, search: Option<String>) -> Vec<Tag> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT id, name FROM tags WHERE true");

        if let Some(s) = search {
            builder.push(" AND name ILIKE ");
            builder.push_bind(format!("%{}%", s));
        }

        builder.push(" ORDER BY name ASC");

        match builder.build_query_as::<Tag>().fetch_all(&self.pool).await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::error!("get_tags error: {:?}", e);
                vec![]
            }
        }
    }

    /// Tag names are unique; re-creating an existing name returns the
    /// existing row.
    async fn create_tag(&self, name: String) -> Option<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"INSERT INTO tags (name) VALUES ($1)
               ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
               RETURNING id, name"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_tag error: {:?}", e);
            None
        })
    }

    // --- SCHOOLS ---

    async fn get_schools(&self) -> Vec<School> {
        sqlx::query_as::<_, School>(
            "SELECT id, name, created_at FROM schools ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_schools error: {:?}", e);
            vec![]
        })
    }

    async fn create_school(&self, req: CreateSchoolRequest) -> Option<School> {
        sqlx::query_as::<_, School>(
            r#"INSERT INTO schools (id, name, created_at) VALUES ($1, $2, NOW())
               RETURNING id, name, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_school error: {:?}", e);
            None
        })
    }

    async fn update_school(&self, id: Uuid, req: UpdateSchoolRequest) -> Option<School> {
        sqlx::query_as::<_, School>(
            r#"UPDATE schools SET name = COALESCE($2, name) WHERE id = $1
               RETURNING id, name, created_at"#,
        )
        .bind(id)
        .bind(req.name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_school error: {:?}", e);
            None
        })
    }

    async fn delete_school(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM schools WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_school error: {:?}", e);
                false
            }
        }
    }

    // --- PROFESSORS ---

    async fn get_professors(&self, search: Option<String>) -> Vec<Professor> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, document, name, email, school_id, created_at FROM professors WHERE true",
        );

        if let Some(s) = search {
            let pattern = format!("%{}%", s);
            builder.push(" AND (name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR email ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR document ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY name ASC");

        match builder
            .build_query_as::<Professor>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(professors) => professors,
            Err(e) => {
                tracing::error!("get_professors error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_professor_by_document(&self, document: &str) -> Option<Professor> {
        sqlx::query_as::<_, Professor>(
            "SELECT id, document, name, email, school_id, created_at FROM professors WHERE document = $1",
        )
        .bind(document)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_professor_by_document error: {:?}", e);
            None
        })
    }

    async fn create_professor(&self, req: CreateProfessorRequest) -> Option<Professor> {
        sqlx::query_as::<_, Professor>(
            r#"INSERT INTO professors (id, document, name, email, school_id, created_at)
               VALUES ($1, $2, $3, $4, $5, NOW())
               RETURNING id, document, name, email, school_id, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.document)
        .bind(req.name)
        .bind(req.email)
        .bind(req.school_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_professor error: {:?}", e);
            None
        })
    }

    async fn update_professor(&self, id: Uuid, req: UpdateProfessorRequest) -> Option<Professor> {
        sqlx::query_as::<_, Professor>(
            r#"UPDATE professors
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   school_id = COALESCE($4, school_id)
               WHERE id = $1
               RETURNING id, document, name, email, school_id, created_at"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.email)
        .bind(req.school_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_professor error: {:?}", e);
            None
        })
    }

    async fn delete_professor(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM professors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_professor error: {:?}", e);
                false
            }
        }
    }

    // --- PROFESSOR REQUESTS ---

    async fn get_professor_requests(&self, status: Option<String>) -> Vec<ProfessorRequest> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, name, email, document, school_id, status, created_at FROM professor_requests WHERE true",
        );

        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }

        builder.push(" ORDER BY created_at DESC");

        match builder
            .build_query_as::<ProfessorRequest>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(requests) => requests,
            Err(e) => {
                tracing::error!("get_professor_requests error: {:?}", e);
                vec![]
            }
        }
    }

    /// Resolves a pending request. Approval also creates the professor record;
    /// a professor with the same document already present is left untouched.
    async fn resolve_professor_request(
        &self,
        id: Uuid,
        approve: bool,
    ) -> Option<ProfessorRequest> {
        let resolved = sqlx::query_as::<_, ProfessorRequest>(
            r#"UPDATE professor_requests SET status = $2 WHERE id = $1 AND status = $3
               RETURNING id, name, email, document, school_id, status, created_at"#,
        )
        .bind(id)
        .bind(status_for(approve))
        .bind(STATUS_PENDING)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("resolve_professor_request error: {:?}", e);
            None
        })?;

        if approve {
            let inserted = sqlx::query(
                r#"INSERT INTO professors (id, document, name, email, school_id, created_at)
                   VALUES ($1, $2, $3, $4, $5, NOW())
                   ON CONFLICT (document) DO NOTHING"#,
            )
            .bind(Uuid::new_v4())
            .bind(&resolved.document)
            .bind(&resolved.name)
            .bind(&resolved.email)
            .bind(resolved.school_id)
            .execute(&self.pool)
            .await;

            if let Err(e) = inserted {
                tracing::error!("resolve_professor_request insert error: {:?}", e);
            }
        }

        Some(resolved)
    }

    // --- COMPETENCIES ---

    async fn get_competencies(&self) -> Vec<Competency> {
        sqlx::query_as::<_, Competency>(
            "SELECT id, name, description, created_at FROM competencies ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_competencies error: {:?}", e);
            vec![]
        })
    }

    async fn create_competency(&self, req: CreateCompetencyRequest) -> Option<Competency> {
        sqlx::query_as::<_, Competency>(
            r#"INSERT INTO competencies (id, name, description, created_at)
               VALUES ($1, $2, $3, NOW())
               RETURNING id, name, description, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.description)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_competency error: {:?}", e);
            None
        })
    }

    async fn update_competency(
        &self,
        id: Uuid,
        req: UpdateCompetencyRequest,
    ) -> Option<Competency> {
        sqlx::query_as::<_, Competency>(
            r#"UPDATE competencies
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description)
               WHERE id = $1
               RETURNING id, name, description, created_at"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.description)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_competency error: {:?}", e);
            None
        })
    }

    async fn delete_competency(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM competencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_competency error: {:?}", e);
                false
            }
        }
    }

    // --- SEMESTERS ---

    async fn get_semesters(&self) -> Vec<Semester> {
        sqlx::query_as::<_, Semester>(
            "SELECT id, name, start_date, end_date, active FROM semesters ORDER BY start_date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_semesters error: {:?}", e);
            vec![]
        })
    }

    async fn create_semester(&self, req: CreateSemesterRequest) -> Option<Semester> {
        sqlx::query_as::<_, Semester>(
            r#"INSERT INTO semesters (id, name, start_date, end_date, active)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, start_date, end_date, active"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.active)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_semester error: {:?}", e);
            None
        })
    }

    async fn update_semester(&self, id: Uuid, req: UpdateSemesterRequest) -> Option<Semester> {
        sqlx::query_as::<_, Semester>(
            r#"UPDATE semesters
               SET name = COALESCE($2, name),
                   start_date = COALESCE($3, start_date),
                   end_date = COALESCE($4, end_date),
                   active = COALESCE($5, active)
               WHERE id = $1
               RETURNING id, name, start_date, end_date, active"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.active)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_semester error: {:?}", e);
            None
        })
    }

    async fn delete_semester(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM semesters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_semester error: {:?}", e);
                false
            }
        }
    }

    // --- TRAININGS ---

    async fn get_trainings(&self, semester_id: Option<Uuid>) -> Vec<Training> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT id, name, semester_id, competency_id, date, created_at FROM trainings WHERE true",
        );

        if let Some(semester_id) = semester_id {
            builder.push(" AND semester_id = ");
            builder.push_bind(semester_id);
        }

        builder.push(" ORDER BY date DESC");

        match builder
            .build_query_as::<Training>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(trainings) => trainings,
            Err(e) => {
                tracing::error!("get_trainings error: {:?}", e);
                vec![]
            }
        }
    }

    async fn create_training(&self, req: CreateTrainingRequest) -> Option<Training> {
        sqlx::query_as::<_, Training>(
            r#"INSERT INTO trainings (id, name, semester_id, competency_id, date, created_at)
               VALUES ($1, $2, $3, $4, $5, NOW())
               RETURNING id, name, semester_id, competency_id, date, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.semester_id)
        .bind(req.competency_id)
        .bind(req.date)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_training error: {:?}", e);
            None
        })
    }

    async fn update_training(&self, id: Uuid, req: UpdateTrainingRequest) -> Option<Training> {
        sqlx::query_as::<_, Training>(
            r#"UPDATE trainings
               SET name = COALESCE($2, name),
                   semester_id = COALESCE($3, semester_id),
                   competency_id = COALESCE($4, competency_id),
                   date = COALESCE($5, date)
               WHERE id = $1
               RETURNING id, name, semester_id, competency_id, date, created_at"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.semester_id)
        .bind(req.competency_id)
        .bind(req.date)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_training error: {:?}", e);
            None
        })
    }

    async fn delete_training(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM trainings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_training error: {:?}", e);
                false
            }
        }
    }

    /// Inserts an attendance row. `ON CONFLICT DO NOTHING` against the
    /// composite primary key makes re-registration a no-op; true only when a
    /// new row landed.
    async fn register_attendance(&self, attendance: Attendance) -> bool {
        let result = sqlx::query(
            r#"INSERT INTO training_attendance (training_id, professor_id)
               VALUES ($1, $2) ON CONFLICT DO NOTHING"#,
        )
        .bind(attendance.training_id)
        .bind(attendance.professor_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("register_attendance error: {:?}", e);
                false
            }
        }
    }

    async fn get_trainings_by_document(&self, document: &str) -> Vec<Training> {
        sqlx::query_as::<_, Training>(
            r#"SELECT t.id, t.name, t.semester_id, t.competency_id, t.date, t.created_at
               FROM trainings t
               JOIN training_attendance a ON t.id = a.training_id
               JOIN professors p ON a.professor_id = p.id
               WHERE p.document = $1
               ORDER BY t.date DESC"#,
        )
        .bind(document)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_trainings_by_document error: {:?}", e);
            vec![]
        })
    }

    /// Attendance counts grouped by the attending professors' school, the
    /// feed behind the statistics chart. Professors without a school are not
    /// counted.
    async fn attendance_by_school(&self, semester_id: Option<Uuid>) -> Vec<SchoolAttendance> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"SELECT s.name AS school, COUNT(a.professor_id) AS attendees
               FROM training_attendance a
               JOIN professors p ON a.professor_id = p.id
               JOIN schools s ON p.school_id = s.id
               JOIN trainings t ON a.training_id = t.id
               WHERE true"#,
        );

        if let Some(semester_id) = semester_id {
            builder.push(" AND t.semester_id = ");
            builder.push_bind(semester_id);
        }

        builder.push(" GROUP BY s.name ORDER BY attendees DESC, s.name ASC");

        match builder
            .build_query_as::<SchoolAttendance>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("attendance_by_school error: {:?}", e);
                vec![]
            }
        }
    }

    // --- GENERAL REQUESTS ---

    async fn get_requests(&self, status: Option<String>) -> Vec<Request> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"SELECT id, kind, requester_name, requester_email, message, status, created_at
               FROM requests WHERE true"#,
        );

        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }

        builder.push(" ORDER BY created_at DESC");

        match builder
            .build_query_as::<Request>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(requests) => requests,
            Err(e) => {
                tracing::error!("get_requests error: {:?}", e);
                vec![]
            }
        }
    }

    async fn resolve_request(&self, id: Uuid, approve: bool) -> Option<Request> {
        sqlx::query_as::<_, Request>(
            r#"UPDATE requests SET status = $2 WHERE id = $1 AND status = $3
               RETURNING id, kind, requester_name, requester_email, message, status, created_at"#,
        )
        .bind(id)
        .bind(status_for(approve))
        .bind(STATUS_PENDING)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("resolve_request error: {:?}", e);
            None
        })
    }

    // --- AUTHORITIES ---

    async fn get_authorities(&self) -> Vec<Authority> {
        sqlx::query_as::<_, Authority>(
            r#"SELECT id, name, position, image, order_position FROM authorities
               ORDER BY order_position ASC, name ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_authorities error: {:?}", e);
            vec![]
        })
    }

    async fn create_authority(&self, req: CreateAuthorityRequest) -> Option<Authority> {
        sqlx::query_as::<_, Authority>(
            r#"INSERT INTO authorities (id, name, position, image, order_position)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, position, image, order_position"#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.position)
        .bind(req.image)
        .bind(req.order_position)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_authority error: {:?}", e);
            None
        })
    }

    async fn update_authority(&self, id: Uuid, req: UpdateAuthorityRequest) -> Option<Authority> {
        sqlx::query_as::<_, Authority>(
            r#"UPDATE authorities
               SET name = COALESCE($2, name),
                   position = COALESCE($3, position),
                   image = COALESCE($4, image),
                   order_position = COALESCE($5, order_position)
               WHERE id = $1
               RETURNING id, name, position, image, order_position"#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.position)
        .bind(req.image)
        .bind(req.order_position)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_authority error: {:?}", e);
            None
        })
    }

    async fn delete_authority(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM authorities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_authority error: {:?}", e);
                false
            }
        }
    }
}
