//! In-memory test double for the persistence layer. Keeps the same observable
//! semantics as `PostgresRepository` (ordering, partial updates, idempotent
//! attendance, pending-only resolution) without a database, so router and
//! handler tests run self-contained.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    Attendance, Authority, Competency, CreateAuthorityRequest, CreateCompetencyRequest,
    CreatePostRequest, CreateProfessorRequest, CreateSchoolRequest, CreateSemesterRequest,
    CreateTrainingRequest, Post, Professor, ProfessorRequest, Request, School, SchoolAttendance,
    Semester, Tag, Training, UpdateAuthorityRequest, UpdateCompetencyRequest, UpdatePostRequest,
    UpdateProfessorRequest, UpdateSchoolRequest, UpdateSemesterRequest, UpdateTrainingRequest,
    UpdateUserRequest, User,
};
use crate::repository::{Repository, RepositoryError};

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// MemoryRepository
///
/// `Mutex<Vec<_>>` stores per entity, insertion order preserved. The
/// `fail_user_lookups` toggle simulates an unavailable backend for session
/// resolution tests.
#[derive(Default)]
pub struct MemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub posts: Mutex<Vec<Post>>,
    pub tags: Mutex<Vec<Tag>>,
    pub schools: Mutex<Vec<School>>,
    pub professors: Mutex<Vec<Professor>>,
    pub professor_requests: Mutex<Vec<ProfessorRequest>>,
    pub competencies: Mutex<Vec<Competency>>,
    pub semesters: Mutex<Vec<Semester>>,
    pub trainings: Mutex<Vec<Training>>,
    pub attendance: Mutex<HashSet<(Uuid, Uuid)>>,
    pub requests: Mutex<Vec<Request>>,
    pub authorities: Mutex<Vec<Authority>>,
    pub fail_user_lookups: Mutex<bool>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user row directly, bypassing the external-auth mirror flow.
    pub fn seed_user(&self, id: Uuid, email: &str, name: &str, role: &str) -> User {
        let user = User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            image: None,
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn seed_request(&self, kind: &str, status: &str) -> Request {
        let request = Request {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            requester_name: "Solicitante".to_string(),
            requester_email: "solicitante@example.com".to_string(),
            message: "mensaje".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        };
        self.requests.lock().unwrap().push(request.clone());
        request
    }

    pub fn seed_professor_request(&self, document: &str, status: &str) -> ProfessorRequest {
        let request = ProfessorRequest {
            id: Uuid::new_v4(),
            name: "Profesor Pendiente".to_string(),
            email: "pendiente@example.com".to_string(),
            document: document.to_string(),
            school_id: None,
            status: status.to_string(),
            created_at: Utc::now(),
        };
        self.professor_requests.lock().unwrap().push(request.clone());
        request
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    // --- USERS ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        if *self.fail_user_lookups.lock().unwrap() {
            return Err(RepositoryError::Database("simulated outage".to_string()));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn get_users(&self, search: Option<String>) -> Vec<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|user| match &search {
                Some(s) => matches(&user.email, s) || matches(&user.name, s),
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn create_user(&self, user: User) -> Option<User> {
        self.users.lock().unwrap().push(user.clone());
        Some(user)
    }

    async fn update_user(&self, id: Uuid, req: UpdateUserRequest) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|user| user.id == id)?;
        if let Some(name) = req.name {
            user.name = name;
        }
        if let Some(image) = req.image {
            user.image = Some(image);
        }
        if let Some(role) = req.role {
            user.role = role.as_str().to_string();
        }
        user.updated_at = Utc::now();
        Some(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> bool {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|user| user.id != id);
        users.len() < before
    }

    // --- POSTS ---

    async fn get_posts(&self, search: Option<String>, tag: Option<String>) -> Vec<Post> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| match &search {
                Some(s) => matches(&post.title, s) || matches(&post.content, s),
                None => true,
            })
            .filter(|post| match &tag {
                Some(t) => post.tags.contains(t),
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn get_post(&self, id: Uuid) -> Option<Post> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned()
    }

    async fn create_post(&self, req: CreatePostRequest, author_id: Uuid) -> Option<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            title: req.title,
            content: req.content,
            image: req.image,
            tags: req.tags,
            author_id,
            published: req.published,
            home_position: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Some(post)
    }

    async fn update_post(&self, id: Uuid, req: UpdatePostRequest) -> Option<Post> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.iter_mut().find(|post| post.id == id)?;
        if let Some(title) = req.title {
            post.title = title;
        }
        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(image) = req.image {
            post.image = Some(image);
        }
        if let Some(tags) = req.tags {
            post.tags = tags;
        }
        if let Some(published) = req.published {
            post.published = published;
        }
        post.updated_at = Utc::now();
        Some(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> bool {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        posts.len() < before
    }

    async fn get_home_posts(&self) -> Vec<Post> {
        let mut pinned: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| post.home_position.is_some())
            .cloned()
            .collect();
        pinned.sort_by_key(|post| post.home_position);
        pinned
    }

    async fn set_home_order(&self, post_ids: Vec<Uuid>) -> bool {
        let mut posts = self.posts.lock().unwrap();
        for post in posts.iter_mut() {
            post.home_position = None;
        }
        for (position, post_id) in post_ids.iter().enumerate() {
            if let Some(post) = posts.iter_mut().find(|post| post.id == *post_id) {
                post.home_position = Some(position as i32);
            }
        }
        true
    }

    // --- TAGS ---

    async fn get_tags(&self, search: Option<String>) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|tag| match &search {
                Some(s) => matches(&tag.name, s),
                None => true,
            })
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    async fn create_tag(&self, name: String) -> Option<Tag> {
        let mut tags = self.tags.lock().unwrap();
        if let Some(existing) = tags.iter().find(|tag| tag.name == name) {
            return Some(existing.clone());
        }
        let tag = Tag {
            id: tags.len() as i64 + 1,
            name,
        };
        tags.push(tag.clone());
        Some(tag)
    }

    // --- SCHOOLS ---

    async fn get_schools(&self) -> Vec<School> {
        let mut schools = self.schools.lock().unwrap().clone();
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        schools
    }

    async fn create_school(&self, req: CreateSchoolRequest) -> Option<School> {
        let school = School {
            id: Uuid::new_v4(),
            name: req.name,
            created_at: Utc::now(),
        };
        self.schools.lock().unwrap().push(school.clone());
        Some(school)
    }

    async fn update_school(&self, id: Uuid, req: UpdateSchoolRequest) -> Option<School> {
        let mut schools = self.schools.lock().unwrap();
        let school = schools.iter_mut().find(|school| school.id == id)?;
        if let Some(name) = req.name {
            school.name = name;
        }
        Some(school.clone())
    }

    async fn delete_school(&self, id: Uuid) -> bool {
        let mut schools = self.schools.lock().unwrap();
        let before = schools.len();
        schools.retain(|school| school.id != id);
        schools.len() < before
    }

    // --- PROFESSORS ---

    async fn get_professors(&self, search: Option<String>) -> Vec<Professor> {
        let mut professors: Vec<Professor> = self
            .professors
            .lock()
            .unwrap()
            .iter()
            .filter(|professor| match &search {
                Some(s) => {
                    matches(&professor.name, s)
                        || matches(&professor.email, s)
                        || matches(&professor.document, s)
                }
                None => true,
            })
            .cloned()
            .collect();
        professors.sort_by(|a, b| a.name.cmp(&b.name));
        professors
    }

    async fn get_professor_by_document(&self, document: &str) -> Option<Professor> {
        self.professors
            .lock()
            .unwrap()
            .iter()
            .find(|professor| professor.document == document)
            .cloned()
    }

    async fn create_professor(&self, req: CreateProfessorRequest) -> Option<Professor> {
        let mut professors = self.professors.lock().unwrap();
        // Unique document, mirroring the table constraint.
        if professors.iter().any(|p| p.document == req.document) {
            return None;
        }
        let professor = Professor {
            id: Uuid::new_v4(),
            document: req.document,
            name: req.name,
            email: req.email,
            school_id: req.school_id,
            created_at: Utc::now(),
        };
        professors.push(professor.clone());
        Some(professor)
    }

    async fn update_professor(&self, id: Uuid, req: UpdateProfessorRequest) -> Option<Professor> {
        let mut professors = self.professors.lock().unwrap();
        let professor = professors.iter_mut().find(|professor| professor.id == id)?;
        if let Some(name) = req.name {
            professor.name = name;
        }
        if let Some(email) = req.email {
            professor.email = email;
        }
        if let Some(school_id) = req.school_id {
            professor.school_id = Some(school_id);
        }
        Some(professor.clone())
    }

    async fn delete_professor(&self, id: Uuid) -> bool {
        let mut professors = self.professors.lock().unwrap();
        let before = professors.len();
        professors.retain(|professor| professor.id != id);
        professors.len() < before
    }

    // --- PROFESSOR REQUESTS ---

    async fn get_professor_requests(&self, status: Option<String>) -> Vec<ProfessorRequest> {
        self.professor_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| match &status {
                Some(s) => &request.status == s,
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn resolve_professor_request(
        &self,
        id: Uuid,
        approve: bool,
    ) -> Option<ProfessorRequest> {
        let resolved = {
            let mut requests = self.professor_requests.lock().unwrap();
            let request = requests
                .iter_mut()
                .find(|request| request.id == id && request.status == "pending")?;
            request.status = if approve { "approved" } else { "rejected" }.to_string();
            request.clone()
        };

        if approve {
            let _ = self
                .create_professor(CreateProfessorRequest {
                    document: resolved.document.clone(),
                    name: resolved.name.clone(),
                    email: resolved.email.clone(),
                    school_id: resolved.school_id,
                })
                .await;
        }

        Some(resolved)
    }

    // --- COMPETENCIES ---

    async fn get_competencies(&self) -> Vec<Competency> {
        let mut competencies = self.competencies.lock().unwrap().clone();
        competencies.sort_by(|a, b| a.name.cmp(&b.name));
        competencies
    }

    async fn create_competency(&self, req: CreateCompetencyRequest) -> Option<Competency> {
        let competency = Competency {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            created_at: Utc::now(),
        };
        self.competencies.lock().unwrap().push(competency.clone());
        Some(competency)
    }

    async fn update_competency(
        &self,
        id: Uuid,
        req: UpdateCompetencyRequest,
    ) -> Option<Competency> {
        let mut competencies = self.competencies.lock().unwrap();
        let competency = competencies.iter_mut().find(|c| c.id == id)?;
        if let Some(name) = req.name {
            competency.name = name;
        }
        if let Some(description) = req.description {
            competency.description = description;
        }
        Some(competency.clone())
    }

    async fn delete_competency(&self, id: Uuid) -> bool {
        let mut competencies = self.competencies.lock().unwrap();
        let before = competencies.len();
        competencies.retain(|c| c.id != id);
        competencies.len() < before
    }

    // --- SEMESTERS ---

    async fn get_semesters(&self) -> Vec<Semester> {
        let mut semesters = self.semesters.lock().unwrap().clone();
        semesters.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        semesters
    }

    async fn create_semester(&self, req: CreateSemesterRequest) -> Option<Semester> {
        let semester = Semester {
            id: Uuid::new_v4(),
            name: req.name,
            start_date: req.start_date,
            end_date: req.end_date,
            active: req.active,
        };
        self.semesters.lock().unwrap().push(semester.clone());
        Some(semester)
    }

    async fn update_semester(&self, id: Uuid, req: UpdateSemesterRequest) -> Option<Semester> {
        let mut semesters = self.semesters.lock().unwrap();
        let semester = semesters.iter_mut().find(|s| s.id == id)?;
        if let Some(name) = req.name {
            semester.name = name;
        }
        if let Some(start_date) = req.start_date {
            semester.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            semester.end_date = end_date;
        }
        if let Some(active) = req.active {
            semester.active = active;
        }
        Some(semester.clone())
    }

    async fn delete_semester(&self, id: Uuid) -> bool {
        let mut semesters = self.semesters.lock().unwrap();
        let before = semesters.len();
        semesters.retain(|s| s.id != id);
        semesters.len() < before
    }

    // --- TRAININGS ---

    async fn get_trainings(&self, semester_id: Option<Uuid>) -> Vec<Training> {
        let mut trainings: Vec<Training> = self
            .trainings
            .lock()
            .unwrap()
            .iter()
            .filter(|training| match semester_id {
                Some(id) => training.semester_id == id,
                None => true,
            })
            .cloned()
            .collect();
        trainings.sort_by(|a, b| b.date.cmp(&a.date));
        trainings
    }

    async fn create_training(&self, req: CreateTrainingRequest) -> Option<Training> {
        let training = Training {
            id: Uuid::new_v4(),
            name: req.name,
            semester_id: req.semester_id,
            competency_id: req.competency_id,
            date: req.date,
            created_at: Utc::now(),
        };
        self.trainings.lock().unwrap().push(training.clone());
        Some(training)
    }

    async fn update_training(&self, id: Uuid, req: UpdateTrainingRequest) -> Option<Training> {
        let mut trainings = self.trainings.lock().unwrap();
        let training = trainings.iter_mut().find(|t| t.id == id)?;
        if let Some(name) = req.name {
            training.name = name;
        }
        if let Some(semester_id) = req.semester_id {
            training.semester_id = semester_id;
        }
        if let Some(competency_id) = req.competency_id {
            training.competency_id = Some(competency_id);
        }
        if let Some(date) = req.date {
            training.date = date;
        }
        Some(training.clone())
    }

    async fn delete_training(&self, id: Uuid) -> bool {
        let mut trainings = self.trainings.lock().unwrap();
        let before = trainings.len();
        trainings.retain(|t| t.id != id);
        trainings.len() < before
    }

    async fn register_attendance(&self, attendance: Attendance) -> bool {
        self.attendance
            .lock()
            .unwrap()
            .insert((attendance.training_id, attendance.professor_id))
    }

    async fn get_trainings_by_document(&self, document: &str) -> Vec<Training> {
        let professor_id = match self.get_professor_by_document(document).await {
            Some(professor) => professor.id,
            None => return vec![],
        };
        let attended: HashSet<Uuid> = self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, pid)| *pid == professor_id)
            .map(|(tid, _)| *tid)
            .collect();
        let mut trainings: Vec<Training> = self
            .trainings
            .lock()
            .unwrap()
            .iter()
            .filter(|training| attended.contains(&training.id))
            .cloned()
            .collect();
        trainings.sort_by(|a, b| b.date.cmp(&a.date));
        trainings
    }

    async fn attendance_by_school(&self, semester_id: Option<Uuid>) -> Vec<SchoolAttendance> {
        let trainings = self.trainings.lock().unwrap();
        let professors = self.professors.lock().unwrap();
        let schools = self.schools.lock().unwrap();

        let mut counts: Vec<SchoolAttendance> = vec![];
        for (training_id, professor_id) in self.attendance.lock().unwrap().iter() {
            let training = trainings.iter().find(|t| t.id == *training_id);
            if let Some(filter) = semester_id {
                match training {
                    Some(t) if t.semester_id == filter => {}
                    _ => continue,
                }
            } else if training.is_none() {
                continue;
            }
            let school = professors
                .iter()
                .find(|p| p.id == *professor_id)
                .and_then(|p| p.school_id)
                .and_then(|sid| schools.iter().find(|s| s.id == sid));
            let Some(school) = school else { continue };
            match counts.iter_mut().find(|row| row.school == school.name) {
                Some(row) => row.attendees += 1,
                None => counts.push(SchoolAttendance {
                    school: school.name.clone(),
                    attendees: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.attendees.cmp(&a.attendees).then(a.school.cmp(&b.school)));
        counts
    }

    // --- GENERAL REQUESTS ---

    async fn get_requests(&self, status: Option<String>) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| match &status {
                Some(s) => &request.status == s,
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn resolve_request(&self, id: Uuid, approve: bool) -> Option<Request> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|request| request.id == id && request.status == "pending")?;
        request.status = if approve { "approved" } else { "rejected" }.to_string();
        Some(request.clone())
    }

    // --- AUTHORITIES ---

    async fn get_authorities(&self) -> Vec<Authority> {
        let mut authorities = self.authorities.lock().unwrap().clone();
        authorities.sort_by(|a, b| {
            a.order_position
                .cmp(&b.order_position)
                .then(a.name.cmp(&b.name))
        });
        authorities
    }

    async fn create_authority(&self, req: CreateAuthorityRequest) -> Option<Authority> {
        let authority = Authority {
            id: Uuid::new_v4(),
            name: req.name,
            position: req.position,
            image: req.image,
            order_position: req.order_position,
        };
        self.authorities.lock().unwrap().push(authority.clone());
        Some(authority)
    }

    async fn update_authority(&self, id: Uuid, req: UpdateAuthorityRequest) -> Option<Authority> {
        let mut authorities = self.authorities.lock().unwrap();
        let authority = authorities.iter_mut().find(|a| a.id == id)?;
        if let Some(name) = req.name {
            authority.name = name;
        }
        if let Some(position) = req.position {
            authority.position = position;
        }
        if let Some(image) = req.image {
            authority.image = Some(image);
        }
        if let Some(order_position) = req.order_position {
            authority.order_position = order_position;
        }
        Some(authority.clone())
    }

    async fn delete_authority(&self, id: Uuid) -> bool {
        let mut authorities = self.authorities.lock().unwrap();
        let before = authorities.len();
        authorities.retain(|a| a.id != id);
        authorities.len() < before
    }
}
