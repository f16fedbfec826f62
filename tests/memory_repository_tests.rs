use chrono::NaiveDate;
use cms_portal::MemoryRepository;
use cms_portal::models::{
    Attendance, CreatePostRequest, CreateProfessorRequest, CreateSchoolRequest,
    CreateSemesterRequest, CreateTrainingRequest, UpdatePostRequest,
};
use cms_portal::repository::Repository;
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn attendance_registration_is_idempotent() {
    let repo = MemoryRepository::new();
    let semester = repo
        .create_semester(CreateSemesterRequest {
            name: "2026-I".to_string(),
            start_date: date("2026-03-01"),
            end_date: date("2026-07-15"),
            active: true,
        })
        .await
        .unwrap();
    let training = repo
        .create_training(CreateTrainingRequest {
            name: "Didáctica universitaria".to_string(),
            semester_id: semester.id,
            competency_id: None,
            date: date("2026-04-10"),
        })
        .await
        .unwrap();
    let professor = repo
        .create_professor(CreateProfessorRequest {
            document: "70112233".to_string(),
            name: "Ana Quispe".to_string(),
            email: "aquispe@u.edu".to_string(),
            school_id: None,
        })
        .await
        .unwrap();

    let attendance = Attendance {
        training_id: training.id,
        professor_id: professor.id,
    };
    assert!(repo.register_attendance(attendance.clone()).await);
    // Second registration is a conflict, not an error.
    assert!(!repo.register_attendance(attendance).await);
}

#[tokio::test]
async fn trainings_are_found_by_professor_document() {
    let repo = MemoryRepository::new();
    let semester = repo
        .create_semester(CreateSemesterRequest {
            name: "2026-I".to_string(),
            start_date: date("2026-03-01"),
            end_date: date("2026-07-15"),
            active: true,
        })
        .await
        .unwrap();
    let attended = repo
        .create_training(CreateTrainingRequest {
            name: "Evaluación por competencias".to_string(),
            semester_id: semester.id,
            competency_id: None,
            date: date("2026-04-10"),
        })
        .await
        .unwrap();
    let _skipped = repo
        .create_training(CreateTrainingRequest {
            name: "Herramientas digitales".to_string(),
            semester_id: semester.id,
            competency_id: None,
            date: date("2026-05-02"),
        })
        .await
        .unwrap();
    let professor = repo
        .create_professor(CreateProfessorRequest {
            document: "70112233".to_string(),
            name: "Ana Quispe".to_string(),
            email: "aquispe@u.edu".to_string(),
            school_id: None,
        })
        .await
        .unwrap();

    repo.register_attendance(Attendance {
        training_id: attended.id,
        professor_id: professor.id,
    })
    .await;

    let found = repo.get_trainings_by_document("70112233").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, attended.id);

    // Unknown documents produce an empty list, not an error.
    assert!(repo.get_trainings_by_document("00000000").await.is_empty());
}

#[tokio::test]
async fn attendance_stats_group_by_school() {
    let repo = MemoryRepository::new();
    let systems = repo
        .create_school(CreateSchoolRequest {
            name: "Sistemas".to_string(),
        })
        .await
        .unwrap();
    let law = repo
        .create_school(CreateSchoolRequest {
            name: "Derecho".to_string(),
        })
        .await
        .unwrap();
    let semester = repo
        .create_semester(CreateSemesterRequest {
            name: "2026-I".to_string(),
            start_date: date("2026-03-01"),
            end_date: date("2026-07-15"),
            active: true,
        })
        .await
        .unwrap();
    let training = repo
        .create_training(CreateTrainingRequest {
            name: "Didáctica universitaria".to_string(),
            semester_id: semester.id,
            competency_id: None,
            date: date("2026-04-10"),
        })
        .await
        .unwrap();

    for (document, school_id) in [
        ("1", Some(systems.id)),
        ("2", Some(systems.id)),
        ("3", Some(law.id)),
        ("4", None), // no school: not counted
    ] {
        let professor = repo
            .create_professor(CreateProfessorRequest {
                document: document.to_string(),
                name: format!("Profesor {}", document),
                email: format!("p{}@u.edu", document),
                school_id,
            })
            .await
            .unwrap();
        repo.register_attendance(Attendance {
            training_id: training.id,
            professor_id: professor.id,
        })
        .await;
    }

    let stats = repo.attendance_by_school(None).await;
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].school, "Sistemas");
    assert_eq!(stats[0].attendees, 2);
    assert_eq!(stats[1].school, "Derecho");
    assert_eq!(stats[1].attendees, 1);

    // Filtering by a different semester empties the feed.
    assert!(repo.attendance_by_school(Some(Uuid::new_v4())).await.is_empty());
}

#[tokio::test]
async fn home_reorder_replaces_the_layout_wholesale() {
    let repo = MemoryRepository::new();
    let author = Uuid::new_v4();
    let mut ids = vec![];
    for title in ["a", "b", "c"] {
        let post = repo
            .create_post(
                CreatePostRequest {
                    title: title.to_string(),
                    content: "...".to_string(),
                    image: None,
                    tags: vec![],
                    published: true,
                },
                author,
            )
            .await
            .unwrap();
        ids.push(post.id);
    }

    repo.set_home_order(vec![ids[2], ids[0]]).await;
    let home = repo.get_home_posts().await;
    assert_eq!(home.len(), 2);
    assert_eq!(home[0].id, ids[2]);
    assert_eq!(home[1].id, ids[0]);

    // A later reorder unpins everything absent from the list.
    repo.set_home_order(vec![ids[1]]).await;
    let home = repo.get_home_posts().await;
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].id, ids[1]);
}

#[tokio::test]
async fn partial_post_updates_leave_other_fields_alone() {
    let repo = MemoryRepository::new();
    let post = repo
        .create_post(
            CreatePostRequest {
                title: "Original".to_string(),
                content: "Cuerpo".to_string(),
                image: None,
                tags: vec!["noticias".to_string()],
                published: false,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

    let updated = repo
        .update_post(
            post.id,
            UpdatePostRequest {
                published: Some(true),
                ..UpdatePostRequest::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.published);
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.tags, vec!["noticias"]);

    // Updating a missing row reports absence.
    assert!(
        repo.update_post(Uuid::new_v4(), UpdatePostRequest::default())
            .await
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_professor_documents_are_rejected() {
    let repo = MemoryRepository::new();
    let first = CreateProfessorRequest {
        document: "70112233".to_string(),
        name: "Ana Quispe".to_string(),
        email: "aquispe@u.edu".to_string(),
        school_id: None,
    };
    assert!(repo.create_professor(first.clone()).await.is_some());
    assert!(repo.create_professor(first).await.is_none());
}
