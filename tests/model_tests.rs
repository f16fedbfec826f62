use cms_portal::auth::Role;
use cms_portal::models::{UpdatePostRequest, UpdateUserRequest, UserProfile};
use cms_portal::navigation::MenuEntry;

#[test]
fn role_serializes_as_snake_case_strings() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
    assert_eq!(
        serde_json::to_string(&Role::EventManager).unwrap(),
        r#""event_manager""#
    );
    assert_eq!(serde_json::to_string(&Role::Author).unwrap(), r#""author""#);
}

#[test]
fn role_parsing_matches_the_stored_strings() {
    for role in [Role::Admin, Role::EventManager, Role::Author] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
    // Anything else is outside the closed set, with no error path.
    assert_eq!(Role::parse("ADMIN"), None);
    assert_eq!(Role::parse("manager"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn update_payloads_omit_absent_fields() {
    let partial = UpdatePostRequest {
        title: Some("Nuevo título".to_string()),
        ..UpdatePostRequest::default()
    };

    let json_output = serde_json::to_string(&partial).unwrap();
    assert!(json_output.contains(r#""title":"Nuevo título""#));
    assert!(!json_output.contains("content"));
    assert!(!json_output.contains("tags"));
}

#[test]
fn update_user_role_accepts_the_closed_set_only() {
    let parsed: UpdateUserRequest =
        serde_json::from_str(r#"{ "role": "event_manager" }"#).unwrap();
    assert_eq!(parsed.role, Some(Role::EventManager));

    // A role outside the enumeration is a deserialization error, not a
    // silently stored string.
    assert!(serde_json::from_str::<UpdateUserRequest>(r#"{ "role": "root" }"#).is_err());
}

#[test]
fn profile_reports_unrecognized_roles_as_null() {
    let profile = UserProfile {
        role: None,
        ..UserProfile::default()
    };
    let json_output = serde_json::to_string(&profile).unwrap();
    assert!(json_output.contains(r#""role":null"#));
}

#[test]
fn menu_entries_serialize_for_the_frontend() {
    let entry = MenuEntry {
        path: "/semestres".to_string(),
        label: "Semestres".to_string(),
    };
    let json_output = serde_json::to_string(&entry).unwrap();
    assert!(json_output.contains(r#""path":"/semestres""#));
    assert!(json_output.contains(r#""label":"Semestres""#));
}
