use super::*;
use chrono::NaiveDate;

fn draft() -> ProjectDraft {
    ProjectDraft {
        client_name: "Acme Corp".into(),
        email: "contact@acme.com".into(),
        phone: "+1 (555) 0100".into(),
        service_type: ServiceType::WebDevelopment,
        status: ProjectStatus::Lead,
        value: 2500,
        deadline: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        notes: String::new(),
        rating: None,
    }
}

#[test]
fn test_validate_draft_ok() {
    assert!(validate_draft(&draft()).is_ok());
}

#[test]
fn test_validate_draft_empty_name() {
    let mut d = draft();
    d.client_name = "   ".into();
    let err = validate_draft(&d).unwrap_err();
    assert!(err.to_string().contains("client name"));
}

#[test]
fn test_validate_draft_negative_value() {
    let mut d = draft();
    d.value = -100;
    assert!(validate_draft(&d).is_err());
}

#[test]
fn test_validate_draft_rating_range() {
    let mut d = draft();
    d.rating = Some(5);
    assert!(validate_draft(&d).is_ok());
    d.rating = Some(0);
    assert!(validate_draft(&d).is_err());
    d.rating = Some(6);
    assert!(validate_draft(&d).is_err());
}

#[test]
fn test_quick_draft_defaults() {
    let d = ProjectDraft::quick("Acme", 1500, ServiceType::AdCampaign);
    assert_eq!(d.status, ProjectStatus::Lead);
    assert_eq!(d.value, 1500);
    assert!(d.email.is_empty());
    assert_eq!(d.notes, "Quick added from dashboard");
}

#[test]
fn test_service_type_display_roundtrip() {
    for service in ServiceType::ALL {
        let parsed: ServiceType = service.to_string().parse().unwrap();
        assert_eq!(parsed, service);
    }
}

#[test]
fn test_service_type_serde_uses_display_names() {
    let json = serde_json::to_string(&ServiceType::AiSolutions).unwrap();
    assert_eq!(json, "\"AI Solutions\"");
    let back: ServiceType = serde_json::from_str("\"Web Development\"").unwrap();
    assert_eq!(back, ServiceType::WebDevelopment);
}

#[test]
fn test_status_from_str() {
    assert_eq!("active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
    assert_eq!("Cancelled".parse::<ProjectStatus>().unwrap(), ProjectStatus::Cancelled);
    assert!("delivered".parse::<ProjectStatus>().is_err());
}

#[test]
fn test_status_default_is_lead() {
    assert_eq!(ProjectStatus::default(), ProjectStatus::Lead);
}

#[test]
fn test_project_update_is_empty() {
    assert!(ProjectUpdate::default().is_empty());
    let upd = ProjectUpdate {
        status: Some(ProjectStatus::Completed),
        ..Default::default()
    };
    assert!(!upd.is_empty());
}

#[test]
fn test_project_serializes_camel_case() {
    let p = draft().into_project("42".into());
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["clientName"], "Acme Corp");
    assert_eq!(json["serviceType"], "Web Development");
    assert_eq!(json["value"], 2500);
    // absent rating must not appear at all
    assert!(json.get("rating").is_none());
}

#[test]
fn test_connection_status_serde() {
    let json = serde_json::to_string(&ConnectionStatus::Connected).unwrap();
    assert_eq!(json, "\"connected\"");
}
