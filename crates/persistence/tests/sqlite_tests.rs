//! SQLite backend integration tests.
//!
//! These tests drive the SQLite backend through the public storage traits,
//! acting as the profiles a real back-office would have.

use chrono::{TimeZone, Utc};

use fixlog_persistence::actor::{ActorContext, Role};
use fixlog_persistence::backends::sqlite::SqliteBackend;
use fixlog_persistence::core::{
    ActivityStorage, CatalogStorage, ClientStorage, NoticeStorage, ProfileStorage, RecordStorage,
};
use fixlog_persistence::error::{PermissionError, ResourceError, StorageError, ValidationError};
use fixlog_persistence::types::{
    ActivityAction, CatalogInput, CatalogKind, ClientInput, LogCategory, NewProfile, NewRecord,
    NoticeInput, Pagination, ProfileUpdate, RecordStatus, RecordUpdate, TargetType,
};

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

/// Registers the first profile, which becomes the operator.
async fn operator(backend: &SqliteBackend) -> ActorContext {
    let profile = backend
        .register(NewProfile::new("ops@fixlog.kr").with_display_name("운영자"))
        .await
        .unwrap();
    ActorContext::from_profile(&profile)
}

/// Registers, promotes and approves a profile, returning its context.
async fn member(
    backend: &SqliteBackend,
    operator: &ActorContext,
    email: &str,
    name: &str,
    role: Role,
) -> ActorContext {
    let profile = backend
        .register(NewProfile::new(email).with_display_name(name))
        .await
        .unwrap();
    if role != Role::Field {
        backend
            .change_role(operator, &profile.id, role)
            .await
            .unwrap();
    }
    backend.approve_profile(operator, &profile.id).await.unwrap();
    refresh(backend, &profile.id).await
}

async fn refresh(backend: &SqliteBackend, id: &str) -> ActorContext {
    let profile = backend.find_profile(id).await.unwrap().unwrap();
    ActorContext::from_profile(&profile)
}

fn client_input(name: &str, phone: &str) -> ClientInput {
    ClientInput {
        phone: Some(phone.to_string()),
        ..ClientInput::named(name)
    }
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_first_profile_becomes_operator() {
    let backend = create_backend();

    let first = backend
        .register(NewProfile::new("ops@fixlog.kr"))
        .await
        .unwrap();
    assert_eq!(first.role, Role::Operator);
    assert!(first.is_approved);

    let second = backend
        .register(NewProfile::new("field@fixlog.kr"))
        .await
        .unwrap();
    assert_eq!(second.role, Role::Field);
    assert!(!second.is_approved);
}

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let backend = create_backend();
    operator(&backend).await;

    let result = backend.register(NewProfile::new("OPS@fixlog.kr")).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::AlreadyExists { .. }))
    ));
}

#[tokio::test]
async fn test_unapproved_profile_is_refused() {
    let backend = create_backend();
    operator(&backend).await;

    let pending = backend
        .register(NewProfile::new("new@fixlog.kr"))
        .await
        .unwrap();
    let actor = ActorContext::from_profile(&pending);

    let result = backend
        .list_clients(&actor, "", Pagination::default())
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(PermissionError::NotApproved { .. }))
    ));

    // Reading one's own profile is still allowed.
    let own = backend.get_profile(&actor, &pending.id).await.unwrap();
    assert_eq!(own.email, "new@fixlog.kr");
}

#[tokio::test]
async fn test_role_change_guards() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let admin = member(&backend, &op, "admin@fixlog.kr", "관리자", Role::Admin).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    // Nobody changes their own role.
    let result = backend.change_role(&admin, admin.user_id(), Role::Field).await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(PermissionError::Forbidden { .. }))
    ));

    // Only an operator grants the operator role.
    let result = backend
        .change_role(&admin, field.user_id(), Role::Operator)
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(PermissionError::Forbidden { .. }))
    ));

    // An operator's role cannot be changed.
    let result = backend.change_role(&admin, op.user_id(), Role::Field).await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(PermissionError::Forbidden { .. }))
    ));

    // Non-administrators cannot change roles at all.
    let result = backend
        .change_role(&field, admin.user_id(), Role::Field)
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(
            PermissionError::AdministratorRequired { .. }
        ))
    ));

    let updated = backend
        .change_role(&admin, field.user_id(), Role::Callcenter)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Callcenter);
}

#[tokio::test]
async fn test_delete_profile_guards() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let admin = member(&backend, &op, "admin@fixlog.kr", "관리자", Role::Admin).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    assert!(backend.delete_profile(&admin, admin.user_id()).await.is_err());
    assert!(backend.delete_profile(&admin, op.user_id()).await.is_err());

    backend.delete_profile(&admin, field.user_id()).await.unwrap();
    assert!(backend.find_profile(field.user_id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_profiles_orders_by_role_tier() {
    let backend = create_backend();
    let op = operator(&backend).await;
    member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;
    member(&backend, &op, "admin@fixlog.kr", "관리자", Role::Admin).await;

    let page = backend
        .list_profiles(&op, None, Pagination::default())
        .await
        .unwrap();
    let roles: Vec<Role> = page.items.iter().map(|p| p.role).collect();
    assert_eq!(roles, vec![Role::Operator, Role::Admin, Role::Field]);

    let page = backend
        .list_profiles(&op, Some("관리자"), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].email, "admin@fixlog.kr");
}

#[tokio::test]
async fn test_update_own_profile() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let updated = backend
        .update_own_profile(
            &field,
            ProfileUpdate {
                phone: Some("010-2222-3333".to_string()),
                team_name: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("010-2222-3333"));
    assert_eq!(updated.team_name, None);
    assert_eq!(updated.display_name.as_deref(), Some("현장"));
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_client_keyword_search() {
    let backend = create_backend();
    let op = operator(&backend).await;

    backend
        .create_client(&op, client_input("에이스마트", "010-1234-5678"))
        .await
        .unwrap();
    backend
        .create_client(&op, client_input("베타상사", "02-555-0000"))
        .await
        .unwrap();

    let all = backend
        .list_clients(&op, "", Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].name, "베타상사");

    let by_name = backend
        .list_clients(&op, "상호:에이스", Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.items[0].name, "에이스마트");

    let by_general = backend
        .list_clients(&op, "555", Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_general.total, 1);
    assert_eq!(by_general.items[0].name, "베타상사");

    let none = backend
        .list_clients(&op, "상호:에이스 전화:02", Pagination::default())
        .await
        .unwrap();
    assert_eq!(none.total, 0);
}

#[tokio::test]
async fn test_client_search_quoted_value() {
    let backend = create_backend();
    let op = operator(&backend).await;

    backend
        .create_client(&op, ClientInput::named("에이스 마트 강남점"))
        .await
        .unwrap();
    backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();

    let page = backend
        .list_clients(&op, r#"상호:"에이스 마트""#, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "에이스 마트 강남점");
}

#[tokio::test]
async fn test_client_search_escapes_wildcards() {
    let backend = create_backend();
    let op = operator(&backend).await;

    backend
        .create_client(&op, ClientInput::named("100%할인마트"))
        .await
        .unwrap();
    backend
        .create_client(&op, ClientInput::named("1000원마트"))
        .await
        .unwrap();

    let page = backend
        .list_clients(&op, "상호:100%", Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "100%할인마트");
}

#[tokio::test]
async fn test_client_pagination() {
    let backend = create_backend();
    let op = operator(&backend).await;

    for i in 0..5 {
        backend
            .create_client(&op, ClientInput::named(format!("거래처{i}")))
            .await
            .unwrap();
    }

    let page = backend
        .list_clients(&op, "", Pagination::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.count, 2);
    assert_eq!(page.items[0].name, "거래처2");
    assert!(page.has_more());
}

#[tokio::test]
async fn test_client_requires_name() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let result = backend.create_client(&op, ClientInput::named("   ")).await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(
            ValidationError::MissingRequiredField { .. }
        ))
    ));
}

#[tokio::test]
async fn test_delete_client_with_records_fails() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();
    let record = backend
        .create_record(&op, NewRecord::new(&client.id, "A/S"))
        .await
        .unwrap();

    let result = backend.delete_client(&op, &client.id).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::InUse { count: 1, .. }))
    ));

    backend.delete_record(&op, &record.id).await.unwrap();
    backend.delete_client(&op, &client.id).await.unwrap();
    assert!(
        backend
            .get_client(&op, &client.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

// ============================================================================
// Group Scope Tests
// ============================================================================

#[tokio::test]
async fn test_group_scoped_profile_sees_only_its_groups() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let north = backend
        .create_group(&op, CatalogInput::named("북부"))
        .await
        .unwrap();
    let south = backend
        .create_group(&op, CatalogInput::named("남부"))
        .await
        .unwrap();

    let in_north = backend
        .create_client(
            &op,
            ClientInput {
                group_id: Some(north.id.clone()),
                ..ClientInput::named("북부상회")
            },
        )
        .await
        .unwrap();
    let in_south = backend
        .create_client(
            &op,
            ClientInput {
                group_id: Some(south.id.clone()),
                ..ClientInput::named("남부상회")
            },
        )
        .await
        .unwrap();
    backend
        .create_client(&op, ClientInput::named("무소속상회"))
        .await
        .unwrap();

    backend
        .set_allowed_groups(&op, field.user_id(), vec![north.id.clone()])
        .await
        .unwrap();
    let field = refresh(&backend, field.user_id()).await;

    let page = backend
        .list_clients(&field, "", Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, in_north.id);
    assert_eq!(page.items[0].group_name.as_deref(), Some("북부"));

    let hidden = backend.get_client(&field, &in_south.id).await;
    assert!(hidden.unwrap_err().is_not_found());

    let outside = backend
        .create_client(
            &field,
            ClientInput {
                group_id: Some(south.id.clone()),
                ..ClientInput::named("신규상회")
            },
        )
        .await;
    assert!(matches!(
        outside,
        Err(StorageError::Permission(PermissionError::Forbidden { .. }))
    ));

    let groups = backend.list_groups(&field).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "북부");
}

#[tokio::test]
async fn test_unknown_allowed_group_rejected() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let result = backend
        .set_allowed_groups(&op, field.user_id(), vec!["no-such-group".to_string()])
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(ValidationError::InvalidValue { .. }))
    ));
}

#[tokio::test]
async fn test_delete_group_detaches_clients() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let group = backend
        .create_group(&op, CatalogInput::named("북부"))
        .await
        .unwrap();
    let client = backend
        .create_client(
            &op,
            ClientInput {
                group_id: Some(group.id.clone()),
                ..ClientInput::named("북부상회")
            },
        )
        .await
        .unwrap();

    backend.delete_group(&op, &group.id).await.unwrap();

    let client = backend.get_client(&op, &client.id).await.unwrap();
    assert_eq!(client.group_id, None);
    assert!(backend.list_groups(&op).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_group_keeps_restricted_user_restricted() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let north = backend
        .create_group(&op, CatalogInput::named("북부"))
        .await
        .unwrap();
    let south = backend
        .create_group(&op, CatalogInput::named("남부"))
        .await
        .unwrap();
    backend
        .create_client(
            &op,
            ClientInput {
                group_id: Some(south.id.clone()),
                ..ClientInput::named("남부상회")
            },
        )
        .await
        .unwrap();
    backend
        .set_allowed_groups(&op, field.user_id(), vec![north.id.clone()])
        .await
        .unwrap();
    let field = refresh(&backend, field.user_id()).await;

    let before = backend
        .list_clients(&field, "", Pagination::new(20, 0))
        .await
        .unwrap();
    assert_eq!(before.total, 0);

    backend.delete_group(&op, &north.id).await.unwrap();

    let field = refresh(&backend, field.user_id()).await;
    let after = backend
        .list_clients(&field, "", Pagination::new(20, 0))
        .await
        .unwrap();
    assert_eq!(after.total, 0);
    assert!(field.group_scope().is_some());
}

// ============================================================================
// Service Record Tests
// ============================================================================

#[tokio::test]
async fn test_create_record_defaults() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();

    let record = backend
        .create_record(
            &op,
            NewRecord::new(&client.id, "A/S").with_details("단말기 전원 불량"),
        )
        .await
        .unwrap();

    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.client_name.as_deref(), Some("에이스마트"));
    assert_eq!(record.receiver_id.as_deref(), Some(op.user_id()));
    assert_eq!(record.receiver_name.as_deref(), Some("운영자"));
    assert_eq!(record.processor_id, None);
    assert_eq!(record.processed_at, None);
}

#[tokio::test]
async fn test_create_record_unknown_client() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let result = backend
        .create_record(&op, NewRecord::new("missing", "A/S"))
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Validation(ValidationError::InvalidValue { .. }))
    ));
}

#[tokio::test]
async fn test_status_transitions() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장기사", Role::Field).await;
    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();
    let record = backend
        .create_record(&op, NewRecord::new(&client.id, "설치"))
        .await
        .unwrap();

    let processing = backend
        .change_status(&field, &record.id, RecordStatus::Processing)
        .await
        .unwrap();
    assert_eq!(processing.status, RecordStatus::Processing);
    assert_eq!(processing.processor_id.as_deref(), Some(field.user_id()));
    assert_eq!(processing.processor_name.as_deref(), Some("현장기사"));
    assert_eq!(processing.processed_at, None);

    let completed = backend
        .change_status(&field, &record.id, RecordStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, RecordStatus::Completed);
    assert!(completed.processed_at.is_some());

    let reopened = backend
        .change_status(&op, &record.id, RecordStatus::Pending)
        .await
        .unwrap();
    assert_eq!(reopened.status, RecordStatus::Pending);
    assert_eq!(reopened.processor_id, None);
    assert_eq!(reopened.processed_at, None);
}

#[tokio::test]
async fn test_update_record() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();
    let record = backend
        .create_record(&op, NewRecord::new(&client.id, "A/S").with_details("첫 내용"))
        .await
        .unwrap();

    let updated = backend
        .update_record(
            &op,
            &record.id,
            RecordUpdate {
                record_type: None,
                details: Some("수정된 내용".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.record_type, "A/S");
    assert_eq!(updated.details.as_deref(), Some("수정된 내용"));
}

#[tokio::test]
async fn test_record_search() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let ace = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();
    let beta = backend
        .create_client(&op, ClientInput::named("베타상사"))
        .await
        .unwrap();

    let march = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
    let april = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

    let first = backend
        .create_record(
            &op,
            NewRecord {
                reception_at: Some(march),
                ..NewRecord::new(&ace.id, "A/S").with_details("카드 단말기 교체")
            },
        )
        .await
        .unwrap();
    let second = backend
        .create_record(
            &op,
            NewRecord {
                reception_at: Some(april),
                ..NewRecord::new(&beta.id, "설치")
            },
        )
        .await
        .unwrap();
    backend
        .change_status(&op, &second.id, RecordStatus::Completed)
        .await
        .unwrap();

    let all = backend
        .list_records(&op, "", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].id, second.id);

    let by_client = backend
        .list_records(&op, "거래처:에이스", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_client.total, 1);
    assert_eq!(by_client.items[0].id, first.id);

    let by_status_label = backend
        .list_records(&op, "상태:완료", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_status_label.total, 1);
    assert_eq!(by_status_label.items[0].id, second.id);

    let by_status_param = backend
        .list_records(&op, "", Some(RecordStatus::Pending), Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_status_param.total, 1);
    assert_eq!(by_status_param.items[0].id, first.id);

    let by_day = backend
        .list_records(&op, "접수일:2024-03-05", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_day.total, 1);
    assert_eq!(by_day.items[0].id, first.id);

    let by_month = backend
        .list_records(&op, "접수:2024.04", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(by_month.total, 1);
    assert_eq!(by_month.items[0].id, second.id);

    let general = backend
        .list_records(&op, "단말기", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(general.total, 1);
    assert_eq!(general.items[0].id, first.id);
}

#[tokio::test]
async fn test_records_follow_client_group_scope() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let north = backend
        .create_group(&op, CatalogInput::named("북부"))
        .await
        .unwrap();
    let visible = backend
        .create_client(
            &op,
            ClientInput {
                group_id: Some(north.id.clone()),
                ..ClientInput::named("북부상회")
            },
        )
        .await
        .unwrap();
    let hidden = backend
        .create_client(&op, ClientInput::named("무소속상회"))
        .await
        .unwrap();
    backend
        .create_record(&op, NewRecord::new(&visible.id, "A/S"))
        .await
        .unwrap();
    let hidden_record = backend
        .create_record(&op, NewRecord::new(&hidden.id, "A/S"))
        .await
        .unwrap();

    backend
        .set_allowed_groups(&op, field.user_id(), vec![north.id.clone()])
        .await
        .unwrap();
    let field = refresh(&backend, field.user_id()).await;

    let page = backend
        .list_records(&field, "", None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].client_id, visible.id);

    let result = backend.get_record(&field, &hidden_record.id).await;
    assert!(result.unwrap_err().is_not_found());
}

// ============================================================================
// Notice Tests
// ============================================================================

#[tokio::test]
async fn test_notice_visibility_and_order() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let admins_only = backend
        .create_notice(
            &op,
            NoticeInput::new("관리자 공지", "").for_roles(vec![Role::Admin]),
        )
        .await
        .unwrap();
    let everyone = backend
        .create_notice(&op, NoticeInput::new("전체 공지", "점검 안내"))
        .await
        .unwrap();
    let pinned = backend
        .create_notice(&op, NoticeInput::new("고정 공지", "").pinned())
        .await
        .unwrap();

    let for_field = backend
        .list_notices(&field, Pagination::default())
        .await
        .unwrap();
    let ids: Vec<&str> = for_field.items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![pinned.id.as_str(), everyone.id.as_str()]);

    let result = backend.get_notice(&field, &admins_only.id).await;
    assert!(result.unwrap_err().is_not_found());

    let for_operator = backend
        .list_notices(&op, Pagination::default())
        .await
        .unwrap();
    assert_eq!(for_operator.total, 3);
    assert_eq!(for_operator.items[0].author_name.as_deref(), Some("운영자"));
}

#[tokio::test]
async fn test_notice_requires_administrator() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let result = backend
        .create_notice(&field, NoticeInput::new("공지", ""))
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(
            PermissionError::AdministratorRequired { .. }
        ))
    ));
}

#[tokio::test]
async fn test_notice_update_and_delete() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let notice = backend
        .create_notice(&op, NoticeInput::new("초안", ""))
        .await
        .unwrap();
    let updated = backend
        .update_notice(
            &op,
            &notice.id,
            NoticeInput::new("수정본", "본문").for_roles(vec![Role::Field, Role::Field]),
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "수정본");
    assert_eq!(updated.allowed_roles, vec![Role::Field]);

    backend.delete_notice(&op, &notice.id).await.unwrap();
    assert!(
        backend
            .get_notice(&op, &notice.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[tokio::test]
async fn test_catalog_entries_append_in_order() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let first = backend
        .create_catalog_entry(&op, CatalogKind::ServiceType, CatalogInput::named("설치"))
        .await
        .unwrap();
    let second = backend
        .create_catalog_entry(&op, CatalogKind::ServiceType, CatalogInput::named("A/S"))
        .await
        .unwrap();
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);

    let entries = backend
        .list_catalog(&op, CatalogKind::ServiceType)
        .await
        .unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["설치", "A/S"]);

    let other = backend
        .list_catalog(&op, CatalogKind::VanCompany)
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_catalog_duplicate_and_delete() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let entry = backend
        .create_catalog_entry(&op, CatalogKind::VanCompany, CatalogInput::named("KIS"))
        .await
        .unwrap();
    let duplicate = backend
        .create_catalog_entry(&op, CatalogKind::VanCompany, CatalogInput::named("KIS"))
        .await;
    assert!(matches!(
        duplicate,
        Err(StorageError::Resource(ResourceError::AlreadyExists { .. }))
    ));

    backend
        .delete_catalog_entry(&op, CatalogKind::VanCompany, &entry.id)
        .await
        .unwrap();
    let missing = backend
        .delete_catalog_entry(&op, CatalogKind::VanCompany, &entry.id)
        .await;
    assert!(missing.unwrap_err().is_not_found());
}

// ============================================================================
// Activity Log and Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_activity_log_records_mutations() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();
    backend
        .update_client(&op, &client.id, ClientInput::named("에이스마트 본점"))
        .await
        .unwrap();
    backend
        .create_group(&op, CatalogInput::named("북부"))
        .await
        .unwrap();

    let all = backend
        .list_activity(&op, LogCategory::All, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 4);
    assert_eq!(all.items[0].action, ActivityAction::CreateGroup);
    assert_eq!(all.items[3].action, ActivityAction::Signup);

    let clients = backend
        .list_activity(&op, LogCategory::Client, Pagination::default())
        .await
        .unwrap();
    assert_eq!(clients.total, 2);
    let update = &clients.items[0];
    assert_eq!(update.action, ActivityAction::UpdateClient);
    assert_eq!(update.target_type, TargetType::Client);
    assert_eq!(update.target_id.as_deref(), Some(client.id.as_str()));
    assert_eq!(update.details["old_name"], "에이스마트");
    assert_eq!(update.user_email.as_deref(), Some("ops@fixlog.kr"));

    let system = backend
        .list_activity(&op, LogCategory::System, Pagination::default())
        .await
        .unwrap();
    assert_eq!(system.total, 1);
}

#[tokio::test]
async fn test_activity_log_requires_administrator() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let field = member(&backend, &op, "field@fixlog.kr", "현장", Role::Field).await;

    let result = backend
        .list_activity(&field, LogCategory::All, Pagination::default())
        .await;
    assert!(matches!(
        result,
        Err(StorageError::Permission(
            PermissionError::AdministratorRequired { .. }
        ))
    ));
}

#[tokio::test]
async fn test_failed_mutation_logs_nothing() {
    let backend = create_backend();
    let op = operator(&backend).await;

    let _ = backend
        .create_record(&op, NewRecord::new("missing", "A/S"))
        .await;

    let records = backend
        .list_activity(&op, LogCategory::Record, Pagination::default())
        .await
        .unwrap();
    assert_eq!(records.total, 0);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let backend = create_backend();
    let op = operator(&backend).await;
    let client = backend
        .create_client(&op, ClientInput::named("에이스마트"))
        .await
        .unwrap();

    for _ in 0..3 {
        backend
            .create_record(&op, NewRecord::new(&client.id, "A/S"))
            .await
            .unwrap();
    }
    let page = backend
        .list_records(&op, "", None, Pagination::default())
        .await
        .unwrap();
    backend
        .change_status(&op, &page.items[0].id, RecordStatus::Processing)
        .await
        .unwrap();
    backend
        .change_status(&op, &page.items[1].id, RecordStatus::Completed)
        .await
        .unwrap();

    let stats = backend.dashboard_stats(&op).await.unwrap();
    assert_eq!(stats.total_clients, 1);
    assert_eq!(stats.pending_records, 1);
    assert_eq!(stats.processing_records, 1);
    assert_eq!(stats.completed_today, 1);
    assert_eq!(stats.recent_records.len(), 3);
}

// ============================================================================
// File Database Tests
// ============================================================================

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixlog.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend.init_schema().unwrap();
        let op = operator(&backend).await;
        backend
            .create_client(&op, ClientInput::named("에이스마트"))
            .await
            .unwrap();
    }

    let backend = SqliteBackend::open(&path).unwrap();
    backend.init_schema().unwrap();
    let page = backend
        .list_profiles(
            &ActorContext::new("probe", "probe@fixlog.kr", Role::Admin, true),
            None,
            Pagination::default(),
        )
        .await
        .unwrap();
    let op = ActorContext::from_profile(&page.items[0]);
    let clients = backend
        .list_clients(&op, "", Pagination::default())
        .await
        .unwrap();
    assert_eq!(clients.total, 1);
}
