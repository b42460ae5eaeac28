use reminder_core::db::open_db_in_memory;
use reminder_core::{
    ConfirmationDecision, ConfirmationGate, ConfirmationRequest, DeleteOutcome,
    DocumentReminderRepository, FailureBehaviour, FixedDecision, InMemoryDocumentStore,
    ReminderDraft, ReminderService, ReminderServiceError, SqliteDocumentStore, StoreConfig,
    StoreOperation,
};

fn draft(title: &str, date: &str, start: &str, end: &str) -> ReminderDraft {
    ReminderDraft::new(title, "", date, start, end)
}

fn memory_service(
    store: &InMemoryDocumentStore,
) -> ReminderService<DocumentReminderRepository<&InMemoryDocumentStore>> {
    ReminderService::new(DocumentReminderRepository::new(
        store,
        &StoreConfig::default(),
    ))
}

/// Records prompts and answers with a preset decision.
struct RecordingGate {
    decision: ConfirmationDecision,
    prompts: Vec<String>,
}

impl RecordingGate {
    fn new(decision: ConfirmationDecision) -> Self {
        Self {
            decision,
            prompts: Vec::new(),
        }
    }
}

impl ConfirmationGate for RecordingGate {
    fn request(&mut self, request: &ConfirmationRequest<'_>) -> ConfirmationDecision {
        self.prompts.push(request.prompt.clone());
        self.decision
    }
}

#[test]
fn create_refresh_delete_roundtrip_on_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);
    let mut service =
        ReminderService::new(DocumentReminderRepository::new(store, &StoreConfig::default()));

    let input = ReminderDraft::new("Dentist", "bring card", "2024-06-01", "10:00", "11:00");
    let id = service.create_reminder(&input).unwrap();

    let created = service.projection().get(&id).unwrap().clone();
    assert_eq!(created.to_draft(), input);
    assert!(!created.completed);

    let mut gate = FixedDecision(ConfirmationDecision::Confirmed);
    assert_eq!(
        service.delete_reminder(&id, &mut gate).unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(service.projection().get(&id).is_none());

    service.refresh().unwrap();
    assert!(service.projection().is_empty());
}

#[test]
fn overlap_scenarios_around_a_ten_oclock_reminder() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let existing = service
        .create_reminder(&draft("existing", "2024-06-01", "10:00", "11:00"))
        .unwrap();

    service
        .create_reminder(&draft("back to back", "2024-06-01", "11:00", "12:00"))
        .unwrap();

    let err = service
        .create_reminder(&draft("inside", "2024-06-01", "10:30", "10:45"))
        .unwrap_err();
    assert!(matches!(
        err,
        ReminderServiceError::Overlap { ref conflicting_id } if *conflicting_id == existing
    ));

    service
        .create_reminder(&draft("next day", "2024-06-02", "10:30", "10:45"))
        .unwrap();

    assert_eq!(service.projection().len(), 3);
    assert_eq!(store.len(service.repository().collection()), 3);
}

#[test]
fn empty_range_is_rejected_without_reading_the_store() {
    let store = InMemoryDocumentStore::with_behaviour(FailureBehaviour::fail_now(1));
    let mut service = memory_service(&store);

    let err = service
        .create_reminder(&draft("zero length", "2024-06-01", "09:00", "09:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::InvalidRange));
}

#[test]
fn malformed_input_is_rejected_as_invalid_input() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);

    let err = service
        .create_reminder(&draft("  ", "2024-06-01", "09:00", "10:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::InvalidInput(_)));

    let err = service
        .create_reminder(&draft("bad date", "June 1st", "09:00", "10:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::InvalidInput(_)));
    assert!(store.is_empty(service.repository().collection()));
}

#[test]
fn unchanged_edit_does_not_conflict_with_itself() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("standup", "2024-06-01", "10:00", "11:00"))
        .unwrap();

    let prefilled = service.begin_edit(&id).unwrap();
    assert_eq!(prefilled, draft("standup", "2024-06-01", "10:00", "11:00"));
    service.submit_edit(&prefilled).unwrap();
    assert!(service.edit_session().is_none());
}

#[test]
fn edit_into_another_reminders_slot_is_rejected_and_keeps_session_open() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let blocker = service
        .create_reminder(&draft("blocker", "2024-06-01", "14:00", "15:00"))
        .unwrap();
    let moving = service
        .create_reminder(&draft("moving", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    service.begin_edit(&moving).unwrap();
    let err = service
        .submit_edit(&draft("moving", "2024-06-01", "14:30", "15:30"))
        .unwrap_err();
    assert!(matches!(
        err,
        ReminderServiceError::Overlap { ref conflicting_id } if *conflicting_id == blocker
    ));
    assert_eq!(
        service.edit_session().map(|s| s.reminder_id.as_str()),
        Some(moving.as_str())
    );

    service
        .submit_edit(&draft("moved", "2024-06-01", "15:00", "16:00"))
        .unwrap();
    assert!(service.edit_session().is_none());
    assert_eq!(service.projection().get(&moving).unwrap().title, "moved");
}

#[test]
fn submit_edit_without_session_is_an_error() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);

    let err = service
        .submit_edit(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::NoEditInProgress));
}

#[test]
fn cancel_edit_discards_the_session() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    service.begin_edit(&id).unwrap();
    service.cancel_edit();
    assert!(service.edit_session().is_none());
}

#[test]
fn begin_edit_of_unknown_id_is_not_found() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);

    let err = service.begin_edit("ghost").unwrap_err();
    assert!(matches!(err, ReminderServiceError::NotFound(ref id) if id == "ghost"));
    assert!(service.edit_session().is_none());
}

#[test]
fn toggle_completed_skips_validation_and_refreshes() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    // Any same-date read would fail; the toggle must not need one.
    store.set_behaviour(FailureBehaviour::new().with(StoreOperation::QueryByField, 0, 5));
    service.toggle_completed(&id, true).unwrap();
    assert!(service.projection().get(&id).unwrap().completed);

    service.toggle_completed(&id, false).unwrap();
    assert!(!service.projection().get(&id).unwrap().completed);
}

#[test]
fn declined_or_dismissed_confirmation_never_deletes() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("keep me", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    for decision in [ConfirmationDecision::Declined, ConfirmationDecision::Dismissed] {
        let mut gate = RecordingGate::new(decision);
        assert_eq!(
            service.delete_reminder(&id, &mut gate).unwrap(),
            DeleteOutcome::Cancelled
        );
        assert_eq!(gate.prompts.len(), 1);
        assert!(gate.prompts[0].contains("keep me"));
    }
    assert_eq!(store.len(service.repository().collection()), 1);
}

#[test]
fn deleting_the_reminder_being_edited_closes_the_session() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    service.begin_edit(&id).unwrap();
    service
        .delete_reminder(&id, &mut FixedDecision(ConfirmationDecision::Confirmed))
        .unwrap();
    assert!(service.edit_session().is_none());
}

#[test]
fn refresh_twice_without_mutation_is_idempotent() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    for (title, start, end) in [("b", "12:00", "13:00"), ("a", "08:00", "09:00")] {
        service
            .create_reminder(&draft(title, "2024-06-01", start, end))
            .unwrap();
    }

    let first = service.refresh().unwrap().items().to_vec();
    let second = service.refresh().unwrap().items().to_vec();
    assert_eq!(first, second);
    assert_eq!(first[0].title, "a");
}

#[test]
fn failed_write_leaves_projection_untouched() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    service
        .create_reminder(&draft("existing", "2024-06-01", "09:00", "10:00"))
        .unwrap();
    let before = service.projection().clone();

    store.set_behaviour(FailureBehaviour::new().with(StoreOperation::Create, 0, 1));
    let err = service
        .create_reminder(&draft("new", "2024-06-01", "11:00", "12:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::StoreUnavailable(_)));
    assert_eq!(service.projection(), &before);

    service
        .create_reminder(&draft("new", "2024-06-01", "11:00", "12:00"))
        .unwrap();
    assert_eq!(service.projection().len(), 2);
}

#[test]
fn failed_same_date_read_blocks_the_write() {
    let store = InMemoryDocumentStore::with_behaviour(
        FailureBehaviour::new().with(StoreOperation::QueryByField, 0, 1),
    );
    let mut service = memory_service(&store);

    let err = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap_err();
    assert!(matches!(err, ReminderServiceError::StoreUnavailable(_)));
    assert!(store.is_empty(service.repository().collection()));
}

#[test]
fn failed_refresh_keeps_last_known_good_list_and_marks_it_stale() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);
    let id = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap();

    store.set_behaviour(FailureBehaviour::new().with(StoreOperation::ListOrdered, 0, 1));
    assert!(matches!(
        service.refresh(),
        Err(ReminderServiceError::StoreUnavailable(_))
    ));
    assert!(service.projection().is_stale());
    assert!(service.projection().get(&id).is_some());

    service.refresh().unwrap();
    assert!(!service.projection().is_stale());
}

#[test]
fn write_that_succeeds_before_a_failed_refresh_is_still_reported_ok() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);

    store.set_behaviour(FailureBehaviour::new().with(StoreOperation::ListOrdered, 0, 1));
    let id = service
        .create_reminder(&draft("x", "2024-06-01", "09:00", "10:00"))
        .unwrap();
    assert!(service.projection().is_stale());
    assert!(service.projection().get(&id).is_none());

    service.refresh().unwrap();
    assert!(service.projection().get(&id).is_some());
}

#[test]
fn toggle_or_delete_of_vanished_reminder_is_not_found() {
    let store = InMemoryDocumentStore::new();
    let mut service = memory_service(&store);

    assert!(matches!(
        service.toggle_completed("ghost", true),
        Err(ReminderServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_reminder("ghost", &mut FixedDecision(ConfirmationDecision::Confirmed)),
        Err(ReminderServiceError::NotFound(_))
    ));
}
