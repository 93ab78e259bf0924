//! Signer upsert and status state machine over the real store.

mod common;

use common::harness::drain;
use common::TestHarness;
use signflow::request::SignerRequest;
use signflow::{
    FileStatus, IdentifyMethodInput, NodeType, SignFlowError, SignFlowEvent, SignRequestStatus,
    SignatureFlow,
};

#[test]
fn test_ordered_flow_initial_statuses() {
    let h = TestHarness::new();
    let file = h.ordered_file();

    let cases = [
        ("first@example.com", 1, SignRequestStatus::AbleToSign),
        ("second@example.com", 2, SignRequestStatus::Draft),
        ("third@example.com", 3, SignRequestStatus::Draft),
    ];
    for (email, order, expected) in cases {
        let sr = h.add_signer(&file, email, order);
        assert_eq!(sr.status, expected, "signer {} (order {})", email, order);
    }
}

#[test]
fn test_parallel_flow_everyone_can_sign() {
    let h = TestHarness::new();
    let file = h.insert_file(
        "nda.pdf",
        NodeType::File,
        SignatureFlow::Parallel,
        FileStatus::AbleToSign,
        None,
    );
    for (n, email) in ["a@example.com", "b@example.com"].iter().enumerate() {
        let sr = h.add_signer(&file, email, n as u32 + 1);
        assert_eq!(sr.status, SignRequestStatus::AbleToSign);
    }
}

#[test]
fn test_repeated_request_updates_same_row() {
    let h = TestHarness::new();
    let file = h.ordered_file();

    let first = h.add_signer(&file, "alice@example.com", 1);
    let mut again = SignerRequest::new(
        file.id,
        vec![IdentifyMethodInput::new("email", "Alice@Example.com ")],
    );
    again.display_name = Some("Alice".to_string());
    again.file_status = Some(FileStatus::AbleToSign);
    let second = h.sign_requests.create_or_update_sign_request(again).unwrap();

    assert_eq!(second.uuid, first.uuid);
    assert_eq!(second.id, first.id);
    assert_eq!(h.reload(&first).display_name, "Alice");
    assert_eq!(
        signflow::db::sign_request_repo::list_by_file(&h.db, file.id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_signed_row_is_never_mutated() {
    let h = TestHarness::new();
    let file = h.ordered_file();
    let signed = h.mark_signed(&h.add_signer(&file, "done@example.com", 1));

    let transitions = [
        (SignRequestStatus::Signed, SignRequestStatus::Draft, false),
        (SignRequestStatus::Signed, SignRequestStatus::AbleToSign, false),
        (SignRequestStatus::AbleToSign, SignRequestStatus::Draft, false),
        (SignRequestStatus::Draft, SignRequestStatus::AbleToSign, true),
    ];
    for (current, desired, is_new) in transitions {
        let mut row = signed.clone();
        let applied = h
            .status
            .update_status_if_allowed(&mut row, current, desired, is_new)
            .unwrap();
        assert!(!applied, "{} -> {} was applied", current, desired);
        assert_eq!(row.status, SignRequestStatus::Signed);
    }

    let mut request = SignerRequest::new(
        file.id,
        vec![IdentifyMethodInput::new("email", "done@example.com")],
    );
    request.signer_status = Some(SignRequestStatus::Draft);
    let after = h.sign_requests.create_or_update_sign_request(request).unwrap();
    assert_eq!(after.status, SignRequestStatus::Signed);
    assert!(h.reload(&signed).signed.is_some());
}

#[test]
fn test_able_to_sign_regresses_while_lower_orders_pending() {
    let h = TestHarness::new();
    let file = h.ordered_file();
    let first = h.add_signer(&file, "first@example.com", 1);
    let second = h.add_signer(&file, "second@example.com", 2);

    let mut row = second.clone();
    row.status = SignRequestStatus::AbleToSign;
    let applied = h
        .status
        .update_status_if_allowed(
            &mut row,
            SignRequestStatus::AbleToSign,
            SignRequestStatus::Draft,
            false,
        )
        .unwrap();
    assert!(applied);
    assert_eq!(row.status, SignRequestStatus::Draft);

    h.mark_signed(&first);
    let mut row = second.clone();
    row.status = SignRequestStatus::AbleToSign;
    let applied = h
        .status
        .update_status_if_allowed(
            &mut row,
            SignRequestStatus::AbleToSign,
            SignRequestStatus::Draft,
            false,
        )
        .unwrap();
    assert!(!applied);
    assert_eq!(row.status, SignRequestStatus::AbleToSign);
}

#[test]
fn test_next_signer_promoted_once_predecessor_signed() {
    let h = TestHarness::new();
    let file = h.ordered_file();
    let first = h.add_signer(&file, "first@example.com", 1);
    let second = h.add_signer(&file, "second@example.com", 2);
    assert_eq!(second.status, SignRequestStatus::Draft);

    let mut rx = h.subscribe();
    let mut promote = SignerRequest::new(
        file.id,
        vec![IdentifyMethodInput::new("email", "second@example.com")],
    );
    promote.signing_order = 2;
    promote.signer_status = Some(SignRequestStatus::AbleToSign);

    // Still clamped while the first signer is pending
    let blocked = h
        .sign_requests
        .create_or_update_sign_request(promote.clone())
        .unwrap();
    assert_eq!(blocked.status, SignRequestStatus::Draft);
    assert!(drain(&mut rx).is_empty());

    h.mark_signed(&first);
    let promoted = h.sign_requests.create_or_update_sign_request(promote).unwrap();
    assert_eq!(promoted.status, SignRequestStatus::AbleToSign);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], SignFlowEvent::SignRequested { .. }));
    assert!(matches!(
        events[1],
        SignFlowEvent::StatusChanged {
            from: SignRequestStatus::Draft,
            to: SignRequestStatus::AbleToSign,
            ..
        }
    ));
    assert!(events.iter().all(|e| e.sign_request_uuid() == second.uuid));
}

#[test]
fn test_draft_file_does_not_notify() {
    let h = TestHarness::new();
    let file = h.insert_file(
        "draft.pdf",
        NodeType::File,
        SignatureFlow::Parallel,
        FileStatus::Draft,
        None,
    );
    let mut rx = h.subscribe();

    let sr = h.add_signer(&file, "later@example.com", 1);
    assert_eq!(sr.status, SignRequestStatus::Draft);
    assert!(drain(&mut rx).is_empty());

    let methods =
        signflow::db::identify_method_repo::list_by_sign_request(&h.db, sr.id.unwrap()).unwrap();
    assert_eq!(methods.len(), 1);
    assert!(!methods[0].notify);
}

#[test]
fn test_unresolvable_identify_methods_are_rejected() {
    let h = TestHarness::new();
    let file = h.ordered_file();

    let cases = [
        vec![],
        vec![IdentifyMethodInput::new("fax", "+41 44 000 00 00")],
        vec![IdentifyMethodInput::new("email", "not-an-address")],
    ];
    for methods in cases {
        let err = h
            .sign_requests
            .create_or_update_sign_request(SignerRequest::new(file.id, methods))
            .unwrap_err();
        assert!(matches!(err, SignFlowError::InvalidIdentificationMethod));
        assert_eq!(err.code(), 422);
    }
}

#[test]
fn test_cache_file_status() {
    let h = TestHarness::new();
    let file = h.ordered_file();
    h.status.cache_file_status(&file).unwrap();
    assert_eq!(h.cache.get_file_status(&file.uuid), Some(FileStatus::AbleToSign));
}
