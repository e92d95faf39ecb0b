//! Integration tests for the feedback store.

use feedback::{Feedback, MemorySession, MessageSource, SessionService, DEFAULT_SESSION_KEY};

fn sample(session: &MemorySession) -> Feedback<&MemorySession> {
    let mut feedback = Feedback::new(session);
    feedback.set("error", "A");
    feedback.set("error.email", "B");
    feedback.set("warning.email", "C");
    feedback
}

// --- Selector Queries ---

#[test]
fn test_get_all() {
    let session = MemorySession::new();
    let feedback = sample(&session);
    assert_eq!(feedback.get(None), vec!["A", "B", "C"]);
}

#[test]
fn test_get_by_type() {
    let session = MemorySession::new();
    let feedback = sample(&session);
    assert_eq!(feedback.get(Some("error")), vec!["A", "B"]);
    assert_eq!(feedback.get(Some("WARNING")), vec!["C"]);
}

#[test]
fn test_get_by_namespace() {
    let session = MemorySession::new();
    let feedback = sample(&session);
    assert_eq!(feedback.get(Some(".email")), vec!["B", "C"]);
    assert_eq!(feedback.get(Some("error.email")), vec!["B"]);
}

#[test]
fn test_get_negated() {
    let session = MemorySession::new();
    let feedback = sample(&session);
    assert_eq!(feedback.get(Some("error!email")), vec!["A"]);
    assert_eq!(feedback.get(Some("!email")), vec!["A"]);
}

#[test]
fn test_unmatched_selectors_are_empty() {
    let session = MemorySession::new();
    let feedback = sample(&session);

    assert!(feedback.get(Some("notice")).is_empty());
    assert!(feedback.get(Some("error.phone")).is_empty());
    assert!(!feedback.has(Some("notice")));
    assert!(!feedback.has(Some("warning!email")));
}

#[test]
fn test_loose_type_matching() {
    let session = MemorySession::new();
    let mut feedback = Feedback::new(&session);
    feedback.set("errors", "plural");
    feedback.set("error", "singular");

    assert_eq!(feedback.get(Some("error")), vec!["plural", "singular"]);
    assert_eq!(feedback.get(Some("err")), vec!["plural", "singular"]);
}

#[test]
fn test_has_on_empty_and_after_set() {
    let session = MemorySession::new();
    let mut feedback = Feedback::new(&session);
    assert!(!feedback.has(None));

    feedback.set("notice", "Saved");
    assert!(feedback.has(None));
}

#[test]
fn test_messages_keep_append_order_across_keys() {
    let session = MemorySession::new();
    let mut feedback = Feedback::new(&session);
    feedback.set("error.name", "1");
    feedback.set("error.email", "2");
    feedback.set("error.name", "3");

    // Grouped by key in first-write order, then append order within a key.
    assert_eq!(feedback.get(Some("error")), vec!["1", "3", "2"]);
}

#[test]
fn test_reads_do_not_mutate() {
    let session = MemorySession::new();
    let feedback = sample(&session);
    let before = feedback.store().clone();

    for selector in [None, Some("error"), Some(".email"), Some("!email"), Some("missing")] {
        let _ = feedback.get(selector);
        let _ = feedback.has(selector);
        let _ = feedback.count(selector);
    }

    assert_eq!(feedback.store(), &before);
}

// --- Import ---

#[test]
fn test_import_from_validation_failures() {
    struct SignupForm {
        failures: Vec<String>,
    }

    impl MessageSource for SignupForm {
        fn messages(&self) -> Vec<String> {
            self.failures.clone()
        }
    }

    let form = SignupForm {
        failures: vec!["Name is required".into(), "Password too short".into()],
    };

    let session = MemorySession::new();
    let mut feedback = Feedback::new(&session);
    feedback.import_messages(&form);
    feedback.import_messages_as(&form, "error.signup");

    assert_eq!(feedback.count(Some("error")), 4);
    assert_eq!(
        feedback.get(Some("error.signup")),
        vec!["Name is required", "Password too short"]
    );
}

// --- Flash Cycle ---

#[test]
fn test_redirect_cycle() {
    let session = MemorySession::new();

    // Request 1: validation fails, flash and redirect
    sample(&session).flash().unwrap();
    session.close();

    // Request 2: fresh store, restore flashed messages
    session.start();
    let mut feedback = Feedback::new(&session);
    assert!(feedback.restore(true).unwrap());
    assert_eq!(feedback.get(None), vec!["A", "B", "C"]);
    assert_eq!(feedback.get(Some("error!email")), vec!["A"]);
    assert!(!session.has(DEFAULT_SESSION_KEY).unwrap());

    // Request 3: nothing left to restore
    let mut feedback = Feedback::new(&session);
    assert!(!feedback.restore(true).unwrap());
    assert!(!feedback.has(None));
}

#[test]
fn test_restore_without_flush_is_repeatable() {
    let session = MemorySession::new();
    sample(&session).flash().unwrap();

    let mut first = Feedback::new(&session);
    first.restore(false).unwrap();

    let mut second = Feedback::new(&session);
    second.restore(true).unwrap();

    assert_eq!(first.store(), second.store());
    assert!(!session.has(DEFAULT_SESSION_KEY).unwrap());
}

#[test]
fn test_flash_roundtrip_preserves_everything() {
    let session = MemorySession::new();
    let mut feedback = Feedback::new(&session);
    feedback.set("warning", "w1");
    feedback.set("Error.Email", "e1");
    feedback.set("error", "e2");
    feedback.set("error.email", "e3");
    feedback.set("notice.profile", "n1");
    feedback.flash().unwrap();

    let mut restored = Feedback::new(&session);
    restored.restore(true).unwrap();

    assert_eq!(restored.store(), feedback.store());
    assert_eq!(
        restored.keys().collect::<Vec<_>>(),
        vec!["warning", "error.email", "error", "notice.profile"]
    );
    assert_eq!(restored.get(None), vec!["w1", "e1", "e3", "e2", "n1"]);
}

#[test]
fn test_shared_session_via_arc() {
    use std::sync::Arc;

    let session = Arc::new(MemorySession::new());

    let mut feedback = Feedback::new(Arc::clone(&session));
    feedback.set("notice", "hello");
    feedback.flash().unwrap();

    let mut next = Feedback::new(Arc::clone(&session));
    next.restore(true).unwrap();
    assert_eq!(next.get(Some("notice")), vec!["hello"]);
}

#[test]
fn test_logging_does_not_interfere() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let session = MemorySession::new();
    sample(&session).flash().unwrap();

    let mut feedback = Feedback::new(&session);
    assert!(feedback.restore(true).unwrap());
    assert_eq!(feedback.count(None), 3);
}
