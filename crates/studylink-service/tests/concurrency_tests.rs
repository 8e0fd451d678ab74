//! Concurrency tests for studylink-service
//!
//! Every thread opens its own service on a shared database file, the way
//! independent request handlers would. A barrier lines the threads up so
//! their transactions contend for the write lock.

use std::path::Path;
use std::sync::Barrier;
use std::thread;
use studylink_domain::{ActorId, Decision, NullSink, RequestStatus};
use studylink_service::{ServiceConfig, ServiceError, StudyService};
use studylink_store::StoreConfig;

fn actor(s: &str) -> ActorId {
    ActorId::new(s).unwrap()
}

fn open(path: &Path) -> StudyService<NullSink> {
    let config = ServiceConfig {
        store: StoreConfig::at(path),
        ..ServiceConfig::default()
    };
    StudyService::open(config, NullSink).unwrap()
}

/// Create the schema and register the actors before any thread starts
fn seed(path: &Path, names: &[&str]) {
    let service = open(path);
    for name in names {
        service.register_actor(&actor(name)).unwrap();
    }
}

#[test]
fn test_mirrored_sends_produce_one_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.db");
    seed(&path, &["alice", "bob"]);

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = [("alice", "bob"), ("bob", "alice")]
            .into_iter()
            .map(|(from, to)| {
                let (path, barrier) = (&path, &barrier);
                s.spawn(move || {
                    let mut service = open(path);
                    barrier.wait();
                    service.send_request(&actor(from), &actor(to))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let created = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::DuplicatePending)))
        .count();
    assert_eq!((created, duplicates), (1, 1), "results: {:?}", results);

    let service = open(&path);
    let pending: Vec<_> = service
        .history(&actor("alice"))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, RequestStatus::Pending);
}

#[test]
fn test_same_direction_sends_produce_one_request() {
    const SENDERS: usize = 4;

    for _ in 0..5 {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.db");
        seed(&path, &["alice", "bob"]);

        let barrier = Barrier::new(SENDERS);
        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..SENDERS)
                .map(|_| {
                    let (path, barrier) = (&path, &barrier);
                    s.spawn(move || {
                        let mut service = open(path);
                        barrier.wait();
                        service.send_request(&actor("alice"), &actor("bob"))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let created = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::DuplicatePending)))
            .count();
        assert_eq!(
            (created, duplicates),
            (1, SENDERS - 1),
            "results: {:?}",
            results
        );

        let service = open(&path);
        assert_eq!(service.outgoing_pending(&actor("alice")).count(), 1);
    }
}

#[test]
fn test_concurrent_approvals_create_one_link() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.db");
    seed(&path, &["alice", "bob"]);

    let request = open(&path)
        .send_request(&actor("alice"), &actor("bob"))
        .unwrap();

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let (path, barrier) = (&path, &barrier);
                s.spawn(move || {
                    let mut service = open(path);
                    barrier.wait();
                    service.respond_to_request(&actor("bob"), request.id, Decision::Approve)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let approved = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(ServiceError::NotPending {
                    status: RequestStatus::Approved,
                    ..
                })
            )
        })
        .count();
    assert_eq!((approved, rejected), (1, 1), "results: {:?}", results);

    let service = open(&path);
    assert_eq!(service.store().count_links().unwrap(), 1);
    assert_eq!(service.my_partners(&actor("alice")).unwrap(), vec![actor("bob")]);
}

#[test]
fn test_approve_and_cancel_race_has_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.db");
    seed(&path, &["alice", "bob"]);

    let request = open(&path)
        .send_request(&actor("alice"), &actor("bob"))
        .unwrap();

    let barrier = Barrier::new(2);
    let (approval, cancellation) = thread::scope(|s| {
        let approver = s.spawn(|| {
            let mut service = open(&path);
            barrier.wait();
            service.respond_to_request(&actor("bob"), request.id, Decision::Approve)
        });
        let canceller = s.spawn(|| {
            let mut service = open(&path);
            barrier.wait();
            service.cancel_request(&actor("alice"), request.id)
        });
        (approver.join().unwrap(), canceller.join().unwrap())
    });

    assert!(
        approval.is_ok() != cancellation.is_ok(),
        "approval: {:?}, cancellation: {:?}",
        approval,
        cancellation
    );

    let service = open(&path);
    let stored = service.get_request(request.id).unwrap().unwrap();
    let linked = service.are_partners(&actor("alice"), &actor("bob")).unwrap();
    match stored.status {
        RequestStatus::Approved => assert!(linked),
        RequestStatus::Closed => assert!(!linked),
        other => panic!("unexpected final status {}", other),
    }
}

#[test]
fn test_many_senders_to_one_receiver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.db");
    let senders: Vec<String> = (0..6).map(|i| format!("student-{}", i)).collect();
    let mut names: Vec<&str> = senders.iter().map(String::as_str).collect();
    names.push("tutor");
    seed(&path, &names);

    let barrier = Barrier::new(senders.len());
    thread::scope(|s| {
        for sender in &senders {
            let (path, barrier) = (&path, &barrier);
            s.spawn(move || {
                let mut service = open(path);
                barrier.wait();
                service
                    .send_request(&actor(sender), &actor("tutor"))
                    .unwrap();
            });
        }
    });

    let service = open(&path);
    assert_eq!(service.incoming_pending(&actor("tutor")).count(), senders.len());
}
