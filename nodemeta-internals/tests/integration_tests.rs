//! Integration tests for the raw payload storage of nodemeta-internals.
//!
//! These exercise the public surface only: creating payloads, sharing them
//! between handles, reading them back through unchecked downcasts, and making
//! sure every allocation is released exactly once.

use std::{
    any::TypeId,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use nodemeta_internals::{RawPayload, RawPayloadRef};

/// Counts how many times it has been dropped.
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, PartialEq)]
struct Span {
    start: u32,
    end: u32,
}

#[test]
fn test_payload_creation_and_downcast() {
    let payload = RawPayload::new(Span { start: 3, end: 9 });
    let payload_ref = payload.as_ref();

    assert_eq!(payload_ref.type_id(), TypeId::of::<Span>());
    assert!(payload_ref.type_name().ends_with("Span"));

    let span = unsafe { payload_ref.value_downcast_unchecked::<Span>() };
    assert_eq!(span, &Span { start: 3, end: 9 });
}

#[test]
fn test_payload_drop_runs_once() {
    let drops = Arc::new(AtomicUsize::new(0));

    let payload = RawPayload::new(DropCounter(drops.clone()));
    let first_clone = payload.clone();
    let second_clone = first_clone.clone();
    assert_eq!(payload.as_ref().strong_count(), 3);

    drop(payload);
    drop(first_clone);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    assert_eq!(second_clone.as_ref().strong_count(), 1);

    drop(second_clone);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_payloads_in_vec() {
    let drops = Arc::new(AtomicUsize::new(0));
    let payloads = vec![
        RawPayload::new(1_u8),
        RawPayload::new(String::from("name")),
        RawPayload::new(DropCounter(drops.clone())),
    ];

    let type_ids: Vec<TypeId> = payloads.iter().map(|p| p.as_ref().type_id()).collect();
    assert_eq!(
        type_ids,
        vec![
            TypeId::of::<u8>(),
            TypeId::of::<String>(),
            TypeId::of::<DropCounter>()
        ]
    );

    let shared: Vec<RawPayload> = payloads.to_vec();
    for (a, b) in payloads.iter().zip(shared.iter()) {
        assert!(a.as_ref().ptr_eq(b.as_ref()));
    }

    drop(payloads);
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(shared);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_distinct_payloads_are_not_ptr_eq() {
    let a = RawPayload::new(7_i64);
    let b = RawPayload::new(7_i64);
    assert!(!a.as_ref().ptr_eq(b.as_ref()));
    assert_eq!(a.as_ref().type_id(), b.as_ref().type_id());
}

#[test]
fn test_zero_sized_payload() {
    struct Marker;

    let payload = RawPayload::new(Marker);
    let payload_ref: RawPayloadRef<'_> = payload.as_ref();
    assert_eq!(payload_ref.type_id(), TypeId::of::<Marker>());
    let _marker: &Marker = unsafe { payload_ref.value_downcast_unchecked::<Marker>() };
}

#[test]
fn test_payload_ref_is_copy() {
    let payload = RawPayload::new(5_u16);
    let r1 = payload.as_ref();
    let r2 = r1;
    assert!(r1.ptr_eq(r2));
    assert_eq!(unsafe { *r2.value_downcast_unchecked::<u16>() }, 5);
}
