//! # Registry Contract Tests
//!
//! If ANY tier fails, the registry is INVALID.
//!
//! ## Tiers
//! - R0: Bootstrap
//! - R1: Create / Read
//! - R2: Update / Delete
//! - R3: Default Lookup
//! - R4: Concurrency

use origo_core::{
    Context, DEFAULT_SOURCE_ID, ErrorCode, FindOptions, Id, SequentialGenerator,
    SnowflakeGenerator, Source, SourceRegistry, SourceService, SourceType, SourceUpdate,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn ctx() -> Context {
    Context::background()
}

fn empty_registry() -> SourceRegistry {
    SourceRegistry::new(SequentialGenerator::new()).expect("registry")
}

fn count(reg: &SourceRegistry) -> usize {
    reg.find_sources(&ctx(), &FindOptions::default())
        .expect("find_sources")
        .1
}

// =============================================================================
// TIER R0: BOOTSTRAP
// =============================================================================

mod r0_bootstrap {
    use super::*;

    /// R0.1: Repeated initialization leaves exactly the canonical default.
    #[test]
    fn initialize_is_idempotent() {
        let reg = empty_registry();
        for _ in 0..5 {
            reg.initialize_default_source(&ctx()).expect("init");
        }

        assert_eq!(count(&reg), 1);
        let id: Id = DEFAULT_SOURCE_ID.parse().expect("id");
        let stored = reg.find_source_by_id(&ctx(), id).expect("find");
        assert_eq!(&stored, reg.canonical_default());
    }

    /// R0.2: Bootstrap constructor inserts the default.
    #[test]
    fn bootstrap_inserts_default() {
        let reg = SourceRegistry::bootstrap_default().expect("bootstrap");
        let default = reg.default_source(&ctx()).expect("default");
        assert_eq!(default.id.to_string(), DEFAULT_SOURCE_ID);
        assert_eq!(default.source_type, SourceType::Local);
    }

    /// R0.3: Initialization alongside user records keeps them intact.
    #[test]
    fn initialize_preserves_other_records() {
        let reg = empty_registry();
        let mut src = Source::new("remote", SourceType::V2);
        reg.create_source(&ctx(), &mut src).expect("create");

        reg.initialize_default_source(&ctx()).expect("init");
        assert_eq!(count(&reg), 2);
        assert_eq!(reg.find_source_by_id(&ctx(), src.id).expect("find"), src);
    }
}

// =============================================================================
// TIER R1: CREATE / READ
// =============================================================================

mod r1_create_read {
    use super::*;

    /// R1.1: A created source reads back identical, with its assigned id.
    #[test]
    fn create_then_find_round_trips() {
        let reg = empty_registry();
        let mut src = Source::new("metrics", SourceType::V1)
            .with_url("http://influx:8086")
            .with_organization(Id::new(0xbeef));
        src.username = "reader".to_string();
        src.default_rp = "autogen".to_string();

        reg.create_source(&ctx(), &mut src).expect("create");
        assert!(!src.id.is_unset());

        let found = reg.find_source_by_id(&ctx(), src.id).expect("find");
        assert_eq!(found, src);
    }

    /// R1.2: Every create gets a distinct id.
    #[test]
    fn create_assigns_distinct_ids() {
        let reg = empty_registry();
        let ids: BTreeSet<Id> = (0..20)
            .map(|i| {
                let mut src = Source::new(format!("s{i}"), SourceType::V2);
                reg.create_source(&ctx(), &mut src).expect("create");
                src.id
            })
            .collect();
        assert_eq!(ids.len(), 20);
        assert_eq!(count(&reg), 20);
    }

    /// R1.3: Lookup of an unknown id is NotFound.
    #[test]
    fn unknown_id_not_found() {
        let reg = empty_registry();
        let err = reg
            .find_source_by_id(&ctx(), Id::new(12345))
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

// =============================================================================
// TIER R2: UPDATE / DELETE
// =============================================================================

mod r2_update_delete {
    use super::*;

    /// R2.1: Renaming touches nothing but the name.
    #[test]
    fn partial_update_changes_only_name() {
        let reg = empty_registry();
        let mut src = Source::new("before", SourceType::V1)
            .with_organization(Id::new(9))
            .with_default(true);
        reg.create_source(&ctx(), &mut src).expect("create");

        let updated = reg
            .update_source(&ctx(), src.id, SourceUpdate::rename("x"))
            .expect("update");

        assert_eq!(updated.name, "x");
        assert_eq!(updated.id, src.id);
        assert_eq!(updated.organization_id, src.organization_id);
        assert_eq!(updated.default, src.default);
        assert_eq!(updated.source_type, src.source_type);
        assert_eq!(reg.find_source_by_id(&ctx(), src.id).expect("find"), updated);
    }

    /// R2.2: Update and delete of an unknown id are NotFound.
    #[test]
    fn missing_update_and_delete_not_found() {
        let reg = empty_registry();
        let id = Id::new(404);

        let err = reg
            .update_source(&ctx(), id, SourceUpdate::rename("x"))
            .expect_err("update");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = reg.delete_source(&ctx(), id).expect_err("delete");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(count(&reg), 0);
    }

    /// R2.3: Delete removes exactly one record.
    #[test]
    fn delete_removes_one() {
        let reg = SourceRegistry::bootstrap(SequentialGenerator::new()).expect("bootstrap");
        let mut keep = Source::new("keep", SourceType::V2);
        let mut doomed = Source::new("doomed", SourceType::V2);
        reg.create_source(&ctx(), &mut keep).expect("create");
        reg.create_source(&ctx(), &mut doomed).expect("create");
        let before = count(&reg);

        reg.delete_source(&ctx(), doomed.id).expect("delete");

        assert_eq!(count(&reg), before - 1);
        assert!(
            reg.find_source_by_id(&ctx(), doomed.id)
                .expect_err("deleted")
                .is_not_found()
        );
        assert!(reg.find_source_by_id(&ctx(), keep.id).is_ok());
    }

    /// R2.4: Deleting twice fails the second time.
    #[test]
    fn delete_twice_not_found() {
        let reg = empty_registry();
        let mut src = Source::new("once", SourceType::V2);
        reg.create_source(&ctx(), &mut src).expect("create");
        reg.delete_source(&ctx(), src.id).expect("first delete");
        assert!(reg.delete_source(&ctx(), src.id).is_err());
    }
}

// =============================================================================
// TIER R3: DEFAULT LOOKUP
// =============================================================================

mod r3_default_lookup {
    use super::*;

    /// R3.1: The single flagged record is found among many.
    #[test]
    fn finds_single_default_among_many() {
        for n in [0usize, 1, 10, 250] {
            let reg = empty_registry();
            for i in 0..n {
                let mut src = Source::new(format!("plain-{i}"), SourceType::V2);
                reg.create_source(&ctx(), &mut src).expect("create");
            }
            let mut flagged = Source::new("flagged", SourceType::V1).with_default(true);
            reg.create_source(&ctx(), &mut flagged).expect("create");

            assert_eq!(reg.default_source(&ctx()).expect("default"), flagged);
        }
    }

    /// R3.2: No flagged record is NotFound with the documented message.
    #[test]
    fn no_default_not_found() {
        let reg = empty_registry();
        let mut src = Source::new("plain", SourceType::V2);
        reg.create_source(&ctx(), &mut src).expect("create");

        let err = reg.default_source(&ctx()).expect_err("none");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.to_string(), "no default source found");
    }

    /// R3.3: Clearing the flag through an update hides the default.
    #[test]
    fn unflagging_default_hides_it() {
        let reg = SourceRegistry::bootstrap(SequentialGenerator::new()).expect("bootstrap");
        let id = reg.canonical_default().id;
        let update = SourceUpdate {
            default: Some(false),
            ..SourceUpdate::default()
        };
        reg.update_source(&ctx(), id, update).expect("update");
        assert!(reg.default_source(&ctx()).expect_err("none").is_not_found());
    }
}

// =============================================================================
// TIER R4: CONCURRENCY
// =============================================================================

mod r4_concurrency {
    use super::*;

    /// R4.1: Concurrent creates never collide.
    #[test]
    fn concurrent_creates_are_distinct() {
        let reg = Arc::new(SourceRegistry::new(SnowflakeGenerator::new(1)).expect("registry"));
        let ids: Vec<Id> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let reg = Arc::clone(&reg);
                    scope.spawn(move || {
                        (0..100)
                            .map(|i| {
                                let mut src = Source::new(format!("t{t}-{i}"), SourceType::V2);
                                reg.create_source(&ctx(), &mut src).expect("create");
                                src.id
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("join"))
                .collect()
        });

        let unique: BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 800);
        assert_eq!(count(&reg), 800);
    }

    /// R4.2: Racing deletes of one record succeed exactly once.
    #[test]
    fn racing_deletes_succeed_once() {
        let reg = empty_registry();
        let mut src = Source::new("contended", SourceType::V2);
        reg.create_source(&ctx(), &mut src).expect("create");

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| usize::from(reg.delete_source(&ctx(), src.id).is_ok())))
                .collect();
            handles.into_iter().map(|h| h.join().expect("join")).sum()
        });

        assert_eq!(successes, 1);
        assert!(reg.is_empty());
    }

    /// R4.3: Updates racing a delete never resurrect the record.
    #[test]
    fn update_never_resurrects_deleted_record() {
        let reg = empty_registry();

        for round in 0..200 {
            let mut src = Source::new(format!("victim-{round}"), SourceType::V2);
            reg.create_source(&ctx(), &mut src).expect("create");
            let id = src.id;

            std::thread::scope(|scope| {
                scope.spawn(|| {
                    for i in 0..20 {
                        let _ = reg.update_source(&ctx(), id, SourceUpdate::rename(format!("n{i}")));
                    }
                });
                scope.spawn(|| {
                    let _ = reg.delete_source(&ctx(), id);
                });
            });

            assert!(reg.find_source_by_id(&ctx(), id).is_err(), "round {round}");
        }
        assert_eq!(count(&reg), 0);
    }
}
