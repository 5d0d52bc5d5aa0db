//! # ecoledger-ledger
//!
//! Reference chain-store implementation for EcoLedger.
//!
//! Provides [`memory::InMemoryChainStore`], which implements the
//! [`ecoledger_core::traits::ChainStore`] port: per-owner partitions,
//! append-only with a duplicate-id guard, ordered reads by `occurred_at`.

pub mod memory;

pub use memory::InMemoryChainStore;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::DateTime;
    use uuid::Uuid;

    use ecoledger_contracts::{LedgerEntry, LedgerError, Pagination};
    use ecoledger_core::traits::ChainStore;
    use ecoledger_core::{ActivityDraft, ChainBuilder};

    use super::InMemoryChainStore;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn entry(owner: &str, kind: &str, occurred_at: &str) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            kind: kind.to_string(),
            quantity: 1.0,
            unit: "kg".to_string(),
            occurred_at: DateTime::parse_from_rfc3339(occurred_at).unwrap(),
            previous_digest: LedgerEntry::GENESIS_DIGEST.to_string(),
            current_digest: "ab".repeat(32),
            annotation: None,
            supplementary_data: None,
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn append_rejects_duplicate_id() {
        let store = InMemoryChainStore::new();
        let e = entry("u1", "car", "2025-01-01T00:00:00+00:00");

        store.append(e.clone()).unwrap();
        let err = store.append(e).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEntry { .. }));

        // The failed append must not have left a second copy behind.
        assert_eq!(store.len("u1").unwrap(), 1);
    }

    #[test]
    fn tail_is_most_recently_appended_per_owner() {
        let store = InMemoryChainStore::new();
        store.append(entry("u1", "car", "2025-01-01T00:00:00+00:00")).unwrap();
        let last = entry("u1", "bus", "2025-01-02T00:00:00+00:00");
        store.append(last.clone()).unwrap();
        store.append(entry("u2", "train", "2025-01-03T00:00:00+00:00")).unwrap();

        assert_eq!(store.tail("u1").unwrap().unwrap().id, last.id);
        assert_eq!(store.tail("u2").unwrap().unwrap().kind, "train");
        assert!(store.tail("u3").unwrap().is_none());
    }

    #[test]
    fn list_orders_by_occurred_at_ascending() {
        let store = InMemoryChainStore::new();
        // Appended out of occurred_at order on purpose.
        store.append(entry("u1", "second", "2025-01-02T00:00:00+00:00")).unwrap();
        store.append(entry("u1", "first", "2025-01-01T00:00:00+00:00")).unwrap();
        store.append(entry("u1", "third", "2025-01-03T00:00:00+00:00")).unwrap();

        let kinds: Vec<String> = store
            .list("u1", Pagination::first(10))
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, ["first", "second", "third"]);
    }

    #[test]
    fn list_breaks_occurred_at_ties_by_insertion_order() {
        let store = InMemoryChainStore::new();
        let same_instant = "2025-01-01T00:00:00+00:00";
        let a = entry("u1", "a", same_instant);
        let b = entry("u1", "b", same_instant);
        store.append(a.clone()).unwrap();
        store.append(b.clone()).unwrap();

        let listed = store.list("u1", Pagination::first(10)).unwrap();
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[1].id, b.id);
    }

    #[test]
    fn list_paginates_with_offset_and_limit() {
        let store = InMemoryChainStore::new();
        for day in 1..=5 {
            store
                .append(entry("u1", &format!("k{}", day), &format!("2025-01-0{}T00:00:00+00:00", day)))
                .unwrap();
        }

        let page = store.list("u1", Pagination { offset: 2, limit: 2 }).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].kind, "k3");
        assert_eq!(page[1].kind, "k4");

        let past_end = store.list("u1", Pagination { offset: 10, limit: 2 }).unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn builder_and_store_compose_into_a_linked_chain() {
        let store = Arc::new(InMemoryChainStore::new());
        let builder = ChainBuilder::new(store.clone());

        let first = builder.append(ActivityDraft::new("u1", "car", 5.0, "kg")).unwrap();
        let second = builder.append(ActivityDraft::new("u1", "bus", 2.5, "kg")).unwrap();

        assert_eq!(first.previous_digest, LedgerEntry::GENESIS_DIGEST);
        assert_eq!(second.previous_digest, first.current_digest);
        assert_eq!(store.len("u1").unwrap(), 2);
    }
}
