//! Tests for the single-writer ledger store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use vaultfolio_rates::{Asset, Rate, RateSource};

    use crate::store::{JsonFileRepository, LedgerStore, MemoryRepository};
    use crate::transactions::{NewTransaction, Transaction, TransactionType};
    use crate::vaults::{NewVaultEntry, VaultEntryType, VaultStatus};

    fn store() -> LedgerStore {
        LedgerStore::open(Arc::new(MemoryRepository::new())).unwrap()
    }

    fn usd_transaction(amount: f64) -> Transaction {
        let rate = Rate::new(Asset::fiat("USD"), 1.0, Utc::now(), RateSource::Fixed);
        NewTransaction::new(TransactionType::Income, Asset::fiat("USD"), amount)
            .into_transaction("Main".to_string(), rate)
    }

    fn deposit_entry(vault: &str, usd: f64) -> crate::vaults::VaultEntry {
        NewVaultEntry {
            vault: vault.to_string(),
            entry_type: VaultEntryType::Deposit,
            asset: Asset::fiat("USD"),
            amount: usd,
            usd_value: usd,
            at: None,
            account: None,
            note: None,
        }
        .into_entry()
    }

    #[test]
    fn test_append_and_get_transaction() {
        let store = store();
        let tx = store.append_transaction(usd_transaction(100.0)).unwrap();

        let fetched = store.get_transaction(&tx.id).unwrap();
        assert_eq!(fetched, Some(tx));
        assert_eq!(store.get_transaction("missing").unwrap(), None);
    }

    #[test]
    fn test_delete_transaction() {
        let store = store();
        let tx = store.append_transaction(usd_transaction(100.0)).unwrap();

        assert!(store.delete_transaction(&tx.id).unwrap());
        assert!(!store.delete_transaction(&tx.id).unwrap());
        assert!(store.all_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_vault_is_idempotent() {
        let store = store();
        assert!(store.ensure_vault("Main").unwrap());
        assert!(!store.ensure_vault("Main").unwrap());
        assert_eq!(store.list_vaults().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_ensure_vault_creates_exactly_one() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..50 {
            let store = Arc::new(LedgerStore::open(Arc::new(MemoryRepository::new())).unwrap());
            let barrier = Arc::new(Barrier::new(4));

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        store.ensure_vault("Main").unwrap()
                    })
                })
                .collect();

            let created = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|created| *created)
                .count();

            assert_eq!(created, 1);
            assert_eq!(store.list_vaults().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_end_vault_keeps_history() {
        let store = store();
        store.ensure_vault("Main").unwrap();
        store.append_vault_entry(deposit_entry("Main", 50.0)).unwrap();

        assert!(store.end_vault("Main").unwrap());
        let vault = store.get_vault("Main").unwrap().unwrap();
        assert_eq!(vault.status, VaultStatus::Closed);
        assert_eq!(store.vault_entries("Main").unwrap().len(), 1);

        assert!(!store.end_vault("Nope").unwrap());
    }

    #[test]
    fn test_delete_vault_cascades_entries() {
        let store = store();
        store.ensure_vault("X").unwrap();
        store.append_vault_entry(deposit_entry("X", 10.0)).unwrap();
        store.append_vault_entry(deposit_entry("Other", 10.0)).unwrap();

        assert!(store.delete_vault("X").unwrap());
        assert_eq!(store.get_vault("X").unwrap(), None);
        assert!(store.vault_entries("X").unwrap().is_empty());
        // Other vaults' entries survive.
        assert_eq!(store.vault_entries("Other").unwrap().len(), 1);
    }

    #[test]
    fn test_vault_entries_sorted_by_timestamp() {
        let store = store();
        let mut late = deposit_entry("Main", 1.0);
        late.at = Utc::now();
        let mut early = deposit_entry("Main", 2.0);
        early.at = late.at - chrono::Duration::hours(1);

        store.append_vault_entry(late.clone()).unwrap();
        store.append_vault_entry(early.clone()).unwrap();

        let entries = store.vault_entries("Main").unwrap();
        assert_eq!(entries[0].id, early.id);
        assert_eq!(entries[1].id, late.id);
    }

    #[test]
    fn test_settings_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        {
            let store =
                LedgerStore::open(Arc::new(JsonFileRepository::new(&path))).unwrap();
            store
                .update_settings(|s| s.borrowing_monthly_rate = 0.03)
                .unwrap();
        }
        let reopened = LedgerStore::open(Arc::new(JsonFileRepository::new(&path))).unwrap();
        assert_eq!(reopened.settings().unwrap().borrowing_monthly_rate, 0.03);
    }

    #[test]
    fn test_mutations_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        {
            let store =
                LedgerStore::open(Arc::new(JsonFileRepository::new(&path))).unwrap();
            store.append_transaction(usd_transaction(42.0)).unwrap();
            store.ensure_vault("Main").unwrap();
        }
        let reopened = LedgerStore::open(Arc::new(JsonFileRepository::new(&path))).unwrap();
        assert_eq!(reopened.all_transactions().unwrap().len(), 1);
        assert!(reopened.get_vault("Main").unwrap().is_some());
    }
}
