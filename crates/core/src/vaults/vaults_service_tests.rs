//! Tests for vault accounting: conservation, the valuation-checkpoint
//! law and mark-to-market pricing.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use vaultfolio_rates::{Asset, StaticRateResolver};

    use crate::store::{LedgerStore, MemoryRepository};
    use crate::vaults::{NewVaultEntry, VaultEntryType, VaultService, VaultServiceTrait};

    fn service_with_rates(pairs: &[(&str, f64)]) -> VaultService {
        let store = Arc::new(LedgerStore::open(Arc::new(MemoryRepository::new())).unwrap());
        VaultService::new(store, Arc::new(StaticRateResolver::from_pairs(pairs)))
    }

    fn entry(
        vault: &str,
        entry_type: VaultEntryType,
        asset: Asset,
        amount: f64,
        usd_value: f64,
        offset_minutes: i64,
    ) -> NewVaultEntry {
        NewVaultEntry {
            vault: vault.to_string(),
            entry_type,
            asset,
            amount,
            usd_value,
            at: Some(Utc::now() - Duration::hours(1) + Duration::minutes(offset_minutes)),
            account: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_empty_vault_has_zero_stats() {
        let service = service_with_rates(&[]);
        let stats = service.vault_stats("Nope").await.unwrap();
        assert_eq!(stats.total_deposited_usd, 0.0);
        assert_eq!(stats.total_withdrawn_usd, 0.0);
        assert_eq!(stats.aum_usd, 0.0);
    }

    #[tokio::test]
    async fn test_usd_deposit_into_empty_vault() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                1000.0,
                1000.0,
                0,
            ))
            .unwrap();

        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.total_deposited_usd - 1000.0).abs() < 1e-9);
        assert_eq!(stats.total_withdrawn_usd, 0.0);
        assert!((stats.aum_usd - 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fiat_conservation_without_valuation() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                1000.0,
                1000.0,
                0,
            ))
            .unwrap();
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Withdraw,
                Asset::fiat("USD"),
                300.0,
                300.0,
                1,
            ))
            .unwrap();

        let stats = service.vault_stats("Main").await.unwrap();
        assert!(
            (stats.aum_usd - (stats.total_deposited_usd - stats.total_withdrawn_usd)).abs()
                < 1e-9
        );
    }

    #[tokio::test]
    async fn test_mark_to_market_uses_current_rate_not_deposit_value() {
        // 0.01 BTC deposited at 50000 (usdValue 500); current rate 60000.
        let service = service_with_rates(&[("CRYPTO:BTC", 60000.0)]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::crypto("BTC"),
                0.01,
                500.0,
                0,
            ))
            .unwrap();

        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd - 600.0).abs() < 1e-9);
        assert!((stats.total_deposited_usd - 500.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_valuation_checkpoint_law() {
        let service = service_with_rates(&[("CRYPTO:BTC", 60000.0)]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::crypto("BTC"),
                0.01,
                500.0,
                0,
            ))
            .unwrap();
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Valuation,
                Asset::fiat("USD"),
                0.0,
                700.0,
                1,
            ))
            .unwrap();

        // After a VALUATION of V, aum == V.
        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd - 700.0).abs() < 1e-9);

        // After a subsequent deposit of usdValue D, aum == V + D.
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                100.0,
                100.0,
                2,
            ))
            .unwrap();
        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd - 800.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_second_valuation_resets_net_flow() {
        let service = service_with_rates(&[]);
        for (entry_type, amount, usd, offset) in [
            (VaultEntryType::Valuation, 0.0, 700.0, 0),
            (VaultEntryType::Deposit, 100.0, 100.0, 1),
            (VaultEntryType::Valuation, 0.0, 950.0, 2),
            (VaultEntryType::Withdraw, 50.0, 50.0, 3),
        ] {
            service
                .add_vault_entry(entry(
                    "Main",
                    entry_type,
                    Asset::fiat("USD"),
                    amount,
                    usd,
                    offset,
                ))
                .unwrap();
        }

        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd - 900.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_over_withdrawal_goes_negative_not_clamped() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                100.0,
                100.0,
                0,
            ))
            .unwrap();
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Withdraw,
                Asset::fiat("USD"),
                250.0,
                250.0,
                1,
            ))
            .unwrap();

        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd + 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_negative_valuation_checkpoints_an_underwater_vault() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Withdraw,
                Asset::fiat("USD"),
                200.0,
                200.0,
                0,
            ))
            .unwrap();
        service
            .add_vault_entry(entry(
                "Main",
                VaultEntryType::Valuation,
                Asset::fiat("USD"),
                0.0,
                -150.0,
                1,
            ))
            .unwrap();

        let stats = service.vault_stats("Main").await.unwrap();
        assert!((stats.aum_usd + 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_delete_vault_removes_vault_and_entries() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "X",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                10.0,
                10.0,
                0,
            ))
            .unwrap();

        assert!(service.delete_vault("X").unwrap());
        assert!(service.get_vault_entries("X").unwrap().is_empty());
        assert!(service.get_vault("X").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_entry_creates_vault_lazily() {
        let service = service_with_rates(&[]);
        service
            .add_vault_entry(entry(
                "Lazy",
                VaultEntryType::Deposit,
                Asset::fiat("USD"),
                1.0,
                1.0,
                0,
            ))
            .unwrap();
        assert!(service.get_vault("Lazy").unwrap().is_some());
    }
}
