//! Order planning and ingredient directory tests
//!
//! Tests for par-based ordering including:
//! - Par from weekly usage and manual overrides
//! - Vendor filtering and grouping
//! - Usage/par administration and its validation

use std::str::FromStr;
use std::sync::Arc;

use pantry_ledger_backend::error::AppError;
use pantry_ledger_backend::services::{IngredientService, PlanningService};
use pantry_ledger_backend::store::{LedgerStore, MemoryLedgerStore};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::{
    Direction, NewIngredient, NewMovement, PlanningPolicy, UsageAndParUpdate, VendorFilter,
    MAX_QUANTITY,
};
use uuid::Uuid;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn receive(store: &MemoryLedgerStore, ingredient_id: Uuid, qty: Decimal) {
    store
        .append_movement(NewMovement::new(ingredient_id, Direction::In, qty, "in"))
        .await
        .unwrap();
}

/// Two vendors plus one unassigned ingredient
async fn kitchen() -> Arc<MemoryLedgerStore> {
    let store = Arc::new(MemoryLedgerStore::new());

    let flour = store
        .create_ingredient(
            NewIngredient::named("Flour", "lb")
                .with_vendor("Acme")
                .with_weekly_usage(dec!(35))
                .with_cost_per_unit(dec!(2)),
        )
        .await
        .unwrap();
    receive(&store, flour.id, dec!(47)).await;

    let butter = store
        .create_ingredient(
            NewIngredient::named("Butter", "lb")
                .with_vendor("Acme")
                .with_weekly_usage(dec!(7))
                .with_cost_per_unit(dec!(4.5)),
        )
        .await
        .unwrap();
    receive(&store, butter.id, dec!(20)).await;

    store
        .create_ingredient(
            NewIngredient::named("Basil", "bunch")
                .with_vendor("Green Farm")
                .with_weekly_usage(dec!(14))
                .with_cost_per_unit(dec!(1.25)),
        )
        .await
        .unwrap();

    store
        .create_ingredient(NewIngredient::named("Salt", "lb").with_weekly_usage(dec!(7)))
        .await
        .unwrap();

    store
}

fn planner(store: &Arc<MemoryLedgerStore>) -> PlanningService {
    PlanningService::new(store.clone(), PlanningPolicy::default())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_plan_lines_grouped_by_vendor() {
        let store = kitchen().await;
        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();

        let names: Vec<&str> = plan.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Butter", "Flour", "Basil", "Salt"]);

        let vendors: Vec<Option<&str>> = plan
            .vendor_totals
            .iter()
            .map(|t| t.vendor.as_deref())
            .collect();
        assert_eq!(vendors, vec![Some("Acme"), Some("Green Farm"), None]);
    }

    #[tokio::test]
    async fn test_plan_quantities_and_costs() {
        let store = kitchen().await;
        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();

        let flour = plan.lines.iter().find(|l| l.name == "Flour").unwrap();
        assert_eq!(flour.par_level, d("55"));
        assert_eq!(flour.to_order, d("8"));
        assert_eq!(flour.line_cost, d("16"));

        // Butter: par 11, 20 on hand, nothing to order
        let butter = plan.lines.iter().find(|l| l.name == "Butter").unwrap();
        assert_eq!(butter.par_level, d("11"));
        assert_eq!(butter.to_order, Decimal::ZERO);
        assert_eq!(butter.line_cost, Decimal::ZERO);

        // Basil: par 22 from an empty shelf at 1.25
        let basil = plan.lines.iter().find(|l| l.name == "Basil").unwrap();
        assert_eq!(basil.to_order, d("22"));
        assert_eq!(basil.line_cost, d("27.5"));

        // Salt has no cost and contributes nothing
        let salt = plan.lines.iter().find(|l| l.name == "Salt").unwrap();
        assert_eq!(salt.to_order, d("11"));
        assert_eq!(salt.line_cost, Decimal::ZERO);

        assert_eq!(plan.total_cost, d("43.5"));
        let acme = &plan.vendor_totals[0];
        assert_eq!(acme.line_count, 2);
        assert_eq!(acme.estimated_cost, d("16"));
    }

    #[tokio::test]
    async fn test_plan_vendor_filter() {
        let store = kitchen().await;
        let plan = planner(&store)
            .plan(&VendorFilter::Vendor("Green Farm".to_string()))
            .await
            .unwrap();

        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].name, "Basil");
        assert_eq!(plan.total_cost, d("27.5"));

        let none = planner(&store)
            .plan(&VendorFilter::Vendor("acme".to_string()))
            .await
            .unwrap();
        assert!(none.lines.is_empty());
        assert_eq!(none.total_cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_plan_uses_configured_multiplier() {
        let store = kitchen().await;
        let plan = PlanningService::new(store.clone(), PlanningPolicy::new(dec!(14)))
            .plan(&VendorFilter::parse(Some("Acme")))
            .await
            .unwrap();

        let flour = plan.lines.iter().find(|l| l.name == "Flour").unwrap();
        assert_eq!(flour.par_level, d("70"));
        assert_eq!(flour.to_order, d("23"));
    }

    #[tokio::test]
    async fn test_plan_reflects_ledger_after_usage() {
        let store = kitchen().await;
        let flour = store
            .list_ingredients()
            .await
            .unwrap()
            .into_iter()
            .find(|i| i.name == "Flour")
            .unwrap();
        store
            .append_movement(NewMovement::new(flour.id, Direction::Out, dec!(10), "production"))
            .await
            .unwrap();

        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();
        let line = plan.lines.iter().find(|l| l.name == "Flour").unwrap();
        assert_eq!(line.on_hand, d("37"));
        assert_eq!(line.to_order, d("18"));
    }

    #[tokio::test]
    async fn test_par_override_wins() {
        let store = kitchen().await;
        let service = IngredientService::new(store.clone());
        let flour = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|i| i.name == "Flour")
            .unwrap();

        let updated = service
            .set_usage_and_par(
                flour.id,
                UsageAndParUpdate {
                    weekly_usage: dec!(35),
                    par_override: Some(dec!(50)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.par_override, Some(dec!(50)));

        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();
        let line = plan.lines.iter().find(|l| l.name == "Flour").unwrap();
        assert_eq!(line.par_level, d("50"));
        assert_eq!(line.to_order, d("3"));
    }

    #[tokio::test]
    async fn test_zero_override_falls_back_to_formula() {
        let store = kitchen().await;
        let service = IngredientService::new(store.clone());
        let salt = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|i| i.name == "Salt")
            .unwrap();

        service
            .set_usage_and_par(
                salt.id,
                UsageAndParUpdate {
                    weekly_usage: dec!(14),
                    par_override: Some(Decimal::ZERO),
                },
            )
            .await
            .unwrap();

        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();
        let line = plan.lines.iter().find(|l| l.name == "Salt").unwrap();
        assert_eq!(line.par_level, d("22"));
    }

    #[tokio::test]
    async fn test_negative_weekly_usage_rejected() {
        let store = kitchen().await;
        let service = IngredientService::new(store.clone());
        let salt = service.list().await.unwrap().remove(0);

        let err = service
            .set_usage_and_par(
                salt.id,
                UsageAndParUpdate {
                    weekly_usage: dec!(-1),
                    par_override: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "weekly_usage"));
    }

    #[tokio::test]
    async fn test_weekly_usage_over_ledger_maximum_rejected() {
        let huge = d("70000000000000000000000000000");
        let store = kitchen().await;
        let service = IngredientService::new(store.clone());
        let salt = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|i| i.name == "Salt")
            .unwrap();

        let err = service
            .set_usage_and_par(
                salt.id,
                UsageAndParUpdate {
                    weekly_usage: huge,
                    par_override: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "weekly_usage"));

        // The store enforces the same limit for direct callers
        let err = store
            .set_usage_and_par(salt.id, huge, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = store
            .create_ingredient(NewIngredient::named("Pepper", "lb").with_weekly_usage(huge))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        // Planning still works with the largest accepted usage
        store
            .set_usage_and_par(salt.id, MAX_QUANTITY, None)
            .await
            .unwrap();
        let plan = planner(&store).plan(&VendorFilter::All).await.unwrap();
        let line = plan.lines.iter().find(|l| l.name == "Salt").unwrap();
        assert!(line.to_order > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_usage_update_unknown_ingredient() {
        let service = IngredientService::new(Arc::new(MemoryLedgerStore::new()));
        let err = service
            .set_usage_and_par(
                Uuid::new_v4(),
                UsageAndParUpdate {
                    weekly_usage: dec!(7),
                    par_override: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_vendors_distinct_and_sorted() {
        let store = kitchen().await;
        store
            .create_ingredient(NewIngredient::named("Sugar", "lb").with_vendor("  "))
            .await
            .unwrap();

        let vendors = IngredientService::new(store).vendors().await.unwrap();
        assert_eq!(vendors, vec!["Acme".to_string(), "Green Farm".to_string()]);
    }

    #[tokio::test]
    async fn test_areas_distinct_and_sorted() {
        let store = Arc::new(MemoryLedgerStore::new());
        for (name, area) in [
            ("Flour", "Dry Storage"),
            ("Butter", "Walk-in"),
            ("Sugar", "Dry Storage"),
            ("Salt", "  "),
        ] {
            store
                .create_ingredient(NewIngredient::named(name, "lb").with_area(area))
                .await
                .unwrap();
        }
        store
            .create_ingredient(NewIngredient::named("Basil", "bunch"))
            .await
            .unwrap();

        let areas = IngredientService::new(store).areas().await.unwrap();
        assert_eq!(areas, vec!["Dry Storage".to_string(), "Walk-in".to_string()]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let service = IngredientService::new(Arc::new(MemoryLedgerStore::new()));
        let err = service
            .create(NewIngredient::named("   ", "lb"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// Filtered plans partition the full plan's lines
        #[test]
        fn prop_vendor_filter_partitions_plan(
            weekly in prop::collection::vec(0u32..200u32, 1..8)
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let (all, acme, farm) = runtime.block_on(async {
                let store = Arc::new(MemoryLedgerStore::new());
                for (i, w) in weekly.iter().enumerate() {
                    let vendor = if i % 2 == 0 { "Acme" } else { "Green Farm" };
                    store
                        .create_ingredient(
                            NewIngredient::named(format!("Item {i}"), "ea")
                                .with_vendor(vendor)
                                .with_weekly_usage(Decimal::from(*w))
                                .with_cost_per_unit(dec!(1.5)),
                        )
                        .await
                        .unwrap();
                }
                let service = planner(&store);
                (
                    service.plan(&VendorFilter::All).await.unwrap(),
                    service.plan(&VendorFilter::parse(Some("Acme"))).await.unwrap(),
                    service.plan(&VendorFilter::parse(Some("Green Farm"))).await.unwrap(),
                )
            });

            prop_assert_eq!(all.lines.len(), acme.lines.len() + farm.lines.len());
            prop_assert_eq!(all.total_cost, acme.total_cost + farm.total_cost);
            prop_assert!(all.lines.iter().all(|l| l.to_order >= Decimal::ZERO));
        }
    }
}
