//! Reporting engine tests
//!
//! Tests for the derived-metrics engine including:
//! - Property 1: Inventory Value Consistency
//! - Property 2: Low Stock Count Accuracy
//! - Property 3: Report Idempotence
//! - Property 4: Category Shares Sum to 100%
//! - Property 5: Reorder Quantities Never Negative

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{InventorySnapshot, Material, StockDirection, Supplier, Transaction};
use shared::reports::{Report, ReportEngine, ReportKind, ReportOptions, ReorderUrgency};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn material(id: &str, category: &str, stock: &str, min: &str, max: &str, price: &str) -> Material {
    Material {
        id: id.to_string(),
        name: format!("Material {}", id),
        category: category.to_string(),
        unit: "MT".to_string(),
        current_stock: dec(stock),
        min_stock_level: dec(min),
        max_stock_level: dec(max),
        unit_price: dec(price),
        supplier_id: None,
        supplier_name: None,
        location: "Yard".to_string(),
        last_updated: None,
    }
}

fn txn(id: &str, material_id: &str, direction: StockDirection, quantity: &str, at: &str) -> Transaction {
    let created_at = NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive));
    Transaction {
        id: id.to_string(),
        material_id: material_id.to_string(),
        material_name: None,
        direction,
        quantity: dec(quantity),
        reference_number: format!("REF-{}", id),
        supplier_id: None,
        supplier_name: None,
        notes: None,
        created_at_raw: at.to_string(),
        created_at,
        created_by: "operator".to_string(),
    }
}

fn supplier(id: &str, name: &str, rating: &str) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: name.to_string(),
        contact_person: "Contact".to_string(),
        email: "contact@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: String::new(),
        materials: Vec::new(),
        rating: dec(rating),
        is_active: true,
    }
}

fn engine(snapshot: &InventorySnapshot) -> ReportEngine<'_> {
    ReportEngine::new(snapshot, ReportOptions::new(today()))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Worked example: one material, one stock-out of 3
    #[test]
    fn test_value_analysis_example() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "100", "5")],
            vec![txn("t1", "1", StockDirection::Out, "3", "2024-03-09 10:00")],
            Vec::new(),
        );
        let engine = engine(&snapshot);

        let rows = engine.value_analysis();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].consumed, dec("3"));
        assert_eq!(rows[0].consumed_value, dec("15"));
        assert_eq!(rows[0].stock_value, dec("50"));
        assert_eq!(rows[0].value_utilization, dec("10"));

        let consumption = engine.material_consumption();
        assert_eq!(consumption[0].consumed, dec("3"));
        assert_eq!(consumption[0].consumed_value, dec("15"));
    }

    /// Utilization is stock value over value at maximum level
    #[test]
    fn test_value_utilization_half() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "50", "20", "100", "5")],
            Vec::new(),
            Vec::new(),
        );
        let rows = engine(&snapshot).value_analysis();
        assert_eq!(rows[0].value_utilization, dec("50"));
        assert_eq!(rows[0].band.to_string(), "Medium");
    }

    /// Empty inputs produce zeros everywhere
    #[test]
    fn test_empty_snapshot() {
        let snapshot = InventorySnapshot::default();
        let engine = engine(&snapshot);

        let summary = engine.summary();
        assert_eq!(summary.total_inventory_value, Decimal::ZERO);
        assert_eq!(summary.low_stock_items, 0);
        assert_eq!(summary.window.stock_in, Decimal::ZERO);
        assert!(summary.categories.is_empty());

        let costs = engine.cost_analysis();
        assert_eq!(costs.stock_value_percent_of_procurement, Decimal::ZERO);

        for kind in ReportKind::ALL {
            let report = engine.generate(kind);
            assert_eq!(report.kind(), kind);
        }
    }

    /// Zero-priced and zero-capacity materials never divide by zero
    #[test]
    fn test_zero_denominators() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Water", "0", "0", "0", "0")],
            Vec::new(),
            Vec::new(),
        );
        let engine = engine(&snapshot);

        assert_eq!(engine.value_analysis()[0].value_utilization, Decimal::ZERO);
        assert_eq!(engine.category_rollup()[0].percent_of_total, Decimal::ZERO);
        assert_eq!(engine.inventory_status()[0].stock_percentage, Decimal::ZERO);
        assert_eq!(engine.consumption_trends()[0].percent_of_consumed_value, Decimal::ZERO);
        let reorder = engine.low_stock_report();
        assert_eq!(reorder.rows[0].urgency, ReorderUrgency::Critical);
    }

    /// A supplier with no materials still gets a score
    #[test]
    fn test_supplier_without_materials() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "40", "5")],
            Vec::new(),
            vec![supplier("S1", "Idle Traders", "3.5")],
        );
        let rows = engine(&snapshot).supplier_comparison();
        assert_eq!(rows[0].material_count, 0);
        assert_eq!(rows[0].avg_price, Decimal::ZERO);
        assert_eq!(rows[0].performance_score, dec("70"));
        assert_eq!(rows[0].tier.to_string(), "Good");
    }

    /// Materials link to suppliers by id, or by name when no id is carried
    #[test]
    fn test_supplier_matching() {
        let mut by_id = material("1", "Sand", "100", "50", "200", "800");
        by_id.supplier_id = Some("S1".to_string());
        by_id.supplier_name = Some("Someone Else".to_string());
        let mut by_name = material("2", "Sand", "50", "50", "100", "600");
        by_name.supplier_name = Some("Sand Suppliers Ltd".to_string());

        let snapshot = InventorySnapshot::new(
            vec![by_id, by_name],
            vec![
                txn("t1", "1", StockDirection::In, "40", "2024-03-01 09:00"),
                txn("t2", "2", StockDirection::In, "10", "2024-03-02 09:00"),
                txn("t3", "2", StockDirection::Out, "5", "2024-03-03 09:00"),
            ],
            vec![supplier("S1", "Sand Suppliers Ltd", "4.5")],
        );
        let rows = engine(&snapshot).supplier_transactions();
        assert_eq!(rows[0].material_count, 2);
        assert_eq!(rows[0].stock_in, dec("50"));
        assert_eq!(rows[0].transaction_count, 3);
        assert_eq!(rows[0].total_value, dec("110000"));

        let comparison = engine(&snapshot).supplier_comparison();
        assert_eq!(comparison[0].avg_price, dec("700"));
        assert_eq!(comparison[0].performance_score, dec("90"));
    }

    /// Reorder urgency thresholds
    #[test]
    fn test_reorder_urgency() {
        let snapshot = InventorySnapshot::new(
            vec![
                material("ok", "Cement", "100", "50", "100", "10"),
                material("empty", "Cement", "0", "50", "100", "10"),
                material("urgent", "Cement", "20", "50", "100", "10"),
                material("near", "Cement", "55", "50", "100", "10"),
            ],
            Vec::new(),
            Vec::new(),
        );
        let report = engine(&snapshot).low_stock_report();

        let ids: Vec<&str> = report.rows.iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(ids, vec!["empty", "urgent", "near"]);
        assert_eq!(report.rows[0].urgency, ReorderUrgency::Critical);
        assert_eq!(report.rows[1].urgency, ReorderUrgency::Urgent);
        assert_eq!(report.rows[2].urgency, ReorderUrgency::Low);
        assert_eq!(report.rows[1].reorder_qty, dec("80"));
        assert_eq!(report.rows[1].reorder_cost, dec("800"));
        assert_eq!(report.total_reorder_cost, dec("1000") + dec("800") + dec("450"));
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.urgent_count, 1);
    }

    /// Stock above the maximum but within the listing window is flagged, not negative
    #[test]
    fn test_reorder_overstocked_is_clamped() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "58", "50", "55", "10")],
            Vec::new(),
            Vec::new(),
        );
        let report = engine(&snapshot).low_stock_report();
        assert_eq!(report.rows[0].reorder_qty, Decimal::ZERO);
        assert_eq!(report.rows[0].reorder_cost, Decimal::ZERO);
        assert!(report.rows[0].overstocked);
    }

    /// Window totals only count parseable timestamps inside the window
    #[test]
    fn test_window_totals() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "40", "5")],
            vec![
                txn("t1", "1", StockDirection::In, "10", "2024-03-10 23:00"),
                txn("t2", "1", StockDirection::In, "5", "2024-03-03 00:00"),
                txn("t3", "1", StockDirection::In, "7", "2024-03-02 23:59"),
                txn("t4", "1", StockDirection::Out, "4", "2024-03-05 12:00"),
                txn("t5", "1", StockDirection::Out, "100", "garbage"),
            ],
            Vec::new(),
        );
        let totals = engine(&snapshot).window_totals();
        assert_eq!(totals.stock_in, dec("15"));
        assert_eq!(totals.stock_in_count, 2);
        assert_eq!(totals.stock_out, dec("4"));
        assert_eq!(totals.stock_out_count, 1);

        let wide = ReportEngine::new(&snapshot, ReportOptions::new(today()).with_window_days(30));
        assert_eq!(wide.window_totals().stock_in, dec("22"));

        // Undated rows still count toward lifetime totals
        assert_eq!(wide.movement("1").stock_out, dec("104"));
    }

    /// Top consumed is ordered by consumption with ties in input order
    #[test]
    fn test_top_consumed_stable() {
        let snapshot = InventorySnapshot::new(
            vec![
                material("a", "Cement", "10", "5", "20", "1"),
                material("b", "Cement", "10", "5", "20", "1"),
                material("c", "Cement", "10", "5", "20", "1"),
            ],
            vec![
                txn("t1", "b", StockDirection::Out, "5", "2024-03-01 10:00"),
                txn("t2", "c", StockDirection::Out, "5", "2024-03-01 10:00"),
                txn("t3", "a", StockDirection::Out, "1", "2024-03-01 10:00"),
            ],
            Vec::new(),
        );
        let top = engine(&snapshot).top_consumed(2);
        let ids: Vec<&str> = top.iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    /// Recent movements are newest first, joined, with placeholders for misses
    #[test]
    fn test_recent_movements() {
        let mut supplied = txn("t2", "1", StockDirection::In, "20", "2024-03-09 08:00");
        supplied.supplier_id = Some("S1".to_string());
        let mut orphan = txn("t3", "missing", StockDirection::Out, "1", "2024-03-08 08:00");
        orphan.reference_number = String::new();

        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "40", "5")],
            vec![
                txn("t1", "1", StockDirection::Out, "2", "bad-date"),
                supplied,
                orphan,
                txn("t4", "1", StockDirection::Out, "3", "2024-03-10 07:00"),
            ],
            vec![supplier("S1", "CemCorp Industries", "4")],
        );
        let rows = engine(&snapshot).recent_movements(3);

        let ids: Vec<&str> = rows.iter().map(|r| r.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t2", "t3"]);
        assert_eq!(rows[1].supplier_name, "CemCorp Industries");
        assert_eq!(rows[1].material_name, "Material 1");
        assert_eq!(rows[2].material_name, "Unknown");
        assert_eq!(rows[2].unit, "-");
        assert_eq!(rows[2].reference, "-");
        assert_eq!(rows[0].supplier_name, "-");

        let all = engine(&snapshot).recent_movements(10);
        assert_eq!(all.last().unwrap().transaction_id, "t1");
    }

    /// Material-wise movement rows
    #[test]
    fn test_material_transactions() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "40", "5")],
            vec![
                txn("t1", "1", StockDirection::In, "30", "2024-03-01 10:00"),
                txn("t2", "1", StockDirection::Out, "12.5", "2024-03-04 10:00"),
                txn("t3", "1", StockDirection::Out, "2.5", "2024-03-02 10:00"),
            ],
            Vec::new(),
        );
        let rows = engine(&snapshot).material_transactions();
        assert_eq!(rows[0].stock_in, dec("30"));
        assert_eq!(rows[0].stock_out, dec("15"));
        assert_eq!(rows[0].net_movement, dec("15"));
        assert_eq!(rows[0].total_transactions, 3);
        assert_eq!(
            rows[0].last_transaction.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    /// Procurement and consumption costs
    #[test]
    fn test_cost_reports() {
        let mut cement = material("1", "Cement", "100", "50", "200", "6500");
        cement.supplier_id = Some("S1".to_string());
        let mut sand = material("2", "Sand", "200", "100", "400", "800");
        sand.supplier_id = Some("S2".to_string());

        let snapshot = InventorySnapshot::new(
            vec![cement, sand],
            vec![
                txn("t1", "1", StockDirection::In, "10", "2024-03-01 10:00"),
                txn("t2", "1", StockDirection::Out, "4", "2024-03-02 10:00"),
                txn("t3", "2", StockDirection::Out, "10", "2024-03-02 10:00"),
            ],
            vec![supplier("S1", "CemCorp", "4.5"), supplier("S2", "Sand Co", "4")],
        );
        let engine = engine(&snapshot);

        let costs = engine.cost_analysis();
        assert_eq!(costs.total_procurement_cost, dec("65000"));
        assert_eq!(costs.total_consumption_cost, dec("26000") + dec("8000"));
        assert_eq!(costs.total_stock_value, dec("650000") + dec("160000"));

        let procurement = engine.procurement_cost();
        assert_eq!(procurement.rows[0].supplier_id, "S1");
        assert_eq!(procurement.rows[0].cost_efficiency, dec("1000"));
        assert_eq!(procurement.rows[1].total_procurement_cost, Decimal::ZERO);
        assert_eq!(procurement.rows[1].cost_efficiency, Decimal::ZERO);

        let consumption = engine.consumption_cost();
        assert_eq!(consumption.categories[0].category, "Cement");
        assert_eq!(consumption.categories[0].consumed_value, dec("26000"));
        assert_eq!(consumption.total_consumption_cost, dec("34000"));
        assert_eq!(consumption.categories[0].materials[0].percent_of_category, dec("100"));
        assert_eq!(consumption.total_materials, 2);
    }

    /// Dashboard overview counts today's movements and respects read state
    #[test]
    fn test_dashboard_overview() {
        use shared::alerts::{AlertReadState, InMemoryReadState};

        let snapshot = InventorySnapshot::new(
            vec![
                material("1", "Cement", "10", "20", "40", "5"),
                material("2", "Sand", "0", "20", "40", "5"),
                material("3", "Water", "30", "20", "40", "5"),
            ],
            vec![
                txn("t1", "1", StockDirection::Out, "1", "2024-03-10 09:00"),
                txn("t2", "1", StockDirection::Out, "1", "2024-03-09 09:00"),
            ],
            Vec::new(),
        );
        let mut state = InMemoryReadState::new();
        state.mark_read("2");

        let overview = engine(&snapshot).dashboard_overview(&state);
        assert_eq!(overview.total_materials, 3);
        assert_eq!(overview.low_stock_count, 2);
        assert_eq!(overview.unread_alerts, 1);
        assert_eq!(overview.movements_today, 1);
        assert_eq!(overview.recent_movements[0].transaction_id, "t1");
    }

    /// Markdown output carries the report title and table header
    #[test]
    fn test_markdown_rendering() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "10", "20", "40", "6500")],
            Vec::new(),
            Vec::new(),
        );
        let engine = engine(&snapshot);

        let summary = shared::reports::render_markdown(&engine.generate(ReportKind::Summary));
        assert!(summary.starts_with("### Summary Overview"));
        assert!(summary.contains("|Material|Category|Quantity|Unit Price|Total Value|Status|"));
        assert!(summary.contains("₹65,000.00"));
        assert!(summary.contains("Low Stock"));

        let recent =
            shared::reports::render_markdown(&engine.generate(ReportKind::RecentMovements));
        assert!(recent.contains("No recent movements."));

        for kind in ReportKind::ALL {
            let text = shared::reports::render_markdown(&engine.generate(kind));
            assert!(text.contains(kind.title()));
        }
    }

    /// Report JSON keeps Decimal precision
    #[test]
    fn test_report_json_shape() {
        let snapshot = InventorySnapshot::new(
            vec![material("1", "Cement", "150.5", "50", "100", "6500")],
            Vec::new(),
            Vec::new(),
        );
        let report = engine(&snapshot).generate(ReportKind::Summary);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["kind"], "summary");
        assert_eq!(value["data"]["total_materials"], 1);

        let back: Report = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    const CATEGORIES: [&str; 5] = ["Cement", "Sand", "Aggregates", "Water", "Admixtures"];

    /// Strategy for generating stock quantities (0.0 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for generating unit prices (0.00 to 10000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1000000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn materials_strategy() -> impl Strategy<Value = Vec<Material>> {
        prop::collection::vec(
            (0usize..CATEGORIES.len(), quantity_strategy(), quantity_strategy(), 0i64..=3, price_strategy()),
            0..12,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (category, stock, min, max_factor, price))| Material {
                    id: format!("M{}", index),
                    name: format!("Material {}", index),
                    category: CATEGORIES[category].to_string(),
                    unit: "MT".to_string(),
                    current_stock: stock,
                    min_stock_level: min,
                    max_stock_level: min * Decimal::from(max_factor),
                    unit_price: price,
                    supplier_id: Some(format!("S{}", index % 3)),
                    supplier_name: None,
                    location: String::new(),
                    last_updated: None,
                })
                .collect()
        })
    }

    fn snapshot_strategy() -> impl Strategy<Value = InventorySnapshot> {
        (
            materials_strategy(),
            prop::collection::vec((0usize..12, any::<bool>(), quantity_strategy(), 0u32..20), 0..30),
            prop::collection::vec(0i64..=50, 0..4),
        )
            .prop_map(|(materials, txns, ratings)| {
                let transactions = txns
                    .into_iter()
                    .enumerate()
                    .map(|(index, (material, is_in, quantity, days_ago))| {
                        let at = today()
                            .checked_sub_days(chrono::Days::new(u64::from(days_ago)))
                            .unwrap()
                            .format("%Y-%m-%d 12:00")
                            .to_string();
                        let direction = if is_in { StockDirection::In } else { StockDirection::Out };
                        txn(&format!("T{}", index), &format!("M{}", material), direction, &quantity.to_string(), &at)
                    })
                    .collect();
                let suppliers = ratings
                    .into_iter()
                    .enumerate()
                    .map(|(index, rating)| {
                        let mut s = supplier(&format!("S{}", index), &format!("Supplier {}", index), "0");
                        s.rating = Decimal::new(rating, 1);
                        s
                    })
                    .collect();
                InventorySnapshot::new(materials, transactions, suppliers)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 1: Total inventory value equals Σ stock × price
        #[test]
        fn prop_total_value_matches_sum(snapshot in snapshot_strategy()) {
            let expected: Decimal = snapshot
                .materials
                .iter()
                .map(|m| m.current_stock * m.unit_price)
                .sum();
            let summary = engine(&snapshot).summary();
            prop_assert_eq!(summary.total_inventory_value, expected);
        }

        /// Property 2: Low stock count equals materials at or below minimum
        #[test]
        fn prop_low_stock_count(snapshot in snapshot_strategy()) {
            let expected = snapshot
                .materials
                .iter()
                .filter(|m| m.current_stock <= m.min_stock_level)
                .count();
            prop_assert_eq!(engine(&snapshot).summary().low_stock_items, expected);
        }

        /// Property 3: Running a report twice gives identical output
        #[test]
        fn prop_reports_are_idempotent(snapshot in snapshot_strategy()) {
            for kind in ReportKind::ALL {
                let first = engine(&snapshot).generate(kind);
                let second = engine(&snapshot).generate(kind);
                prop_assert_eq!(first, second);
            }
        }

        /// Property 4: Category shares sum to 100% whenever there is value
        #[test]
        fn prop_category_shares_sum_to_100(snapshot in snapshot_strategy()) {
            let engine = engine(&snapshot);
            let rollup = engine.category_rollup();
            let total: Decimal = rollup.iter().map(|c| c.percent_of_total).sum();
            if engine.total_inventory_value().is_zero() {
                prop_assert_eq!(total, Decimal::ZERO);
            } else {
                prop_assert!((total - Decimal::ONE_HUNDRED).abs() < dec("0.0001"));
            }

            let counted: usize = rollup.iter().map(|c| c.material_count).sum();
            prop_assert_eq!(counted, snapshot.materials.len());
        }

        /// Property 5: Reorder quantities and costs are never negative
        #[test]
        fn prop_reorder_never_negative(snapshot in snapshot_strategy()) {
            let report = engine(&snapshot).low_stock_report();
            for row in &report.rows {
                prop_assert!(row.reorder_qty >= Decimal::ZERO);
                prop_assert!(row.reorder_cost >= Decimal::ZERO);
                prop_assert!(row.current_stock <= row.min_stock_level * dec("1.2"));
            }
        }

        /// Ratios stay within bounds for every supplier
        #[test]
        fn prop_supplier_scores_in_range(snapshot in snapshot_strategy()) {
            for row in engine(&snapshot).supplier_comparison() {
                prop_assert!(row.performance_score >= Decimal::ZERO);
                prop_assert!(row.performance_score <= Decimal::ONE_HUNDRED);
                if row.material_count == 0 {
                    prop_assert_eq!(row.avg_price, Decimal::ZERO);
                }
            }
        }
    }
}
