//! Upstream payload to report pipeline tests
//!
//! Feeds payloads shaped like the plant inventory service through the wire
//! adapter and the reporting engine, covering:
//! - Property 6: Malformed Records Never Abort a Refresh
//! - Property 7: Reports Tolerate Any Mix of Valid Records

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::models::InventorySnapshot;
use shared::reports::{render_markdown, Report, ReportEngine, ReportKind, ReportOptions};
use shared::wire::{map_records, material_from_wire, supplier_from_wire, transaction_from_wire};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn materials_payload() -> Value {
    json!([
        {"id": "m1", "name": "OPC 53 Grade Cement", "category": "Cement", "unit": "MT",
         "quantity": 40.0, "min_quantity": 50.0, "price": 6500.0,
         "supplier": "CemCorp Industries", "location": "Silo A",
         "last_updated": "2024-03-09T18:00:00"},
        {"id": "m2", "name": "River Sand", "category": "Sand", "unit": "MT",
         "quantity": 300.0, "min_quantity": 100.0, "price": 800.0,
         "supplier": "Sand Suppliers Ltd", "location": "Yard 2",
         "last_updated": "2024-03-08T10:00:00"},
        {"id": "m3", "name": "20mm Aggregate", "category": "Aggregates", "unit": "MT",
         "quantity": 0.0, "min_quantity": 80.0, "price": 1200.0,
         "supplier": "Stone Crushers", "location": "Yard 1",
         "last_updated": null},
        {"id": "m4", "name": "Broken record"}
    ])
}

fn transactions_payload() -> Value {
    json!([
        {"id": "t1", "material_id": "m1", "material_name": "OPC 53 Grade Cement",
         "type": "in", "quantity": 20.0, "reference": "PO-1001",
         "supplier": "CemCorp Industries", "notes": null,
         "date": "2024-03-09T09:00:00", "user": "admin"},
        {"id": "t2", "material_id": "m1", "material_name": "OPC 53 Grade Cement",
         "type": "out", "quantity": 12.5, "reference": "ISS-2001",
         "supplier": null, "notes": "Batch plant 1",
         "date": "2024-03-10T07:30:00", "user": "operator"},
        {"id": "t3", "material_id": "m2", "material_name": "River Sand",
         "type": "out", "quantity": 50.0, "reference": "ISS-2002",
         "supplier": null, "notes": null,
         "date": "not a date", "user": "operator"},
        {"id": "t4", "material_id": "m2", "type": "sideways", "quantity": 1.0}
    ])
}

fn suppliers_payload() -> Value {
    json!([
        {"id": "s1", "name": "CemCorp Industries", "contact_person": "R. Mehta",
         "email": "sales@cemcorp.example", "phone": "9876543210", "address": "Pune",
         "materials": "Cement,Fly Ash", "rating": 4.5, "active": true},
        {"id": "s2", "name": "Sand Suppliers Ltd", "contact_person": "K. Rao",
         "email": "rao@sand.example", "phone": "9123456780", "address": "Nashik",
         "materials": "Sand", "rating": 3.0, "active": false}
    ])
}

fn snapshot_from_payloads() -> (InventorySnapshot, usize) {
    let materials = map_records(materials_payload().as_array().unwrap(), material_from_wire);
    let transactions =
        map_records(transactions_payload().as_array().unwrap(), transaction_from_wire);
    let suppliers = map_records(suppliers_payload().as_array().unwrap(), supplier_from_wire);
    let rejected = materials.rejected.len() + transactions.rejected.len() + suppliers.rejected.len();
    (
        InventorySnapshot::new(materials.records, transactions.records, suppliers.records),
        rejected,
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Bad rows are skipped, good rows survive
    #[test]
    fn test_payload_mapping() {
        let (snapshot, rejected) = snapshot_from_payloads();
        assert_eq!(snapshot.materials.len(), 3);
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(snapshot.suppliers.len(), 2);
        assert_eq!(rejected, 2);

        // No explicit maximum upstream: twice the minimum
        assert_eq!(snapshot.materials[0].max_stock_level, dec("100"));
        assert!(snapshot.transactions[2].created_at.is_none());
    }

    /// Summary totals over the mapped payload
    #[test]
    fn test_summary_from_payload() {
        let (snapshot, _) = snapshot_from_payloads();
        let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));
        let summary = engine.summary();

        assert_eq!(
            summary.total_inventory_value,
            dec("260000") + dec("240000")
        );
        assert_eq!(summary.low_stock_items, 2);
        assert_eq!(summary.window.stock_in, dec("20"));
        assert_eq!(summary.window.stock_out, dec("12.5"));
        assert_eq!(summary.window.stock_out_count, 1);
        assert_eq!(summary.top_consumed[0].material_id, "m2");
    }

    /// Suppliers link to materials through the supplier name
    #[test]
    fn test_supplier_links_from_payload() {
        let (snapshot, _) = snapshot_from_payloads();
        let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));

        let rows = engine.supplier_comparison();
        assert_eq!(rows[0].supplier_id, "s1");
        assert_eq!(rows[0].material_count, 1);
        assert_eq!(rows[0].avg_price, dec("6500"));
        assert!(!rows[1].is_active);

        let procurement = engine.procurement_cost();
        assert_eq!(procurement.rows[0].total_procurement_cost, dec("130000"));
        assert_eq!(procurement.rows[0].cost_efficiency, dec("200"));
    }

    /// The reorder list covers both depleted materials
    #[test]
    fn test_reorder_from_payload() {
        let (snapshot, _) = snapshot_from_payloads();
        let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));
        let report = engine.low_stock_report();

        let ids: Vec<&str> = report.rows.iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m1"]);
        assert_eq!(report.rows[0].reorder_qty, dec("160"));
        assert_eq!(report.rows[1].reorder_qty, dec("60"));
        assert_eq!(report.total_reorder_cost, dec("192000") + dec("390000"));
    }

    /// Out-of-range numbers reject their record, the rest still report
    #[test]
    fn test_oversized_records_are_rejected() {
        let mut materials = materials_payload();
        let rows = materials.as_array_mut().unwrap();
        rows.push(json!({"id": "m5", "name": "Fly Ash", "quantity": 5e28,
                         "min_quantity": 1.0, "price": 2.0}));
        rows.push(json!({"id": "m6", "name": "Micro Silica", "quantity": 1.0,
                         "min_quantity": "50000000000000000000000000000", "price": 2.0}));
        let mut suppliers = suppliers_payload();
        suppliers.as_array_mut().unwrap().push(json!({"id": "s3", "name": "Stone Crushers",
                                                      "rating": 7}));

        let materials = map_records(materials.as_array().unwrap(), material_from_wire);
        let suppliers = map_records(suppliers.as_array().unwrap(), supplier_from_wire);
        assert_eq!(materials.records.len(), 3);
        assert_eq!(materials.rejected.len(), 3);
        assert_eq!(suppliers.records.len(), 2);
        assert_eq!(suppliers.rejected[0].0, 2);

        let snapshot = InventorySnapshot::new(materials.records, Vec::new(), suppliers.records);
        let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));
        for kind in ReportKind::ALL {
            assert_eq!(engine.generate(kind).kind(), kind);
        }
        assert_eq!(
            engine.summary().total_inventory_value,
            dec("260000") + dec("240000")
        );
    }

    /// Every report serializes and renders
    #[test]
    fn test_every_report_renders() {
        let (snapshot, _) = snapshot_from_payloads();
        let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));
        for kind in ReportKind::ALL {
            let report = engine.generate(kind);
            let json = serde_json::to_string(&report).unwrap();
            let back: Report = serde_json::from_str(&json).unwrap();
            assert_eq!(back.kind(), kind);
            assert!(!render_markdown(&report).is_empty());
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a material record that may or may not be well formed
    fn material_record_strategy() -> impl Strategy<Value = Value> {
        (
            0u32..1000,
            prop::option::of(0i64..100000),
            prop::option::of(-100i64..10000),
            prop::option::of(0i64..1000000),
            any::<bool>(),
        )
            .prop_map(|(id, quantity, min_quantity, price, quoted)| {
                let mut record = json!({
                    "id": format!("m{}", id),
                    "name": format!("Material {}", id),
                    "category": "Cement",
                    "unit": "MT",
                });
                let object = record.as_object_mut().unwrap();
                let number = |v: i64| {
                    if quoted {
                        json!(format!("{}.5", v))
                    } else {
                        json!(v)
                    }
                };
                if let Some(q) = quantity {
                    object.insert("quantity".to_string(), number(q));
                }
                if let Some(m) = min_quantity {
                    object.insert("min_quantity".to_string(), json!(m));
                }
                if let Some(p) = price {
                    object.insert("price".to_string(), number(p));
                }
                record
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property 6: Every record is either mapped or rejected, never both or neither
        #[test]
        fn prop_mapping_partitions_records(
            records in prop::collection::vec(material_record_strategy(), 0..20)
        ) {
            let mapped = map_records(&records, material_from_wire);
            prop_assert_eq!(mapped.records.len() + mapped.rejected.len(), records.len());
            for material in &mapped.records {
                prop_assert!(material.current_stock >= Decimal::ZERO);
                prop_assert!(material.min_stock_level >= Decimal::ZERO);
            }
        }

        /// Property 7: Every report runs over whatever survived mapping
        #[test]
        fn prop_reports_run_on_mapped_records(
            records in prop::collection::vec(material_record_strategy(), 0..20)
        ) {
            let mapped = map_records(&records, material_from_wire);
            let snapshot = InventorySnapshot::new(mapped.records, Vec::new(), Vec::new());
            let engine = ReportEngine::new(&snapshot, ReportOptions::new(today()));
            for kind in ReportKind::ALL {
                prop_assert_eq!(engine.generate(kind).kind(), kind);
            }
        }
    }
}
