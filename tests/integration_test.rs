//! 集成測試

use pedidos::{
    AllocationEngine, BrandOverrideMap, DeliveryTag, Normalizer, OrderStatus, Processor,
    RawInventoryRecord, RawOrderRecord, ResultCache, RunConfig, StockLedger,
};
use rstest::rstest;
use rust_decimal::Decimal;

fn order(id: &str, material: &str, qty: i64) -> RawOrderRecord {
    RawOrderRecord {
        sales_doc: Some(id.to_string()),
        brand: Some("Marca privada Exp.".to_string()),
        material: Some(material.to_string()),
        pending_qty: Some(Decimal::from(qty)),
        ..Default::default()
    }
}

fn inventory(material: &str, available: i64, transit: i64) -> RawInventoryRecord {
    RawInventoryRecord {
        material: Some(material.to_string()),
        center: Some("LARE".to_string()),
        planning_flag: None,
        available_qty: Some(Decimal::from(available)),
        transit_qty: Some(Decimal::from(transit)),
    }
}

#[test]
fn test_scenario_a_sequential_depletion_with_transit_cover() {
    // 情境 A：單一物料，現貨 10、在途 5；兩行依分配順序請求 8 與 5
    let processor = Processor::with_defaults();
    let orders = vec![order("SO-1", "M-1", 8), order("SO-2", "M-1", 5)];
    let inventories = vec![inventory("M-1", 10, 5)];
    let overrides = BrandOverrideMap::new();

    let result = processor.run(&orders, &inventories, &overrides).unwrap();

    // 行 1：現貨全額滿足
    let l1 = &result.lines[0];
    assert_eq!(l1.order_id, "SO-1");
    assert_eq!(l1.inventory_seen, Decimal::from(10));
    assert_eq!(l1.shortage, Decimal::ZERO);
    assert_eq!(l1.shortage_after_transit, Decimal::ZERO);

    // 行 2：現貨分配 2，缺 3，在途 5 ≥ 3 全覆蓋
    let l2 = &result.lines[1];
    assert_eq!(l2.order_id, "SO-2");
    assert_eq!(l2.inventory_seen, Decimal::from(2));
    assert_eq!(l2.shortage, Decimal::from(3));
    assert_eq!(l2.shortage_after_transit, Decimal::ZERO);
    assert_eq!(l2.delivery_tag, Some(DeliveryTag::Transito));

    // 兩張訂單都完整
    assert_eq!(result.complete.len(), 2);
    assert!(result.incomplete.is_empty());
}

#[test]
fn test_scenario_b_absent_material_is_full_shortage() {
    // 情境 B：物料完全不在庫存中，請求 4 → 全額缺口，訂單不完整
    let processor = Processor::with_defaults();
    let orders = vec![order("SO-1", "M-404", 4)];
    let overrides = BrandOverrideMap::new();

    let result = processor.run(&orders, &[], &overrides).unwrap();

    let line = &result.lines[0];
    assert_eq!(line.inventory_seen, Decimal::ZERO);
    assert_eq!(line.shortage, Decimal::from(4));
    assert_eq!(line.transit_seen, Decimal::ZERO);
    assert_eq!(line.shortage_after_transit, Decimal::from(4));
    assert_eq!(line.status, Some(OrderStatus::Incompleto));
    assert_eq!(result.incomplete.len(), 1);
}

#[rstest]
#[case::direct_ship(Some("ZCOM"), None, DeliveryTag::Zcom)]
#[case::bypass_plant(None, Some("P5"), DeliveryTag::PlantExpo)]
fn test_scenario_c_bypass_lines_skip_pools(
    #[case] material_type: Option<&str>,
    #[case] plant: Option<&str>,
    #[case] expected_tag: DeliveryTag,
) {
    // 情境 C：繞過行無論池狀態如何，缺口皆為零且池不被觸碰
    let processor = Processor::with_defaults();
    let mut record = order("SO-1", "M-1", 8);
    record.material_type = material_type.map(|s| s.to_string());
    record.plant = plant.map(|s| s.to_string());
    let inventories = vec![inventory("M-1", 3, 1)];
    let overrides = BrandOverrideMap::new();

    let result = processor.run(&[record], &inventories, &overrides).unwrap();

    let line = &result.lines[0];
    assert_eq!(line.shortage, Decimal::ZERO);
    assert_eq!(line.shortage_after_transit, Decimal::ZERO);
    assert_eq!(line.delivery_tag, Some(expected_tag));
    assert_eq!(line.status, Some(OrderStatus::Completo));
}

#[test]
fn test_scenario_d_override_changes_sort_and_aggregation() {
    // 情境 D：請求者在覆寫表中，品牌被替換並以新品牌參與排序與匯總
    let config = RunConfig::default();
    let mut overrides = BrandOverrideMap::new();
    overrides.insert("REQ-7".to_string(), "Marca X".to_string());

    let mut record = order("SO-1", "M-1", 5);
    record.requester = Some("REQ-7".to_string());

    let lines = Normalizer::normalize(&[record.clone()], &overrides, &config).unwrap();
    assert_eq!(lines[0].brand, "Marca X");

    let processor = Processor::with_defaults();
    let result = processor.run(&[record], &[], &overrides).unwrap();
    assert_eq!(result.brand_summary.len(), 1);
    assert_eq!(result.brand_summary[0].brand, "Marca X");
}

#[test]
fn test_scenario_e_zero_requested_brand_has_zero_percentage() {
    // 情境 E：品牌請求總量為零 → 缺口百分比為零，不產生除法錯誤
    let processor = Processor::with_defaults();
    let orders = vec![order("SO-1", "M-1", 0)];
    let overrides = BrandOverrideMap::new();

    let result = processor.run(&orders, &[], &overrides).unwrap();

    let summary = &result.brand_summary[0];
    assert_eq!(summary.total_requested, Decimal::ZERO);
    assert_eq!(summary.pct_shortage, Decimal::ZERO);
}

#[test]
fn test_conservation_law_for_both_pools() {
    // 守恆律：初始池總量 == 各行分配量總和 + 終態池總量（兩個池各自成立）
    let config = RunConfig::default();
    let overrides = BrandOverrideMap::new();

    let orders = vec![
        order("SO-1", "M-1", 8),
        order("SO-2", "M-1", 7),
        order("SO-3", "M-2", 4),
        order("SO-4", "M-404", 9),
    ];
    let inventories = vec![inventory("M-1", 10, 6), inventory("M-2", 3, 0)];

    let mut lines = Normalizer::normalize(&orders, &overrides, &config).unwrap();
    let mut ledger = StockLedger::build(&inventories, &config).unwrap();
    let initial_on_hand = ledger.on_hand.total();
    let initial_transit = ledger.in_transit.total();

    AllocationEngine::allocate(&mut lines, &mut ledger, &config).unwrap();

    let allocated_on_hand: Decimal = lines.iter().map(|l| l.requested_qty - l.shortage).sum();
    let covered_by_transit: Decimal = lines
        .iter()
        .map(|l| l.shortage - l.shortage_after_transit)
        .sum();

    assert_eq!(initial_on_hand, allocated_on_hand + ledger.on_hand.total());
    assert_eq!(initial_transit, covered_by_transit + ledger.in_transit.total());

    // 非負性
    for (_, qty) in ledger.on_hand.iter() {
        assert!(*qty >= Decimal::ZERO);
    }
    for (_, qty) in ledger.in_transit.iter() {
        assert!(*qty >= Decimal::ZERO);
    }
}

#[test]
fn test_determinism_identical_inputs_identical_outputs() {
    // 冪等性：同樣輸入運行兩次，輸出表逐位元相同
    let processor = Processor::with_defaults();
    let orders = vec![
        order("SO-2", "M-1", 5),
        order("SO-1", "M-1", 8),
        order("SO-3", "M-2", 4),
    ];
    let inventories = vec![inventory("M-1", 10, 2), inventory("M-2", 1, 1)];
    let overrides = BrandOverrideMap::new();

    let first = processor.run(&orders, &inventories, &overrides).unwrap();
    let second = processor.run(&orders, &inventories, &overrides).unwrap();

    assert_eq!(
        serde_json::to_string(&first.lines).unwrap(),
        serde_json::to_string(&second.lines).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.complete).unwrap(),
        serde_json::to_string(&second.complete).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.incomplete).unwrap(),
        serde_json::to_string(&second.incomplete).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.brand_summary).unwrap(),
        serde_json::to_string(&second.brand_summary).unwrap()
    );
}

#[test]
fn test_order_status_consistency_with_shortage_sum() {
    // 訂單狀態一致性：Completo 若且唯若行的運輸後缺口總和為零
    let processor = Processor::with_defaults();
    let orders = vec![
        order("SO-1", "M-1", 3),
        order("SO-1", "M-404", 2),
        order("SO-2", "M-1", 4),
    ];
    let inventories = vec![inventory("M-1", 10, 0)];
    let overrides = BrandOverrideMap::new();

    let result = processor.run(&orders, &inventories, &overrides).unwrap();

    for line in &result.lines {
        let sum: Decimal = result
            .lines
            .iter()
            .filter(|l| l.order_id == line.order_id)
            .map(|l| l.shortage_after_transit)
            .sum();
        let expected = if sum == Decimal::ZERO {
            OrderStatus::Completo
        } else {
            OrderStatus::Incompleto
        };
        assert_eq!(line.status, Some(expected));
    }
}

#[test]
fn test_allocation_follows_sort_order_not_input_order() {
    // 公平性：出貨日早的訂單先取庫存，與輸入順序無關
    let processor = Processor::with_defaults();

    let mut late = order("SO-9", "M-1", 10);
    late.shipment_date = chrono::NaiveDate::from_ymd_opt(2025, 4, 10);
    let mut early = order("SO-1", "M-1", 10);
    early.shipment_date = chrono::NaiveDate::from_ymd_opt(2025, 4, 1);

    // 輸入順序故意把晚的放前面
    let inventories = vec![inventory("M-1", 10, 0)];
    let overrides = BrandOverrideMap::new();
    let result = processor
        .run(&[late, early], &inventories, &overrides)
        .unwrap();

    let so1 = result.lines.iter().find(|l| l.order_id == "SO-1").unwrap();
    let so9 = result.lines.iter().find(|l| l.order_id == "SO-9").unwrap();
    assert_eq!(so1.shortage, Decimal::ZERO);
    assert_eq!(so9.shortage, Decimal::from(10));
}

#[test]
fn test_result_cache_roundtrip_around_run() {
    // 同樣輸入第二次直接命中快取；輸入變動落到新鍵，不會誤中
    let processor = Processor::with_defaults();
    let orders = vec![order("SO-1", "M-1", 8), order("SO-2", "M-1", 5)];
    let inventories = vec![inventory("M-1", 10, 5)];
    let overrides = BrandOverrideMap::new();

    let mut cache = ResultCache::new();
    let key = ResultCache::fingerprint(&orders, &inventories, &[]).unwrap();
    assert!(cache.get(key).is_none());

    let result = processor.run(&orders, &inventories, &overrides).unwrap();
    let fresh_lines = serde_json::to_string(&result.lines).unwrap();
    cache.set(key, result);

    let hit = cache.get(key).expect("第二次查找應命中");
    assert_eq!(serde_json::to_string(&hit.lines).unwrap(), fresh_lines);

    // 數量變動 → 新指紋 → 未命中
    let changed = vec![order("SO-1", "M-1", 9), order("SO-2", "M-1", 5)];
    let changed_key = ResultCache::fingerprint(&changed, &inventories, &[]).unwrap();
    assert_ne!(key, changed_key);
    assert!(cache.get(changed_key).is_none());
}
