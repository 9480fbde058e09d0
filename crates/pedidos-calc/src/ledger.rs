//! 庫存帳本構建
//!
//! 由原始庫存記錄構建現貨與在途兩個庫存池，套用中心去重規則。

use pedidos_core::{PedidosError, RawInventoryRecord, RunConfig, StockPool};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// 庫存帳本：一次運行的兩個可變庫存池
///
/// 分配引擎在運行期間獨占持有；運行之間不共享（每次運行重建快照）。
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    /// 現貨池
    pub on_hand: StockPool,

    /// 在途池
    pub in_transit: StockPool,
}

impl StockLedger {
    /// 由原始庫存記錄構建帳本
    ///
    /// 步驟：
    /// 1. 欄位驗證：每筆記錄必須有物料ID
    /// 2. 剔除計劃特徵為哨兵值（"ND"）的記錄
    /// 3. 中心去重：物料的中心集合 ⊇ 所需中心集合時，丟棄其在丟棄中心的記錄
    /// 4. 逐筆寫入兩個池（同物料重複出現時後寫覆蓋前寫）
    ///
    /// 缺數量值視為零（預期回退，不是錯誤）；池中缺席的物料即零庫存。
    pub fn build(
        records: &[RawInventoryRecord],
        config: &RunConfig,
    ) -> pedidos_core::Result<StockLedger> {
        // 驗證 + ND 過濾
        let mut usable: Vec<&RawInventoryRecord> = Vec::new();
        for record in records {
            if record.material.is_none() {
                return Err(PedidosError::Schema {
                    dataset: "inventarios",
                    column: "Material",
                });
            }
            if record.planning_flag.as_deref() == Some(config.unplannable_flag.as_str()) {
                continue;
            }
            usable.push(record);
        }

        // 物料 → 出現過的中心集合
        let mut centers_by_material: HashMap<&str, HashSet<String>> = HashMap::new();
        for record in &usable {
            let material = record.material.as_deref().unwrap_or_default();
            if let Some(center) = &record.center {
                centers_by_material
                    .entry(material)
                    .or_default()
                    .insert(center.clone());
            }
        }

        let mut ledger = StockLedger::default();
        let mut dropped = 0usize;

        for record in &usable {
            let material = record.material.as_deref().unwrap_or_default();

            // 去重：該物料同時出現在所有必需中心時，丟棄其在丟棄中心的記錄
            // （同一批實體庫存經由另一個中心計入，避免重複計數）
            let triggers = centers_by_material
                .get(material)
                .map(|centers| config.centers_trigger_dedup(centers))
                .unwrap_or(false);
            if triggers && record.center.as_deref() == Some(config.dedup_drop_center.as_str()) {
                dropped += 1;
                continue;
            }

            ledger.on_hand.set(
                material.to_string(),
                record.available_qty.unwrap_or(Decimal::ZERO),
            );
            ledger.in_transit.set(
                material.to_string(),
                record.transit_qty.unwrap_or(Decimal::ZERO),
            );
        }

        tracing::debug!(
            "庫存帳本構建完成：{} 筆輸入，{} 筆去重丟棄，現貨池 {} 項，在途池 {} 項",
            records.len(),
            dropped,
            ledger.on_hand.len(),
            ledger.in_transit.len()
        );

        Ok(ledger)
    }
}
