//! 運行協調器
//!
//! 把五個階段串成一次同步批次計算：
//! (訂單記錄, 庫存記錄, 品牌覆寫表) → 四張輸出表。
//! 任一階段失敗即整次中止，不回傳部分結果。

use pedidos_core::{BrandOverrideMap, RawInventoryRecord, RawOrderRecord, RunConfig};

use crate::allocation::AllocationEngine;
use crate::brand_report::BrandAggregator;
use crate::ledger::StockLedger;
use crate::normalizer::Normalizer;
use crate::status::StatusClassifier;
use crate::ProcessResult;

/// 訂單處理器
pub struct Processor {
    /// 業務規則配置（一次運行構建一份，顯式傳入各階段）
    config: RunConfig,
}

impl Processor {
    /// 以指定配置創建處理器
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// 以生產預設配置創建處理器
    pub fn with_defaults() -> Self {
        Self::new(RunConfig::default())
    }

    /// 主處理入口
    ///
    /// 引擎在運行期間獨占持有庫存帳本；分配階段為單趟循序計算
    /// （公平性依賴全域排序，同物料行之間存在池上的讀寫衝突）。
    pub fn run(
        &self,
        orders: &[RawOrderRecord],
        inventories: &[RawInventoryRecord],
        overrides: &BrandOverrideMap,
    ) -> pedidos_core::Result<ProcessResult> {
        tracing::info!(
            "開始處理：訂單 {} 筆，庫存 {} 筆，品牌覆寫 {} 筆",
            orders.len(),
            inventories.len(),
            overrides.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 正規化（過濾、品牌覆寫、決定性排序）
        tracing::debug!("Step 1: 記錄正規化");
        let mut lines = Normalizer::normalize(orders, overrides, &self.config)?;

        // Step 2: 庫存帳本構建（ND 過濾、中心去重、兩池快照）
        tracing::debug!("Step 2: 庫存帳本構建");
        let mut ledger = StockLedger::build(inventories, &self.config)?;

        // Step 3: 順序貪婪分配
        tracing::debug!("Step 3: 分配，工作集 {} 行", lines.len());
        AllocationEngine::allocate(&mut lines, &mut ledger, &self.config)?;

        // Step 4: 狀態分類與視圖切分
        tracing::debug!("Step 4: 狀態分類");
        StatusClassifier::classify(&mut lines);
        let complete = StatusClassifier::complete_view(&lines);
        let incomplete = StatusClassifier::incomplete_view(&lines);

        // Step 5: 品牌匯總
        tracing::debug!("Step 5: 品牌匯總");
        let brand_summary = BrandAggregator::summarize(&lines);

        let mut result = ProcessResult::empty();
        result.lines = lines;
        result.complete = complete;
        result.incomplete = incomplete;
        result.brand_summary = brand_summary;
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "處理完成，耗時 {:?}：{} 行，完整訂單 {} 張，不完整行 {} 筆",
            start_time.elapsed(),
            result.lines.len(),
            result.complete.len(),
            result.incomplete.len()
        );

        Ok(result)
    }

    /// 獲取配置引用
    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedidos_core::{OrderStatus, PedidosError};
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
    fn test_full_pipeline_produces_four_tables() {
        let processor = Processor::with_defaults();
        let orders = vec![order("SO-1", "M-1", 5), order("SO-2", "M-2", 4)];
        let inventories = vec![inventory("M-1", 10, 0)];
        let overrides = BrandOverrideMap::new();

        let result = processor.run(&orders, &inventories, &overrides).unwrap();

        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.total_orders(), 2);
        assert_eq!(result.complete.len(), 1); // SO-1 完整
        assert_eq!(result.incomplete.len(), 1); // SO-2 物料缺席
        assert_eq!(result.brand_summary.len(), 1);
        assert!(result.calculation_time_ms.is_some());
    }

    #[test]
    fn test_stage_error_aborts_run() {
        let processor = Processor::with_defaults();
        let mut bad = order("SO-1", "M-1", 5);
        bad.material = None;
        let overrides = BrandOverrideMap::new();

        let err = processor.run(&[bad], &[], &overrides).unwrap_err();
        assert!(matches!(err, PedidosError::Schema { .. }));
    }

    #[test]
    fn test_order_status_end_to_end() {
        let processor = Processor::with_defaults();
        // SO-1 的缺口由在途覆蓋 → 完整；SO-2 全缺 → 不完整
        let orders = vec![order("SO-1", "M-1", 8), order("SO-2", "M-404", 4)];
        let inventories = vec![inventory("M-1", 5, 3)];
        let overrides = BrandOverrideMap::new();

        let result = processor.run(&orders, &inventories, &overrides).unwrap();

        let so1 = result.lines.iter().find(|l| l.order_id == "SO-1").unwrap();
        assert_eq!(so1.status, Some(OrderStatus::Completo));
        let so2 = result.lines.iter().find(|l| l.order_id == "SO-2").unwrap();
        assert_eq!(so2.status, Some(OrderStatus::Incompleto));
    }
}
