//! # Pedidos Calculation Engine
//!
//! 訂單分配與分類引擎：正規化 → 庫存池構建 → 順序貪婪分配 → 狀態分類 → 品牌匯總

pub mod allocation;
pub mod brand_report;
pub mod ledger;
pub mod normalizer;
pub mod processor;
pub mod status;

// Re-export 主要類型
pub use allocation::AllocationEngine;
pub use brand_report::{BrandAggregator, BrandSummary};
pub use ledger::StockLedger;
pub use normalizer::Normalizer;
pub use processor::Processor;
pub use status::{CompleteOrderRow, StatusClassifier};

use pedidos_core::OrderLine;

/// 一次運行的完整輸出（四張表）
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessResult {
    /// 全量分類後的訂單行
    pub lines: Vec<OrderLine>,

    /// 完整訂單視圖（每張訂單一列）
    pub complete: Vec<CompleteOrderRow>,

    /// 不完整訂單視圖（符合條件的行）
    pub incomplete: Vec<OrderLine>,

    /// 品牌匯總表
    pub brand_summary: Vec<BrandSummary>,

    /// 計算耗時（毫秒）
    #[serde(skip)]
    pub calculation_time_ms: Option<u128>,
}

impl ProcessResult {
    /// 創建空的運行結果
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            complete: Vec::new(),
            incomplete: Vec::new(),
            brand_summary: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 全量行中的相異訂單數
    pub fn total_orders(&self) -> usize {
        let ids: std::collections::HashSet<&str> =
            self.lines.iter().map(|l| l.order_id.as_str()).collect();
        ids.len()
    }
}
