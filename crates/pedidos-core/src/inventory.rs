//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始庫存記錄：單一物料在單一中心的庫存狀態
///
/// 僅用於構建庫存池，池建好後即丟棄。欄位名稱逐字保留原始欄名。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInventoryRecord {
    /// 物料ID
    #[serde(rename = "Material")]
    pub material: Option<String>,

    /// 中心代碼
    #[serde(rename = "Centro")]
    pub center: Option<String>,

    /// 計劃特徵標記（"ND" 表示不可用於分配）
    #[serde(rename = "Carac. Planif.")]
    pub planning_flag: Option<String>,

    /// 現貨可用數量
    #[serde(rename = "Disponible")]
    pub available_qty: Option<Decimal>,

    /// 在途數量
    #[serde(rename = "Traslado")]
    pub transit_qty: Option<Decimal>,
}

/// 庫存池：物料ID → 剩餘數量
///
/// 不變量：池值永不為負；每次分配恰好扣除被分配的量。
/// 池中不存在的物料視為零庫存（缺席不是錯誤）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockPool {
    quantities: HashMap<String, Decimal>,
}

impl StockPool {
    /// 創建空池
    pub fn new() -> Self {
        Self {
            quantities: HashMap::new(),
        }
    }

    /// 寫入物料水位（同物料重複寫入時後寫覆蓋前寫）
    pub fn set(&mut self, material: String, quantity: Decimal) {
        self.quantities.insert(material, quantity);
    }

    /// 查詢剩餘水位，缺席視為零
    pub fn available(&self, material: &str) -> Decimal {
        self.quantities
            .get(material)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 從池中提取：實際提取量 = min(剩餘, 請求)，並扣減池值
    ///
    /// 回傳實際提取量。池值被夾在零以上，不可能下溢。
    pub fn draw(&mut self, material: &str, requested: Decimal) -> Decimal {
        let available = self.available(material);
        let taken = available.min(requested).max(Decimal::ZERO);
        if taken > Decimal::ZERO {
            self.quantities.insert(material.to_string(), available - taken);
        }
        taken
    }

    /// 池中所有水位的總和（守恆律驗證用）
    pub fn total(&self) -> Decimal {
        self.quantities.values().copied().sum()
    }

    /// 池中物料數量
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// 池是否為空
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// 遍歷（物料, 剩餘水位）
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.quantities.iter()
    }
}
