//! # Pedidos Core
//!
//! 核心資料模型與類型定義

pub mod brand;
pub mod config;
pub mod inventory;
pub mod order;

// Re-export 主要類型
pub use brand::{BrandOverrideMap, RawBrandRecord};
pub use config::RunConfig;
pub use inventory::{RawInventoryRecord, StockPool};
pub use order::{DeliveryTag, OrderLine, OrderStatus, RawOrderRecord};

/// 處理錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PedidosError {
    /// 輸入資料缺少必要欄位（依資料集與欄位命名）
    #[error("資料集 {dataset} 缺少必要欄位: {column}")]
    Schema {
        dataset: &'static str,
        column: &'static str,
    },

    /// 庫存池出現負值——分配演算法保證不會發生，出現即為內部邏輯缺陷
    #[error("庫存池負值（內部不變量被破壞）: {material}")]
    PoolUnderflow { material: String },

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, PedidosError>;
