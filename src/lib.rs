//! # Pedidos
//!
//! 訂單分配與分類引擎的門面 crate：重新導出資料模型、計算引擎與結果快取。

pub use pedidos_cache::ResultCache;
pub use pedidos_calc::{
    AllocationEngine, BrandAggregator, BrandSummary, CompleteOrderRow, Normalizer, ProcessResult,
    Processor, StatusClassifier, StockLedger,
};
pub use pedidos_core::{
    BrandOverrideMap, DeliveryTag, OrderLine, OrderStatus, PedidosError, RawBrandRecord,
    RawInventoryRecord, RawOrderRecord, Result, RunConfig, StockPool,
};
