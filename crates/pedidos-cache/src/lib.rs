//! # Pedidos Cache
//!
//! 運行結果的記憶體快取：同樣的三份輸入在 TTL 內直接命中，不重算。
//! 鍵為輸入內容的指紋，任何輸入變動都會落到新鍵。

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use pedidos_calc::ProcessResult;
use pedidos_core::{PedidosError, RawBrandRecord, RawInventoryRecord, RawOrderRecord};

/// 預設存活時間（秒）
const DEFAULT_TTL_SECS: u64 = 3600;

/// 快取條目
struct CacheEntry {
    result: ProcessResult,
    inserted_at: Instant,
}

/// 運行結果快取
///
/// 命中失敗回傳 `None`（預期分支，不是錯誤）；過期條目視同未命中。
pub struct ResultCache {
    entries: HashMap<u64, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    /// 以預設 TTL（1 小時）創建快取
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// 以指定 TTL 創建快取
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// 由三份輸入計算指紋鍵（對其正規 JSON 序列化做穩定雜湊）
    pub fn fingerprint(
        orders: &[RawOrderRecord],
        inventories: &[RawInventoryRecord],
        brand_records: &[RawBrandRecord],
    ) -> pedidos_core::Result<u64> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for payload in [
            serde_json::to_vec(orders),
            serde_json::to_vec(inventories),
            serde_json::to_vec(brand_records),
        ] {
            let bytes =
                payload.map_err(|e| PedidosError::CalculationError(format!("指紋序列化失敗: {e}")))?;
            bytes.hash(&mut hasher);
        }
        Ok(hasher.finish())
    }

    /// 查找未過期的快取結果
    pub fn get(&self, key: u64) -> Option<&ProcessResult> {
        let entry = self.entries.get(&key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(&entry.result)
    }

    /// 寫入快取，並順手清掉已過期的條目
    pub fn set(&mut self, key: u64, result: ProcessResult) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() <= ttl);
        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// 清空快取
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 目前條目數（含未被清理的過期條目）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 快取是否為空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
