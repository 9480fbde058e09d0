//! 品牌覆寫表模型

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始品牌覆寫記錄（BD Brand 參照表的一列）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBrandRecord {
    /// 請求者ID
    #[serde(rename = "Solic.")]
    pub requester: Option<String>,

    /// 覆寫後的品牌標籤
    #[serde(rename = "Marca")]
    pub brand: Option<String>,
}

/// 品牌覆寫表：請求者ID → 品牌標籤
///
/// 正規化階段對每一行查一次；查不到是預期分支（保留原品牌），不是錯誤。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandOverrideMap {
    overrides: HashMap<String, String>,
}

impl BrandOverrideMap {
    /// 創建空表
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// 由原始記錄構建；缺請求者或缺品牌的列被略過
    pub fn from_records(records: &[RawBrandRecord]) -> Self {
        let mut overrides = HashMap::new();
        for record in records {
            if let (Some(requester), Some(brand)) = (&record.requester, &record.brand) {
                overrides.insert(requester.clone(), brand.clone());
            }
        }
        Self { overrides }
    }

    /// 插入一筆覆寫
    pub fn insert(&mut self, requester: String, brand: String) {
        self.overrides.insert(requester, brand);
    }

    /// 查找請求者的覆寫品牌
    pub fn lookup(&self, requester: &str) -> Option<&str> {
        self.overrides.get(requester).map(|s| s.as_str())
    }

    /// 表中覆寫筆數
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// 表是否為空
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
