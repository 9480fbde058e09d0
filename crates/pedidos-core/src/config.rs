//! 運行配置模型
//!
//! 過濾白名單、中心去重政策與繞過代碼全部集中於此，
//! 每次運行構建一份並顯式傳入各個階段，不依賴環境全域常量。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 一次運行的業務規則配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 品牌白名單（僅白名單內的原始品牌進入工作集）
    pub allowed_brands: Vec<String>,

    /// 排序優先品牌（排序鍵中優先級為 0，其餘為 1）
    pub priority_brand: String,

    /// 排除客戶子字串（客戶名含此字串的行被剔除，大小寫敏感）
    pub excluded_customer: String,

    /// 樣品標記值
    pub sample_flag: String,

    /// 計劃特徵哨兵值（等於此值的庫存記錄不可用於分配）
    pub unplannable_flag: String,

    /// 去重所需的中心集合：物料的中心集合 ⊇ 此集合時觸發去重
    pub required_centers: Vec<String>,

    /// 觸發去重時被丟棄記錄的中心（避免同一批實體庫存被兩個中心重複計入）
    pub dedup_drop_center: String,

    /// 直送物料類型代碼（繞過池分配）
    pub direct_ship_type: String,

    /// 繞過池分配的工廠代碼
    pub bypass_plant: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            allowed_brands: vec![
                "Marca privada Exp.".to_string(),
                "Producto de Catálogo Americano".to_string(),
            ],
            priority_brand: "Producto de Catálogo Americano".to_string(),
            excluded_customer: "James Palin".to_string(),
            sample_flag: "X".to_string(),
            unplannable_flag: "ND".to_string(),
            required_centers: vec!["EXPO".to_string(), "LARE".to_string()],
            dedup_drop_center: "EXPO".to_string(),
            direct_ship_type: "ZCOM".to_string(),
            bypass_plant: "P5".to_string(),
        }
    }
}

impl RunConfig {
    /// 創建預設（生產）配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置品牌白名單
    pub fn with_allowed_brands(mut self, brands: Vec<String>) -> Self {
        self.allowed_brands = brands;
        self
    }

    /// 建構器模式：設置排序優先品牌
    pub fn with_priority_brand(mut self, brand: String) -> Self {
        self.priority_brand = brand;
        self
    }

    /// 建構器模式：設置排除客戶子字串
    pub fn with_excluded_customer(mut self, customer: String) -> Self {
        self.excluded_customer = customer;
        self
    }

    /// 建構器模式：設置去重政策（所需中心集合＋被丟棄的中心）
    pub fn with_dedup_policy(mut self, required_centers: Vec<String>, drop_center: String) -> Self {
        self.required_centers = required_centers;
        self.dedup_drop_center = drop_center;
        self
    }

    /// 建構器模式：設置繞過代碼
    pub fn with_bypass_codes(mut self, direct_ship_type: String, bypass_plant: String) -> Self {
        self.direct_ship_type = direct_ship_type;
        self.bypass_plant = bypass_plant;
        self
    }

    /// 品牌是否在白名單內
    pub fn is_brand_allowed(&self, brand: &str) -> bool {
        self.allowed_brands.iter().any(|b| b == brand)
    }

    /// 排序用品牌優先級：優先品牌為 0，其餘為 1
    pub fn brand_priority(&self, brand: &str) -> u8 {
        if brand == self.priority_brand {
            0
        } else {
            1
        }
    }

    /// 中心集合是否觸發去重（⊇ 所需中心集合）
    pub fn centers_trigger_dedup(&self, centers: &HashSet<String>) -> bool {
        self.required_centers.iter().all(|c| centers.contains(c))
    }
}
