//! 訂單行模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 原始訂單記錄（解析協作者產出的逐列資料）
///
/// 欄位名稱為外部表格契約的一部分，必須逐字保留原始欄名。
/// 所有欄位皆為 Option：缺值由正規化階段裁決（必要欄位缺失即為 Schema 錯誤）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOrderRecord {
    /// 銷售文件號（訂單ID，多行共用）
    #[serde(rename = "Doc.ventas")]
    pub sales_doc: Option<String>,

    /// 品牌標籤（原始欄名為「描述」）
    #[serde(rename = "Descripción")]
    pub brand: Option<String>,

    /// 客戶名稱
    #[serde(rename = "Nombre 1")]
    pub customer: Option<String>,

    /// 請求者ID（品牌覆寫查找鍵）
    #[serde(rename = "Solic.")]
    pub requester: Option<String>,

    /// 物料ID
    #[serde(rename = "Material")]
    pub material: Option<String>,

    /// 物料短文本
    #[serde(rename = "Texto breve de material")]
    pub material_text: Option<String>,

    /// 物料類型代碼
    #[serde(rename = "Tipo material")]
    pub material_type: Option<String>,

    /// 工廠/中心代碼
    #[serde(rename = "Planta")]
    pub plant: Option<String>,

    /// 未交數量（來源欄名含前導空格，照實保留）
    #[serde(rename = " Pendiente")]
    pub pending_qty: Option<Decimal>,

    /// 出貨日期
    #[serde(rename = "Embarque")]
    pub shipment_date: Option<NaiveDate>,

    /// 放行日期
    #[serde(rename = "Liberación")]
    pub release_date: Option<NaiveDate>,

    /// 樣品標記（"X" 表示樣品行）
    #[serde(rename = "Muestra")]
    pub sample_flag: Option<String>,
}

/// 訂單完成度狀態（以訂單為單位，非單行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// 完整：訂單所有行的運輸後缺口總和為零
    #[serde(rename = "Completo")]
    Completo,
    /// 不完整
    #[serde(rename = "Incompleto")]
    Incompleto,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Completo => write!(f, "Completo"),
            OrderStatus::Incompleto => write!(f, "Incompleto"),
        }
    }
}

/// 交付窗口標籤（說明該行如何被滿足）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryTag {
    /// 直送物料類型，走池外流程
    #[serde(rename = "ZCOM")]
    Zcom,
    /// P5 工廠直出，走池外流程
    #[serde(rename = "P5/Expo")]
    PlantExpo,
    /// 缺口完全由在途庫存覆蓋
    #[serde(rename = "Transito")]
    Transito,
}

impl DeliveryTag {
    /// 是否為繞過分配的標籤（ZCOM / P5）
    pub fn is_bypass(&self) -> bool {
        matches!(self, DeliveryTag::Zcom | DeliveryTag::PlantExpo)
    }
}

impl std::fmt::Display for DeliveryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryTag::Zcom => write!(f, "ZCOM"),
            DeliveryTag::PlantExpo => write!(f, "P5/Expo"),
            DeliveryTag::Transito => write!(f, "Transito"),
        }
    }
}

/// 訂單行：一張訂單內對單一物料的一筆需求
///
/// 正規化階段建立一次；分配引擎與狀態分類器就地更新計算欄位；
/// 不會被刪除，只會被輸出視圖過濾。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// 行ID
    #[serde(skip)]
    pub id: Uuid,

    /// 訂單ID（多行共用）
    #[serde(rename = "Pedido")]
    pub order_id: String,

    /// 品牌（可能已被覆寫表替換）
    #[serde(rename = "Marca")]
    pub brand: String,

    /// 客戶名稱
    #[serde(rename = "Cliente")]
    pub customer: Option<String>,

    /// 物料ID
    #[serde(rename = "Material")]
    pub material: String,

    /// 物料短文本
    #[serde(rename = "Descripción")]
    pub material_text: Option<String>,

    /// 物料類型代碼
    #[serde(rename = "Tipo material")]
    pub material_type: Option<String>,

    /// 工廠/中心代碼
    #[serde(rename = "CE")]
    pub plant: Option<String>,

    /// 請求數量
    #[serde(rename = "Ctd. Sol.")]
    pub requested_qty: Decimal,

    /// 出貨日期（來源無法解析時為 None，排序時置末）
    #[serde(rename = "Fecha Embarque")]
    pub shipment_date: Option<NaiveDate>,

    /// 放行日期
    #[serde(rename = "Fecha Liberación")]
    pub release_date: Option<NaiveDate>,

    /// 分配時觀測到的現貨水位
    #[serde(rename = "Inventario")]
    pub inventory_seen: Decimal,

    /// 分配時觀測到的在途水位
    #[serde(rename = "Tránsito")]
    pub transit_seen: Decimal,

    /// 現貨分配後缺口
    #[serde(rename = "Faltante")]
    pub shortage: Decimal,

    /// 在途分配後缺口
    #[serde(rename = "Faltante Tránsito")]
    pub shortage_after_transit: Decimal,

    /// 訂單完成度（分類階段填入）
    #[serde(rename = "Estatus")]
    pub status: Option<OrderStatus>,

    /// 交付窗口標籤
    #[serde(rename = "Horario Entrega")]
    pub delivery_tag: Option<DeliveryTag>,
}

impl OrderLine {
    /// 創建新的訂單行（計算欄位歸零）
    pub fn new(order_id: String, brand: String, material: String, requested_qty: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            brand,
            customer: None,
            material,
            material_text: None,
            material_type: None,
            plant: None,
            requested_qty,
            shipment_date: None,
            release_date: None,
            inventory_seen: Decimal::ZERO,
            transit_seen: Decimal::ZERO,
            shortage: Decimal::ZERO,
            shortage_after_transit: Decimal::ZERO,
            status: None,
            delivery_tag: None,
        }
    }

    /// 建構器模式：設置客戶名稱
    pub fn with_customer(mut self, customer: String) -> Self {
        self.customer = Some(customer);
        self
    }

    /// 建構器模式：設置物料短文本
    pub fn with_material_text(mut self, text: String) -> Self {
        self.material_text = Some(text);
        self
    }

    /// 建構器模式：設置物料類型
    pub fn with_material_type(mut self, material_type: String) -> Self {
        self.material_type = Some(material_type);
        self
    }

    /// 建構器模式：設置工廠
    pub fn with_plant(mut self, plant: String) -> Self {
        self.plant = Some(plant);
        self
    }

    /// 建構器模式：設置出貨日期
    pub fn with_shipment_date(mut self, date: NaiveDate) -> Self {
        self.shipment_date = Some(date);
        self
    }

    /// 建構器模式：設置放行日期
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// 是否為繞過分配的行（由分配引擎打上標籤後才有意義）
    pub fn is_bypass(&self) -> bool {
        self.delivery_tag.map(|t| t.is_bypass()).unwrap_or(false)
    }
}
