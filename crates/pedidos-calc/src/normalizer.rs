//! 記錄正規化
//!
//! 過濾、品牌覆寫與決定性排序。排序結果決定稀缺庫存的分配先後，
//! 是整個引擎唯一的公平性來源。

use pedidos_core::{BrandOverrideMap, OrderLine, PedidosError, RawOrderRecord, RunConfig};

/// 記錄正規化器
pub struct Normalizer;

impl Normalizer {
    /// 正規化原始訂單記錄
    ///
    /// 步驟：
    /// 1. 過濾：非樣品行、品牌在白名單內、客戶名不含排除子字串
    /// 2. 欄位驗證：存活記錄必須有訂單ID、物料ID與請求數量
    /// 3. 品牌覆寫：依請求者ID查覆寫表，查不到保留原品牌
    /// 4. 穩定排序：（出貨日期, 訂單ID, 品牌優先級）升冪，缺日期置末
    ///
    /// 覆寫必須在排序之前：排序的品牌優先級取決於覆寫後的品牌。
    /// 原始記錄不被修改。
    pub fn normalize(
        records: &[RawOrderRecord],
        overrides: &BrandOverrideMap,
        config: &RunConfig,
    ) -> pedidos_core::Result<Vec<OrderLine>> {
        let mut lines = Vec::new();

        for record in records {
            if !Self::passes_filters(record, config) {
                continue;
            }

            let line = Self::build_line(record, overrides)?;
            lines.push(line);
        }

        // 穩定排序：鍵外的並列保持輸入順序
        lines.sort_by(|a, b| {
            let key_a = (
                a.shipment_date.is_none(),
                a.shipment_date,
                a.order_id.as_str(),
                config.brand_priority(&a.brand),
            );
            let key_b = (
                b.shipment_date.is_none(),
                b.shipment_date,
                b.order_id.as_str(),
                config.brand_priority(&b.brand),
            );
            key_a.cmp(&key_b)
        });

        tracing::debug!("正規化完成：{} 筆輸入 → {} 筆工作集", records.len(), lines.len());

        Ok(lines)
    }

    /// 過濾條件（全部成立才進入工作集）
    fn passes_filters(record: &RawOrderRecord, config: &RunConfig) -> bool {
        // 樣品行剔除
        if record.sample_flag.as_deref() == Some(config.sample_flag.as_str()) {
            return false;
        }

        // 原始品牌必須在白名單內（缺品牌視同不在白名單）
        match &record.brand {
            Some(brand) if config.is_brand_allowed(brand) => {}
            _ => return false,
        }

        // 客戶名含排除子字串則剔除；缺客戶名保留（對齊來源的 na=False 語義）
        if let Some(customer) = &record.customer {
            if customer.contains(&config.excluded_customer) {
                return false;
            }
        }

        true
    }

    /// 由存活記錄構建訂單行，套用品牌覆寫
    fn build_line(
        record: &RawOrderRecord,
        overrides: &BrandOverrideMap,
    ) -> pedidos_core::Result<OrderLine> {
        let order_id = record.sales_doc.clone().ok_or(PedidosError::Schema {
            dataset: "pedidos",
            column: "Doc.ventas",
        })?;
        let material = record.material.clone().ok_or(PedidosError::Schema {
            dataset: "pedidos",
            column: "Material",
        })?;
        let requested_qty = record.pending_qty.ok_or(PedidosError::Schema {
            dataset: "pedidos",
            column: " Pendiente",
        })?;

        // 過濾已保證品牌存在
        let original_brand = record.brand.clone().unwrap_or_default();
        let brand = record
            .requester
            .as_deref()
            .and_then(|r| overrides.lookup(r))
            .map(|b| b.to_string())
            .unwrap_or(original_brand);

        let mut line = OrderLine::new(order_id, brand, material, requested_qty);
        line.customer = record.customer.clone();
        line.material_text = record.material_text.clone();
        line.material_type = record.material_type.clone();
        line.plant = record.plant.clone();
        line.shipment_date = record.shipment_date;
        line.release_date = record.release_date;

        Ok(line)
    }
}
