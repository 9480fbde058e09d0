//! 狀態分類
//!
//! 由分配結果推導訂單級完成度與行級交付窗口標籤，並切分輸出視圖。

use chrono::NaiveDate;
use pedidos_core::{DeliveryTag, OrderLine, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 完整訂單視圖的一列（每張訂單一列，僅保留訂單級欄位）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOrderRow {
    /// 訂單ID
    #[serde(rename = "Pedido")]
    pub order_id: String,

    /// 品牌
    #[serde(rename = "Marca")]
    pub brand: String,

    /// 客戶名稱
    #[serde(rename = "Cliente")]
    pub customer: Option<String>,

    /// 出貨日期
    #[serde(rename = "Fecha Embarque")]
    pub shipment_date: Option<NaiveDate>,

    /// 放行日期
    #[serde(rename = "Fecha Liberación")]
    pub release_date: Option<NaiveDate>,

    /// 交付窗口標籤
    #[serde(rename = "Horario Entrega")]
    pub delivery_tag: Option<DeliveryTag>,
}

/// 狀態分類器
pub struct StatusClassifier;

impl StatusClassifier {
    /// 就地分類：訂單狀態 + 行級交付窗口標籤
    ///
    /// 訂單狀態取「總和」語義：訂單為 Completo 若且唯若其所有行的
    /// 運輸後缺口總和恰為零（與缺口欄位保持一致的那個定義）。
    ///
    /// 行級標籤：缺口 > 0 且運輸後缺口 == 0 → Transito（缺口完全由在途覆蓋）；
    /// 繞過行保留繞過標籤；其餘行維持空標籤。
    pub fn classify(lines: &mut [OrderLine]) {
        // 每張訂單的運輸後缺口總和
        let mut shortage_by_order: HashMap<&str, Decimal> = HashMap::new();
        for line in lines.iter() {
            *shortage_by_order.entry(line.order_id.as_str()).or_default() +=
                line.shortage_after_transit;
        }

        let complete_orders: std::collections::HashSet<String> = shortage_by_order
            .iter()
            .filter(|(_, sum)| **sum == Decimal::ZERO)
            .map(|(id, _)| id.to_string())
            .collect();

        for line in lines.iter_mut() {
            line.status = Some(if complete_orders.contains(&line.order_id) {
                OrderStatus::Completo
            } else {
                OrderStatus::Incompleto
            });

            if line.delivery_tag.is_none()
                && line.shortage > Decimal::ZERO
                && line.shortage_after_transit == Decimal::ZERO
            {
                line.delivery_tag = Some(DeliveryTag::Transito);
            }
        }
    }

    /// 完整訂單視圖：每張 Completo 訂單一列（同訂單多行時取排序後首行）
    pub fn complete_view(lines: &[OrderLine]) -> Vec<CompleteOrderRow> {
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
        let mut rows = Vec::new();

        for line in lines {
            if line.status != Some(OrderStatus::Completo) {
                continue;
            }
            if !seen.insert(line.order_id.as_str()) {
                continue;
            }
            rows.push(CompleteOrderRow {
                order_id: line.order_id.clone(),
                brand: line.brand.clone(),
                customer: line.customer.clone(),
                shipment_date: line.shipment_date,
                release_date: line.release_date,
                delivery_tag: line.delivery_tag,
            });
        }

        rows
    }

    /// 不完整訂單視圖：Incompleto 訂單中缺口 > 0 或標籤為 Transito 的行
    pub fn incomplete_view(lines: &[OrderLine]) -> Vec<OrderLine> {
        lines
            .iter()
            .filter(|line| {
                line.status == Some(OrderStatus::Incompleto)
                    && (line.shortage > Decimal::ZERO
                        || line.delivery_tag == Some(DeliveryTag::Transito))
            })
            .cloned()
            .collect()
    }
}
