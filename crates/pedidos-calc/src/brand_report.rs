//! 品牌匯總報表
//!
//! 對全量分類行做唯讀聚合，輸出每品牌一列的匯總表。

use pedidos_core::{OrderLine, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 品牌匯總表的一列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSummary {
    /// 品牌
    #[serde(rename = "Marca")]
    pub brand: String,

    /// 相異訂單數
    #[serde(rename = "Total Pedidos")]
    pub total_orders: usize,

    /// 相異完整訂單數
    #[serde(rename = "Pedidos Completos")]
    pub complete_orders: usize,

    /// 相異不完整訂單數
    #[serde(rename = "Pedidos Incompletos")]
    pub incomplete_orders: usize,

    /// 完整訂單百分比（兩位小數）
    #[serde(rename = "% Completos")]
    pub pct_complete: Decimal,

    /// 不完整訂單百分比（兩位小數）
    #[serde(rename = "% Incompletos")]
    pub pct_incomplete: Decimal,

    /// 請求總量
    #[serde(rename = "Total Solicitado (pz)")]
    pub total_requested: Decimal,

    /// 缺口總量（現貨後缺口）
    #[serde(rename = "Faltante (pz)")]
    pub total_shortage: Decimal,

    /// 缺口百分比（缺口 / 請求；請求為零時為零，不做除法）
    #[serde(rename = "% Faltante")]
    pub pct_shortage: Decimal,
}

/// 品牌聚合器
pub struct BrandAggregator;

/// 單一品牌的累計器
#[derive(Default)]
struct BrandAccumulator {
    orders: HashSet<String>,
    complete_orders: HashSet<String>,
    incomplete_orders: HashSet<String>,
    total_requested: Decimal,
    total_shortage: Decimal,
}

impl BrandAggregator {
    /// 由全量分類行計算品牌匯總表（輸出按品牌排序，保證決定性）
    pub fn summarize(lines: &[OrderLine]) -> Vec<BrandSummary> {
        let mut accumulators: BTreeMap<&str, BrandAccumulator> = BTreeMap::new();

        for line in lines {
            let acc = accumulators.entry(line.brand.as_str()).or_default();
            acc.orders.insert(line.order_id.clone());
            match line.status {
                Some(OrderStatus::Completo) => {
                    acc.complete_orders.insert(line.order_id.clone());
                }
                Some(OrderStatus::Incompleto) => {
                    acc.incomplete_orders.insert(line.order_id.clone());
                }
                None => {}
            }
            acc.total_requested += line.requested_qty;
            acc.total_shortage += line.shortage;
        }

        accumulators
            .into_iter()
            .map(|(brand, acc)| {
                let total = acc.orders.len();
                BrandSummary {
                    brand: brand.to_string(),
                    total_orders: total,
                    complete_orders: acc.complete_orders.len(),
                    incomplete_orders: acc.incomplete_orders.len(),
                    pct_complete: Self::percentage(
                        Decimal::from(acc.complete_orders.len() as u64),
                        Decimal::from(total as u64),
                    ),
                    pct_incomplete: Self::percentage(
                        Decimal::from(acc.incomplete_orders.len() as u64),
                        Decimal::from(total as u64),
                    ),
                    total_requested: acc.total_requested,
                    total_shortage: acc.total_shortage,
                    pct_shortage: Self::percentage(acc.total_shortage, acc.total_requested),
                }
            })
            .collect()
    }

    /// 百分比（兩位小數）；分母為零時回傳零而不是除法錯誤
    fn percentage(numerator: Decimal, denominator: Decimal) -> Decimal {
        if denominator == Decimal::ZERO {
            return Decimal::ZERO;
        }
        (numerator / denominator * Decimal::from(100)).round_dp(2)
    }
}
