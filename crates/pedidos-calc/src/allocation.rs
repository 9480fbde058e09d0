//! 分配引擎
//!
//! 按正規化排序對訂單行做單趟順序貪婪分配，逐行耗減現貨與在途池。
//! 排序即公平性政策：排序靠前的行對稀缺庫存有優先請求權，
//! 任何行都不能動用已被前面的行取走的庫存。

use pedidos_core::{DeliveryTag, OrderLine, PedidosError, RunConfig};
use rust_decimal::Decimal;

use crate::ledger::StockLedger;

/// 分配引擎
///
/// 運行期間獨占持有兩個庫存池的可變引用；本質上是循序計算，
/// 不可並行拆分（同物料的行之間存在讀寫衝突，且公平性依賴全域排序）。
pub struct AllocationEngine;

impl AllocationEngine {
    /// 對已排序的訂單行序列執行分配，就地更新計算欄位
    ///
    /// 每行的狀態機：
    /// 1. 繞過檢查：直送物料類型或繞過工廠 → 打繞過標籤，池不動
    /// 2. 現貨分配：缺口 = max(0, 請求 − 現貨)，池扣減實際分配量
    /// 3. 在途分配：運輸後缺口 = max(0, 缺口 − 在途)，池扣減實際覆蓋量
    ///
    /// 物料在池中缺席不是錯誤（分配為零，全額成為缺口）；
    /// 池值為負只可能來自邏輯缺陷，以 `PoolUnderflow` 中止。
    pub fn allocate(
        lines: &mut [OrderLine],
        ledger: &mut StockLedger,
        config: &RunConfig,
    ) -> pedidos_core::Result<()> {
        for line in lines.iter_mut() {
            // 繞過行由池外流程滿足，完全跳過分配
            if line.material_type.as_deref() == Some(config.direct_ship_type.as_str()) {
                line.shortage = Decimal::ZERO;
                line.shortage_after_transit = Decimal::ZERO;
                line.delivery_tag = Some(DeliveryTag::Zcom);
                continue;
            }
            if line.plant.as_deref() == Some(config.bypass_plant.as_str()) {
                line.shortage = Decimal::ZERO;
                line.shortage_after_transit = Decimal::ZERO;
                line.delivery_tag = Some(DeliveryTag::PlantExpo);
                continue;
            }

            // 現貨分配
            let available = ledger.on_hand.available(&line.material);
            if available < Decimal::ZERO {
                return Err(PedidosError::PoolUnderflow {
                    material: line.material.clone(),
                });
            }
            line.inventory_seen = available;
            let taken = ledger.on_hand.draw(&line.material, line.requested_qty);
            line.shortage = line.requested_qty - taken;

            // 在途分配（只覆蓋現貨後的缺口）
            let transit = ledger.in_transit.available(&line.material);
            if transit < Decimal::ZERO {
                return Err(PedidosError::PoolUnderflow {
                    material: line.material.clone(),
                });
            }
            line.transit_seen = transit;
            let covered = ledger.in_transit.draw(&line.material, line.shortage);
            line.shortage_after_transit = line.shortage - covered;
        }

        Ok(())
    }
}
