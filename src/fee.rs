//! 選択中のUTXOと送金先から手数料を計算する。
//!
//! 選択や送金先が変わるたびに呼び出し側が計算し直す。

use bitcoin::{Amount, SignedAmount};
use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{Destination, Utxo};

pub fn sum_amounts<I>(amounts: I) -> Result<Amount, ValidationError>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or(ValidationError::AmountOverflow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    #[serde(rename = "totalSelectedSats", with = "bitcoin::amount::serde::as_sat")]
    pub total_selected: Amount,
    #[serde(rename = "totalToSendSats", with = "bitcoin::amount::serde::as_sat")]
    pub total_to_send: Amount,
    /// 負の場合は構築不可。
    #[serde(rename = "feeSats", with = "bitcoin::amount::serde::as_sat")]
    pub fee: SignedAmount,
    pub estimated_size: usize,
    pub fee_per_byte: i64,
}

impl FeeSummary {
    pub fn new(
        selected: &[Utxo],
        destinations: &[Destination],
        estimated_size: usize,
    ) -> Result<Self, ValidationError> {
        let total_selected = sum_amounts(selected.iter().map(|u| u.amount))?;
        let total_to_send = sum_amounts(destinations.iter().map(|d| d.amount))?;

        let fee = total_selected
            .to_signed()
            .ok()
            .zip(total_to_send.to_signed().ok())
            .and_then(|(selected, to_send)| selected.checked_sub(to_send))
            .ok_or(ValidationError::AmountOverflow)?;

        // サイズ未確定 (入力または出力なし) の間は 0 とする
        let fee_per_byte = match i64::try_from(estimated_size) {
            Ok(size) if size > 0 => fee.to_sat().div_euclid(size),
            _ => 0,
        };

        Ok(FeeSummary {
            total_selected,
            total_to_send,
            fee,
            estimated_size,
            fee_per_byte,
        })
    }

    pub fn is_buildable(&self) -> bool {
        self.fee >= SignedAmount::ZERO
    }

    pub fn fee_per_byte_label(&self) -> String {
        format!("{} satoshi/byte", self.fee_per_byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::Network;

    const TXID: &str = "57bded0a2734620ddd416f59d98260dc8646a990c5a901acc00a3d17a911e174";
    const ADDR: &str = "mtveoXKcb1EjpspMmhPAJ6RkGeewbzWYDd";

    fn utxo(vout: u32, sats: u64) -> Utxo {
        Utxo::new(TXID, vout, ADDR, sats, Network::Testnet).unwrap()
    }

    fn dest(sats: u64) -> Destination {
        Destination::new(ADDR, sats, Network::Testnet).unwrap()
    }

    #[test]
    fn fee_is_selected_minus_payments() {
        let selected = [utxo(0, 60_000), utxo(1, 40_000)];
        let summary = FeeSummary::new(&selected, &[dest(90_000)], 85).unwrap();
        assert_eq!(summary.total_selected, Amount::from_sat(100_000));
        assert_eq!(summary.total_to_send, Amount::from_sat(90_000));
        assert_eq!(summary.fee, SignedAmount::from_sat(10_000));
        assert_eq!(summary.fee_per_byte, 117);
        assert_eq!(summary.fee_per_byte_label(), "117 satoshi/byte");
        assert!(summary.is_buildable());
    }

    #[test]
    fn negative_fee_is_reported_not_rejected() {
        let summary = FeeSummary::new(&[utxo(0, 1_000)], &[dest(1_500)], 85).unwrap();
        assert_eq!(summary.fee, SignedAmount::from_sat(-500));
        // floor(-500 / 85)
        assert_eq!(summary.fee_per_byte, -6);
        assert!(!summary.is_buildable());
    }

    #[test]
    fn zero_size_gives_zero_rate() {
        let summary = FeeSummary::new(&[], &[], 0).unwrap();
        assert_eq!(summary.fee, SignedAmount::ZERO);
        assert_eq!(summary.fee_per_byte, 0);
        assert_eq!(summary.fee_per_byte_label(), "0 satoshi/byte");
    }

    #[test]
    fn overflowing_selection_is_an_error() {
        let err = FeeSummary::new(&[utxo(0, u64::MAX), utxo(1, 1)], &[dest(1)], 85).unwrap_err();
        assert_eq!(err, ValidationError::AmountOverflow);
    }

    #[test]
    fn summary_serializes_in_satoshi() {
        let summary = FeeSummary::new(&[utxo(0, 100_000)], &[dest(90_000)], 85).unwrap();
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["totalSelectedSats"], 100_000);
        assert_eq!(json["totalToSendSats"], 90_000);
        assert_eq!(json["feeSats"], 10_000);
        assert_eq!(json["estimatedSize"], 85);
        assert_eq!(json["feePerByte"], 117);
    }
}
