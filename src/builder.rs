use bitcoin::Sequence;

use crate::error::{ScriptError, ValidationError};
use crate::estimate::estimate_size;
use crate::fee::FeeSummary;
use crate::script::{resolve_input_placeholder, resolve_output_script};
use crate::transaction::{Transaction, TxInput, TxOutput};
use crate::types::{Destination, SendingAddress, Utxo, WalletType};

pub const DEFAULT_VERSION: u32 = 1;
pub const DEFAULT_LOCK_TIME: u32 = 0;

/// 選択済みUTXOと送金先から未署名トランザクションを組み立てる。
///
/// ウォレットタイプはトランザクション全体で1つ。手数料や空リストの検査は
/// 呼び出し側が `validate_build_request` で行う。
#[derive(Debug, Clone, Copy, Default)]
pub struct TxBuilder {
    wallet_type: WalletType,
}

impl TxBuilder {
    pub fn new(wallet_type: WalletType) -> Self {
        TxBuilder { wallet_type }
    }

    pub fn estimate_size(
        &self,
        input_count: usize,
        destinations: &[Destination],
    ) -> Result<usize, ScriptError> {
        estimate_size(input_count, destinations, self.wallet_type)
    }

    /// 入力は選択順、出力は送金先の順に並べる。同じ引数なら常に同じバイト列になる。
    pub fn build(
        &self,
        version: u32,
        selected: &[Utxo],
        destinations: &[Destination],
        lock_time: u32,
    ) -> Result<Transaction, ScriptError> {
        log::info!(
            "トランザクション構築を開始します。入力 {} 件, 出力 {} 件, ウォレットタイプ {}",
            selected.len(),
            destinations.len(),
            self.wallet_type
        );

        let mut inputs = Vec::with_capacity(selected.len());
        for utxo in selected {
            inputs.push(TxInput {
                previous_output: utxo.out_point,
                script_sig: resolve_input_placeholder(utxo, self.wallet_type)?,
                sequence: Sequence::MAX,
            });
            log::debug!(
                "入力追加: txid={}, vout={}, value={}",
                utxo.out_point.txid,
                utxo.out_point.vout,
                utxo.amount.to_sat()
            );
        }

        let mut outputs = Vec::with_capacity(destinations.len());
        for destination in destinations {
            outputs.push(TxOutput {
                value: destination.amount,
                script_pubkey: resolve_output_script(&destination.address, self.wallet_type)?,
            });
            log::debug!(
                "出力追加: address={}, value={}",
                destination.address,
                destination.amount.to_sat()
            );
        }

        let tx = Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        };
        log::info!("トランザクション構築完了: {} バイト", tx.size());
        Ok(tx)
    }
}

/// 構築を許可してよいかを判定する。
pub fn validate_build_request(
    sending: &[SendingAddress],
    selected: &[Utxo],
    destinations: &[Destination],
    summary: &FeeSummary,
) -> Result<(), ValidationError> {
    if sending.is_empty() {
        return Err(ValidationError::NoSendingAddresses);
    }
    if selected.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    if destinations.is_empty() {
        return Err(ValidationError::NoDestinations);
    }
    if !summary.is_buildable() {
        return Err(ValidationError::NegativeFee {
            available: summary.total_selected.to_sat(),
            required: summary.total_to_send.to_sat(),
        });
    }
    Ok(())
}

/// 取得済みUTXO一覧から、指定したインデックス順に選択する。未指定なら全件。
///
/// どちらの場合も同じアウトポイントが2回現れたら `DuplicateSelection`。
pub fn select_utxos(
    fetched: &[Utxo],
    indices: Option<&[usize]>,
) -> Result<Vec<Utxo>, ValidationError> {
    let Some(indices) = indices else {
        let mut selected = Vec::with_capacity(fetched.len());
        for utxo in fetched {
            push_unique(&mut selected, utxo)?;
        }
        return Ok(selected);
    };

    let mut selected = Vec::with_capacity(indices.len());
    for &index in indices {
        let utxo = fetched.get(index).ok_or(ValidationError::UnknownUtxoIndex {
            index,
            len: fetched.len(),
        })?;
        push_unique(&mut selected, utxo)?;
    }
    Ok(selected)
}

fn push_unique(selected: &mut Vec<Utxo>, utxo: &Utxo) -> Result<(), ValidationError> {
    if selected.iter().any(|u| u.out_point == utxo.out_point) {
        return Err(ValidationError::DuplicateSelection {
            txid: utxo.out_point.txid.to_string(),
            vout: utxo.out_point.vout,
        });
    }
    selected.push(utxo.clone());
    Ok(())
}
