//! 取り込み・編集用のJSON表現。
//!
//! `decode` で得たビューを書き換え、`encode` で同じシリアライザを通して
//! 16進数に戻す。`txid`・`size`・`address` は表示専用で、エンコード時は無視する。

use bitcoin::{Address, Amount, Network, OutPoint, ScriptBuf, Sequence, Txid};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, ParseError, ValidationError};
use crate::transaction::{Transaction, TxInput, TxOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub version: u32,
    pub lock_time: u32,
    pub inputs: Vec<InputView>,
    pub outputs: Vec<OutputView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputView {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub script_sig: String,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputView {
    pub value_sats: u64,
    pub script_pub_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl TransactionView {
    pub fn from_transaction(tx: &Transaction, network: Network) -> Self {
        TransactionView {
            txid: Some(tx.txid().to_string()),
            size: Some(tx.size()),
            version: tx.version,
            lock_time: tx.lock_time,
            inputs: tx
                .inputs
                .iter()
                .map(|input| InputView {
                    txid: input.previous_output.txid.to_string(),
                    vout: input.previous_output.vout,
                    script_sig: input.script_sig.to_hex_string(),
                    sequence: input.sequence.to_consensus_u32(),
                })
                .collect(),
            outputs: tx
                .outputs
                .iter()
                .map(|output| OutputView {
                    value_sats: output.value.to_sat(),
                    script_pub_key: output.script_pubkey.to_hex_string(),
                    address: Address::from_script(&output.script_pubkey, network)
                        .ok()
                        .map(|a| a.to_string()),
                })
                .collect(),
        }
    }

    pub fn to_transaction(&self) -> Result<Transaction, AppError> {
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let txid = Txid::from_str(&input.txid).map_err(|e| ValidationError::InvalidTxid {
                txid: input.txid.clone(),
                reason: e.to_string(),
            })?;
            inputs.push(TxInput {
                previous_output: OutPoint::new(txid, input.vout),
                script_sig: script_from_hex(&input.script_sig)?,
                sequence: Sequence::from_consensus(input.sequence),
            });
        }

        let mut outputs = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            outputs.push(TxOutput {
                value: Amount::from_sat(output.value_sats),
                script_pubkey: script_from_hex(&output.script_pub_key)?,
            });
        }

        Ok(Transaction {
            version: self.version,
            inputs,
            outputs,
            lock_time: self.lock_time,
        })
    }
}

fn script_from_hex(s: &str) -> Result<ScriptBuf, ParseError> {
    Ok(ScriptBuf::from_bytes(hex::decode(s)?))
}
