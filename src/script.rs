//! ウォレットタイプとアドレスからスクリプトテンプレートを決定する。

use bitcoin::{Address, ScriptBuf};

use crate::error::ScriptError;
use crate::types::{ScriptType, Utxo, WalletType};

/// 送金先アドレスのロックスクリプトを返す。
///
/// 出力テンプレートはアドレス種別 (P2PKH / P2SH / P2WPKH / P2WSH / P2TR) だけで決まり、
/// ウォレットタイプには依存しない。ウォレットタイプが変えるのは入力側の
/// `resolve_input_placeholder` のみ。種別を判定できないアドレス (witness v2 以降など) は
/// `UnsupportedAddressFormat`。
pub fn resolve_output_script(
    address: &Address,
    _wallet_type: WalletType,
) -> Result<ScriptBuf, ScriptError> {
    let script_type = ScriptType::from_address(address)?;
    let script = address.script_pubkey();
    debug_assert_eq!(script.len(), script_type.script_len());
    Ok(script)
}

/// 未署名入力に置く解除スクリプトを返す。
///
/// `Normal` では空。`ColdStorage` では署名側が参照する使用済み出力の
/// P2PKHスクリプトをそのまま入れる。
pub fn resolve_input_placeholder(
    utxo: &Utxo,
    wallet_type: WalletType,
) -> Result<ScriptBuf, ScriptError> {
    match wallet_type {
        WalletType::Normal => Ok(ScriptBuf::new()),
        WalletType::ColdStorage => match ScriptType::from_address(&utxo.address)? {
            ScriptType::P2PKH => Ok(utxo.address.script_pubkey()),
            other => Err(ScriptError::UnsupportedAddressFormat {
                address: utxo.address.to_string(),
                reason: format!(
                    "cold-storage ウォレットはP2PKH入力のみ対応しています ({:?})",
                    other
                ),
            }),
        },
    }
}

/// `resolve_input_placeholder` が返すスクリプトの長さ。
pub fn input_placeholder_len(wallet_type: WalletType) -> usize {
    match wallet_type {
        WalletType::Normal => 0,
        WalletType::ColdStorage => ScriptType::P2PKH.script_len(),
    }
}
