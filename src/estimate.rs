use bitcoin::consensus::encode::VarInt;

use crate::error::ScriptError;
use crate::script::input_placeholder_len;
use crate::transaction::script_size;
use crate::types::{Destination, ScriptType, WalletType};

/// 未署名トランザクションのバイト数を、トランザクションを組み立てずに見積もる。
///
/// 入力はウォレットタイプごとの仮解除スクリプト長、出力はアドレス種別の
/// ロックスクリプト長で数える。入力か出力が空なら 0 を返す。
pub fn estimate_size(
    input_count: usize,
    outputs: &[Destination],
    wallet_type: WalletType,
) -> Result<usize, ScriptError> {
    if input_count == 0 || outputs.is_empty() {
        return Ok(0);
    }

    let input_size = 32 + 4 + script_size(input_placeholder_len(wallet_type)) + 4;

    let mut outputs_size = 0;
    for destination in outputs {
        let script_len = ScriptType::from_address(&destination.address)?.script_len();
        outputs_size += 8 + script_size(script_len);
    }

    Ok(4 + VarInt::from(input_count).size()
        + input_count * input_size
        + VarInt::from(outputs.len()).size()
        + outputs_size
        + 4)
}
