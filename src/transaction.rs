//! 未署名トランザクションのモデルと、レガシー(segwit以前)形式のシリアライズ。
//!
//! | フィールド     | サイズ                          |
//! |----------------|---------------------------------|
//! | version        | 4 bytes (LE)                    |
//! | input count    | compact-size                    |
//! | inputs         | txid 32 + index 4 + script + 4  |
//! | output count   | compact-size                    |
//! | outputs        | amount 8 + script               |
//! | lock_time      | 4 bytes (LE)                    |

use bitcoin::consensus::encode::{self, Encodable, VarInt};
use bitcoin::hashes::{Hash, sha256d};
use bitcoin::io;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Txid};

use crate::encode::Reader;
use crate::error::ParseError;

/// 入力の最小サイズ (空スクリプト)。デコード時の事前確保の上限に使う。
const MIN_INPUT_SIZE: usize = 32 + 4 + 1 + 4;
const MIN_OUTPUT_SIZE: usize = 8 + 1;

/// 長さ接頭辞 (compact-size) を含めたスクリプトのバイト数。
pub(crate) fn script_size(script_len: usize) -> usize {
    VarInt::from(script_len).size() + script_len
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub previous_output: OutPoint,
    /// 未署名の間は空、またはウォレットタイプ別の仮スクリプト。
    pub script_sig: ScriptBuf,
    pub sequence: Sequence,
}

impl TxInput {
    fn size(&self) -> usize {
        36 + script_size(self.script_sig.len()) + 4
    }
}

impl Encodable for TxInput {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        // OutPointのtxidは内部バイト順 (表示用16進数の逆順) で書かれる
        let mut len = self.previous_output.consensus_encode(w)?;
        len += self.script_sig.consensus_encode(w)?;
        len += self.sequence.consensus_encode(w)?;
        Ok(len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub value: Amount,
    pub script_pubkey: ScriptBuf,
}

impl TxOutput {
    fn size(&self) -> usize {
        8 + script_size(self.script_pubkey.len())
    }
}

impl Encodable for TxOutput {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = self.value.to_sat().consensus_encode(w)?;
        len += self.script_pubkey.consensus_encode(w)?;
        Ok(len)
    }
}

/// 構築ごとに新しく作られ、シリアライズ後は変更しない。
/// 編集する場合はデコードし直した別の値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Encodable for Transaction {
    fn consensus_encode<W: io::Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = self.version.consensus_encode(w)?;
        len += VarInt::from(self.inputs.len()).consensus_encode(w)?;
        for input in &self.inputs {
            len += input.consensus_encode(w)?;
        }
        len += VarInt::from(self.outputs.len()).consensus_encode(w)?;
        for output in &self.outputs {
            len += output.consensus_encode(w)?;
        }
        len += self.lock_time.consensus_encode(w)?;
        Ok(len)
    }
}

impl Transaction {
    /// シリアライズ後のバイト数。
    pub fn size(&self) -> usize {
        4 + VarInt::from(self.inputs.len()).size()
            + self.inputs.iter().map(TxInput::size).sum::<usize>()
            + VarInt::from(self.outputs.len()).size()
            + self.outputs.iter().map(TxOutput::size).sum::<usize>()
            + 4
    }

    pub fn serialize(&self) -> Vec<u8> {
        encode::serialize(self)
    }

    /// 小文字16進数、区切りなし。
    pub fn to_hex(&self) -> String {
        encode::serialize_hex(self)
    }

    /// バイト列全体をちょうど1つのトランザクションとして読む。
    pub fn deserialize(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut reader = Reader::new(bytes);

        let version = reader.read_u32_le()?;

        let input_count = reader.read_compact_size()?;
        let mut inputs =
            Vec::with_capacity(capacity_hint(input_count, &reader, MIN_INPUT_SIZE));
        for _ in 0..input_count {
            let txid = Txid::from_byte_array(reader.read_array::<32>()?);
            let vout = reader.read_u32_le()?;
            let script_sig = ScriptBuf::from_bytes(reader.read_script_bytes()?.to_vec());
            let sequence = Sequence::from_consensus(reader.read_u32_le()?);
            inputs.push(TxInput {
                previous_output: OutPoint::new(txid, vout),
                script_sig,
                sequence,
            });
        }

        let output_count = reader.read_compact_size()?;
        let mut outputs =
            Vec::with_capacity(capacity_hint(output_count, &reader, MIN_OUTPUT_SIZE));
        for _ in 0..output_count {
            let value = Amount::from_sat(reader.read_u64_le()?);
            let script_pubkey = ScriptBuf::from_bytes(reader.read_script_bytes()?.to_vec());
            outputs.push(TxOutput {
                value,
                script_pubkey,
            });
        }

        let lock_time = reader.read_u32_le()?;

        if reader.remaining() != 0 {
            return Err(ParseError::TrailingData {
                remaining: reader.remaining(),
            });
        }

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, ParseError> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::deserialize(&bytes)
    }

    /// 表示用バイト順のtxid (シリアライズ結果のdouble SHA-256)。
    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&self.serialize()))
    }
}

fn capacity_hint(count: u64, reader: &Reader<'_>, min_item_size: usize) -> usize {
    let max_items = reader.remaining() / min_item_size;
    usize::try_from(count).map_or(max_items, |n| n.min(max_items))
}
