use std::path::PathBuf;
use thiserror::Error;

/// 外部から渡された生トランザクションのデコード失敗。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("データが途中で終わっています: 必要 {needed} バイト, 残り {remaining} バイト")]
    UnexpectedEndOfData { needed: usize, remaining: usize },

    #[error("スクリプト長が不正です: 宣言 {declared} バイト, 残り {remaining} バイト")]
    InvalidScriptLength { declared: u64, remaining: usize },

    #[error("locktimeの後に余分なデータがあります: {remaining} バイト")]
    TrailingData { remaining: usize },

    #[error("非正規のcompact-size表現です: 値 {value}")]
    NonCanonicalVarInt { value: u64 },

    #[error("16進数のデコードに失敗しました: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// スクリプトテンプレート解決時のエラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("未対応のアドレス形式です ({address}): {reason}")]
    UnsupportedAddressFormat { address: String, reason: String },

    #[error("未対応のウォレットタイプです: {0}")]
    UnsupportedWalletType(String),
}

/// 構築前に呼び出し側で検出される入力エラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("送金元アドレスが指定されていません")]
    NoSendingAddresses,

    #[error("UTXOが1つも選択されていません")]
    EmptySelection,

    #[error("送金先が指定されていません")]
    NoDestinations,

    #[error("手数料が負になります: 選択済み {available} sats, 送金額 {required} sats")]
    NegativeFee { available: u64, required: u64 },

    #[error("アドレスが不正です ({address}): {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("送金額は正の値である必要があります ({address})")]
    NonPositiveAmount { address: String },

    #[error("送金額が範囲外です ({address}): {sats} sats")]
    AmountOutOfRange { address: String, sats: u64 },

    #[error("金額の合計がオーバーフローしました")]
    AmountOverflow,

    #[error("無効なTXID形式 ({txid}): {reason}")]
    InvalidTxid { txid: String, reason: String },

    #[error("UTXOインデックス {index} は範囲外です (UTXO数 {len})")]
    UnknownUtxoIndex { index: usize, len: usize },

    #[error("同じUTXOが重複して選択されています: {txid}:{vout}")]
    DuplicateSelection { txid: String, vout: u32 },
}

/// UTXO取得元が返すエラー。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("UTXOを取得するアドレスが指定されていません")]
    NoAddresses,

    #[error("UTXO {txid}:{vout} の所有アドレス {address} は要求されたアドレスに含まれません")]
    ForeignOutput {
        txid: String,
        vout: u32,
        address: String,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSONパースエラー ファイル: {file_path:?}, 詳細: {source}")]
    JsonParse {
        file_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON出力エラー: {0}")]
    JsonRender(#[from] serde_json::Error),

    #[error("トランザクションのデコードエラー: {0}")]
    Parse(#[from] ParseError),

    #[error("スクリプト解決エラー: {0}")]
    Script(#[from] ScriptError),

    #[error("入力検証エラー: {0}")]
    Validation(#[from] ValidationError),

    #[error("ネットワーク不整合: CLI指定 ({cli_network}) vs 入力ファイル ({file_network})")]
    NetworkMismatch {
        cli_network: String,
        file_network: String,
    },

    #[error("入力検証エラー: {0}")]
    InputValidation(String),

    #[error("UTXOの取得に失敗しました: {}", .0.join("; "))]
    UtxoProvider(Vec<String>),
}
