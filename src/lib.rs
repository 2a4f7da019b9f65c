//! 未署名のBitcoinトランザクションを組み立て、レガシー形式でシリアライズする。
//!
//! 構築処理は純粋な関数の集まりで、I/Oも共有状態も持たない。
//! UTXOの取得は `provider::UtxoProvider` の実装側に任せる。

pub mod builder;
pub mod config;
pub mod encode;
pub mod error;
pub mod estimate;
pub mod fee;
pub mod provider;
pub mod request;
pub mod script;
pub mod transaction;
pub mod types;
pub mod view;

pub use builder::{TxBuilder, select_utxos, validate_build_request};
pub use error::{AppError, ParseError, ProviderError, ScriptError, ValidationError};
pub use estimate::estimate_size;
pub use fee::FeeSummary;
pub use provider::{StaticUtxoProvider, UtxoProvider};
pub use request::TxRequest;
pub use script::resolve_output_script;
pub use transaction::{Transaction, TxInput, TxOutput};
pub use types::{Destination, SendingAddress, Utxo, WalletType};
