use bitcoin::Network as BitcoinNetwork;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::builder::{DEFAULT_LOCK_TIME, DEFAULT_VERSION};
use crate::error::AppError;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    /// "bitcoin", "testnet", "signet", "regtest"。省略時はCLIの指定に従う。
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_lock_time")]
    pub lock_time: u32,
    #[serde(default = "default_wallet_type")]
    pub wallet_type: String,
    pub sending_addresses: Vec<String>,
    pub utxos: Vec<UtxoInput>,
    /// `utxos` へのインデックス。省略時は取得した全UTXOを順に使う。
    #[serde(default)]
    pub selected_utxos: Option<Vec<usize>>,
    pub destinations: Vec<DestinationDef>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UtxoInput {
    pub txid: String,
    pub vout: u32,
    pub address: String,
    pub value_sats: u64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDef {
    pub address: String,
    pub value_sats: u64,
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

fn default_lock_time() -> u32 {
    DEFAULT_LOCK_TIME
}

fn default_wallet_type() -> String {
    "normal".to_string()
}

pub fn parse_network(network_str: &str) -> Result<BitcoinNetwork, AppError> {
    match network_str.to_lowercase().as_str() {
        "bitcoin" | "mainnet" => Ok(BitcoinNetwork::Bitcoin),
        "testnet" => Ok(BitcoinNetwork::Testnet),
        "signet" => Ok(BitcoinNetwork::Signet),
        "regtest" => Ok(BitcoinNetwork::Regtest),
        s => Err(AppError::InputValidation(format!("無効なネットワークが指定されました: {}", s))),
    }
}

impl InputConfig {
    /// ファイル側のネットワーク指定がCLIの指定と一致するか確認する。
    pub fn check_network(&self, cli_network: BitcoinNetwork) -> Result<(), AppError> {
        let Some(file_network) = self.network.as_deref() else {
            return Ok(());
        };
        if parse_network(file_network)? != cli_network {
            return Err(AppError::NetworkMismatch {
                cli_network: format!("{:?}", cli_network),
                file_network: file_network.to_string(),
            });
        }
        Ok(())
    }

    pub fn from_json(content: &str, file_path: &Path) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|e| {
            log::error!("入力JSONのパースに失敗しました。");
            AppError::JsonParse {
                file_path: file_path.to_path_buf(),
                source: e,
            }
        })
    }

    pub fn load(file_path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(file_path).map_err(|e| {
            log::error!("入力ファイルの読み込みに失敗しました: {:?}", file_path);
            AppError::Io(e)
        })?;
        let config = Self::from_json(&content, file_path)?;
        log::debug!("入力設定ファイルのパース成功: {:?}", config);
        Ok(config)
    }
}
