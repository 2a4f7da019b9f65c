//! UTXOの取得元。ネットワーク越しの取得はこのトレイトの実装側が担当し、
//! 構築処理は取得済みの一覧だけを受け取る。

use crate::error::ProviderError;
use crate::types::{SendingAddress, Utxo};

pub trait UtxoProvider {
    /// 指定アドレスが所有するUTXOを返す。取得のたびに一覧全体を置き換える。
    fn fetch_utxos(&self, addresses: &[SendingAddress]) -> Result<Vec<Utxo>, Vec<ProviderError>>;
}

/// 手元に既にあるUTXO一覧 (リクエストファイルなど) から返す実装。
#[derive(Debug, Clone, Default)]
pub struct StaticUtxoProvider {
    utxos: Vec<Utxo>,
}

impl StaticUtxoProvider {
    pub fn new(utxos: Vec<Utxo>) -> Self {
        StaticUtxoProvider { utxos }
    }

    /// 所有者が送金元に含まれないUTXOをエラーとして扱う。
    pub fn strict_fetch(
        &self,
        addresses: &[SendingAddress],
    ) -> Result<Vec<Utxo>, Vec<ProviderError>> {
        let errors: Vec<ProviderError> = self
            .utxos
            .iter()
            .filter(|u| !addresses.iter().any(|a| a.address == u.address))
            .map(|u| ProviderError::ForeignOutput {
                txid: u.out_point.txid.to_string(),
                vout: u.out_point.vout,
                address: u.address.to_string(),
            })
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        self.fetch_utxos(addresses)
    }
}

impl UtxoProvider for StaticUtxoProvider {
    fn fetch_utxos(&self, addresses: &[SendingAddress]) -> Result<Vec<Utxo>, Vec<ProviderError>> {
        if addresses.is_empty() {
            return Err(vec![ProviderError::NoAddresses]);
        }
        let utxos: Vec<Utxo> = self
            .utxos
            .iter()
            .filter(|u| addresses.iter().any(|a| a.address == u.address))
            .cloned()
            .collect();
        log::debug!("{} 件中 {} 件のUTXOを返します", self.utxos.len(), utxos.len());
        Ok(utxos)
    }
}
