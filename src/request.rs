//! リクエストファイルから構築までの流れ。
//!
//! 選択や送金先が変わったら値を作り直し、`fee_summary` と `build` を呼び直す。
//! 以前の計算結果は保持しない。

use bitcoin::{Amount, Network};
use serde::Serialize;

use crate::builder::{TxBuilder, select_utxos, validate_build_request};
use crate::config::InputConfig;
use crate::error::{AppError, ProviderError, ValidationError};
use crate::fee::FeeSummary;
use crate::provider::{StaticUtxoProvider, UtxoProvider};
use crate::transaction::Transaction;
use crate::types::{Destination, SendingAddress, Utxo, WalletType};

#[derive(Debug, Clone)]
pub struct TxRequest {
    pub network: Network,
    pub version: u32,
    pub lock_time: u32,
    pub wallet_type: WalletType,
    pub sending: Vec<SendingAddress>,
    pub fetched: Vec<Utxo>,
    pub selected: Vec<Utxo>,
    pub destinations: Vec<Destination>,
}

/// `estimate` コマンドの出力。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub wallet_type: String,
    pub input_count: usize,
    pub output_count: usize,
    #[serde(rename = "totalBalanceSats", with = "bitcoin::amount::serde::as_sat")]
    pub total_balance: Amount,
    #[serde(flatten)]
    pub summary: FeeSummary,
    pub fee_per_byte_label: String,
    pub buildable: bool,
}

impl TxRequest {
    /// リクエストファイルのUTXO一覧を取得元として使う。
    pub fn from_config(config: &InputConfig, network: Network) -> Result<Self, AppError> {
        let utxos = config
            .utxos
            .iter()
            .map(|u| Utxo::new(&u.txid, u.vout, &u.address, u.value_sats, network))
            .collect::<Result<Vec<_>, _>>()?;
        let provider = StaticUtxoProvider::new(utxos);
        let sending = parse_sending(config, network)?;

        let fetched = if sending.is_empty() {
            Vec::new()
        } else {
            provider.strict_fetch(&sending).map_err(provider_error)?
        };
        Self::assemble(config, network, sending, fetched)
    }

    pub fn with_provider<P: UtxoProvider>(
        config: &InputConfig,
        network: Network,
        provider: &P,
    ) -> Result<Self, AppError> {
        let sending = parse_sending(config, network)?;
        let fetched = if sending.is_empty() {
            Vec::new()
        } else {
            provider.fetch_utxos(&sending).map_err(provider_error)?
        };
        Self::assemble(config, network, sending, fetched)
    }

    fn assemble(
        config: &InputConfig,
        network: Network,
        mut sending: Vec<SendingAddress>,
        fetched: Vec<Utxo>,
    ) -> Result<Self, AppError> {
        let wallet_type: WalletType = config.wallet_type.parse()?;
        SendingAddress::refresh_balances(&mut sending, &fetched)?;
        let selected = select_utxos(&fetched, config.selected_utxos.as_deref())?;
        let destinations = config
            .destinations
            .iter()
            .map(|d| Destination::new(&d.address, d.value_sats, network))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "UTXO {} 件取得, {} 件選択, 送金先 {} 件",
            fetched.len(),
            selected.len(),
            destinations.len()
        );

        Ok(TxRequest {
            network,
            version: config.version,
            lock_time: config.lock_time,
            wallet_type,
            sending,
            fetched,
            selected,
            destinations,
        })
    }

    pub fn builder(&self) -> TxBuilder {
        TxBuilder::new(self.wallet_type)
    }

    pub fn total_balance(&self) -> Result<Amount, ValidationError> {
        SendingAddress::total_balance(&self.sending)
    }

    pub fn fee_summary(&self) -> Result<FeeSummary, AppError> {
        let size = self
            .builder()
            .estimate_size(self.selected.len(), &self.destinations)?;
        Ok(FeeSummary::new(&self.selected, &self.destinations, size)?)
    }

    pub fn report(&self) -> Result<EstimateReport, AppError> {
        let summary = self.fee_summary()?;
        Ok(EstimateReport {
            wallet_type: self.wallet_type.to_string(),
            input_count: self.selected.len(),
            output_count: self.destinations.len(),
            total_balance: self.total_balance()?,
            fee_per_byte_label: summary.fee_per_byte_label(),
            buildable: summary.is_buildable(),
            summary,
        })
    }

    /// 構築条件を確認してから未署名トランザクションを組み立てる。
    pub fn build(&self) -> Result<Transaction, AppError> {
        let summary = self.fee_summary()?;
        let guard =
            validate_build_request(&self.sending, &self.selected, &self.destinations, &summary);
        if let Err(e) = guard {
            log::warn!("構築条件を満たしていません: {}", e);
            return Err(e.into());
        }
        log::info!(
            "手数料 {} sats, 推定サイズ {} バイト ({})",
            summary.fee.to_sat(),
            summary.estimated_size,
            summary.fee_per_byte_label()
        );
        Ok(self
            .builder()
            .build(self.version, &self.selected, &self.destinations, self.lock_time)?)
    }
}

fn parse_sending(
    config: &InputConfig,
    network: Network,
) -> Result<Vec<SendingAddress>, ValidationError> {
    config
        .sending_addresses
        .iter()
        .map(|a| SendingAddress::new(a, network))
        .collect()
}

fn provider_error(errors: Vec<ProviderError>) -> AppError {
    AppError::UtxoProvider(errors.iter().map(ToString::to_string).collect())
}
