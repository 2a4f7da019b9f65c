use std::path::Path;

use bitcoin::hashes::Hash;
use bitcoin::{Amount, Network, OutPoint, Txid};

use bitcoin_unsigned_tx::config::InputConfig;
use bitcoin_unsigned_tx::types::parse_address;
use bitcoin_unsigned_tx::{
    AppError, Destination, FeeSummary, ParseError, ProviderError, SendingAddress, Transaction,
    TxBuilder, TxRequest, Utxo, UtxoProvider, WalletType, estimate_size,
};

const SOURCE: &str = "mwL7xEgwbiF9yRVJEgLsCjgzGofG1MtsTH";
const TARGET: &str = "mtveoXKcb1EjpspMmhPAJ6RkGeewbzWYDd";

fn utxo(seed: u32, sats: u64) -> Utxo {
    let mut txid = [0u8; 32];
    txid[..4].copy_from_slice(&seed.to_le_bytes());
    Utxo {
        out_point: OutPoint::new(Txid::from_byte_array(txid), seed % 7),
        address: parse_address(SOURCE, Network::Testnet).unwrap(),
        amount: Amount::from_sat(sats),
    }
}

fn dest(sats: u64) -> Destination {
    Destination::new(TARGET, sats, Network::Testnet).unwrap()
}

#[test]
fn scenario_single_payment() {
    let selected = [utxo(1, 100_000)];
    let destinations = [dest(90_000)];
    let builder = TxBuilder::new(WalletType::Normal);

    let tx = builder.build(1, &selected, &destinations, 0).unwrap();
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 1);

    let size = estimate_size(1, &destinations, WalletType::Normal).unwrap();
    assert_eq!(tx.serialize().len(), size);

    let summary = FeeSummary::new(&selected, &destinations, size).unwrap();
    assert_eq!(summary.fee.to_sat(), 10_000);
    assert_eq!(summary.fee_per_byte, 10_000 / size as i64);

    assert_eq!(Transaction::from_hex(&tx.to_hex()).unwrap(), tx);
}

#[test]
fn truncated_transaction_reports_end_of_data() {
    let tx = TxBuilder::default()
        .build(1, &[utxo(1, 100_000), utxo(2, 5_000)], &[dest(90_000), dest(1_000)], 0)
        .unwrap();
    let bytes = tx.serialize();
    assert!(matches!(
        Transaction::deserialize(&bytes[..bytes.len() - 1]),
        Err(ParseError::UnexpectedEndOfData { .. })
    ));
}

#[test]
fn output_count_of_253_uses_three_byte_prefix() {
    let destinations: Vec<Destination> = (0..253).map(|_| dest(1_000)).collect();
    let tx = TxBuilder::default()
        .build(1, &[utxo(1, 1_000_000)], &destinations, 0)
        .unwrap();
    let bytes = tx.serialize();
    // version 4 + 入力数 1 + 入力 41
    assert_eq!(&bytes[46..49], &[0xfdu8, 0xfd, 0x00]);
    assert_eq!(bytes.len(), estimate_size(1, &destinations, WalletType::Normal).unwrap());
}

#[test]
fn input_count_of_252_and_65536() {
    let destinations = [dest(1_000)];

    let selected: Vec<Utxo> = (0..252).map(|i| utxo(i, 1_000)).collect();
    let bytes = TxBuilder::default().build(1, &selected, &destinations, 0).unwrap().serialize();
    assert_eq!(bytes[4], 0xfc);
    assert_eq!(bytes.len(), estimate_size(252, &destinations, WalletType::Normal).unwrap());

    let selected: Vec<Utxo> = (0..65_536).map(|i| utxo(i, 1_000)).collect();
    let tx = TxBuilder::default().build(1, &selected, &destinations, 0).unwrap();
    let bytes = tx.serialize();
    assert_eq!(&bytes[4..9], &[0xfeu8, 0x00, 0x00, 0x01, 0x00]);
    assert_eq!(bytes.len(), estimate_size(65_536, &destinations, WalletType::Normal).unwrap());
    assert_eq!(Transaction::deserialize(&bytes).unwrap(), tx);
}

/// 取得のたびに呼び出し回数に応じた一覧を返す取得元。
struct RotatingProvider {
    batches: Vec<Vec<Utxo>>,
    calls: std::cell::Cell<usize>,
}

impl UtxoProvider for RotatingProvider {
    fn fetch_utxos(&self, _addresses: &[SendingAddress]) -> Result<Vec<Utxo>, Vec<ProviderError>> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        self.batches.get(n).cloned().ok_or_else(|| vec![ProviderError::NoAddresses])
    }
}

#[test]
fn later_fetch_replaces_earlier_list() {
    let json = format!(
        r#"{{
            "sendingAddresses": ["{SOURCE}"],
            "utxos": [],
            "destinations": [{{"address": "{TARGET}", "valueSats": 1000}}]
        }}"#
    );
    let config = InputConfig::from_json(&json, Path::new("request.json")).unwrap();
    let provider = RotatingProvider {
        batches: vec![vec![utxo(1, 5_000), utxo(2, 6_000)], vec![utxo(3, 2_000)]],
        calls: std::cell::Cell::new(0),
    };

    let first = TxRequest::with_provider(&config, Network::Testnet, &provider).unwrap();
    assert_eq!(first.total_balance().unwrap(), Amount::from_sat(11_000));
    assert_eq!(first.build().unwrap().inputs.len(), 2);

    let second = TxRequest::with_provider(&config, Network::Testnet, &provider).unwrap();
    assert_eq!(second.total_balance().unwrap(), Amount::from_sat(2_000));
    assert_eq!(second.build().unwrap().inputs.len(), 1);

    let err = TxRequest::with_provider(&config, Network::Testnet, &provider).unwrap_err();
    assert!(matches!(err, AppError::UtxoProvider(_)));
}

#[test]
fn cold_storage_estimate_matches_build() {
    let selected = [utxo(1, 50_000), utxo(2, 50_000), utxo(3, 50_000)];
    let destinations = [
        dest(40_000),
        Destination::new("2Mvn45VLAhg1TVjFrKjuyMRkoapoPNQS5Mf", 40_000, Network::Testnet).unwrap(),
        Destination::new(
            "tb1qtzexd3yncgyacpz0775h5u48lvjdz98g29fq05",
            40_000,
            Network::Testnet,
        )
        .unwrap(),
    ];
    let builder = TxBuilder::new(WalletType::ColdStorage);
    let tx = builder.build(1, &selected, &destinations, 0).unwrap();
    assert_eq!(builder.estimate_size(3, &destinations).unwrap(), tx.size());
    assert_eq!(tx.size(), tx.serialize().len());
    assert!(tx.inputs.iter().all(|i| i.script_sig.is_p2pkh()));
}
