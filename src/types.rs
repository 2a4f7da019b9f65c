use bitcoin::{Address, AddressType, Amount, Network, OutPoint, Txid};
use std::fmt;
use std::str::FromStr;

use crate::error::{ScriptError, ValidationError};
use crate::fee::sum_amounts;

/// 出力を将来使うウォレットの種類。スクリプトの形を決める。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum WalletType {
    /// 通常のウォレット。入力の解除スクリプトは空。
    #[default]
    Normal,
    /// オフライン署名用。各入力に使用するP2PKHスクリプトを仮置きする。
    ColdStorage,
}

impl WalletType {
    pub const ALL: [WalletType; 2] = [WalletType::Normal, WalletType::ColdStorage];

    pub fn name(self) -> &'static str {
        match self {
            WalletType::Normal => "normal",
            WalletType::ColdStorage => "cold-storage",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WalletType {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(WalletType::Normal),
            "cold-storage" | "cold_storage" | "coldstorage" => Ok(WalletType::ColdStorage),
            other => Err(ScriptError::UnsupportedWalletType(other.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScriptType {
    P2PKH,
    P2SH,
    P2WPKH,
    P2WSH,
    P2TR,
}

impl ScriptType {
    pub fn from_address(address: &Address) -> Result<Self, ScriptError> {
        match address.address_type() {
            Some(AddressType::P2pkh) => Ok(ScriptType::P2PKH),
            Some(AddressType::P2sh) => Ok(ScriptType::P2SH),
            Some(AddressType::P2wpkh) => Ok(ScriptType::P2WPKH),
            Some(AddressType::P2wsh) => Ok(ScriptType::P2WSH),
            Some(AddressType::P2tr) => Ok(ScriptType::P2TR),
            other => Err(ScriptError::UnsupportedAddressFormat {
                address: address.to_string(),
                reason: format!("スクリプト種別を判定できません: {:?}", other),
            }),
        }
    }

    /// この種別のロックスクリプトのバイト長。
    pub fn script_len(self) -> usize {
        match self {
            ScriptType::P2PKH => 25,
            ScriptType::P2SH => 23,
            ScriptType::P2WPKH => 22,
            ScriptType::P2WSH | ScriptType::P2TR => 34,
        }
    }
}

/// アドレス文字列を検証し、指定ネットワークのアドレスとして返す。
pub fn parse_address(address: &str, network: Network) -> Result<Address, ValidationError> {
    Address::from_str(address)
        .and_then(|addr| addr.require_network(network))
        .map_err(|e| ValidationError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// 過去のトランザクションで受け取った未使用出力。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub out_point: OutPoint,
    pub address: Address,
    pub amount: Amount,
}

impl Utxo {
    pub fn new(
        txid: &str,
        vout: u32,
        address: &str,
        value_sats: u64,
        network: Network,
    ) -> Result<Self, ValidationError> {
        let txid = Txid::from_str(txid).map_err(|e| ValidationError::InvalidTxid {
            txid: txid.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Utxo {
            out_point: OutPoint::new(txid, vout),
            address: parse_address(address, network)?,
            amount: Amount::from_sat(value_sats),
        })
    }
}

/// 送金元アドレスと、取得済みUTXOから集計した残高。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendingAddress {
    pub address: Address,
    pub balance: Amount,
}

impl SendingAddress {
    pub fn new(address: &str, network: Network) -> Result<Self, ValidationError> {
        Ok(SendingAddress {
            address: parse_address(address, network)?,
            balance: Amount::ZERO,
        })
    }

    /// 取得したUTXO一覧から各アドレスの残高を計算し直す。以前の残高は破棄する。
    pub fn refresh_balances(
        addresses: &mut [SendingAddress],
        utxos: &[Utxo],
    ) -> Result<(), ValidationError> {
        for sending in addresses.iter_mut() {
            sending.balance = sum_amounts(
                utxos
                    .iter()
                    .filter(|u| u.address == sending.address)
                    .map(|u| u.amount),
            )?;
        }
        Ok(())
    }

    pub fn total_balance(addresses: &[SendingAddress]) -> Result<Amount, ValidationError> {
        sum_amounts(addresses.iter().map(|a| a.balance))
    }
}

/// 送金先。アドレスと正の送金額を持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub address: Address,
    pub amount: Amount,
}

impl Destination {
    pub fn new(address: &str, value_sats: u64, network: Network) -> Result<Self, ValidationError> {
        let address = parse_address(address, network)?;
        if value_sats == 0 {
            return Err(ValidationError::NonPositiveAmount {
                address: address.to_string(),
            });
        }
        let amount = Amount::from_sat(value_sats);
        if amount > Amount::MAX_MONEY {
            return Err(ValidationError::AmountOutOfRange {
                address: address.to_string(),
                sats: value_sats,
            });
        }
        Ok(Destination { address, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2PKH_ADDR: &str = "mtveoXKcb1EjpspMmhPAJ6RkGeewbzWYDd";
    const P2SH_ADDR: &str = "2Mvn45VLAhg1TVjFrKjuyMRkoapoPNQS5Mf";
    const P2WPKH_ADDR: &str = "tb1qtzexd3yncgyacpz0775h5u48lvjdz98g29fq05";
    const P2TR_ADDR: &str = "tb1psmsr8rc6jwl47xsv4zahnt39m2peexxhxrfvprqpw86yf55rkzgq70ycww";

    #[test]
    fn wallet_type_parses_known_names() {
        assert_eq!("normal".parse::<WalletType>().unwrap(), WalletType::Normal);
        assert_eq!("Cold-Storage".parse::<WalletType>().unwrap(), WalletType::ColdStorage);
        for wallet in WalletType::ALL {
            assert_eq!(wallet.to_string().parse::<WalletType>().unwrap(), wallet);
        }
        assert_eq!(WalletType::default(), WalletType::Normal);
    }

    #[test]
    fn wallet_type_rejects_unknown_name() {
        let err = "electrum".parse::<WalletType>().unwrap_err();
        assert_eq!(err, ScriptError::UnsupportedWalletType("electrum".to_string()));
    }

    #[test]
    fn script_type_follows_address_kind() {
        let cases = [
            (P2PKH_ADDR, ScriptType::P2PKH),
            (P2SH_ADDR, ScriptType::P2SH),
            (P2WPKH_ADDR, ScriptType::P2WPKH),
            (P2TR_ADDR, ScriptType::P2TR),
        ];
        for (addr, expected) in cases {
            let address = parse_address(addr, Network::Testnet).unwrap();
            assert_eq!(ScriptType::from_address(&address).unwrap(), expected, "{addr}");
        }
    }

    #[test]
    fn address_on_wrong_network_is_rejected() {
        let err = parse_address(P2PKH_ADDR, Network::Bitcoin).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAddress { .. }));
    }

    #[test]
    fn destination_requires_positive_amount() {
        let err = Destination::new(P2PKH_ADDR, 0, Network::Testnet).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount { .. }));

        let too_much = Amount::MAX_MONEY.to_sat() + 1;
        let err = Destination::new(P2PKH_ADDR, too_much, Network::Testnet).unwrap_err();
        assert!(matches!(err, ValidationError::AmountOutOfRange { .. }));

        let dest = Destination::new(P2PKH_ADDR, 27_600, Network::Testnet).unwrap();
        assert_eq!(dest.amount, Amount::from_sat(27_600));
    }

    #[test]
    fn destination_rejects_malformed_address() {
        let err = Destination::new("not-an-address", 1_000, Network::Testnet).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAddress { .. }));
    }

    #[test]
    fn utxo_rejects_malformed_txid() {
        let err = Utxo::new("zz", 0, P2PKH_ADDR, 1_000, Network::Testnet).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTxid { .. }));
    }

    #[test]
    fn balances_are_recomputed_from_fetched_utxos() {
        let txid = "57bded0a2734620ddd416f59d98260dc8646a990c5a901acc00a3d17a911e174";
        let utxos = vec![
            Utxo::new(txid, 0, P2PKH_ADDR, 10_000, Network::Testnet).unwrap(),
            Utxo::new(txid, 1, P2PKH_ADDR, 5_000, Network::Testnet).unwrap(),
            Utxo::new(txid, 2, P2SH_ADDR, 7_000, Network::Testnet).unwrap(),
        ];
        let mut sending = vec![
            SendingAddress::new(P2PKH_ADDR, Network::Testnet).unwrap(),
            SendingAddress::new(P2SH_ADDR, Network::Testnet).unwrap(),
            SendingAddress::new(P2WPKH_ADDR, Network::Testnet).unwrap(),
        ];
        SendingAddress::refresh_balances(&mut sending, &utxos).unwrap();
        assert_eq!(sending[0].balance, Amount::from_sat(15_000));
        assert_eq!(sending[1].balance, Amount::from_sat(7_000));
        assert_eq!(sending[2].balance, Amount::ZERO);
        assert_eq!(
            SendingAddress::total_balance(&sending).unwrap(),
            Amount::from_sat(22_000)
        );

        SendingAddress::refresh_balances(&mut sending, &utxos[2..]).unwrap();
        assert_eq!(sending[0].balance, Amount::ZERO);
    }
}
