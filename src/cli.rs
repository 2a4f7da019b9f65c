use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// 使用するネットワーク ("bitcoin", "testnet", "signet", "regtest")
    #[clap(short, long, value_parser, default_value = "testnet", global = true)]
    pub network: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 未署名トランザクションを構築し、16進数で出力する
    Build {
        /// 送金元・UTXO・送金先を記述したJSONファイルへのパス
        #[clap(short, long, value_parser)]
        input_file: PathBuf,

        /// 生成されたraw transaction hexを保存するファイルへのパス
        #[clap(short, long, value_parser)]
        output_file: Option<PathBuf>,
    },

    /// 手数料・推定サイズ・satoshi/byteをJSONで表示する
    Estimate {
        #[clap(short, long, value_parser)]
        input_file: PathBuf,
    },

    /// raw transaction hexをデコードしてJSONで表示する
    Decode {
        /// 16進数文字列
        #[clap(
            long,
            value_parser,
            required_unless_present = "input_file",
            conflicts_with = "input_file"
        )]
        hex: Option<String>,

        /// 16進数文字列を含むファイルへのパス
        #[clap(short, long, value_parser)]
        input_file: Option<PathBuf>,
    },

    /// 編集したJSONをraw transaction hexに戻す
    Encode {
        #[clap(short, long, value_parser)]
        input_file: PathBuf,

        #[clap(short, long, value_parser)]
        output_file: Option<PathBuf>,
    },
}
