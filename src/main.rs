use clap::Parser;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bitcoin_unsigned_tx::config::{InputConfig, parse_network};
use bitcoin_unsigned_tx::error::AppError;
use bitcoin_unsigned_tx::request::TxRequest;
use bitcoin_unsigned_tx::transaction::Transaction;
use bitcoin_unsigned_tx::view::TransactionView;

mod cli;

use cli::{CliArgs, Command};

fn main() -> Result<(), AppError> {
    env_logger::init();

    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    let cli_network = parse_network(&args.network)?;
    log::info!("指定されたネットワーク: {:?}", cli_network);

    match args.command {
        Command::Build { input_file, output_file } => {
            let config = InputConfig::load(&input_file)?;
            config.check_network(cli_network)?;

            let request = TxRequest::from_config(&config, cli_network)?;
            let tx = request.build()?;
            log::info!("未署名トランザクションの生成に成功しました。");

            let raw_tx = tx.to_hex();
            log::info!("Raw transaction hex: {}", raw_tx);
            println!("{}", raw_tx);

            if let Some(output_file) = output_file {
                write_output(&output_file, &raw_tx)?;
            }
        }
        Command::Estimate { input_file } => {
            let config = InputConfig::load(&input_file)?;
            config.check_network(cli_network)?;

            let report = TxRequest::from_config(&config, cli_network)?.report()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Decode { hex, input_file } => {
            let raw_tx = match (hex, input_file) {
                (Some(hex), _) => hex,
                (None, Some(path)) => fs::read_to_string(&path).map_err(|e| {
                    log::error!("入力ファイルの読み込みに失敗しました: {:?}", path);
                    AppError::Io(e)
                })?,
                (None, None) => {
                    return Err(AppError::InputValidation(
                        "--hex または --input-file を指定してください".to_string(),
                    ));
                }
            };

            let tx = Transaction::from_hex(&raw_tx).map_err(|e| {
                log::error!("トランザクションのデコードに失敗しました。");
                AppError::Parse(e)
            })?;
            let view = TransactionView::from_transaction(&tx, cli_network);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Encode { input_file, output_file } => {
            let content = fs::read_to_string(&input_file).map_err(|e| {
                log::error!("入力ファイルの読み込みに失敗しました: {:?}", input_file);
                AppError::Io(e)
            })?;
            let view: TransactionView = serde_json::from_str(&content).map_err(|e| {
                log::error!("入力JSONのパースに失敗しました。");
                AppError::JsonParse {
                    file_path: input_file.clone(),
                    source: e,
                }
            })?;

            let raw_tx = view.to_transaction()?.to_hex();
            println!("{}", raw_tx);

            if let Some(output_file) = output_file {
                write_output(&output_file, &raw_tx)?;
            }
        }
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}

fn write_output(output_file: &Path, raw_tx: &str) -> Result<(), AppError> {
    let mut file = File::create(output_file).map_err(|e| {
        log::error!("出力ファイルの作成に失敗しました: {:?}", output_file);
        AppError::Io(e)
    })?;
    file.write_all(raw_tx.as_bytes()).map_err(|e| {
        log::error!("出力ファイルへの書き込みに失敗しました。");
        AppError::Io(e)
    })?;
    log::info!("Raw transactionを {:?} に保存しました。", output_file);
    Ok(())
}
