use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use promptpay_gateway::application::gateway::{OpenRequest, PaymentGateway};
use promptpay_gateway::config::GatewayConfig;
use promptpay_gateway::domain::payload::{DEFAULT_MERCHANT_NAME, QrPayload};
use promptpay_gateway::domain::transaction::Beneficiary;
use promptpay_gateway::error::GatewayError;
use promptpay_gateway::infrastructure::in_memory::InMemoryConfigProvider;
use promptpay_gateway::interfaces::csv::ledger_writer::LedgerWriter;
use promptpay_gateway::interfaces::csv::scenario_reader::{
    ScenarioEvent, ScenarioEventType, ScenarioReader,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the PromptPay QR payload for a mobile number, national ID or e-wallet
    Qr {
        target: String,

        /// Fixed THB amount. Omit for a static QR code.
        #[arg(long)]
        amount: Option<Decimal>,

        #[arg(long, default_value = DEFAULT_MERCHANT_NAME)]
        merchant_name: String,
    },
    /// Check a payload's checksum and list its top-level fields
    Verify { payload: String },
    /// Replay a scenario CSV through the gateway and print the resulting ledger
    Simulate {
        /// Scenario CSV file (event, amount, name, national_id, wallet)
        input: PathBuf,

        /// Gateway configuration (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run verification and settlement without the simulated latency.
        #[arg(long)]
        no_delay: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Qr {
            target,
            amount,
            merchant_name,
        } => {
            let payload = QrPayload::encode(&target, amount, &merchant_name).into_diagnostic()?;
            println!("{payload}");
        }
        Command::Verify { payload } => {
            let payload = QrPayload::parse(payload.trim()).into_diagnostic()?;
            for field in payload.fields().into_diagnostic()? {
                println!("{} {}", field.tag, field.value);
            }
            println!("checksum OK ({})", payload.checksum());
        }
        Command::Simulate {
            input,
            config,
            no_delay,
        } => simulate(input, config, no_delay).await?,
    }

    Ok(())
}

async fn simulate(input: PathBuf, config: Option<PathBuf>, no_delay: bool) -> Result<()> {
    let mut config = match config {
        Some(path) => GatewayConfig::load(path).into_diagnostic()?,
        None => GatewayConfig::default(),
    };
    if no_delay {
        config.verification_delay_ms = 0;
        config.settlement_delay_ms = 0;
    }

    let gateway = PaymentGateway::new(Box::new(InMemoryConfigProvider::new(config)));

    let file = File::open(input).into_diagnostic()?;
    let reader = ScenarioReader::new(file);
    for event in reader.events() {
        match event {
            Ok(event) => {
                if let Err(e) = apply_event(&gateway, event).await {
                    tracing::error!("Error applying scenario event: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Error reading scenario event: {}", e);
            }
        }
        gateway.wait_idle().await;
    }

    let history = gateway.history().await;
    let mut writer = LedgerWriter::new(io::stdout().lock());
    writer
        .write_transactions(history.iter().rev())
        .into_diagnostic()?;

    let book = gateway.order_book().await;
    tracing::info!(
        thb_reserves = %book.thb_reserves,
        usdt_reserves = %book.usdt_reserves,
        auto_hedge = book.auto_hedge,
        "final reserves"
    );
    Ok(())
}

async fn apply_event(
    gateway: &PaymentGateway,
    event: ScenarioEvent,
) -> promptpay_gateway::Result<()> {
    match event.event {
        ScenarioEventType::Open => {
            let beneficiary = Beneficiary {
                full_name: event.name.unwrap_or_default(),
                national_id: event.national_id.unwrap_or_default(),
                wallet_address: event.wallet.unwrap_or_default(),
            };
            gateway
                .open(OpenRequest {
                    beneficiary,
                    amount_thb: event.amount,
                    memo: None,
                })
                .await?;
        }
        ScenarioEventType::Transfer => {
            let amount = event.amount.ok_or_else(|| {
                GatewayError::ValidationError("Transfer missing amount".to_string())
            })?;
            let reference = gateway
                .active()
                .await
                .map(|tx| tx.reference_id)
                .unwrap_or_default();
            gateway
                .on_incoming_transfer(amount, event.name.as_deref().unwrap_or_default(), &reference)
                .await?;
        }
        ScenarioEventType::Approve => {
            if !gateway.approve().await? {
                tracing::warn!("No transaction is awaiting approval");
            }
        }
        ScenarioEventType::ToggleHedge => {
            gateway.toggle_auto_hedge().await;
        }
    }
    Ok(())
}
