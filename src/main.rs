//! Trading-bot console
//!
//! Configure automated trading strategies, attach risk limits, and review
//! performance metrics derived from the trade history held by the remote
//! account service.

mod api;
mod credentials;
mod error;
mod metrics;
mod models;
mod risk;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{AccountClient, OrderRequest};
use crate::metrics::MetricsCalculator;
use crate::models::{BotConfig, BotMetrics, StrategyType, TradeSide};
use crate::risk::{RiskEvaluator, DEFAULT_DAILY_LOSS_LIMIT};

/// Trading-bot console CLI.
#[derive(Parser)]
#[command(name = "tradedesk")]
#[command(about = "Configure trading bots and review their performance", long_about = None)]
struct Cli {
    /// Account service base URL
    #[arg(
        long,
        env = "TRADEDESK_SERVICE_URL",
        default_value = "http://localhost:8080"
    )]
    service_url: String,

    /// Caller identity token, passed through to the account service
    #[arg(long, env = "TRADEDESK_IDENTITY")]
    identity: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-bot performance metrics
    Bots,

    /// Show a ledger-wide performance summary
    Portfolio,

    /// Show today's loss-limit consumption
    Risk {
        /// Daily loss limit in quote currency
        #[arg(short = 'd', long, default_value_t = DEFAULT_DAILY_LOSS_LIMIT)]
        limit: Decimal,
    },

    /// Create a bot with default settings (grid, macd-rsi or ema-scalping)
    AddBot {
        strategy: StrategyType,
    },

    /// Flip a bot between automated and manual mode
    ToggleMode {
        /// Position in the configuration list
        index: usize,
    },

    /// Delete a bot configuration (later entries shift down by one)
    RemoveBot {
        /// Position in the configuration list
        index: usize,
    },

    /// Place a manual order
    Trade {
        /// Trading pair, e.g. BTC/USDT
        #[arg(short, long)]
        symbol: String,

        /// buy or sell
        #[arg(long)]
        side: TradeSide,

        /// spot or futures
        #[arg(short, long, default_value = "spot")]
        market: String,

        /// market or limit
        #[arg(short, long, default_value = "market")]
        order_type: String,

        /// Limit price; required for limit orders
        #[arg(short, long)]
        price: Option<Decimal>,

        /// Base-asset quantity
        #[arg(short, long)]
        amount: Decimal,
    },

    /// Manage exchange credentials
    Credentials {
        #[command(subcommand)]
        command: CredentialsCommands,
    },
}

#[derive(Subcommand)]
enum CredentialsCommands {
    /// Validate and store an API key/secret pair
    Save {
        #[arg(long)]
        key: String,

        #[arg(long)]
        secret: String,

        /// Strategies allowed to trade with these credentials
        #[arg(long = "enable")]
        enabled: Vec<StrategyType>,
    },

    /// Remove stored credentials
    Delete,

    /// Check whether credentials are on file
    Status,

    /// Verify stored credentials against the live exchange
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = AccountClient::new(&cli.service_url, &cli.identity)?;

    match cli.command {
        Commands::Bots => {
            let roster = client.fetch_bot_configs().await?;
            let history = client.fetch_trading_history().await?;

            if roster.is_empty() {
                println!("No bots configured. Use 'tradedesk add-bot <strategy>' to create one.");
                return Ok(());
            }

            let metrics = MetricsCalculator::calculate(roster.as_slice(), &history);

            println!(
                "\n{:<3} {:<20} {:<8} {:<9} {:>12} {:>9} {:>7}  {}",
                "#", "BOT", "MARKET", "STATUS", "P/L", "P/L%", "TRADES", "LAST SIGNAL"
            );
            println!("{}", "-".repeat(88));

            for (index, metric) in metrics.iter().enumerate() {
                println!(
                    "{:<3} {:<20} {:<8} {:<9} {:>12} {:>8.2}% {:>7}  {}",
                    index,
                    metric.strategy_type.display_name(),
                    metric.strategy_type.market_kind(),
                    if metric.is_active { "active" } else { "inactive" },
                    format_signed(metric.profit_loss),
                    metric.profit_loss_percent,
                    metric.trade_count,
                    format_signal(metric)
                );
            }
        }

        Commands::Portfolio => {
            let history = client.fetch_trading_history().await?;
            let balance = client.fetch_balance().await?;
            let portfolio = MetricsCalculator::portfolio(&history);

            println!("\n--- Portfolio ---");
            println!("Balance:        ${:.2}", balance);
            println!("Realized P/L:   {}", format_signed(portfolio.profit_loss));
            println!("Total Trades:   {}", portfolio.trade_count);
            println!("Manual Trades:  {}", portfolio.manual_trade_count);
        }

        Commands::Risk { limit } => {
            let history = client.fetch_trading_history().await?;
            let status = RiskEvaluator::evaluate(&history, limit, Utc::now());

            println!("\n--- Risk Management ---");
            println!("Today's P/L:     {}", format_signed(status.daily_profit_loss));
            println!("Remaining Limit: ${:.2}", status.remaining_limit);
            println!(
                "Limit Used:      {:.0}% of ${:.2}",
                status.limit_usage_percent, limit
            );
            println!("Trades Today:    {}", status.trades_today);
        }

        Commands::AddBot { strategy } => {
            let config = BotConfig::default_for(strategy);
            client.save_bot_config(&config).await?;

            info!(strategy = %strategy, "Bot configuration created");
            println!(
                "Created {} in manual mode. Use 'tradedesk toggle-mode' to activate it.",
                strategy.display_name()
            );
            print_strategy_summary(&config);
        }

        Commands::ToggleMode { index } => {
            let roster = client.fetch_bot_configs().await?;
            let toggled = roster.get(index)?.toggle_mode();
            client.update_bot_config(index, &toggled).await?;

            println!(
                "{} is now {}",
                toggled.strategy_type().display_name(),
                if toggled.is_automated() {
                    "automated"
                } else {
                    "manual"
                }
            );
        }

        Commands::RemoveBot { index } => {
            client.delete_bot_config(index).await?;
            println!("Removed bot at index {index}. Later bots shifted down by one.");
        }

        Commands::Trade {
            symbol,
            side,
            market,
            order_type,
            price,
            amount,
        } => {
            let price = match (order_type.as_str(), price) {
                ("limit", Some(p)) => p,
                ("limit", None) => anyhow::bail!("limit orders require --price"),
                // Market orders carry no price.
                _ => Decimal::ZERO,
            };

            let request = OrderRequest {
                symbol: symbol.clone(),
                side,
                order_type: format!("{market}-{order_type}"),
                price,
                amount,
            };

            let order_id = client.place_order(&request).await?;
            info!(order_id = %order_id, symbol = %symbol, "Order placed");
            println!("{} order placed: {}", side.as_str().to_uppercase(), order_id);
        }

        Commands::Credentials { command } => match command {
            CredentialsCommands::Save {
                key,
                secret,
                enabled,
            } => {
                client.save_api_credentials(&key, &secret, enabled).await?;
                println!("Credentials saved.");
            }
            CredentialsCommands::Delete => {
                client.delete_api_credentials().await?;
                println!("Credentials deleted.");
            }
            CredentialsCommands::Status => {
                let exists = client.has_api_credentials().await?;
                println!(
                    "{}",
                    if exists {
                        "Credentials are on file."
                    } else {
                        "No credentials stored."
                    }
                );
            }
            CredentialsCommands::Verify => {
                let valid = client.verify_api_credentials().await?;
                println!(
                    "{}",
                    if valid {
                        "Credentials verified against the exchange."
                    } else {
                        "Verification failed. Check the pair on the exchange side."
                    }
                );
            }
        },
    }

    Ok(())
}

fn print_strategy_summary(config: &BotConfig) {
    use crate::models::StrategyParams;

    match &config.params {
        StrategyParams::Grid(p) => {
            println!(
                "  Price range: ${:.2} - ${:.2} ({} levels, ${:.2} step)",
                p.lower_bound,
                p.upper_bound,
                p.grid_levels,
                p.price_step()
            );
            println!("  Total investment: ${:.2}", p.total_investment());
        }
        StrategyParams::MacdRsi(p) => {
            println!(
                "  Timeframe: {}, leverage: {}x, effective position: ${:.2}",
                p.timeframe.as_str(),
                p.leverage,
                p.effective_position()
            );
        }
        StrategyParams::EmaScalping(p) => {
            println!(
                "  EMA periods: {}/{}, stop loss: {:.2}%, take profit: {:.2}%",
                p.ema9_period, p.ema21_period, p.stop_loss_percent, p.take_profit_percent
            );
        }
    }
}

/// "$12.34" / "-$12.34" with an explicit plus for gains.
fn format_signed(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-${:.2}", -value)
    } else {
        format!("+${value:.2}")
    }
}

fn format_signal(metric: &BotMetrics) -> String {
    match &metric.latest_signal {
        Some(signal) => format!(
            "{} @ {}",
            signal.side.as_str(),
            signal.timestamp.format("%Y-%m-%d %H:%M:%S")
        ),
        None => "-".to_string(),
    }
}
