use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tradedash::cli::{
    CalendarKind, CalendarOptions, ScreenerOptions, Sector, SortKey, StrengthOptions, TrendOptions,
};
use tradedash::core::log::init_logging;
use tradedash::AppCommand;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Strength,
    Currency,
}

#[derive(Clone, Copy, ValueEnum)]
enum SectorArg {
    All,
    Technology,
    Healthcare,
    FinancialServices,
    Energy,
    ConsumerCyclical,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    All,
    Macro,
    Earnings,
    Dividends,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Rank the major currencies by intraday strength against USD
    Strength {
        /// Column to order the ranking by
        #[arg(long, value_enum, default_value_t = SortArg::Strength)]
        sort: SortArg,
        /// Reverse the default order
        #[arg(long)]
        ascending: bool,
        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },
    /// Screen stocks by market cap and sector
    Screener {
        /// Maximum number of results
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(10..=1000))]
        limit: u32,
        /// Minimum market cap, in millions of USD
        #[arg(long, default_value_t = 1000)]
        min_market_cap: u64,
        #[arg(long, value_enum, default_value_t = SectorArg::All)]
        sector: SectorArg,
    },
    /// Show economic events, earnings and dividends for a date range
    Calendar {
        #[arg(long, value_enum, default_value_t = KindArg::All)]
        kind: KindArg,
        /// First day, YYYY-MM-DD (default: today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD (default: a week from today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Display a company profile
    Profile {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },
    /// Display daily prices with 20 and 50 day moving averages
    Trend {
        /// Ticker symbol, e.g. NVDA
        symbol: String,
        /// Number of most recent days to show
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
        rows: u16,
    },
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Strength => SortKey::Strength,
            SortArg::Currency => SortKey::Currency,
        }
    }
}

impl From<SectorArg> for Sector {
    fn from(arg: SectorArg) -> Self {
        match arg {
            SectorArg::All => Sector::All,
            SectorArg::Technology => Sector::Technology,
            SectorArg::Healthcare => Sector::Healthcare,
            SectorArg::FinancialServices => Sector::FinancialServices,
            SectorArg::Energy => Sector::Energy,
            SectorArg::ConsumerCyclical => Sector::ConsumerCyclical,
        }
    }
}

impl From<KindArg> for CalendarKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::All => CalendarKind::All,
            KindArg::Macro => CalendarKind::Macro,
            KindArg::Earnings => CalendarKind::Earnings,
            KindArg::Dividends => CalendarKind::Dividends,
        }
    }
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Strength {
                sort,
                ascending,
                json,
            } => AppCommand::Strength(StrengthOptions {
                sort: sort.into(),
                ascending,
                json,
            }),
            Commands::Screener {
                limit,
                min_market_cap,
                sector,
            } => AppCommand::Screener(ScreenerOptions {
                limit,
                min_market_cap,
                sector: sector.into(),
            }),
            Commands::Calendar { kind, from, to } => {
                let defaults = CalendarOptions::default();
                AppCommand::Calendar(CalendarOptions {
                    kind: kind.into(),
                    from: from.unwrap_or(defaults.from),
                    to: to.unwrap_or(defaults.to),
                })
            }
            Commands::Profile { symbol } => AppCommand::Profile(symbol),
            Commands::Trend { symbol, rows } => AppCommand::Trend(TrendOptions {
                symbol,
                rows: usize::from(rows),
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => tradedash::cli::setup::setup_at_path(path),
            None => tradedash::cli::setup::setup(),
        },
        Some(cmd) => tradedash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
