//! Command-line interface for hoops-bot

mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use hoops_stats::{
    BasketballReferenceClient, BotConfig, ChartKind, DryRunPublisher, GameBot, GameSelection, ImageFormat,
    PlotRenderer, PostId, Publisher, TwitterPublisher,
};
use hoops_utils::LogFormat;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hoops-bot")]
#[command(about = "Post plots and stats of NBA games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    /// Directory for chart images and dry-run posts
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Image format of charts
    #[arg(long, global = true, value_enum, default_value_t = ImageArg::Png)]
    image_format: ImageArg,

    /// TrueType font for chart text
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Write posts to the output directory instead of publishing them
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a thread for each final game
    Game {
        /// Post games of this date (YYYY-MM-DD) instead of the last days
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Id of a post to quote in the first post of each thread
        #[arg(long)]
        quote: Option<String>,

        /// What the game chart shows
        #[arg(long, value_enum, default_value_t = ChartArg::Scores)]
        chart: ChartArg,
    },
    /// Post win curves and injuries of the top teams of each conference
    Season,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageArg {
    Png,
    Svg,
}

impl From<ImageArg> for ImageFormat {
    fn from(arg: ImageArg) -> Self {
        match arg {
            ImageArg::Png => Self::Png,
            ImageArg::Svg => Self::Svg,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartArg {
    Scores,
    Differential,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Scores => Self::Scores,
            ChartArg::Differential => Self::Differential,
        }
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<BotConfig> {
    if matches!(cli.image_format, ImageArg::Svg) && !cli.dry_run {
        anyhow::bail!("SVG charts cannot be uploaded, use --image-format png or --dry-run");
    }

    let mut builder = BotConfig::builder()
        .image_format(cli.image_format.into())
        .with_env_credentials();

    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(font) = &cli.font {
        builder = builder.font_path(font);
    }
    if let Commands::Game { chart, .. } = &cli.command {
        builder = builder.chart_kind((*chart).into());
    }

    Ok(builder.build()?)
}

fn publisher(config: &BotConfig, dry_run: bool) -> anyhow::Result<Arc<dyn Publisher>> {
    if dry_run {
        let dir = config.output_dir.join("posts");
        info!("Dry run, posts go to {}", dir.display());
        return Ok(Arc::new(DryRunPublisher::new(dir, config.post_char_limit)));
    }

    let publisher = TwitterPublisher::from_config(config)
        .context("Posting needs API_KEY, API_SECRET_KEY, ACCESS_TOKEN and ACCESS_TOKEN_SECRET (or --dry-run)")?;
    Ok(Arc::new(publisher))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    hoops_utils::init_tracing(cli.log_format);

    let config = build_config(&cli)?;
    let source = Arc::new(BasketballReferenceClient::from_config(&config)?);
    let publisher = publisher(&config, cli.dry_run)?;
    let renderer = PlotRenderer::new(&config);
    let bot = GameBot::new(source, publisher, renderer, config);

    info!("Starting hoops-bot ({})", bot.publisher_name());
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Game { date, quote, .. } => {
            let selection = date.map_or(GameSelection::Recent { today }, GameSelection::On);
            let outcomes = bot.run_games(selection, quote.map(PostId::new)).await?;
            if outcomes.is_empty() {
                println!("No games on {}", date.unwrap_or(today));
            } else {
                println!("{}", report::games_table(&outcomes));
            }
        }
        Commands::Season => {
            let posts = bot.run_season(today).await?;
            println!("{}", report::season_table(&posts));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_command() {
        let cli = Cli::try_parse_from([
            "hoops-bot",
            "game",
            "--date",
            "2021-05-22",
            "--quote",
            "1396",
            "--chart",
            "differential",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.dry_run);
        match cli.command {
            Commands::Game { date, quote, chart } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2021, 5, 22));
                assert_eq!(quote.as_deref(), Some("1396"));
                assert!(matches!(chart, ChartArg::Differential));
            }
            Commands::Season => panic!("expected game command"),
        }
    }

    #[test]
    fn test_parse_season_command() {
        let cli = Cli::try_parse_from(["hoops-bot", "--log-format", "json", "season", "--image-format", "svg"]).unwrap();
        assert!(matches!(cli.command, Commands::Season));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.image_format, ImageArg::Svg));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["hoops-bot", "game", "--date", "22.05.2021"]).is_err());
    }

    #[test]
    fn test_build_config_from_flags() {
        let cli = Cli::try_parse_from([
            "hoops-bot",
            "game",
            "--chart",
            "differential",
            "--output-dir",
            "/tmp/hoops",
            "--font",
            "/tmp/font.ttf",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.chart_kind, ChartKind::Differential);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/hoops"));
        assert_eq!(config.font_path, Some(PathBuf::from("/tmp/font.ttf")));
        assert_eq!(config.image_format, ImageFormat::Png);
    }

    #[test]
    fn test_svg_only_for_dry_run() {
        let cli = Cli::try_parse_from(["hoops-bot", "season", "--image-format", "svg"]).unwrap();
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("--dry-run"));

        let cli = Cli::try_parse_from(["hoops-bot", "season", "--image-format", "svg", "--dry-run"]).unwrap();
        assert_eq!(build_config(&cli).unwrap().image_format, ImageFormat::Svg);
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let config = BotConfig::builder().output_dir("/tmp/hoops").build().unwrap();
        let publisher = publisher(&config, true).unwrap();
        assert_eq!(publisher.name(), "dry-run");
    }
}
