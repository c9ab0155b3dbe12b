use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tubelist::{
    cli,
    config::{self, Config},
    error, logger,
    session::Session,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Path to the JSON config (defaults to the local data directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with YouTube
    Auth(AuthOptions),

    /// Add videos to a playlist
    Add(MutateOptions),

    /// Remove videos from a playlist
    Remove(MutateOptions),

    /// List the items of a playlist
    Items(ItemsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Forget the stored token before authorizing
    #[clap(long)]
    pub reset: bool,

    /// Print the consent url instead of opening a browser
    #[clap(long)]
    pub no_browser: bool,

    /// Authorization code copied from the redirect url
    #[clap(long, requires = "state")]
    pub code: Option<String>,

    /// State value copied from the redirect url
    #[clap(long, requires = "code")]
    pub state: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct MutateOptions {
    /// Video ids or watch urls
    #[clap(required = true)]
    pub videos: Vec<String>,

    /// Playlist id (defaults to the configured playlist)
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ItemsOptions {
    /// Playlist id (defaults to the configured playlist)
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env() {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let source = config::resolve_source(cli.config.clone());
    let config = match Config::load(&source) {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration from {:?}. Err: {}", source, e),
    };

    if let Err(e) = logger::init(config::log_dir()) {
        warning!("Cannot set up the log file. Err: {}", e);
    }

    let mut session = Session::open(config);

    match cli.command {
        Command::Auth(opt) => cli::auth(
            &mut session,
            opt.reset,
            !opt.no_browser,
            opt.code,
            opt.state,
        ),
        Command::Add(opt) => cli::add(&mut session, &opt.videos, opt.playlist.as_deref()),
        Command::Remove(opt) => cli::remove(&mut session, &opt.videos, opt.playlist.as_deref()),
        Command::Items(opt) => cli::items(&mut session, opt.playlist.as_deref()),
        Command::Completions(_) => {}
    }
}
