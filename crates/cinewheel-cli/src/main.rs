use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, enrich, list, rate, show, user, wheel, FilterArgs};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinewheel")]
#[command(about = "Cinewheel - a film catalog with a wheel that picks tonight's movie")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List films in the catalog
    #[command(long_about = "List the films that pass the current filters. Filter flags given here update the saved filter state, so they carry over to the next invocation (and to the wheel).")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List every genre present in the catalog
    Genres,
    /// Show a single film in full detail
    #[command(long_about = "Show everything known about one film: catalog fields, cached external metadata, and your stored rating if any. Never touches the network.")]
    Show {
        /// Film id (see the ID column of `list`)
        id: u32,
    },
    /// Fetch external metadata for the whole catalog
    #[command(long_about = "Look up every film on TMDB and fill in missing posters, genres, ratings, descriptions, directors, and runtimes. Results are cached for 7 days; films with a fresh cache entry are not fetched again.")]
    Enrich,
    /// Spin the wheel to pick a film
    #[command(long_about = "Pick one film at random among those that pass the current filters, minus the excluded ones. By default shows a short animated spin; --pick skips the animation.")]
    Wheel {
        #[command(flatten)]
        filter: FilterArgs,

        /// Pick instantly without the spin animation
        #[arg(long, action = ArgAction::SetTrue)]
        pick: bool,
    },
    /// Rate a film (five craft scores plus your subjective score)
    #[command(long_about = "Store a rating for a film and print its composite score. The first five scores grade the craft (script, acting, direction, visuals, sound); the last is your personal impression, which pulls the composite up or down nonlinearly.")]
    Rate {
        /// Film id
        id: u32,

        /// Script, acting, direction, visuals, sound, impression (each 1-10)
        #[arg(num_args = 6, value_parser = clap::value_parser!(u8).range(1..=10))]
        scores: Vec<u8>,
    },
    /// Toggle a film in your favorites
    Favorite {
        /// Film id
        id: u32,
    },
    /// Toggle a film in the wheel exclusion list
    #[command(long_about = "Toggle a film in the exclusion list. Excluded films still show up in `list` but never come out of the wheel.")]
    Exclude {
        /// Film id
        id: u32,
    },
    /// List currently excluded films
    Exclusions,
    /// Sign in with a user key (switches to the remote store)
    #[command(long_about = "Sign in with a stable user key. While signed in, favorites, exclusions, and ratings are read from and written to the configured remote store instead of local files. Local anonymous data is left untouched, not merged.")]
    Login {
        /// Stable per-user key
        user_key: String,
    },
    /// Sign out (switches back to the local store)
    Logout,
    /// View or modify configuration
    Config {
        #[command(subcommand)]
        cmd: config::ConfigCommands,
    },
    /// Clear cached data
    #[command(long_about = "Clear cached data. Use --cache for the external metadata cache, --filters for the saved filter state, --user-data for local favorites/exclusions/ratings, or --all for everything.")]
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the external metadata and genre caches
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        /// Clear the saved filter state
        #[arg(long, action = ArgAction::SetTrue)]
        filters: bool,

        /// Clear local favorites, exclusions, and ratings
        #[arg(long, action = ArgAction::SetTrue)]
        user_data: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::List { filter } => list::run_list(filter, &output).await,
        Commands::Genres => list::run_genres(&output).await,
        Commands::Show { id } => show::run_show(id, &output).await,
        Commands::Enrich => enrich::run_enrich(&output).await,
        Commands::Wheel { filter, pick } => wheel::run_wheel(filter, pick, &output).await,
        Commands::Rate { id, scores } => rate::run_rate(id, &scores, &output).await,
        Commands::Favorite { id } => user::run_favorite(id, &output).await,
        Commands::Exclude { id } => user::run_exclude(id, &output).await,
        Commands::Exclusions => user::run_exclusions(&output).await,
        Commands::Login { user_key } => user::run_login(&user_key, &output).await,
        Commands::Logout => user::run_logout(&output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Clear {
            all,
            cache,
            filters,
            user_data,
        } => clear::run_clear(all, cache, filters, user_data, &output).await,
    }
}
