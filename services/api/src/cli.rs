use crate::demo::{
    run_demo, run_review_summary, run_status_actions, ReviewSummaryArgs, StatusActionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fundraise_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fundraising Review Engine",
    about = "Run the fundraising lifecycle and review scoring engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the owner status lifecycle
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Score a review and print its summary
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
    /// Walk a demo campaign from open to reviewed
    Demo,
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// List the owner actions available from a status
    Actions(StatusActionsArgs),
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// Print the review summary for the given section scores
    Summary(ReviewSummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start without the demo campaigns
    #[arg(long)]
    pub(crate) empty: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Status {
            command: StatusCommand::Actions(args),
        } => run_status_actions(args),
        Command::Review {
            command: ReviewCommand::Summary(args),
        } => run_review_summary(args),
        Command::Demo => run_demo().await,
    }
}
