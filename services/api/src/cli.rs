use crate::demo::{run_demo, run_tag_suggestion, DemoArgs, TagsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sathi_seva::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sathi Seva",
    about = "Run and demonstrate the Sathi Seva local-services marketplace from the command line",
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
    /// Walk through posting, matching, applying and scheduling with in-memory stores
    Demo(DemoArgs),
    /// Suggest skill tags for a job description using the keyword table
    Tags(TagsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Tags(args) => run_tag_suggestion(args),
    }
}
