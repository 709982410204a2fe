use crate::report::{run_report, send_report, ReportRunArgs, ReportSendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hostel_ops::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hostel Operations",
    about = "Serve the hostel management API or run the daily owner report by hand",
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
    /// Run the daily owner report outside the scheduler
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Mail every active hostel's report to its owners
    Run(ReportRunArgs),
    /// Mail every active hostel's report to a single address
    Send(ReportSendArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Do not start the daily report scheduler
    #[arg(long)]
    pub(crate) no_scheduler: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report {
            command: ReportCommand::Run(args),
        } => run_report(args).await,
        Command::Report {
            command: ReportCommand::Send(args),
        } => send_report(args).await,
    }
}
