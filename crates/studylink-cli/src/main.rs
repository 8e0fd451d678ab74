//! Studylink CLI - Command-line interface for study partner requests.

use clap::Parser;
use studylink_cli::commands;
use studylink_cli::{Cli, CliConfig, CliError, Command, Formatter};
use studylink_domain::ActorId;
use studylink_service::{ChannelSink, EventDispatcher, LogNotifier, StudyService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    init_tracing(&config.settings.log_filter);

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Err(e) = run(cli, config, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, mut config: CliConfig, formatter: &Formatter) -> studylink_cli::Result<()> {
    if let Some(db) = cli.db {
        config.service.store.path = db;
    }
    let acting = cli
        .actor
        .as_deref()
        .map(commands::parse_actor)
        .transpose()?;

    // Lifecycle events are delivered to the log by a background dispatcher
    let (sink, events) = ChannelSink::new();
    let dispatcher = tokio::spawn(async move {
        EventDispatcher::new(LogNotifier).drain(events).await
    });

    let mut service = StudyService::open(config.service, sink)?;
    let result = execute(cli.command, acting.as_ref(), &mut service, formatter);

    // Dropping the service closes the event channel
    drop(service);
    match dispatcher.await {
        Ok(stats) => tracing::debug!(delivered = stats.delivered, "Lifecycle events delivered"),
        Err(e) => tracing::warn!(error = %e, "Event dispatcher did not finish"),
    }

    result
}

fn execute(
    command: Command,
    acting: Option<&ActorId>,
    service: &mut StudyService<ChannelSink>,
    formatter: &Formatter,
) -> studylink_cli::Result<()> {
    let actor = || acting.ok_or(CliError::NoActor);

    match command {
        Command::Register(args) => commands::execute_register(args, acting, service, formatter),
        Command::Send(args) => commands::execute_send(args, actor()?, service, formatter),
        Command::Respond(args) => commands::execute_respond(args, actor()?, service, formatter),
        Command::Cancel(args) => commands::execute_cancel(args, actor()?, service, formatter),
        Command::Show(args) => commands::execute_show(args, actor()?, service, formatter),
        Command::Incoming(args) => commands::execute_incoming(args, actor()?, service, formatter),
        Command::Outgoing(args) => commands::execute_outgoing(args, actor()?, service, formatter),
        Command::History(args) => commands::execute_history(args, actor()?, service, formatter),
        Command::Partners => commands::execute_partners(actor()?, service, formatter),
        Command::Remove(args) => commands::execute_remove(args, actor()?, service, formatter),
    }
}
