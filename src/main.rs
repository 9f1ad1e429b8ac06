use clap::Parser;
use log::{error, info, LevelFilter, Metadata, Record};
use sourcon::{
    config::ClientConfig,
    console::{self, ConsoleOptions},
    Client, RconError,
};
use std::{process::ExitCode, time::Duration};
use tokio::io::BufReader;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Send rcon commands to a Source engine server
#[derive(Parser, Debug)]
#[command(name = "sourcon", version, about)]
struct Args {
    /// Server address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server rcon port
    #[arg(short = 'P', long, default_value_t = 27015)]
    port: u16,

    /// Rcon password
    #[arg(short, long, env = "RCON_PASSWORD", hide_env_values = true)]
    password: String,

    /// Read commands from stdin until `exit`
    #[arg(short, long, conflicts_with = "commands")]
    terminal: bool,

    /// Don't print server responses or the prompt
    #[arg(short = 's', long)]
    quiet: bool,

    /// Prefix responses with their packet id
    #[arg(short = 'i', long)]
    show_id: bool,

    /// Seconds to wait for a response, 0 to wait forever
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Commands to run in order
    #[arg(required_unless_present = "terminal")]
    commands: Vec<String>,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

async fn run(args: Args) -> Result<(), RconError> {
    let read_timeout = match args.timeout {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let config = ClientConfig::builder().read_timeout(read_timeout).build();

    let host = format!("{}:{}", args.host, args.port);
    info!("connecting to {}", host);
    let mut client = Client::connect_with(host.as_str(), &args.password, config).await?;
    info!("authenticated");

    let options = ConsoleOptions {
        quiet: args.quiet,
        show_id: args.show_id,
    };
    let mut stdout = tokio::io::stdout();

    if args.terminal {
        let stdin = BufReader::new(tokio::io::stdin());
        console::run_interactive(client.session(), stdin, &mut stdout, options).await
    } else {
        console::run_batch(client.session(), &args.commands, &mut stdout, options).await
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _ = log::set_logger(&SimpleLogger).map(|()| log::set_max_level(level_for(args.verbose)));

    match run(args).await {
        Ok(()) => {
            info!("bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_terminal_conflict() {
        let parsed = Args::try_parse_from(["sourcon", "-p", "pw", "-t", "status"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn commands_required_without_terminal() {
        assert!(Args::try_parse_from(["sourcon", "-p", "pw"]).is_err());
        let args = Args::try_parse_from(["sourcon", "-p", "pw", "-t"]).unwrap();
        assert!(args.terminal);
    }

    #[test]
    fn batch_arguments() {
        let args = Args::try_parse_from([
            "sourcon",
            "-H",
            "10.0.0.2",
            "-P",
            "49493",
            "-p",
            "pw",
            "-s",
            "Shutdown 15",
            "Save",
        ])
        .unwrap();
        assert_eq!(args.host, "10.0.0.2");
        assert_eq!(args.port, 49493);
        assert!(args.quiet);
        assert_eq!(args.commands, vec!["Shutdown 15", "Save"]);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
