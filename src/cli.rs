use std::path::PathBuf;

mod dump;
mod lookup;
mod summary;

use clap::ArgAction;
use doxmodel::Directory;
use dump::Dump;
use lookup::Lookup;
use summary::Summary;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the generated XML files
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Descend into sub-directories of the root
    #[arg(long, global = true)]
    recursive: bool,

    /// Fail if any file cannot be loaded
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let mut directory = Directory::new(self.root);
        if self.recursive || self.strict {
            let mut config = directory.config().clone();
            config.recursive |= self.recursive;
            config.strict |= self.strict;
            directory = Directory::with_config(directory.root().to_path_buf(), config);
        }

        self.command
            .unwrap_or_else(|| Command::Summary(Summary::default()))
            .run(&directory)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show compound counts, skipped files and conflicts (default)
    Summary(Summary),

    /// Write the resolved model as JSON
    Dump(Dump),

    /// Show the reference-table entry for an identifier
    Lookup(Lookup),
}

impl Command {
    fn run(self, directory: &Directory) -> anyhow::Result<()> {
        match self {
            Self::Summary(command) => command.run(directory)?,
            Self::Dump(command) => command.run(directory)?,
            Self::Lookup(command) => command.run(directory)?,
        }
        Ok(())
    }
}
