use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use doxmodel::Directory;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Write the resolved model as JSON")]
pub struct Dump {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

impl Dump {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let corpus = directory.load()?.into_corpus();

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer = BufWriter::new(writer);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &corpus)?;
        } else {
            serde_json::to_writer(&mut writer, &corpus)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
