use std::collections::BTreeMap;

use clap::Parser;
use doxmodel::{Conflict, Directory};
use tracing::instrument;

#[derive(Debug, Parser, Default)]
#[command(about = "Show compound counts, skipped files and conflicts")]
pub struct Summary {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Summary {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let loaded = directory.load()?;
        let corpus = loaded.corpus();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for compound in corpus.compounds() {
            *counts.entry(compound.kind.as_str()).or_insert(0) += 1;
        }
        let failures: Vec<String> = loaded
            .failures()
            .iter()
            .map(|failure| format!("{}: {}", failure.path.display(), failure.error))
            .collect();

        match self.output {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "kinds": counts,
                    "total": corpus.len(),
                    "references": corpus.references().len(),
                    "failures": failures,
                    "conflicts": corpus.conflicts(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if corpus.is_empty() && failures.is_empty() {
                    println!("No compounds found in {}.", directory.root().display());
                    return Ok(());
                }
                for (kind, count) in &counts {
                    println!("{kind:<12} {count:>6}");
                }
                println!("{:<12} {:>6}", "total", corpus.len());
                println!("{:<12} {:>6}", "references", corpus.references().len());

                if !failures.is_empty() {
                    println!();
                    println!("Skipped files:");
                    for failure in &failures {
                        println!("  {failure}");
                    }
                }
                if !corpus.conflicts().is_empty() {
                    println!();
                    println!("Conflicts:");
                    for conflict in corpus.conflicts() {
                        println!("  {}", describe(conflict));
                    }
                }
            }
        }
        Ok(())
    }
}

fn describe(conflict: &Conflict) -> String {
    match conflict {
        Conflict::DuplicateCompound { id } => format!("duplicate compound '{id}'"),
        Conflict::Parent {
            child,
            kept,
            rejected,
        } => format!("'{child}' claimed by '{kept}' and '{rejected}', kept '{kept}'"),
        Conflict::Reference(collision) => format!(
            "reference '{}' is both a {} and a {}",
            collision.kept.id, collision.kept.kind, collision.rejected.kind
        ),
    }
}
