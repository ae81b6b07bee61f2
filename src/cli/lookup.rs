use clap::Parser;
use doxmodel::Directory;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Show the reference-table entry for an identifier")]
pub struct Lookup {
    /// The identifier; matched case-insensitively
    id: String,
}

impl Lookup {
    #[instrument(level = "debug", skip(directory))]
    pub fn run(self, directory: &Directory) -> anyhow::Result<()> {
        let corpus = directory.load()?.into_corpus();
        let Some(entry) = corpus.references().get(&self.id) else {
            anyhow::bail!("No reference named '{}'", self.id);
        };

        println!("id:    {}", entry.id);
        println!("kind:  {}", entry.kind);
        println!("name:  {}", entry.name);
        println!("owner: {}", entry.owner_id());

        if let Some(compound) = corpus.compound(entry.owner.as_deref().unwrap_or(&entry.id)) {
            if let Some(parent) = &compound.parent {
                println!("parent: {parent}");
            }
            if !compound.location.file.is_empty() {
                println!("file:  {}", compound.location.file);
            }
        }
        Ok(())
    }
}
