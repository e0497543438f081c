use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use jobtrakr_store::{
    NamespaceId, UniqueId, copy_database_to, default_sqlite_path, delete_database,
    load_or_init_config, open_store, seed_sample_data,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init(args) => init_datastore(args).await,
        Command::Alloc(args) => allocate_ids(args).await,
        Command::Decode(args) => decode_id(args),
        Command::Seed(args) => seed(args).await,
        Command::Export(args) => export(args),
        Command::Delete(args) => delete(args),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Developer utilities for the jobtrakr datastore")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the config file and database with every table.
    Init(DatastoreArgs),
    /// Mint unique ids in a namespace and print them.
    Alloc(AllocArgs),
    /// Split a unique id into its namespace and sequence.
    Decode(DecodeArgs),
    /// Insert the sample jobs, categories and items.
    Seed(SeedArgs),
    /// Copy the database file into another directory.
    Export(ExportArgs),
    /// Remove the database file.
    Delete(DeleteArgs),
}

#[derive(Parser)]
struct DatastoreArgs {
    /// Directory holding jobtrakr.json and the sqlite file.
    #[arg(long, default_value = ".jobtrakr")]
    datastore: PathBuf,
}

#[derive(Parser)]
struct AllocArgs {
    #[command(flatten)]
    datastore: DatastoreArgs,
    /// Namespace (user id) to allocate under.
    #[arg(long)]
    namespace: u32,
    /// How many ids to mint.
    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[derive(Parser)]
struct DecodeArgs {
    /// Decimal unique id.
    id: String,
}

#[derive(Parser)]
struct SeedArgs {
    #[command(flatten)]
    datastore: DatastoreArgs,
    #[arg(long)]
    namespace: u32,
}

#[derive(Parser)]
struct ExportArgs {
    #[command(flatten)]
    datastore: DatastoreArgs,
    /// Destination directory, created if missing.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser)]
struct DeleteArgs {
    #[command(flatten)]
    datastore: DatastoreArgs,
    /// Required; deleting the database cannot be undone.
    #[arg(long, default_value_t = false)]
    force: bool,
}

async fn init_datastore(args: DatastoreArgs) -> Result<()> {
    let store = open_store(&args.datastore)
        .await
        .with_context(|| format!("open {}", args.datastore.display()))?;
    let config = load_or_init_config(&args.datastore)?;
    store.close().await?;
    println!(
        "Initialised datastore at {}",
        config.sqlite_path(&args.datastore).display()
    );
    Ok(())
}

async fn allocate_ids(args: AllocArgs) -> Result<()> {
    let store = open_store(&args.datastore.datastore).await?;
    let namespace = NamespaceId(args.namespace);
    for _ in 0..args.count {
        let id = store
            .build_unique_id(namespace)
            .await
            .map_err(|err| anyhow!("allocation failed: {err}"))?;
        println!("{id}");
    }
    store.close().await?;
    Ok(())
}

fn decode_id(args: DecodeArgs) -> Result<()> {
    let id: UniqueId = args.id.parse()?;
    let decoded = serde_json::json!({
        "id": id.as_u64(),
        "namespace": id.namespace().as_u32(),
        "sequence": id.sequence(),
        "stored": id.to_i64(),
    });
    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

async fn seed(args: SeedArgs) -> Result<()> {
    let store = open_store(&args.datastore.datastore).await?;
    let job_ids = seed_sample_data(&store, NamespaceId(args.namespace)).await?;
    store.close().await?;
    for id in &job_ids {
        println!("seeded job {id}");
    }
    Ok(())
}

fn export(args: ExportArgs) -> Result<()> {
    let copied = copy_database_to(&args.datastore.datastore, &args.out)
        .with_context(|| format!("export to {}", args.out.display()))?;
    println!("Copied database to {}", copied.display());
    Ok(())
}

fn delete(args: DeleteArgs) -> Result<()> {
    if !args.force {
        return Err(anyhow!(
            "refusing to delete {} without --force",
            default_sqlite_path(&args.datastore.datastore).display()
        ));
    }
    delete_database(&args.datastore.datastore)?;
    println!("Deleted database under {}", args.datastore.datastore.display());
    Ok(())
}
