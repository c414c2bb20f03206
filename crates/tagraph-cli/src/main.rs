//! tagraph command-line tool.
//!
//! Provides the `tagraph` binary for maintaining the entry store and
//! rebuilding the graph document. Uses the same `tagraph_storage::ops`
//! functions as the HTTP server, so both entry points behave identically.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use tagraph_core::DigestKind;
use tagraph_storage::{ops, StorageError};

/// Exit code for success.
const EXIT_OK: i32 = 0;
/// Exit code for rejected input records.
const EXIT_VALIDATION: i32 = 1;
/// Exit code for a malformed graph document.
const EXIT_MALFORMED: i32 = 2;
/// Exit code for I/O and store failures.
const EXIT_IO: i32 = 3;

/// Tagged reference store and graph builder.
#[derive(Parser)]
#[command(name = "tagraph", about = "Tagged reference store and graph builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create an empty entry store if none exists.
    Init {
        /// Path to the entry store (.csv, or .db/.sqlite for SQLite).
        #[arg(short, long)]
        store: PathBuf,
    },

    /// Append entries: "title, tag, link[, date|today]; ..."
    Add {
        /// Path to the entry store.
        #[arg(short, long)]
        store: PathBuf,

        /// Semicolon-separated records of comma-separated fields.
        raw: String,
    },

    /// List every tag, expanded through the hierarchy, with its count.
    Tags {
        /// Path to the entry store.
        #[arg(short, long)]
        store: PathBuf,
    },

    /// List the tags exactly as they were stored.
    TagsUsed {
        /// Path to the entry store.
        #[arg(short, long)]
        store: PathBuf,
    },

    /// Rebuild the graph document from the store.
    Build {
        /// Path to the entry store.
        #[arg(short, long)]
        store: PathBuf,

        /// Output graph document.
        #[arg(short, long, default_value = "output_graph.json")]
        output: PathBuf,

        /// Identifier digest: md5 or blake3.
        #[arg(short, long, default_value = "md5")]
        digest: DigestKind,
    },

    /// Print an existing graph document after checking its structure.
    Show {
        /// Graph document to read.
        #[arg(short, long)]
        graph: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Init { store } => run_init(&store),
        Commands::Add { store, raw } => run_add(&store, &raw),
        Commands::Tags { store } => run_tags(&store),
        Commands::TagsUsed { store } => run_tags_used(&store),
        Commands::Build {
            store,
            output,
            digest,
        } => run_build(&store, &output, digest),
        Commands::Show { graph } => run_show(&graph),
    };
    process::exit(exit_code);
}

/// Maps a storage error to a message on stderr and an exit code.
fn report(err: StorageError) -> i32 {
    match err {
        StorageError::Validation { rejected } => {
            eprintln!("Rejected {} record(s), nothing was written:", rejected.len());
            for r in &rejected {
                eprintln!("  - {}", r);
            }
            EXIT_VALIDATION
        }
        StorageError::EmptyBatch => {
            eprintln!("No records given, nothing was written.");
            EXIT_VALIDATION
        }
        StorageError::MalformedGraph { reason } => {
            eprintln!("Error: malformed graph document: {}", reason);
            EXIT_MALFORMED
        }
        e => {
            eprintln!("Error: {}", e);
            EXIT_IO
        }
    }
}

fn run_init(store: &Path) -> i32 {
    match ops::ensure_store_exists(store) {
        Ok(()) => {
            println!("Store ready at {}", store.display());
            EXIT_OK
        }
        Err(e) => report(e),
    }
}

fn run_add(store: &Path, raw: &str) -> i32 {
    match ops::append_entries(store, raw) {
        Ok(added) => {
            for entry in &added {
                println!("{}", "-".repeat(50));
                println!("Name: {}", entry.title);
                println!("Tag:  {}", entry.tag_path);
                println!("Link: {}", entry.link);
                println!("Date: {}", entry.date_added);
                println!("Tags: {:?}", tagraph_core::expand(&entry.tag_path));
            }
            println!("Added {} entr{}", added.len(), if added.len() == 1 { "y" } else { "ies" });
            EXIT_OK
        }
        Err(e) => report(e),
    }
}

fn run_tags(store: &Path) -> i32 {
    match ops::tag_counts(store) {
        Ok(counts) if counts.is_empty() => {
            println!("No tags found.");
            EXIT_OK
        }
        Ok(counts) => {
            for (tag, count) in &counts {
                println!("Tag: {} , count: {}", tag, count);
            }
            EXIT_OK
        }
        Err(e) => report(e),
    }
}

fn run_tags_used(store: &Path) -> i32 {
    match ops::tags_used(store) {
        Ok(tags) if tags.is_empty() => {
            println!("No tags found.");
            EXIT_OK
        }
        Ok(tags) => {
            println!("Existing tags:");
            for tag in &tags {
                println!("  {}", tag);
            }
            EXIT_OK
        }
        Err(e) => report(e),
    }
}

fn run_build(store: &Path, output: &Path, digest: DigestKind) -> i32 {
    let ids = digest.generator();
    match ops::rebuild_graph_with(store, output, ids.as_ref()) {
        Ok(rebuild) => {
            println!(
                "Graph generated and saved to {} ({} entries, {} nodes, {} links, digest {})",
                output.display(),
                rebuild.entries,
                rebuild.document.nodes.len(),
                rebuild.document.links.len(),
                digest,
            );
            for skipped in &rebuild.summary.skipped {
                eprintln!("  skipped: {:?}", skipped);
            }
            EXIT_OK
        }
        Err(e) => report(e),
    }
}

fn run_show(graph: &Path) -> i32 {
    let doc = match ops::read_graph(graph) {
        Ok(doc) => doc,
        Err(e) => return report(e),
    };
    match serde_json::to_string_pretty(&doc) {
        Ok(json) => {
            println!("{}", json);
            EXIT_OK
        }
        Err(e) => report(StorageError::Serialization(e)),
    }
}
