use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use url::Url;
use vfs_bridge::fetch::{self, FsModule, HttpFetcher, Interpreter, InterpreterModule};
use vfs_bridge::{calculate_fetch_paths, Config, DirFs, Stdio, VirtualFs};

#[derive(Debug, Parser)]
#[command(name = "vfs-bridge")]
#[command(about = "Fetch declared files into an interpreter filesystem.", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a fetch list and print where each file would go.
    Plan(PlanArgs),
    /// Fetch every listed file into a host directory.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// JSON fetch list, or an object with a `fetch` key
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct FetchArgs {
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Host directory that acts as the virtual `/`
    #[arg(long, value_name = "DIR")]
    root: PathBuf,

    /// Base URL for relative `from` values
    #[arg(long, value_name = "URL")]
    base: Option<Url>,

    /// Virtual working directory
    #[arg(long, value_name = "PATH", default_value = "/")]
    cwd: String,

    /// Use only mkdir/write/cwd, like hosts without path helpers
    #[arg(long)]
    shim: bool,

    /// Write a JSON report of fetched files
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

/// The CLI's stand-in interpreter: just a filesystem
struct Host {
    fs: DirFs,
}

impl Interpreter for Host {
    fn fs(&self) -> &dyn VirtualFs {
        &self.fs
    }
}

/// Records size and digest of every buffer before handing it on
///
/// Records are keyed by virtual path. When several entries target one path
/// the last completed write wins, which is also the content left on disk.
#[derive(Default)]
struct DigestModule {
    digests: Mutex<HashMap<String, (usize, String)>>,
}

impl InterpreterModule<Host> for DigestModule {
    fn write_file(&self, interpreter: &Host, path: &str, buffer: Vec<u8>) -> io::Result<()> {
        let digest = hex::encode(Sha256::digest(&buffer));
        let size = buffer.len();
        FsModule.write_file(interpreter, path, buffer)?;
        self.digests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.to_string(), (size, digest));
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct FetchReport {
    root: String,
    cwd: String,
    files: Vec<ReportEntry>,
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    url: String,
    path: String,
    size: usize,
    sha256: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdio = Stdio::default();

    match cli.cmd {
        Command::Plan(args) => plan(&stdio, args),
        Command::Fetch(args) => run_fetch(&stdio, args).await,
    }
}

fn plan(stdio: &Stdio, args: PlanArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let entries = calculate_fetch_paths(config.fetch.descriptors())?;

    for entry in &entries {
        stdio.stdout(&format!("{} -> {}", entry.url, entry.path));
    }
    stdio.stderr(&format!("[plan] ✓ {} files", entries.len()));
    Ok(())
}

async fn run_fetch(stdio: &Stdio, args: FetchArgs) -> Result<()> {
    let start = Instant::now();
    let config = Arc::new(Config::load(&args.config)?.fetch);
    if let Some(base) = args.base.clone() {
        fetch::base().insert(&config, base);
    }

    let mut fs = DirFs::new(&args.root)
        .with_context(|| format!("Failed to open root {}", args.root.display()))?
        .with_cwd(&args.cwd)
        .context("Failed to create working directory")?;
    if args.shim {
        fs = fs.shim();
    }

    stdio.stderr(&format!(
        "[fetch] {} descriptors into {}",
        config.len(),
        args.root.display()
    ));

    let host = stdio.get(async move { Arc::new(Host { fs }) }).await;
    let module = Arc::new(DigestModule::default());
    let written = fetch::fetch_paths(
        Arc::clone(&module),
        Arc::clone(&host),
        Arc::new(HttpFetcher::new()),
        &config,
    )
    .await?;

    let mut targets = HashSet::new();
    for entry in &written {
        if !targets.insert(entry.path.as_str()) {
            tracing::warn!(
                path = %entry.path,
                "several entries write this path; the report shows the last write"
            );
        }
    }

    let digests = module
        .digests
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    let mut files = Vec::with_capacity(written.len());
    for entry in written {
        let (size, sha256) = digests.get(&entry.path).cloned().unwrap_or_default();
        stdio.stdout(&format!("{}  {:>10}  {}", sha256, size, entry.path));
        files.push(ReportEntry {
            url: entry.url,
            path: entry.path,
            size,
            sha256,
        });
    }

    stdio.stderr(&format!(
        "[fetch] ✓ {} files [{:.2}s]",
        files.len(),
        start.elapsed().as_secs_f64()
    ));

    if let Some(report_path) = args.report {
        let report = FetchReport {
            root: args.root.display().to_string(),
            cwd: host.fs.cwd(),
            files,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(&report_path, json)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        stdio.stderr(&format!("[fetch] Report: {}", report_path.display()));
    }

    Ok(())
}
