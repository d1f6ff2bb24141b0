mod client;
mod descriptor;
mod error;


pub use client::{absolute_url, Fetcher, HttpFetcher};
pub use descriptor::{calculate_fetch_paths, FetchConfig, FetchDescriptor, ResolvedFetch};
pub use error::{ConfigError, Error, FetchError};

use crate::side_table::SideTable;
use crate::vfs::{self, VirtualFs};
use std::io;
use std::sync::{Arc, LazyLock};
use tokio::task::JoinSet;
use url::Url;

static BASE: LazyLock<SideTable<Url>> = LazyLock::new(SideTable::new);

/// Base URLs that relative `from` values of a [`FetchConfig`] resolve against
pub fn base() -> &'static SideTable<Url> {
    &BASE
}

/// An interpreter instance that owns a virtual filesystem
pub trait Interpreter: Send + Sync + 'static {
    fn fs(&self) -> &dyn VirtualFs;
}

/// Knows how to store bytes inside a given kind of interpreter
pub trait InterpreterModule<I>: Send + Sync + 'static {
    fn write_file(&self, interpreter: &I, path: &str, buffer: Vec<u8>) -> io::Result<()>;
}

/// Writes through the interpreter's own filesystem handle
pub struct FsModule;

impl<I: Interpreter> InterpreterModule<I> for FsModule {
    fn write_file(&self, interpreter: &I, path: &str, buffer: Vec<u8>) -> io::Result<()> {
        vfs::write_file(interpreter.fs(), path, buffer)
    }
}

/// Fetch every file named by `config` and write it into `interpreter`
///
/// The list is validated and every URL resolved before the first request
/// goes out. Each file is then fetched on its own task and written on the
/// blocking pool. The first failure is returned as soon as it happens; tasks
/// still in flight are detached, not cancelled, and may still write their
/// file. On success the written entries are returned in configuration order.
#[tracing::instrument(skip_all, fields(descriptors = config.len()))]
pub async fn fetch_paths<M, I, F>(
    module: Arc<M>,
    interpreter: Arc<I>,
    fetcher: Arc<F>,
    config: &Arc<FetchConfig>,
) -> Result<Vec<ResolvedFetch>, Error>
where
    M: InterpreterModule<I>,
    I: Send + Sync + 'static,
    F: Fetcher,
{
    let entries = calculate_fetch_paths(config.descriptors())?;
    let base_url = base().get(config);

    let mut resolved = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = absolute_url(&entry.url, base_url.as_ref())?;
        resolved.push((entry, url));
    }

    let mut tasks = JoinSet::new();
    for (index, (entry, url)) in resolved.into_iter().enumerate() {
        let module = Arc::clone(&module);
        let interpreter = Arc::clone(&interpreter);
        let fetcher = Arc::clone(&fetcher);

        tasks.spawn(async move {
            let buffer = fetcher.fetch(url.clone()).await?;
            let size = buffer.len();
            let path = entry.path.clone();
            // Handle writes are synchronous and may hit the host disk
            tokio::task::spawn_blocking(move || module.write_file(&interpreter, &path, buffer))
                .await??;
            tracing::debug!(url = %url, path = %entry.path, bytes = size, "fetched");
            Ok::<_, Error>((index, entry))
        });
    }

    let mut written = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined.map_err(Error::from).and_then(|result| result) {
            Ok(done) => written.push(done),
            Err(err) => {
                tracing::warn!(detached = tasks.len(), error = %err, "fetch failed");
                tasks.detach_all();
                return Err(err);
            }
        }
    }

    written.sort_by_key(|(index, _)| *index);
    tracing::info!(files = written.len(), "fetch complete");
    Ok(written.into_iter().map(|(_, entry)| entry).collect())
}
