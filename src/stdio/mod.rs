use crate::side_table::SideTable;
use std::any::Any;
use std::future::IntoFuture;
use std::io::Write;
use std::sync::{Arc, LazyLock};


/// A bound output sink
pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

static IO: LazyLock<SideTable<StdioSinks>> = LazyLock::new(SideTable::new);

/// Sink pairs recorded for interpreter instances by [`Stdio::get`]
pub fn io() -> &'static SideTable<StdioSinks> {
    &IO
}

/// Where interpreter output ends up
///
/// Both methods default to the process console, so implementors override
/// only the stream they want to capture.
pub trait StdioContext: Send + Sync {
    fn stdout(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", text);
    }

    fn stderr(&self, text: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", text);
    }
}

/// The process console
pub struct Console;

impl StdioContext for Console {}

/// The stdout/stderr pair bound to one context
#[derive(Clone)]
pub struct StdioSinks {
    pub stdout: Sink,
    pub stderr: Sink,
}

impl StdioSinks {
    fn bind(context: Arc<dyn StdioContext>) -> Self {
        let out = Arc::clone(&context);
        Self {
            stdout: Arc::new(move |text: &str| out.stdout(text)),
            stderr: Arc::new(move |text: &str| context.stderr(text)),
        }
    }
}

/// Stdio redirection for an interpreter that may not exist yet
pub struct Stdio {
    sinks: StdioSinks,
}

impl Stdio {
    /// Bind sinks to `init`, or to [`Console`] when no context is given
    pub fn new(init: Option<Arc<dyn StdioContext>>) -> Self {
        let context = init.unwrap_or_else(|| Arc::new(Console) as Arc<dyn StdioContext>);
        Self {
            sinks: StdioSinks::bind(context),
        }
    }

    pub fn stdout(&self, text: &str) {
        (self.sinks.stdout)(text)
    }

    pub fn stderr(&self, text: &str) {
        (self.sinks.stderr)(text)
    }

    pub fn sinks(&self) -> StdioSinks {
        self.sinks.clone()
    }

    /// Wait for the interpreter, then record this sink pair for it in [`io`]
    ///
    /// Returns the interpreter unchanged.
    pub async fn get<T, F>(&self, engine: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: IntoFuture<Output = Arc<T>>,
    {
        let interpreter = engine.await;
        io().insert(&interpreter, self.sinks.clone());
        interpreter
    }
}

impl Default for Stdio {
    fn default() -> Self {
        Self::new(None)
    }
}
