// Public API exports
pub mod config;
pub mod fetch;
pub mod path;
pub mod side_table;
pub mod snippet;
pub mod stdio;
pub mod vfs;

// Re-export main types for convenience
pub use config::Config;
pub use side_table::SideTable;
pub use snippet::clean;
pub use stdio::{Console, Stdio, StdioContext, StdioSinks};
pub use vfs::{
    write_file, write_file_rich, write_file_shim, DirFs, ExtendedFs, MemoryFs, MemoryFsBuilder,
    VirtualFs,
};

pub use fetch::{
    absolute_url, calculate_fetch_paths, fetch_paths, ConfigError, FetchConfig, FetchDescriptor,
    FetchError, Fetcher, FsModule, HttpFetcher, Interpreter, InterpreterModule, ResolvedFetch,
};
