use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Resolve credentials (cache, then CookieCloud, then static config).
    Get,
    /// Resolve again, optionally bypassing a still-valid cache.
    Refresh(RefreshArgs),
    /// Delete the cached credentials without fetching new ones.
    Invalidate,
    /// Show resolver mode and cache state (never prints secrets).
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct RefreshArgs {
    /// Clear the cache first so the remote source is always consulted.
    #[arg(long)]
    pub force: bool,
}
