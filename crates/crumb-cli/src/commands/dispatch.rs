use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Get => commands::get::handle(ctx, flags),
        Commands::Refresh(args) => commands::refresh::handle(args, ctx, flags),
        Commands::Invalidate => commands::invalidate::handle(ctx, flags),
        Commands::Status => commands::status::handle(ctx, flags),
    }
}
