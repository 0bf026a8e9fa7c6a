use crate::cli::GlobalFlags;
use crate::cli::root_commands::RefreshArgs;
use crate::context::AppContext;
use crate::output::output;

pub fn handle(args: &RefreshArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.force && !ctx.resolver.is_remote_enabled() {
        tracing::warn!("--force has no effect while CookieCloud is disabled");
    }
    let credentials = ctx.resolver.refresh(args.force)?;
    output(&credentials, flags.format)
}
