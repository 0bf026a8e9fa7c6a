use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let credentials = ctx.resolver.get_auth()?;
    output(&credentials, flags.format)
}
