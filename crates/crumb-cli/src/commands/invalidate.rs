use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct InvalidateResponse {
    cleared: bool,
    cache_path: String,
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let cleared = ctx.resolver.invalidate();

    output(
        &InvalidateResponse {
            cleared,
            cache_path: ctx.resolver.cache().path().display().to_string(),
        },
        flags.format,
    )
}
