//! Status command handler.

use m7350_api::M7350Client;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &M7350Client, global: &GlobalOpts) -> Result<(), CliError> {
    let status = client.status().await?;
    let out = output::render_document(&global.output, &status)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
