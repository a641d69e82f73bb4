use ontwatch_core::ExporterConfig;

use crate::error::CliError;
use crate::output;

pub async fn handle(config: &ExporterConfig) -> Result<(), CliError> {
    let session = ontwatch_core::connect(config).await?;
    output::print_output(&format!("logged in to {}", session.endpoint()));
    Ok(())
}
