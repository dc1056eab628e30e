pub mod catalog;
pub mod server;
pub mod stores;
pub mod token;

use crate::cli::api::ApiClient;
use crate::cli::config::{self, ClientConfig};
use crate::cli::form::{FormError, FormOutcome};
use crate::cli::OutputFormat;

/// Effective client configuration plus a client built from it
pub(crate) fn connect() -> anyhow::Result<(ClientConfig, ApiClient)> {
    let config = config::load()?;
    let client = ApiClient::new(&config.server_url, config.token.clone())?;
    Ok((config, client))
}

/// Print a form outcome: toast, then the route the dashboard would open
pub(crate) fn report(outcome: &FormOutcome, output_format: &OutputFormat) -> anyhow::Result<()> {
    outcome.toast.render(output_format)?;
    if let OutputFormat::Text = output_format {
        if let Some(route) = &outcome.redirect {
            println!("→ {}", route);
        }
    }
    Ok(())
}

/// Turn a local form failure into a command error, listing bad fields
pub(crate) fn form_failure(heading: &str, err: FormError) -> anyhow::Error {
    if let FormError::Invalid(validation) = &err {
        for (field, message) in &validation.field_errors {
            eprintln!("  {}: {}", field, message);
        }
        return anyhow::anyhow!("{}: invalid values", heading);
    }
    anyhow::anyhow!("{}: {}", heading, err)
}
