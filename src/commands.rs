//! One-off commands that bypass the queue.

use std::path::Path;

use tracing::info;

use videoagent_browser::{FlowAutomator, PortDiscovery};
use videoagent_config::Config;

/// Submit a prompt file directly through the browser automator.
pub(crate) async fn submit_file(
    config: Config,
    file: &Path,
    port: Option<u16>,
    url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = tokio::fs::read_to_string(file).await?;
    if prompt.trim().is_empty() {
        return Err(format!("{} is empty", file.display()).into());
    }

    info!("Submitting {} to Flow", file.display());
    let automator = FlowAutomator::new(config.browser);
    let message = automator.run(&prompt, port, url.as_deref()).await?;
    println!("{}", message);
    Ok(())
}

/// Print the first reachable DevTools port.
pub(crate) async fn probe(config: Config, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let discovery = PortDiscovery::new(&config.browser);
    let preferred = port.or(config.browser.preferred_port);

    match discovery.choose_port(preferred).await {
        Some(found) => {
            println!("port:    {}", found.port);
            println!("browser: {}", found.version.browser);
            println!("devtools: {}", found.version.web_socket_debugger_url);
            Ok(())
        }
        None => {
            let tried = discovery.candidates(preferred).await;
            Err(format!("No DevTools endpoint answered on ports {:?}", tried).into())
        }
    }
}
