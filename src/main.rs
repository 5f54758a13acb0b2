use std::error::Error;

use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine: the process environment may already be set.
    let dotenv = dotenvy::dotenv();

    api::init_tracing()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, ".env not loaded, using process environment"),
    }

    api::start().await?;

    Ok(())
}
