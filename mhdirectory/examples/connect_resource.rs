//! Example: Resolve the best-reachable connection for a named resource
//!
//! Run with: MEDIAHOME_USERNAME=... MEDIAHOME_PASSWORD=... \
//!     cargo run -p mhdirectory --example connect_resource -- <resource-name>

use mhdirectory::{DirectoryClient, HttpProbe, SslPreference};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let name = std::env::args()
        .nth(1)
        .ok_or("usage: connect_resource <resource-name>")?;
    let username = std::env::var("MEDIAHOME_USERNAME")?;
    let password = std::env::var("MEDIAHOME_PASSWORD")?;

    let client = DirectoryClient::new()?;
    let account = client.sign_in(&username, &password).await?;

    let resource = client.resource(&account.auth_token, &name).await?;
    println!(
        "Resolving {} ({} candidate connections)...",
        resource.name,
        resource.connections.len()
    );

    let probe = Arc::new(HttpProbe::new()?);
    let session = resource.connect(SslPreference::Either, probe).await?;
    println!("Connected: {}", session.base_url());

    Ok(())
}
