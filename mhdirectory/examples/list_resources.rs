//! Example: Sign in and list account resources and devices
//!
//! Run with: MEDIAHOME_USERNAME=... MEDIAHOME_PASSWORD=... \
//!     cargo run -p mhdirectory --example list_resources

use mhdirectory::DirectoryClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let username = std::env::var("MEDIAHOME_USERNAME")?;
    let password = std::env::var("MEDIAHOME_PASSWORD")?;

    let client = DirectoryClient::new()?;
    let account = client.sign_in(&username, &password).await?;
    println!("Signed in as {}\n", account.username);

    let resources = client.resources(&account.auth_token).await?;
    println!("=== Resources ({}) ===", resources.len());
    for resource in &resources {
        println!(
            "  {} [{}] owned={} online={} connections={}",
            resource.name,
            resource.product.as_deref().unwrap_or("?"),
            resource.owned,
            resource.presence,
            resource.connections.len()
        );
    }

    let devices = client.devices(&account.auth_token).await?;
    println!("\n=== Devices ({}) ===", devices.len());
    for device in &devices {
        println!(
            "  {} [{}] connections={}",
            device.name,
            device.product.as_deref().unwrap_or("?"),
            device.connections.len()
        );
    }

    Ok(())
}
