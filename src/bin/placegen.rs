use std::path::PathBuf;

use anyhow::{bail, Result};

use folio::config::ServiceEnv;
use folio::generator;
use folio::storage::StorageClient;

/// Written next to the other public assets so the server and the album
/// pages pick it up without extra configuration.
const SIDECAR_PATH: &str = "public/placeholders.json";

#[ntex::main]
async fn main() -> Result<()> {
    let env = ServiceEnv::from_env();

    let (Some(url), Some(key)) = (env.storage_url, env.storage_key) else {
        bail!("STORAGE_API_URL and STORAGE_API_KEY must be set");
    };

    let client = StorageClient::new(&url, &key)?;
    let sidecar_path = PathBuf::from(SIDECAR_PATH);

    let stats = generator::run(&client, &sidecar_path).await?;

    if stats.discovered == 0 {
        println!("No files found in the bucket.");
        return Ok(());
    }

    println!("Discovered {} files in the bucket.", stats.discovered);
    println!("Newly generated: {} placeholders.", stats.generated);
    println!("Total placeholders in file: {}", stats.total);
    println!("Saved to {}", sidecar_path.display());

    Ok(())
}
