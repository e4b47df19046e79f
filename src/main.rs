use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    synsight::cli::run_cli().await
}
