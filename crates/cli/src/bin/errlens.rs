use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    errlens_cli::main_entry().await
}
