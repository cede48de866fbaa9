#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = edulearn_rust::run().await {
        eprintln!("edulearn-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
