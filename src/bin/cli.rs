use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if !forum::cli::run().await? {
        std::process::exit(1);
    }
    Ok(())
}
