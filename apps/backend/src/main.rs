#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lexicard_backend::run().await
}
