#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ielts_ingest_server::start().await
}
