#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dateplan_core::bootstrap::bootstrap().await
}
