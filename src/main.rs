#[tokio::main]
async fn main() -> anyhow::Result<()> {
    focusbuddy_lib::run().await
}
