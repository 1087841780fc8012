use gelf_sender::app;

#[tokio::main]
async fn main() {
    app::main().await;
}
