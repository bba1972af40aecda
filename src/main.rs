#[tokio::main]
async fn main() {
    if let Err(err) = pantrymatch::cli::run().await {
        eprintln!("pantrymatch: {}", err);
        std::process::exit(1);
    }
}
