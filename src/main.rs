use bulker::presentation::{cli::CliApp, logging::setup_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = CliApp::new();
    setup_logging(app.verbose());

    app.run().await
}
