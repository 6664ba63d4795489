use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tennis_news_lib::run_updater().await
}
