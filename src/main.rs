use bytes::Bytes;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wicket::config::Config;
use wicket::http::Message;
use wicket::server::Server;

const HELLO_PAGE: &str = r#"
      <head></head>
      <body style="margin-top: 1em; background-color: #eee;">
        <h1 style="font-color: #333; text-align: center; font-family: sans;">Hello!</h1>
      </body>
    "#;

fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.workers)
        .enable_all()
        .build()?
        .block_on(serve(cfg))
}

async fn serve(cfg: Config) -> anyhow::Result<()> {
    let server = Server::bind(&cfg, hello).await?;

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn hello(_request: &Message, response: &mut Message) {
    response.status = 200;
    response.payload = Bytes::from_static(HELLO_PAGE.as_bytes());
    response.headers.insert("Content-Type", "text/html");
}
