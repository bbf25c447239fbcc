use std::sync::Arc;

use docchat::app::services::{ActionService, ChannelService, EventService};
use docchat::client::HttpServer;
use docchat::config::{Configuration, init_logger, verbose};
use docchat::models::Action;
use docchat::{
    app::{App, destruct_terminal_for_panic},
    cli::{self, Command},
};
use eyre::Result;
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    let config = cmd.get_config()?;
    Configuration::init(config.clone())?;

    if let Some(action) = cmd.action() {
        return cli::run(&config, action).await;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    let server = Arc::new(HttpServer::from(&config));
    verbose!("[+] Using server {}", server.base_url());

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let (chat_tx, chat_rx) = mpsc::unbounded_channel::<String>();

    let mut events = EventService::default();

    let mut task_set = task::JoinSet::new();
    let token = CancellationToken::new();

    let mut action_service = ActionService::new(
        server,
        action_rx,
        chat_tx,
        Arc::new(events.event_tx()),
        token.clone(),
    );
    task_set.spawn(async move { action_service.run().await });

    let mut channel_service = ChannelService::new(
        config.server.base_url.as_str(),
        chat_rx,
        Arc::new(events.event_tx()),
        token.clone(),
    );
    task_set.spawn(async move { channel_service.run().await });
    verbose!("[+] Services started");

    let mut app = App::new(&config, action_tx, token.clone());
    if let Err(err) = app.run(&mut events).await {
        eprintln!("Error: {}", err);
    }

    token.cancel();
    task_set.abort_all();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(Err(err)) => log::error!("Service error: {}", err),
            Err(err) if !err.is_cancelled() => log::error!("Task error: {}", err),
            _ => {}
        }
    }

    Ok(())
}
