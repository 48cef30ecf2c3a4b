use crossbeam_channel::unbounded;
use log::{error, info};
use tokio::sync::broadcast;

use exhibit_tag_codec::config::Config;
use exhibit_tag_codec::types::{CodecCommand, OutgoingMessage};
use exhibit_tag_codec::{service, ws};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Starting exhibit tag codec service...");

    // Channel: WS -> codec worker (Commands)
    let (cmd_tx, cmd_rx) = unbounded::<CodecCommand>();

    // Channel: codec worker -> WS (Events)
    let (event_tx, event_rx) = broadcast::channel::<OutgoingMessage>(config.event_capacity);

    // The worker is a plain OS thread; bridge its sync replies into the broadcast
    let worker_config = config.clone();
    std::thread::spawn(move || {
        let (bridge_tx, bridge_rx) = unbounded::<OutgoingMessage>();

        std::thread::spawn(move || {
            service::run(bridge_tx, cmd_rx, worker_config);
        });

        while let Ok(msg) = bridge_rx.recv() {
            let _ = event_tx.send(msg);
        }
    });

    ws::start_server(cmd_tx, event_rx, config.listen_addr, config.event_capacity).await;
}
