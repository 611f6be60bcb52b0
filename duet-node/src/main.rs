//! Duet node
//!
//! One side of the Duet demo pair. Finds the other side over UDP, then runs
//! the synchronized demo rotation and draws it on the terminal.

use std::io::Stdout;

use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use log::{error, info, trace};

use duet_core::config::Role;
use duet_core::Node;
use duet_display::{compose_error, compose_splash, splash_words, DisplayBackend, Identity, Screen};

mod channels;
mod config;
mod display;
mod error;
mod link;
mod logger;
mod parse_args;
mod tasks;

#[cfg(test)]
#[allow(dead_code)]
#[path = "../build.rs"]
mod build_script;

use crate::config::{FileConfig, LinkConfig};
use crate::display::TerminalDisplay;
use crate::error::NodeError;
use crate::link::UdpLink;
use crate::parse_args::AppArgs;
use crate::tasks::Runner;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let (args, config, mut display) = match startup() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("duet-node: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    info!(
        "Duet node starting as {:?} ({})",
        config.node.role,
        config.node.display_name()
    );

    if !args.no_splash {
        show_splash(&mut display, config.node.role).await;
    }

    let link = match start_link(&config.link) {
        Ok(link) => link,
        Err(e) => {
            error!("{}", e);
            let mut screen = Screen::new();
            compose_error(&mut screen, &Identity::from_config(&config.node), "no UDP socket");
            if let Err(e) = display.render(&screen) {
                error!("Error screen render failed: {:?}", e);
            }
            park().await;
            return;
        }
    };

    let start = Instant::now();
    let node = Node::new(config.node, 0);
    info!("Searching for peer...");

    tasks::node_task(Runner::new(node, link, display), start).await;
}

/// Parse arguments, install the logger, load the configuration and take
/// over the terminal
fn startup() -> Result<(AppArgs, FileConfig, TerminalDisplay<Stdout>), NodeError> {
    let args = parse_args::parse_args()?;
    logger::init(args.verbosity, args.log_file.as_deref()).map_err(NodeError::Log)?;
    let config = config::load_config(&args)?;
    let display = TerminalDisplay::stdout().map_err(NodeError::Terminal)?;
    Ok((args, config, display))
}

/// Bind the socket and start the receive thread
fn start_link(config: &LinkConfig) -> Result<UdpLink, NodeError> {
    let link = UdpLink::bind(config).map_err(NodeError::Link)?;
    let receiver = link.receiver(tasks::READ_TIMEOUT).map_err(NodeError::Link)?;
    tasks::spawn_link_rx(receiver).map_err(NodeError::Link)?;

    info!(
        "Link bound to {}, discovery via {}",
        link.local_addr(),
        config.discovery
    );
    Ok(link)
}

/// Boot splash, one word per second
async fn show_splash<D: DisplayBackend>(display: &mut D, role: Role) {
    let mut screen = Screen::new();
    for word in splash_words(role) {
        compose_splash(&mut screen, word);
        if let Err(e) = display.render(&screen) {
            error!("Splash render failed: {:?}", e);
            return;
        }
        Timer::after_secs(1).await;
    }
}

/// Nothing left to do but keep the error on screen
async fn park() {
    loop {
        Timer::after_secs(60).await;
        trace!("Parked");
    }
}
