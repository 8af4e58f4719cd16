//! Simple IRC client example
//!
//! Connects to a server, joins a channel, prints what happens there and
//! greets the channel once the member list has arrived. The host drives the
//! client by calling `poll()` on a fixed cadence.
//!
//! ```text
//! RUST_LOG=slirc_client=debug cargo run --example simple_client -- irc.libera.chat 6667 '#example'
//! ```

use std::time::{Duration, Instant};

use anyhow::Context as _;
use slirc_client::{Client, ClientConfig, ConnectionConfig, Event};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "irc.libera.chat".to_string());
    let port: u16 = args
        .next()
        .map(|p| p.parse())
        .transpose()
        .context("port must be a number")?
        .unwrap_or(6667);
    let channel = args.next().unwrap_or_else(|| "#example".to_string());

    let params = ConnectionConfig::new(host, port, "slirc_demo");
    params.validate()?;

    let mut client = Client::new(ClientConfig::default());
    let (tx, rx) = slirc_client::ChannelListener::pair();
    client.subscribe(tx);
    client.subscribe(|event: &Event| match event {
        Event::Message { target, from, text } => println!("[{}] <{}> {}", target, from, text),
        Event::Action { target, from, text } => println!("[{}] * {} {}", target, from, text),
        Event::Notice { from, text } => {
            println!("-{}- {}", from.as_deref().unwrap_or("server"), text)
        }
        Event::UserJoined { channel, nick } => println!("[{}] --> {}", channel, nick),
        Event::UserLeft { channel, nick, .. } => println!("[{}] <-- {}", channel, nick),
        Event::Connected => println!("✓ connected"),
        Event::Disconnected => println!("✗ disconnected"),
        _ => {}
    });

    client
        .connect(params)
        .context("could not connect to the server")?;

    let started = Instant::now();
    let mut joined = false;
    while started.elapsed() < Duration::from_secs(120) {
        client.poll();

        for event in rx.try_iter() {
            match event {
                // 001 means registration went through
                Event::CommandReceived(cmd) if cmd.verb() == "001" && !joined => {
                    client.handle_input(None, &format!("/join {}", channel));
                    joined = true;
                }
                Event::NamesSynced { channel: synced } if synced == channel => {
                    if let Some(chan) = client.channels().get(&channel) {
                        println!(
                            "{} members, {} operators",
                            chan.roster.len(),
                            chan.roster.operator_count()
                        );
                    }
                    client.handle_input(Some(&channel), "Hello from slirc-client!");
                }
                _ => {}
            }
        }

        std::thread::sleep(Duration::from_millis(50));
    }

    client.close_channel(&channel);
    client.disconnect();
    Ok(())
}
