//! roomchat terminal client entry point.
//!
//! Joins one room, prints incoming messages, and sends stdin lines as chat.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::EnvFilter;

use roomchat::config::ClientConfig;
use roomchat::service::{GuestNameGenerator, SessionController};
use roomchat::terminal::{self, HELP_TEXT, Intent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the chat
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(url = %config.ws_url, room_id = %config.room_id, "starting roomchat");

    let mut session = SessionController::from_config(&config, &GuestNameGenerator);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let state = session.state();
    let banner = format!(
        "* joining room {} as {}",
        state.room_id(),
        state.display_name()
    );
    write_line(&mut stdout, &banner).await?;
    write_line(&mut stdout, HELP_TEXT).await?;

    loop {
        tokio::select! {
            event = session.next_event() => {
                match event {
                    Some(event) => session.apply(event),
                    None => break,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match terminal::parse_line(&line) {
                    Intent::Send(text) => {
                        if !session.send_message(&text) {
                            write_line(&mut stdout, "* not connected, message not sent").await?;
                        }
                    }
                    Intent::Rename(name) => {
                        session.commit_name_change(name);
                    }
                    Intent::Help => write_line(&mut stdout, HELP_TEXT).await?,
                    Intent::Unknown(command) => {
                        write_line(&mut stdout, &format!("* unknown command /{command}")).await?;
                        write_line(&mut stdout, HELP_TEXT).await?;
                    }
                    Intent::Quit => break,
                    Intent::Ignore => {}
                }
            }
        }

        while let Ok(update) = updates.try_recv() {
            write_line(&mut stdout, &terminal::render_event(&update)).await?;
        }
        if session.connection_status().is_closed() {
            break;
        }
    }

    session.teardown();
    tracing::info!("roomchat exiting");
    Ok(())
}

async fn write_line(stdout: &mut Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
