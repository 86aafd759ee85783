//! User commands typed on stdin: the terminal counterpart of the connect/disconnect
//! controls.
use std::io::BufRead;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use strum_macros::{Display, EnumString};

/// A command entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserCommand {
    Connect,
    Disconnect,
    #[strum(serialize = "quit", serialize = "exit", serialize = "q")]
    Quit,
}

/// Parse every non-empty line of `reader` into commands and forward them to `tx`.
///
/// Unknown input is reported and skipped. Returns when input ends or the receiver is gone.
pub fn forward_commands<R: BufRead>(reader: R, tx: &Sender<UserCommand>) {
    for line_result in reader.lines() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read command: {}", e);
                break;
            }
        };
        let trimmed_line = line.trim();
        if trimmed_line.is_empty() {
            continue;
        }

        match trimmed_line.parse::<UserCommand>() {
            Ok(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            Err(_) => warn!(
                "Unknown command '{}'. Use: connect, disconnect, quit",
                trimmed_line
            ),
        }
    }
    debug!("Command input closed");
}

/// Spawn a thread reading commands from `reader`.
pub fn spawn_reader<R: BufRead + Send + 'static>(reader: R) -> Receiver<UserCommand> {
    let (tx, rx) = unbounded();
    thread::spawn(move || forward_commands(reader, &tx));
    rx
}
