pub mod commands;
pub mod logging;
pub mod terminal;

use tokio::sync::mpsc;

/// Read one line from stdin. No prompt: stdout carries the feed frames.
pub fn readline() -> Result<String, String> {
    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Err("stdin closed".to_string());
    }
    Ok(buffer)
}

/// Feed stdin lines into a channel from a plain thread, so the async side
/// can `select!` on them. The channel closes when stdin does.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        while let Ok(line) = readline() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
