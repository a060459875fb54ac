//! Broadcast of formatted log lines to websocket subscribers.

use std::io::{self, Write};
use tokio::sync::broadcast;
use tracing_subscriber::fmt::MakeWriter;

/// Lines buffered per subscriber before the slowest one starts missing lines.
pub const LOG_STREAM_CAPACITY: usize = 1024;

/// Fans formatted log lines out to every `/log` subscriber.
///
/// Used as a `tracing_subscriber` writer; lines are dropped when nobody listens.
#[derive(Debug, Clone)]
pub struct LogBroadcaster {
    tx: broadcast::Sender<String>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOG_STREAM_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer handed out per event by [`LogBroadcaster`].
pub struct LogLineWriter {
    tx: broadcast::Sender<String>,
}

impl Write for LogLineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.tx.receiver_count() > 0 {
            let line = String::from_utf8_lossy(buf);
            let line = line.trim_end();
            if !line.is_empty() {
                let _ = self.tx.send(line.to_string());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBroadcaster {
    type Writer = LogLineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogLineWriter {
            tx: self.tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_reach_subscribers() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        let mut writer = broadcaster.make_writer();
        writer.write_all(b"INFO relay started\n").unwrap();

        assert_eq!(rx.recv().await.unwrap(), "INFO relay started");
    }

    #[test]
    fn test_no_subscribers_is_noop() {
        let broadcaster = LogBroadcaster::new();
        let mut writer = broadcaster.make_writer();
        assert_eq!(writer.write(b"dropped\n").unwrap(), 8);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
