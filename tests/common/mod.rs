//! Shared helpers for integration tests.
#![allow(dead_code)]

use meadowlark_d5020::adapters::{MockAdapter, SharedTransport};
use meadowlark_d5020::D5020;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Dual-channel device on a mock transport.
pub fn mock_device() -> (D5020, MockAdapter) {
    let mock = MockAdapter::new();
    let d5020 = D5020::new(SharedTransport::new(mock.clone()));
    (d5020, mock)
}

/// Minimal stand-in for a D5020 behind a serial-over-TCP server.
///
/// Records every received line and answers queries: `ver:?` with the
/// firmware string, `tmp:<ch>,?` with a fixed raw value and `tsp:<ch>,?`
/// with the last raw setpoint written for that channel.
pub struct FakeD5020 {
    pub addr: String,
    pub received: Arc<Mutex<Vec<String>>>,
    pub handle: JoinHandle<()>,
}

impl FakeD5020 {
    pub async fn start(firmware: &'static str, raw_temperature: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = socket.into_split();
            let mut lines = BufReader::new(reader).lines();
            let mut setpoints = [0u32; 3];

            while let Ok(Some(line)) = lines.next_line().await {
                log.lock().unwrap().push(line.clone());

                let reply = match line.split_once(':') {
                    Some(("ver", "?")) => Some(firmware.to_string()),
                    Some(("tmp", args)) if args.ends_with(",?") => {
                        Some(raw_temperature.to_string())
                    }
                    Some(("tsp", args)) => {
                        let (ch, value) = args.split_once(',').unwrap();
                        let ch: usize = ch.parse().unwrap();
                        if value == "?" {
                            Some(setpoints[ch].to_string())
                        } else {
                            setpoints[ch] = value.parse().unwrap();
                            None
                        }
                    }
                    _ => None,
                };

                if let Some(reply) = reply {
                    writer
                        .write_all(format!("{}\r\n", reply).as_bytes())
                        .await
                        .unwrap();
                }
            }
        });

        Self {
            addr,
            received,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("tcp://{}", self.addr)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}
