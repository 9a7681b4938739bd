//! Integration tests driving the server over loopback TCP.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use touchbridge_daemon::config::DaemonConfig;
use touchbridge_daemon::{BatteryStatus, Dispatcher, Server, SystemBridge, SystemError};
use touchbridge_input::mock::{MockInjector, MockInjectorHandle};
use touchbridge_input::Injection;
use touchbridge_protocol::{LaunchRequest, MockLocation};
use touchbridge_types::{AxisCalibration, RawEvent, TouchCalibration};

/// Minimal host: brightness in memory, locations counted.
#[derive(Clone, Default)]
struct FakeHost {
    brightness: Arc<Mutex<u32>>,
    locations: Arc<Mutex<Vec<MockLocation>>>,
}

#[async_trait]
impl SystemBridge for FakeHost {
    async fn launch(&mut self, _request: &LaunchRequest) -> Result<(), SystemError> {
        Ok(())
    }

    async fn key_event(&mut self, _code: u32) -> Result<(), SystemError> {
        Ok(())
    }

    async fn mock_location(&mut self, location: &MockLocation) -> Result<(), SystemError> {
        self.locations.lock().unwrap().push(location.clone());
        Ok(())
    }

    async fn set_brightness(&mut self, level: u8) -> Result<(), SystemError> {
        *self.brightness.lock().unwrap() = u32::from(level);
        Ok(())
    }

    async fn brightness(&mut self) -> Result<u32, SystemError> {
        Ok(*self.brightness.lock().unwrap())
    }

    async fn battery(&mut self) -> Result<BatteryStatus, SystemError> {
        Ok(BatteryStatus {
            level: 100,
            charging: true,
        })
    }
}

struct Running {
    addr: std::net::SocketAddr,
    inputs: MockInjectorHandle,
    host: FakeHost,
}

async fn start() -> Running {
    let axis = AxisCalibration {
        maximum: 4095,
        resolution: 4096,
        ..AxisCalibration::default()
    };
    let injector = MockInjector::new(TouchCalibration {
        x: axis,
        y: axis,
        pressure: AxisCalibration::default(),
    });
    let inputs = injector.handle();
    let host = FakeHost::default();
    let dispatcher = Dispatcher::new(Box::new(injector), Box::new(host.clone()), 82).unwrap();

    let config = DaemonConfig {
        bind: "127.0.0.1".to_string(),
        port: 0,
        ..DaemonConfig::default()
    };
    let server = Server::bind(&config, dispatcher).unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    Running { addr, inputs, host }
}

async fn wait_for(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn gesture_and_queries_over_tcp() {
    let running = start().await;
    let stream = TcpStream::connect(running.addr).await.unwrap();
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    // Split mid-line to exercise reassembly on the server side.
    write.write_all(b"d 480 800\nD 0.5 0.").await.unwrap();
    write.write_all(b"5 1\nU 0 0 0\nZ\nP 128\n").await.unwrap();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("P 1 128"));

    write.write_all(b"G\nS\n").await.unwrap();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("G 128"));
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("S 100 1"));

    let injected = running.inputs.injected();
    assert_eq!(injected.len(), 2);
    let Injection::Touch(down) = &injected[0] else {
        panic!("expected touch burst");
    };
    assert_eq!(down[1], RawEvent::new(3, 0x00, 2));
    assert_eq!(down[2], RawEvent::new(3, 0x01, 4));
    assert_eq!(down.last(), Some(&RawEvent::new(0, 0, 0)));
}

#[tokio::test]
async fn short_location_is_dropped_and_connection_survives() {
    let running = start().await;
    let mut stream = TcpStream::connect(running.addr).await.unwrap();

    stream
        .write_all(b"L gps 1 2 3 4 5 6\nL gps 1 2 3 4 5 6 7\n")
        .await
        .unwrap();

    let locations = Arc::clone(&running.host.locations);
    wait_for(|| !locations.lock().unwrap().is_empty()).await;
    let recorded = locations.lock().unwrap().clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].speed, 7.0);
}

#[tokio::test]
async fn next_client_is_served_after_disconnect() {
    let running = start().await;

    let mut first = TcpStream::connect(running.addr).await.unwrap();
    first.write_all(b"B\n").await.unwrap();
    drop(first);

    let stream = TcpStream::connect(running.addr).await.unwrap();
    let (read, mut write) = stream.into_split();
    write.write_all(b"P 9\n").await.unwrap();
    let mut lines = BufReader::new(read).lines();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("P 1 9"));

    assert_eq!(running.inputs.injected().len(), 1);
    assert_eq!(running.inputs.hotplug_polls(), 2);
}
