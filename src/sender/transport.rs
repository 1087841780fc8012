use super::serialization::{encode_record, frame_payload};
use crate::app::config::Protocol;
use crate::domain::{GelfError, GelfRecord};
use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket, lookup_host};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Bound on every individual write. Re-armed before each frame.
pub const WRITE_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum Connection {
    Stream(TcpStream),
    Datagram(UdpSocket),
}

/// A single outbound connection to a GELF input.
///
/// Opened once, written to once per record, and consumed by [`Transport::close`].
#[derive(Debug)]
pub struct Transport {
    connection: Connection,
    address: String,
    verbose: bool,
    write_deadline: Duration,
    frames_sent: u64,
    bytes_sent: u64,
}

impl Transport {
    pub async fn open(host: &str, port: u16, protocol: Protocol) -> Result<Self, GelfError> {
        let address = format!("{host}:{port}");
        let candidates = resolve(host, port, protocol)
            .await
            .map_err(|source| GelfError::Connection {
                address: address.clone(),
                source,
            })?;

        let connection = connect(&candidates, protocol)
            .await
            .map_err(|source| GelfError::Connection {
                address: address.clone(),
                source,
            })?;

        info!(%address, ?protocol, "Connected to GELF input");

        Ok(Self {
            connection,
            address,
            verbose: false,
            write_deadline: WRITE_DEADLINE,
            frames_sent: 0,
            bytes_sent: 0,
        })
    }

    /// Echo every encoded record to stdout before it is written.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_write_deadline(mut self, deadline: Duration) -> Self {
        self.write_deadline = deadline;
        self
    }

    /// Serialize, frame and write one record. Returns the number of bytes written.
    pub async fn send(&mut self, record: &GelfRecord) -> Result<usize, GelfError> {
        let json = encode_record(record)?;
        if self.verbose {
            echo(&json);
        }
        let frame = frame_payload(&json);

        let written = match timeout(self.write_deadline, self.write_frame(&frame)).await {
            Ok(result) => result.map_err(|source| self.write_error(source))?,
            Err(_) => {
                return Err(self.write_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("write deadline of {:?} exceeded", self.write_deadline),
                )));
            }
        };

        self.frames_sent += 1;
        self.bytes_sent += written as u64;
        debug!(
            message_id = record.message_id,
            bytes = written,
            "Wrote GELF frame"
        );
        Ok(written)
    }

    async fn write_frame(&mut self, frame: &[u8]) -> io::Result<usize> {
        match &mut self.connection {
            Connection::Stream(stream) => {
                stream.write_all(frame).await?;
                stream.flush().await?;
                Ok(frame.len())
            }
            Connection::Datagram(socket) => {
                let sent = socket.send(frame).await?;
                if sent != frame.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short datagram write: {sent} of {} bytes", frame.len()),
                    ));
                }
                Ok(sent)
            }
        }
    }

    fn write_error(&self, source: io::Error) -> GelfError {
        GelfError::Write {
            address: self.address.clone(),
            source,
        }
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Shut the connection down. Failures are logged, never fatal.
    pub async fn close(self) {
        if let Connection::Stream(mut stream) = self.connection
            && let Err(e) = stream.shutdown().await
        {
            warn!(address = %self.address, "Failed to shut down connection cleanly: {e}");
        }
        debug!(
            address = %self.address,
            frames = self.frames_sent,
            bytes = self.bytes_sent,
            "Closed GELF connection"
        );
    }
}

fn echo(json: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{json}") {
        warn!("Failed to echo record to stdout: {e}");
    }
}

async fn resolve(host: &str, port: u16, protocol: Protocol) -> io::Result<Vec<SocketAddr>> {
    let candidates: Vec<SocketAddr> = lookup_host((host, port))
        .await?
        .filter(|addr| protocol.accepts(addr))
        .collect();

    if candidates.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no {protocol:?} address found for {host}"),
        ));
    }
    Ok(candidates)
}

/// Try each resolved address in order and keep the first that connects.
async fn connect(candidates: &[SocketAddr], protocol: Protocol) -> io::Result<Connection> {
    let mut last_error = None;

    for addr in candidates {
        let attempt = match protocol {
            Protocol::Udp => connect_datagram(*addr).await.map(Connection::Datagram),
            Protocol::Tcp | Protocol::Tcp4 | Protocol::Tcp6 => {
                TcpStream::connect(*addr).await.map(Connection::Stream)
            }
        };

        match attempt {
            Ok(connection) => return Ok(connection),
            Err(e) => {
                debug!(%addr, "Connection attempt failed: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no address to dial")))
}

async fn connect_datagram(addr: SocketAddr) -> io::Result<UdpSocket> {
    let local = if addr.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    Ok(socket)
}
