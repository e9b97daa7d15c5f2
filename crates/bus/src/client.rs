//! Subscriber side of the notification bus.

use std::io;
use std::net::SocketAddr;

use beacon_proto::{MAX_FRAME_LEN, NotificationEvent, decode_frame};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// Errors establishing a subscriber connection.
#[derive(Debug, Error)]
pub enum ClientError {
	/// Nothing is listening at the bus address, or the connect failed.
	#[error("failed to connect to notification bus at {addr}: {source}")]
	Connect {
		/// Address that was dialled.
		addr: SocketAddr,
		/// Underlying I/O error.
		#[source]
		source: io::Error,
	},
}

/// Why [`NotificationClient::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientExit {
	/// The bus closed the connection or it failed. No reconnect is attempted.
	Disconnected,
	/// The shutdown token fired.
	Shutdown,
}

enum Frame {
	Line,
	TooLong(usize),
	Eof,
}

/// A single connection to the bus.
#[derive(Debug)]
pub struct NotificationClient {
	addr: SocketAddr,
	stream: TcpStream,
}

impl NotificationClient {
	/// Connects to the bus at `addr`.
	///
	/// # Errors
	///
	/// Returns [`ClientError::Connect`] if the connection cannot be established.
	pub async fn connect(addr: SocketAddr) -> Result<Self, ClientError> {
		let stream = TcpStream::connect(addr)
			.await
			.map_err(|source| ClientError::Connect { addr, source })?;
		tracing::info!(%addr, "client.connected");
		Ok(Self { addr, stream })
	}

	/// Address this client is connected to.
	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	/// Reads frames and hands each decoded event to `sink` until the
	/// connection ends or `shutdown` fires.
	///
	/// Frames that fail to decode are logged and skipped.
	pub async fn run<F>(self, shutdown: CancellationToken, mut sink: F) -> ClientExit
	where
		F: FnMut(NotificationEvent),
	{
		let addr = self.addr;
		let mut reader = BufReader::new(self.stream);
		let mut line = Vec::new();

		loop {
			let read = tokio::select! {
				_ = shutdown.cancelled() => {
					tracing::info!(%addr, "client.shutdown");
					return ClientExit::Shutdown;
				}
				read = read_frame(&mut reader, &mut line) => read,
			};

			match read {
				Ok(Frame::Line) => match std::str::from_utf8(&line).map(decode_frame) {
					Ok(Ok(event)) => sink(event),
					Ok(Err(error)) => tracing::warn!(%addr, %error, "client.malformed_frame"),
					Err(error) => tracing::warn!(%addr, %error, "client.non_utf8_frame"),
				},
				Ok(Frame::TooLong(len)) => {
					tracing::warn!(%addr, len, max = MAX_FRAME_LEN, "client.oversized_frame");
				}
				Ok(Frame::Eof) => {
					tracing::info!(%addr, "client.disconnected");
					return ClientExit::Disconnected;
				}
				Err(error) => {
					tracing::warn!(%addr, %error, "client.read_failed");
					return ClientExit::Disconnected;
				}
			}
		}
	}
}

/// Reads one newline-terminated frame into `line`, without the newline.
///
/// Frames longer than [`MAX_FRAME_LEN`] are consumed up to the next newline
/// and reported as [`Frame::TooLong`]. Blank lines are skipped.
async fn read_frame<R>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<Frame>
where
	R: AsyncBufRead + Unpin,
{
	loop {
		line.clear();
		let limit = MAX_FRAME_LEN as u64 + 1;
		let n = (&mut *reader).take(limit).read_until(b'\n', line).await?;
		if n == 0 {
			return Ok(Frame::Eof);
		}

		if line.last() == Some(&b'\n') {
			line.pop();
		} else if line.len() > MAX_FRAME_LEN {
			let skipped = discard_line(reader).await?;
			return Ok(Frame::TooLong(line.len() + skipped));
		}

		if !line.iter().all(u8::is_ascii_whitespace) {
			return Ok(Frame::Line);
		}
	}
}

/// Consumes input up to and including the next newline. Returns bytes skipped.
async fn discard_line<R>(reader: &mut R) -> io::Result<usize>
where
	R: AsyncBufRead + Unpin,
{
	let mut skipped = 0;
	loop {
		let buf = reader.fill_buf().await?;
		if buf.is_empty() {
			return Ok(skipped);
		}
		match buf.iter().position(|b| *b == b'\n') {
			Some(i) => {
				reader.consume(i + 1);
				return Ok(skipped + i);
			}
			None => {
				let len = buf.len();
				skipped += len;
				reader.consume(len);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use tokio::io::AsyncWriteExt;
	use tokio::net::TcpListener;

	use super::*;

	async fn pair() -> (NotificationClient, TcpStream) {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let client = NotificationClient::connect(addr).await.unwrap();
		let (server, _) = listener.accept().await.unwrap();
		(client, server)
	}

	#[tokio::test]
	async fn malformed_frames_are_skipped() {
		let (client, mut server) = pair().await;
		let oversized = format!("{}\n", "x".repeat(MAX_FRAME_LEN + 10));
		let mut input = Vec::new();
		input.extend_from_slice(b"not json\n");
		input.extend_from_slice(b"{\"success\":\"yes\",\"message\":\"x\"}\n");
		input.extend_from_slice(b"\r\n");
		input.extend_from_slice(oversized.as_bytes());
		input.extend_from_slice(b"{\"success\":true,\"message\":\"OK\"}\n");
		input.extend_from_slice(b"\xff\xfe\n");
		input.extend_from_slice(b"{\"success\":false,\"message\":\"last\"}\r\n");
		tokio::spawn(async move {
			server.write_all(&input).await.unwrap();
			server.shutdown().await.unwrap();
		});

		let mut received = Vec::new();
		let exit = client
			.run(CancellationToken::new(), |event| received.push(event))
			.await;

		assert_eq!(exit, ClientExit::Disconnected);
		assert_eq!(
			received,
			vec![NotificationEvent::success("OK"), NotificationEvent::failure("last")]
		);
	}

	#[tokio::test]
	async fn shutdown_stops_reading() {
		let (client, _server) = pair().await;
		let shutdown = CancellationToken::new();
		shutdown.cancel();

		let exit = client.run(shutdown, |_| panic!("no events expected")).await;
		assert_eq!(exit, ClientExit::Shutdown);
	}

	#[tokio::test]
	async fn trailing_frame_without_newline_is_delivered() {
		let (client, mut server) = pair().await;
		server.write_all(br#"{"success":true,"message":"tail"}"#).await.unwrap();
		server.shutdown().await.unwrap();

		let mut received = Vec::new();
		client.run(CancellationToken::new(), |event| received.push(event)).await;
		assert_eq!(received, vec![NotificationEvent::success("tail")]);
	}

	#[tokio::test]
	async fn connect_to_closed_port_fails() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let err = NotificationClient::connect(addr).await.unwrap_err();
		assert!(matches!(err, ClientError::Connect { addr: a, .. } if a == addr));
	}
}
