//! Test application: a server on one end of an in-memory pipe, a
//! JSON-lines client on the other.

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

use artist_assist::api::Response;
use artist_assist::assets::AssetLoader;
use artist_assist::server::{create_server, RpcServer};

/// Test application with a connected client and direct access to the server
pub struct TestApp {
    pub server: Arc<RpcServer>,
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    next_id: u64,
    task: JoinHandle<std::io::Result<()>>,
}

impl TestApp {
    /// Create a new test application using embedded assets
    pub fn new() -> Self {
        let server =
            create_server(&AssetLoader::new(None, None)).expect("Failed to create server");
        Self::with_server(server)
    }

    pub fn with_server(server: RpcServer) -> Self {
        let server = Arc::new(server);
        let (client, remote) = tokio::io::duplex(64 * 1024);
        let (remote_read, remote_write) = tokio::io::split(remote);
        let (client_read, client_write) = tokio::io::split(client);

        let task = {
            let server = server.clone();
            tokio::spawn(async move { server.serve(BufReader::new(remote_read), remote_write).await })
        };

        Self {
            server,
            writer: client_write,
            lines: BufReader::new(client_read).lines(),
            next_id: 1,
            task,
        }
    }

    /// Send a raw line and read the response line
    pub async fn send_line(&mut self, line: &str) -> Response {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
        let response = self
            .lines
            .next_line()
            .await
            .unwrap()
            .expect("server closed the stream");
        serde_json::from_str(&response).unwrap()
    }

    /// Call a method with a fresh request id; checks the id is echoed
    pub async fn call(&mut self, method: &str, params: Value) -> Response {
        let id = self.next_id;
        self.next_id += 1;
        let line = serde_json::json!({"id": id, "method": method, "params": params}).to_string();
        let response = self.send_line(&line).await;
        assert_eq!(response.id, Some(id), "response id does not match request");
        response
    }

    /// Close the client side and wait for the server loop to end
    pub async fn finish(mut self) -> std::io::Result<()> {
        self.writer.shutdown().await?;
        self.task.await.expect("server task panicked")
    }
}
