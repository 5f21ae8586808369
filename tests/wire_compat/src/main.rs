fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

/// Byte-level conversations with a live server, written out by hand the way
/// deployed clients put them on the wire. These do not use `pap-protocol`,
/// so a change to the codec that alters the encoding fails here.
#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use pap_file_ops::{PathResolver, SystemUsers};
    use pap_server::{PapServer, ServerConfig};
    use pap_session::SessionEngine;

    /// No passwd entry, so `~` resolves to the server's process home.
    const IDENTITY: &[u8] = b"pap-compat-nobody-9e1d";

    async fn start(home: &Path) -> (Arc<PapServer>, u16) {
        let resolver = PathResolver::new(SystemUsers, Some(home.to_path_buf()));
        let config = ServerConfig {
            bind_address: [127, 0, 0, 1].into(),
            port: 0,
        };
        let server = PapServer::new(config, SessionEngine::new(resolver));
        let runner = Arc::clone(&server);
        tokio::spawn(async move { runner.run().await.unwrap() });

        let port = loop {
            let p = server.port().await;
            if p > 0 {
                break p;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        };
        (server, port)
    }

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    /// Unlock byte, identity frame, mode byte, path frame.
    fn request(mode: u8, path: impl AsRef<[u8]>) -> Vec<u8> {
        let mut out = vec![0x01];
        out.extend(frame(IDENTITY));
        out.push(mode);
        out.extend(frame(path.as_ref()));
        out
    }

    /// Sends `bytes` and returns everything the server writes before closing.
    async fn exchange(port: u16, bytes: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream.write_all(bytes).await.unwrap();
        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        reply
    }

    #[tokio::test]
    async fn download_reply_layout() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("hello.txt"), b"hi there").unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'D', "~/hello.txt")).await;

        let mut expected = vec![0x00, 0x00, 0x00, 0x00, 0x09];
        expected.extend_from_slice(b"hello.txt");
        expected.extend_from_slice(b"hi there");
        assert_eq!(reply, expected);

        server.shutdown();
    }

    #[tokio::test]
    async fn download_missing_file_is_single_error_byte() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'D', "~/nope")).await;
        assert_eq!(reply, vec![0x01]);

        server.shutdown();
    }

    #[tokio::test]
    async fn upload_ack_then_raw_body() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        stream
            .write_all(&request(b'U', "~/deep/er/file.bin"))
            .await
            .unwrap();

        let mut ack = [0u8; 1];
        stream.read_exact(&mut ack).await.unwrap();
        assert_eq!(ack, [0x00]);

        stream.write_all(b"raw body, no framing").await.unwrap();
        stream.shutdown().await.unwrap();

        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());

        assert_eq!(
            std::fs::read(home.path().join("deep/er/file.bin")).unwrap(),
            b"raw body, no framing"
        );

        server.shutdown();
    }

    #[tokio::test]
    async fn upload_into_directory_target_is_error_byte() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("taken")).unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'U', "~/taken")).await;
        assert_eq!(reply, vec![0x01]);

        server.shutdown();
    }

    #[tokio::test]
    async fn upload_parent_creation_failure_closes_without_status() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("plain"), b"a file, not a directory").unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'U', "~/plain/child.bin")).await;
        assert!(reply.is_empty());

        server.shutdown();
    }

    #[tokio::test]
    async fn list_reply_layout() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("box")).unwrap();
        std::fs::write(home.path().join("box/one"), b"").unwrap();
        std::fs::write(home.path().join("box/three"), b"").unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'L', "~/box")).await;

        assert_eq!(reply[0], 0x00);
        assert_eq!(&reply[reply.len() - 4..], &[0, 0, 0, 0]);

        // Entry order follows the directory and is not fixed.
        let body = &reply[1..reply.len() - 4];
        let one = frame(b"one");
        let three = frame(b"three");
        assert_eq!(body.len(), one.len() + three.len());
        assert!(
            body == [one.clone(), three.clone()].concat() || body == [three, one].concat(),
            "unexpected list body {body:?}"
        );

        server.shutdown();
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn listed_non_utf8_name_downloads_byte_for_byte() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("box")).unwrap();
        std::fs::write(
            home.path().join("box").join(OsStr::from_bytes(b"caf\xe9.txt")),
            b"menu",
        )
        .unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &request(b'L', "~/box")).await;
        let mut expected = vec![0x00];
        expected.extend(frame(b"caf\xe9.txt"));
        expected.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(reply, expected);

        let reply = exchange(port, &request(b'D', b"~/box/caf\xe9.txt")).await;
        let mut expected = vec![0x00];
        expected.extend(frame(b"caf\xe9.txt"));
        expected.extend_from_slice(b"menu");
        assert_eq!(reply, expected);

        server.shutdown();
    }

    #[tokio::test]
    async fn list_oversized_path_frame_is_error_byte() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        let mut bytes = vec![0x01];
        bytes.extend(frame(IDENTITY));
        bytes.push(b'L');
        bytes.extend_from_slice(&5000u32.to_be_bytes());

        let reply = exchange(port, &bytes).await;
        assert_eq!(reply, vec![0x01]);

        server.shutdown();
    }

    #[tokio::test]
    async fn wrong_unlock_byte_gets_no_reply() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        assert!(exchange(port, &[0x00]).await.is_empty());
        assert!(exchange(port, &[0xFF]).await.is_empty());

        // Still serving.
        std::fs::write(home.path().join("x"), b"1").unwrap();
        let reply = exchange(port, &request(b'D', "~/x")).await;
        assert_eq!(reply, vec![0x00, 0, 0, 0, 1, b'x', b'1']);

        server.shutdown();
    }

    #[tokio::test]
    async fn empty_identity_frame_closes_without_reply() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        let reply = exchange(port, &[0x01, 0, 0, 0, 0]).await;
        assert!(reply.is_empty());

        server.shutdown();
    }

    #[tokio::test]
    async fn unknown_mode_closes_without_reply() {
        let home = tempfile::tempdir().unwrap();
        let (server, port) = start(home.path()).await;

        let mut bytes = vec![0x01];
        bytes.extend(frame(IDENTITY));
        bytes.push(b'X');

        let reply = exchange(port, &bytes).await;
        assert!(reply.is_empty());

        server.shutdown();
    }
}
