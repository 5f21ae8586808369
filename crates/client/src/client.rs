//! PAP client.
//!
//! Connects to a server, unlocks the session, identifies itself and runs
//! a single download, upload or listing.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use pap_protocol::wire::{
    read_frame_string, read_list_entry, read_status, write_frame, write_mode, write_unlock,
};
use pap_protocol::{Mode, ProtocolError, Status};

use crate::CONNECT_TIMEOUT;
use crate::error::ClientError;

/// Client bound to one server and one identity.
#[derive(Debug, Clone)]
pub struct PapClient {
    host: String,
    port: u16,
    identity: String,
}

impl PapClient {
    /// `identity` selects whose home `~` refers to on the server and must
    /// not be empty.
    pub fn new(host: impl Into<String>, port: u16, identity: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            identity: identity.into(),
        }
    }

    /// Downloads `remote_path` into `output_dir`, named as the server
    /// advertises. Returns the local path written.
    pub async fn download(
        &self,
        remote_path: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let mut stream = self.open(Mode::Download, remote_path).await?;

        if read_status(&mut stream).await? == Status::Error {
            return Err(ClientError::Rejected(remote_path.to_string()));
        }

        let filename = read_frame_string(&mut stream).await?;
        check_filename(&filename)?;

        tokio::fs::create_dir_all(output_dir).await?;
        let out_path = output_dir.join(&filename);
        let mut file = File::create(&out_path).await?;

        let bytes = tokio::io::copy(&mut stream, &mut file).await?;
        file.flush().await?;

        info!(path = %out_path.display(), bytes, "download complete");
        Ok(out_path)
    }

    /// Uploads `local_path` to `remote_target`, or to the local file name
    /// relative to the server's working directory. Returns the bytes sent.
    pub async fn upload(
        &self,
        local_path: &Path,
        remote_target: Option<&str>,
    ) -> Result<u64, ClientError> {
        if !tokio::fs::metadata(local_path)
            .await
            .is_ok_and(|m| m.is_file())
        {
            return Err(ClientError::LocalFileNotFound(local_path.to_path_buf()));
        }

        let target = upload_target(local_path, remote_target)?;

        let mut file = File::open(local_path).await?;
        let mut stream = self.open(Mode::Upload, &target).await?;

        if read_status(&mut stream).await? == Status::Error {
            return Err(ClientError::Rejected(target));
        }

        let bytes = tokio::io::copy(&mut file, &mut stream).await?;
        stream.shutdown().await?;

        // The server closes once the file is flushed on its side.
        let mut trailing = Vec::new();
        stream.read_to_end(&mut trailing).await?;

        info!(target = %target, bytes, "upload complete");
        Ok(bytes)
    }

    /// Lists the entries of `remote_path`, in server order.
    pub async fn list(&self, remote_path: &str) -> Result<Vec<String>, ClientError> {
        let mut stream = self.open(Mode::List, remote_path).await?;

        if read_status(&mut stream).await? == Status::Error {
            return Err(ClientError::Rejected(remote_path.to_string()));
        }

        let mut entries = Vec::new();
        loop {
            match read_list_entry(&mut stream).await {
                Ok(Some(name)) => entries.push(String::from_utf8_lossy(&name).into_owned()),
                Ok(None) => break,
                Err(ProtocolError::ShortRead(_)) => return Err(ClientError::Truncated),
                Err(e) => return Err(e.into()),
            }
        }

        debug!(path = remote_path, count = entries.len(), "listing received");
        Ok(entries)
    }

    /// Connects and sends everything up to and including the request path.
    async fn open(&self, mode: Mode, path: &str) -> Result<TcpStream, ClientError> {
        let mut stream = tokio::time::timeout(
            CONNECT_TIMEOUT,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| ClientError::Timeout)??;

        debug!(host = %self.host, port = self.port, %mode, "connected");

        write_unlock(&mut stream).await?;
        write_frame(&mut stream, self.identity.as_bytes()).await?;
        write_mode(&mut stream, mode).await?;
        write_frame(&mut stream, path.as_bytes()).await?;

        Ok(stream)
    }
}

/// Remote path for an upload: the explicit target, else the local file name.
fn upload_target(local_path: &Path, remote_target: Option<&str>) -> Result<String, ClientError> {
    match remote_target {
        Some(target) => Ok(target.to_string()),
        None => local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::LocalFileNotFound(local_path.to_path_buf())),
    }
}

/// Rejects filenames that would escape the output directory.
fn check_filename(name: &str) -> Result<(), ClientError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ClientError::InvalidFilename(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pap_file_ops::{PathResolver, SystemUsers};
    use pap_server::{PapServer, ServerConfig};
    use pap_session::SessionEngine;

    use super::*;

    /// Starts a server whose `~` resolves to `home`.
    async fn start_server(home: &Path) -> (Arc<PapServer<SystemUsers>>, u16) {
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
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        };
        (server, port)
    }

    fn client(port: u16) -> PapClient {
        // No such user, so `~` falls back to the server's process home.
        PapClient::new("127.0.0.1", port, "pap-test-nobody-41c2")
    }

    #[test]
    fn filename_checks() {
        assert!(check_filename("report.pdf").is_ok());
        assert!(check_filename(".bashrc").is_ok());
        for bad in ["", ".", "..", "../etc/passwd", "a/b", "a\\b"] {
            assert!(
                matches!(check_filename(bad), Err(ClientError::InvalidFilename(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[tokio::test]
    async fn upload_download_list_roundtrip() {
        let server_home = tempfile::tempdir().unwrap();
        let local = tempfile::tempdir().unwrap();
        let (server, port) = start_server(server_home.path()).await;

        let src = local.path().join("photo.raw");
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 256) as u8).collect();
        std::fs::write(&src, &data).unwrap();

        let sent = client(port)
            .upload(&src, Some("~/album/photo.raw"))
            .await
            .unwrap();
        assert_eq!(sent, data.len() as u64);
        assert_eq!(
            std::fs::read(server_home.path().join("album/photo.raw")).unwrap(),
            data
        );

        let out_dir = local.path().join("downloads");
        let saved = client(port)
            .download("~/album/photo.raw", &out_dir)
            .await
            .unwrap();
        assert_eq!(saved, out_dir.join("photo.raw"));
        assert_eq!(std::fs::read(&saved).unwrap(), data);

        let entries = client(port).list("~/album").await.unwrap();
        assert_eq!(entries, vec!["photo.raw".to_string()]);

        server.shutdown();
    }

    #[tokio::test]
    async fn missing_remote_file_is_rejected() {
        let server_home = tempfile::tempdir().unwrap();
        let local = tempfile::tempdir().unwrap();
        let (server, port) = start_server(server_home.path()).await;

        let result = client(port).download("~/absent.bin", local.path()).await;
        assert!(matches!(result, Err(ClientError::Rejected(p)) if p == "~/absent.bin"));

        let result = client(port).list("~/absent").await;
        assert!(matches!(result, Err(ClientError::Rejected(_))));

        server.shutdown();
    }

    #[tokio::test]
    async fn upload_of_missing_local_file_never_connects() {
        // Port 9 (discard) is never contacted: the local check fails first.
        let result = PapClient::new("127.0.0.1", 9, "alice")
            .upload(Path::new("/definitely/not/here.bin"), None)
            .await;
        assert!(matches!(result, Err(ClientError::LocalFileNotFound(_))));
    }

    #[test]
    fn upload_target_defaults_to_local_name() {
        let local = Path::new("/home/me/notes.txt");
        assert_eq!(upload_target(local, None).unwrap(), "notes.txt");
        assert_eq!(
            upload_target(local, Some("~/inbox/n.txt")).unwrap(),
            "~/inbox/n.txt"
        );
        assert!(matches!(
            upload_target(Path::new("/"), None),
            Err(ClientError::LocalFileNotFound(_))
        ));
    }
}
