use crate::gemini::{Handler, Request, Response, MAX_REQUEST_LENGTH};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::pem::PemObject;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

/// How long a client gets to send its request line.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a PEM certificate chain and private key into a rustls server config.
pub fn load_tls_config(cert_file: &Path, key_file: &Path) -> Result<ServerConfig> {
    let certs = CertificateDer::pem_file_iter(cert_file)
        .with_context(|| format!("Failed to open certificate {}", cert_file.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse certificate {}", cert_file.display()))?;
    if certs.is_empty() {
        anyhow::bail!("No certificates found in {}", cert_file.display());
    }

    let key = PrivateKeyDer::from_pem_file(key_file)
        .with_context(|| format!("Failed to load private key {}", key_file.display()))?;

    ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .context("Failed to select TLS protocol versions")?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Certificate and private key do not match")
}

/// Accept connections until Ctrl-C, serving each on its own task.
pub async fn serve<H>(
    listener: TcpListener,
    tls: ServerConfig,
    hostname: String,
    handler: Arc<H>,
) -> Result<()>
where
    H: Handler + 'static,
{
    let acceptor = TlsAcceptor::from(Arc::new(tls));
    let hostname = Arc::new(hostname);

    info!(
        "Serving gemini://{} on {}",
        hostname,
        listener.local_addr().context("Listener has no local address")?
    );

    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        };

        let acceptor = acceptor.clone();
        let hostname = Arc::clone(&hostname);
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let stream = match acceptor.accept(socket).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!("TLS handshake with {} failed: {}", peer, e);
                    return;
                }
            };
            if let Err(e) = handle_connection(stream, &hostname, handler.as_ref()).await {
                debug!("Connection with {} ended with error: {}", peer, e);
            }
        });
    }
}

/// Read one request from `stream`, answer it and close the stream.
pub async fn handle_connection<S, H>(stream: S, hostname: &str, handler: &H) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: Handler + ?Sized,
{
    let mut reader = BufReader::new(stream);
    let mut line = Vec::with_capacity(128);

    // anything without a CRLF inside the limit is rejected by Request::parse
    let mut limited = (&mut reader).take(MAX_REQUEST_LENGTH as u64 + 2);
    let read = limited.read_until(b'\n', &mut line);

    let response = match timeout(REQUEST_TIMEOUT, read).await {
        Err(_) => Response::bad_request("Request timed out"),
        Ok(Err(e)) => return Err(e),
        Ok(Ok(_)) => match Request::parse(&line) {
            Err(e) => {
                debug!("Rejected request: {}", e);
                Response::bad_request(e.to_string())
            }
            Ok(request) if !request.is_for(hostname) => {
                info!("{} -> refused (not for {})", request.url(), hostname);
                Response::proxy_refused()
            }
            Ok(request) => {
                let response = handler.handle(&request).await;
                info!("{} -> {}", request.path(), response.status.code());
                if response.status.code() >= 40 {
                    debug!("{} meta: {}", request.path(), response.meta);
                }
                response
            }
        },
    };

    let mut stream = reader.into_inner();
    stream.write_all(response.header().as_bytes()).await?;
    if let Some(body) = &response.body {
        stream.write_all(body.as_bytes()).await?;
    }
    stream.flush().await?;
    if let Err(e) = stream.shutdown().await {
        debug!("Failed to close connection cleanly: {}", e);
    }
    Ok(())
}
