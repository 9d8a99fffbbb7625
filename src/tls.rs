use crate::err::Error;
use log::warn;
use rustls::version::{TLS12, TLS13};
use rustls::{
    Certificate, PrivateKey, ServerConfig, ServerConnection, StreamOwned,
    SupportedProtocolVersion,
};
use std::fs::File;
use std::io::Read;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stream produced by a successful STARTTLS handshake.
pub type TlsStream = StreamOwned<ServerConnection, TcpStream>;

static TLS12_UP: &[&SupportedProtocolVersion] = &[&TLS12, &TLS13];
static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&TLS13];

/// Lowest protocol version the server will negotiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinProtocol {
    /// No explicit floor; the rustls defaults apply.
    Unset,
    /// TLSv1.1 and up.
    Tls11,
    /// TLSv1.2 and up.
    Tls12,
    /// TLSv1.3 only.
    Tls13,
}

impl MinProtocol {
    /// Choose a floor from the three command line flags. The flags are
    /// checked from the newest version down, so when several are set the
    /// highest requested floor wins.
    pub fn pick(tls11: bool, tls12: bool, tls13: bool) -> Self {
        if tls13 {
            MinProtocol::Tls13
        } else if tls12 {
            MinProtocol::Tls12
        } else if tls11 {
            MinProtocol::Tls11
        } else {
            MinProtocol::Unset
        }
    }

    fn versions(self) -> &'static [&'static SupportedProtocolVersion] {
        match self {
            MinProtocol::Tls13 => TLS13_ONLY,
            MinProtocol::Tls12 => TLS12_UP,
            // rustls does not implement TLSv1.1; the widest set it supports
            // is the closest available floor.
            MinProtocol::Tls11 | MinProtocol::Unset => rustls::DEFAULT_VERSIONS,
        }
    }
}

/// TLS material and version policy, captured from configuration at startup.
pub struct TlsPolicy {
    cert_path: Option<PathBuf>,
    key_path: Option<PathBuf>,
    min_protocol: MinProtocol,
}

impl TlsPolicy {
    pub fn new(
        cert_path: Option<PathBuf>,
        key_path: Option<PathBuf>,
        min_protocol: MinProtocol,
    ) -> Self {
        Self {
            cert_path,
            key_path,
            min_protocol,
        }
    }

    /// Build the acceptor, or `None` when no certificate and key are
    /// configured and the server stays plaintext-only.
    ///
    /// Unreadable or unparseable material is an error, as is configuring
    /// only one half of the certificate/key pair.
    pub fn build(self) -> Result<Option<TlsAcceptor>, Error> {
        let (cert_path, key_path) = match (self.cert_path, self.key_path) {
            (Some(cert), Some(key)) => (cert, key),
            (None, None) => return Ok(None),
            _ => {
                return Err(Error::TlsConfig(
                    "a certificate and a key must be configured together".to_owned(),
                ))
            }
        };
        if self.min_protocol == MinProtocol::Tls11 {
            warn!("TLSv1.1 is not available with rustls; accepting TLSv1.2 and up");
        }
        let certs = load_certs(&cert_path)?;
        let key = load_key(&key_path)?;
        let config = ServerConfig::builder()
            .with_safe_default_cipher_suites()
            .with_safe_default_kx_groups()
            .with_protocol_versions(self.min_protocol.versions())
            .map_err(|err| Error::TlsConfig(err.to_string()))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|err| Error::TlsConfig(err.to_string()))?;
        Ok(Some(TlsAcceptor {
            config: Arc::new(config),
        }))
    }
}

/// Accepts STARTTLS upgrades for the lifetime of the server.
#[derive(Clone)]
pub struct TlsAcceptor {
    config: Arc<ServerConfig>,
}

impl TlsAcceptor {
    pub fn accept(&self, stream: TcpStream) -> Result<TlsStream, Error> {
        let conn = ServerConnection::new(self.config.clone())
            .map_err(|err| Error::TlsConfig(err.to_string()))?;
        Ok(StreamOwned::new(conn, stream))
    }
}

fn load_certs(path: &Path) -> Result<Vec<Certificate>, Error> {
    let pem = slurp(path)?;
    let certs = rustls_pemfile::certs(&mut pem.as_slice())?;
    if certs.is_empty() {
        return Err(Error::TlsConfig(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs.into_iter().map(Certificate).collect())
}

// Prefer PKCS8 keys, fall back to RSA keys.
fn load_key(path: &Path) -> Result<PrivateKey, Error> {
    let pem = slurp(path)?;
    if let Some(der) = rustls_pemfile::pkcs8_private_keys(&mut pem.as_slice())?
        .into_iter()
        .next()
    {
        return Ok(PrivateKey(der));
    }
    rustls_pemfile::rsa_private_keys(&mut pem.as_slice())?
        .into_iter()
        .next()
        .map(PrivateKey)
        .ok_or_else(|| {
            Error::TlsConfig(format!("no PKCS8 or RSA keys found in {}", path.display()))
        })
}

fn slurp(path: &Path) -> Result<Vec<u8>, Error> {
    let mut file = File::open(path).map_err(|source| Error::TlsFile {
        path: path.to_owned(),
        source,
    })?;
    let mut ret = Vec::with_capacity(1024);
    file.read_to_end(&mut ret).map_err(|source| Error::TlsFile {
        path: path.to_owned(),
        source,
    })?;
    Ok(ret)
}
