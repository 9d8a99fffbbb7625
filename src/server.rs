use crate::err::Error;
use crate::handler::MailSink;
use crate::tls::TlsAcceptor;
use crate::transcript::{Direction, Transcript};
use bufstream::BufStream;
use log::{debug, error, info};
use mailin::{Action, AuthMechanism, Response, Session, SessionBuilder};
use scoped_threadpool::Pool;
use std::io::{self, BufRead, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

const SOCKET_TIMEOUT: Duration = Duration::from_secs(5 * 60);

enum SessionResult {
    Finished,
    UpgradeTls,
}

/// The capture server: owns the listener and hands each connection to a
/// worker that runs one SMTP session to completion.
pub struct Server {
    handler: MailSink,
    name: String,
    tls: Option<TlsAcceptor>,
    transcript: Transcript,
    num_threads: u32,
    socket_address: Vec<SocketAddr>,
}

impl Server {
    pub fn new(handler: MailSink) -> Self {
        Self {
            handler,
            name: "localhost".to_owned(),
            tls: None,
            transcript: Transcript::disabled(),
            num_threads: 4,
            socket_address: Vec::with_capacity(4),
        }
    }

    /// Name the server greets clients with.
    pub fn with_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = name.into();
        self
    }

    /// STARTTLS acceptor; `None` keeps the server plaintext-only.
    pub fn with_tls(&mut self, tls: Option<TlsAcceptor>) -> &mut Self {
        self.tls = tls;
        self
    }

    /// Dump the raw dialogue of every connection.
    pub fn with_transcript(&mut self, transcript: Transcript) -> &mut Self {
        self.transcript = transcript;
        self
    }

    /// Size of the worker pool, which is also the maximum number of
    /// concurrent sessions.
    pub fn with_num_threads(&mut self, num_threads: u32) -> &mut Self {
        self.num_threads = num_threads;
        self
    }

    /// Add addresses to listen on.
    pub fn with_addr<A: ToSocketAddrs>(&mut self, addr: A) -> Result<&mut Self, Error> {
        for addr in addr.to_socket_addrs()? {
            self.socket_address.push(addr);
        }
        Ok(self)
    }

    /// Bind and serve until the process is killed.
    pub fn serve(self) -> Result<(), Error> {
        let mut builder = SessionBuilder::new(self.name.clone());
        if self.tls.is_some() {
            builder.enable_start_tls();
        }
        builder.enable_auth(AuthMechanism::Plain);
        let listener = TcpListener::bind(&self.socket_address[..])?;
        let localaddr = listener.local_addr()?;
        info!("{} SMTP started on {}", self.name, localaddr);
        let mut pool = Pool::new(self.num_threads);
        pool.scoped(|scope| {
            for conn in listener.incoming() {
                let stream = match conn {
                    Ok(stream) => stream,
                    Err(err) => {
                        error!("accept: {}", err);
                        continue;
                    }
                };
                let builder = &builder;
                let tls = self.tls.clone();
                let handler = self.handler.clone();
                let transcript = self.transcript;
                scope.execute(move || handle_connection(stream, builder, tls, handler, transcript));
            }
        });
        Ok(())
    }
}

fn handle_connection(
    stream: TcpStream,
    builder: &SessionBuilder,
    tls: Option<TlsAcceptor>,
    handler: MailSink,
    transcript: Transcript,
) {
    let remote = stream
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|_| IpAddr::from([0, 0, 0, 0]));
    debug!("new connection from {}", remote);
    stream.set_read_timeout(Some(SOCKET_TIMEOUT)).ok();
    stream.set_write_timeout(Some(SOCKET_TIMEOUT)).ok();
    let session = builder.build(remote, handler);
    if let Err(err) = start_session(session, stream, tls, transcript) {
        error!("({}) {}", remote, err);
    }
}

fn start_session(
    mut session: Session<MailSink>,
    stream: TcpStream,
    tls: Option<TlsAcceptor>,
    transcript: Transcript,
) -> Result<(), Error> {
    let mut buffered = BufStream::new(stream);
    write_response(&mut buffered, &session.greeting(), transcript)?;
    match pump(&mut session, &mut buffered, transcript)? {
        SessionResult::Finished => Ok(()),
        SessionResult::UpgradeTls => {
            let plain = buffered.into_inner().map_err(io::Error::from)?;
            let acceptor = tls.ok_or_else(|| {
                Error::TlsConfig("STARTTLS accepted without an acceptor".to_owned())
            })?;
            let mut secured = BufStream::new(acceptor.accept(plain)?);
            session.tls_active();
            match pump(&mut session, &mut secured, transcript)? {
                SessionResult::Finished => Ok(()),
                SessionResult::UpgradeTls => Err(Error::TlsConfig(
                    "client negotiated TLS twice".to_owned(),
                )),
            }
        }
    }
}

fn pump<S: Read + Write>(
    session: &mut Session<MailSink>,
    stream: &mut BufStream<S>,
    transcript: Transcript,
) -> Result<SessionResult, Error> {
    let mut line = Vec::with_capacity(100);
    loop {
        line.clear();
        let num_bytes = stream.read_until(b'\n', &mut line)?;
        if num_bytes == 0 {
            return Ok(SessionResult::Finished);
        }
        transcript.line(Direction::Read, &line);
        let res = session.process(&line);
        match res.action {
            Action::Reply => write_response(stream, &res, transcript)?,
            Action::Close => {
                write_response(stream, &res, transcript)?;
                return Ok(SessionResult::Finished);
            }
            Action::UpgradeTls => {
                write_response(stream, &res, transcript)?;
                return Ok(SessionResult::UpgradeTls);
            }
            Action::NoReply => (),
        }
    }
}

// Serialize through a buffer so the transcript sees exactly the bytes that
// go out on the wire.
fn write_response<S: Read + Write>(
    stream: &mut BufStream<S>,
    res: &Response,
    transcript: Transcript,
) -> Result<(), Error> {
    let mut wire = Vec::new();
    res.write_to(&mut wire)?;
    if wire.is_empty() {
        return Ok(());
    }
    transcript.line(Direction::Write, &wire);
    stream.write_all(&wire)?;
    stream.flush()?;
    Ok(())
}
