//! An SMTP server that captures everything it is offered.
//!
//! `mailsink` accepts every sender, recipient and credential, then either
//! writes each message to a uniquely named file or throws it away while
//! logging the envelope. Point a mail-sending client under test at it to
//! see exactly what the client produces, without running a real mail
//! server.
//!
//! The SMTP dialogue itself is handled by the `mailin` state machine; this
//! crate supplies the connection pump and a `mailin::Handler` wired to
//! pluggable capture policies.
//!
//! # Examples
//! ```no_run
//! use mailsink::{LogCredentials, LogRecipients, MailSink, SaveMail, Server, Spool};
//! use std::sync::Arc;
//!
//! let spool = Spool::new("/tmp/capture", "eml");
//! let handler = MailSink::new(
//!     Arc::new(LogCredentials),
//!     Arc::new(LogRecipients),
//!     Arc::new(SaveMail::new(spool)),
//! );
//! let mut server = Server::new(handler);
//! server.with_name("localhost").with_addr("127.0.0.1:2525").unwrap();
//! server.serve().unwrap();
//! ```

#![forbid(unsafe_code)]

mod envelope;
mod err;
mod handler;
mod policy;
mod server;
mod spool;
mod tls;
mod transcript;

pub use crate::envelope::Envelope;
pub use crate::err::Error;
pub use crate::handler::MailSink;
pub use crate::policy::{
    CredentialPolicy, DiscardMail, Disposition, LogCredentials, LogRecipients, RecipientPolicy,
    SaveMail,
};
pub use crate::server::Server;
pub use crate::spool::{allocate, Spool};
pub use crate::tls::{MinProtocol, TlsAcceptor, TlsPolicy, TlsStream};
pub use crate::transcript::{Direction, Transcript};
