use crate::envelope::Envelope;
use crate::policy::{CredentialPolicy, Disposition, RecipientPolicy};
use mailin::response::{AUTH_OK, INVALID_CREDENTIALS, NO_MAILBOX, OK};
use mailin::{Handler, Response};
use std::io;
use std::mem;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// The `mailin::Handler` that wires the capture policies into the protocol
/// engine.
///
/// One clone serves one connection: the policies are shared, the
/// per-transaction state (peer address, sender, recipients, body buffer) is
/// not.
#[derive(Clone)]
pub struct MailSink {
    credentials: Arc<dyn CredentialPolicy>,
    recipients: Arc<dyn RecipientPolicy>,
    disposition: Arc<dyn Disposition>,
    origin: IpAddr,
    sender: String,
    to: Vec<String>,
    body: Vec<u8>,
}

impl MailSink {
    pub fn new(
        credentials: Arc<dyn CredentialPolicy>,
        recipients: Arc<dyn RecipientPolicy>,
        disposition: Arc<dyn Disposition>,
    ) -> Self {
        Self {
            credentials,
            recipients,
            disposition,
            origin: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            sender: String::new(),
            to: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl Handler for MailSink {
    fn helo(&mut self, ip: IpAddr, _domain: &str) -> Response {
        self.origin = ip;
        OK
    }

    fn mail(&mut self, ip: IpAddr, _domain: &str, from: &str) -> Response {
        self.origin = ip;
        self.sender = from.to_owned();
        OK
    }

    fn rcpt(&mut self, to: &str) -> Response {
        if self.recipients.accept(&self.sender, to) {
            OK
        } else {
            NO_MAILBOX
        }
    }

    fn data_start(&mut self, _domain: &str, from: &str, _is8bit: bool, to: &[String]) -> Response {
        self.sender = from.to_owned();
        self.to = to.to_vec();
        self.body.clear();
        OK
    }

    fn data(&mut self, buf: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(buf);
        Ok(())
    }

    fn data_end(&mut self) -> Response {
        let envelope = Envelope {
            origin: self.origin,
            sender: mem::take(&mut self.sender),
            recipients: mem::take(&mut self.to),
            body: mem::take(&mut self.body),
        };
        // Disposition failures stay local; the peer always sees success.
        self.disposition.handle(&envelope);
        OK
    }

    fn auth_plain(
        &mut self,
        authorization_id: &str,
        authentication_id: &str,
        password: &str,
    ) -> Response {
        if self
            .credentials
            .accept(authorization_id, authentication_id, password)
        {
            AUTH_OK
        } else {
            INVALID_CREDENTIALS
        }
    }
}
