//! The decisions a capture server makes, split into narrow traits so each
//! one can be exercised without a live connection.

use crate::envelope::Envelope;
use crate::spool::Spool;
use log::{debug, error, info, log_enabled, Level};
use std::io::Write;

/// Decides whether an offered credential is let in.
pub trait CredentialPolicy: Send + Sync {
    /// Return `true` to accept the credential.
    fn accept(&self, authorization_id: &str, authentication_id: &str, password: &str) -> bool;
}

/// Decides whether a recipient is accepted for a sender.
pub trait RecipientPolicy: Send + Sync {
    /// Return `true` to accept the recipient.
    fn accept(&self, sender: &str, recipient: &str) -> bool;
}

/// Decides what happens to a completed message.
pub trait Disposition: Send + Sync {
    /// Take delivery of one completed transaction. Failures stay local:
    /// implementations log and return, they never answer the peer.
    fn handle(&self, envelope: &Envelope);
}

/// Accepts every credential and logs it verbatim.
///
/// An inspection aid, not a security control: the point is to see exactly
/// what a client under test is sending.
pub struct LogCredentials;

impl CredentialPolicy for LogCredentials {
    fn accept(&self, _authorization_id: &str, authentication_id: &str, password: &str) -> bool {
        info!("[AUTH] user: {:?}; password: {:?}", authentication_id, password);
        true
    }
}

/// Accepts every recipient, logging the sender/recipient pair.
pub struct LogRecipients;

impl RecipientPolicy for LogRecipients {
    fn accept(&self, sender: &str, recipient: &str) -> bool {
        info!("[RCPT] {:?} => {:?}", sender, recipient);
        true
    }
}

/// Writes each message to its own spool file, byte for byte.
pub struct SaveMail {
    spool: Spool,
}

impl SaveMail {
    pub fn new(spool: Spool) -> Self {
        Self { spool }
    }
}

impl Disposition for SaveMail {
    fn handle(&self, envelope: &Envelope) {
        log_envelope(envelope);
        let (path, mut file) = match self.spool.create() {
            Ok(allocated) => allocated,
            Err(err) => {
                error!("cannot allocate spool file: {}", err);
                return;
            }
        };
        if let Err(err) = file.write_all(&envelope.body) {
            error!("cannot write {}: {}", path.display(), err);
            return;
        }
        debug!("wrote {:?}", path);
    }
}

/// Logs the envelope and drops the message.
pub struct DiscardMail;

impl Disposition for DiscardMail {
    fn handle(&self, envelope: &Envelope) {
        log_envelope(envelope);
    }
}

// Subject extraction costs a parse, so skip it unless the result would be
// shown.
fn log_envelope(envelope: &Envelope) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    match envelope.subject() {
        Ok(subject) => debug!(
            "received mail from {:?} with subject {:?}",
            envelope.sender, subject
        ),
        Err(err) => debug!("received mail from {:?} ({})", envelope.sender, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_always_accepted() {
        assert!(LogCredentials.accept("", "user", "password"));
        assert!(LogCredentials.accept("admin", "", ""));
    }

    #[test]
    fn recipients_always_accepted() {
        assert!(LogRecipients.accept("a@x", "b@y"));
        assert!(LogRecipients.accept("", "postmaster"));
    }
}
