use crate::err::Error;
use mime_event::MessageParser;
use std::io::{self, Write};
use std::net::IpAddr;

/// One completed mail transaction.
///
/// Everything the protocol engine knows about a message once the final
/// `DATA` terminator arrives: who offered it, from where, to whom, and the
/// raw bytes of the message itself.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Address of the connected peer.
    pub origin: IpAddr,
    /// Sender given in `MAIL FROM`.
    pub sender: String,
    /// Recipients accepted during `RCPT TO`, in order.
    pub recipients: Vec<String>,
    /// Raw message bytes, exactly as received.
    pub body: Vec<u8>,
}

impl Envelope {
    /// The message's `Subject` header, or an empty string if it has none.
    ///
    /// Header names are matched case-insensitively. Fails with
    /// [`Error::BadMessage`] when the bytes do not parse as a mail message
    /// at all; callers are expected to log and carry on without a subject.
    pub fn subject(&self) -> Result<String, Error> {
        subject(&self.body)
    }
}

fn subject(body: &[u8]) -> Result<String, Error> {
    let mut parser = MessageParser::new(io::sink());
    // The parser wants one line per write.
    for line in body.split_inclusive(|&b| b == b'\n') {
        parser.write_all(line).map_err(|_| Error::BadMessage)?;
    }
    let message = parser.end();
    let header = &message.top().ok_or(Error::BadMessage)?.header;
    let subject = header
        .subject
        .as_ref()
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_default();
    Ok(subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_found() {
        let body = b"From: a@x\r\nSubject: Hi\r\n\r\nbody\r\n";
        assert_eq!(subject(body).unwrap(), "Hi");
    }

    #[test]
    fn subject_missing() {
        let body = b"From: a@x\r\n\r\nbody\r\n";
        assert_eq!(subject(body).unwrap(), "");
    }

    #[test]
    fn subject_case_insensitive() {
        let body = b"SUBJECT: Hi\r\n\r\nbody\r\n";
        assert_eq!(subject(body).unwrap(), "Hi");
    }
}
