//! Drives complete SMTP dialogues through `mailin::Session` against the
//! capture handler, without a network in sight.

use mailin::{Session, SessionBuilder};
use mailsink::{
    DiscardMail, Disposition, LogCredentials, LogRecipients, MailSink, SaveMail, Spool,
};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

const MESSAGE: &[u8] = b"From: a@x\r\nSubject: Hi\r\n\r\nbody\r\n";

fn capture_session(disposition: Arc<dyn Disposition>) -> Session<MailSink> {
    let handler = MailSink::new(Arc::new(LogCredentials), Arc::new(LogRecipients), disposition);
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    SessionBuilder::new("testserver").build(ip, handler)
}

// One MAIL/RCPT/DATA transaction.
fn transact(session: &mut Session<MailSink>) {
    assert!(!session.process(b"MAIL FROM:<a@x>\r\n").is_error);
    assert!(!session.process(b"RCPT TO:<b@y>\r\n").is_error);
    assert_eq!(session.process(b"DATA\r\n").code, 354);
    for line in MESSAGE.split_inclusive(|&b| b == b'\n') {
        session.process(line);
    }
    assert_eq!(session.process(b".\r\n").code, 250);
}

fn deliver(session: &mut Session<MailSink>) {
    assert!(!session.process(b"HELO client.example\r\n").is_error);
    transact(session);
}

#[test]
fn saved_message_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let spool = Spool::new(dir.path(), "eml");
    let mut session = capture_session(Arc::new(SaveMail::new(spool)));
    deliver(&mut session);

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), 1);
    let path = entries[0].path();
    let name = path.file_name().unwrap().to_str().unwrap();
    let (stem, ext) = name.rsplit_once('.').unwrap();
    assert_eq!(ext, "eml");
    let (timestamp, random) = stem.split_once('_').unwrap();
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    assert!(random.chars().all(|c| c.is_ascii_digit()));
    // Byte-for-byte what the client sent; no re-encoding.
    assert_eq!(fs::read(&path).unwrap(), MESSAGE);
}

#[test]
fn discarded_message_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = capture_session(Arc::new(DiscardMail));
    deliver(&mut session);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn each_message_gets_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let spool = Spool::new(dir.path(), "eml");
    let mut session = capture_session(Arc::new(SaveMail::new(spool)));
    deliver(&mut session);
    transact(&mut session);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
