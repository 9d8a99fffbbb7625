use crate::err::Error;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

// Make a reasonable number of attempts to find a unique file name.
const MAX_ATTEMPTS: u32 = 10_000;

/// Where captured messages end up.
///
/// A `Spool` fixes the output directory and filename extension at startup.
/// Each message gets its own file named
/// `<nanosecond-timestamp>_<random>.<extension>`.
#[derive(Clone, Debug)]
pub struct Spool {
    dir: PathBuf,
    extension: String,
}

impl Spool {
    pub fn new<P: Into<PathBuf>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.to_owned(),
        }
    }

    /// The directory files are created in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a fresh, uniquely named file for one message.
    pub fn create(&self) -> Result<(PathBuf, File), Error> {
        let prefix = nanos_now().to_string();
        allocate(&self.dir, &prefix, &self.extension)
    }
}

/// Atomically create a uniquely named file `<prefix>_<n>.<suffix>` in `dir`.
///
/// `n` comes from a quick and dirty congruential generator. There is no
/// existence pre-check; the exclusive create is the check, so two callers
/// racing for the same name cannot both win and the loser redraws.
/// Any I/O failure other than "already exists" is propagated immediately.
/// Fails with [`Error::SpoolExhausted`] after 10 000 collisions.
///
/// The generator is fast, not cryptographically secure. These names must not
/// be relied on for anything security-sensitive.
pub fn allocate(dir: &Path, prefix: &str, suffix: &str) -> Result<(PathBuf, File), Error> {
    let mut rng = Lcg::from_clock();
    allocate_with(dir, prefix, suffix, &mut rng)
}

fn allocate_with(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    rng: &mut Lcg,
) -> Result<(PathBuf, File), Error> {
    for _ in 0..MAX_ATTEMPTS {
        let name = format!("{}_{}.{}", prefix, rng.next(), suffix);
        let path = dir.join(name);
        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(Error::SpoolExhausted(MAX_ATTEMPTS))
}

// Quick and dirty congruential generator from Numerical Recipes.
struct Lcg(u64);

impl Lcg {
    fn from_clock() -> Self {
        Self(nanos_now().wrapping_add(u64::from(process::id())))
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0
    }
}

fn nanos_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lcg_step() {
        let mut rng = Lcg(0);
        assert_eq!(rng.next(), 1_013_904_223);
    }

    #[test]
    fn lcg_draws_differ() {
        let mut rng = Lcg::from_clock();
        let first = rng.next();
        assert_ne!(first, rng.next());
    }

    // A taken name must be skipped, not reported as a failure.
    #[test]
    fn retries_taken_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = Lcg(42);
        let taken = Lcg(42).next();
        let taken_name = format!("7_{}.eml", taken);
        fs::write(dir.path().join(&taken_name), b"").unwrap();

        let (path, _file) = allocate_with(dir.path(), "7", "eml", &mut rng).unwrap();
        assert!(path.exists());
        assert_ne!(path.file_name().unwrap().to_str().unwrap(), taken_name);
    }
}
