//! Capture `tracing` output emitted while a closure runs

use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut inner) => inner.extend_from_slice(buf),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber at `directive` and return its
/// result together with everything that was logged
pub fn capture<T>(directive: &str, f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logged = match buffer.0.lock() {
        Ok(inner) => String::from_utf8_lossy(&inner).into_owned(),
        Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
    };
    (out, logged)
}
