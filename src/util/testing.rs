//! Logging helpers for unit and integration tests

use std::env;
use std::io;
use std::sync::{Arc, Mutex, Once};

use tracing::level_filters::LevelFilter;
use tracing::{debug, info, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{
    filter::{filter_fn, FilterFn},
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

// connection pool internals drown out the client's own spans
const NOISY_MODULES: [&str; 2] = ["hyper", "reqwest::connect"];

/// Install the global test subscriber once per test binary.
///
/// Defaults to `ccd=debug`; `RUST_LOG` overrides it.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = env::var("RUST_LOG")
            .ok()
            .and_then(|v| EnvFilter::try_new(v).ok())
            .unwrap_or_else(|| EnvFilter::new("ccd=debug"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
                .with_filter(noisy_module_filter())
                .with_filter(env_filter),
        );

        if tracing::dispatcher::has_been_set() {
            debug!("Tracing subscriber already set");
        } else if let Err(e) = subscriber.try_init() {
            eprintln!("Error: Failed to set up logging: {}", e);
        }
        info!("Test Setup complete");
    });
}

/// Run `f` with everything the client logs at `level` captured as plain
/// text, span fields included. Used to check what `-v` would print.
pub fn capture_logs<R>(level: LevelFilter, f: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::ENTER)
            .with_filter(noisy_module_filter())
            .with_filter(level),
    );
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

fn noisy_module_filter() -> FilterFn<fn(&Metadata<'_>) -> bool> {
    filter_fn(is_quiet_module as fn(&Metadata<'_>) -> bool)
}

fn is_quiet_module(metadata: &Metadata<'_>) -> bool {
    !NOISY_MODULES
        .iter()
        .any(|name| metadata.target().starts_with(name))
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut inner) = self.0.lock() {
            inner.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
