use std::sync::Mutex;

use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Registry};

/// Used when `RUST_LOG` is unset or empty; enough to see the startup line and
/// any flat store anomalies.
const DEFAULT_FILTER: &str = "tree_viewer=info,graph_server=info,tower_http=debug";

lazy_static! {
    static ref LOG_INITIALIZED: Mutex<bool> = Mutex::new(false);
}

/// Initialize logging.  If the environment variable `RUST_LOG` is set to a
/// non-empty value it is used as the filter, otherwise we fall back to
/// `DEFAULT_FILTER`.  Safe to call more than once (tests do).
pub fn init_logging() {
    let mut initialized = match LOG_INITIALIZED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *initialized {
        return;
    }

    // Our shell scripts may set RUST_LOG unconditionally but with an empty
    // value, and that shouldn't be read as "log nothing".
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(rustlog) if !rustlog.is_empty() => {
            EnvFilter::try_new(&rustlog).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .compact()
        // This mostly ends up in a server log, where ANSI escapes are noise.
        .with_ansi(false)
        .without_time()
        .with_filter(env_filter);

    // Someone else (a test harness, say) may have installed a subscriber
    // already; theirs wins.
    let _ = Registry::default().with(layer).try_init();

    *initialized = true;
}
