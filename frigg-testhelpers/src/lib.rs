#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding a `tracing` targets filter, e.g.
/// `FRIGG_LOG=frigg=debug`.
pub const LOG_ENV: &str = "FRIGG_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Prints the time elapsed since the first test touched the subscriber.
struct SinceSetup;

impl FormatTime for SinceSetup {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:3}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

fn filter_from_env() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|spec| spec.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::DEBUG))
}

static SUBSCRIBER: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(SinceSetup)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter_from_env())
        .try_init()
        .ok();
});

/// Install the shared tracing subscriber.
///
/// Every test calls this first. The subscriber is created once per process,
/// so calling it from many tests (or many threads) is fine. Output goes
/// through the test writer, which means `cargo test` only shows it for
/// failing tests.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER;
}
