//! Helpers for routing the grid's `log` output somewhere visible.
//!
//! The spatial grid only ever talks to the [log] facade.  Benchmarks and debugging sessions call into this crate once
//! at startup to get a sink.
use std::sync::Once;

pub use log::LevelFilter;

static ONCE: Once = Once::new();

/// Log to stderr at the level given by `RUST_LOG`, falling back to `warn`.
///
/// If called multiple times in the same process, only the first call applies.
pub fn log_to_stderr() {
    install(None);
}

/// Log to stderr at a fixed level, ignoring `RUST_LOG`.
///
/// Useful for flipping on `trace` output from the grid's cell allocator while chasing a bug.  Like [log_to_stderr],
/// only the first call in a process has any effect.
pub fn log_to_stderr_at(level: LevelFilter) {
    install(Some(level));
}

fn install(level: Option<LevelFilter>) {
    ONCE.call_once(|| {
        let mut builder = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("warn"),
        );

        if let Some(l) = level {
            builder.filter_level(l);
        }

        builder
            .format(|buf, record| {
                use std::io::Write;

                let now = time::OffsetDateTime::now_utc();

                writeln!(
                    buf,
                    "{} {} time={} target={}",
                    record.level(),
                    record.args(),
                    now,
                    record.target()
                )
            })
            // Tests and benches may race a second logger in; losing that race is fine.
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_setup_is_harmless() {
        log_to_stderr_at(LevelFilter::Trace);
        log_to_stderr();
        log_to_stderr_at(LevelFilter::Off);
        log::trace!("still alive");
    }
}
