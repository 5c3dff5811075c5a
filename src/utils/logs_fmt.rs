use once_cell::sync::Lazy;
use std::fmt;
use std::time::Instant;
use tracing_subscriber::fmt::time::FormatTime;

use crate::health::format_uptime;

static START: Lazy<Instant> = Lazy::new(Instant::now);

/// Prefixes every log line with the monitor's uptime in the same notation the
/// dashboard shows ("12s", "4m", "1.5h").
pub struct UptimeSeconds;

impl FormatTime for UptimeSeconds {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        write!(w, "+{:>5}", format_uptime(START.elapsed()))
    }
}

/// Shortens a path for log fields: keeps the file name and the start of the
/// parent directory.
pub fn abbrev_path(path: &std::path::Path) -> String {
    let full = path.display().to_string();
    if full.chars().count() <= 32 {
        return full;
    }
    match path.file_name() {
        Some(name) => format!(".../{}", name.to_string_lossy()),
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn short_paths_are_kept() {
        assert_eq!(abbrev_path(Path::new("tracker.log")), "tracker.log");
    }

    #[test]
    fn long_paths_keep_the_file_name() {
        let path = Path::new("/var/lib/consumer/instances/primary/logs/tracker.events");
        assert_eq!(abbrev_path(path), ".../tracker.events");
    }
}
