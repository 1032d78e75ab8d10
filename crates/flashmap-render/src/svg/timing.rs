use std::time::{Duration, Instant};

fn parse_env_bool(v: &str) -> bool {
    !matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// `FLASHMAP_RENDER_TIMING=1` reports per-phase render durations.
pub(crate) fn render_timing_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("FLASHMAP_RENDER_TIMING")
            .ok()
            .is_some_and(|v| parse_env_bool(&v))
    })
}

/// Splits one SVG render into consecutive named phases. A disabled timer records nothing.
#[derive(Debug)]
pub(crate) struct PhaseTimer {
    enabled: bool,
    started: Instant,
    last: Instant,
    phases: Vec<(&'static str, Duration)>,
}

impl PhaseTimer {
    pub(crate) fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            started: now,
            last: now,
            phases: Vec::new(),
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(render_timing_enabled())
    }

    /// Closes the phase that started at the previous lap (or at construction).
    pub(crate) fn lap(&mut self, phase: &'static str) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        self.phases.push((phase, now - self.last));
        self.last = now;
    }

    pub(crate) fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    pub(crate) fn finish(self, nodes: usize) {
        if !self.enabled {
            return;
        }
        let phases = self
            .phases
            .iter()
            .map(|(name, took)| format!("{name}={took:?}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(
            total = ?self.started.elapsed(),
            nodes,
            phases = %phases,
            "mind map svg render timings"
        );
    }
}
