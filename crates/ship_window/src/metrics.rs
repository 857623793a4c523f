use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSample {
    /// Time spent between `begin_frame` and `end_frame`.
    pub work_ms: f64,
    /// Time since the previous `end_frame`, pacing wait included.
    pub frame_ms: f64,
}

/// Rolling frame timing history, used to judge how well the pacer holds the
/// target rate.
pub struct FrameStats {
    frame_start: Option<Instant>,
    last_end: Option<Instant>,
    history: Vec<FrameSample>,
    max_history: usize,
    frames_total: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_history(300) // 5 seconds at 60 fps
    }

    pub fn with_history(max_history: usize) -> Self {
        Self {
            frame_start: None,
            last_end: None,
            history: Vec::new(),
            max_history: max_history.max(1),
            frames_total: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let work = self.frame_start.take().map(|s| now - s).unwrap_or_default();
        let frame = self.last_end.map(|e| now - e).unwrap_or(work);
        self.last_end = Some(now);
        self.record(work, frame);
    }

    /// Add a sample measured elsewhere.
    pub fn record(&mut self, work: Duration, frame: Duration) {
        self.frames_total += 1;
        self.history.push(FrameSample {
            work_ms: work.as_secs_f64() * 1000.0,
            frame_ms: frame.as_secs_f64() * 1000.0,
        });
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_total
    }

    pub fn latest(&self) -> Option<&FrameSample> {
        self.history.last()
    }

    pub fn get_performance_stats(&self) -> HashMap<String, f64> {
        if self.history.is_empty() {
            return HashMap::new();
        }

        let mut stats = HashMap::new();
        let work: Vec<f64> = self.history.iter().map(|f| f.work_ms).collect();
        stats.insert("work_mean_ms".to_string(), mean(&work));
        stats.insert("work_p99_ms".to_string(), percentile(&work, 0.99));

        let frames: Vec<f64> = self.history.iter().map(|f| f.frame_ms).collect();
        let frame_mean = mean(&frames);
        stats.insert("frame_mean_ms".to_string(), frame_mean);
        stats.insert("frame_p99_ms".to_string(), percentile(&frames, 0.99));
        stats.insert("frame_max_ms".to_string(), frames.iter().copied().fold(0.0, f64::max));
        if frame_mean > 0.0 {
            stats.insert("fps_mean".to_string(), 1000.0 / frame_mean);
        }

        stats
    }

    /// Frames in the window that overran the target by more than half a frame.
    pub fn late_frames(&self, target_fps: u32) -> usize {
        let budget_ms = 1000.0 / f64::from(target_fps.max(1));
        self.history
            .iter()
            .filter(|f| f.frame_ms > budget_ms * 1.5)
            .count()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let index = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
