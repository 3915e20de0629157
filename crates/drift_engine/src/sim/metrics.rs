#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start_ms: u64,
    interval_ms: u64,
    frames: u32,
    frame_time_sum_ms: u64,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_start_ms: now_ms,
            interval_ms: interval_ms.max(1),
            frames: 0,
            frame_time_sum_ms: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt_ms: u64) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum_ms = self.frame_time_sum_ms.saturating_add(frame_dt_ms);
    }

    pub(crate) fn maybe_snapshot(&mut self, now_ms: u64) -> Option<LoopMetricsSnapshot> {
        let elapsed_ms = now_ms.saturating_sub(self.interval_start_ms);
        if elapsed_ms < self.interval_ms {
            return None;
        }

        let elapsed_seconds = (elapsed_ms as f32 / 1000.0).max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            self.frame_time_sum_ms as f32 / self.frames as f32
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.interval_start_ms = now_ms;
        self.frames = 0;
        self.frame_time_sum_ms = 0;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_computes_expected_values() {
        let mut accumulator = MetricsAccumulator::new(1000, 5_000);
        for _ in 0..4 {
            accumulator.record_frame(16);
        }

        let snapshot = accumulator
            .maybe_snapshot(6_000)
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 4.0).abs() < 0.001);
        assert!((snapshot.frame_time_ms - 16.0).abs() < 0.001);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let mut accumulator = MetricsAccumulator::new(1000, 0);
        accumulator.record_frame(16);

        assert!(accumulator.maybe_snapshot(500).is_none());
    }

    #[test]
    fn snapshot_resets_interval() {
        let mut accumulator = MetricsAccumulator::new(1000, 0);
        accumulator.record_frame(20);
        assert!(accumulator.maybe_snapshot(1000).is_some());

        let empty = accumulator.maybe_snapshot(2000).expect("second interval");
        assert_eq!(empty.fps, 0.0);
        assert_eq!(empty.frame_time_ms, 0.0);
    }
}
