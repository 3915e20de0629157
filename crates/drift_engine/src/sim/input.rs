use super::clock::Clock;

/// Logical vehicle control, independent of physical key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Forward,
    Backward,
    Left,
    Right,
    Handbrake,
}

const CHANNEL_COUNT: usize = 5;

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Forward,
        Channel::Backward,
        Channel::Left,
        Channel::Right,
        Channel::Handbrake,
    ];

    const fn index(self) -> usize {
        match self {
            Channel::Forward => 0,
            Channel::Backward => 1,
            Channel::Left => 2,
            Channel::Right => 3,
            Channel::Handbrake => 4,
        }
    }
}

/// Anything that can hand out "time held since the last poll" per channel.
pub trait DurationSource {
    fn consume_pressed_duration(&mut self, channel: Channel) -> u64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PressRecord {
    down_since_ms: Option<u64>,
    accumulated_ms: u64,
}

impl PressRecord {
    fn open(&mut self, now_ms: u64) {
        if self.down_since_ms.is_none() {
            self.down_since_ms = Some(now_ms);
        }
    }

    fn close(&mut self, now_ms: u64) {
        if let Some(since) = self.down_since_ms.take() {
            self.accumulated_ms = self
                .accumulated_ms
                .saturating_add(now_ms.saturating_sub(since));
        }
    }

    fn take(&mut self, now_ms: u64) -> u64 {
        if self.down_since_ms.is_some() {
            self.close(now_ms);
            self.open(now_ms);
        }
        std::mem::take(&mut self.accumulated_ms)
    }
}

/// Accumulates how long each channel has been held since it was last consumed.
#[derive(Debug)]
pub struct InputDurationTracker<C> {
    clock: C,
    records: [PressRecord; CHANNEL_COUNT],
}

impl<C: Clock> InputDurationTracker<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            records: [PressRecord::default(); CHANNEL_COUNT],
        }
    }

    /// Opens an interval unless one is already open.
    pub fn press(&mut self, channel: Channel) {
        let now_ms = self.clock.now_ms();
        self.records[channel.index()].open(now_ms);
    }

    /// Closes the open interval, if any, into the accumulated total.
    pub fn release(&mut self, channel: Channel) {
        let now_ms = self.clock.now_ms();
        self.records[channel.index()].close(now_ms);
    }

    /// Returns the time held since the previous call and resets it.
    ///
    /// A held channel keeps accruing: its interval is split at the current
    /// instant, so the remainder counts toward the next call.
    pub fn consume_pressed_duration(&mut self, channel: Channel) -> u64 {
        let now_ms = self.clock.now_ms();
        self.records[channel.index()].take(now_ms)
    }

    pub fn is_down(&self, channel: Channel) -> bool {
        self.records[channel.index()].down_since_ms.is_some()
    }
}

impl<C: Clock> DurationSource for InputDurationTracker<C> {
    fn consume_pressed_duration(&mut self, channel: Channel) -> u64 {
        InputDurationTracker::consume_pressed_duration(self, channel)
    }
}
