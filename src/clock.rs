use chrono::Local;

/// Wall-clock seam so dedup windows and `{time}` stamps are testable.
pub trait Clock: Send + Sync {
    fn now_epoch(&self) -> i64;
    fn short_time(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> i64 {
        Local::now().timestamp()
    }

    fn short_time(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock {
    pub epoch: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl FixedClock {
    pub fn at(epoch: i64) -> Self {
        Self {
            epoch: std::sync::atomic::AtomicI64::new(epoch),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.epoch
            .fetch_add(seconds, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now_epoch(&self) -> i64 {
        self.epoch.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn short_time(&self) -> String {
        "12:00".to_string()
    }
}
