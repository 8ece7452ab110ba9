use std::sync::Mutex;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "now" in the fleet's civil timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Wall clock shifted to a fixed UTC offset (the fleet operates in a zone without DST).
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    offset: UtcOffset,
}

impl CivilClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Clock for CivilClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Clock pinned to an instant; can be moved forward explicitly.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Noon of `date` at `offset`.
    pub fn on(date: Date, offset: UtcOffset) -> Self {
        Self::new(date.midnight().assume_offset(offset) + time::Duration::hours(12))
    }

    pub fn set(&self, now: OffsetDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// `dd/mm/yyyy`, the format used on documents and in messages.
pub fn format_civil_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}
