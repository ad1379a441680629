//! Time source for the domain services.
//!
//! Every day boundary in the application is taken in one configured UTC offset. Services
//! receive a [`Clock`] instead of reading host-local time, which keeps them deterministic in
//! tests and stable across machines.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Current instant, expressed in the reference offset
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current calendar day in the reference offset
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock shifted into the reference offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Frozen at the given local wall time in `offset`. Returns None for impossible times.
    pub fn at(
        offset: FixedOffset,
        date: NaiveDate,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let local = date.and_hms_opt(hour, minute, second)?;
        offset
            .from_local_datetime(&local)
            .single()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}
