use chrono::{DateTime, SubsecRound, Utc};

// Publication dates are stored with millisecond precision,
// which is what every client parsing them as a JS Date
// ends up with anyway.
pub fn current_datetime() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(3)
}
