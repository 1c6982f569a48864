use crate::prelude::*;

/// `total_study_time` is kept in seconds
pub fn study_minutes(seconds: i64) -> i64 {
  seconds.max(0) / 60
}

pub fn format_study_time(seconds: i64) -> String {
  humantime::format_duration(Duration::from_secs(seconds.max(0) as u64))
    .to_string()
}

pub fn parse_duration_env(
  name: &str,
  default: Duration,
) -> anyhow::Result<Duration> {
  match std::env::var(name) {
    Ok(value) => humantime::parse_duration(value.trim())
      .with_context(|| format!("{name} is not a valid duration: `{value}`")),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_study_time_formatting() {
    assert_eq!(study_minutes(59), 0);
    assert_eq!(study_minutes(3_725), 62);
    assert_eq!(format_study_time(3_725), "1h 2m 5s");
    assert_eq!(format_study_time(0), "0s");
  }
}
