use chrono::{DateTime, Utc};

/// Feed-style timestamp label: "just now", "5m ago", "3h ago", "2d ago",
/// then the calendar date once a week has passed.
pub fn format_relative_time(
	then: DateTime<Utc>,
	now: DateTime<Utc>,
) -> String {
	let elapsed = now.signed_duration_since(then);
	let seconds = elapsed.num_seconds();
	match seconds {
		s if s < 60 => "just now".to_string(),
		s if s < 60 * 60 => format!("{}m ago", s / 60),
		s if s < 24 * 60 * 60 => format!("{}h ago", s / (60 * 60)),
		s if s < 7 * 24 * 60 * 60 => format!("{}d ago", s / (24 * 60 * 60)),
		_ => then.format("%Y-%m-%d").to_string(),
	}
}
