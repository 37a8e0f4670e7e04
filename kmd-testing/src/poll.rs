use std::time::Duration;

/// How often to check and how many times a check may come back
/// [Check::Pending] before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
	pub interval: Duration,
	/// `None` keeps polling forever.
	pub max_attempts: Option<usize>,
}

impl PollPolicy {
	pub const fn bounded(interval: Duration, max_attempts: usize) -> Self {
		PollPolicy { interval, max_attempts: Some(max_attempts) }
	}

	pub const fn forever(interval: Duration) -> Self {
		PollPolicy { interval, max_attempts: None }
	}
}

/// The result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check<T> {
	Ready(T),
	/// Not there yet. Uses up an attempt.
	Pending,
	/// Not there yet, but moving. Doesn't use up an attempt.
	Advancing,
}

/// Run `check` until it is ready, sleeping `policy.interval` in between.
///
/// Returns `Ok(None)` once the attempt budget is used up and bails out on
/// the first error of `check`.
pub async fn poll_until<T, E, F>(
	policy: PollPolicy,
	what: &str,
	mut check: F,
) -> Result<Option<T>, E>
where
	F: FnMut() -> Result<Check<T>, E>,
{
	let mut attempts = 0;
	loop {
		match check()? {
			Check::Ready(v) => return Ok(Some(v)),
			Check::Pending => {
				attempts += 1;
				if let Some(max) = policy.max_attempts {
					if attempts >= max {
						warn!("{}: giving up after {} attempts", what, attempts);
						return Ok(None);
					}
				}
				trace!("{}: not yet, attempt {}", what, attempts);
			},
			Check::Advancing => trace!("{}: getting there", what),
		}
		tokio::time::sleep(policy.interval).await;
	}
}

#[cfg(test)]
mod test {
	use tokio::time::Instant;

	use super::*;

	const SEC: Duration = Duration::from_secs(1);

	#[tokio::test(start_paused = true)]
	async fn ready_right_away_does_not_sleep() {
		let start = Instant::now();
		let res = poll_until::<_, (), _>(PollPolicy::bounded(SEC, 3), "now", || Ok(Check::Ready(7))).await;
		assert_eq!(res, Ok(Some(7)));
		assert_eq!(start.elapsed(), Duration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn gives_up_after_max_attempts() {
		let start = Instant::now();
		let mut calls = 0;
		let res = poll_until::<(), (), _>(PollPolicy::bounded(SEC, 3), "never", || {
			calls += 1;
			Ok(Check::Pending)
		}).await;
		assert_eq!(res, Ok(None));
		assert_eq!(calls, 3);
		// no sleep after the last attempt
		assert_eq!(start.elapsed(), 2 * SEC);
	}

	#[tokio::test(start_paused = true)]
	async fn advancing_does_not_use_attempts() {
		let mut calls = 0;
		let res = poll_until::<_, (), _>(PollPolicy::bounded(SEC, 2), "slow", || {
			calls += 1;
			Ok(match calls {
				1 => Check::Pending,
				2..=9 => Check::Advancing,
				_ => Check::Ready(calls),
			})
		}).await;
		assert_eq!(res, Ok(Some(10)));
	}

	#[tokio::test(start_paused = true)]
	async fn forever_keeps_going() {
		let mut calls = 0;
		let res = poll_until::<_, (), _>(PollPolicy::forever(SEC), "forever", || {
			calls += 1;
			Ok(if calls < 500 { Check::Pending } else { Check::Ready(()) })
		}).await;
		assert_eq!(res, Ok(Some(())));
		assert_eq!(calls, 500);
	}

	#[tokio::test(start_paused = true)]
	async fn errors_stop_polling() {
		let mut calls = 0;
		let res = poll_until::<(), _, _>(PollPolicy::forever(SEC), "broken", || {
			calls += 1;
			if calls == 2 { Err("boom") } else { Ok(Check::Pending) }
		}).await;
		assert_eq!(res, Err("boom"));
		assert_eq!(calls, 2);
	}
}
