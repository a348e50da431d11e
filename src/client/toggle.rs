use async_trait::async_trait;
use tokio::sync::watch;

use super::ClientError;

/// Server call behind a toggle: create the relation when `active` is true,
/// delete it otherwise.
#[async_trait]
pub trait RelationRequest: Send + Sync {
	async fn apply(
		&self,
		active: bool,
	) -> Result<(), ClientError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
	pub active: bool,
	pub count: i64,
	pub is_loading: bool,
	pub error: Option<String>,
}

type SuccessCallback = Box<dyn Fn(bool) + Send + Sync>;

/// A boolean relation with a counter (liked + likes, following + followers)
/// that flips locally before the server confirms and rolls back to the exact
/// previous values when it does not.
pub struct OptimisticToggle<R> {
	request: R,
	state: watch::Sender<ToggleState>,
	on_success: Option<SuccessCallback>,
}

impl<R: RelationRequest> OptimisticToggle<R> {
	pub fn new(
		request: R,
		active: bool,
		count: i64,
	) -> Self {
		let (state, _) = watch::channel(ToggleState {
			active,
			count,
			..Default::default()
		});
		Self {
			request,
			state,
			on_success: None,
		}
	}

	/// Called with the new `active` value after the server confirmed a toggle.
	pub fn on_success(
		mut self,
		callback: impl Fn(bool) + Send + Sync + 'static,
	) -> Self {
		self.on_success = Some(Box::new(callback));
		self
	}

	pub fn subscribe(&self) -> watch::Receiver<ToggleState> {
		self.state.subscribe()
	}

	pub fn state(&self) -> ToggleState {
		self.state.borrow().clone()
	}

	/// Flips the relation. Returns the confirmed `active` value, or
	/// [`ClientError::InFlight`] without touching state while a previous
	/// toggle is pending.
	pub async fn toggle(&self) -> Result<bool, ClientError> {
		let mut snapshot = None;
		self.state.send_if_modified(|state| {
			if state.is_loading {
				return false;
			}
			snapshot = Some((state.active, state.count));
			state.active = !state.active;
			state.count += if state.active { 1 } else { -1 };
			state.is_loading = true;
			state.error = None;
			true
		});
		let Some((was_active, previous_count)) = snapshot else {
			return Err(ClientError::InFlight);
		};
		let mut rollback = Rollback {
			state: &self.state,
			snapshot: Some((was_active, previous_count)),
		};

		let target = !was_active;
		match self.request.apply(target).await {
			Ok(()) => {
				rollback.disarm();
				self.state.send_modify(|state| state.is_loading = false);
				if let Some(callback) = &self.on_success {
					callback(target);
				}
				Ok(target)
			}
			Err(err) => {
				tracing::warn!(error = %err, "Optimistic toggle rolled back");
				rollback.restore(Some(err.to_string()));
				Err(err)
			}
		}
	}
}

/// Puts the pre-toggle values back unless disarmed. Dropping it mid-request
/// (timeout, `select!`, aborted task) restores the snapshot as well.
struct Rollback<'a> {
	state: &'a watch::Sender<ToggleState>,
	snapshot: Option<(bool, i64)>,
}

impl Rollback<'_> {
	fn disarm(&mut self) {
		self.snapshot = None;
	}

	fn restore(
		&mut self,
		error: Option<String>,
	) {
		if let Some((active, count)) = self.snapshot.take() {
			self.state.send_modify(|state| {
				state.active = active;
				state.count = count;
				state.is_loading = false;
				state.error = error;
			});
		}
	}
}

impl Drop for Rollback<'_> {
	fn drop(&mut self) {
		self.restore(None);
	}
}
