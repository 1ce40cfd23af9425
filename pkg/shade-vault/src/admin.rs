use chrono::{DateTime, Duration, Utc};
use shade_primitives::Address;
use shade_protocol::Verifier;

use crate::{
    state::VaultState,
    vault::{require_status, Vault},
    Error, InvalidInput, Result, Status,
};

fn require_owner<const DEPTH: usize>(state: &VaultState<DEPTH>, caller: Address) -> Result<()> {
    match state.owner == caller {
        true => Ok(()),
        false => Err(Error::Unauthorized(caller)),
    }
}

impl<V: Verifier, const DEPTH: usize> Vault<V, DEPTH> {
    /// Stop accepting deposits and withdrawals
    #[tracing::instrument(err, skip(self))]
    pub fn pause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;
        require_status(&state, &[Status::Active])?;

        state.status = Status::Paused;
        tracing::info!("vault paused");

        Ok(())
    }

    /// Resume from either kind of pause
    ///
    /// Also drops any pending emergency pause request.
    #[tracing::instrument(err, skip(self))]
    pub fn unpause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;
        require_status(&state, &[Status::Paused, Status::EmergencyPaused])?;

        state.status = Status::Active;
        state.emergency_requested_at = None;
        tracing::info!("vault resumed");

        Ok(())
    }

    /// Start the emergency pause delay
    ///
    /// Returns when the pause can be activated. Repeating the request does not restart the
    /// delay.
    #[tracing::instrument(err, skip(self))]
    pub fn request_emergency_pause(&self, caller: Address) -> Result<DateTime<Utc>> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;
        require_status(&state, &[Status::Active, Status::Paused])?;

        let requested_at = *state
            .emergency_requested_at
            .get_or_insert_with(|| self.clock.now());
        let ready_at = self.emergency_ready_at(requested_at);

        tracing::warn!(%ready_at, "emergency pause requested");

        Ok(ready_at)
    }

    /// Drop a pending emergency pause request
    ///
    /// Returns whether there was one.
    #[tracing::instrument(err, skip(self))]
    pub fn cancel_emergency_pause(&self, caller: Address) -> Result<bool> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;

        let cancelled = state.emergency_requested_at.take().is_some();
        if cancelled {
            tracing::info!("emergency pause request cancelled");
        }

        Ok(cancelled)
    }

    /// Enter [`Status::EmergencyPaused`], once the requested delay has passed
    #[tracing::instrument(err, skip(self))]
    pub fn activate_emergency_pause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;
        require_status(&state, &[Status::Active, Status::Paused])?;

        let Some(requested_at) = state.emergency_requested_at else {
            return Err(Error::EmergencyNotReady { ready_at: None });
        };

        let ready_at = self.emergency_ready_at(requested_at);
        if self.clock.now() < ready_at {
            return Err(Error::EmergencyNotReady {
                ready_at: Some(ready_at),
            });
        }

        state.status = Status::EmergencyPaused;
        state.emergency_requested_at = None;
        tracing::warn!("emergency pause active");

        Ok(())
    }

    /// Pay the accrued protocol fees to the configured fee sink
    ///
    /// Returns the amount paid.
    #[tracing::instrument(err, skip(self))]
    pub fn withdraw_fees(&self, caller: Address) -> Result<u128> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;

        let amount = state.accrued_fees;
        if amount == 0 {
            return Ok(0);
        }

        self.settlement.transfer(self.config.fee_sink, amount)?;
        state.accrued_fees = 0;

        tracing::info!(amount, fee_sink = %self.config.fee_sink, "fees withdrawn");

        Ok(amount)
    }

    /// Move the whole pool balance to `to`, while paused
    ///
    /// Spent nullifiers and known commitments are kept, so a drained vault that is later resumed
    /// still refuses double spends. Returns the amount moved.
    #[tracing::instrument(err, skip(self))]
    pub fn emergency_drain(&self, caller: Address, to: Address) -> Result<u128> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;
        require_status(&state, &[Status::Paused, Status::EmergencyPaused])?;

        if to.is_zero() {
            return Err(InvalidInput::ZeroRecipient.into());
        }

        let amount = state.balance;
        self.settlement.transfer(to, amount)?;
        state.balance = 0;

        tracing::warn!(amount, %to, "vault drained");

        Ok(amount)
    }

    /// Propose `new_owner`, who must call [`Vault::accept_ownership`] to take over
    #[tracing::instrument(err, skip(self))]
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        let mut state = self.state.lock();
        require_owner(&state, caller)?;

        if new_owner.is_zero() {
            return Err(InvalidInput::ZeroOwner.into());
        }

        state.pending_owner = Some(new_owner);

        Ok(())
    }

    /// Complete an ownership transfer started by the current owner
    #[tracing::instrument(err, skip(self))]
    pub fn accept_ownership(&self, caller: Address) -> Result<()> {
        let mut state = self.state.lock();
        let pending_owner = state.pending_owner;

        match pending_owner {
            Some(pending) if pending == caller => {
                state.owner = caller;
                state.pending_owner = None;
                tracing::info!(owner = %caller, "ownership transferred");
                Ok(())
            }
            _ => Err(Error::Unauthorized(caller)),
        }
    }

    /// The current owner
    #[must_use]
    pub fn owner(&self) -> Address {
        self.state.lock().owner
    }

    pub(crate) fn emergency_ready_at(&self, requested_at: DateTime<Utc>) -> DateTime<Utc> {
        i64::try_from(self.config.emergency_delay_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delay| requested_at.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
