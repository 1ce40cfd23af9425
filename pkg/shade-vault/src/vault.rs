use std::sync::Arc;

use parking_lot::Mutex;
use shade_primitives::{Address, Element};
use shade_protocol::{fee_cap, PublicSignals, Verifier};
use shade_tree::{DEFAULT_DEPTH, DEFAULT_ROOT_HISTORY};

use crate::{
    state::VaultState, Clock, ConfigError, DepositEvent, Error, InstanceDescriptor, InvalidInput,
    RegistryNotifier, Result, Settlement, Status, SystemClock, VaultConfig, VaultStats,
    WithdrawalEvent,
};

/// A pool of fixed-value notes: deposits add a commitment to the tree, withdrawals spend one
/// without revealing which
///
/// All state sits behind a single lock, held for the whole of each operation (including proof
/// verification and settlement), so concurrent callers are serialized and can never observe or
/// produce a half-applied operation.
pub struct Vault<V, const DEPTH: usize = DEFAULT_DEPTH> {
    pub(crate) config: VaultConfig,
    verifier: V,
    pub(crate) settlement: Arc<dyn Settlement>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) state: Mutex<VaultState<DEPTH>>,
}

impl<V, const DEPTH: usize> core::fmt::Debug for Vault<V, DEPTH> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Vault")
            .field("config", &self.config)
            .field("depth", &DEPTH)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Vault`]
pub struct VaultBuilder<'a, V> {
    config: VaultConfig,
    verifier: V,
    settlement: Arc<dyn Settlement>,
    clock: Arc<dyn Clock>,
    registry: Option<&'a dyn RegistryNotifier>,
}

impl<'a, V: Verifier> VaultBuilder<'a, V> {
    /// Use `clock` instead of the system clock
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Announce the new vault to `registry`
    #[must_use]
    pub fn registry(mut self, registry: &'a dyn RegistryNotifier) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build a vault with a tree of [`DEFAULT_DEPTH`]
    pub fn build(self) -> Result<Vault<V>, ConfigError> {
        self.build_with_depth()
    }

    /// Build a vault with a tree of `DEPTH` levels
    pub fn build_with_depth<const DEPTH: usize>(self) -> Result<Vault<V, DEPTH>, ConfigError> {
        self.config.validate()?;

        let vault = Vault {
            state: Mutex::new(VaultState::new(self.config.owner)),
            config: self.config,
            verifier: self.verifier,
            settlement: self.settlement,
            clock: self.clock,
        };

        if let Some(registry) = self.registry {
            registry.register(&vault.descriptor());
        }

        tracing::info!(
            depth = DEPTH,
            owner = %vault.config.owner,
            root = %vault.last_root(),
            "vault created"
        );

        Ok(vault)
    }
}

impl<V: Verifier> Vault<V> {
    /// Start building a vault
    pub fn builder<'a>(
        config: VaultConfig,
        verifier: V,
        settlement: Arc<dyn Settlement>,
    ) -> VaultBuilder<'a, V> {
        VaultBuilder {
            config,
            verifier,
            settlement,
            clock: Arc::new(SystemClock),
            registry: None,
        }
    }
}

impl<V: Verifier, const DEPTH: usize> Vault<V, DEPTH> {
    /// Add `commitment` to the tree, backed by `value`
    ///
    /// Returns the leaf index of the commitment, which the depositor needs to build their
    /// authentication path later.
    #[tracing::instrument(err, skip(self))]
    pub fn deposit(&self, commitment: Element, value: u128, depositor: Address) -> Result<u64> {
        let mut state = self.state.lock();
        require_status(&state, &[Status::Active])?;

        if !self.config.accepts(value) {
            return Err(self.amount_out_of_range(Element::from(value)).into());
        }

        if commitment.is_zero() {
            return Err(InvalidInput::ZeroCommitment.into());
        }

        if !commitment.is_canonical() {
            return Err(InvalidInput::NonCanonical(commitment).into());
        }

        if state.commitments.contains(&commitment) {
            return Err(Error::DuplicateCommitment(commitment));
        }

        let balance = state
            .balance
            .checked_add(value)
            .ok_or_else(|| self.amount_out_of_range(Element::from(value)))?;

        let capacity = state.tree.capacity();
        let leaf_index = state
            .tree
            .insert(commitment)
            .map_err(|_| Error::CapacityExceeded { capacity })?;

        // nothing below can fail
        state.commitments.insert(commitment);
        state.balance = balance;

        let event = DepositEvent {
            commitment,
            leaf_index,
            amount: value,
            timestamp: self.clock.now(),
            depositor,
        };
        state.deposits.push(event);

        tracing::info!(
            %commitment,
            leaf_index,
            amount = value,
            root = %state.tree.last_root(),
            "deposit accepted"
        );

        Ok(leaf_index)
    }

    /// Spend a note, paying `amount - protocol_fee` to the recipient named in `signals`
    ///
    /// The nullifier hash is marked as spent before the proof is verified. If verification or
    /// settlement fails, the mark is removed again and nothing else has changed.
    #[tracing::instrument(
        err,
        skip(self, proof, signals),
        fields(nullifier_hash = %signals.nullifier_hash, root = %signals.root)
    )]
    pub fn withdraw(&self, proof: &V::Proof, signals: &PublicSignals) -> Result<WithdrawalEvent> {
        let mut state = self.state.lock();
        require_status(&state, &[Status::Active])?;

        let Checked {
            recipient,
            amount,
            fee,
        } = self.check_signals(signals)?;

        // a spent note must be reported as spent, even once the pool is empty
        let nullifier_hash = signals.nullifier_hash;
        if state.nullifier_hashes.contains(&nullifier_hash) {
            return Err(Error::NullifierAlreadySpent(nullifier_hash));
        }

        if amount > state.balance {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: state.balance,
            });
        }

        if !state.tree.is_known_root(signals.root) {
            return Err(Error::UnknownRoot(signals.root));
        }

        state.nullifier_hashes.insert(nullifier_hash);

        if !self.verifier.verify(proof, signals) {
            state.nullifier_hashes.remove(&nullifier_hash);
            tracing::warn!(%nullifier_hash, "proof rejected");
            return Err(Error::ProofInvalid);
        }

        if let Err(error) = self.settlement.transfer(recipient, amount - fee) {
            state.nullifier_hashes.remove(&nullifier_hash);
            tracing::warn!(%nullifier_hash, %error, "settlement failed");
            return Err(error.into());
        }

        state.balance -= amount;
        state.accrued_fees = state.accrued_fees.saturating_add(fee);
        state.total_fees = state.total_fees.saturating_add(fee);
        state.withdrawal_count += 1;

        let event = WithdrawalEvent {
            nullifier_hash,
            recipient,
            amount,
            fee,
            timestamp: self.clock.now(),
        };
        state.withdrawals.push(event.clone());

        tracing::info!(%nullifier_hash, %recipient, amount, fee, "withdrawal accepted");

        Ok(event)
    }

    /// [`Vault::withdraw`] with a proof in the verifier's wire encoding
    pub fn withdraw_encoded(
        &self,
        proof: &[u8],
        signals: &PublicSignals,
    ) -> Result<WithdrawalEvent> {
        let proof = self
            .verifier
            .decode_proof(proof)
            .map_err(|e| InvalidInput::MalformedProof(e.to_string()))?;

        self.withdraw(&proof, signals)
    }

    fn check_signals(&self, signals: &PublicSignals) -> Result<Checked, InvalidInput> {
        if let Some(element) = signals.first_non_canonical() {
            return Err(InvalidInput::NonCanonical(element));
        }

        let recipient = signals
            .recipient_address()
            .map_err(|_| InvalidInput::RecipientOutOfRange(signals.recipient))?;
        if recipient.is_zero() {
            return Err(InvalidInput::ZeroRecipient);
        }

        let amount = signals
            .amount_value()
            .ok()
            .filter(|amount| self.config.accepts(*amount))
            .ok_or_else(|| self.amount_out_of_range(signals.amount))?;

        let cap = fee_cap(amount);
        let fee = signals
            .fee_value()
            .ok()
            .filter(|fee| *fee <= cap)
            .ok_or(InvalidInput::FeeAboveCap {
                fee: signals.protocol_fee,
                cap,
            })?;

        if signals.nullifier_hash.is_zero() {
            return Err(InvalidInput::ZeroNullifierHash);
        }

        if signals.root.is_zero() {
            return Err(InvalidInput::ZeroRoot);
        }

        Ok(Checked {
            recipient,
            amount,
            fee,
        })
    }

    fn amount_out_of_range(&self, amount: Element) -> InvalidInput {
        InvalidInput::AmountOutOfRange {
            amount,
            min: self.config.min_deposit,
            max: self.config.max_deposit,
        }
    }

    /// The current root of the tree
    #[must_use]
    pub fn last_root(&self) -> Element {
        self.state.lock().tree.last_root()
    }

    /// Whether `root` is one of the recent roots withdrawals may refer to
    #[must_use]
    pub fn is_known_root(&self, root: Element) -> bool {
        self.state.lock().tree.is_known_root(root)
    }

    /// The root of an empty subtree of height `level`, for `level <= DEPTH`
    #[must_use]
    pub fn zero(&self, level: usize) -> Option<Element> {
        self.state.lock().tree.zero(level)
    }

    /// Whether `nullifier_hash` has been spent
    #[must_use]
    pub fn is_spent(&self, nullifier_hash: Element) -> bool {
        self.state.lock().nullifier_hashes.contains(&nullifier_hash)
    }

    /// The current operating mode
    #[must_use]
    pub fn status(&self) -> Status {
        self.state.lock().status
    }

    /// A snapshot of the vault's counters
    #[must_use]
    pub fn stats(&self) -> VaultStats {
        let state = self.state.lock();

        VaultStats {
            deposit_count: state.tree.next_index(),
            withdrawal_count: state.withdrawal_count,
            total_fees: state.total_fees,
            accrued_fees: state.accrued_fees,
            next_index: state.tree.next_index(),
            last_root: state.tree.last_root(),
            balance: state.balance,
            status: state.status,
            emergency_ready_at: state
                .emergency_requested_at
                .map(|at| self.emergency_ready_at(at)),
        }
    }

    /// Every accepted deposit, in leaf order
    #[must_use]
    pub fn deposits(&self) -> Vec<DepositEvent> {
        self.state.lock().deposits.clone()
    }

    /// Every accepted withdrawal, in order
    #[must_use]
    pub fn withdrawals(&self) -> Vec<WithdrawalEvent> {
        self.state.lock().withdrawals.clone()
    }

    /// The static parameters of this vault
    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The public description of this vault
    #[must_use]
    pub fn descriptor(&self) -> InstanceDescriptor {
        InstanceDescriptor::new(&self.config, DEPTH, DEFAULT_ROOT_HISTORY)
    }
}

struct Checked {
    recipient: Address,
    amount: u128,
    fee: u128,
}

pub(crate) fn require_status<const DEPTH: usize>(
    state: &VaultState<DEPTH>,
    allowed: &[Status],
) -> Result<()> {
    match allowed.contains(&state.status) {
        true => Ok(()),
        false => Err(Error::NotActive(state.status)),
    }
}
