mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{config, Harness, DELAY_SECS, DEPOSITOR, FEE_SINK, MIN, OWNER};
use parking_lot::Mutex;
use shade_protocol::WitnessVerifier;
use shade_vault::{
    Address, Error, InMemorySettlement, InstanceDescriptor, InvalidInput, RegistryNotifier,
    Status, Vault,
};

const STRANGER: Address = Address([0x55; 20]);
const SUCCESSOR: Address = Address([0x66; 20]);

#[test]
fn only_the_owner_administers() {
    let harness = Harness::<4>::new(1);
    let vault = &harness.vault;

    for result in [
        vault.pause(STRANGER),
        vault.unpause(STRANGER),
        vault.activate_emergency_pause(STRANGER),
        vault.transfer_ownership(STRANGER, STRANGER),
        vault.accept_ownership(STRANGER),
    ] {
        assert!(matches!(result, Err(Error::Unauthorized(STRANGER))));
    }

    assert!(matches!(
        vault.request_emergency_pause(STRANGER),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        vault.cancel_emergency_pause(STRANGER),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        vault.withdraw_fees(STRANGER),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        vault.emergency_drain(STRANGER, STRANGER),
        Err(Error::Unauthorized(_))
    ));

    assert_eq!(vault.status(), Status::Active);
}

#[test]
fn pause_transitions() {
    let harness = Harness::<4>::new(2);
    let vault = &harness.vault;

    assert!(matches!(
        vault.unpause(OWNER),
        Err(Error::NotActive(Status::Active))
    ));

    vault.pause(OWNER).unwrap();
    assert_eq!(vault.status(), Status::Paused);
    assert!(matches!(
        vault.pause(OWNER),
        Err(Error::NotActive(Status::Paused))
    ));

    vault.unpause(OWNER).unwrap();
    assert_eq!(vault.status(), Status::Active);
}

#[test]
fn emergency_pause_waits_for_the_delay() {
    let harness = Harness::<4>::new(3);
    let vault = &harness.vault;

    assert!(matches!(
        vault.activate_emergency_pause(OWNER),
        Err(Error::EmergencyNotReady { ready_at: None })
    ));

    let ready_at = vault.request_emergency_pause(OWNER).unwrap();
    assert_eq!(vault.stats().emergency_ready_at, Some(ready_at));

    harness.clock.advance(Duration::seconds(DELAY_SECS as i64 - 1));
    let error = vault.activate_emergency_pause(OWNER).unwrap_err();
    assert!(matches!(error, Error::EmergencyNotReady { ready_at: Some(at) } if at == ready_at));
    assert!(error.is_retryable());

    // asking again does not restart the delay
    assert_eq!(vault.request_emergency_pause(OWNER).unwrap(), ready_at);

    harness.clock.advance(Duration::seconds(1));
    vault.activate_emergency_pause(OWNER).unwrap();
    assert_eq!(vault.status(), Status::EmergencyPaused);
    assert_eq!(vault.stats().emergency_ready_at, None);

    // only unpause leaves the emergency state
    assert!(matches!(
        vault.pause(OWNER),
        Err(Error::NotActive(Status::EmergencyPaused))
    ));
    vault.unpause(OWNER).unwrap();
    assert_eq!(vault.status(), Status::Active);
}

#[test]
fn cancelled_requests_cannot_be_activated() {
    let harness = Harness::<4>::new(4);
    let vault = &harness.vault;

    assert!(!vault.cancel_emergency_pause(OWNER).unwrap());

    vault.request_emergency_pause(OWNER).unwrap();
    assert!(vault.cancel_emergency_pause(OWNER).unwrap());

    harness.clock.advance(Duration::seconds(DELAY_SECS as i64 * 2));
    assert!(matches!(
        vault.activate_emergency_pause(OWNER),
        Err(Error::EmergencyNotReady { ready_at: None })
    ));
}

#[test]
fn drain_only_while_paused() {
    let mut harness = Harness::<4>::new(5);
    let note = harness.deposit(5_000);
    let (witness, signals) = harness.withdrawal(&note, 0);
    let vault = &harness.vault;

    assert!(matches!(
        vault.emergency_drain(OWNER, OWNER),
        Err(Error::NotActive(Status::Active))
    ));

    vault.pause(OWNER).unwrap();
    assert!(matches!(
        vault.emergency_drain(OWNER, Address::ZERO),
        Err(Error::InvalidInput(InvalidInput::ZeroRecipient))
    ));

    assert_eq!(vault.emergency_drain(OWNER, OWNER).unwrap(), 5_000);
    assert_eq!(harness.settlement.balance_of(OWNER), 5_000);
    assert_eq!(vault.stats().balance, 0);

    // the commitment and tree survive the drain
    assert_eq!(vault.deposits().len(), 1);
    assert!(vault.is_known_root(signals.root));

    vault.unpause(OWNER).unwrap();
    assert!(matches!(
        vault.deposit(note.commitment(), 5_000, DEPOSITOR),
        Err(Error::DuplicateCommitment(_))
    ));
    assert!(matches!(
        vault.withdraw(&witness, &signals),
        Err(Error::InsufficientFunds { .. })
    ));
}

#[test]
fn fee_withdrawal_rolls_back_on_failure() {
    let mut harness = Harness::<4>::new(6);
    let note = harness.deposit(10_000);
    let (witness, signals) = harness.max_fee_withdrawal(&note);
    harness.vault.withdraw(&witness, &signals).unwrap();

    harness.settlement.refuse(FEE_SINK);
    assert!(matches!(
        harness.vault.withdraw_fees(OWNER),
        Err(Error::Settlement(_))
    ));
    assert_eq!(harness.vault.stats().accrued_fees, 100);

    harness.settlement.accept(FEE_SINK);
    assert_eq!(harness.vault.withdraw_fees(OWNER).unwrap(), 100);
    assert_eq!(harness.vault.withdraw_fees(OWNER).unwrap(), 0);
    assert_eq!(harness.settlement.balance_of(FEE_SINK), 100);
}

#[test]
fn ownership_moves_in_two_steps() {
    let harness = Harness::<4>::new(7);
    let vault = &harness.vault;

    assert!(matches!(
        vault.transfer_ownership(OWNER, Address::ZERO),
        Err(Error::InvalidInput(InvalidInput::ZeroOwner))
    ));

    vault.transfer_ownership(OWNER, SUCCESSOR).unwrap();
    assert_eq!(vault.owner(), OWNER);

    assert!(matches!(
        vault.accept_ownership(STRANGER),
        Err(Error::Unauthorized(STRANGER))
    ));

    vault.accept_ownership(SUCCESSOR).unwrap();
    assert_eq!(vault.owner(), SUCCESSOR);

    assert!(matches!(
        vault.pause(OWNER),
        Err(Error::Unauthorized(OWNER))
    ));
    vault.pause(SUCCESSOR).unwrap();

    // the offer is consumed
    assert!(matches!(
        vault.accept_ownership(SUCCESSOR),
        Err(Error::Unauthorized(_))
    ));
}

#[derive(Default)]
struct RecordingRegistry {
    seen: Mutex<Vec<InstanceDescriptor>>,
}

impl RegistryNotifier for RecordingRegistry {
    fn register(&self, descriptor: &InstanceDescriptor) {
        self.seen.lock().push(descriptor.clone());
    }
}

#[test]
fn new_vaults_announce_themselves_once() {
    let registry = RecordingRegistry::default();

    let vault = Vault::builder(
        config(),
        WitnessVerifier::<6>,
        Arc::new(InMemorySettlement::new()),
    )
    .registry(&registry)
    .build_with_depth::<6>()
    .unwrap();
    vault
        .deposit(shade_vault::Element::new(7), MIN, DEPOSITOR)
        .unwrap();

    let seen = registry.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vault.descriptor());
    assert_eq!(seen[0].depth, 6);
    assert_eq!(seen[0].root_history, 30);
    assert_eq!(seen[0].min_deposit, MIN);
    assert_eq!(
        seen[0].hash_fingerprint,
        shade_primitives::parameters().fingerprint
    );
}

#[test]
fn invalid_config_is_rejected_at_build_time() {
    let mut config = config();
    config.min_deposit = 0;

    let result = Vault::builder(
        config,
        WitnessVerifier::<4>,
        Arc::new(InMemorySettlement::new()),
    )
    .build_with_depth::<4>();

    assert!(matches!(result, Err(shade_vault::ConfigError::ZeroMinimum)));
}
