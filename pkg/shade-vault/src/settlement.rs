use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use shade_primitives::Address;

/// A transfer the settlement layer refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transfer of {amount} to {to} refused: {reason}")]
pub struct SettlementError {
    /// The intended receiver
    pub to: Address,
    /// The amount that was not moved
    pub amount: u128,
    /// Why the transfer was refused
    pub reason: String,
}

/// Moves value out of the vault
///
/// Implementations must either move the full amount and return `Ok`, or move nothing and return
/// an error. The vault calls this while holding its state lock, so an implementation must not
/// call back into the same vault.
pub trait Settlement: Send + Sync {
    /// Pay `amount` to `to`
    fn transfer(&self, to: Address, amount: u128) -> Result<(), SettlementError>;
}

/// A settlement layer that keeps balances in memory
///
/// Receivers can be marked as refusing, to simulate a failing transfer.
#[derive(Debug, Default)]
pub struct InMemorySettlement {
    balances: Mutex<HashMap<Address, u128>>,
    refusing: Mutex<HashSet<Address>>,
}

impl InMemorySettlement {
    /// An empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything paid to `address` so far
    #[must_use]
    pub fn balance_of(&self, address: Address) -> u128 {
        self.balances.lock().get(&address).copied().unwrap_or(0)
    }

    /// Everything paid out so far
    #[must_use]
    pub fn total_paid(&self) -> u128 {
        self.balances.lock().values().sum()
    }

    /// Make transfers to `address` fail until [`InMemorySettlement::accept`] is called
    pub fn refuse(&self, address: Address) {
        self.refusing.lock().insert(address);
    }

    /// Let transfers to `address` succeed again
    pub fn accept(&self, address: Address) {
        self.refusing.lock().remove(&address);
    }
}

impl Settlement for InMemorySettlement {
    fn transfer(&self, to: Address, amount: u128) -> Result<(), SettlementError> {
        if self.refusing.lock().contains(&to) {
            return Err(SettlementError {
                to,
                amount,
                reason: "receiver refused the transfer".to_owned(),
            });
        }

        let mut balances = self.balances.lock();
        let balance = balances.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or_else(|| SettlementError {
            to,
            amount,
            reason: "receiver balance overflow".to_owned(),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_transfers_move_nothing() {
        let settlement = InMemorySettlement::new();
        let alice = Address([1; 20]);

        settlement.transfer(alice, 10).unwrap();
        settlement.refuse(alice);

        let error = settlement.transfer(alice, 5).unwrap_err();
        assert_eq!(error.amount, 5);
        assert_eq!(settlement.balance_of(alice), 10);

        settlement.accept(alice);
        settlement.transfer(alice, 5).unwrap();
        assert_eq!(settlement.balance_of(alice), 15);
        assert_eq!(settlement.total_paid(), 15);
    }
}
