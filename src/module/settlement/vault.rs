use super::model::{EffectKind, VaultPosition};
use crate::Identity;
use crate::error::{EffectError, ProtocolError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct VaultLedger {
    positions: Mutex<HashMap<(Identity, Identity), VaultPosition>>,
}

impl VaultLedger {
    pub fn position(&self, asset: &Identity, user: &Identity) -> Result<VaultPosition, ProtocolError> {
        let positions = self.lock()?;
        Ok(positions.get(&(*asset, *user)).copied().unwrap_or_default())
    }

    pub fn apply(
        &self,
        effect: EffectKind,
        asset: &Identity,
        user: &Identity,
        amount: u64,
    ) -> Result<VaultPosition, ProtocolError> {
        let mut positions = self.lock()?;
        let current = positions.get(&(*asset, *user)).copied().unwrap_or_default();
        let next = next_position(current, effect, amount)?;
        positions.insert((*asset, *user), next);
        Ok(next)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<(Identity, Identity), VaultPosition>>, ProtocolError> {
        self.positions
            .lock()
            .map_err(|_| ProtocolError::StoreUnavailable)
    }
}

fn next_position(
    current: VaultPosition,
    effect: EffectKind,
    amount: u64,
) -> Result<VaultPosition, EffectError> {
    let require_balance = || {
        if current.balance < amount {
            Err(EffectError::InsufficientVaultBalance {
                available: current.balance,
                requested: amount,
            })
        } else {
            Ok(())
        }
    };

    match effect {
        EffectKind::Deposit => Ok(VaultPosition {
            balance: current.balance.checked_add(amount).ok_or(EffectError::Overflow)?,
            ..current
        }),
        EffectKind::Withdraw => {
            require_balance()?;
            Ok(VaultPosition {
                balance: current.balance - amount,
                ..current
            })
        }
        EffectKind::Borrow => Ok(VaultPosition {
            debt: current.debt.checked_add(amount).ok_or(EffectError::Overflow)?,
            ..current
        }),
        EffectKind::Liquidation => {
            require_balance()?;
            Ok(VaultPosition {
                balance: current.balance - amount,
                debt: current.debt - current.debt.min(amount),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: Identity = [7u8; 32];
    const USER: Identity = [9u8; 32];

    #[test]
    fn withdraw_beyond_balance_leaves_position_untouched() {
        let ledger = VaultLedger::default();
        ledger.apply(EffectKind::Deposit, &ASSET, &USER, 100).unwrap();

        let err = ledger
            .apply(EffectKind::Withdraw, &ASSET, &USER, 101)
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::SettlementRejected(EffectError::InsufficientVaultBalance {
                available: 100,
                requested: 101,
            })
        );
        assert_eq!(ledger.position(&ASSET, &USER).unwrap().balance, 100);
    }

    #[test]
    fn liquidation_reduces_balance_and_caps_debt_reduction() {
        let ledger = VaultLedger::default();
        ledger.apply(EffectKind::Deposit, &ASSET, &USER, 500).unwrap();
        ledger.apply(EffectKind::Borrow, &ASSET, &USER, 40).unwrap();

        let pos = ledger
            .apply(EffectKind::Liquidation, &ASSET, &USER, 100)
            .unwrap();
        assert_eq!(pos, VaultPosition { balance: 400, debt: 0 });
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let ledger = VaultLedger::default();
        ledger
            .apply(EffectKind::Deposit, &ASSET, &USER, u64::MAX)
            .unwrap();
        assert!(ledger.apply(EffectKind::Deposit, &ASSET, &USER, 1).is_err());
    }
}
