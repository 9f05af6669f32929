//! Authoritative money, lives and wave bookkeeping.

/// Money the player starts a run with.
pub(crate) const STARTING_MONEY: u32 = 100;
/// Lives the player starts a run with.
pub(crate) const STARTING_LIVES: i32 = 10;
/// Money awarded for every killed enemy.
pub(crate) const KILL_BOUNTY: u32 = 10;

/// Player resources mutated by kills, purchases, refunds and leaks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Economy {
    money: u32,
    lives: i32,
    wave: u32,
}

impl Economy {
    /// Creates an economy holding the initial run resources.
    pub(crate) const fn new() -> Self {
        Self {
            money: STARTING_MONEY,
            lives: STARTING_LIVES,
            wave: 0,
        }
    }

    pub(crate) const fn money(&self) -> u32 {
        self.money
    }

    pub(crate) const fn lives(&self) -> i32 {
        self.lives
    }

    pub(crate) const fn wave(&self) -> u32 {
        self.wave
    }

    /// Reports whether the player can afford the provided cost.
    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Removes the provided cost from the player's money.
    ///
    /// Callers check affordability first; the subtraction saturates so an
    /// inconsistent caller cannot underflow the balance.
    pub(crate) fn debit(&mut self, cost: u32) {
        self.money = self.money.saturating_sub(cost);
    }

    /// Adds the provided amount to the player's money.
    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Deducts one life and returns the remaining count.
    pub(crate) fn lose_life(&mut self) -> i32 {
        self.lives -= 1;
        self.lives
    }

    /// Increments the wave counter and returns the new wave number.
    pub(crate) fn advance_wave(&mut self) -> u32 {
        self.wave += 1;
        self.wave
    }
}

/// Money returned when a tower of the provided cost is sold.
///
/// Matches `floor(cost * 0.6)` using exact integer arithmetic.
pub(crate) const fn refund_for(cost: u32) -> u32 {
    cost * 3 / 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_initial_resources() {
        let economy = Economy::new();
        assert_eq!(economy.money(), 100);
        assert_eq!(economy.lives(), 10);
        assert_eq!(economy.wave(), 0);
    }

    #[test]
    fn refund_matches_sixty_percent_floor() {
        assert_eq!(refund_for(50), 30);
        assert_eq!(refund_for(80), 48);
        assert_eq!(refund_for(33), 19);
        assert_eq!(refund_for(0), 0);
    }

    #[test]
    fn lives_can_drop_below_zero() {
        let mut economy = Economy::new();
        for _ in 0..11 {
            let _ = economy.lose_life();
        }
        assert_eq!(economy.lives(), -1);
    }

    #[test]
    fn debit_requires_prior_affordability_check() {
        let mut economy = Economy::new();
        assert!(economy.can_afford(100));
        assert!(!economy.can_afford(101));

        economy.debit(60);
        assert_eq!(economy.money(), 40);

        economy.credit(25);
        assert_eq!(economy.money(), 65);
    }
}
