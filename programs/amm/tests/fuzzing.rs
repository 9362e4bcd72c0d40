//! Property tests for the settlement engine
//!
//! Run with: cargo test -p cpamm --test fuzzing
//! Increase cases: PROPTEST_CASES=1000 cargo test -p cpamm --test fuzzing
//!
//! This suite covers:
//! - Deposit ratio preservation and supply accounting
//! - Withdraw bounded by the proportional share
//! - Swap invariant growth and monotonicity
//! - Snapshot-based "no mutation on error" checking over random action sequences

use cpamm::*;
use proptest::prelude::*;
use solana_program::pubkey::Pubkey;

// ============================================================================
// SECTION 1: FIXTURE
// ============================================================================

const FUNDING: u64 = 1 << 48;

struct Fixture {
    engine: MemoryAmmEngine,
    pool: Pool,
    holders: [Pubkey; 2],
}

impl Fixture {
    fn new(fee_bps: u16) -> Self {
        let mut engine = MemoryAmmEngine::default();
        let admin = Pubkey::new_unique();
        let holders = [Pubkey::new_unique(), Pubkey::new_unique()];
        let pool = engine
            .initialize(
                &admin,
                InitializeParams {
                    seed: 1,
                    mint_x: Pubkey::new_unique(),
                    mint_y: Pubkey::new_unique(),
                    fee_bps,
                    authority: Some(admin),
                },
            )
            .unwrap();

        for holder in holders {
            engine.custody_mut().fund(holder, pool.mint_x, FUNDING).unwrap();
            engine.custody_mut().fund(holder, pool.mint_y, FUNDING).unwrap();
        }

        Self { engine, pool, holders }
    }

    /// Pool holding at least (x, y), with `x` claim tokens held by holder 0.
    /// The bootstrap deposit is 1:1; the surplus side is credited directly.
    fn seeded(fee_bps: u16, x: u64, y: u64) -> Self {
        let mut f = Self::new(fee_bps);
        let addr = f.pool.address;
        let lp = f.holders[0];
        f.engine.deposit(&addr, &lp, x, x, x).unwrap();
        if y > x {
            f.engine.custody_mut().fund(addr, f.pool.mint_y, y - x).unwrap();
        }
        f
    }

    fn snapshot(&self) -> PoolSnapshot {
        self.engine.snapshot(&self.pool.address).unwrap()
    }

    fn supply_matches_holders(&self) -> bool {
        let held: u64 = self
            .holders
            .iter()
            .map(|h| self.engine.custody().balance(h, &self.pool.lp_mint))
            .sum();
        held == self.snapshot().lp_supply
    }
}

fn k(snap: &PoolSnapshot) -> u128 {
    snap.vault_x as u128 * snap.vault_y as u128
}

// ============================================================================
// SECTION 2: LIQUIDITY PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn deposit_preserves_ratio(
        x in 1_000u64..1_000_000_000,
        extra_y in 0u64..1_000_000_000,
        amount in 1u64..1_000_000,
    ) {
        let mut f = Fixture::seeded(30, x, x + extra_y);
        let before = f.snapshot();

        let q = f.engine.deposit(&f.pool.address, &f.holders[1], amount, u64::MAX, u64::MAX).unwrap();
        let after = f.snapshot();

        prop_assert_eq!(q.lp_minted, amount);
        prop_assert_eq!(after.lp_supply, before.lp_supply + amount);
        prop_assert_eq!(after.vault_x, before.vault_x + q.amount_x);
        prop_assert_eq!(after.vault_y, before.vault_y + q.amount_y);

        // Floor rounding: used amounts never exceed the exact proportion
        prop_assert!(q.amount_x as u128 * before.lp_supply as u128 <= amount as u128 * before.vault_x as u128);
        prop_assert!(q.amount_y as u128 * before.lp_supply as u128 <= amount as u128 * before.vault_y as u128);
        prop_assert!(f.supply_matches_holders());
    }

    #[test]
    fn withdraw_never_exceeds_share(
        x in 1u64..1_000_000_000,
        extra_y in 0u64..1_000_000_000,
        burn_frac in 1u64..=1_000,
    ) {
        let mut f = Fixture::seeded(30, x, x + extra_y);
        let before = f.snapshot();
        let burn = (x as u128 * burn_frac as u128 / 1_000).max(1) as u64;

        let q = f.engine.withdraw(&f.pool.address, &f.holders[0], burn, 0, 0).unwrap();
        let after = f.snapshot();

        prop_assert!(q.amount_x as u128 * before.lp_supply as u128 <= burn as u128 * before.vault_x as u128);
        prop_assert!(q.amount_y as u128 * before.lp_supply as u128 <= burn as u128 * before.vault_y as u128);
        prop_assert_eq!(after.lp_supply, before.lp_supply - burn);
        prop_assert_eq!(after.vault_x, before.vault_x - q.amount_x);
        prop_assert_eq!(after.vault_y, before.vault_y - q.amount_y);
        prop_assert!(f.supply_matches_holders());

        if burn == before.lp_supply {
            prop_assert_eq!((after.vault_x, after.vault_y), (0, 0));
        }
    }
}

// ============================================================================
// SECTION 3: SWAP PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn swap_grows_invariant_with_fee(
        reserve in 1_000u64..1_000_000_000,
        amount_in in 1u64..1_000_000_000,
        fee_bps in 0u16..=10_000,
        x_to_y in any::<bool>(),
    ) {
        let mut f = Fixture::seeded(fee_bps, reserve, reserve);
        let before = f.snapshot();
        let direction = SwapDirection::from_is_x(x_to_y);

        let q = f.engine.swap(&f.pool.address, &f.holders[1], direction, amount_in, 0).unwrap();
        let after = f.snapshot();

        prop_assert!(k(&after) >= k(&before));
        if q.fee > 0 {
            prop_assert!(k(&after) > k(&before));
        }
        prop_assert_eq!(after.lp_supply, before.lp_supply);
    }

    #[test]
    fn swap_output_monotonic_in_input(
        reserve_x in 1_000u64..1_000_000_000,
        reserve_y in 1_000u64..1_000_000_000,
        a in 1u64..1_000_000_000,
        b in 1u64..1_000_000_000,
        fee_bps in 0u16..=10_000,
    ) {
        let f = Fixture::seeded(fee_bps, reserve_x, reserve_y);
        let (small, large) = if a <= b { (a, b) } else { (b, a) };

        let qs = f.engine.preview_swap(&f.pool.address, SwapDirection::XToY, small).unwrap();
        let ql = f.engine.preview_swap(&f.pool.address, SwapDirection::XToY, large).unwrap();
        prop_assert!(qs.amount_out <= ql.amount_out);
    }

    #[test]
    fn swap_output_antitone_in_fee(
        reserve in 1_000u64..1_000_000_000,
        amount_in in 1u64..1_000_000_000,
        f1 in 0u16..=10_000,
        f2 in 0u16..=10_000,
    ) {
        let (low, high) = if f1 <= f2 { (f1, f2) } else { (f2, f1) };
        let cheap = Fixture::seeded(low, reserve, reserve);
        let dear = Fixture::seeded(high, reserve, reserve);

        let qc = cheap.engine.preview_swap(&cheap.pool.address, SwapDirection::XToY, amount_in).unwrap();
        let qd = dear.engine.preview_swap(&dear.pool.address, SwapDirection::XToY, amount_in).unwrap();
        prop_assert!(qd.amount_out <= qc.amount_out);
    }
}

// ============================================================================
// SECTION 4: ACTION SEQUENCES, NO MUTATION ON ERROR
// ============================================================================

#[derive(Clone, Debug)]
enum Action {
    Deposit { who: usize, amount: u64, max_x: u64, max_y: u64 },
    Withdraw { who: usize, burn: u64, min_x: u64, min_y: u64 },
    Swap { who: usize, x_to_y: bool, amount_in: u64, min_out: u64 },
    Lock { locked: bool },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..2, 0u64..100_000, 0u64..200_000, 0u64..200_000)
            .prop_map(|(who, amount, max_x, max_y)| Action::Deposit { who, amount, max_x, max_y }),
        (0usize..2, 0u64..100_000, 0u64..50_000, 0u64..50_000)
            .prop_map(|(who, burn, min_x, min_y)| Action::Withdraw { who, burn, min_x, min_y }),
        (0usize..2, any::<bool>(), 0u64..100_000, 0u64..50_000)
            .prop_map(|(who, x_to_y, amount_in, min_out)| Action::Swap { who, x_to_y, amount_in, min_out }),
        any::<bool>().prop_map(|locked| Action::Lock { locked }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn failed_actions_leave_no_trace(actions in prop::collection::vec(action(), 1..40)) {
        let mut f = Fixture::new(30);
        let addr = f.pool.address;
        let admin = f.pool.authority.unwrap();

        for a in actions {
            let before = f.engine.clone();
            let k_before = k(&f.snapshot());

            let result = match a {
                Action::Deposit { who, amount, max_x, max_y } => f
                    .engine
                    .deposit(&addr, &f.holders[who], amount, max_x, max_y)
                    .map(|_| ()),
                Action::Withdraw { who, burn, min_x, min_y } => f
                    .engine
                    .withdraw(&addr, &f.holders[who], burn, min_x, min_y)
                    .map(|_| ()),
                Action::Swap { who, x_to_y, amount_in, min_out } => {
                    let swapped = f
                        .engine
                        .swap(&addr, &f.holders[who], SwapDirection::from_is_x(x_to_y), amount_in, min_out)
                        .map(|_| ());
                    if swapped.is_ok() {
                        prop_assert!(k(&f.snapshot()) >= k_before);
                    }
                    swapped
                }
                Action::Lock { locked } => f.engine.set_locked(&addr, &admin, locked),
            };

            if result.is_err() {
                prop_assert_eq!(&f.engine, &before);
            }
            prop_assert!(f.supply_matches_holders());
        }
    }
}
