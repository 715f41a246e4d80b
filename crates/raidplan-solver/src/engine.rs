//! Branch-and-bound search over the battle order.
//!
//! The search walks contested battles in order. Entering battle `k` it
//! first scores the "k stays uncleared" leaf: every remaining use of
//! every commander is poured onto `k`, which keeps the full-spend
//! invariant. It then branches over allocations that defeat `k`,
//! commanders in descending damage order, use counts from the covering
//! maximum downward. No branch ever assigns more than a battle's cover
//! requires; surplus uses are always at least as valuable on the first
//! uncleared battle.
//!
//! Pruning uses a pooled-budget relaxation: every remaining use is allowed
//! to deal the best single-commander damage of whatever battle it lands
//! on, battles are charged their cheapest relaxed cost in order, and the
//! first uncoverable battle caps the bound with its fractional term. The
//! first descent doubles as a greedy incumbent, so a deadline hit still
//! reports the best assignment seen.
//!
//! The root branches can optionally fan out on a rayon pool; workers share
//! one incumbent behind a mutex and a relaxed best-objective atomic, and
//! stop cooperatively when any of them observes the deadline.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use raidplan_core::CampaignScore;

use crate::model::BattleModel;
use crate::termination::TimeTermination;

/// How many search nodes pass between wall-clock checks.
const TERMINATION_CHECK_INTERVAL: u32 = 2048;

/// Terminal state of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search space was exhausted; the incumbent is proven best.
    Optimal,
    /// The deadline hit first; the incumbent is the best found so far.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The deadline hit before any complete assignment was found.
    NoSolutionFound,
}

impl SolveStatus {
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::NoSolutionFound => write!(f, "NoSolutionFound"),
        }
    }
}

/// Best complete assignment found so far.
#[derive(Debug, Clone)]
pub(crate) struct Incumbent {
    pub(crate) score: CampaignScore,
    /// Use counts per commander per contested battle.
    pub(crate) uses: Vec<Vec<u32>>,
}

/// Result of running the engine once.
#[derive(Debug)]
pub struct SearchOutcome {
    pub status: SolveStatus,
    pub score: Option<CampaignScore>,
    pub nodes_explored: u64,
    pub(crate) best: Option<Incumbent>,
}

/// The search engine. One instance runs one time-bounded solve.
pub struct BranchAndBound<'a> {
    model: &'a BattleModel,
    parallel_root_split: bool,
}

struct SearchShared {
    best_objective: AtomicI64,
    incumbent: Mutex<Option<Incumbent>>,
    stop: AtomicBool,
    nodes: AtomicU64,
}

impl SearchShared {
    fn new() -> Self {
        SearchShared {
            best_objective: AtomicI64::new(i64::MIN),
            incumbent: Mutex::new(None),
            stop: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
        }
    }
}

/// One allocation decision on the search stack.
#[derive(Debug, Clone, Copy)]
struct Alloc {
    battle: usize,
    commander: usize,
    uses: u32,
}

struct SearchWorker<'a> {
    model: &'a BattleModel,
    shared: &'a SearchShared,
    termination: &'a TimeTermination,
    /// Uses each commander still has to spend.
    remaining: Vec<u32>,
    remaining_total: u64,
    stack: Vec<Alloc>,
    /// Contested battles defeated on the current path.
    defeats: i64,
    local_nodes: u64,
    check_countdown: u32,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(model: &'a BattleModel) -> Self {
        BranchAndBound {
            model,
            parallel_root_split: true,
        }
    }

    pub fn with_parallel_root_split(mut self, enabled: bool) -> Self {
        self.parallel_root_split = enabled;
        self
    }

    /// Runs the search until proven optimal or until the termination
    /// fires, whichever comes first.
    pub fn solve(&self, termination: &TimeTermination) -> SearchOutcome {
        let contested = self.model.contested();

        if contested.is_empty() {
            // Nothing may be assigned, so the roster can spend its uses
            // only if it has none.
            return if self.model.total_uses() == 0 {
                let incumbent = Incumbent {
                    score: CampaignScore::ZERO,
                    uses: vec![Vec::new(); self.model.commander_names().len()],
                };
                SearchOutcome {
                    status: SolveStatus::Optimal,
                    score: Some(incumbent.score),
                    nodes_explored: 0,
                    best: Some(incumbent),
                }
            } else {
                SearchOutcome {
                    status: SolveStatus::Infeasible,
                    score: None,
                    nodes_explored: 0,
                    best: None,
                }
            };
        }

        let shared = SearchShared::new();

        if self.parallel_root_split {
            self.solve_parallel(&shared, termination);
        } else {
            let mut worker = SearchWorker::new(self.model, &shared, termination);
            worker.search_battle(0);
            worker.flush_nodes();
        }

        let timed_out = shared.stop.load(Ordering::Relaxed);
        let best = shared
            .incumbent
            .into_inner()
            .expect("incumbent lock poisoned");
        let status = match (&best, timed_out) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::NoSolutionFound,
        };

        let outcome = SearchOutcome {
            status,
            score: best.as_ref().map(|inc| inc.score),
            nodes_explored: shared.nodes.load(Ordering::Relaxed),
            best,
        };
        tracing::debug!(
            status = %outcome.status,
            score = ?outcome.score,
            nodes = outcome.nodes_explored,
            "search finished"
        );
        outcome
    }

    /// Scores the root leaf, then fans the first battle's branch seeds out
    /// on the rayon pool. Each seed fixes the strongest commander's use
    /// count on the first battle; the worker explores the rest.
    fn solve_parallel(&self, shared: &SearchShared, termination: &TimeTermination) {
        let battle = &self.model.contested()[0];

        let mut root = SearchWorker::new(self.model, shared, termination);
        root.offer_leaf(0);
        let continue_worthwhile =
            root.optimistic_objective(0) > shared.best_objective.load(Ordering::Relaxed);
        root.flush_nodes();

        if !continue_worthwhile || !root.cover_possible(0, 0, 0) {
            return;
        }

        let leader = battle.order[0];
        let damage = battle.damage[leader];
        let max_uses = root.cover_cap(leader, damage, battle.health);

        (0..=max_uses).rev().collect::<Vec<u32>>().into_par_iter().for_each(|uses| {
            let mut worker = SearchWorker::new(self.model, shared, termination);
            worker.remaining[leader] -= uses;
            worker.remaining_total -= uses as u64;
            if uses > 0 {
                worker.stack.push(Alloc {
                    battle: 0,
                    commander: leader,
                    uses,
                });
            }
            worker.cover(0, 1, uses as u64 * damage);
            worker.flush_nodes();
        });
    }
}

impl<'a> SearchWorker<'a> {
    fn new(
        model: &'a BattleModel,
        shared: &'a SearchShared,
        termination: &'a TimeTermination,
    ) -> Self {
        let commanders = model.commander_names().len();
        let attempts = model.attempts_per_commander();
        SearchWorker {
            model,
            shared,
            termination,
            remaining: vec![attempts; commanders],
            remaining_total: commanders as u64 * attempts as u64,
            stack: Vec::new(),
            defeats: 0,
            local_nodes: 0,
            check_countdown: TERMINATION_CHECK_INTERVAL,
        }
    }

    /// Explores battle `k` with every earlier contested battle defeated.
    fn search_battle(&mut self, k: usize) {
        if self.should_stop() {
            return;
        }
        self.local_nodes += 1;

        self.offer_leaf(k);
        if k == self.model.contested().len() {
            return;
        }
        if self.optimistic_objective(k) <= self.shared.best_objective.load(Ordering::Relaxed) {
            return;
        }
        self.cover(k, 0, 0);
    }

    /// Branches over use counts of the `oi`-th strongest commander on
    /// battle `k`, given `dealt` damage from earlier choices.
    fn cover(&mut self, k: usize, oi: usize, dealt: u64) {
        if self.should_stop() {
            return;
        }
        self.local_nodes += 1;

        let battle = &self.model.contested()[k];
        if dealt >= battle.health {
            self.defeats += 1;
            self.search_battle(k + 1);
            self.defeats -= 1;
            return;
        }
        if oi == battle.order.len() || !self.cover_possible(k, oi, dealt) {
            return;
        }

        let commander = battle.order[oi];
        let damage = battle.damage[commander];
        let max_uses = self.cover_cap(commander, damage, battle.health - dealt);

        for uses in (0..=max_uses).rev() {
            self.remaining[commander] -= uses;
            self.remaining_total -= uses as u64;
            if uses > 0 {
                self.stack.push(Alloc {
                    battle: k,
                    commander,
                    uses,
                });
            }
            self.cover(k, oi + 1, dealt + uses as u64 * damage);
            if uses > 0 {
                self.stack.pop();
            }
            self.remaining[commander] += uses;
            self.remaining_total += uses as u64;
        }
    }

    /// Most uses of `commander` worth spending toward `needed` health.
    fn cover_cap(&self, commander: usize, damage: u64, needed: u64) -> u32 {
        let finishing = needed.div_ceil(damage);
        finishing.min(self.remaining[commander] as u64) as u32
    }

    /// Whether the commanders from `oi` on can still defeat battle `k`.
    fn cover_possible(&self, k: usize, oi: usize, dealt: u64) -> bool {
        let battle = &self.model.contested()[k];
        let mut potential = dealt as u128;
        for &c in &battle.order[oi..] {
            potential += self.remaining[c] as u128 * battle.damage[c] as u128;
            if potential >= battle.health as u128 {
                return true;
            }
        }
        false
    }

    /// Scores the complete assignment where battle `k` is the first
    /// uncleared battle and every remaining use is poured onto it. Past
    /// the last battle, the surplus lands on the final battle as overkill.
    fn offer_leaf(&mut self, k: usize) {
        let contested = self.model.contested();
        let (score, dump_battle) = if k == contested.len() {
            (CampaignScore::from_parts(self.defeats, 0), k - 1)
        } else {
            let battle = &contested[k];
            let poured: u128 = battle
                .damage
                .iter()
                .zip(&self.remaining)
                .map(|(&damage, &left)| damage as u128 * left as u128)
                .sum();
            if poured >= battle.health as u128 {
                // The pour itself clears the battle; the next one stays
                // untouched at zero progress.
                (CampaignScore::from_parts(self.defeats + 1, 0), k)
            } else {
                let progress =
                    (CampaignScore::SCALE as u128 * poured / battle.health as u128) as i64;
                (CampaignScore::from_parts(self.defeats, progress), k)
            }
        };
        self.try_improve(score, dump_battle);
    }

    /// Pooled-budget relaxation of the best objective reachable from
    /// battle `k`: every use deals the battle's best single-use damage and
    /// budgets are shared across the roster.
    fn optimistic_objective(&self, k: usize) -> i64 {
        let mut pool = self.remaining_total;
        let mut defeats = self.defeats;
        for battle in &self.model.contested()[k..] {
            if battle.relaxed_need <= pool {
                pool -= battle.relaxed_need;
                defeats += 1;
                continue;
            }
            if battle.max_damage == 0 {
                return CampaignScore::from_parts(defeats, 0).scaled();
            }
            let poured = pool as u128 * battle.max_damage as u128;
            let progress = (CampaignScore::SCALE as u128 * poured / battle.health as u128) as i64;
            return CampaignScore::from_parts(defeats, progress).scaled();
        }
        CampaignScore::from_parts(defeats, 0).scaled()
    }

    fn try_improve(&mut self, score: CampaignScore, dump_battle: usize) {
        let objective = score.scaled();
        if objective <= self.shared.best_objective.load(Ordering::Relaxed) {
            return;
        }
        let uses = self.materialize(dump_battle);
        let mut guard = self
            .shared
            .incumbent
            .lock()
            .expect("incumbent lock poisoned");
        let current = guard.as_ref().map(|inc| inc.score.scaled());
        if current.map_or(true, |best| objective > best) {
            *guard = Some(Incumbent { score, uses });
            self.shared.best_objective.store(objective, Ordering::Relaxed);
            tracing::trace!(score = %score, "incumbent improved");
        }
    }

    /// Builds the full use grid from the cover stack plus the surplus
    /// poured onto `dump_battle`.
    fn materialize(&self, dump_battle: usize) -> Vec<Vec<u32>> {
        let contested = self.model.contested().len();
        let mut uses = vec![vec![0u32; contested]; self.remaining.len()];
        for alloc in &self.stack {
            uses[alloc.commander][alloc.battle] += alloc.uses;
        }
        for (commander, &left) in self.remaining.iter().enumerate() {
            if left > 0 {
                uses[commander][dump_battle] += left;
            }
        }
        uses
    }

    fn should_stop(&mut self) -> bool {
        if self.shared.stop.load(Ordering::Relaxed) {
            return true;
        }
        self.check_countdown -= 1;
        if self.check_countdown == 0 {
            self.check_countdown = TERMINATION_CHECK_INTERVAL;
            if self.termination.is_terminated() {
                self.shared.stop.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    fn flush_nodes(&mut self) {
        self.shared.nodes.fetch_add(self.local_nodes, Ordering::Relaxed);
        self.local_nodes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolveParameters;
    use raidplan_core::{DamageTable, HealthTable};

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn small_model() -> BattleModel {
        // Two bosses, one level. The second needs both commanders.
        let health =
            HealthTable::from_rows(names(&["A", "B"]), vec![(1, vec![100, 300])]).unwrap();
        let damage = DamageTable::from_rows(
            names(&["X", "Y"]),
            vec![
                (("A".to_string(), 0), vec![100, 60]),
                (("B".to_string(), 0), vec![150, 80]),
            ],
        )
        .unwrap();
        BattleModel::build(&health, &damage, &SolveParameters::new(2, 10.0)).unwrap()
    }

    #[test]
    fn test_clears_both_battles() {
        let model = small_model();
        let outcome = BranchAndBound::new(&model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        // X: 1 use on A (100), Y: 0 on A; then X 1 use + Y 2 uses on B
        // deals 310 >= 300.
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.score, Some(CampaignScore::from_parts(2, 0)));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = small_model();
        let sequential = BranchAndBound::new(&model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        let parallel = BranchAndBound::new(&model)
            .with_parallel_root_split(true)
            .solve(&TimeTermination::seconds(10));
        assert_eq!(sequential.score, parallel.score);
        assert_eq!(sequential.status, SolveStatus::Optimal);
        assert_eq!(parallel.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_budget_fully_spent() {
        let model = small_model();
        let outcome = BranchAndBound::new(&model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        let incumbent = outcome.best.unwrap();
        for per_commander in &incumbent.uses {
            let spent: u32 = per_commander.iter().sum();
            assert_eq!(spent, model.attempts_per_commander());
        }
    }

    #[test]
    fn test_frontier_progress_scored() {
        // One boss far beyond reach: progress only.
        let health = HealthTable::from_rows(names(&["A"]), vec![(1, vec![1000])]).unwrap();
        let damage =
            DamageTable::from_rows(names(&["X"]), vec![(("A".to_string(), 0), vec![30])])
                .unwrap();
        let model =
            BattleModel::build(&health, &damage, &SolveParameters::new(3, 10.0)).unwrap();
        let outcome = BranchAndBound::new(&model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        // 3 uses * 30 damage = 90 of 1000 health: 9% progress.
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.score, Some(CampaignScore::from_parts(0, 9)));
    }

    #[test]
    fn test_empty_roster_is_optimal_zero() {
        let health = HealthTable::from_rows(names(&["A"]), vec![(1, vec![50])]).unwrap();
        let damage =
            DamageTable::from_rows(Vec::new(), vec![(("A".to_string(), 0), Vec::new())])
                .unwrap();
        let model =
            BattleModel::build(&health, &damage, &SolveParameters::new(1, 10.0)).unwrap();
        let outcome = BranchAndBound::new(&model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.score, Some(CampaignScore::ZERO));
    }
}
