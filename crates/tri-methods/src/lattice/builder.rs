//! Growing the lattice.
//!
//! Before the dividend, level `i` is the geometric grid `F_i αʲ` around the
//! forward `F_i = S₀ e^{r tᵢ}`. At the crossing level `k` the trunk drops to
//! `F_k − D` and grows at the rate from there on, so every later level is
//! again a plain grid around its own trunk.
//!
//! Off the crossing step every node branches to `j − 1, j, j + 1` with the
//! lattice-wide probabilities. On the crossing step each parent's middle
//! child is the ex-dividend node nearest its forward `S e^{rΔt} − D`, and
//! the probabilities are solved so the step still matches the mean and
//! variance of the pre-dividend move. Far down the tail a parent may be
//! worth too little to fund the dividend; such a parent sends all of its
//! mass to the lowest ex-dividend node.
//!
//! Path probabilities are pushed forward one level at a time from live
//! parents only.

use super::node::{Branching, Level, Node};
use super::parameters::{LatticeParameters, PROBABILITY_TOLERANCE};
use super::pruning::{NoPruning, ProbabilityFloor, PruneRule, PruningPolicy, StdDevBand};
use tracing::{debug, warn};
use tri_core::{ensure, Error, Probability, Real, Result, Size};
use tri_market::MarketModel;
use tri_math::in_unit_interval;
use tri_time::Date;

/// Dividend dates within `DIVIDEND_DATE_TOLERANCE · Δt` after a level's
/// time are treated as falling on that level.
pub const DIVIDEND_DATE_TOLERANCE: Real = 1e-3;

/// Node counts of a grown lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeStatistics {
    /// Nodes allocated across all levels.
    pub total_nodes: usize,
    /// Nodes that survived pruning.
    pub live_nodes: usize,
}

impl NodeStatistics {
    /// Nodes removed by pruning.
    pub fn pruned_nodes(&self) -> usize {
        self.total_nodes - self.live_nodes
    }
}

/// A grown lattice: spots and path probabilities set, values not yet
/// computed.
#[derive(Debug, Clone)]
pub struct Lattice {
    parameters: LatticeParameters,
    levels: Vec<Level>,
    dividend_level: Option<Size>,
    statistics: NodeStatistics,
}

impl Lattice {
    /// Branching parameters.
    pub fn parameters(&self) -> &LatticeParameters {
        &self.parameters
    }

    /// Levels `0..=n`.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level `i`, if it exists.
    pub fn level(&self, i: Size) -> Option<&Level> {
        self.levels.get(i)
    }

    /// First level at which the spot is ex-dividend.
    pub fn dividend_level(&self) -> Option<Size> {
        self.dividend_level
    }

    /// Node counts.
    pub fn statistics(&self) -> NodeStatistics {
        self.statistics
    }

    /// First level with no live node, if pruning emptied one.
    pub fn degenerate_level(&self) -> Option<Size> {
        self.levels
            .iter()
            .find(|l| l.live_count() == 0)
            .map(|l| l.index)
    }

    /// Take the parameters and the level arenas.
    pub fn into_parts(self) -> (LatticeParameters, Vec<Level>) {
        (self.parameters, self.levels)
    }
}

/// Spot value of node `(i, j)`.
#[derive(Debug, Clone)]
struct SpotGrid {
    spacing: Real,
    /// Trunk spot per level.
    trunk: Vec<Real>,
    /// Crossing level and cash amount.
    dividend: Option<(Size, Real)>,
}

impl SpotGrid {
    #[inline]
    fn spot(&self, level: Size, offset: i32) -> Real {
        self.trunk[level] * self.spacing.powi(offset)
    }
}

/// Builds a [`Lattice`] for one pricing call.
///
/// # Example
/// ```
/// use tri_market::MarketModel;
/// use tri_methods::{LatticeBuilder, LatticeParameters, PruningPolicy};
/// use tri_time::date;
///
/// let market = MarketModel::without_dividend(0.04, 0.25, 100.0).unwrap();
/// let params = LatticeParameters::new(&market, 1.0, 50).unwrap();
/// let lattice = LatticeBuilder::new(&params, &market, date(2025, 1, 1).unwrap())
///     .pruning(PruningPolicy::ByProbability(1e-8))
///     .build()
///     .unwrap();
/// assert_eq!(lattice.levels().len(), 51);
/// ```
#[derive(Debug, Clone)]
pub struct LatticeBuilder<'a> {
    params: &'a LatticeParameters,
    market: &'a MarketModel,
    trade_date: Date,
    pruning: PruningPolicy,
}

impl<'a> LatticeBuilder<'a> {
    /// A builder with no pruning.
    pub fn new(params: &'a LatticeParameters, market: &'a MarketModel, trade_date: Date) -> Self {
        Self {
            params,
            market,
            trade_date,
            pruning: PruningPolicy::None,
        }
    }

    /// Set the pruning policy.
    pub fn pruning(mut self, policy: PruningPolicy) -> Self {
        self.pruning = policy;
        self
    }

    /// Level at which the dividend is paid, or `None` when there is no
    /// dividend in `(trade date, maturity]`.
    ///
    /// This is the first level `k ≥ 1` with `t_k ≥ t_div − tol`, where
    /// `tol = DIVIDEND_DATE_TOLERANCE · Δt`.
    pub fn dividend_level(&self) -> Option<Size> {
        let t_div = self
            .market
            .dividend()?
            .time_within(self.trade_date, self.params.time_to_maturity())?;
        let dt = self.params.dt();
        let tol = DIVIDEND_DATE_TOLERANCE * dt;
        let k = ((t_div - tol) / dt).ceil() as Size;
        Some(k.clamp(1, self.params.step_count()))
    }

    /// Grow every level.
    ///
    /// # Errors
    /// `InvalidInput` for an invalid pruning parameter or a dividend worth
    /// at least the forward on its crossing level; `LatticeInstability` when
    /// the crossing probabilities of a node at or above the trunk leave
    /// `[0, 1]`.
    pub fn build(&self) -> Result<Lattice> {
        self.pruning.validate()?;
        let grid = self.spot_grid()?;
        let lattice = match self.pruning {
            PruningPolicy::None => self.grow(NoPruning, grid),
            PruningPolicy::ByProbability(threshold) => {
                self.grow(ProbabilityFloor { threshold }, grid)
            }
            PruningPolicy::ByStdDev(width) => self.grow(StdDevBand { width }, grid),
        }?;
        debug!(
            total_nodes = lattice.statistics.total_nodes,
            live_nodes = lattice.statistics.live_nodes,
            dividend_level = ?lattice.dividend_level,
            "lattice built"
        );
        Ok(lattice)
    }

    fn spot_grid(&self) -> Result<SpotGrid> {
        let n = self.params.step_count();
        let r = self.params.interest_rate();
        let s0 = self.market.spot_price();
        let forward = |i: Size| s0 * (r * self.params.time(i)).exp();

        let Some(k) = self.dividend_level() else {
            return Ok(SpotGrid {
                spacing: self.params.spacing_factor(),
                trunk: (0..=n).map(forward).collect(),
                dividend: None,
            });
        };

        let amount = self.market.dividend_amount();
        let f_k = forward(k);
        let ex_trunk = f_k - amount;
        ensure!(
            ex_trunk > 0.0,
            "dividend {amount} paid at level {k} is worth at least the forward {f_k}"
        );
        let t_k = self.params.time(k);
        Ok(SpotGrid {
            spacing: self.params.spacing_factor(),
            trunk: (0..=n)
                .map(|i| {
                    if i < k {
                        forward(i)
                    } else {
                        ex_trunk * (r * (self.params.time(i) - t_k)).exp()
                    }
                })
                .collect(),
            dividend: Some((k, amount)),
        })
    }

    fn grow<R: PruneRule>(&self, rule: R, grid: SpotGrid) -> Result<Lattice> {
        let n = self.params.step_count();
        let uniform = [
            self.params.prob_down(),
            self.params.prob_mid(),
            self.params.prob_up(),
        ];
        let crossing = grid.dividend.map(|(k, _)| k);

        let mut levels: Vec<Level> = Vec::with_capacity(n + 1);
        let mut root = Node::new(self.market.spot_price(), 1.0);
        root.pruned = rule.prune(0, 0, 1.0);
        levels.push(Level {
            index: 0,
            time: 0.0,
            min_offset: 0,
            nodes: vec![root],
            branching: None,
        });

        for i in 1..=n {
            let time = self.params.time(i);
            if levels[i - 1].live_count() == 0 {
                warn!(level = i - 1, "pruning removed every node of a level");
                levels.extend((i..=n).map(|l| Level::empty(l, self.params.time(l))));
                break;
            }

            if crossing == Some(i) {
                let branching = self.crossing_branching(&levels[i - 1], &grid, i)?;
                levels[i - 1].branching = Some(branching);
            }

            let parent = &levels[i - 1];
            let live: Vec<(usize, &Node)> = parent
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_live())
                .collect();
            let (lo, hi) = live.iter().fold((i32::MAX, i32::MIN), |(lo, hi), &(k, _)| {
                let mid = parent.branch(k, uniform).0;
                (lo.min(mid - 1), hi.max(mid + 1))
            });

            let mut nodes: Vec<Node> = (lo..=hi).map(|j| Node::new(grid.spot(i, j), 0.0)).collect();
            let mut reached = vec![false; nodes.len()];
            for &(k, p) in &live {
                let (mid, probs) = parent.branch(k, uniform);
                for (child, q) in (mid - 1..=mid + 1).zip(probs) {
                    let idx = (child - lo) as usize;
                    nodes[idx].path_probability += p.path_probability * q;
                    reached[idx] = true;
                }
            }
            for ((j, node), reached) in (lo..).zip(nodes.iter_mut()).zip(reached) {
                node.pruned = !reached || rule.prune(i, j, node.path_probability);
            }

            levels.push(Level {
                index: i,
                time,
                min_offset: lo,
                nodes,
                branching: None,
            });
        }

        if let Some(last) = levels.last() {
            if last.index == n && last.live_count() == 0 && !last.nodes.is_empty() {
                warn!(level = n, "pruning removed every node of a level");
            }
        }

        let statistics = levels.iter().fold(NodeStatistics::default(), |acc, l| {
            NodeStatistics {
                total_nodes: acc.total_nodes + l.nodes.len(),
                live_nodes: acc.live_nodes + l.live_count(),
            }
        });

        Ok(Lattice {
            parameters: *self.params,
            levels,
            dividend_level: crossing,
            statistics,
        })
    }

    /// Branching of the last cum-dividend level into the ex-dividend
    /// level `crossing`.
    fn crossing_branching(
        &self,
        parent: &Level,
        grid: &SpotGrid,
        crossing: Size,
    ) -> Result<Branching> {
        let step = CrossingStep {
            growth: (self.params.interest_rate() * self.params.dt()).exp(),
            variance_factor: (self.params.volatility().powi(2) * self.params.dt()).exp_m1(),
            alpha: grid.spacing,
            trunk: grid.trunk[crossing],
            amount: grid.dividend.map_or(0.0, |(_, d)| d),
        };

        let size = parent.nodes.len();
        let mut mid = Vec::with_capacity(size);
        let mut probs = Vec::with_capacity(size);
        let mut solved = vec![false; size];
        let mut insolvent = Vec::new();
        for (k, (j, node)) in parent.iter().enumerate() {
            if !node.is_live() {
                mid.push(j);
                probs.push([0.0; 3]);
                continue;
            }
            match step.solve(node.spot_value) {
                Ok((m, p)) => {
                    mid.push(m);
                    probs.push(p);
                    solved[k] = true;
                }
                Err(p) if j < 0 => {
                    mid.push(j);
                    probs.push(p);
                    insolvent.push(k);
                }
                Err(p) => return Err(self.instability(p)),
            }
        }

        if let Some(&first) = insolvent.first() {
            let Some(floor) = (0..size).filter(|&k| solved[k]).map(|k| mid[k]).min() else {
                return Err(self.instability(probs[first]));
            };
            debug!(
                nodes = insolvent.len(),
                "tail nodes cannot fund the dividend, sent to the lowest ex-dividend node"
            );
            for k in insolvent {
                mid[k] = floor;
                probs[k] = [1.0, 0.0, 0.0];
            }
        }

        Ok(Branching { mid, probs })
    }

    fn instability(&self, [p_down, p_mid, p_up]: [Probability; 3]) -> Error {
        Error::LatticeInstability {
            p_up,
            p_mid,
            p_down,
            dt: self.params.dt(),
            volatility: self.params.volatility(),
            step_count: self.params.step_count(),
        }
    }
}

/// One cum-to-ex-dividend step.
#[derive(Debug, Clone, Copy)]
struct CrossingStep {
    growth: Real,
    variance_factor: Real,
    alpha: Real,
    trunk: Real,
    amount: Real,
}

impl CrossingStep {
    /// Middle-child offset and `[p_down, p_mid, p_up]` for a parent at
    /// `spot`, or the offending probabilities when they leave `[0, 1]`.
    fn solve(&self, spot: Real) -> Result<(i32, [Probability; 3]), [Probability; 3]> {
        let alpha = self.alpha;
        let expected = spot * self.growth - self.amount;
        if expected.is_nan() || expected <= 0.0 {
            return Err([Real::NAN; 3]);
        }
        let variance = (spot * self.growth).powi(2) * self.variance_factor;

        // nearest node, with the cut halfway between neighbours
        let node = |m: i32| self.trunk * alpha.powi(m);
        let mut m = ((expected / self.trunk).ln() / alpha.ln()).round() as i32;
        while expected >= 0.5 * node(m) * (1.0 + alpha) {
            m += 1;
        }
        while expected <= 0.5 * node(m) * (1.0 + 1.0 / alpha) {
            m -= 1;
        }

        let s_mid = node(m);
        let mean_term = (expected - s_mid) / s_mid;
        let second_term = (variance + (expected + s_mid) * (expected - s_mid)) / (s_mid * s_mid);
        let denominator = (1.0 - alpha) * (alpha.powi(-2) - 1.0);
        let p_down = (second_term - (alpha + 1.0) * mean_term) / denominator;
        let p_up = (mean_term - (1.0 / alpha - 1.0) * p_down) / (alpha - 1.0);
        let p_mid = 1.0 - p_up - p_down;

        let probs = [p_down, p_mid, p_up];
        if probs
            .iter()
            .all(|&p| p.is_finite() && in_unit_interval(p, PROBABILITY_TOLERANCE))
        {
            Ok((m, probs))
        } else {
            Err(probs)
        }
    }
}
