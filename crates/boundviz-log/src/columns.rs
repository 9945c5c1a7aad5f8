//! Column names the derivation and the renderer rely on.
//!
//! Everything else in a section header is carried through untouched.

/// Root-bounds row key and x-axis candidate.
pub const ITER: &str = "iter";
/// Primal bound.
pub const PB: &str = "pb";
/// Dual bound.
pub const DB: &str = "db";
/// Solving time at which the bound pair was recorded.
pub const TIME: &str = "time";
/// Distance between the current and the previous dual solution.
pub const DUAL_DIFF: &str = "dualdiff";
/// Distance between the current and the final dual solution.
pub const DUAL_OPT_DIFF: &str = "dualoptdiff";

/// Variable-table key.
pub const NAME: &str = "name";
/// Branch-and-bound node a variable was created in.
pub const NODE: &str = "node";
/// Value of the variable in the root relaxation solution.
pub const ROOT_LP_SOLVAL: &str = "rootlpsolval";
/// Reduced-cost call that created the variable, `-1` for Farkas pricing.
pub const CREATION_INDEX: &str = "rootredcostcall";
/// Value of the variable in the best integral solution.
pub const SOLVAL: &str = "solval";

/// Derived trailing moving average of [`DB`].
pub const DB_MOVING_AVERAGE: &str = "db_ma";
/// Derived cumulative share of relaxation-active variables.
pub const LP_SHARE: &str = "lpvars";
/// Derived cumulative share of integral-solution variables.
pub const IP_SHARE: &str = "ipvars";
