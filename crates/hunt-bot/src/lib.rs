pub mod agent;
pub mod belief;
pub mod planner;
pub mod policy;

pub use agent::{AgentParams, HuntOutcome, SearchAgent};
pub use belief::{BeliefError, BeliefUpdater};
pub use planner::{AStarPlanner, Plan, PlanStats, believed_passable, reachable_distances};
pub use policy::{Ranker, Strategy};
