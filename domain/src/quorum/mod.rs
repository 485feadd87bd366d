//! Consensus gate domain
//!
//! Every active agent returns exactly one [`AgentVerdict`] per review cycle.
//! The gate turns those verdicts into a single [`ConsensusResult`].
//!
//! # Decision Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ReviewCycle                                                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  COLLECTING      verdicts arrive in any order                    │
//! │      │           deadline → pending agents get timeout VETOs     │
//! │      ▼                                                           │
//! │  ALL_RECEIVED    late verdicts are discarded from here on        │
//! │      │                                                           │
//! │      ▼                                                           │
//! │  DECIDING        no vetoes            → APPROVED                 │
//! │      │           1 veto + override                               │
//! │      │             + approvals ≥ N    → APPROVED_WITH_OVERRIDE   │
//! │      │           otherwise            → BLOCKED                  │
//! │      ▼                                                           │
//! │  DECIDED                                                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod cycle;
pub mod policy;
pub mod verdict;

// Re-export main types
pub use consensus::{ConsensusDecision, ConsensusResult, decide};
pub use cycle::{CyclePhase, RecordOutcome, ReviewCycle};
pub use policy::{ConsensusPolicy, DEFAULT_VETO_OVERRIDE_THRESHOLD};
pub use verdict::{
    AGENT_ERROR_REASON, AgentVerdict, Severity, TIMEOUT_REASON, VerdictOrigin, VerdictStatus,
};
