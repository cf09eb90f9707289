//! Sale Logic
//!
//! Stage machine, admission orchestration and fund withdrawal, all operating
//! on one explicit [`SaleState`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SALE                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  stage.rs        - Inactive → PreSale → PublicSale          │
//! │  admin.rs        - Operator-only stage and delay changes    │
//! │  mint.rs         - commit / presale_mint / public_mint      │
//! │  contributors.rs - Contributor set and withdrawals          │
//! │  state.rs        - SaleState and CallContext                │
//! │  events.rs       - Notification log                         │
//! │  error.rs        - SaleError taxonomy                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod contributors;
pub mod error;
pub mod events;
pub mod mint;
pub mod stage;
pub mod state;

pub use admin::{activate_presale, activate_public_sale, set_reveal_delay};
pub use contributors::{add_contributor, withdraw, ContributorLedger};
pub use error::{ErrorCategory, SaleError};
pub use events::{SaleEvent, SaleEventData};
pub use mint::{commit, presale_mint, public_mint, MintReceipt};
pub use stage::{Stage, StageController};
pub use state::{CallContext, SaleState, SnapshotError};
