//! Built-in agent implementations: the four hazard workflow nodes, the crew
//! member used by the mission graphs and the tool-less advisor.

pub mod advisor;
pub mod crew;
pub mod generator;
pub mod reporter;
pub mod router;
pub mod validator;

pub use advisor::AdvisorAgent;
pub use crew::{CrewMember, CrewTask};
pub use generator::Generator;
pub use reporter::Reporter;
pub use router::{Route, Router};
pub use validator::{Validator, Verdict, VerdictPolicy};
