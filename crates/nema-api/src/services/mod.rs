// Services layer for business logic
// Services own the EAT rules and call the content store through the EatStore trait

pub mod eat;
pub mod publish;

pub use eat::{DashboardView, EatService, EVENT_WINDOW_DAYS};
pub use publish::{PublishFailure, PublishService, SideEffectReport};
