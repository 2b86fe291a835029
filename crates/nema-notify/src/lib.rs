// Notification collaborators for published EATs
//
// - pdf: renders a persisted EAT as an A4 PDF (EatRenderer)
// - email: sends the advisory to the configured recipients over SMTP (EatNotifier)
//
// Both are best-effort: the publish orchestrator logs their failures and
// never lets them change a publish result.

pub mod email;
pub mod pdf;

pub use email::{build_message, ConfigError, EmailConfig, EmailError, SmtpNotifier};
pub use pdf::PdfRenderer;
