pub mod entity;
pub mod evidence;
pub mod report;
pub mod request;
pub mod result;

pub use entity::{Entity, EntityKind};
pub use evidence::{Credibility, EvidenceItem, EvidenceSummary, SourceKind};
pub use report::{ReportReceipt, ReportSubmission, StoredReport};
pub use request::{InputType, VerificationRequest};
pub use result::{Classification, Stage, VerificationResult};
