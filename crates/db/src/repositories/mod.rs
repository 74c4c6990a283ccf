//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Primitive
//! repositories (single entities) take an executor and return `sqlx::Error`;
//! workflow repositories (composite events, custom points, attendance,
//! aggregation) own their transactions and return [`tally_core::error::CoreError`].

pub mod action_repo;
pub mod attendance_repo;
pub mod composite_repo;
pub mod custom_points_repo;
pub mod department_repo;
pub mod event_repo;
pub mod form_repo;
pub mod ledger_repo;
pub mod member_repo;
pub mod points_repo;
pub mod submission_repo;

pub use action_repo::ActionRepo;
pub use attendance_repo::AttendanceRepo;
pub use composite_repo::CompositeRepo;
pub use custom_points_repo::CustomPointsRepo;
pub use department_repo::DepartmentRepo;
pub use event_repo::EventRepo;
pub use form_repo::FormRepo;
pub use ledger_repo::LedgerRepo;
pub use member_repo::MemberRepo;
pub use points_repo::PointsRepo;
pub use submission_repo::SubmissionRepo;
