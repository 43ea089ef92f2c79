//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod course;
pub mod dashboard;
pub mod enquiry;
pub mod fee_payment;
pub mod student;
pub mod user;

pub use course::{CourseError, CourseRepository, CreateCourseInput};
pub use dashboard::{DashboardError, DashboardRepository, DashboardSummary};
pub use enquiry::{CreateEnquiryInput, EnquiryError, EnquiryFilter, EnquiryRepository};
pub use fee_payment::{
    CollectionSummary, FeePaymentError, FeePaymentRepository, PaymentWithStudent, ReceiptFilter,
};
pub use student::{
    CreateStudentInput, StudentError, StudentFilter, StudentRepository, StudentWithCourse,
    UpdateStudentInput, display_course,
};
pub use user::UserRepository;
