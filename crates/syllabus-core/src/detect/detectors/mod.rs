//! Per-field detectors.

pub mod assignment_delivery;
pub mod class_location;
pub mod credit_hours;
pub mod email;
pub mod final_grade_scale;
pub mod grading_process;
pub mod headings;
pub mod instructor;
pub mod late_work;
pub mod modality;
pub mod office;
pub mod phone;
pub mod preferred_contact;
pub mod response_time;
pub mod slo;
pub mod workload;

pub use assignment_delivery::AssignmentDeliveryDetector;
pub use class_location::ClassLocationDetector;
pub use credit_hours::CreditHoursDetector;
pub use email::EmailDetector;
pub use final_grade_scale::FinalGradeScaleDetector;
pub use grading_process::GradingProcessDetector;
pub use headings::HeadingDetector;
pub use instructor::InstructorDetector;
pub use late_work::LateWorkDetector;
pub use modality::{classify, Modality, ModalityAssessment, ModalityDetector};
pub use office::OfficeDetector;
pub use phone::{PhoneDetector, PhoneMatch, PhoneTier};
pub use preferred_contact::PreferredContactDetector;
pub use response_time::ResponseTimeDetector;
pub use slo::SloDetector;
pub use workload::WorkloadDetector;
