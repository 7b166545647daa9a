//! Apply-to-job workflow, client decisions and the worker schedule view.

mod service;
mod views;

pub use service::{ApplicationService, ApplicationServiceError};
pub use views::{ApplyReceipt, EmployerInfo, ScheduleEntry};
