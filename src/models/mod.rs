pub mod assignment;
pub mod enums;
pub mod report_field;
pub mod report_instance;
pub mod report_type;
pub mod report_value;

pub use assignment::TestAssignment;
pub use report_field::ReportField;
pub use report_instance::ReportInstance;
pub use report_type::ReportType;
pub use report_value::ReportValue;
