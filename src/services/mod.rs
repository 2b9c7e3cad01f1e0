pub mod account_service;
pub mod class_service;
pub mod member_service;
pub mod quarter_service;
pub mod report_service;
pub mod weekly_service;

pub use account_service::AccountService;
pub use class_service::ClassService;
pub use member_service::MemberService;
pub use quarter_service::QuarterService;
pub use report_service::ReportService;
pub use weekly_service::WeeklyService;
