pub mod account;
pub mod class;
pub mod class_member;
pub mod quarter;
pub mod weekly_record;

pub use account::Account;
pub use class::Class;
pub use class_member::ClassMember;
pub use quarter::Quarter;
pub use weekly_record::WeeklyRecord;
