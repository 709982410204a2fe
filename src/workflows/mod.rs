pub mod applications;
pub mod daily_report;
pub mod dashboard;
pub mod income;
pub mod maintenance;
pub mod push;
