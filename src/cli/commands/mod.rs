pub mod report;

pub use report::ReportCommand;
