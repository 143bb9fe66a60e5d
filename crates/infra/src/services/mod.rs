mod habits;
pub mod notifications;

pub use habits::IHabitAnalyzer;
