pub mod breakdown;
pub mod error;
pub mod goal;
pub mod task;

pub use breakdown::{fits_deadline, Breakdown, TaskRecord, MAX_TASK_DAYS};
pub use error::GoalplanError;
pub use goal::Goal;
pub use task::{Priority, Status, Task};
